// Library crate for the Maksi-Jatsi game server
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod game;
pub mod router;
pub mod shared;
pub mod user;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ScoringRules};
pub use event::{EventBus, GameEvent, GameSubscription};
pub use game::{GameError, GameService, GameSession, ScoreType};
pub use router::build_router;
pub use shared::{AppError, AppState};
pub use user::{User, UserService};
