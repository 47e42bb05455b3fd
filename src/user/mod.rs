// Public API - what other modules can use
pub use handlers::{create_user, find_user, get_user, get_user_scores};
pub use middleware::{caller_identity, Caller, CALLER_HEADER};
pub use models::User;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
mod service;
pub mod types;
