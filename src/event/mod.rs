// Per-game change notification.
//
// Every committed game mutation is published on the game's channel with a full
// snapshot of the game, so subscribers replace their view instead of patching it.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::GameEvent;
pub use handler::{GameEventError, GameEventHandler};
pub use subscription::GameSubscription;

// Internal modules
mod bus;
mod events;
mod handler;
mod subscription;
