pub mod actions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::{play_turn, throw_all};
#[allow(unused_imports)]
pub use mocks::{ConflictingGameRepository, RecordingHandler, SlowAckGameRepository};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
