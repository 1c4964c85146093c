// Idle RPG Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod state;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::AppError;
pub use metrics::Metrics;
pub use ops::PlayerLocks;
pub use state::AppState;
pub use store::GameStore;
