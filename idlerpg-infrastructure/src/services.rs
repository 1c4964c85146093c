pub mod client_cache;
pub mod health_service;
pub mod slack_client;
pub mod tick_scheduler;

pub use client_cache::*;
pub use health_service::*;
pub use slack_client::*;
pub use tick_scheduler::*;
