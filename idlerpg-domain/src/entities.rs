// Domain entities
pub mod chat;
pub mod chat_event;
pub mod item;
pub mod player;
pub mod runtime_config;
pub mod slash_command;
pub mod team;

pub use chat::*;
pub use chat_event::*;
pub use item::*;
pub use player::*;
pub use runtime_config::*;
pub use slash_command::*;
pub use team::*;
