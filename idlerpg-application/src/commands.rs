pub mod channel_commands;
pub mod command_dispatch;
pub mod event_commands;
pub mod oauth_commands;
pub mod register_commands;
pub mod reset_commands;
pub mod tick_commands;

pub use command_dispatch::handle_command;
pub use event_commands::handle_event;
pub use oauth_commands::authorize;
pub use tick_commands::run_tick;
