pub mod command_handlers;
pub mod event_handlers;
pub mod oauth_handlers;
pub mod ops_handlers;

pub use command_handlers::*;
pub use event_handlers::*;
pub use oauth_handlers::*;
pub use ops_handlers::*;
