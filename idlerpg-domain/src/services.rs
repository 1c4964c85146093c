// Pure game rules
pub mod announcements;
pub mod classifier;
pub mod item_generator;
pub mod leveling;
pub mod time_format;

pub use announcements::*;
pub use classifier::*;
pub use item_generator::*;
pub use leveling::*;
pub use time_format::*;
