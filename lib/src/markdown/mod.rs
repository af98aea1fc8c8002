mod plugin;
mod markdown;
mod auto_heading;
mod links;

pub use plugin::*;
pub use markdown::*;
pub use auto_heading::*;
pub use links::*;
