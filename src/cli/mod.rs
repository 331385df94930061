pub mod args;
pub mod dispatch;

pub use args::{Cli, Commands};
pub use dispatch::run;
