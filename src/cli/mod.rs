//! CLI command handling

pub mod encode;
pub mod output;
pub mod replay;

pub use encode::*;
pub use output::*;
pub use replay::*;
