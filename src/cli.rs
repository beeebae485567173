//! Command line interface for Sentilex.

pub mod args;
pub mod commands;
pub mod output;
pub mod shell;

pub use args::*;
pub use commands::*;
pub use output::*;
