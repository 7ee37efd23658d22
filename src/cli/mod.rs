//! Command line interface

pub mod check;
pub mod commands;
pub mod display;

pub use self::commands::{CliArgs, Commands};
