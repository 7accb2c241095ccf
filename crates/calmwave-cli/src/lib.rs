#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;

pub use commands::{Commands, GenerateArgs, PipelineArgs, ServeArgs};
pub use parser::Cli;
