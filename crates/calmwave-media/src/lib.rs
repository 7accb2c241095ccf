#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod args;
mod toolkit;

pub use toolkit::{FfmpegToolkit, ToolVersions};

#[cfg(test)]
use tokio_test as _;
