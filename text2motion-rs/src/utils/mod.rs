//! Shared utilities for the text2motion-rs CLI

pub mod tree;

pub use tree::*;
