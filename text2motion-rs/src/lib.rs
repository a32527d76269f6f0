//! Text2Motion-RS library
//!
//! This library provides the command-line front end for generating and
//! importing Text2Motion animations.

pub mod cli;
pub mod commands;
pub mod config;
pub mod utils;
