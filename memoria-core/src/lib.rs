//! Core types for memoria
//!
//! This crate provides the error type, configuration, logging setup and
//! the on-disk conversation store shared by the other memoria crates.

pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod utils;

pub use error::{Error, Result};
