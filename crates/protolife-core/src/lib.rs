//! Core types and utilities for the Protolife grid ecosystem.

pub mod types;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
