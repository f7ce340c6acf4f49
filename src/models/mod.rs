//! Data Models
//!
//! Contains the data structures used throughout the crate.

pub mod file;
pub mod knowledge;
pub mod provider;

pub use file::*;
pub use knowledge::*;
pub use provider::*;
