pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod index;

pub use error::{IndexError, Result};
