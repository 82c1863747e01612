//! Core types and utilities shared by every stage of generation

pub mod types;
pub mod error;
pub mod logging;
pub mod rng;

pub use types::*;
pub use error::Error;
pub use rng::{hash_seed, SimpleRng};
