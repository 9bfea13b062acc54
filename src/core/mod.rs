//! Engine-wide rules, configuration, errors and randomness.

#![allow(unused_imports)]

pub mod config;
pub mod constants;
pub mod error;
pub mod rng;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use rng::*;
