//! Item, enemy and tier definitions, supplied through [`CatalogProvider`].

#![allow(unused_imports)]

pub mod data;
pub mod provider;
pub mod types;

pub use data::default_catalog;
pub use provider::*;
pub use types::*;
