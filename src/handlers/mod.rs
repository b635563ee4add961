//! Command Handlers module
//!
//! Handlers orchestrate domain types and stores for one use case each.

mod cart_handler;
mod catalog_handler;
mod commands;

pub use cart_handler::CartHandler;
pub use catalog_handler::CatalogHandler;
pub use commands::*;
