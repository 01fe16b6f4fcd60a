//! Error types for the chat and translation client.

mod types;
mod categories;

pub use types::*;
pub use categories::*;
