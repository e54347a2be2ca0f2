//! Configuration loading and schema definitions
//!
//! Settings shared by the parser, the playback engine and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
