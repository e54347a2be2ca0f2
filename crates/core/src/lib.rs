//! Core utilities for routeplay
//!
//! This crate provides shared functionality used by the playback engine and
//! the command-line front end:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use routeplay_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("dwell for {:?} at stops", config.schema.playback.dwell());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};
