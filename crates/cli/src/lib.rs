//! CLI utilities for routeplay
//!
//! Provides shared CLI functionality:
//! - Global flags
//! - Terminal output formatting and error reports
//! - Progress indicators

#![warn(missing_docs)]

pub mod args;
pub mod output;
pub mod progress;
