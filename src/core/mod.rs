//! Core reporting types, validation, and numbering.
//!
//! This module provides the document and period model shared by the
//! selector, aggregator, filing state machine and export formats.

mod builder;
mod error;
pub mod money;
mod numbering;
mod period;
mod types;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use period::*;
pub use types::*;
