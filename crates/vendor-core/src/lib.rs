#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Vendor Core Library
//!
//! Core types and intake rules for the vendor registration workflow.

pub mod error;
pub mod form;
pub mod types;
pub mod validate;

// Re-exports for convenience
pub use error::{Error, Result};
pub use form::decode_form;
pub use types::{
    BusinessType, COLUMNS, FormSubmission, Product, VendorRecord, VendorRow, VendorTable,
};
pub use validate::{ValidationError, append_submission, validate};
