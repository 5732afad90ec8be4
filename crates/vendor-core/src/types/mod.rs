//! Core types for vendor intake.

mod proptests;
mod record;
mod row;
mod submission;
mod table;

pub use record::{
    BusinessType, DATE_FORMAT, DEFAULT_YEARS_IN_BUSINESS, MAX_YEARS_IN_BUSINESS,
    PRODUCT_SEPARATOR, Product, VendorRecord, join_products,
};
pub use row::{COLUMNS, VendorRow};
pub use submission::FormSubmission;
pub use table::VendorTable;
