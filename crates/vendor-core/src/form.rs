//! Decoding of the urlencoded vendor form.
//!
//! The HTML form posts repeated `products` keys for the multi-select, so the
//! body is handled as an ordered list of key/value pairs rather than a struct.

use chrono::NaiveDate;

use crate::types::{
    BusinessType, DATE_FORMAT, DEFAULT_YEARS_IN_BUSINESS, FormSubmission, MAX_YEARS_IN_BUSINESS,
    Product,
};
use crate::{Error, Result};

/// Form field carrying the company name.
pub const FIELD_COMPANY_NAME: &str = "company_name";
/// Form field carrying the business type.
pub const FIELD_BUSINESS_TYPE: &str = "business_type";
/// Form field carrying one selected product (repeated).
pub const FIELD_PRODUCTS: &str = "products";
/// Form field carrying years in business.
pub const FIELD_YEARS: &str = "years_in_business";
/// Form field carrying the onboarding date.
pub const FIELD_ONBOARDING_DATE: &str = "onboarding_date";
/// Form field carrying the notes.
pub const FIELD_ADDITIONAL_INFO: &str = "additional_info";
/// Present only when the submit button was pressed.
pub const FIELD_SUBMIT: &str = "submit";

/// Decode posted form pairs.
///
/// Returns `Ok(None)` unless the submit button field is present. Blank
/// optional fields fall back to form defaults; `today` fills an empty date.
pub fn decode_form(pairs: &[(String, String)], today: NaiveDate) -> Result<Option<FormSubmission>> {
    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    if field(FIELD_SUBMIT).is_none() {
        return Ok(None);
    }

    let business_type = match field(FIELD_BUSINESS_TYPE).unwrap_or("") {
        "" => None,
        label => Some(label.parse::<BusinessType>()?),
    };

    let mut products = Vec::new();
    for (_, label) in pairs.iter().filter(|(k, _)| k == FIELD_PRODUCTS) {
        let product = label.parse::<Product>()?;
        if !products.contains(&product) {
            products.push(product);
        }
    }

    let years_in_business = match field(FIELD_YEARS).map(str::trim).unwrap_or("") {
        "" => DEFAULT_YEARS_IN_BUSINESS,
        raw => match raw.parse::<u8>() {
            Ok(y) if y <= MAX_YEARS_IN_BUSINESS => y,
            _ => return Err(Error::invalid_field(FIELD_YEARS, raw)),
        },
    };

    let onboarding_date = match field(FIELD_ONBOARDING_DATE).map(str::trim).unwrap_or("") {
        "" => today,
        raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| Error::invalid_field(FIELD_ONBOARDING_DATE, raw))?,
    };

    Ok(Some(FormSubmission {
        company_name: field(FIELD_COMPANY_NAME).unwrap_or("").to_string(),
        business_type,
        products,
        years_in_business,
        onboarding_date,
        additional_info: field(FIELD_ADDITIONAL_INFO).unwrap_or("").to_string(),
    }))
}
