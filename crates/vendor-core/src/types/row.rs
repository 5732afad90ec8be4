//! Serialized (string-cell) form of a vendor record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::record::{DATE_FORMAT, MAX_YEARS_IN_BUSINESS, PRODUCT_SEPARATOR};
use crate::types::{BusinessType, Product, VendorRecord};
use crate::{Error, Result};

/// Worksheet column headers, in storage order.
pub const COLUMNS: [&str; 6] = [
    "CompanyName",
    "BusinessType",
    "Products",
    "YearsInBusiness",
    "OnboardingDate",
    "AdditionalInfo",
];

/// One worksheet row as stored: six string cells.
///
/// Rows read from the store stay in this form so that hand-edited cells
/// never make a read fail. Use [`VendorRow::to_record`] to get typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VendorRow {
    /// `CompanyName` cell
    pub company_name: String,
    /// `BusinessType` cell
    pub business_type: String,
    /// `Products` cell, comma-joined
    pub products: String,
    /// `YearsInBusiness` cell
    pub years_in_business: String,
    /// `OnboardingDate` cell, `YYYY-MM-DD`
    pub onboarding_date: String,
    /// `AdditionalInfo` cell
    pub additional_info: String,
}

impl VendorRow {
    /// Build a row from positional cells; missing trailing cells are empty.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| {
            cells
                .get(i)
                .map(|c| c.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            company_name: cell(0),
            business_type: cell(1),
            products: cell(2),
            years_in_business: cell(3),
            onboarding_date: cell(4),
            additional_info: cell(5),
        }
    }

    /// Cells in column order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.company_name.clone(),
            self.business_type.clone(),
            self.products.clone(),
            self.years_in_business.clone(),
            self.onboarding_date.clone(),
            self.additional_info.clone(),
        ]
    }

    /// True when every cell is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.to_cells().iter().all(|c| c.trim().is_empty())
    }

    /// Decode into a typed record. `index` is only used for error messages.
    pub fn to_record(&self, index: usize) -> Result<VendorRecord> {
        let business_type = self
            .business_type
            .trim()
            .parse::<BusinessType>()
            .map_err(|_| {
                Error::decode(
                    index,
                    format!("unknown business type '{}'", self.business_type),
                )
            })?;

        let products = if self.products.trim().is_empty() {
            Vec::new()
        } else {
            self.products
                .split(PRODUCT_SEPARATOR.trim())
                .map(|p| {
                    let p = p.trim();
                    p.parse::<Product>()
                        .map_err(|_| Error::decode(index, format!("unknown product '{p}'")))
                })
                .collect::<Result<Vec<_>>>()?
        };

        let years_in_business = parse_years(&self.years_in_business).ok_or_else(|| {
            Error::decode(
                index,
                format!("invalid years in business '{}'", self.years_in_business),
            )
        })?;

        let onboarding_date = NaiveDate::parse_from_str(self.onboarding_date.trim(), DATE_FORMAT)
            .map_err(|e| {
                Error::decode(
                    index,
                    format!("invalid onboarding date '{}': {e}", self.onboarding_date),
                )
            })?;

        Ok(VendorRecord {
            company_name: self.company_name.clone(),
            business_type,
            products,
            years_in_business,
            onboarding_date,
            additional_info: self.additional_info.clone(),
        })
    }
}

/// Spreadsheets hand integers back as "5" or, after a float round trip, "5.0".
fn parse_years(cell: &str) -> Option<u8> {
    let cell = cell.trim();
    let years = match cell.parse::<u8>() {
        Ok(y) => y,
        Err(_) => {
            let f = cell.parse::<f64>().ok()?;
            if f.fract() != 0.0 || !(0.0..=f64::from(MAX_YEARS_IN_BUSINESS)).contains(&f) {
                return None;
            }
            f as u8
        }
    };
    (years <= MAX_YEARS_IN_BUSINESS).then_some(years)
}
