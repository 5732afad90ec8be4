//! Typed vendor record and its enumerated fields.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::VendorRow;
use crate::{Error, Result};

/// Upper bound of the years-in-business slider.
pub const MAX_YEARS_IN_BUSINESS: u8 = 50;

/// Slider position when the form is first rendered.
pub const DEFAULT_YEARS_IN_BUSINESS: u8 = 5;

/// Serialized onboarding date format (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator used to join selected products into one cell.
pub const PRODUCT_SEPARATOR: &str = ", ";

/// Kind of business a vendor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    /// Makes goods
    Manufacturer,
    /// Moves goods between makers and sellers
    Distributor,
    /// Sells in bulk
    Wholesaler,
    /// Sells to end customers
    Retailer,
    /// Sells services rather than goods
    #[serde(rename = "Service Provider")]
    ServiceProvider,
}

impl BusinessType {
    /// All business types, in form display order.
    pub const ALL: [BusinessType; 5] = [
        BusinessType::Manufacturer,
        BusinessType::Distributor,
        BusinessType::Wholesaler,
        BusinessType::Retailer,
        BusinessType::ServiceProvider,
    ];

    /// Label shown in the form and stored in the worksheet.
    pub fn label(self) -> &'static str {
        match self {
            BusinessType::Manufacturer => "Manufacturer",
            BusinessType::Distributor => "Distributor",
            BusinessType::Wholesaler => "Wholesaler",
            BusinessType::Retailer => "Retailer",
            BusinessType::ServiceProvider => "Service Provider",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BusinessType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.label() == s)
            .ok_or_else(|| Error::invalid_field("business_type", s))
    }
}

/// Product category a vendor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    /// Electronics
    Electronics,
    /// Apparel
    Apparel,
    /// Groceries
    Groceries,
    /// Software
    Software,
    /// Anything else
    Other,
}

impl Product {
    /// All products, in form display order.
    pub const ALL: [Product; 5] = [
        Product::Electronics,
        Product::Apparel,
        Product::Groceries,
        Product::Software,
        Product::Other,
    ];

    /// Label shown in the form and stored in the worksheet.
    pub fn label(self) -> &'static str {
        match self {
            Product::Electronics => "Electronics",
            Product::Apparel => "Apparel",
            Product::Groceries => "Groceries",
            Product::Software => "Software",
            Product::Other => "Other",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Product {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| Error::invalid_field("products", s))
    }
}

/// Join products into the single-cell representation, preserving order.
pub fn join_products(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(PRODUCT_SEPARATOR)
}

/// One vendor, fully typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    /// Company name (unique within the table)
    pub company_name: String,
    /// Kind of business
    pub business_type: BusinessType,
    /// Products offered, in selection order
    pub products: Vec<Product>,
    /// Years in business, `0..=50`
    pub years_in_business: u8,
    /// Date the vendor was onboarded
    pub onboarding_date: NaiveDate,
    /// Free-form notes
    pub additional_info: String,
}

impl VendorRecord {
    /// Serialize into the string cells stored in the worksheet.
    pub fn to_row(&self) -> VendorRow {
        VendorRow {
            company_name: self.company_name.clone(),
            business_type: self.business_type.label().to_string(),
            products: join_products(&self.products),
            years_in_business: self.years_in_business.to_string(),
            onboarding_date: self.onboarding_date.format(DATE_FORMAT).to_string(),
            additional_info: self.additional_info.clone(),
        }
    }
}
