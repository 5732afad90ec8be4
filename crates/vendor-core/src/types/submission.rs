//! Decoded vendor form input.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::record::{DEFAULT_YEARS_IN_BUSINESS, MAX_YEARS_IN_BUSINESS};
use crate::types::{BusinessType, Product, VendorRecord};

/// What the user entered in the vendor form.
///
/// Required fields may still be empty here; [`crate::validate`] decides
/// whether the submission is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Company name as typed
    #[serde(default)]
    pub company_name: String,

    /// Selected business type, if any
    #[serde(default)]
    pub business_type: Option<BusinessType>,

    /// Selected products, in selection order
    #[serde(default)]
    pub products: Vec<Product>,

    /// Years in business, `0..=50`
    #[serde(
        default = "default_years",
        deserialize_with = "deserialize_years"
    )]
    pub years_in_business: u8,

    /// Onboarding date, defaults to today
    #[serde(default = "today")]
    pub onboarding_date: NaiveDate,

    /// Free-form notes
    #[serde(default)]
    pub additional_info: String,
}

impl FormSubmission {
    /// Creates a submission with form defaults for everything but the name and date.
    pub fn new(company_name: impl Into<String>, onboarding_date: NaiveDate) -> Self {
        Self {
            company_name: company_name.into(),
            business_type: None,
            products: Vec::new(),
            years_in_business: DEFAULT_YEARS_IN_BUSINESS,
            onboarding_date,
            additional_info: String::new(),
        }
    }

    /// Sets the business type.
    pub fn with_business_type(mut self, business_type: BusinessType) -> Self {
        self.business_type = Some(business_type);
        self
    }

    /// Sets the selected products.
    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.products = products.into_iter().collect();
        self
    }

    /// Sets years in business, clamped to the slider range.
    pub fn with_years(mut self, years: u8) -> Self {
        self.years_in_business = years.min(MAX_YEARS_IN_BUSINESS);
        self
    }

    /// Sets the notes field.
    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    /// Build the record this submission describes.
    ///
    /// Returns `None` when the business type is unset. Duplicate product
    /// selections collapse to their first occurrence.
    pub fn to_record(&self) -> Option<VendorRecord> {
        let business_type = self.business_type?;
        let mut products = Vec::with_capacity(self.products.len());
        for p in &self.products {
            if !products.contains(p) {
                products.push(*p);
            }
        }
        Some(VendorRecord {
            company_name: self.company_name.clone(),
            business_type,
            products,
            years_in_business: self.years_in_business,
            onboarding_date: self.onboarding_date,
            additional_info: self.additional_info.clone(),
        })
    }
}

fn default_years() -> u8 {
    DEFAULT_YEARS_IN_BUSINESS
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn deserialize_years<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let years = u8::deserialize(deserializer)?;
    if years > MAX_YEARS_IN_BUSINESS {
        return Err(serde::de::Error::custom(format!(
            "years_in_business must be at most {MAX_YEARS_IN_BUSINESS}, got {years}"
        )));
    }
    Ok(years)
}
