//! Intake rules: validate a submission against the current table and append it.

use crate::types::{FormSubmission, VendorRecord, VendorTable};

/// Why a submission was rejected.
///
/// The display strings are the warnings shown on the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Company name is empty or business type is unset.
    #[error("Ensure all mandatory fields are filled.")]
    MissingRequiredField,

    /// An existing company name contains the submitted one.
    #[error("A vendor with this company name already exists.")]
    DuplicateVendor {
        /// The submitted company name
        company_name: String,
        /// The stored company name it collided with
        existing: String,
    },
}

/// Check a submission against the current table.
///
/// Duplicate detection is a case-sensitive substring test: "Acme" is rejected
/// when "Acme Corp" is already stored.
pub fn validate(
    submission: &FormSubmission,
    existing: &VendorTable,
) -> Result<(), ValidationError> {
    if submission.company_name.is_empty() || submission.business_type.is_none() {
        return Err(ValidationError::MissingRequiredField);
    }

    if let Some(found) = existing.company_containing(&submission.company_name) {
        log::debug!(
            "Rejecting '{}': collides with stored vendor '{found}'",
            submission.company_name
        );
        return Err(ValidationError::DuplicateVendor {
            company_name: submission.company_name.clone(),
            existing: found.to_string(),
        });
    }

    Ok(())
}

/// Validate and append one record, returning the new table and the record.
///
/// `existing` is left untouched; the new record is last in the result.
pub fn append_submission(
    submission: &FormSubmission,
    existing: &VendorTable,
) -> Result<(VendorTable, VendorRecord), ValidationError> {
    validate(submission, existing)?;
    let record = submission
        .to_record()
        .ok_or(ValidationError::MissingRequiredField)?;
    Ok((existing.appended(&record), record))
}
