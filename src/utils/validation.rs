//! Validation utilities

use crate::tax::states::state_name;
use crate::types::*;

/// Validate the shape of a GSTIN
///
/// Checks length, a known state code prefix and uppercase alphanumerics.
/// The checksum character is not verified.
pub fn validate_gstin(gstin: &str) -> MapperResult<()> {
    if gstin.trim().is_empty() {
        return Err(MapperError::Validation("GSTIN cannot be empty".to_string()));
    }

    if gstin.len() != 15 {
        return Err(MapperError::Validation(format!(
            "GSTIN '{gstin}' must be 15 characters long"
        )));
    }

    if !gstin
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(MapperError::Validation(format!(
            "GSTIN '{gstin}' can only contain uppercase letters and digits"
        )));
    }

    if state_name(&gstin[..2]).is_none() {
        return Err(MapperError::Validation(format!(
            "GSTIN '{gstin}' has an invalid state code"
        )));
    }

    Ok(())
}

/// Validate an HSN or SAC code (4 to 8 digits)
pub fn validate_hsn_code(hsn_code: &str) -> MapperResult<()> {
    if !(4..=8).contains(&hsn_code.len()) {
        return Err(MapperError::Validation(format!(
            "HSN code '{hsn_code}' must have 4 to 8 digits"
        )));
    }

    if !hsn_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(MapperError::Validation(format!(
            "HSN code '{hsn_code}' can only contain digits"
        )));
    }

    Ok(())
}

/// Validate a return period; GST returns start from July 2017
pub fn validate_return_period(month: u32, year: i32) -> MapperResult<()> {
    if !(1..=12).contains(&month) {
        return Err(MapperError::Validation(format!(
            "Month must be between 1 and 12, got {month}"
        )));
    }

    if year < 2017 || (year == 2017 && month < 7) {
        return Err(MapperError::Validation(format!(
            "Return period {month:02}{year} is before GST came into effect"
        )));
    }

    Ok(())
}
