//! Configuration for GSTR-1 preparation

use serde::{Deserialize, Serialize};

use crate::types::{MapperError, MapperResult};
use crate::utils::validation::{validate_gstin, validate_return_period};

/// Precision settings used while preparing books data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gstr1Config {
    /// Decimal places for row level amounts.
    pub precision: i64,

    /// Decimal places for the reported rounding difference. `None` reports it unrounded.
    pub currency_precision: Option<i64>,

    /// Maximum HSN description length accepted by the portal.
    pub hsn_description_limit: usize,
}

impl Default for Gstr1Config {
    fn default() -> Self {
        Self {
            precision: 2,
            currency_precision: Some(2),
            hsn_description_limit: 30,
        }
    }
}

impl Gstr1Config {
    /// Load settings from JSON, missing keys fall back to defaults
    pub fn from_json(json: &str) -> MapperResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.precision < 0 {
            return Err(MapperError::Validation(format!(
                "Precision cannot be negative: {}",
                config.precision
            )));
        }
        Ok(config)
    }
}

/// How often the company files GSTR-1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingPreference {
    #[default]
    Monthly,
    Quarterly,
}

/// Company and period a return is prepared for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnFilters {
    pub company: String,
    pub company_gstin: String,
    pub year: i32,
    /// Calendar month, 1 to 12
    pub month: u32,
    #[serde(default)]
    pub filing_preference: FilingPreference,
}

impl ReturnFilters {
    pub fn new(company: &str, company_gstin: &str, year: i32, month: u32) -> Self {
        Self {
            company: company.to_string(),
            company_gstin: company_gstin.to_string(),
            year,
            month,
            filing_preference: FilingPreference::Monthly,
        }
    }

    pub fn quarterly(mut self) -> Self {
        self.filing_preference = FilingPreference::Quarterly;
        self
    }

    pub fn validate(&self) -> MapperResult<()> {
        validate_gstin(&self.company_gstin)?;
        validate_return_period(self.month, self.year)
    }

    /// Return period as used in return log names, e.g. `032024`
    pub fn period(&self) -> String {
        format!("{:02}{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config = Gstr1Config::from_json(r#"{"currency_precision": 3}"#).unwrap();
        assert_eq!(config.precision, 2);
        assert_eq!(config.currency_precision, Some(3));
        assert_eq!(config.hsn_description_limit, 30);
    }

    #[test]
    fn test_config_rejects_negative_precision() {
        assert!(Gstr1Config::from_json(r#"{"precision": -1}"#).is_err());
        assert!(Gstr1Config::from_json("not json").is_err());
    }

    #[test]
    fn test_filters_period() {
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 3).quarterly();
        assert_eq!(filters.period(), "032024");
        assert_eq!(filters.filing_preference, FilingPreference::Quarterly);
        assert!(filters.validate().is_ok());
    }
}
