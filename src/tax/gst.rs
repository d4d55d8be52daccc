//! GST supply type and tax split helpers shared by the mappers

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::tax::states::{gstin_state_code, place_of_supply_code};

/// Whether a supply stays within the supplier's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupplyType {
    /// CGST + SGST
    Intra,
    /// IGST
    Inter,
}

impl SupplyType {
    /// Supply type for a place of supply (code or label) and the supplier GSTIN
    pub fn between(place_of_supply: &str, company_gstin: &str) -> Self {
        let state = gstin_state_code(company_gstin);
        if !state.is_empty() && place_of_supply_code(place_of_supply) == state {
            SupplyType::Intra
        } else {
            SupplyType::Inter
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            SupplyType::Intra => "INTRA",
            SupplyType::Inter => "INTER",
        }
    }
}

/// Tax amount broken into its GST components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSplit {
    pub igst_amount: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
}

impl TaxSplit {
    /// Intra-state split, half CGST and half SGST
    pub fn intra_state(tax_amount: &BigDecimal) -> Self {
        let half = tax_amount / BigDecimal::from(2);
        Self {
            igst_amount: BigDecimal::zero(),
            cgst_amount: half.clone(),
            sgst_amount: half,
        }
    }

    /// Inter-state split, all IGST
    pub fn inter_state(tax_amount: &BigDecimal) -> Self {
        Self {
            igst_amount: tax_amount.clone(),
            cgst_amount: BigDecimal::zero(),
            sgst_amount: BigDecimal::zero(),
        }
    }

    pub fn for_supply(tax_amount: &BigDecimal, supply_type: SupplyType) -> Self {
        match supply_type {
            SupplyType::Intra => Self::intra_state(tax_amount),
            SupplyType::Inter => Self::inter_state(tax_amount),
        }
    }

    pub fn total(&self) -> BigDecimal {
        &self.igst_amount + &self.cgst_amount + &self.sgst_amount
    }
}

/// Whole-number tax rate implied by a tax amount on a taxable value
///
/// Returns zero for a zero taxable value.
pub fn effective_rate(tax_amount: &BigDecimal, taxable_value: &BigDecimal) -> BigDecimal {
    if taxable_value.is_zero() {
        return BigDecimal::zero();
    }
    (tax_amount * BigDecimal::from(100) / taxable_value).round(0)
}

/// Rate as it appears in composite keys: `5` is `"5.0"`, `0.10` is `"0.1"`
pub fn rate_key(rate: &BigDecimal) -> String {
    if rate.is_integer() {
        format!("{}.0", rate.with_scale(0))
    } else {
        rate.normalized().to_string()
    }
}

/// Key of a place-of-supply and rate bucket, e.g. `"05-Uttarakhand - 5.0"`
pub fn pos_rate_key(place_of_supply: &str, rate: &BigDecimal) -> String {
    format!("{place_of_supply} - {}", rate_key(rate))
}
