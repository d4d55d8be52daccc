//! Rounding bookkeeping for books data
//!
//! Every rounded amount leaves a sub-unit difference behind. The ledger keeps
//! the sum of those differences per field, and the rounded invoice totals per
//! HSN subcategory so the HSN summary can be made to agree with them.

use bigdecimal::{BigDecimal, Zero};
use std::collections::{BTreeMap, HashMap};

use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::{Field, Record, SubCategoryRows};

/// Round to `precision` decimal places
pub fn round_amount(amount: &BigDecimal, precision: i64) -> BigDecimal {
    amount.round(precision)
}

/// Running rounding differences and invoice totals of one books run
#[derive(Debug, Default)]
pub struct RoundingLedger {
    differences: BTreeMap<Field, BigDecimal>,
    invoice_totals: HashMap<GstrSubCategory, BTreeMap<Field, BigDecimal>>,
}

impl RoundingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round an amount and book `amount - rounded` against `field`
    pub fn round(&mut self, field: Field, amount: &BigDecimal, precision: i64) -> BigDecimal {
        let rounded = round_amount(amount, precision);
        *self.differences.entry(field).or_default() += amount - &rounded;
        rounded
    }

    /// Add a rounded invoice level total for an HSN subcategory
    pub fn add_invoice_total(&mut self, hsn_sub_category: GstrSubCategory, field: Field, amount: &BigDecimal) {
        *self
            .invoice_totals
            .entry(hsn_sub_category)
            .or_default()
            .entry(field)
            .or_default() += amount;
    }

    pub fn invoice_totals(&self, hsn_sub_category: GstrSubCategory) -> Option<&BTreeMap<Field, BigDecimal>> {
        self.invoice_totals.get(&hsn_sub_category)
    }

    pub fn difference(&self, field: Field) -> BigDecimal {
        self.differences.get(&field).cloned().unwrap_or_default()
    }

    /// Accumulated differences, rounded to the currency precision if any
    pub fn rounding_difference(&self, currency_precision: Option<i64>) -> Record {
        self.differences
            .iter()
            .map(|(field, difference)| {
                let difference = match currency_precision {
                    Some(precision) => round_amount(difference, precision),
                    None => difference.clone(),
                };
                (*field, difference.into())
            })
            .collect()
    }

    /// Push the gap between invoice totals and HSN rows into one HSN row per field
    ///
    /// Rows are ordered by descending taxable value (ties keep key order) and
    /// the whole residual goes to the first row holding a nonzero amount for
    /// the field.
    pub fn adjust_hsn_totals(
        &self,
        hsn_sub_category: GstrSubCategory,
        rows: &mut SubCategoryRows,
        precision: i64,
    ) {
        let Some(expected) = self.invoice_totals(hsn_sub_category) else {
            return;
        };

        let mut ordered: Vec<&mut Record> = rows
            .values_mut()
            .flat_map(|entry| entry.records_mut().iter_mut())
            .collect();
        ordered.sort_by(|a, b| {
            b.amount_or_zero(Field::TotalTaxableValue)
                .cmp(&a.amount_or_zero(Field::TotalTaxableValue))
        });

        for (field, expected_total) in expected {
            let reported: BigDecimal = ordered.iter().map(|row| row.amount_or_zero(*field)).sum();
            let residual = expected_total - reported;
            if residual.is_zero() {
                continue;
            }

            if let Some(row) = ordered.iter_mut().find(|row| !row.amount_or_zero(*field).is_zero()) {
                let adjusted = round_amount(&(row.amount_or_zero(*field) + &residual), precision);
                row.insert(*field, adjusted);
            }
        }
    }
}
