//! Digest of the portal's return summary for display

use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;
use std::collections::HashMap;

use crate::gstr1::taxonomy::GstrCategory;
use crate::types::{Field, Record};

/// Amounts that decide whether a summary row is worth showing
const TOTAL_VALUE_FIELDS: [Field; 6] = [
    Field::NoOfRecords,
    Field::TotalIgstAmount,
    Field::TotalCgstAmount,
    Field::TotalSgstAmount,
    Field::TotalCessAmount,
    Field::TotalTaxableValue,
];

pub const AMENDMENT_LIABILITY: &str = "Net Liability from Amendments";

/// One line of the summarised return
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(flatten)]
    pub row: Record,
    /// 0 for categories, 1 for subcategories
    pub indent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consider_in_total_taxable_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consider_in_total_tax: Option<bool>,
}

fn total_value(row: &Record) -> BigDecimal {
    TOTAL_VALUE_FIELDS
        .iter()
        .map(|field| row.amount_or_zero(*field))
        .sum::<BigDecimal>()
        .round(2)
}

/// Category and subcategory rows of a return summary
///
/// Rows are matched on their description. Categories and subcategories whose
/// totals are all zero are left out, and the amended sections are rolled up
/// into a single "Net Liability from Amendments" row.
pub fn summarize_retsum_data(rows: &[Record]) -> Vec<SummaryRow> {
    if rows.is_empty() {
        return Vec::new();
    }

    let by_description: HashMap<&str, &Record> = rows
        .iter()
        .filter_map(|row| Some((row.text(Field::Description)?, row)))
        .collect();

    let mut output = Vec::new();
    let mut amended = Record::new();
    for field in TOTAL_VALUE_FIELDS {
        amended.insert(field, BigDecimal::zero());
    }

    for category in GstrCategory::ALL {
        let Some(category_row) = by_description.get(category.label()) else {
            continue;
        };

        if let Some(amended_row) = by_description.get(format!("{} (Amended)", category.label()).as_str()) {
            for field in TOTAL_VALUE_FIELDS {
                amended.add_amount(field, &amended_row.amount_or_zero(field));
            }
        }

        if total_value(category_row).is_zero() {
            continue;
        }

        output.push(SummaryRow {
            row: (*category_row).clone(),
            indent: 0,
            consider_in_total_taxable_value: None,
            consider_in_total_tax: None,
        });

        for sub_category in category.sub_categories() {
            let Some(sub_category_row) = by_description.get(sub_category.label()) else {
                continue;
            };
            if total_value(sub_category_row).is_zero() {
                continue;
            }

            output.push(SummaryRow {
                row: (*sub_category_row).clone(),
                indent: 1,
                consider_in_total_taxable_value: Some(sub_category.counts_in_total_taxable_value()),
                consider_in_total_tax: Some(sub_category.counts_in_total_tax()),
            });
        }
    }

    if !total_value(&amended).is_zero() {
        amended.insert(Field::Description, AMENDMENT_LIABILITY);
        amended.insert(Field::NoOfRecords, BigDecimal::zero());
        output.push(SummaryRow {
            row: amended,
            indent: 0,
            consider_in_total_taxable_value: Some(true),
            consider_in_total_tax: Some(true),
        });
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(description: &str, records: i64, taxable: i64, igst: i64) -> Record {
        Record::new()
            .with(Field::Description, description)
            .with(Field::NoOfRecords, records)
            .with(Field::TotalTaxableValue, taxable)
            .with(Field::TotalIgstAmount, igst)
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_retsum_data(&[]).is_empty());
    }

    #[test]
    fn test_rows_are_indented_and_flagged() {
        let rows = vec![
            row("B2B, SEZ, DE", 2, 1000, 180),
            row("B2B Regular", 1, 600, 108),
            row("B2B Reverse Charge", 1, 400, 72),
            row("SEZ With Payment of Tax", 0, 0, 0),
            row("B2C (Large)", 0, 0, 0),
        ];
        let summary = summarize_retsum_data(&rows);

        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].indent, 0);
        assert_eq!(summary[0].consider_in_total_tax, None);
        assert_eq!(summary[1].row.text(Field::Description), Some("B2B Regular"));
        assert_eq!(summary[1].consider_in_total_tax, Some(true));
        assert_eq!(summary[2].indent, 1);
        assert_eq!(summary[2].consider_in_total_taxable_value, Some(true));
        assert_eq!(summary[2].consider_in_total_tax, Some(false));
    }

    #[test]
    fn test_amendments_roll_up() {
        let rows = vec![
            row("B2C (Large)", 1, 100, 18),
            row("B2C (Large) (Amended)", 1, -50, -9),
            row("Exports", 1, 300, 0),
            row("Exports (Amended)", 2, 20, 0),
        ];
        let summary = summarize_retsum_data(&rows);
        let last = summary.last().unwrap();

        assert_eq!(last.row.text(Field::Description), Some(AMENDMENT_LIABILITY));
        assert_eq!(last.row.amount(Field::TotalTaxableValue), Some(&BigDecimal::from(-30)));
        assert_eq!(last.row.amount(Field::TotalIgstAmount), Some(&BigDecimal::from(-9)));
        assert_eq!(last.row.amount(Field::NoOfRecords), Some(&BigDecimal::zero()));
        assert_eq!(last.consider_in_total_tax, Some(true));
    }
}
