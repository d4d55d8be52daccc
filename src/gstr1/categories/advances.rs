//! Advances received (table 11A) and advances adjusted (table 11B)
//!
//! Both sections share the shape `[{pos, sply_ty, itms: [{rt, ad_amt, iamt, ...}]}]`.
//! Internally every item becomes its own row under `"{pos} - {rate}"`, and
//! adjusted advances are stored negative.

use bigdecimal::BigDecimal;
use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::tax::gst::{pos_rate_key, SupplyType};
use crate::types::*;

static ADVANCE_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::Pos, Field::PlaceOfSupply),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Items, Field::Items),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::AdvanceAmount, Field::TotalTaxableValue),
    (GovField::Igst, Field::TotalIgstAmount),
    (GovField::Cgst, Field::TotalCgstAmount),
    (GovField::Sgst, Field::TotalSgstAmount),
    (GovField::Cess, Field::TotalCessAmount),
    (GovField::ErrorCode, Field::ErrorCode),
    (GovField::ErrorMessage, Field::ErrorMessage),
]);

/// Keys moved from the row into its item on government output
const ITEM_KEYS: [GovField; 6] = [
    GovField::Igst,
    GovField::Cess,
    GovField::Cgst,
    GovField::Sgst,
    GovField::AdvanceAmount,
    GovField::TaxRate,
];

/// Mapper for the `at` and `txpd` sections
#[derive(Debug)]
pub struct Advances<'a> {
    company_gstin: &'a str,
    sub_category: GstrSubCategory,
    multiplier: BigDecimal,
}

impl<'a> Advances<'a> {
    /// Advances received, stored as reported
    pub fn received(context: &MapperContext<'a>) -> Self {
        Self {
            company_gstin: context.company_gstin,
            sub_category: GstrSubCategory::At,
            multiplier: BigDecimal::from(1),
        }
    }

    /// Advances adjusted against invoices, stored negative
    pub fn adjusted(context: &MapperContext<'a>) -> Self {
        Self {
            company_gstin: context.company_gstin,
            sub_category: GstrSubCategory::Txp,
            multiplier: BigDecimal::from(-1),
        }
    }
}

impl RecordMapper for Advances<'_> {
    fn fields(&self) -> &'static FieldMap {
        &ADVANCE_FIELDS
    }

    fn item_defaults(&self) -> &'static [Field] {
        &Field::TOTAL_AMOUNTS
    }

    fn item_layout(&self) -> ItemLayout {
        ItemLayout::Flat
    }
}

impl CategoryMapper for Advances<'_> {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for row in as_array(input, self.sub_category.gov_key().as_str())? {
            let row = as_object(row, self.sub_category.gov_key().as_str())?;
            let mut record = self.format_for_internal(row, Record::new())?;
            let items = match record.remove(Field::Items) {
                Some(FieldValue::Items(items)) => items,
                _ => Vec::new(),
            };

            for mut item in items {
                item.scale_amounts(&Field::TOTAL_AMOUNTS, &self.multiplier);

                let mut item_row = record.clone();
                item_row.merge(item);

                let key = pos_rate_key(
                    item_row.text(Field::PlaceOfSupply).unwrap_or_default(),
                    &item_row.amount_or_zero(Field::TaxRate),
                );
                output.set_group(self.sub_category, key, vec![item_row]);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let mut groups: Vec<(String, GovObject)> = Vec::new();

        for record in records {
            let mut record = record.clone();
            record.scale_amounts(&Field::TOTAL_AMOUNTS, &self.multiplier);

            let mut row = self.format_for_gov(&record, GovObject::new())?;
            let item: GovObject = ITEM_KEYS
                .iter()
                .filter_map(|key| row.remove(key.as_str()).map(|value| (key.as_str().to_string(), value)))
                .collect();

            let pos = record.text(Field::PlaceOfSupply).unwrap_or_default().to_string();
            let supply_type = SupplyType::between(&pos, self.company_gstin);
            row.insert(
                GovField::SupplyType.as_str().to_string(),
                Value::from(supply_type.as_code()),
            );

            let index = match groups.iter().position(|(existing, _)| *existing == pos) {
                Some(index) => index,
                None => {
                    groups.push((pos, row));
                    groups.len() - 1
                }
            };
            let items = groups[index]
                .1
                .entry(GovField::Items.as_str())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = items {
                items.push(Value::Object(item));
            }
        }

        Ok(Value::Array(
            groups.into_iter().map(|(_, row)| Value::Object(row)).collect(),
        ))
    }
}
