//! HSN-wise summary of outward supplies (table 12)
//!
//! The portal sends `{"hsn_b2b": [...], "hsn_b2c": [...]}` (or the older
//! `{"data": [...]}`); error responses come as a list of such objects, each
//! with its own error code and message.

use bigdecimal::BigDecimal;
use serde_json::Value;
use std::collections::HashMap;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::tax::gst::rate_key;
use crate::tax::uom::map_uom;
use crate::types::*;

/// Longest description the portal accepts
pub const HSN_DESCRIPTION_LIMIT: usize = 30;

static HSN_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::HsnCode, Field::HsnCode),
    (GovField::Description, Field::Description),
    (GovField::Uom, Field::Uom),
    (GovField::Quantity, Field::Quantity),
    (GovField::TaxableValue, Field::TotalTaxableValue),
    (GovField::Igst, Field::TotalIgstAmount),
    (GovField::Cgst, Field::TotalCgstAmount),
    (GovField::Sgst, Field::TotalSgstAmount),
    (GovField::Cess, Field::TotalCessAmount),
    (GovField::TaxRate, Field::TaxRate),
]);

const HSN_SECTIONS: [(GovField, GstrSubCategory); 3] = [
    (GovField::HsnB2b, GstrSubCategory::HsnB2b),
    (GovField::HsnB2c, GstrSubCategory::HsnB2c),
    (GovField::HsnData, GstrSubCategory::Hsn),
];

fn section_for(sub_category: GstrSubCategory) -> GovField {
    HSN_SECTIONS
        .iter()
        .find(|(_, sub)| *sub == sub_category)
        .map(|(section, _)| *section)
        .unwrap_or(GovField::HsnData)
}

/// Key of an HSN row: `"{hsn} - {uom label} - {rate}"`
pub fn hsn_key(hsn_code: &str, uom: &str, rate: &BigDecimal) -> String {
    format!("{} - {} - {}", hsn_code, map_uom(uom, None), rate_key(rate))
}

/// Mapper for the `hsn` section
#[derive(Debug)]
pub struct HsnSummary {
    description_limit: usize,
}

impl Default for HsnSummary {
    fn default() -> Self {
        Self {
            description_limit: HSN_DESCRIPTION_LIMIT,
        }
    }
}

impl HsnSummary {
    pub fn new(context: &MapperContext<'_>) -> Self {
        Self {
            description_limit: context.hsn_description_limit.unwrap_or(HSN_DESCRIPTION_LIMIT),
        }
    }

    fn format_row(&self, row: &GovObject, defaults: Record) -> MapperResult<Record> {
        let mut record = self.format_for_internal(row, defaults)?;

        let document_value: BigDecimal = Field::TOTAL_AMOUNTS
            .iter()
            .map(|field| record.amount_or_zero(*field))
            .sum();
        record.insert(Field::DocumentValue, document_value);

        let message = record
            .text(Field::ErrorMessage)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .zip(record.text(Field::HsnCode))
            .map(|(message, hsn_code)| format!("HSN Code: {hsn_code} - {message}"));
        if let Some(message) = message {
            record.insert(Field::ErrorMessage, message);
        }

        Ok(record)
    }
}

impl RecordMapper for HsnSummary {
    fn fields(&self) -> &'static FieldMap {
        &HSN_FIELDS
    }

    fn value_for_internal(&self, key: GovField, value: &Value) -> MapperResult<Option<FieldValue>> {
        match (key, value) {
            (GovField::Uom, Value::String(uom)) => Ok(Some(FieldValue::Text(map_uom(uom, None)))),
            _ => internal_value(self, key, value),
        }
    }

    fn value_for_gov(
        &self,
        key: GovField,
        value: &FieldValue,
        record: &Record,
    ) -> MapperResult<Option<Value>> {
        match (key, value) {
            (GovField::Uom, FieldValue::Text(uom)) => {
                Ok(Some(Value::from(map_uom(uom, record.text(Field::HsnCode)))))
            }
            (GovField::Description, FieldValue::Text(description)) => Ok(Some(Value::from(
                description
                    .chars()
                    .take(self.description_limit)
                    .collect::<String>(),
            ))),
            _ => gov_value(self, key, value, record),
        }
    }
}

impl CategoryMapper for HsnSummary {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();
        let chunks = match input {
            Value::Array(chunks) => chunks.iter().collect::<Vec<_>>(),
            other => vec![other],
        };

        for chunk in chunks {
            let chunk = as_object(chunk, "hsn")?;
            let defaults = error_defaults(chunk);

            for (section, sub_category) in HSN_SECTIONS {
                let mut section_defaults = defaults.clone();
                section_defaults.insert(Field::DocumentType, sub_category.label());

                for row in array_field(chunk, section)? {
                    let row = as_object(row, section.as_str())?;
                    let record = self.format_row(row, section_defaults.clone())?;

                    let key = hsn_key(
                        &text_field(row, GovField::HsnCode).unwrap_or_default(),
                        &text_field(row, GovField::Uom).unwrap_or_default(),
                        &record.amount_or_zero(Field::TaxRate),
                    );
                    output.insert(sub_category, key, record);
                }
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let mut sections: Vec<(GovField, Vec<Value>)> = Vec::new();
        let mut index: HashMap<GovField, usize> = HashMap::new();

        for record in records {
            let section = record
                .text(Field::DocumentType)
                .and_then(GstrSubCategory::from_label)
                .map(section_for)
                .unwrap_or(GovField::HsnData);

            let num = index.entry(section).or_default();
            *num += 1;
            let mut defaults = GovObject::new();
            defaults.insert(GovField::Index.as_str().to_string(), Value::from(*num));
            let row = Value::Object(self.format_for_gov(record, defaults)?);

            match sections.iter_mut().find(|(existing, _)| *existing == section) {
                Some((_, rows)) => rows.push(row),
                None => sections.push((section, vec![row])),
            }
        }

        let output = sections
            .into_iter()
            .map(|(section, rows)| (section.as_str().to_string(), Value::Array(rows)))
            .collect::<GovObject>();
        Ok(Value::Object(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn gov_data() -> Value {
        json!({
            "hsn_b2b": [
                {
                    "num": 1,
                    "hsn_sc": "1010",
                    "desc": "Goods Description",
                    "uqc": "KGS",
                    "qty": 2.05,
                    "txval": 10.23,
                    "iamt": 14.52,
                    "csamt": 500,
                    "rt": 0.1
                }
            ],
            "hsn_b2c": [
                {
                    "num": 1,
                    "hsn_sc": "1011",
                    "desc": "Goods Description",
                    "uqc": "NOS",
                    "qty": 2.05,
                    "txval": 10.23,
                    "iamt": 14.52,
                    "csamt": 500,
                    "rt": 5
                }
            ]
        })
    }

    #[test]
    fn test_convert_to_internal() {
        let context = MapperContext::default();
        let output = HsnSummary::new(&context).to_internal(&gov_data()).unwrap();

        let rows = output.get(GstrSubCategory::HsnB2b).unwrap();
        let row = &rows["1010 - KGS-KILOGRAMS - 0.1"].records()[0];
        assert_eq!(row.text(Field::Uom), Some("KGS-KILOGRAMS"));
        assert_eq!(row.text(Field::DocumentType), Some("HSN Summary - B2B"));
        assert_eq!(row.amount(Field::DocumentValue), Some(&dec("524.75")));

        assert!(output.contains_key(GstrSubCategory::HsnB2c, "1011 - NOS-NUMBERS - 5.0"));
    }

    #[test]
    fn test_convert_to_gov_round_trip() {
        let context = MapperContext::default();
        let mapper = HsnSummary::new(&context);
        let internal = mapper.to_internal(&gov_data()).unwrap();
        let records: Vec<Record> = internal
            .records(GstrSubCategory::HsnB2b)
            .chain(internal.records(GstrSubCategory::HsnB2c))
            .cloned()
            .collect();

        assert_eq!(mapper.to_gov(&records).unwrap(), gov_data());
    }

    #[test]
    fn test_error_chunks_prefix_messages() {
        let data = json!([
            {
                "error_cd": "RET191175",
                "error_msg": "Invalid rate",
                "hsn_b2c": [{"hsn_sc": "1011", "uqc": "NOS", "txval": 10, "rt": 7}]
            }
        ]);
        let context = MapperContext::default();
        let output = HsnSummary::new(&context).to_internal(&data).unwrap();
        let row = output.records(GstrSubCategory::HsnB2c).next().unwrap();

        assert_eq!(row.text(Field::ErrorCode), Some("RET191175"));
        assert_eq!(row.text(Field::ErrorMessage), Some("HSN Code: 1011 - Invalid rate"));
    }

    #[test]
    fn test_gov_output_truncates_description_and_reduces_uom() {
        let record = Record::new()
            .with(Field::HsnCode, "998311")
            .with(Field::Description, "Management consulting and other services")
            .with(Field::Uom, "NOS-NUMBERS")
            .with(Field::TotalTaxableValue, 100);
        let context = MapperContext::default();
        let output = HsnSummary::new(&context).to_gov(&[record]).unwrap();

        assert_eq!(
            output,
            json!({
                "data": [
                    {
                        "num": 1,
                        "hsn_sc": "998311",
                        "desc": "Management consulting and othe",
                        "uqc": "NA",
                        "txval": 100
                    }
                ]
            })
        );
    }
}
