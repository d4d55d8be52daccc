//! Supplies through e-commerce operators (table 14)

use serde_json::Value;
use tracing::warn;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::*;

static SUPECOM_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::EcommerceGstin, Field::EcommerceGstin),
    (GovField::NetTaxableValue, Field::TotalTaxableValue),
    (GovField::SupecomIgst, Field::IgstAmount),
    (GovField::SupecomCgst, Field::CgstAmount),
    (GovField::SupecomSgst, Field::SgstAmount),
    (GovField::SupecomCess, Field::CessAmount),
]);

const SUPECOM_SECTIONS: [(GovField, GstrSubCategory); 2] = [
    (GovField::Tcs, GstrSubCategory::SupecomTcs),
    (GovField::PayableRcm, GstrSubCategory::SupecomRcm),
];

/// Mapper for the `supeco` section
#[derive(Debug, Default)]
pub struct Supecom;

impl Supecom {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for Supecom {
    fn fields(&self) -> &'static FieldMap {
        &SUPECOM_FIELDS
    }
}

impl CategoryMapper for Supecom {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for (section, rows) in as_object(input, "supeco")? {
            let Some((section, sub_category)) = SUPECOM_SECTIONS
                .iter()
                .find(|(key, _)| key.as_str() == section.as_str())
                .copied()
            else {
                warn!("Skipping unknown e-commerce section '{}'", section);
                continue;
            };

            let defaults = Record::new().with(Field::DocumentType, sub_category.label());
            for row in as_array(rows, section.as_str())? {
                let row = as_object(row, section.as_str())?;
                let record = self.format_for_internal(row, defaults.clone())?;

                let key = record.text(Field::EcommerceGstin).unwrap_or_default().to_string();
                output.insert(sub_category, key, record);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let mut output = GovObject::new();

        for (document_type, rows) in group_by_text(records, Field::DocumentType) {
            let section = SUPECOM_SECTIONS
                .iter()
                .find(|(_, sub)| sub.label() == document_type)
                .map(|(section, _)| section.as_str().to_string())
                .unwrap_or(document_type);
            let rows = rows
                .into_iter()
                .map(|row| Ok(Value::Object(self.format_for_gov(row, GovObject::new())?)))
                .collect::<MapperResult<Vec<_>>>()?;
            output.insert(section, Value::Array(rows));
        }

        Ok(Value::Object(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn gov_data() -> Value {
        json!({
            "clttx": [
                {"etin": "20ALYPD6528PQC5", "suppval": 10000, "igst": 1000, "cgst": 0, "sgst": 0, "cess": 0}
            ],
            "paytx": [
                {"etin": "20ALYPD6528PQC5", "suppval": 10000, "igst": 1000, "cgst": 0, "sgst": 0, "cess": 0}
            ]
        })
    }

    #[test]
    fn test_convert_to_internal() {
        let output = Supecom::new().to_internal(&gov_data()).unwrap();

        let tcs = output.records(GstrSubCategory::SupecomTcs).next().unwrap();
        assert_eq!(
            tcs.text(Field::DocumentType),
            Some("TCS collected by E-commerce Operator u/s 52")
        );
        assert_eq!(tcs.amount(Field::TotalTaxableValue), Some(&BigDecimal::from(10000)));
        assert_eq!(tcs.amount(Field::IgstAmount), Some(&BigDecimal::from(1000)));
        assert!(output.contains_key(GstrSubCategory::SupecomRcm, "20ALYPD6528PQC5"));
    }

    #[test]
    fn test_convert_to_gov_round_trip() {
        let internal = Supecom::new().to_internal(&gov_data()).unwrap();
        let records: Vec<Record> = internal
            .records(GstrSubCategory::SupecomTcs)
            .chain(internal.records(GstrSubCategory::SupecomRcm))
            .cloned()
            .collect();

        assert_eq!(Supecom::new().to_gov(&records).unwrap(), gov_data());
    }
}
