//! Nil-rated, exempted and non-GST supplies (table 8)

use bigdecimal::{BigDecimal, Zero};
use serde_json::Value;
use tracing::debug;

use crate::gstr1::fields::{FieldMap, GovField, LabelMap};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::*;

static NIL_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::SupplyType, Field::DocumentType),
    (GovField::Exempted, Field::ExemptedAmount),
    (GovField::NilRated, Field::NilRatedAmount),
    (GovField::NonGst, Field::NonGstAmount),
]);

/// Supply type codes of nil-rated rows
pub static NIL_SUPPLY_TYPES: LabelMap = LabelMap::new(&[
    ("INTRB2B", "Inter-State supplies to registered persons"),
    ("INTRB2C", "Inter-State supplies to unregistered persons"),
    ("INTRAB2B", "Intra-State supplies to registered persons"),
    ("INTRAB2C", "Intra-State supplies to unregistered persons"),
]);

/// Mapper for the `nil` section
#[derive(Debug, Default)]
pub struct NilRated;

impl NilRated {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for NilRated {
    fn fields(&self) -> &'static FieldMap {
        &NIL_FIELDS
    }

    fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
        (key == GovField::SupplyType).then_some(&NIL_SUPPLY_TYPES)
    }
}

const NIL_AMOUNTS: [Field; 3] = [Field::ExemptedAmount, Field::NilRatedAmount, Field::NonGstAmount];

fn nil_total(record: &Record) -> BigDecimal {
    NIL_AMOUNTS.iter().map(|field| record.amount_or_zero(*field)).sum()
}

impl CategoryMapper for NilRated {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();
        let input = as_object(input, "nil")?;
        let defaults = error_defaults(input);

        for row in array_field(input, GovField::Invoices)? {
            let row = as_object(row, GovField::Invoices.as_str())?;
            let mut record = self.format_for_internal(row, defaults.clone())?;
            if NIL_AMOUNTS.iter().all(|field| record.amount_or_zero(*field).is_zero()) {
                debug!("Dropping nil-rated row without amounts");
                continue;
            }
            record.insert(Field::TotalTaxableValue, nil_total(&record));

            let key = record.text(Field::DocumentType).unwrap_or_default().to_string();
            output.push(GstrSubCategory::NilExempt, key, record);
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let rows = records
            .iter()
            .map(|record| Ok(Value::Object(self.format_for_gov(record, GovObject::new())?)))
            .collect::<MapperResult<Vec<_>>>()?;

        let mut output = GovObject::new();
        output.insert(GovField::Invoices.as_str().to_string(), Value::Array(rows));
        Ok(Value::Object(output))
    }
}
