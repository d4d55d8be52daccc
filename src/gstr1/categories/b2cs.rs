//! B2C small supplies (table 7)
//!
//! Government rows carry no invoice detail, only a place of supply and rate
//! bucket: `[{sply_ty, pos, typ, rt, txval, iamt, camt, samt, csamt}]`.
//! Internally rows are grouped under `"{pos} - {rate}"`.

use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::tax::gst::{pos_rate_key, SupplyType};
use crate::types::*;

static B2CS_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::TaxableValue, Field::TotalTaxableValue),
    (GovField::Type, Field::DocumentType),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Pos, Field::PlaceOfSupply),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::Igst, Field::TotalIgstAmount),
    (GovField::Cgst, Field::TotalCgstAmount),
    (GovField::Sgst, Field::TotalSgstAmount),
    (GovField::Cess, Field::TotalCessAmount),
    (GovField::ErrorCode, Field::ErrorCode),
    (GovField::ErrorMessage, Field::ErrorMessage),
]);

/// Mapper for the `b2cs` section
#[derive(Debug)]
pub struct B2cs<'a> {
    company_gstin: &'a str,
}

impl<'a> B2cs<'a> {
    pub fn new(context: &MapperContext<'a>) -> Self {
        Self {
            company_gstin: context.company_gstin,
        }
    }
}

impl RecordMapper for B2cs<'_> {
    fn fields(&self) -> &'static FieldMap {
        &B2CS_FIELDS
    }
}

impl CategoryMapper for B2cs<'_> {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for row in as_array(input, "b2cs")? {
            let row = as_object(row, "b2cs")?;
            let record = self.format_for_internal(row, Record::new())?;

            let key = pos_rate_key(
                record.text(Field::PlaceOfSupply).unwrap_or_default(),
                &record.amount_or_zero(Field::TaxRate),
            );
            output.push(GstrSubCategory::B2cs, key, record);
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let rows = records
            .iter()
            .map(|record| {
                let mut row = self.format_for_gov(record, GovObject::new())?;
                let pos = record.text(Field::PlaceOfSupply).unwrap_or_default();
                let supply_type = SupplyType::between(pos, self.company_gstin);
                row.insert(
                    GovField::SupplyType.as_str().to_string(),
                    Value::from(supply_type.as_code()),
                );
                Ok(Value::Object(row))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(rows))
    }
}
