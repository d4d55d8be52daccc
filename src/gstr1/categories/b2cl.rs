//! B2C large invoices (table 5)
//!
//! Government shape: `[{pos, inv: [{inum, idt, val, itms}]}]`.

use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::tax::states::{place_of_supply_code, place_of_supply_label};
use crate::types::*;

static B2CL_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::DocNumber, Field::DocumentNumber),
    (GovField::DocDate, Field::DocumentDate),
    (GovField::DocValue, Field::DocumentValue),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Items, Field::Items),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::TaxableValue, Field::TaxableValue),
    (GovField::Igst, Field::IgstAmount),
    (GovField::Cess, Field::CessAmount),
]);

static B2CL_ITEM_AMOUNTS: [Field; 3] = [Field::TaxableValue, Field::IgstAmount, Field::CessAmount];

/// Mapper for the `b2cl` section
#[derive(Debug, Default)]
pub struct B2cl;

impl B2cl {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for B2cl {
    fn fields(&self) -> &'static FieldMap {
        &B2CL_FIELDS
    }

    fn item_defaults(&self) -> &'static [Field] {
        &B2CL_ITEM_AMOUNTS
    }
}

impl CategoryMapper for B2cl {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for group in as_array(input, "b2cl")? {
            let group = as_object(group, "b2cl")?;
            let pos = text_field(group, GovField::Pos).unwrap_or_default();

            let mut defaults = error_defaults(group);
            defaults.insert(Field::PlaceOfSupply, place_of_supply_label(&pos));
            defaults.insert(Field::DocumentType, GstrSubCategory::B2cl.label());

            for invoice in array_field(group, GovField::Invoices)? {
                let invoice = as_object(invoice, GovField::Invoices.as_str())?;
                let mut record = self.format_for_internal(invoice, defaults.clone())?;
                update_totals(&mut record);

                let key = record.text(Field::DocumentNumber).unwrap_or_default().to_string();
                output.insert(GstrSubCategory::B2cl, key, record);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let groups = group_by_text(records, Field::PlaceOfSupply)
            .into_iter()
            .map(|(pos, invoices)| {
                let invoices = invoices
                    .into_iter()
                    .map(|invoice| Ok(Value::Object(self.format_for_gov(invoice, GovObject::new())?)))
                    .collect::<MapperResult<Vec<_>>>()?;
                Ok(group_object(
                    GovField::Pos,
                    Value::from(place_of_supply_code(&pos)),
                    GovField::Invoices,
                    invoices,
                ))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(groups))
    }
}
