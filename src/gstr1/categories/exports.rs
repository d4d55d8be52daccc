//! Export invoices (table 6A)
//!
//! Government shape: `[{exp_typ, inv: [{inum, idt, val, sbpcode, sbnum, sbdt, itms}]}]`
//! with flat items.

use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::*;

static EXPORT_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::DocNumber, Field::DocumentNumber),
    (GovField::DocDate, Field::DocumentDate),
    (GovField::DocValue, Field::DocumentValue),
    (GovField::ShippingPortCode, Field::ShippingPortCode),
    (GovField::ShippingBillNumber, Field::ShippingBillNumber),
    (GovField::ShippingBillDate, Field::ShippingBillDate),
    (GovField::Items, Field::Items),
    (GovField::TaxableValue, Field::TaxableValue),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::Igst, Field::IgstAmount),
    (GovField::Cess, Field::CessAmount),
]);

/// Subcategory for an export type code (`WPAY` / `WOPAY`)
pub fn export_sub_category(export_type: &str) -> Option<GstrSubCategory> {
    match export_type {
        "WPAY" => Some(GstrSubCategory::ExportWithPayment),
        "WOPAY" => Some(GstrSubCategory::ExportWithoutPayment),
        _ => None,
    }
}

/// Mapper for the `exp` section
#[derive(Debug, Default)]
pub struct Exports;

impl Exports {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for Exports {
    fn fields(&self) -> &'static FieldMap {
        &EXPORT_FIELDS
    }

    fn item_layout(&self) -> ItemLayout {
        ItemLayout::Flat
    }
}

impl CategoryMapper for Exports {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for group in as_array(input, "exp")? {
            let group = as_object(group, "exp")?;
            let export_type = text_field(group, GovField::ExportType).unwrap_or_default();
            let sub_category =
                export_sub_category(&export_type).ok_or_else(|| MapperError::UnknownCode {
                    key: GovField::ExportType.as_str().to_string(),
                    value: export_type.clone(),
                })?;

            let mut defaults = error_defaults(group);
            defaults.insert(Field::DocumentType, export_type);

            for invoice in array_field(group, GovField::Invoices)? {
                let invoice = as_object(invoice, GovField::Invoices.as_str())?;
                let mut record = self.format_for_internal(invoice, defaults.clone())?;
                update_totals(&mut record);

                let key = record.text(Field::DocumentNumber).unwrap_or_default().to_string();
                output.insert(sub_category, key, record);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let groups = group_by_text(records, Field::DocumentType)
            .into_iter()
            .map(|(export_type, invoices)| {
                let invoices = invoices
                    .into_iter()
                    .map(|invoice| Ok(Value::Object(self.format_for_gov(invoice, GovObject::new())?)))
                    .collect::<MapperResult<Vec<_>>>()?;
                Ok(group_object(
                    GovField::ExportType,
                    Value::from(export_type),
                    GovField::Invoices,
                    invoices,
                ))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(groups))
    }
}
