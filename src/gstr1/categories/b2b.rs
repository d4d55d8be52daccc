//! B2B, SEZ and deemed export invoices (table 4 and 6B/6C)
//!
//! Government shape: `[{ctin, inv: [{inum, idt, val, pos, rchrg, inv_typ, itms}]}]`.
//! Internal shape: subcategory, then invoice number, then invoice.

use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField, LabelMap, INVOICE_TYPES};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::B2bInvoiceType;
use crate::types::*;

static B2B_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::DocNumber, Field::DocumentNumber),
    (GovField::DocDate, Field::DocumentDate),
    (GovField::DocValue, Field::DocumentValue),
    (GovField::Pos, Field::PlaceOfSupply),
    (GovField::ReverseCharge, Field::ReverseCharge),
    (GovField::InvoiceType, Field::DocumentType),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Items, Field::Items),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::TaxableValue, Field::TaxableValue),
    (GovField::Igst, Field::IgstAmount),
    (GovField::Cgst, Field::CgstAmount),
    (GovField::Sgst, Field::SgstAmount),
    (GovField::Cess, Field::CessAmount),
]);

/// Mapper for the `b2b` section
pub struct B2b<'a> {
    customers: CustomerNames<'a>,
}

impl<'a> B2b<'a> {
    pub fn new(context: &MapperContext<'a>) -> Self {
        Self {
            customers: CustomerNames::new(context.parties),
        }
    }
}

impl RecordMapper for B2b<'_> {
    fn fields(&self) -> &'static FieldMap {
        &B2B_FIELDS
    }

    fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
        (key == GovField::InvoiceType).then_some(&INVOICE_TYPES)
    }
}

impl CategoryMapper for B2b<'_> {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for customer in as_array(input, "b2b")? {
            let customer = as_object(customer, "b2b")?;
            let gstin = text_field(customer, GovField::CustomerGstin).unwrap_or_default();

            let mut defaults = error_defaults(customer);
            defaults.insert(Field::CustomerName, self.customers.guess(&gstin));
            defaults.insert(Field::CustomerGstin, gstin);

            for invoice in array_field(customer, GovField::Invoices)? {
                let invoice = as_object(invoice, GovField::Invoices.as_str())?;
                let mut record = self.format_for_internal(invoice, defaults.clone())?;
                update_totals(&mut record);

                let invoice_type = text_field(invoice, GovField::InvoiceType)
                    .and_then(|code| B2bInvoiceType::from_code(&code));
                let reverse_charge =
                    text_field(invoice, GovField::ReverseCharge).as_deref() == Some("Y");
                let sub_category = B2bInvoiceType::sub_category(invoice_type, reverse_charge);

                let key = record.text(Field::DocumentNumber).unwrap_or_default().to_string();
                output.insert(sub_category, key, record);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let customers = group_by_text(records, Field::CustomerGstin)
            .into_iter()
            .map(|(gstin, invoices)| {
                let invoices = invoices
                    .into_iter()
                    .map(|invoice| Ok(Value::Object(self.format_for_gov(invoice, GovObject::new())?)))
                    .collect::<MapperResult<Vec<_>>>()?;
                Ok(group_object(
                    GovField::CustomerGstin,
                    Value::from(gstin),
                    GovField::Invoices,
                    invoices,
                ))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(customers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gstr1::taxonomy::GstrSubCategory;
    use crate::utils::memory_storage::MemoryPartyLookup;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn item(rate: i64, taxable: i64, igst: i64, cess: i64) -> Value {
        json!({"num": 1, "itm_det": {"rt": rate, "txval": taxable, "iamt": igst, "camt": 0, "samt": 0, "csamt": cess}})
    }

    fn gov_data() -> Value {
        json!([
            {
                "ctin": "24AANFA2641L1ZF",
                "inv": [
                    {
                        "inum": "S008400",
                        "idt": "24-11-2016",
                        "val": 729248.16,
                        "pos": "06",
                        "rchrg": "N",
                        "inv_typ": "R",
                        "diff_percent": 0.65,
                        "itms": [item(5, 10000, 325, 500), {"num": 2, "itm_det": {"rt": 5, "txval": 10000, "iamt": 325, "camt": 0, "samt": 0, "csamt": 500}}]
                    },
                    {
                        "inum": "S008401",
                        "idt": "24-11-2016",
                        "val": 729248.16,
                        "pos": "06",
                        "rchrg": "Y",
                        "inv_typ": "R",
                        "diff_percent": 0.65,
                        "itms": [item(5, 10000, 325, 500)]
                    }
                ]
            },
            {
                "ctin": "29AABCR1718E1ZL",
                "inv": [
                    {
                        "inum": "S008402",
                        "idt": "24-11-2016",
                        "val": 729248.16,
                        "pos": "06",
                        "rchrg": "N",
                        "inv_typ": "SEWP",
                        "diff_percent": 0.65,
                        "itms": [item(5, 10000, 325, 500)]
                    },
                    {
                        "inum": "S008403",
                        "idt": "24-11-2016",
                        "val": 729248.16,
                        "pos": "06",
                        "rchrg": "N",
                        "inv_typ": "DE",
                        "diff_percent": 0.65,
                        "itms": [item(5, 10000, 325, 500)]
                    }
                ]
            }
        ])
    }

    #[test]
    fn test_convert_to_internal() {
        let context = MapperContext::default();
        let output = B2b::new(&context).to_internal(&gov_data()).unwrap();

        assert_eq!(
            output.sub_categories(),
            vec![
                GstrSubCategory::B2bRegular,
                GstrSubCategory::B2bReverseCharge,
                GstrSubCategory::SezWithPayment,
                GstrSubCategory::DeemedExport,
            ]
        );

        let invoice = output.records(GstrSubCategory::B2bRegular).next().unwrap();
        let items = vec![
            Record::new()
                .with(Field::TaxableValue, 10000)
                .with(Field::IgstAmount, 325)
                .with(Field::CgstAmount, 0)
                .with(Field::SgstAmount, 0)
                .with(Field::CessAmount, 500)
                .with(Field::TaxRate, 5);
            2
        ];
        let expected = Record::new()
            .with(Field::CustomerGstin, "24AANFA2641L1ZF")
            .with(Field::CustomerName, "Unknown")
            .with(Field::DocumentNumber, "S008400")
            .with(Field::DocumentDate, NaiveDate::from_ymd_opt(2016, 11, 24).unwrap())
            .with(Field::DocumentValue, dec("729248.16"))
            .with(Field::PlaceOfSupply, "06-Haryana")
            .with(Field::ReverseCharge, "N")
            .with(Field::DocumentType, "Regular B2B")
            .with(Field::DiffPercentage, dec("0.65"))
            .with(Field::Items, items)
            .with(Field::TotalTaxableValue, 20000)
            .with(Field::TotalIgstAmount, 650)
            .with(Field::TotalCgstAmount, 0)
            .with(Field::TotalSgstAmount, 0)
            .with(Field::TotalCessAmount, 1000);

        assert_eq!(invoice, &expected);

        let sez = output.records(GstrSubCategory::SezWithPayment).next().unwrap();
        assert_eq!(sez.text(Field::DocumentType), Some("SEZ supplies with payment"));
        assert!(output.contains_key(GstrSubCategory::B2bReverseCharge, "S008401"));
    }

    #[test]
    fn test_customer_name_from_party_master() {
        let parties = MemoryPartyLookup::new().with_party("29AABCR1718E1ZL", "Reliance Retail");
        let context = MapperContext::default().with_parties(&parties);
        let output = B2b::new(&context).to_internal(&gov_data()).unwrap();

        let sez = output.records(GstrSubCategory::DeemedExport).next().unwrap();
        assert_eq!(sez.text(Field::CustomerName), Some("Reliance Retail"));
    }

    #[test]
    fn test_convert_to_gov_round_trip() {
        let context = MapperContext::default();
        let mapper = B2b::new(&context);
        let internal = mapper.to_internal(&gov_data()).unwrap();

        let records: Vec<Record> = internal
            .iter()
            .flat_map(|(_, rows)| rows.values())
            .flat_map(|entry| entry.records().to_vec())
            .collect();
        // taxonomy order puts the SEZ invoice before the deemed export one,
        // matching the input order here
        let output = B2b::new(&context).to_gov(&records).unwrap();

        assert_eq!(output, gov_data());
    }

    #[test]
    fn test_invoices_must_be_an_array() {
        let context = MapperContext::default();
        let result = B2b::new(&context).to_internal(&json!([{"ctin": "24AANFA2641L1ZF", "inv": {}}]));
        assert!(result.is_err());
    }
}
