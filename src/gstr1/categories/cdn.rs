//! Credit and debit notes (table 9B)
//!
//! Registered notes come grouped by customer, `[{ctin, nt: [{ntty, nt_num, ...}]}]`;
//! unregistered notes are a flat list. Credit note amounts are stored negative
//! internally and written back as absolute values.

use bigdecimal::BigDecimal;
use serde_json::Value;

use crate::gstr1::fields::{FieldMap, GovField, LabelMap, INVOICE_TYPES, NOTE_TYPES};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::*;

static CDNR_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::NoteType, Field::TransactionType),
    (GovField::NoteNumber, Field::DocumentNumber),
    (GovField::NoteDate, Field::DocumentDate),
    (GovField::Pos, Field::PlaceOfSupply),
    (GovField::ReverseCharge, Field::ReverseCharge),
    (GovField::InvoiceType, Field::DocumentType),
    (GovField::DocValue, Field::DocumentValue),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Items, Field::Items),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::TaxableValue, Field::TaxableValue),
    (GovField::Igst, Field::IgstAmount),
    (GovField::Cgst, Field::CgstAmount),
    (GovField::Sgst, Field::SgstAmount),
    (GovField::Cess, Field::CessAmount),
]);

static CDNUR_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::Type, Field::DocumentType),
    (GovField::NoteType, Field::TransactionType),
    (GovField::NoteNumber, Field::DocumentNumber),
    (GovField::NoteDate, Field::DocumentDate),
    (GovField::DocValue, Field::DocumentValue),
    (GovField::Pos, Field::PlaceOfSupply),
    (GovField::DiffPercentage, Field::DiffPercentage),
    (GovField::Items, Field::Items),
    (GovField::TaxRate, Field::TaxRate),
    (GovField::TaxableValue, Field::TaxableValue),
    (GovField::Igst, Field::IgstAmount),
    (GovField::Cess, Field::CessAmount),
    (GovField::ErrorCode, Field::ErrorCode),
    (GovField::ErrorMessage, Field::ErrorMessage),
]);

static CDNUR_ITEM_AMOUNTS: [Field; 3] = [Field::TaxableValue, Field::IgstAmount, Field::CessAmount];

/// Negate note amounts the way the portal expects them internally
///
/// Item amounts turn negative for anything but a debit note, the note value
/// only for a credit note.
fn apply_note_sign(record: &mut Record, note_type: &str, item_fields: &[Field]) {
    let minus_one = BigDecimal::from(-1);
    if note_type != "D" {
        if let Some(items) = record.items_mut() {
            for item in items.iter_mut() {
                item.scale_amounts(item_fields, &minus_one);
            }
        }
    }
    if note_type == "C" {
        record.scale_amounts(&[Field::DocumentValue], &minus_one);
    }
}

/// Copy of a note with document value and item amounts made absolute
fn absolute_note(record: &Record, item_fields: &[Field]) -> Record {
    let mut output = record.clone();
    if let Some(FieldValue::Amount(value)) = output.get_mut(Field::DocumentValue) {
        *value = value.abs();
    }
    if let Some(items) = output.items_mut() {
        for item in items.iter_mut() {
            for field in item_fields {
                if let Some(FieldValue::Amount(amount)) = item.get_mut(*field) {
                    *amount = amount.abs();
                }
            }
        }
    }
    output
}

/// Mapper for the `cdnr` section
pub struct Cdnr<'a> {
    customers: CustomerNames<'a>,
}

impl<'a> Cdnr<'a> {
    pub fn new(context: &MapperContext<'a>) -> Self {
        Self {
            customers: CustomerNames::new(context.parties),
        }
    }
}

impl RecordMapper for Cdnr<'_> {
    fn fields(&self) -> &'static FieldMap {
        &CDNR_FIELDS
    }

    fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
        match key {
            GovField::NoteType => Some(&NOTE_TYPES),
            GovField::InvoiceType => Some(&INVOICE_TYPES),
            _ => None,
        }
    }
}

impl CategoryMapper for Cdnr<'_> {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for customer in as_array(input, "cdnr")? {
            let customer = as_object(customer, "cdnr")?;
            let gstin = text_field(customer, GovField::CustomerGstin).unwrap_or_default();

            let mut defaults = error_defaults(customer);
            defaults.insert(Field::CustomerName, self.customers.guess(&gstin));
            defaults.insert(Field::CustomerGstin, gstin);

            for note in array_field(customer, GovField::Notes)? {
                let note = as_object(note, GovField::Notes.as_str())?;
                let mut record = self.format_for_internal(note, defaults.clone())?;

                let note_type = text_field(note, GovField::NoteType).unwrap_or_default();
                apply_note_sign(&mut record, &note_type, self.item_defaults());
                update_totals(&mut record);

                let key = record.text(Field::DocumentNumber).unwrap_or_default().to_string();
                output.insert(GstrSubCategory::Cdnr, key, record);
            }
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let customers = group_by_text(records, Field::CustomerGstin)
            .into_iter()
            .map(|(gstin, notes)| {
                let notes = notes
                    .into_iter()
                    .map(|note| {
                        let note = absolute_note(note, self.item_defaults());
                        Ok(Value::Object(self.format_for_gov(&note, GovObject::new())?))
                    })
                    .collect::<MapperResult<Vec<_>>>()?;
                Ok(group_object(
                    GovField::CustomerGstin,
                    Value::from(gstin),
                    GovField::Notes,
                    notes,
                ))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(customers))
    }
}

/// Mapper for the `cdnur` section
#[derive(Debug, Default)]
pub struct Cdnur;

impl Cdnur {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for Cdnur {
    fn fields(&self) -> &'static FieldMap {
        &CDNUR_FIELDS
    }

    fn item_defaults(&self) -> &'static [Field] {
        &CDNUR_ITEM_AMOUNTS
    }

    fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
        (key == GovField::NoteType).then_some(&NOTE_TYPES)
    }

    /// Export notes carry no place of supply
    fn skip_for_gov(&self, field: Field, record: &Record) -> bool {
        field == Field::PlaceOfSupply
            && matches!(record.text(Field::DocumentType), Some("EXPWP" | "EXPWOP"))
    }
}

impl CategoryMapper for Cdnur {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();

        for note in as_array(input, "cdnur")? {
            let note = as_object(note, "cdnur")?;
            let mut record = self.format_for_internal(note, Record::new())?;

            let note_type = text_field(note, GovField::NoteType).unwrap_or_default();
            apply_note_sign(&mut record, &note_type, self.item_defaults());
            update_totals(&mut record);

            let key = record.text(Field::DocumentNumber).unwrap_or_default().to_string();
            output.insert(GstrSubCategory::Cdnur, key, record);
        }

        Ok(output)
    }

    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let notes = records
            .iter()
            .map(|note| {
                let note = absolute_note(note, self.item_defaults());
                Ok(Value::Object(self.format_for_gov(&note, GovObject::new())?))
            })
            .collect::<MapperResult<Vec<_>>>()?;

        Ok(Value::Array(notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn cdnr_data() -> Value {
        json!([
            {
                "ctin": "01AAAAP1208Q1ZS",
                "nt": [
                    {
                        "ntty": "C",
                        "nt_num": "533515",
                        "nt_dt": "23-09-2016",
                        "pos": "03",
                        "rchrg": "Y",
                        "inv_typ": "DE",
                        "val": 123123,
                        "diff_percent": 0.65,
                        "itms": [
                            {"num": 1, "itm_det": {"rt": 10, "txval": 5225.28, "iamt": 0, "camt": 0, "samt": 0, "csamt": 500}}
                        ]
                    },
                    {
                        "ntty": "D",
                        "nt_num": "533516",
                        "nt_dt": "23-09-2016",
                        "pos": "03",
                        "rchrg": "N",
                        "inv_typ": "R",
                        "val": 1000,
                        "itms": [
                            {"num": 1, "itm_det": {"rt": 18, "txval": 847.46, "iamt": 152.54, "camt": 0, "samt": 0, "csamt": 0}}
                        ]
                    }
                ]
            }
        ])
    }

    fn cdnur_data() -> Value {
        json!([
            {
                "typ": "B2CL",
                "ntty": "C",
                "nt_num": "533515",
                "nt_dt": "23-09-2016",
                "pos": "03",
                "val": 64646,
                "diff_percent": 0.65,
                "itms": [
                    {"num": 1, "itm_det": {"rt": 10, "txval": 5225.28, "iamt": 339.64, "csamt": 789.52}}
                ]
            },
            {
                "typ": "EXPWP",
                "ntty": "C",
                "nt_num": "533516",
                "nt_dt": "23-09-2016",
                "val": 64646,
                "itms": [
                    {"num": 1, "itm_det": {"rt": 10, "txval": 5225.28, "iamt": 339.64, "csamt": 789.52}}
                ]
            }
        ])
    }

    #[test]
    fn test_credit_notes_are_negative() {
        let context = MapperContext::default();
        let output = Cdnr::new(&context).to_internal(&cdnr_data()).unwrap();
        let rows = output.get(GstrSubCategory::Cdnr).unwrap();

        let credit = &rows["533515"].records()[0];
        assert_eq!(credit.text(Field::TransactionType), Some("Credit Note"));
        assert_eq!(credit.text(Field::DocumentType), Some("Deemed Exports"));
        assert_eq!(credit.text(Field::CustomerName), Some("Unknown"));
        assert_eq!(credit.date(Field::DocumentDate), NaiveDate::from_ymd_opt(2016, 9, 23));
        assert_eq!(credit.amount(Field::DocumentValue), Some(&dec("-123123")));
        assert_eq!(credit.amount(Field::TotalTaxableValue), Some(&dec("-5225.28")));
        assert_eq!(credit.amount(Field::TotalCessAmount), Some(&dec("-500")));

        let debit = &rows["533516"].records()[0];
        assert_eq!(debit.text(Field::TransactionType), Some("Debit Note"));
        assert_eq!(debit.amount(Field::DocumentValue), Some(&dec("1000")));
        assert_eq!(debit.amount(Field::TotalIgstAmount), Some(&dec("152.54")));
    }

    #[test]
    fn test_cdnr_round_trip() {
        let context = MapperContext::default();
        let mapper = Cdnr::new(&context);
        let internal = mapper.to_internal(&cdnr_data()).unwrap();
        let records: Vec<Record> = internal.records(GstrSubCategory::Cdnr).cloned().collect();

        assert_eq!(mapper.to_gov(&records).unwrap(), cdnr_data());
    }

    #[test]
    fn test_cdnur_internal() {
        let output = Cdnur::new().to_internal(&cdnur_data()).unwrap();
        let note = output.records(GstrSubCategory::Cdnur).next().unwrap();

        assert_eq!(note.text(Field::DocumentType), Some("B2CL"));
        assert_eq!(note.text(Field::PlaceOfSupply), Some("03-Punjab"));
        assert_eq!(note.amount(Field::TotalIgstAmount), Some(&dec("-339.64")));
        assert!(!note.contains(Field::TotalCgstAmount));
    }

    #[test]
    fn test_cdnur_round_trip_skips_pos_for_exports() {
        let output = Cdnur::new().to_internal(&cdnur_data()).unwrap();
        let mut records: Vec<Record> = output.records(GstrSubCategory::Cdnur).cloned().collect();
        records[1].insert(Field::PlaceOfSupply, "96-Other Countries");

        assert_eq!(Cdnur::new().to_gov(&records).unwrap(), cdnur_data());
    }
}
