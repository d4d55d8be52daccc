//! Generic record formatting shared by all category mappers
//!
//! A category mapper describes its government keys with a [`FieldMap`] and
//! gets both directions of record formatting from [`RecordMapper`]. Only the
//! category specific nesting lives in the category modules.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDate;
use serde_json::{Map, Number, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::config::Gstr1Config;
use crate::gstr1::fields::{FieldMap, GovField, LabelMap};
use crate::tax::states::{place_of_supply_code, place_of_supply_label};
use crate::traits::PartyLookup;
use crate::types::*;

/// A JSON object in government format
pub type GovObject = Map<String, Value>;

const GOV_DATE_FORMAT: &str = "%d-%m-%Y";

/// How a category lays out its item list in government JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLayout {
    /// `[{"num": 1, "itm_det": {...}}]`
    Nested,
    /// `[{...}]`
    Flat,
}

/// Converts one category's government objects to and from internal records
pub trait CategoryMapper {
    /// Government section value to internal subcategory buckets
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData>;

    /// Internal records of the category to its government section value
    fn to_gov(&self, records: &[Record]) -> MapperResult<Value>;
}

/// Per-call context handed to category mappers
#[derive(Clone, Copy, Default)]
pub struct MapperContext<'a> {
    /// GSTIN of the filing company, decides INTRA or INTER supply
    pub company_gstin: &'a str,
    /// Customer master used to name B2B and CDNR customers
    pub parties: Option<&'a dyn PartyLookup>,
    /// Longest HSN description sent to the portal
    pub hsn_description_limit: Option<usize>,
}

impl<'a> MapperContext<'a> {
    pub fn new(company_gstin: &'a str) -> Self {
        Self {
            company_gstin,
            parties: None,
            hsn_description_limit: None,
        }
    }

    pub fn with_parties(mut self, parties: &'a dyn PartyLookup) -> Self {
        self.parties = Some(parties);
        self
    }

    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.hsn_description_limit = Some(limit);
        self
    }

    /// Take the HSN description limit from the preparation settings
    pub fn with_config(self, config: &Gstr1Config) -> Self {
        self.with_description_limit(config.hsn_description_limit)
    }
}

/// Key renaming and value formatting for a single category
pub trait RecordMapper {
    /// Government key to internal field table
    fn fields(&self) -> &'static FieldMap;

    /// Amounts pre-populated with zero on every item
    fn item_defaults(&self) -> &'static [Field] {
        &Field::ITEM_AMOUNTS
    }

    fn item_layout(&self) -> ItemLayout {
        ItemLayout::Nested
    }

    /// Code and label table for a key, if its values are coded
    fn labels(&self, _key: GovField) -> Option<&'static LabelMap> {
        None
    }

    fn value_for_internal(&self, key: GovField, value: &Value) -> MapperResult<Option<FieldValue>> {
        internal_value(self, key, value)
    }

    fn value_for_gov(
        &self,
        key: GovField,
        value: &FieldValue,
        record: &Record,
    ) -> MapperResult<Option<Value>> {
        gov_value(self, key, value, record)
    }

    /// Leave a field out of government output for this record
    fn skip_for_gov(&self, _field: Field, _record: &Record) -> bool {
        false
    }

    /// Rename and format a government object on top of `defaults`
    ///
    /// Missing, null and empty values are skipped; zero is kept. Keys absent
    /// from [`RecordMapper::fields`] are dropped.
    fn format_for_internal(&self, data: &GovObject, defaults: Record) -> MapperResult<Record> {
        let mut output = defaults;
        for (key, field) in self.fields().pairs() {
            let Some(value) = data.get(key.as_str()) else {
                continue;
            };
            if is_blank(value) {
                continue;
            }
            if let Some(value) = self.value_for_internal(*key, value)? {
                output.insert(*field, value);
            }
        }
        Ok(output)
    }

    /// Rename and format an internal record on top of `defaults`
    fn format_for_gov(&self, record: &Record, defaults: GovObject) -> MapperResult<GovObject> {
        let mut output = defaults;
        for (key, field) in self.fields().pairs() {
            let Some(value) = record.get(*field) else {
                continue;
            };
            if value.is_blank() || self.skip_for_gov(*field, record) {
                continue;
            }
            if key.discard_if_zero() && value.as_amount().is_some_and(BigDecimal::is_zero) {
                continue;
            }
            if let Some(value) = self.value_for_gov(*key, value, record)? {
                output.insert(key.as_str().to_string(), value);
            }
        }
        Ok(output)
    }

    fn items_for_internal(&self, items: &Value) -> MapperResult<Vec<Record>> {
        let empty = GovObject::new();
        as_array(items, GovField::Items.as_str())?
            .iter()
            .map(|item| {
                let details = match self.item_layout() {
                    ItemLayout::Nested => match item.get(GovField::ItemDetails.as_str()) {
                        Some(details) => as_object(details, GovField::ItemDetails.as_str())?,
                        None => &empty,
                    },
                    ItemLayout::Flat => as_object(item, GovField::Items.as_str())?,
                };
                self.format_for_internal(details, zero_amounts(self.item_defaults()))
            })
            .collect()
    }

    fn items_for_gov(&self, items: &[Record]) -> MapperResult<Value> {
        let items = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let details = self.format_for_gov(item, GovObject::new())?;
                Ok(match self.item_layout() {
                    ItemLayout::Nested => {
                        let mut nested = GovObject::new();
                        nested.insert(GovField::Index.as_str().to_string(), Value::from(index + 1));
                        nested.insert(
                            GovField::ItemDetails.as_str().to_string(),
                            Value::Object(details),
                        );
                        Value::Object(nested)
                    }
                    ItemLayout::Flat => Value::Object(details),
                })
            })
            .collect::<MapperResult<Vec<_>>>()?;
        Ok(Value::Array(items))
    }
}

/// Default government to internal value conversion
///
/// Items are formatted through the mapper, places of supply and coded values
/// become labels, dates become [`NaiveDate`], numbers become amounts.
pub fn internal_value<M: RecordMapper + ?Sized>(
    mapper: &M,
    key: GovField,
    value: &Value,
) -> MapperResult<Option<FieldValue>> {
    if key == GovField::Items {
        return Ok(Some(FieldValue::Items(mapper.items_for_internal(value)?)));
    }

    match value {
        Value::Null => Ok(None),
        Value::String(text) if key.is_date() => Ok(Some(FieldValue::Date(parse_gov_date(text)?))),
        Value::String(text) if key == GovField::Pos => {
            Ok(Some(FieldValue::Text(place_of_supply_label(text))))
        }
        Value::String(text) => Ok(Some(FieldValue::Text(match mapper.labels(key) {
            Some(labels) => labels.label(text).to_string(),
            None => text.clone(),
        }))),
        Value::Number(_) => Ok(Some(FieldValue::Amount(amount_from_json(key.as_str(), value)?))),
        Value::Bool(flag) => Ok(Some(FieldValue::Text(flag.to_string()))),
        Value::Array(_) | Value::Object(_) => Err(MapperError::InvalidStructure {
            key: key.as_str().to_string(),
            expected: "a scalar value",
        }),
    }
}

/// Default internal to government value conversion
pub fn gov_value<M: RecordMapper + ?Sized>(
    mapper: &M,
    key: GovField,
    value: &FieldValue,
    _record: &Record,
) -> MapperResult<Option<Value>> {
    match value {
        FieldValue::Items(items) if key == GovField::Items => Ok(Some(mapper.items_for_gov(items)?)),
        FieldValue::Items(_) => Err(MapperError::InvalidStructure {
            key: key.as_str().to_string(),
            expected: "a scalar value",
        }),
        FieldValue::Text(text) if key == GovField::Pos => {
            Ok(Some(Value::from(place_of_supply_code(text))))
        }
        FieldValue::Text(text) => Ok(Some(Value::from(match mapper.labels(key) {
            Some(labels) => labels.code(text),
            None => text.as_str(),
        }))),
        FieldValue::Amount(amount) => Ok(Some(amount_to_json(amount, key.is_float())?)),
        FieldValue::Date(date) => Ok(Some(Value::from(date.format(GOV_DATE_FORMAT).to_string()))),
    }
}

/// Null, empty strings and empty collections are treated as missing
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub fn parse_gov_date(text: &str) -> MapperResult<NaiveDate> {
    NaiveDate::parse_from_str(text, GOV_DATE_FORMAT)
        .map_err(|_| MapperError::InvalidDate(text.to_string()))
}

/// Exact decimal value of a JSON number
pub fn amount_from_json(key: &str, value: &Value) -> MapperResult<BigDecimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    BigDecimal::from_str(&text).map_err(|_| MapperError::InvalidAmount {
        key: key.to_string(),
        value: text,
    })
}

/// JSON number for an amount; whole values become integers
///
/// With `round_off` the amount is first rounded to two decimal places.
pub fn amount_to_json(amount: &BigDecimal, round_off: bool) -> MapperResult<Value> {
    let amount = if round_off {
        amount.round(2)
    } else {
        amount.clone()
    };

    if amount.is_integer() {
        if let Some(whole) = amount.to_i64() {
            return Ok(Value::from(whole));
        }
    }

    amount
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| MapperError::InvalidAmount {
            key: "amount".to_string(),
            value: amount.to_string(),
        })
}

pub fn as_array<'v>(value: &'v Value, key: &str) -> MapperResult<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| MapperError::InvalidStructure {
        key: key.to_string(),
        expected: "an array",
    })
}

pub fn as_object<'v>(value: &'v Value, key: &str) -> MapperResult<&'v GovObject> {
    value.as_object().ok_or_else(|| MapperError::InvalidStructure {
        key: key.to_string(),
        expected: "an object",
    })
}

/// Array stored under `key`, empty when the key is missing or null
pub fn array_field<'v>(object: &'v GovObject, key: GovField) -> MapperResult<&'v [Value]> {
    match object.get(key.as_str()) {
        None | Some(Value::Null) => Ok(&[]),
        Some(value) => Ok(as_array(value, key.as_str())?.as_slice()),
    }
}

/// Text stored under `key`; numbers are rendered as text
pub fn text_field(object: &GovObject, key: GovField) -> Option<String> {
    match object.get(key.as_str())? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Record holding zero for each of `fields`
pub fn zero_amounts(fields: &[Field]) -> Record {
    fields
        .iter()
        .map(|field| (*field, FieldValue::Amount(BigDecimal::zero())))
        .collect()
}

/// Error code and message attached by the portal to a grouping object
pub fn error_defaults(object: &GovObject) -> Record {
    let mut defaults = Record::new();
    if let Some(code) = text_field(object, GovField::ErrorCode).filter(|code| !code.is_empty()) {
        defaults.insert(Field::ErrorCode, code);
    }
    if let Some(message) =
        text_field(object, GovField::ErrorMessage).filter(|message| !message.is_empty())
    {
        defaults.insert(Field::ErrorMessage, message);
    }
    defaults
}

/// Set invoice totals from the amounts present on its items
pub fn update_totals(invoice: &mut Record) {
    let mut totals: BTreeMap<Field, BigDecimal> = BTreeMap::new();
    for item in invoice.items() {
        for (field, value) in item.iter() {
            if let (Some(total), FieldValue::Amount(amount)) = (field.total_field(), value) {
                *totals.entry(total).or_default() += amount;
            }
        }
    }

    for (field, total) in totals {
        invoice.insert(field, total);
    }
}

/// Customer names by GSTIN, looked up once per conversion
pub struct CustomerNames<'a> {
    lookup: Option<&'a dyn PartyLookup>,
    cache: RefCell<HashMap<String, String>>,
}

impl<'a> CustomerNames<'a> {
    pub fn new(lookup: Option<&'a dyn PartyLookup>) -> Self {
        Self {
            lookup,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Registered name for a GSTIN, `"Unknown"` when there is none
    pub fn guess(&self, gstin: &str) -> String {
        if let Some(name) = self.cache.borrow().get(gstin) {
            return name.clone();
        }

        let name = self
            .lookup
            .and_then(|lookup| lookup.party_for_gstin(gstin))
            .unwrap_or_else(|| "Unknown".to_string());
        self.cache
            .borrow_mut()
            .insert(gstin.to_string(), name.clone());
        name
    }
}

/// `{group_key: key, list_key: [...]}`, the shape of grouped sections
pub fn group_object(group_key: GovField, key: Value, list_key: GovField, list: Vec<Value>) -> Value {
    let mut object = GovObject::new();
    object.insert(group_key.as_str().to_string(), key);
    object.insert(list_key.as_str().to_string(), Value::Array(list));
    Value::Object(object)
}

/// Group records by a text field, keeping first appearance order
pub fn group_by_text<'r>(records: &'r [Record], field: Field) -> Vec<(String, Vec<&'r Record>)> {
    let mut groups: Vec<(String, Vec<&Record>)> = Vec::new();
    for record in records {
        let key = record.text(field).unwrap_or_default().to_string();
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gstr1::fields::INVOICE_TYPES;
    use serde_json::json;

    static SAMPLE_FIELDS: FieldMap = FieldMap::new(&[
        (GovField::DocNumber, Field::DocumentNumber),
        (GovField::DocDate, Field::DocumentDate),
        (GovField::Pos, Field::PlaceOfSupply),
        (GovField::InvoiceType, Field::DocumentType),
        (GovField::DiffPercentage, Field::DiffPercentage),
        (GovField::DocValue, Field::DocumentValue),
        (GovField::Items, Field::Items),
        (GovField::TaxRate, Field::TaxRate),
        (GovField::TaxableValue, Field::TaxableValue),
        (GovField::Igst, Field::IgstAmount),
    ]);

    struct SampleMapper;

    impl RecordMapper for SampleMapper {
        fn fields(&self) -> &'static FieldMap {
            &SAMPLE_FIELDS
        }

        fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
            (key == GovField::InvoiceType).then_some(&INVOICE_TYPES)
        }
    }

    fn sample_invoice() -> Value {
        json!({
            "inum": "S008400",
            "idt": "24-11-2016",
            "pos": "06",
            "inv_typ": "R",
            "val": 729248.16,
            "diff_percent": 0,
            "unknown_key": "dropped",
            "itms": [{"num": 1, "itm_det": {"rt": 5, "txval": 10000, "iamt": 325}}]
        })
    }

    #[test]
    fn test_format_for_internal() {
        let data = sample_invoice();
        let record = SampleMapper
            .format_for_internal(data.as_object().unwrap(), Record::new())
            .unwrap();

        assert_eq!(record.text(Field::DocumentNumber), Some("S008400"));
        assert_eq!(record.text(Field::PlaceOfSupply), Some("06-Haryana"));
        assert_eq!(record.text(Field::DocumentType), Some("Regular B2B"));
        assert_eq!(record.date(Field::DocumentDate), NaiveDate::from_ymd_opt(2016, 11, 24));
        assert_eq!(
            record.amount(Field::DocumentValue),
            Some(&BigDecimal::from_str("729248.16").unwrap())
        );

        let item = &record.items()[0];
        assert_eq!(item.amount(Field::TaxableValue), Some(&BigDecimal::from(10000)));
        assert_eq!(item.amount(Field::CgstAmount), Some(&BigDecimal::zero()));
    }

    #[test]
    fn test_format_for_gov_restores_input() {
        let data = sample_invoice();
        let record = SampleMapper
            .format_for_internal(data.as_object().unwrap(), Record::new())
            .unwrap();
        let gov = SampleMapper.format_for_gov(&record, GovObject::new()).unwrap();

        // diff_percent of zero is discarded, unknown keys do not survive
        assert_eq!(
            Value::Object(gov),
            json!({
                "inum": "S008400",
                "idt": "24-11-2016",
                "pos": "06",
                "inv_typ": "R",
                "val": 729248.16,
                "itms": [{"num": 1, "itm_det": {"rt": 5, "txval": 10000, "iamt": 325}}]
            })
        );
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let data = json!({"idt": "2016-11-24"});
        let result = SampleMapper.format_for_internal(data.as_object().unwrap(), Record::new());
        assert!(matches!(result, Err(MapperError::InvalidDate(_))));
    }

    #[test]
    fn test_amount_to_json() {
        let amount = BigDecimal::from_str("10450.564").unwrap();
        assert_eq!(amount_to_json(&amount, true).unwrap(), json!(10450.56));
        assert_eq!(amount_to_json(&BigDecimal::from(-500), true).unwrap(), json!(-500));
        assert_eq!(
            amount_to_json(&BigDecimal::from_str("0.1").unwrap(), false).unwrap(),
            json!(0.1)
        );
    }

    #[test]
    fn test_update_totals_only_sets_present_amounts() {
        let mut invoice = Record::new().with(
            Field::Items,
            vec![
                Record::new().with(Field::TaxableValue, 100).with(Field::TaxRate, 5),
                Record::new().with(Field::TaxableValue, 50).with(Field::IgstAmount, 7),
            ],
        );
        update_totals(&mut invoice);

        assert_eq!(invoice.amount(Field::TotalTaxableValue), Some(&BigDecimal::from(150)));
        assert_eq!(invoice.amount(Field::TotalIgstAmount), Some(&BigDecimal::from(7)));
        assert!(!invoice.contains(Field::TotalCgstAmount));
    }

    #[test]
    fn test_customer_names_default_to_unknown() {
        let names = CustomerNames::new(None);
        assert_eq!(names.guess("24AANFA2641L1ZF"), "Unknown");
    }

    #[test]
    fn test_group_by_text_keeps_first_appearance() {
        let records = vec![
            Record::new().with(Field::CustomerGstin, "B"),
            Record::new().with(Field::CustomerGstin, "A"),
            Record::new().with(Field::CustomerGstin, "B"),
        ];
        let groups = group_by_text(&records, Field::CustomerGstin);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        assert_eq!(groups[0].1.len(), 2);
    }
}
