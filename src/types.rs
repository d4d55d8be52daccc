//! Core types for internal GSTR-1 records

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::gstr1::taxonomy::GstrSubCategory;

/// Canonical field names used by internal records
///
/// Serialised in snake_case, so `Field::TotalIgstAmount` becomes
/// `"total_igst_amount"` in JSON output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Invoice, Credit Note or Debit Note
    TransactionType,
    CustomerGstin,
    CustomerName,
    EcommerceGstin,
    DocumentNumber,
    DocumentDate,
    DocumentValue,
    /// Label of the document type (invoice type, export type, nature of document)
    DocumentType,
    /// Place of supply as "NN-State"
    PlaceOfSupply,
    DiffPercentage,
    ReverseCharge,
    ShippingBillNumber,
    ShippingBillDate,
    ShippingPortCode,
    /// Rate-wise item list
    Items,
    TotalTaxableValue,
    TotalIgstAmount,
    TotalCgstAmount,
    TotalSgstAmount,
    TotalCessAmount,
    TaxableValue,
    IgstAmount,
    CgstAmount,
    SgstAmount,
    CessAmount,
    TaxRate,
    ExemptedAmount,
    NilRatedAmount,
    NonGstAmount,
    HsnCode,
    Description,
    Uom,
    Quantity,
    FromSrNo,
    ToSrNo,
    TotalCount,
    DraftCount,
    CancelledCount,
    NetIssue,
    AgainstVoucher,
    NoOfRecords,
    TotalDocumentValue,
    ActualDocumentValue,
    ActualTaxableValue,
    ActualIgstAmount,
    ActualCgstAmount,
    ActualSgstAmount,
    ActualCessAmount,
    TotalExemptedAmount,
    TotalNonGstAmount,
    TotalNilRatedAmount,
    Flag,
    /// Error code attached by the GST portal
    ErrorCode,
    /// Error message attached by the GST portal
    ErrorMessage,
    /// Subcategory label, set on rows collected outside their bucket
    Category,
    SubCategory,
}

impl Field {
    /// Item amounts that every item carries, zero when absent
    pub const ITEM_AMOUNTS: [Field; 5] = [
        Field::TaxableValue,
        Field::IgstAmount,
        Field::CgstAmount,
        Field::SgstAmount,
        Field::CessAmount,
    ];

    /// Invoice level totals, in the same order as [`Field::ITEM_AMOUNTS`]
    pub const TOTAL_AMOUNTS: [Field; 5] = [
        Field::TotalTaxableValue,
        Field::TotalIgstAmount,
        Field::TotalCgstAmount,
        Field::TotalSgstAmount,
        Field::TotalCessAmount,
    ];

    /// Invoice total that an item amount rolls up into
    pub fn total_field(&self) -> Option<Field> {
        match self {
            Field::TaxableValue => Some(Field::TotalTaxableValue),
            Field::IgstAmount => Some(Field::TotalIgstAmount),
            Field::CgstAmount => Some(Field::TotalCgstAmount),
            Field::SgstAmount => Some(Field::TotalSgstAmount),
            Field::CessAmount => Some(Field::TotalCessAmount),
            _ => None,
        }
    }
}

/// A single value stored against a [`Field`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Amount(BigDecimal),
    Date(NaiveDate),
    Items(Vec<Record>),
}

impl FieldValue {
    /// Blank values are skipped when formatting (empty text or empty item list)
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Items(items) => items.is_empty(),
            FieldValue::Amount(_) | FieldValue::Date(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<&BigDecimal> {
        match self {
            FieldValue::Amount(amount) => Some(amount),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<BigDecimal> for FieldValue {
    fn from(value: BigDecimal) -> Self {
        FieldValue::Amount(value)
    }
}

impl From<&BigDecimal> for FieldValue {
    fn from(value: &BigDecimal) -> Self {
        FieldValue::Amount(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Amount(BigDecimal::from(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Amount(BigDecimal::from(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Vec<Record>> for FieldValue {
    fn from(value: Vec<Record>) -> Self {
        FieldValue::Items(value)
    }
}

/// An internal invoice, item or summary row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<Field, FieldValue>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: impl Into<FieldValue>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn get_mut(&mut self, field: Field) -> Option<&mut FieldValue> {
        self.0.get_mut(&field)
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text value of a field, if it holds text
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Amount value of a field, if it holds an amount
    pub fn amount(&self, field: Field) -> Option<&BigDecimal> {
        self.get(field).and_then(FieldValue::as_amount)
    }

    /// Amount value of a field, zero when absent
    pub fn amount_or_zero(&self, field: Field) -> BigDecimal {
        self.amount(field).cloned().unwrap_or_default()
    }

    pub fn date(&self, field: Field) -> Option<NaiveDate> {
        match self.get(field) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    /// Rate-wise items, empty when the record has none
    pub fn items(&self) -> &[Record] {
        match self.get(Field::Items) {
            Some(FieldValue::Items(items)) => items,
            _ => &[],
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<Record>> {
        match self.get_mut(Field::Items) {
            Some(FieldValue::Items(items)) => Some(items),
            _ => None,
        }
    }

    /// Add to an amount field, starting from zero when absent
    pub fn add_amount(&mut self, field: Field, value: &BigDecimal) {
        let total = self.amount_or_zero(field) + value;
        self.insert(field, total);
    }

    /// Multiply the given amount fields in place
    pub fn scale_amounts(&mut self, fields: &[Field], multiplier: &BigDecimal) {
        for field in fields {
            if let Some(FieldValue::Amount(amount)) = self.get_mut(*field) {
                *amount = &*amount * multiplier;
            }
        }
    }

    /// Copy every field of `other` over this record
    pub fn merge(&mut self, other: Record) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Field, FieldValue> {
        self.0.iter()
    }
}

impl FromIterator<(Field, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (Field, FieldValue)>>(iter: T) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (Field, FieldValue);
    type IntoIter = btree_map::IntoIter<Field, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A keyed slot inside a subcategory bucket
///
/// Invoice-keyed categories hold one record per document number. Composite
/// keys (place of supply and rate, nil-rated supply type) hold a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Record(Record),
    Group(Vec<Record>),
}

impl Entry {
    pub fn records(&self) -> &[Record] {
        match self {
            Entry::Record(record) => std::slice::from_ref(record),
            Entry::Group(records) => records,
        }
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        match self {
            Entry::Record(record) => std::slice::from_mut(record),
            Entry::Group(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            Entry::Record(record) => vec![record],
            Entry::Group(records) => records,
        }
    }
}

/// Rows of one subcategory, keyed by document number or composite key
///
/// Keys keep the order they were first stored in, so a converted return
/// lists its documents the way the source did.
pub type SubCategoryRows = IndexMap<String, Entry>;

/// Internal representation of a GSTR-1 return: subcategory, then key, then row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InternalData(BTreeMap<GstrSubCategory, SubCategoryRows>);

impl InternalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Store a keyed record, replacing any previous row under the key
    pub fn insert(&mut self, sub_category: GstrSubCategory, key: String, record: Record) {
        self.0
            .entry(sub_category)
            .or_default()
            .insert(key, Entry::Record(record));
    }

    /// Append a record to the group stored under the key
    pub fn push(&mut self, sub_category: GstrSubCategory, key: String, record: Record) {
        let entry = self
            .0
            .entry(sub_category)
            .or_default()
            .entry(key)
            .or_insert_with(|| Entry::Group(Vec::new()));
        let mut records = std::mem::replace(entry, Entry::Group(Vec::new())).into_records();
        records.push(record);
        *entry = Entry::Group(records);
    }

    /// Replace the group stored under the key
    pub fn set_group(&mut self, sub_category: GstrSubCategory, key: String, records: Vec<Record>) {
        self.0
            .entry(sub_category)
            .or_default()
            .insert(key, Entry::Group(records));
    }

    pub fn get(&self, sub_category: GstrSubCategory) -> Option<&SubCategoryRows> {
        self.0.get(&sub_category)
    }

    pub fn get_mut(&mut self, sub_category: GstrSubCategory) -> Option<&mut SubCategoryRows> {
        self.0.get_mut(&sub_category)
    }

    pub fn remove(&mut self, sub_category: GstrSubCategory) -> Option<SubCategoryRows> {
        self.0.remove(&sub_category)
    }

    pub fn contains_key(&self, sub_category: GstrSubCategory, key: &str) -> bool {
        self.0
            .get(&sub_category)
            .is_some_and(|rows| rows.contains_key(key))
    }

    /// Subcategories present, in taxonomy order
    pub fn sub_categories(&self) -> Vec<GstrSubCategory> {
        self.0.keys().copied().collect()
    }

    /// Every record of a subcategory, groups flattened
    pub fn records(&self, sub_category: GstrSubCategory) -> impl Iterator<Item = &Record> {
        self.0
            .get(&sub_category)
            .into_iter()
            .flat_map(|rows| rows.values())
            .flat_map(|entry| entry.records().iter())
    }

    /// Merge another return into this one, key by key
    pub fn merge(&mut self, other: InternalData) {
        for (sub_category, rows) in other.0 {
            self.0.entry(sub_category).or_default().extend(rows);
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, GstrSubCategory, SubCategoryRows> {
        self.0.iter()
    }
}

impl IntoIterator for InternalData {
    type Item = (GstrSubCategory, SubCategoryRows);
    type IntoIter = btree_map::IntoIter<GstrSubCategory, SubCategoryRows>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors that can occur while mapping GSTR-1 data
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    #[error("Invalid structure for '{key}': expected {expected}")]
    InvalidStructure { key: String, expected: &'static str },
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
    #[error("Invalid amount for '{key}': {value}")]
    InvalidAmount { key: String, value: String },
    #[error("Unknown code for '{key}': {value}")]
    UnknownCode { key: String, value: String },
    #[error("Return log error: {0}")]
    ReturnLog(String),
    #[error("Master data error: {0}")]
    MasterData(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for mapping operations
pub type MapperResult<T> = Result<T, MapperError>;
