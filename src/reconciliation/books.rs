//! Books line items folded into internal GSTR-1 rows
//!
//! [`BooksDataMapper`] turns line items from sales documents into the same
//! internal rows the government JSON converts to, so the two can be compared.
//! Every currency amount is summed unrounded, then rounded once, and the
//! difference is booked on a [`RoundingLedger`]. [`Gstr1BooksData`] runs the
//! whole preparation for one return period.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use crate::config::{Gstr1Config, ReturnFilters};
use crate::gstr1::categories::hsn::hsn_key;
use crate::gstr1::taxonomy::{GstrCategory, GstrSubCategory};
use crate::reconciliation::quarterly::{process_for_quarterly, QuarterlyBuckets};
use crate::reconciliation::rounding::{round_amount, RoundingLedger};
use crate::tax::gst::{effective_rate, pos_rate_key, SupplyType, TaxSplit};
use crate::tax::uom::map_uom;
use crate::traits::{HsnDirectory, ReturnLogStore};
use crate::types::*;

/// Document type reported for every B2CS row
pub const B2CS_DOCUMENT_TYPE: &str = "OE";

/// Decimal places kept on summed HSN quantities
const QUANTITY_PRECISION: i64 = 2;

/// GST treatment of a line item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstTreatment {
    #[default]
    Taxable,
    #[serde(rename = "Nil-Rated")]
    NilRated,
    Exempted,
    #[serde(rename = "Non-GST")]
    NonGst,
    #[serde(rename = "Zero-Rated")]
    ZeroRated,
}

/// One line item of a sales document, with its invoice level details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookItem {
    pub invoice_no: String,
    pub posting_date: NaiveDate,
    /// Document type label, e.g. "Regular B2B" or "Inter-State supplies to registered persons"
    #[serde(default)]
    pub invoice_type: String,
    pub invoice_category: GstrCategory,
    pub invoice_sub_category: GstrSubCategory,
    pub hsn_sub_category: GstrSubCategory,
    #[serde(default)]
    pub is_return: bool,
    #[serde(default)]
    pub is_debit_note: bool,
    #[serde(default)]
    pub is_reverse_charge: bool,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub billing_address_gstin: Option<String>,
    /// Place of supply as "NN-State"
    #[serde(default)]
    pub place_of_supply: String,
    #[serde(default)]
    pub invoice_total: BigDecimal,
    #[serde(default)]
    pub gst_treatment: GstTreatment,
    #[serde(default)]
    pub gst_rate: BigDecimal,
    #[serde(default)]
    pub gst_hsn_code: String,
    /// Unit quantity code, e.g. `NOS`
    #[serde(default)]
    pub uom: String,
    #[serde(default)]
    pub qty: BigDecimal,
    #[serde(default)]
    pub taxable_value: BigDecimal,
    #[serde(default)]
    pub igst_amount: BigDecimal,
    #[serde(default)]
    pub cgst_amount: BigDecimal,
    #[serde(default)]
    pub sgst_amount: BigDecimal,
    #[serde(default)]
    pub total_cess_amount: BigDecimal,
    #[serde(default)]
    pub ecommerce_gstin: Option<String>,
    #[serde(default)]
    pub shipping_bill_number: Option<String>,
    #[serde(default)]
    pub shipping_bill_date: Option<NaiveDate>,
    #[serde(default)]
    pub port_code: Option<String>,
}

impl BookItem {
    /// Empty taxable line item for a document
    ///
    /// HSN rows go to the B2B summary for registered categories and to the
    /// B2C summary otherwise.
    pub fn new(invoice_no: &str, posting_date: NaiveDate, sub_category: GstrSubCategory) -> Self {
        let category = sub_category.category();
        let hsn_sub_category = match category {
            GstrCategory::B2b | GstrCategory::Cdnr => GstrSubCategory::HsnB2b,
            _ => GstrSubCategory::HsnB2c,
        };

        Self {
            invoice_no: invoice_no.to_string(),
            posting_date,
            invoice_type: String::new(),
            invoice_category: category,
            invoice_sub_category: sub_category,
            hsn_sub_category,
            is_return: false,
            is_debit_note: false,
            is_reverse_charge: false,
            customer_name: None,
            billing_address_gstin: None,
            place_of_supply: String::new(),
            invoice_total: BigDecimal::zero(),
            gst_treatment: GstTreatment::Taxable,
            gst_rate: BigDecimal::zero(),
            gst_hsn_code: String::new(),
            uom: String::new(),
            qty: BigDecimal::zero(),
            taxable_value: BigDecimal::zero(),
            igst_amount: BigDecimal::zero(),
            cgst_amount: BigDecimal::zero(),
            sgst_amount: BigDecimal::zero(),
            total_cess_amount: BigDecimal::zero(),
            ecommerce_gstin: None,
            shipping_bill_number: None,
            shipping_bill_date: None,
            port_code: None,
        }
    }

    pub fn transaction_type(&self) -> &'static str {
        if self.is_debit_note {
            "Debit Note"
        } else if self.is_return {
            "Credit Note"
        } else {
            "Invoice"
        }
    }

    /// Item amount for one of [`Field::ITEM_AMOUNTS`]
    pub fn amount(&self, field: Field) -> Option<&BigDecimal> {
        match field {
            Field::TaxableValue => Some(&self.taxable_value),
            Field::IgstAmount => Some(&self.igst_amount),
            Field::CgstAmount => Some(&self.cgst_amount),
            Field::SgstAmount => Some(&self.sgst_amount),
            Field::CessAmount => Some(&self.total_cess_amount),
            _ => None,
        }
    }
}

/// Advance received against, or adjusted into, an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceEntry {
    /// Payment document name
    pub name: String,
    pub party: String,
    pub posting_date: NaiveDate,
    pub place_of_supply: String,
    pub taxable_value: BigDecimal,
    /// Total GST, before the CGST/SGST or IGST split
    pub tax_amount: BigDecimal,
    #[serde(default)]
    pub cess_amount: BigDecimal,
    /// Invoice the advance was adjusted against
    #[serde(default)]
    pub reference_name: Option<String>,
}

/// A serial range of issued documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSeries {
    pub nature_of_document: String,
    pub from_serial_no: String,
    pub to_serial_no: String,
    pub total_issued: i64,
    #[serde(default)]
    pub total_draft: i64,
    #[serde(default)]
    pub cancelled: i64,
    pub total_submitted: i64,
}

/// Everything the books provide for one return period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksInput {
    pub items: Vec<BookItem>,
    pub advances_received: Vec<AdvanceEntry>,
    pub advances_adjusted: Vec<AdvanceEntry>,
    pub documents_issued: Vec<DocumentSeries>,
}

/// Books data in internal format, ready to compare with the portal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BooksData {
    pub data: InternalData,
    /// Sum of `amount - rounded` per invoice total field
    pub rounding_difference: Record,
    /// Rows of month 1 and 2 that are reported with month 3
    pub excluded_docs_for_quarterly: Vec<Record>,
    /// Rows of month 3 already filed in month 1 or 2
    pub already_included_docs_for_quarterly: Vec<Record>,
}

fn group_by_rate<'a>(items: &[&'a BookItem]) -> BTreeMap<BigDecimal, Vec<&'a BookItem>> {
    let mut grouped: BTreeMap<BigDecimal, Vec<&'a BookItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.gst_rate.clone()).or_default().push(*item);
    }
    grouped
}

fn sum_amount(items: &[&BookItem], field: Field) -> BigDecimal {
    items.iter().filter_map(|item| item.amount(field)).sum()
}

/// Document level fields shared by every row of a document
fn document_header(doc: &BookItem) -> Record {
    let mut record = Record::new()
        .with(Field::TransactionType, doc.transaction_type())
        .with(Field::DocumentNumber, doc.invoice_no.as_str())
        .with(Field::DocumentDate, doc.posting_date)
        .with(Field::DocumentValue, &doc.invoice_total)
        .with(Field::PlaceOfSupply, doc.place_of_supply.as_str());

    if let Some(gstin) = &doc.billing_address_gstin {
        record.insert(Field::CustomerGstin, gstin.as_str());
    }
    if let Some(name) = &doc.customer_name {
        record.insert(Field::CustomerName, name.as_str());
    }
    record
}

/// Folds book line items into internal rows and keeps the rounding ledger
#[derive(Debug)]
pub struct BooksDataMapper {
    precision: i64,
    company_gstin: String,
    ledger: RoundingLedger,
}

impl BooksDataMapper {
    pub fn new(precision: i64, company_gstin: &str) -> Self {
        Self {
            precision,
            company_gstin: company_gstin.to_string(),
            ledger: RoundingLedger::new(),
        }
    }

    pub fn ledger(&self) -> &RoundingLedger {
        &self.ledger
    }

    /// Invoice row with rate-wise items (B2B family, B2CL, exports, credit/debit notes)
    ///
    /// `items` are the line items of one document.
    pub fn process_invoice_no_key(&mut self, items: &[&BookItem]) -> Option<Record> {
        let doc = *items.first()?;

        let mut invoice = document_header(doc)
            .with(Field::ReverseCharge, if doc.is_reverse_charge { "Y" } else { "N" })
            .with(Field::DocumentType, doc.invoice_type.as_str())
            .with(Field::DiffPercentage, 0);

        if let Some(port_code) = &doc.port_code {
            invoice.insert(Field::ShippingPortCode, port_code.as_str());
        }
        if let Some(bill_number) = &doc.shipping_bill_number {
            invoice.insert(Field::ShippingBillNumber, bill_number.as_str());
        }
        if let Some(bill_date) = doc.shipping_bill_date {
            invoice.insert(Field::ShippingBillDate, bill_date);
        }
        for field in Field::TOTAL_AMOUNTS {
            invoice.insert(field, BigDecimal::zero());
        }

        let mut line_items = Vec::new();
        for (rate, rate_items) in group_by_rate(items) {
            let mut line_item = Record::new().with(Field::TaxRate, rate);
            for (field, total_field) in Field::ITEM_AMOUNTS.into_iter().zip(Field::TOTAL_AMOUNTS) {
                let rounded = self.ledger.round(
                    total_field,
                    &sum_amount(&rate_items, field),
                    self.precision,
                );
                invoice.add_amount(total_field, &rounded);
                line_item.insert(field, rounded);
            }
            line_items.push(line_item);
        }

        for field in Field::TOTAL_AMOUNTS {
            let total = round_amount(&invoice.amount_or_zero(field), self.precision);
            self.ledger.add_invoice_total(doc.hsn_sub_category, field, &total);
            invoice.insert(field, total);
        }
        invoice.insert(Field::Items, line_items);

        Some(invoice)
    }

    /// Nil-rated, exempted and non-GST row of one document
    pub fn process_nil_exempt(&mut self, items: &[&BookItem]) -> Option<Record> {
        let doc = *items.first()?;

        let mut nil_rated = BigDecimal::zero();
        let mut exempted = BigDecimal::zero();
        let mut non_gst = BigDecimal::zero();
        for item in items {
            match item.gst_treatment {
                GstTreatment::NilRated => nil_rated += &item.taxable_value,
                GstTreatment::Exempted => exempted += &item.taxable_value,
                GstTreatment::NonGst => non_gst += &item.taxable_value,
                GstTreatment::Taxable | GstTreatment::ZeroRated => {}
            }
        }

        let taxable = self.ledger.round(
            Field::TotalTaxableValue,
            &sum_amount(items, Field::TaxableValue),
            self.precision,
        );
        self.ledger
            .add_invoice_total(doc.hsn_sub_category, Field::TotalTaxableValue, &taxable);

        let record = document_header(doc)
            .with(Field::ReverseCharge, if doc.is_reverse_charge { "Y" } else { "N" })
            .with(Field::DocumentType, doc.invoice_type.as_str())
            .with(Field::TotalTaxableValue, taxable)
            .with(Field::NilRatedAmount, nil_rated)
            .with(Field::ExemptedAmount, exempted)
            .with(Field::NonGstAmount, non_gst);
        Some(record)
    }

    /// One B2CS row per rate of a document, keyed by place of supply and rate
    pub fn process_b2cs(&mut self, items: &[&BookItem]) -> Vec<(String, Record)> {
        let Some(doc) = items.first().copied() else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for (rate, rate_items) in group_by_rate(items) {
            let mut row = document_header(doc)
                .with(Field::DocumentType, B2CS_DOCUMENT_TYPE)
                .with(Field::TaxRate, &rate);
            if let Some(gstin) = &doc.ecommerce_gstin {
                row.insert(Field::EcommerceGstin, gstin.as_str());
            }

            for (field, total_field) in Field::ITEM_AMOUNTS.into_iter().zip(Field::TOTAL_AMOUNTS) {
                let rounded = self.ledger.round(
                    total_field,
                    &sum_amount(&rate_items, field),
                    self.precision,
                );
                self.ledger
                    .add_invoice_total(doc.hsn_sub_category, total_field, &rounded);
                row.insert(total_field, rounded);
            }

            rows.push((pos_rate_key(&doc.place_of_supply, &rate), row));
        }
        rows
    }

    /// HSN rows of one HSN subcategory, keyed by HSN code, UOM and rate
    pub fn process_hsn_summary(
        &self,
        hsn_sub_category: GstrSubCategory,
        items: &[&BookItem],
        descriptions: &HashMap<String, String>,
    ) -> SubCategoryRows {
        let mut grouped: BTreeMap<String, Vec<&BookItem>> = BTreeMap::new();
        for item in items {
            grouped
                .entry(hsn_key(&item.gst_hsn_code, &item.uom, &item.gst_rate))
                .or_default()
                .push(*item);
        }

        grouped
            .into_iter()
            .filter_map(|(key, rows)| {
                let first = *rows.first()?;
                let mut record = Record::new()
                    .with(Field::DocumentType, hsn_sub_category.label())
                    .with(Field::HsnCode, first.gst_hsn_code.as_str())
                    .with(Field::Uom, map_uom(&first.uom, None))
                    .with(Field::TaxRate, &first.gst_rate)
                    .with(
                        Field::Quantity,
                        round_amount(
                            &rows.iter().map(|item| &item.qty).sum::<BigDecimal>(),
                            QUANTITY_PRECISION,
                        ),
                    );
                if let Some(description) = descriptions.get(&first.gst_hsn_code) {
                    record.insert(Field::Description, description.as_str());
                }

                let mut document_value = BigDecimal::zero();
                for (field, total_field) in Field::ITEM_AMOUNTS.into_iter().zip(Field::TOTAL_AMOUNTS) {
                    let total = round_amount(&sum_amount(&rows, field), self.precision);
                    document_value += &total;
                    record.insert(total_field, total);
                }
                record.insert(
                    Field::DocumentValue,
                    round_amount(&document_value, self.precision),
                );

                Some((key, Entry::Record(record)))
            })
            .collect()
    }

    /// Make HSN rows add up to the rounded invoice totals of their subcategory
    pub fn adjust_hsn_totals(&self, hsn_sub_category: GstrSubCategory, rows: &mut SubCategoryRows) {
        self.ledger
            .adjust_hsn_totals(hsn_sub_category, rows, self.precision);
    }

    /// Document-issued row, keyed by nature and first serial number
    pub fn process_document_issued(&self, series: &DocumentSeries) -> (String, Record) {
        let key = format!("{} - {}", series.nature_of_document, series.from_serial_no);
        let record = Record::new()
            .with(Field::DocumentType, series.nature_of_document.as_str())
            .with(Field::FromSrNo, series.from_serial_no.as_str())
            .with(Field::ToSrNo, series.to_serial_no.as_str())
            .with(Field::TotalCount, series.total_issued)
            .with(Field::DraftCount, series.total_draft)
            .with(Field::CancelledCount, series.cancelled)
            .with(Field::NetIssue, series.total_submitted);
        (key, record)
    }

    /// Advance row, keyed by place of supply and the rate implied by its tax
    ///
    /// `multiplier` is `1` for advances received and `-1` for adjustments.
    pub fn process_advance(&self, entry: &AdvanceEntry, multiplier: &BigDecimal) -> (String, Record) {
        let tax_rate = effective_rate(&entry.tax_amount, &entry.taxable_value);
        let key = pos_rate_key(&entry.place_of_supply, &tax_rate);

        let split = TaxSplit::for_supply(
            &entry.tax_amount,
            SupplyType::between(&entry.place_of_supply, &self.company_gstin),
        );

        let mut record = Record::new()
            .with(Field::CustomerName, entry.party.as_str())
            .with(Field::DocumentNumber, entry.name.as_str())
            .with(Field::DocumentDate, entry.posting_date)
            .with(Field::PlaceOfSupply, entry.place_of_supply.as_str())
            .with(Field::TaxRate, tax_rate)
            .with(Field::TotalTaxableValue, &entry.taxable_value * multiplier)
            .with(Field::TotalIgstAmount, &split.igst_amount * multiplier)
            .with(Field::TotalCgstAmount, &split.cgst_amount * multiplier)
            .with(Field::TotalSgstAmount, &split.sgst_amount * multiplier)
            .with(Field::TotalCessAmount, &entry.cess_amount * multiplier);

        if let Some(reference) = &entry.reference_name {
            record.insert(Field::AgainstVoucher, reference.as_str());
        }
        (key, record)
    }
}

/// Line items of each document, grouped by subcategory and document number
type DocumentItems<'a> = BTreeMap<(GstrSubCategory, String), Vec<&'a BookItem>>;

/// Prepares the internal rows of one return period from books data
pub struct Gstr1BooksData<'a> {
    filters: ReturnFilters,
    config: Gstr1Config,
    hsn_directory: &'a dyn HsnDirectory,
    return_logs: &'a dyn ReturnLogStore,
}

impl<'a> Gstr1BooksData<'a> {
    pub fn new(
        filters: ReturnFilters,
        config: Gstr1Config,
        hsn_directory: &'a dyn HsnDirectory,
        return_logs: &'a dyn ReturnLogStore,
    ) -> MapperResult<Self> {
        filters.validate()?;
        Ok(Self {
            filters,
            config,
            hsn_directory,
            return_logs,
        })
    }

    fn mapper(&self) -> BooksDataMapper {
        BooksDataMapper::new(self.config.precision, &self.filters.company_gstin)
    }

    /// Internal rows for every category, with rounding difference and quarterly buckets
    pub fn prepare_mapped_data(&self, input: &BooksInput) -> MapperResult<BooksData> {
        let mut mapper = self.mapper();
        let mut data = InternalData::new();

        let mut documents: DocumentItems<'_> = BTreeMap::new();
        for item in &input.items {
            if item.taxable_value.is_zero() {
                continue;
            }
            documents
                .entry((item.invoice_sub_category, item.invoice_no.clone()))
                .or_default()
                .push(item);
        }

        for ((sub_category, invoice_no), items) in &documents {
            match items[0].invoice_category {
                GstrCategory::B2b
                | GstrCategory::Exp
                | GstrCategory::B2cl
                | GstrCategory::Cdnr
                | GstrCategory::Cdnur => {
                    if let Some(invoice) = mapper.process_invoice_no_key(items) {
                        data.insert(*sub_category, invoice_no.clone(), invoice);
                    }
                }
                GstrCategory::NilExempt => {
                    if let Some(row) = mapper.process_nil_exempt(items) {
                        data.push(*sub_category, items[0].invoice_type.clone(), row);
                    }
                }
                GstrCategory::B2cs => {
                    for (key, row) in mapper.process_b2cs(items) {
                        data.push(*sub_category, key, row);
                    }
                }
                category => {
                    debug!("Skipping books document '{}' of category {:?}", invoice_no, category);
                }
            }
        }

        self.add_advances(&mapper, input, &mut data);
        self.add_documents_issued(&mapper, input, &mut data);
        data.merge(self.hsn_rows(&mapper, &input.items, true)?);

        let QuarterlyBuckets {
            excluded_docs,
            already_included_docs,
        } = process_for_quarterly(&mut data, &self.filters, self.return_logs)?;

        let rounding_difference = mapper
            .ledger()
            .rounding_difference(self.config.currency_precision);
        info!(
            "Prepared books data for {} with {} subcategories",
            self.filters.period(),
            data.sub_categories().len()
        );
        debug!("Rounding difference: {:?}", rounding_difference);

        Ok(BooksData {
            data,
            rounding_difference,
            excluded_docs_for_quarterly: excluded_docs,
            already_included_docs_for_quarterly: already_included_docs,
        })
    }

    /// HSN summary rows only, without adjusting them to invoice totals
    pub fn prepare_hsn_data(&self, items: &[BookItem]) -> MapperResult<InternalData> {
        self.hsn_rows(&self.mapper(), items, false)
    }

    fn hsn_rows(
        &self,
        mapper: &BooksDataMapper,
        items: &[BookItem],
        adjust: bool,
    ) -> MapperResult<InternalData> {
        let codes: Vec<String> = items
            .iter()
            .map(|item| item.gst_hsn_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let descriptions = if codes.is_empty() {
            HashMap::new()
        } else {
            self.hsn_directory.descriptions(&codes)?
        };

        let mut by_sub_category: BTreeMap<GstrSubCategory, Vec<&BookItem>> = BTreeMap::new();
        for item in items {
            by_sub_category.entry(item.hsn_sub_category).or_default().push(item);
        }

        let mut output = InternalData::new();
        for (hsn_sub_category, items) in by_sub_category {
            let mut rows = mapper.process_hsn_summary(hsn_sub_category, &items, &descriptions);
            if adjust {
                mapper.adjust_hsn_totals(hsn_sub_category, &mut rows);
            }
            for (key, entry) in rows {
                for record in entry.into_records() {
                    output.insert(hsn_sub_category, key.clone(), record);
                }
            }
        }
        Ok(output)
    }

    fn add_advances(&self, mapper: &BooksDataMapper, input: &BooksInput, data: &mut InternalData) {
        let sections = [
            (GstrSubCategory::At, &input.advances_received, BigDecimal::from(1)),
            (GstrSubCategory::Txp, &input.advances_adjusted, BigDecimal::from(-1)),
        ];
        for (sub_category, entries, multiplier) in sections {
            for entry in entries {
                let (key, record) = mapper.process_advance(entry, &multiplier);
                data.push(sub_category, key, record);
            }
        }
    }

    fn add_documents_issued(&self, mapper: &BooksDataMapper, input: &BooksInput, data: &mut InternalData) {
        for series in &input.documents_issued {
            let (key, record) = mapper.process_document_issued(series);
            if data.contains_key(GstrSubCategory::DocIssue, &key) {
                continue;
            }
            data.insert(GstrSubCategory::DocIssue, key, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::{MemoryHsnDirectory, MemoryReturnLogs};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn b2b_item(invoice_no: &str, rate: &str, taxable: &str, igst: &str) -> BookItem {
        BookItem {
            invoice_type: "Regular B2B".to_string(),
            billing_address_gstin: Some("06AAACE2100F1ZB".to_string()),
            customer_name: Some("Test Customer".to_string()),
            place_of_supply: "06-Haryana".to_string(),
            gst_hsn_code: "61149090".to_string(),
            uom: "NOS".to_string(),
            qty: dec("1"),
            gst_rate: dec(rate),
            taxable_value: dec(taxable),
            igst_amount: dec(igst),
            ..BookItem::new(invoice_no, date(), GstrSubCategory::B2bRegular)
        }
    }

    #[test]
    fn test_invoice_items_are_grouped_by_rate() {
        let first = b2b_item("INV-1", "5", "100.004", "5.0002");
        let second = b2b_item("INV-1", "5", "50", "2.5");
        let third = b2b_item("INV-1", "18", "10", "1.8");
        let mut mapper = BooksDataMapper::new(2, "24AANFA2641L1ZF");

        let invoice = mapper
            .process_invoice_no_key(&[&first, &second, &third])
            .unwrap();

        assert_eq!(invoice.text(Field::TransactionType), Some("Invoice"));
        assert_eq!(invoice.text(Field::ReverseCharge), Some("N"));
        assert_eq!(invoice.items().len(), 2);
        assert_eq!(invoice.items()[0].amount(Field::TaxableValue), Some(&dec("150")));
        assert_eq!(invoice.amount(Field::TotalTaxableValue), Some(&dec("160")));
        assert_eq!(invoice.amount(Field::TotalIgstAmount), Some(&dec("9.3")));
        assert_eq!(mapper.ledger().difference(Field::TotalTaxableValue), dec("0.004"));
        assert_eq!(
            mapper
                .ledger()
                .invoice_totals(GstrSubCategory::HsnB2b)
                .unwrap()[&Field::TotalTaxableValue],
            dec("160")
        );
    }

    #[test]
    fn test_nil_exempt_splits_by_treatment() {
        let nil_rated = BookItem {
            gst_treatment: GstTreatment::NilRated,
            taxable_value: dec("100"),
            invoice_type: "Intra-State supplies to unregistered persons".to_string(),
            ..BookItem::new("INV-2", date(), GstrSubCategory::NilExempt)
        };
        let exempted = BookItem {
            gst_treatment: GstTreatment::Exempted,
            taxable_value: dec("25.556"),
            ..nil_rated.clone()
        };
        let mut mapper = BooksDataMapper::new(2, "24AANFA2641L1ZF");

        let row = mapper.process_nil_exempt(&[&nil_rated, &exempted]).unwrap();

        assert_eq!(row.amount(Field::NilRatedAmount), Some(&dec("100")));
        assert_eq!(row.amount(Field::ExemptedAmount), Some(&dec("25.556")));
        assert_eq!(row.amount(Field::NonGstAmount), Some(&BigDecimal::zero()));
        assert_eq!(row.amount(Field::TotalTaxableValue), Some(&dec("125.56")));
        assert_eq!(mapper.ledger().difference(Field::TotalTaxableValue), dec("-0.004"));
    }

    #[test]
    fn test_b2cs_rows_per_rate() {
        let item = BookItem {
            place_of_supply: "05-Uttarakhand".to_string(),
            gst_rate: dec("5"),
            taxable_value: dec("110"),
            igst_amount: dec("5.5"),
            ..BookItem::new("INV-3", date(), GstrSubCategory::B2cs)
        };
        let mut mapper = BooksDataMapper::new(2, "24AANFA2641L1ZF");

        let rows = mapper.process_b2cs(&[&item]);

        assert_eq!(rows.len(), 1);
        let (key, row) = &rows[0];
        assert_eq!(key, "05-Uttarakhand - 5.0");
        assert_eq!(row.text(Field::DocumentType), Some("OE"));
        assert_eq!(row.amount(Field::TotalIgstAmount), Some(&dec("5.5")));
    }

    #[test]
    fn test_hsn_quantity_is_rounded() {
        let first = BookItem {
            qty: dec("1.004"),
            ..b2b_item("INV-1", "5", "100", "5")
        };
        let second = BookItem {
            qty: dec("2.003"),
            ..b2b_item("INV-2", "5", "50", "2.5")
        };
        let mapper = BooksDataMapper::new(2, "24AANFA2641L1ZF");

        let rows = mapper.process_hsn_summary(GstrSubCategory::HsnB2b, &[&first, &second], &HashMap::new());

        assert_eq!(rows.len(), 1);
        let (_, entry) = rows.get_index(0).unwrap();
        let row = &entry.records()[0];
        assert_eq!(row.amount(Field::Quantity), Some(&dec("3.01")));
        assert_eq!(row.amount(Field::TotalTaxableValue), Some(&dec("150")));
    }

    #[test]
    fn test_advances_split_by_place_of_supply() {
        let mapper = BooksDataMapper::new(2, "24AANFA2641L1ZF");
        let intra = AdvanceEntry {
            name: "PE-1".to_string(),
            party: "Test Customer".to_string(),
            posting_date: date(),
            place_of_supply: "24-Gujarat".to_string(),
            taxable_value: dec("1000"),
            tax_amount: dec("180"),
            cess_amount: BigDecimal::zero(),
            reference_name: None,
        };
        let inter = AdvanceEntry {
            place_of_supply: "05-Uttarakhand".to_string(),
            reference_name: Some("INV-9".to_string()),
            ..intra.clone()
        };

        let (key, received) = mapper.process_advance(&intra, &BigDecimal::from(1));
        assert_eq!(key, "24-Gujarat - 18.0");
        assert_eq!(received.amount(Field::TotalCgstAmount), Some(&dec("90")));
        assert_eq!(received.amount(Field::TotalSgstAmount), Some(&dec("90")));
        assert_eq!(received.amount(Field::TotalIgstAmount), Some(&BigDecimal::zero()));

        let (key, adjusted) = mapper.process_advance(&inter, &BigDecimal::from(-1));
        assert_eq!(key, "05-Uttarakhand - 18.0");
        assert_eq!(adjusted.amount(Field::TotalIgstAmount), Some(&dec("-180")));
        assert_eq!(adjusted.amount(Field::TotalTaxableValue), Some(&dec("-1000")));
        assert_eq!(adjusted.text(Field::AgainstVoucher), Some("INV-9"));
    }

    #[test]
    fn test_prepare_mapped_data() {
        let hsn_directory = MemoryHsnDirectory::new().with_description("61149090", "Garments");
        let return_logs = MemoryReturnLogs::new();
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 3);
        let books = Gstr1BooksData::new(filters, Gstr1Config::default(), &hsn_directory, &return_logs)
            .unwrap();

        let free_sample = BookItem {
            gst_hsn_code: "61149090".to_string(),
            uom: "NOS".to_string(),
            qty: dec("2"),
            ..BookItem::new("INV-2", date(), GstrSubCategory::B2bRegular)
        };
        let input = BooksInput {
            items: vec![b2b_item("INV-1", "5", "10000", "500"), free_sample],
            documents_issued: vec![DocumentSeries {
                nature_of_document: "Invoices for outward supply".to_string(),
                from_serial_no: "INV-1".to_string(),
                to_serial_no: "INV-2".to_string(),
                total_issued: 2,
                total_draft: 0,
                cancelled: 0,
                total_submitted: 2,
            }],
            ..Default::default()
        };

        let prepared = books.prepare_mapped_data(&input).unwrap();

        assert!(prepared.data.contains_key(GstrSubCategory::B2bRegular, "INV-1"));
        assert!(!prepared.data.contains_key(GstrSubCategory::B2bRegular, "INV-2"));
        assert!(prepared
            .data
            .contains_key(GstrSubCategory::DocIssue, "Invoices for outward supply - INV-1"));

        let hsn: Vec<&Record> = prepared.data.records(GstrSubCategory::HsnB2b).collect();
        assert_eq!(hsn.len(), 2);
        assert_eq!(hsn[0].text(Field::Description), Some("Garments"));
        assert_eq!(
            hsn.iter()
                .map(|row| row.amount_or_zero(Field::TotalTaxableValue))
                .sum::<BigDecimal>(),
            dec("10000")
        );
        assert!(prepared.excluded_docs_for_quarterly.is_empty());
    }

    #[test]
    fn test_invalid_filters_are_rejected() {
        let hsn_directory = MemoryHsnDirectory::new();
        let return_logs = MemoryReturnLogs::new();
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 13);

        assert!(
            Gstr1BooksData::new(filters, Gstr1Config::default(), &hsn_directory, &return_logs)
                .is_err()
        );
    }
}
