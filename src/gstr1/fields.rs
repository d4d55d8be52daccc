//! Government field abbreviations and the lookup tables built on them
//!
//! Every table here is immutable and read in both directions, so mappers
//! never need a reversed copy of a dictionary.

use crate::types::Field;

/// Keys used by the government GSTR-1 JSON schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GovField {
    CustomerGstin,
    EcommerceGstin,
    DocDate,
    DocNumber,
    DocValue,
    Pos,
    DiffPercentage,
    ReverseCharge,
    TaxableValue,
    Items,
    Igst,
    Cgst,
    Sgst,
    Cess,
    TaxRate,
    ItemDetails,
    ShippingBillNumber,
    ShippingBillDate,
    ShippingPortCode,
    SupplyType,
    NetTaxableValue,
    ExportType,
    Invoices,
    Notes,
    NoteType,
    NoteNumber,
    NoteDate,
    InvoiceType,
    Type,
    Exempted,
    NilRated,
    NonGst,
    HsnData,
    HsnB2b,
    HsnB2c,
    HsnCode,
    Description,
    Uom,
    Quantity,
    AdvanceAmount,
    Index,
    DocIssueDetails,
    DocIssueNumber,
    DocIssueList,
    FromSrNo,
    ToSrNo,
    TotalCount,
    CancelledCount,
    NetIssue,
    Tcs,
    PayableRcm,
    SupecomIgst,
    SupecomCgst,
    SupecomSgst,
    SupecomCess,
    Flag,
    ErrorCode,
    ErrorMessage,
    SectionName,
    SubSections,
    TotalRecords,
    TotalDocValue,
    TotalIgst,
    TotalCgst,
    TotalSgst,
    TotalCess,
    TotalTaxableValue,
    ActualDocValue,
    ActualIgst,
    ActualCgst,
    ActualSgst,
    ActualCess,
    ActualTaxableValue,
    TotalExempted,
    TotalNonGst,
    TotalNilRated,
    TotalDocIssued,
    TotalDocCancelled,
    NetDocIssued,
}

impl GovField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovField::CustomerGstin => "ctin",
            GovField::EcommerceGstin => "etin",
            GovField::DocDate => "idt",
            GovField::DocNumber => "inum",
            GovField::DocValue => "val",
            GovField::Pos => "pos",
            GovField::DiffPercentage => "diff_percent",
            GovField::ReverseCharge => "rchrg",
            GovField::TaxableValue => "txval",
            GovField::Items => "itms",
            GovField::Igst => "iamt",
            GovField::Cgst => "camt",
            GovField::Sgst => "samt",
            GovField::Cess => "csamt",
            GovField::TaxRate => "rt",
            GovField::ItemDetails => "itm_det",
            GovField::ShippingBillNumber => "sbnum",
            GovField::ShippingBillDate => "sbdt",
            GovField::ShippingPortCode => "sbpcode",
            GovField::SupplyType => "sply_ty",
            GovField::NetTaxableValue => "suppval",
            GovField::ExportType => "exp_typ",
            GovField::Invoices => "inv",
            GovField::Notes => "nt",
            GovField::NoteType => "ntty",
            GovField::NoteNumber => "nt_num",
            GovField::NoteDate => "nt_dt",
            GovField::InvoiceType => "inv_typ",
            GovField::Type => "typ",
            GovField::Exempted => "expt_amt",
            GovField::NilRated => "nil_amt",
            GovField::NonGst => "ngsup_amt",
            GovField::HsnData => "data",
            GovField::HsnB2b => "hsn_b2b",
            GovField::HsnB2c => "hsn_b2c",
            GovField::HsnCode => "hsn_sc",
            GovField::Description => "desc",
            GovField::Uom => "uqc",
            GovField::Quantity => "qty",
            GovField::AdvanceAmount => "ad_amt",
            GovField::Index => "num",
            GovField::DocIssueDetails => "doc_det",
            GovField::DocIssueNumber => "doc_num",
            GovField::DocIssueList => "docs",
            GovField::FromSrNo => "from",
            GovField::ToSrNo => "to",
            GovField::TotalCount => "totnum",
            GovField::CancelledCount => "cancel",
            GovField::NetIssue => "net_issue",
            GovField::Tcs => "clttx",
            GovField::PayableRcm => "paytx",
            GovField::SupecomIgst => "igst",
            GovField::SupecomCgst => "cgst",
            GovField::SupecomSgst => "sgst",
            GovField::SupecomCess => "cess",
            GovField::Flag => "flag",
            GovField::ErrorCode => "error_cd",
            GovField::ErrorMessage => "error_msg",
            GovField::SectionName => "sec_nm",
            GovField::SubSections => "sub_sections",
            GovField::TotalRecords => "ttl_rec",
            GovField::TotalDocValue => "ttl_val",
            GovField::TotalIgst => "ttl_igst",
            GovField::TotalCgst => "ttl_cgst",
            GovField::TotalSgst => "ttl_sgst",
            GovField::TotalCess => "ttl_cess",
            GovField::TotalTaxableValue => "ttl_tax",
            GovField::ActualDocValue => "act_val",
            GovField::ActualIgst => "act_igst",
            GovField::ActualCgst => "act_cgst",
            GovField::ActualSgst => "act_sgst",
            GovField::ActualCess => "act_cess",
            GovField::ActualTaxableValue => "act_tax",
            GovField::TotalExempted => "ttl_expt_amt",
            GovField::TotalNonGst => "ttl_ngsup_amt",
            GovField::TotalNilRated => "ttl_nilsup_amt",
            GovField::TotalDocIssued => "ttl_doc_issued",
            GovField::TotalDocCancelled => "ttl_doc_cancelled",
            GovField::NetDocIssued => "net_doc_issued",
        }
    }

    /// Amount fields emitted as decimals rounded to two places
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            GovField::DocValue
                | GovField::TaxableValue
                | GovField::DiffPercentage
                | GovField::Igst
                | GovField::Cgst
                | GovField::Sgst
                | GovField::Cess
                | GovField::NetTaxableValue
                | GovField::Exempted
                | GovField::NilRated
                | GovField::NonGst
                | GovField::Quantity
                | GovField::AdvanceAmount
        )
    }

    /// Fields left out of government output when zero
    pub fn discard_if_zero(&self) -> bool {
        matches!(self, GovField::DiffPercentage)
    }

    /// Fields carrying `dd-mm-yyyy` dates
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            GovField::DocDate | GovField::NoteDate | GovField::ShippingBillDate
        )
    }
}

/// Bidirectional table between government keys and internal fields
///
/// Lookups go through the same slice in either direction. When a field is
/// listed twice the first pair wins for the government side.
#[derive(Debug)]
pub struct FieldMap {
    pairs: &'static [(GovField, Field)],
}

impl FieldMap {
    pub const fn new(pairs: &'static [(GovField, Field)]) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &'static [(GovField, Field)] {
        self.pairs
    }

    pub fn field_for(&self, key: GovField) -> Option<Field> {
        self.pairs
            .iter()
            .find(|(gov, _)| *gov == key)
            .map(|(_, field)| *field)
    }

    pub fn gov_for(&self, field: Field) -> Option<GovField> {
        self.pairs
            .iter()
            .find(|(_, internal)| *internal == field)
            .map(|(gov, _)| *gov)
    }
}

/// Code and label pairs, e.g. `R` and `Regular B2B`
///
/// Values missing from the table are passed through unchanged.
#[derive(Debug)]
pub struct LabelMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl LabelMap {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    pub fn label<'a>(&self, code: &'a str) -> &'a str {
        self.try_label(code).unwrap_or(code)
    }

    pub fn code<'a>(&self, label: &'a str) -> &'a str {
        self.try_code(label).unwrap_or(label)
    }

    pub fn try_label(&self, code: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    pub fn try_code(&self, label: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(code, _)| *code)
    }
}

/// Invoice types shared by B2B and CDNR
pub static INVOICE_TYPES: LabelMap = LabelMap::new(&[
    ("R", "Regular B2B"),
    ("SEWP", "SEZ supplies with payment"),
    ("SEWOP", "SEZ supplies without payment"),
    ("DE", "Deemed Exports"),
]);

/// Credit and debit note types
pub static NOTE_TYPES: LabelMap = LabelMap::new(&[("C", "Credit Note"), ("D", "Debit Note")]);
