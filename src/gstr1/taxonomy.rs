//! GSTR-1 categories, subcategories and government JSON sections

use serde::{Deserialize, Serialize};

/// Top level GSTR-1 categories, in return-table order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum GstrCategory {
    #[serde(rename = "B2B, SEZ, DE")]
    B2b,
    #[serde(rename = "B2C (Large)")]
    B2cl,
    #[serde(rename = "Exports")]
    Exp,
    #[serde(rename = "B2C (Others)")]
    B2cs,
    #[serde(rename = "Nil-Rated, Exempted, Non-GST")]
    NilExempt,
    #[serde(rename = "Credit/Debit Notes (Registered)")]
    Cdnr,
    #[serde(rename = "Credit/Debit Notes (Unregistered)")]
    Cdnur,
    #[serde(rename = "Advances Received")]
    At,
    #[serde(rename = "Advances Adjusted")]
    Txp,
    #[serde(rename = "Supplies made through E-commerce Operators")]
    Supecom,
    #[serde(rename = "HSN Summary")]
    Hsn,
    #[serde(rename = "Document Issued")]
    DocIssue,
}

impl GstrCategory {
    pub const ALL: [GstrCategory; 12] = [
        GstrCategory::B2b,
        GstrCategory::B2cl,
        GstrCategory::Exp,
        GstrCategory::B2cs,
        GstrCategory::NilExempt,
        GstrCategory::Cdnr,
        GstrCategory::Cdnur,
        GstrCategory::At,
        GstrCategory::Txp,
        GstrCategory::Supecom,
        GstrCategory::Hsn,
        GstrCategory::DocIssue,
    ];

    /// Display label, also used as the section description in return summaries
    pub fn label(&self) -> &'static str {
        match self {
            GstrCategory::B2b => "B2B, SEZ, DE",
            GstrCategory::B2cl => "B2C (Large)",
            GstrCategory::Exp => "Exports",
            GstrCategory::B2cs => "B2C (Others)",
            GstrCategory::NilExempt => "Nil-Rated, Exempted, Non-GST",
            GstrCategory::Cdnr => "Credit/Debit Notes (Registered)",
            GstrCategory::Cdnur => "Credit/Debit Notes (Unregistered)",
            GstrCategory::At => "Advances Received",
            GstrCategory::Txp => "Advances Adjusted",
            GstrCategory::Supecom => "Supplies made through E-commerce Operators",
            GstrCategory::Hsn => "HSN Summary",
            GstrCategory::DocIssue => "Document Issued",
        }
    }

    pub fn sub_categories(&self) -> &'static [GstrSubCategory] {
        use GstrSubCategory::*;
        match self {
            GstrCategory::B2b => &[B2bRegular, B2bReverseCharge, SezWithPayment, SezWithoutPayment, DeemedExport],
            GstrCategory::B2cl => &[B2cl],
            GstrCategory::Exp => &[ExportWithPayment, ExportWithoutPayment],
            GstrCategory::B2cs => &[B2cs],
            GstrCategory::NilExempt => &[NilExempt],
            GstrCategory::Cdnr => &[Cdnr],
            GstrCategory::Cdnur => &[Cdnur],
            GstrCategory::At => &[At],
            GstrCategory::Txp => &[Txp],
            GstrCategory::Supecom => &[SupecomTcs, SupecomRcm],
            GstrCategory::Hsn => &[Hsn, HsnB2b, HsnB2c],
            GstrCategory::DocIssue => &[DocIssue],
        }
    }
}

/// Invoice subcategories; every subcategory belongs to one [`GstrCategory`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum GstrSubCategory {
    #[serde(rename = "B2B Regular")]
    B2bRegular,
    #[serde(rename = "B2B Reverse Charge")]
    B2bReverseCharge,
    #[serde(rename = "SEZ With Payment of Tax")]
    SezWithPayment,
    #[serde(rename = "SEZ Without Payment of Tax")]
    SezWithoutPayment,
    #[serde(rename = "Deemed Exports")]
    DeemedExport,
    #[serde(rename = "B2C (Large)")]
    B2cl,
    #[serde(rename = "Export With Payment of Tax")]
    ExportWithPayment,
    #[serde(rename = "Export Without Payment of Tax")]
    ExportWithoutPayment,
    #[serde(rename = "B2C (Others)")]
    B2cs,
    #[serde(rename = "Nil-Rated, Exempted, Non-GST")]
    NilExempt,
    #[serde(rename = "Credit/Debit Notes (Registered)")]
    Cdnr,
    #[serde(rename = "Credit/Debit Notes (Unregistered)")]
    Cdnur,
    #[serde(rename = "Advances Received")]
    At,
    #[serde(rename = "Advances Adjusted")]
    Txp,
    #[serde(rename = "TCS collected by E-commerce Operator u/s 52")]
    SupecomTcs,
    #[serde(rename = "GST Payable on RCM by E-commerce Operator u/s 9(5)")]
    SupecomRcm,
    #[serde(rename = "HSN Summary")]
    Hsn,
    #[serde(rename = "HSN Summary - B2B")]
    HsnB2b,
    #[serde(rename = "HSN Summary - B2C")]
    HsnB2c,
    #[serde(rename = "Document Issued")]
    DocIssue,
}

impl GstrSubCategory {
    pub const ALL: [GstrSubCategory; 20] = [
        GstrSubCategory::B2bRegular,
        GstrSubCategory::B2bReverseCharge,
        GstrSubCategory::SezWithPayment,
        GstrSubCategory::SezWithoutPayment,
        GstrSubCategory::DeemedExport,
        GstrSubCategory::B2cl,
        GstrSubCategory::ExportWithPayment,
        GstrSubCategory::ExportWithoutPayment,
        GstrSubCategory::B2cs,
        GstrSubCategory::NilExempt,
        GstrSubCategory::Cdnr,
        GstrSubCategory::Cdnur,
        GstrSubCategory::At,
        GstrSubCategory::Txp,
        GstrSubCategory::SupecomTcs,
        GstrSubCategory::SupecomRcm,
        GstrSubCategory::Hsn,
        GstrSubCategory::HsnB2b,
        GstrSubCategory::HsnB2c,
        GstrSubCategory::DocIssue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GstrSubCategory::B2bRegular => "B2B Regular",
            GstrSubCategory::B2bReverseCharge => "B2B Reverse Charge",
            GstrSubCategory::SezWithPayment => "SEZ With Payment of Tax",
            GstrSubCategory::SezWithoutPayment => "SEZ Without Payment of Tax",
            GstrSubCategory::DeemedExport => "Deemed Exports",
            GstrSubCategory::B2cl => "B2C (Large)",
            GstrSubCategory::ExportWithPayment => "Export With Payment of Tax",
            GstrSubCategory::ExportWithoutPayment => "Export Without Payment of Tax",
            GstrSubCategory::B2cs => "B2C (Others)",
            GstrSubCategory::NilExempt => "Nil-Rated, Exempted, Non-GST",
            GstrSubCategory::Cdnr => "Credit/Debit Notes (Registered)",
            GstrSubCategory::Cdnur => "Credit/Debit Notes (Unregistered)",
            GstrSubCategory::At => "Advances Received",
            GstrSubCategory::Txp => "Advances Adjusted",
            GstrSubCategory::SupecomTcs => "TCS collected by E-commerce Operator u/s 52",
            GstrSubCategory::SupecomRcm => "GST Payable on RCM by E-commerce Operator u/s 9(5)",
            GstrSubCategory::Hsn => "HSN Summary",
            GstrSubCategory::HsnB2b => "HSN Summary - B2B",
            GstrSubCategory::HsnB2c => "HSN Summary - B2C",
            GstrSubCategory::DocIssue => "Document Issued",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sub| sub.label() == label)
    }

    /// Parent category
    pub fn category(&self) -> GstrCategory {
        match self {
            GstrSubCategory::B2bRegular
            | GstrSubCategory::B2bReverseCharge
            | GstrSubCategory::SezWithPayment
            | GstrSubCategory::SezWithoutPayment
            | GstrSubCategory::DeemedExport => GstrCategory::B2b,
            GstrSubCategory::B2cl => GstrCategory::B2cl,
            GstrSubCategory::ExportWithPayment | GstrSubCategory::ExportWithoutPayment => {
                GstrCategory::Exp
            }
            GstrSubCategory::B2cs => GstrCategory::B2cs,
            GstrSubCategory::NilExempt => GstrCategory::NilExempt,
            GstrSubCategory::Cdnr => GstrCategory::Cdnr,
            GstrSubCategory::Cdnur => GstrCategory::Cdnur,
            GstrSubCategory::At => GstrCategory::At,
            GstrSubCategory::Txp => GstrCategory::Txp,
            GstrSubCategory::SupecomTcs | GstrSubCategory::SupecomRcm => GstrCategory::Supecom,
            GstrSubCategory::Hsn | GstrSubCategory::HsnB2b | GstrSubCategory::HsnB2c => {
                GstrCategory::Hsn
            }
            GstrSubCategory::DocIssue => GstrCategory::DocIssue,
        }
    }

    /// Government JSON section carrying this subcategory
    pub fn gov_key(&self) -> GovJsonKey {
        match self.category() {
            GstrCategory::B2b => GovJsonKey::B2b,
            GstrCategory::B2cl => GovJsonKey::B2cl,
            GstrCategory::Exp => GovJsonKey::Exp,
            GstrCategory::B2cs => GovJsonKey::B2cs,
            GstrCategory::NilExempt => GovJsonKey::Nil,
            GstrCategory::Cdnr => GovJsonKey::Cdnr,
            GstrCategory::Cdnur => GovJsonKey::Cdnur,
            GstrCategory::At => GovJsonKey::At,
            GstrCategory::Txp => GovJsonKey::Txpd,
            GstrCategory::Supecom => GovJsonKey::Supecom,
            GstrCategory::Hsn => GovJsonKey::Hsn,
            GstrCategory::DocIssue => GovJsonKey::DocIssue,
        }
    }

    /// Whether the subcategory adds to the return's total taxable value
    pub fn counts_in_total_taxable_value(&self) -> bool {
        !matches!(
            self,
            GstrSubCategory::Hsn
                | GstrSubCategory::HsnB2b
                | GstrSubCategory::HsnB2c
                | GstrSubCategory::DocIssue
                | GstrSubCategory::SupecomTcs
                | GstrSubCategory::SupecomRcm
        )
    }

    /// Whether the subcategory adds to the return's total tax liability
    pub fn counts_in_total_tax(&self) -> bool {
        self.counts_in_total_taxable_value() && *self != GstrSubCategory::B2bReverseCharge
    }
}

/// Top level sections of the government GSTR-1 JSON
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GovJsonKey {
    B2b,
    B2cl,
    Exp,
    B2cs,
    Nil,
    Cdnr,
    Cdnur,
    Hsn,
    DocIssue,
    At,
    Txpd,
    #[serde(rename = "supeco")]
    Supecom,
    #[serde(rename = "sec_sum")]
    RetSum,
}

impl GovJsonKey {
    /// Sections with a two-way category mapper, in dispatch order
    pub const MAPPED: [GovJsonKey; 12] = [
        GovJsonKey::B2b,
        GovJsonKey::B2cl,
        GovJsonKey::Exp,
        GovJsonKey::B2cs,
        GovJsonKey::Nil,
        GovJsonKey::Cdnr,
        GovJsonKey::Cdnur,
        GovJsonKey::Hsn,
        GovJsonKey::DocIssue,
        GovJsonKey::At,
        GovJsonKey::Txpd,
        GovJsonKey::Supecom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GovJsonKey::B2b => "b2b",
            GovJsonKey::B2cl => "b2cl",
            GovJsonKey::Exp => "exp",
            GovJsonKey::B2cs => "b2cs",
            GovJsonKey::Nil => "nil",
            GovJsonKey::Cdnr => "cdnr",
            GovJsonKey::Cdnur => "cdnur",
            GovJsonKey::Hsn => "hsn",
            GovJsonKey::DocIssue => "doc_issue",
            GovJsonKey::At => "at",
            GovJsonKey::Txpd => "txpd",
            GovJsonKey::Supecom => "supeco",
            GovJsonKey::RetSum => "sec_sum",
        }
    }

    /// Subcategories carried by this section
    pub fn sub_categories(&self) -> Vec<GstrSubCategory> {
        GstrSubCategory::ALL
            .into_iter()
            .filter(|sub| sub.gov_key() == *self)
            .collect()
    }
}

/// B2B invoice type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum B2bInvoiceType {
    Regular,
    SezWithPayment,
    SezWithoutPayment,
    DeemedExport,
}

impl B2bInvoiceType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(B2bInvoiceType::Regular),
            "SEWP" => Some(B2bInvoiceType::SezWithPayment),
            "SEWOP" => Some(B2bInvoiceType::SezWithoutPayment),
            "DE" => Some(B2bInvoiceType::DeemedExport),
            _ => None,
        }
    }

    /// Subcategory of a B2B invoice
    ///
    /// SEZ and deemed export types win over the reverse charge flag.
    pub fn sub_category(invoice_type: Option<Self>, reverse_charge: bool) -> GstrSubCategory {
        match invoice_type {
            Some(B2bInvoiceType::SezWithPayment) => GstrSubCategory::SezWithPayment,
            Some(B2bInvoiceType::SezWithoutPayment) => GstrSubCategory::SezWithoutPayment,
            Some(B2bInvoiceType::DeemedExport) => GstrSubCategory::DeemedExport,
            _ if reverse_charge => GstrSubCategory::B2bReverseCharge,
            _ => GstrSubCategory::B2bRegular,
        }
    }
}
