//! Return summary (`sec_sum`) as returned by the portal
//!
//! Only the summary format with sub sections for exports and e-commerce
//! supplies is understood. Older summaries come back as
//! [`ReturnSummary::Unsupported`] so callers can compute their own.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::gstr1::fields::{FieldMap, GovField, LabelMap};
use crate::gstr1::mapper::*;
use crate::types::*;

static RETSUM_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::SectionName, Field::Description),
    (GovField::Type, Field::Description),
    (GovField::TotalRecords, Field::NoOfRecords),
    (GovField::TotalDocValue, Field::TotalDocumentValue),
    (GovField::TotalIgst, Field::TotalIgstAmount),
    (GovField::TotalCgst, Field::TotalCgstAmount),
    (GovField::TotalSgst, Field::TotalSgstAmount),
    (GovField::TotalCess, Field::TotalCessAmount),
    (GovField::TotalTaxableValue, Field::TotalTaxableValue),
    (GovField::ActualDocValue, Field::ActualDocumentValue),
    (GovField::ActualIgst, Field::ActualIgstAmount),
    (GovField::ActualCgst, Field::ActualCgstAmount),
    (GovField::ActualSgst, Field::ActualSgstAmount),
    (GovField::ActualCess, Field::ActualCessAmount),
    (GovField::ActualTaxableValue, Field::ActualTaxableValue),
    (GovField::TotalExempted, Field::TotalExemptedAmount),
    (GovField::TotalNonGst, Field::TotalNonGstAmount),
    (GovField::TotalNilRated, Field::TotalNilRatedAmount),
    (GovField::TotalDocIssued, Field::TotalCount),
    (GovField::TotalDocCancelled, Field::CancelledCount),
]);

/// Section codes of the return summary and their descriptions
pub static SECTION_NAMES: LabelMap = LabelMap::new(&[
    ("AT", "Advances Received"),
    ("B2B_4A", "B2B Regular"),
    ("B2B_4B", "B2B Reverse Charge"),
    ("B2B_6C", "Deemed Exports"),
    ("B2B_SEZWOP", "SEZ Without Payment of Tax"),
    ("B2B_SEZWP", "SEZ With Payment of Tax"),
    ("B2B", "B2B, SEZ, DE"),
    ("B2CL", "B2C (Large)"),
    ("B2CS", "B2C (Others)"),
    ("TXPD", "Advances Adjusted"),
    ("EXP", "Exports"),
    ("CDNR", "Credit/Debit Notes (Registered)"),
    ("CDNUR", "Credit/Debit Notes (Unregistered)"),
    ("SUPECOM", "Supplies made through E-commerce Operators"),
    ("ATA", "Advances Received (Amended)"),
    ("B2BA_4A", "B2B Regular (Amended)"),
    ("B2BA_4B", "B2B Reverse Charge (Amended)"),
    ("B2BA_6C", "Deemed Exports (Amended)"),
    ("B2BA_SEZWOP", "SEZ Without Payment of Tax (Amended)"),
    ("B2BA_SEZWP", "SEZ With Payment of Tax (Amended)"),
    ("B2BA", "B2B, SEZ, DE (Amended)"),
    ("B2CLA", "B2C (Large) (Amended)"),
    ("B2CSA", "B2C (Others) (Amended)"),
    ("TXPDA", "Advances Adjusted (Amended)"),
    ("EXPA", "Exports (Amended)"),
    ("CDNRA", "Credit/Debit Notes (Registered) (Amended)"),
    ("CDNURA", "Credit/Debit Notes (Unregistered) (Amended)"),
    ("SUPECOMA", "Supplies made through E-commerce Operators (Amended)"),
    ("HSN", "HSN Summary"),
    ("HSN_B2B", "HSN Summary - B2B"),
    ("HSN_B2C", "HSN Summary - B2C"),
    ("NIL", "Nil-Rated, Exempted, Non-GST"),
    ("DOC_ISSUE", "Document Issued"),
    ("TTL_LIAB", "Total Liability"),
]);

static SUPECOM_SUB_SECTIONS: LabelMap = LabelMap::new(&[
    ("SUPECOM_14A", "TCS collected by E-commerce Operator u/s 52"),
    ("SUPECOM_14B", "GST Payable on RCM by E-commerce Operator u/s 9(5)"),
]);

static SUPECOM_AMENDED_SUB_SECTIONS: LabelMap = LabelMap::new(&[
    ("SUPECOMA_14A", "TCS collected by E-commerce Operator u/s 52 (Amended)"),
    ("SUPECOMA_14B", "GST Payable on RCM by E-commerce Operator u/s 9(5) (Amended)"),
]);

static EXPORT_SUB_SECTIONS: LabelMap = LabelMap::new(&[
    ("EXPWP", "Export With Payment of Tax"),
    ("EXPWOP", "Export Without Payment of Tax"),
]);

static EXPORT_AMENDED_SUB_SECTIONS: LabelMap = LabelMap::new(&[
    ("EXPWP", "Export With Payment of Tax (Amended)"),
    ("EXPWOP", "Export Without Payment of Tax (Amended)"),
]);

fn sub_section_names(section: &str) -> Option<&'static LabelMap> {
    match section {
        "SUPECOM" => Some(&SUPECOM_SUB_SECTIONS),
        "SUPECOMA" => Some(&SUPECOM_AMENDED_SUB_SECTIONS),
        "EXP" => Some(&EXPORT_SUB_SECTIONS),
        "EXPA" => Some(&EXPORT_AMENDED_SUB_SECTIONS),
        _ => None,
    }
}

/// Parsed return summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReturnSummary {
    /// Rows keyed by section description
    Parsed(BTreeMap<String, Record>),
    /// Legacy summary without sub sections
    Unsupported,
}

impl ReturnSummary {
    pub fn rows(&self) -> Option<&BTreeMap<String, Record>> {
        match self {
            ReturnSummary::Parsed(rows) => Some(rows),
            ReturnSummary::Unsupported => None,
        }
    }
}

/// Mapper for the `sec_sum` section
#[derive(Debug, Default)]
pub struct ReturnSummaryMapper;

impl ReturnSummaryMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn to_internal(&self, input: &Value) -> MapperResult<ReturnSummary> {
        let mut output = BTreeMap::new();

        for section_data in as_array(input, "sec_sum")? {
            let section_data = as_object(section_data, "sec_sum")?;
            let section = text_field(section_data, GovField::SectionName).unwrap_or_default();
            let record = self.format_section(section_data)?;
            output.insert(SECTION_NAMES.label(&section).to_string(), record);

            let Some(names) = sub_section_names(&section) else {
                continue;
            };

            let sub_sections = array_field(section_data, GovField::SubSections)?;
            if sub_sections.is_empty() {
                return Ok(ReturnSummary::Unsupported);
            }

            for sub_section_data in sub_sections {
                let sub_section_data = as_object(sub_section_data, GovField::SubSections.as_str())?;
                let sub_section = text_field(sub_section_data, GovField::Type)
                    .or_else(|| text_field(sub_section_data, GovField::SectionName))
                    .unwrap_or_default();

                let mut record = self.format_section(sub_section_data)?;
                let description = names.label(&sub_section).to_string();
                record.insert(Field::Description, description.as_str());
                output.insert(description, record);
            }
        }

        Ok(ReturnSummary::Parsed(output))
    }

    fn format_section(&self, data: &GovObject) -> MapperResult<Record> {
        let mut record = self.format_for_internal(data, Record::new())?;

        if text_field(data, GovField::SectionName).as_deref() == Some("DOC_ISSUE") {
            let net_issued = match data.get(GovField::NetDocIssued.as_str()) {
                Some(value) if !is_blank(value) => {
                    amount_from_json(GovField::NetDocIssued.as_str(), value)?
                }
                _ => Default::default(),
            };
            record.insert(Field::NoOfRecords, net_issued);
        }

        Ok(record)
    }
}

impl RecordMapper for ReturnSummaryMapper {
    fn fields(&self) -> &'static FieldMap {
        &RETSUM_FIELDS
    }

    fn labels(&self, key: GovField) -> Option<&'static LabelMap> {
        matches!(key, GovField::SectionName | GovField::Type).then_some(&SECTION_NAMES)
    }
}
