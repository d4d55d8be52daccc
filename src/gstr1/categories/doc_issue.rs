//! Documents issued during the period (table 13)

use bigdecimal::BigDecimal;
use serde_json::Value;
use indexmap::IndexMap;

use crate::gstr1::fields::{FieldMap, GovField};
use crate::gstr1::mapper::*;
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::types::*;

static DOC_ISSUE_FIELDS: FieldMap = FieldMap::new(&[
    (GovField::Flag, Field::Flag),
    (GovField::FromSrNo, Field::FromSrNo),
    (GovField::ToSrNo, Field::ToSrNo),
    (GovField::TotalCount, Field::TotalCount),
    (GovField::CancelledCount, Field::CancelledCount),
    (GovField::NetIssue, Field::NetIssue),
]);

/// Nature of document codes used by the portal
pub const DOCUMENT_NATURES: [(u64, &str); 12] = [
    (1, "Invoices for outward supply"),
    (2, "Invoices for inward supply from unregistered person"),
    (3, "Revised Invoice"),
    (4, "Debit Note"),
    (5, "Credit Note"),
    (6, "Receipt voucher"),
    (7, "Payment Voucher"),
    (8, "Refund voucher"),
    (9, "Delivery Challan for job work"),
    (10, "Delivery Challan for supply on approval"),
    (11, "Delivery Challan in case of liquid gas"),
    (
        12,
        "Delivery Challan in cases other than by way of supply (excluding at S no. 9 to 11)",
    ),
];

/// Document types with this prefix are never reported
const EXCLUDED_PREFIX: &str = "Excluded from Report";

pub fn document_nature(code: u64) -> Option<&'static str> {
    DOCUMENT_NATURES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, nature)| *nature)
}

pub fn document_nature_code(nature: &str) -> Option<u64> {
    DOCUMENT_NATURES
        .iter()
        .find(|(_, n)| *n == nature)
        .map(|(code, _)| *code)
}

/// Mapper for the `doc_issue` section
#[derive(Debug, Default)]
pub struct DocIssue;

impl DocIssue {
    pub fn new() -> Self {
        Self
    }
}

impl RecordMapper for DocIssue {
    fn fields(&self) -> &'static FieldMap {
        &DOC_ISSUE_FIELDS
    }
}

impl CategoryMapper for DocIssue {
    fn to_internal(&self, input: &Value) -> MapperResult<InternalData> {
        let mut output = InternalData::new();
        let input = as_object(input, "doc_issue")?;

        for document in array_field(input, GovField::DocIssueDetails)? {
            let document = as_object(document, GovField::DocIssueDetails.as_str())?;
            let nature = match document.get(GovField::DocIssueNumber.as_str()) {
                Some(Value::Number(code)) => code
                    .as_u64()
                    .and_then(document_nature)
                    .map(str::to_string)
                    .unwrap_or_else(|| code.to_string()),
                Some(Value::String(text)) => text.clone(),
                _ => String::new(),
            };

            let defaults = Record::new().with(Field::DocumentType, nature.as_str());
            for doc in array_field(document, GovField::DocIssueList)? {
                let doc = as_object(doc, GovField::DocIssueList.as_str())?;
                let record = self.format_for_internal(doc, defaults.clone())?;

                let from = text_field(doc, GovField::FromSrNo).unwrap_or_default();
                output.insert(GstrSubCategory::DocIssue, format!("{nature} - {from}"), record);
            }
        }

        Ok(output)
    }

    /// Natures and their documents keep the order they first appear in
    fn to_gov(&self, records: &[Record]) -> MapperResult<Value> {
        let mut natures: IndexMap<String, Vec<Value>> = IndexMap::new();

        for record in records {
            let nature = record.text(Field::DocumentType).unwrap_or_default();
            if nature.starts_with(EXCLUDED_PREFIX) {
                continue;
            }

            let mut record = record.clone();
            let cancelled =
                record.amount_or_zero(Field::CancelledCount) + record.amount_or_zero(Field::DraftCount);
            let net_issue: BigDecimal = record.amount_or_zero(Field::TotalCount) - &cancelled;
            record.insert(Field::CancelledCount, cancelled);
            record.insert(Field::NetIssue, net_issue);

            let documents = natures.entry(nature.to_string()).or_default();

            let mut defaults = GovObject::new();
            defaults.insert(GovField::Index.as_str().to_string(), Value::from(documents.len() + 1));
            documents.push(Value::Object(self.format_for_gov(&record, defaults)?));
        }

        let details = natures
            .into_iter()
            .map(|(nature, documents)| {
                let number = match document_nature_code(&nature) {
                    Some(code) => Value::from(code),
                    None => Value::from(nature),
                };
                group_object(GovField::DocIssueNumber, number, GovField::DocIssueList, documents)
            })
            .collect();

        let mut output = GovObject::new();
        output.insert(GovField::DocIssueDetails.as_str().to_string(), Value::Array(details));
        Ok(Value::Object(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn gov_data() -> Value {
        json!({
            "doc_det": [
                {
                    "doc_num": 1,
                    "docs": [
                        {"num": 1, "from": "1", "to": "10", "totnum": 10, "cancel": 0, "net_issue": 10},
                        {"num": 2, "from": "11", "to": "20", "totnum": 10, "cancel": 0, "net_issue": 10}
                    ]
                },
                {
                    "doc_num": 2,
                    "docs": [
                        {"num": 1, "from": "1", "to": "10", "totnum": 10, "cancel": 0, "net_issue": 10}
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_convert_to_internal() {
        let output = DocIssue::new().to_internal(&gov_data()).unwrap();
        let rows = output.get(GstrSubCategory::DocIssue).unwrap();

        assert_eq!(rows.len(), 3);
        let row = &rows["Invoices for outward supply - 11"].records()[0];
        assert_eq!(row.text(Field::DocumentType), Some("Invoices for outward supply"));
        assert_eq!(row.text(Field::ToSrNo), Some("20"));
        assert_eq!(row.amount(Field::TotalCount), Some(&BigDecimal::from(10)));
        assert!(output.contains_key(
            GstrSubCategory::DocIssue,
            "Invoices for inward supply from unregistered person - 1"
        ));
    }

    #[test]
    fn test_convert_to_gov_round_trip() {
        let internal = DocIssue::new().to_internal(&gov_data()).unwrap();
        let records: Vec<Record> = internal.records(GstrSubCategory::DocIssue).cloned().collect();

        assert_eq!(DocIssue::new().to_gov(&records).unwrap(), gov_data());
    }

    #[test]
    fn test_natures_keep_input_order() {
        let data = json!({
            "doc_det": [
                {
                    "doc_num": 5,
                    "docs": [{"num": 1, "from": "CN-1", "to": "CN-4", "totnum": 4, "cancel": 0, "net_issue": 4}]
                },
                {
                    "doc_num": 1,
                    "docs": [
                        {"num": 1, "from": "S-20", "to": "S-29", "totnum": 10, "cancel": 1, "net_issue": 9},
                        {"num": 2, "from": "S-1", "to": "S-19", "totnum": 19, "cancel": 0, "net_issue": 19}
                    ]
                }
            ]
        });
        let internal = DocIssue::new().to_internal(&data).unwrap();
        let records: Vec<Record> = internal.records(GstrSubCategory::DocIssue).cloned().collect();

        assert_eq!(DocIssue::new().to_gov(&records).unwrap(), data);
    }

    #[test]
    fn test_drafts_count_as_cancelled() {
        let records = vec![
            Record::new()
                .with(Field::DocumentType, "Credit Note")
                .with(Field::FromSrNo, "CN-01")
                .with(Field::ToSrNo, "CN-09")
                .with(Field::TotalCount, 9)
                .with(Field::CancelledCount, 1)
                .with(Field::DraftCount, 2),
            Record::new()
                .with(Field::DocumentType, "Excluded from Report (Same GSTIN Billing)")
                .with(Field::TotalCount, 4),
        ];

        assert_eq!(
            DocIssue::new().to_gov(&records).unwrap(),
            json!({
                "doc_det": [
                    {
                        "doc_num": 5,
                        "docs": [
                            {"num": 1, "from": "CN-01", "to": "CN-09", "totnum": 9, "cancel": 3, "net_issue": 6}
                        ]
                    }
                ]
            })
        );
    }
}
