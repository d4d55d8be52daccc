//! Whole-return conversion, routing each government section to its mapper

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::gstr1::categories::*;
use crate::gstr1::mapper::{as_object, is_blank, CategoryMapper, GovObject, MapperContext};
use crate::gstr1::taxonomy::GovJsonKey;
use crate::types::*;

/// A government return converted to internal format
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InternalReturn {
    pub data: InternalData,
    /// Present when the return carried a `sec_sum` section
    pub summary: Option<ReturnSummary>,
}

/// Mapper for a government section; `None` for the return summary
pub fn mapper_for<'a>(
    key: GovJsonKey,
    context: &MapperContext<'a>,
) -> Option<Box<dyn CategoryMapper + 'a>> {
    let mapper: Box<dyn CategoryMapper + 'a> = match key {
        GovJsonKey::B2b => Box::new(B2b::new(context)),
        GovJsonKey::B2cl => Box::new(B2cl::new()),
        GovJsonKey::Exp => Box::new(Exports::new()),
        GovJsonKey::B2cs => Box::new(B2cs::new(context)),
        GovJsonKey::Nil => Box::new(NilRated::new()),
        GovJsonKey::Cdnr => Box::new(Cdnr::new(context)),
        GovJsonKey::Cdnur => Box::new(Cdnur::new()),
        GovJsonKey::Hsn => Box::new(HsnSummary::new(context)),
        GovJsonKey::DocIssue => Box::new(DocIssue::new()),
        GovJsonKey::At => Box::new(Advances::received(context)),
        GovJsonKey::Txpd => Box::new(Advances::adjusted(context)),
        GovJsonKey::Supecom => Box::new(Supecom::new()),
        GovJsonKey::RetSum => return None,
    };
    Some(mapper)
}

/// Convert a complete government GSTR-1 JSON to internal format
///
/// Sections that are missing or empty are skipped, as are keys that are not
/// return sections (`gstin`, `fp` and the like).
pub fn convert_to_internal_data_format(
    gov_data: &Value,
    context: &MapperContext<'_>,
) -> MapperResult<InternalReturn> {
    let gov_data = as_object(gov_data, "gstr1")?;
    let mut output = InternalReturn::default();

    for key in GovJsonKey::MAPPED {
        let Some(section) = gov_data.get(key.as_str()).filter(|value| !is_blank(value)) else {
            continue;
        };
        let Some(mapper) = mapper_for(key, context) else {
            continue;
        };

        debug!("Converting section '{}' to internal format", key.as_str());
        output.data.merge(mapper.to_internal(section)?);
    }

    if let Some(summary) = gov_data
        .get(GovJsonKey::RetSum.as_str())
        .filter(|value| !is_blank(value))
    {
        output.summary = Some(ReturnSummaryMapper::new().to_internal(summary)?);
    }

    info!(
        "Converted {} subcategories from government format",
        output.data.sub_categories().len()
    );
    Ok(output)
}

/// Every record that the portal flagged with an error code or message
///
/// Each record is tagged with its subcategory label under `category`.
pub fn collect_errors(gov_data: &Value, context: &MapperContext<'_>) -> MapperResult<Vec<Record>> {
    let converted = convert_to_internal_data_format(gov_data, context)?;
    let mut errors = Vec::new();

    for (sub_category, rows) in converted.data {
        for entry in rows.into_values() {
            for mut record in entry.into_records() {
                if !(record.contains(Field::ErrorCode) || record.contains(Field::ErrorMessage)) {
                    continue;
                }
                record.insert(Field::Category, sub_category.label());
                errors.push(record);
            }
        }
    }

    Ok(errors)
}

/// Regroup subcategory buckets by government section
///
/// Every row of a grouped bucket (composite keys) is kept as its own record.
pub fn category_wise_data(data: &InternalData) -> Vec<(GovJsonKey, Vec<Record>)> {
    GovJsonKey::MAPPED
        .into_iter()
        .filter_map(|key| {
            let records: Vec<Record> = key
                .sub_categories()
                .into_iter()
                .flat_map(|sub_category| data.records(sub_category))
                .cloned()
                .collect();
            (!records.is_empty()).then_some((key, records))
        })
        .collect()
}

/// Convert internal data to the government GSTR-1 JSON
pub fn convert_to_gov_data_format(
    data: &InternalData,
    context: &MapperContext<'_>,
) -> MapperResult<Value> {
    let mut output = GovObject::new();

    for (key, records) in category_wise_data(data) {
        let Some(mapper) = mapper_for(key, context) else {
            continue;
        };
        debug!("Converting {} records to section '{}'", records.len(), key.as_str());
        output.insert(key.as_str().to_string(), mapper.to_gov(&records)?);
    }

    Ok(Value::Object(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gstr1::taxonomy::GstrSubCategory;
    use bigdecimal::BigDecimal;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn gov_return() -> Value {
        json!({
            "gstin": "24AANFA2641L1ZF",
            "fp": "032024",
            "b2cs": [
                {"sply_ty": "INTER", "rt": 5, "typ": "OE", "pos": "05", "txval": 110, "iamt": 5.5, "csamt": 0},
                {"sply_ty": "INTER", "rt": 5, "typ": "OE", "pos": "05", "txval": 90, "iamt": 4.5, "csamt": 0}
            ],
            "nil": {
                "inv": [
                    {"sply_ty": "INTRAB2C", "expt_amt": 10, "nil_amt": 0, "ngsup_amt": 0}
                ]
            },
            "cdnur": [
                {
                    "typ": "B2CL",
                    "ntty": "C",
                    "nt_num": "CN-1",
                    "nt_dt": "05-03-2024",
                    "pos": "05",
                    "val": 118,
                    "error_cd": "RET191106",
                    "error_msg": "Invalid note",
                    "itms": [{"num": 1, "itm_det": {"rt": 18, "txval": 100, "iamt": 18, "csamt": 0}}]
                }
            ]
        })
    }

    #[test]
    fn test_non_section_keys_are_ignored() {
        let context = MapperContext::new("24AANFA2641L1ZF");
        let converted = convert_to_internal_data_format(&gov_return(), &context).unwrap();

        assert_eq!(
            converted.data.sub_categories(),
            vec![GstrSubCategory::B2cs, GstrSubCategory::NilExempt, GstrSubCategory::Cdnur]
        );
        assert!(converted.summary.is_none());
    }

    #[test]
    fn test_collect_errors() {
        let context = MapperContext::new("24AANFA2641L1ZF");
        let errors = collect_errors(&gov_return(), &context).unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text(Field::Category), Some("Credit/Debit Notes (Unregistered)"));
        assert_eq!(errors[0].text(Field::ErrorCode), Some("RET191106"));
    }

    #[test]
    fn test_group_rows_stay_separate_for_gov() {
        let context = MapperContext::new("24AANFA2641L1ZF");
        let converted = convert_to_internal_data_format(&gov_return(), &context).unwrap();
        let grouped = category_wise_data(&converted.data);

        let (key, b2cs) = &grouped[0];
        assert_eq!(*key, GovJsonKey::B2cs);
        assert_eq!(b2cs.len(), 2);
        assert_eq!(b2cs[0].amount(Field::TotalTaxableValue), Some(&BigDecimal::from(110)));
        assert_eq!(b2cs[1].amount(Field::TotalTaxableValue), Some(&BigDecimal::from(90)));

        let output = convert_to_gov_data_format(&converted.data, &context).unwrap();
        assert_eq!(output["b2cs"], gov_return()["b2cs"]);
    }

    #[test]
    fn test_same_bucket_rows_keep_their_own_fields() {
        let context = MapperContext::new("24AANFA2641L1ZF");
        let gov = json!({
            "b2cs": [
                {"sply_ty": "INTER", "rt": 5, "typ": "OE", "pos": "05", "txval": 110, "iamt": 5.5, "csamt": 0},
                {"sply_ty": "INTER", "diff_percent": 0.65, "rt": 5, "typ": "OE", "pos": "05", "txval": 100, "iamt": 3.25, "csamt": 0}
            ]
        });
        let converted = convert_to_internal_data_format(&gov, &context).unwrap();
        assert_eq!(converted.data.records(GstrSubCategory::B2cs).count(), 2);

        let output = convert_to_gov_data_format(&converted.data, &context).unwrap();
        assert_eq!(output, gov);
    }

    #[test]
    fn test_return_summary_is_parsed_separately() {
        let context = MapperContext::default();
        let data = json!({"sec_sum": [{"sec_nm": "B2CL", "ttl_rec": 1, "ttl_tax": 100}]});
        let converted = convert_to_internal_data_format(&data, &context).unwrap();

        assert!(converted.data.is_empty());
        let summary = converted.summary.unwrap();
        assert!(summary.rows().unwrap().contains_key("B2C (Large)"));
    }

    #[test]
    fn test_retsum_has_no_category_mapper() {
        let context = MapperContext::default();
        assert!(mapper_for(GovJsonKey::RetSum, &context).is_none());
        assert!(mapper_for(GovJsonKey::Hsn, &context).is_some());
    }
}
