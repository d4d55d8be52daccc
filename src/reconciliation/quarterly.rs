//! Quarterly filing buckets
//!
//! Quarterly filers report B2B documents monthly through the invoice
//! furnishing facility. In months 1 and 2 of a quarter everything else waits
//! for month 3; in month 3 the B2B documents already furnished are set apart.

use std::collections::HashSet;
use tracing::info;

use crate::config::{FilingPreference, ReturnFilters};
use crate::gstr1::taxonomy::GstrSubCategory;
use crate::traits::ReturnLogStore;
use crate::types::*;

/// Subcategories furnished monthly by quarterly filers
pub const MONTHLY_SUB_CATEGORIES: [GstrSubCategory; 6] = [
    GstrSubCategory::B2bRegular,
    GstrSubCategory::B2bReverseCharge,
    GstrSubCategory::SezWithPayment,
    GstrSubCategory::SezWithoutPayment,
    GstrSubCategory::DeemedExport,
    GstrSubCategory::Cdnr,
];

/// Subcategories that only exist in the quarterly return
const QUARTER_END_SUB_CATEGORIES: [GstrSubCategory; 4] = [
    GstrSubCategory::Hsn,
    GstrSubCategory::HsnB2b,
    GstrSubCategory::HsnB2c,
    GstrSubCategory::DocIssue,
];

/// Rows moved out of the return data, each tagged with `sub_category`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuarterlyBuckets {
    /// Month 1 and 2 rows to be reported in month 3
    pub excluded_docs: Vec<Record>,
    /// Month 3 rows of documents already furnished in month 1 or 2
    pub already_included_docs: Vec<Record>,
}

pub fn is_quarter_end(month: u32) -> bool {
    month % 3 == 0
}

/// Split quarterly filers' data into buckets; monthly filers are left alone
pub fn process_for_quarterly(
    data: &mut InternalData,
    filters: &ReturnFilters,
    return_logs: &dyn ReturnLogStore,
) -> MapperResult<QuarterlyBuckets> {
    if filters.filing_preference != FilingPreference::Quarterly {
        return Ok(QuarterlyBuckets::default());
    }

    let buckets = if is_quarter_end(filters.month) {
        let filed = filed_document_keys(filters, return_logs)?;
        QuarterlyBuckets {
            already_included_docs: take_filed_docs(data, &filed),
            ..Default::default()
        }
    } else {
        QuarterlyBuckets {
            excluded_docs: take_excluded_docs(data),
            ..Default::default()
        }
    };

    info!(
        "Quarterly buckets for {}: {} excluded, {} already included",
        filters.period(),
        buckets.excluded_docs.len(),
        buckets.already_included_docs.len()
    );
    Ok(buckets)
}

fn tag_rows(sub_category: GstrSubCategory, rows: SubCategoryRows) -> impl Iterator<Item = Record> {
    rows.into_values()
        .flat_map(Entry::into_records)
        .map(move |record| record.with(Field::SubCategory, sub_category.label()))
}

/// Document keys of monthly subcategories filed in the first two months
fn filed_document_keys(
    filters: &ReturnFilters,
    return_logs: &dyn ReturnLogStore,
) -> MapperResult<HashSet<String>> {
    let mut keys = HashSet::new();

    for offset in [1, 2] {
        let Some(month) = filters.month.checked_sub(offset).filter(|month| *month > 0) else {
            continue;
        };
        let period = ReturnFilters {
            month,
            ..filters.clone()
        }
        .period();

        let Some(filed) = return_logs.filed_data(&period, &filters.company_gstin)? else {
            continue;
        };
        for (sub_category, rows) in filed {
            if MONTHLY_SUB_CATEGORIES.contains(&sub_category) {
                keys.extend(rows.into_keys());
            }
        }
    }

    Ok(keys)
}

fn take_filed_docs(data: &mut InternalData, filed: &HashSet<String>) -> Vec<Record> {
    let mut included = Vec::new();

    for sub_category in MONTHLY_SUB_CATEGORIES {
        let Some(rows) = data.get_mut(sub_category) else {
            continue;
        };

        let keys: Vec<String> = rows.keys().filter(|key| filed.contains(*key)).cloned().collect();
        let moved: SubCategoryRows = keys
            .into_iter()
            .filter_map(|key| rows.shift_remove_entry(&key))
            .collect();
        included.extend(tag_rows(sub_category, moved));

        if rows.is_empty() {
            data.remove(sub_category);
        }
    }

    included
}

fn take_excluded_docs(data: &mut InternalData) -> Vec<Record> {
    let mut excluded = Vec::new();

    for sub_category in data.sub_categories() {
        if MONTHLY_SUB_CATEGORIES.contains(&sub_category) {
            continue;
        }
        let Some(rows) = data.remove(sub_category) else {
            continue;
        };
        if QUARTER_END_SUB_CATEGORIES.contains(&sub_category) {
            continue;
        }
        excluded.extend(tag_rows(sub_category, rows));
    }

    excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryReturnLogs;
    use pretty_assertions::assert_eq;

    fn sample_data() -> InternalData {
        let mut data = InternalData::new();
        data.insert(
            GstrSubCategory::B2bRegular,
            "INV-1".to_string(),
            Record::new().with(Field::DocumentNumber, "INV-1"),
        );
        data.insert(
            GstrSubCategory::B2bRegular,
            "INV-2".to_string(),
            Record::new().with(Field::DocumentNumber, "INV-2"),
        );
        data.push(
            GstrSubCategory::B2cs,
            "05-Uttarakhand - 5.0".to_string(),
            Record::new().with(Field::DocumentNumber, "INV-3"),
        );
        data.insert(
            GstrSubCategory::HsnB2b,
            "1010 - NOS-NUMBERS - 5.0".to_string(),
            Record::new().with(Field::HsnCode, "1010"),
        );
        data
    }

    #[test]
    fn test_monthly_filers_are_untouched() {
        let mut data = sample_data();
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 2);

        let buckets = process_for_quarterly(&mut data, &filters, &MemoryReturnLogs::new()).unwrap();

        assert_eq!(buckets, QuarterlyBuckets::default());
        assert_eq!(data, sample_data());
    }

    #[test]
    fn test_first_months_exclude_other_categories() {
        let mut data = sample_data();
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 2).quarterly();

        let buckets = process_for_quarterly(&mut data, &filters, &MemoryReturnLogs::new()).unwrap();

        assert_eq!(data.sub_categories(), vec![GstrSubCategory::B2bRegular]);
        assert_eq!(buckets.excluded_docs.len(), 1);
        assert_eq!(buckets.excluded_docs[0].text(Field::SubCategory), Some("B2C (Others)"));
        assert!(buckets.already_included_docs.is_empty());
    }

    #[test]
    fn test_quarter_end_sets_apart_filed_docs() {
        let return_logs = MemoryReturnLogs::new();
        let mut filed = InternalData::new();
        filed.insert(GstrSubCategory::B2bRegular, "INV-1".to_string(), Record::new());
        filed.insert(GstrSubCategory::B2cl, "INV-2".to_string(), Record::new());
        return_logs.save_filed("012024", "24AANFA2641L1ZF", filed).unwrap();

        let mut data = sample_data();
        let filters = ReturnFilters::new("Test Company", "24AANFA2641L1ZF", 2024, 3).quarterly();

        let buckets = process_for_quarterly(&mut data, &filters, &return_logs).unwrap();

        assert_eq!(buckets.already_included_docs.len(), 1);
        let included = &buckets.already_included_docs[0];
        assert_eq!(included.text(Field::DocumentNumber), Some("INV-1"));
        assert_eq!(included.text(Field::SubCategory), Some("B2B Regular"));
        assert!(!data.contains_key(GstrSubCategory::B2bRegular, "INV-1"));
        assert!(data.contains_key(GstrSubCategory::B2bRegular, "INV-2"));
        assert!(data.contains_key(GstrSubCategory::HsnB2b, "1010 - NOS-NUMBERS - 5.0"));
        assert!(buckets.excluded_docs.is_empty());
    }
}
