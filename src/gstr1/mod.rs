//! GSTR-1 conversion between the government JSON and internal records
//!
//! [`dispatch`] is the entry point for whole returns; [`categories`] holds
//! one mapper per government section.

pub mod categories;
pub mod dispatch;
pub mod fields;
pub mod mapper;
pub mod summary;
pub mod taxonomy;

pub use dispatch::{
    category_wise_data, collect_errors, convert_to_gov_data_format,
    convert_to_internal_data_format, InternalReturn,
};
pub use mapper::{CategoryMapper, MapperContext, RecordMapper};
pub use summary::{summarize_retsum_data, SummaryRow};
pub use taxonomy::{GovJsonKey, GstrCategory, GstrSubCategory};
