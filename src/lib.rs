//! # GSTR-1 Mapper
//!
//! Conversion of Indian GSTR-1 returns between the government JSON schema and
//! an internal record format, plus preparation of the same records from books
//! data with rounding reconciliation.
//!
//! ## Features
//!
//! - **Government JSON mapping**: B2B, B2CL, exports, B2CS, nil-rated, credit/debit
//!   notes, HSN summary, advances, documents issued, e-commerce supplies and the
//!   return summary, in both directions
//! - **Error collection**: records flagged by the portal with an error code or message
//! - **Books data**: invoice, HSN and summary rows from line items, with rounding
//!   differences reported and HSN totals reconciled to invoice totals
//! - **Quarterly filing**: month 1/2 exclusion and month 3 already-filed buckets
//! - **Collaborator traits**: return logs, HSN master and party lookup are injected
//!
//! ## Quick Start
//!
//! ```rust
//! use gstr1_mapper::gstr1::{convert_to_internal_data_format, GstrSubCategory, MapperContext};
//! use serde_json::json;
//!
//! let gov_data = json!({
//!     "b2cs": [
//!         {"sply_ty": "INTER", "rt": 5, "typ": "OE", "pos": "05", "txval": 110, "iamt": 5.5, "csamt": 0}
//!     ]
//! });
//!
//! let context = MapperContext::new("24AANFA2641L1ZF");
//! let internal = convert_to_internal_data_format(&gov_data, &context)?;
//! assert_eq!(internal.data.records(GstrSubCategory::B2cs).count(), 1);
//! # Ok::<(), gstr1_mapper::MapperError>(())
//! ```

pub mod config;
pub mod gstr1;
pub mod reconciliation;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use gstr1::{
    convert_to_gov_data_format, convert_to_internal_data_format, CategoryMapper, GovJsonKey,
    GstrCategory, GstrSubCategory, MapperContext,
};
pub use reconciliation::{BookItem, BooksData, BooksInput, Gstr1BooksData};
pub use tax::gst::*;
pub use traits::*;
pub use types::*;
