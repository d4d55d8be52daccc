//! Books data preparation and rounding reconciliation
//!
//! Builds internal GSTR-1 rows from book line items, keeps track of the
//! rounding left behind, and splits quarterly filers' data by month.

pub mod books;
pub mod quarterly;
pub mod rounding;

pub use books::{
    AdvanceEntry, BookItem, BooksData, BooksDataMapper, BooksInput, DocumentSeries,
    GstTreatment, Gstr1BooksData,
};
pub use quarterly::{process_for_quarterly, QuarterlyBuckets};
pub use rounding::{round_amount, RoundingLedger};
