//! One mapper per government JSON section

pub mod advances;
pub mod b2b;
pub mod b2cl;
pub mod b2cs;
pub mod cdn;
pub mod doc_issue;
pub mod exports;
pub mod hsn;
pub mod nil_rated;
pub mod retsum;
pub mod supecom;

pub use advances::Advances;
pub use b2b::B2b;
pub use b2cl::B2cl;
pub use b2cs::B2cs;
pub use cdn::{Cdnr, Cdnur};
pub use doc_issue::DocIssue;
pub use exports::Exports;
pub use hsn::HsnSummary;
pub use nil_rated::NilRated;
pub use retsum::{ReturnSummary, ReturnSummaryMapper};
pub use supecom::Supecom;
