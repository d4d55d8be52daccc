//! Indian GST reference data: supply types, state codes and unit codes

pub mod gst;
pub mod states;
pub mod uom;

pub use gst::*;
