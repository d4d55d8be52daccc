//! Collaborator traits the mapping engine reads from
//!
//! The engine never persists anything itself. Filed returns, HSN master data
//! and party names come from implementations of these traits; see
//! [`crate::utils::memory_storage`] for in-memory versions.

use std::collections::HashMap;

use crate::types::{InternalData, MapperResult};

/// Access to GSTR-1 snapshots stored per return period
pub trait ReturnLogStore {
    /// Filed data for a return period (`MMYYYY`) and GSTIN
    ///
    /// Returns `None` when no snapshot exists for the period.
    fn filed_data(&self, period: &str, gstin: &str) -> MapperResult<Option<InternalData>>;
}

/// HSN master data
pub trait HsnDirectory {
    /// Descriptions for a batch of HSN codes; unknown codes are left out
    fn descriptions(&self, hsn_codes: &[String]) -> MapperResult<HashMap<String, String>>;
}

/// Customer master data
pub trait PartyLookup {
    /// Customer name registered against a GSTIN
    fn party_for_gstin(&self, gstin: &str) -> Option<String>;
}
