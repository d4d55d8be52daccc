//! In-memory collaborator implementations for testing

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory return log store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryReturnLogs {
    logs: Arc<RwLock<HashMap<String, InternalData>>>,
}

impl MemoryReturnLogs {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Log name for a period and GSTIN, e.g. `GSTR1-012024-24AANFA2641L1ZF`
    pub fn log_name(period: &str, gstin: &str) -> String {
        format!("GSTR1-{period}-{gstin}")
    }

    /// Store filed data for a period
    pub fn save_filed(&self, period: &str, gstin: &str, data: InternalData) -> MapperResult<()> {
        self.logs
            .write()
            .map_err(|_| MapperError::ReturnLog("return log store is poisoned".to_string()))?
            .insert(Self::log_name(period, gstin), data);
        Ok(())
    }

    /// Clear all logs (useful for testing)
    pub fn clear(&self) -> MapperResult<()> {
        self.logs
            .write()
            .map_err(|_| MapperError::ReturnLog("return log store is poisoned".to_string()))?
            .clear();
        Ok(())
    }
}

impl ReturnLogStore for MemoryReturnLogs {
    fn filed_data(&self, period: &str, gstin: &str) -> MapperResult<Option<InternalData>> {
        let logs = self
            .logs
            .read()
            .map_err(|_| MapperError::ReturnLog("return log store is poisoned".to_string()))?;
        Ok(logs.get(&Self::log_name(period, gstin)).cloned())
    }
}

/// In-memory HSN master
#[derive(Debug, Clone, Default)]
pub struct MemoryHsnDirectory {
    descriptions: HashMap<String, String>,
}

impl MemoryHsnDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, hsn_code: &str, description: &str) -> Self {
        self.descriptions
            .insert(hsn_code.to_string(), description.to_string());
        self
    }
}

impl HsnDirectory for MemoryHsnDirectory {
    fn descriptions(&self, hsn_codes: &[String]) -> MapperResult<HashMap<String, String>> {
        Ok(hsn_codes
            .iter()
            .filter_map(|code| {
                self.descriptions
                    .get(code)
                    .map(|description| (code.clone(), description.clone()))
            })
            .collect())
    }
}

/// In-memory customer master
#[derive(Debug, Clone, Default)]
pub struct MemoryPartyLookup {
    parties: HashMap<String, String>,
}

impl MemoryPartyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_party(mut self, gstin: &str, name: &str) -> Self {
        self.parties.insert(gstin.to_string(), name.to_string());
        self
    }
}

impl PartyLookup for MemoryPartyLookup {
    fn party_for_gstin(&self, gstin: &str) -> Option<String> {
        self.parties.get(gstin).cloned()
    }
}
