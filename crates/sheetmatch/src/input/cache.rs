//! Session-scoped memo of loaded tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::table::DataTable;

use super::{LoadRequest, TableSource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    identity: String,
    request: LoadRequest,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Avoids re-parsing the same (content, sheet, header row) within a session.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<CacheKey, DataTable>,
    stats: CacheStats,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through the cache. Errors are not cached.
    pub fn load<S>(&mut self, source: &S, request: &LoadRequest) -> Result<DataTable>
    where
        S: TableSource + ?Sized,
    {
        let key = CacheKey {
            identity: source.identity().to_string(),
            request: request.clone(),
        };

        if let Some(table) = self.entries.get(&key) {
            self.stats.hits += 1;
            trace!(identity = %key.identity, "cache hit");
            return Ok(table.clone());
        }

        self.stats.misses += 1;
        let table = source.load(request)?;
        self.entries.insert(key, table.clone());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
