//! Snapshot-based in-memory variable store.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::VariableStore;
use crate::error::QueryError;
use crate::model::{TaskFilter, TaskId, VariableRecord};
use crate::pagination::{PageQuery, PageResult};

type Snapshot = HashMap<TaskId, Vec<VariableRecord>>;

/// Variable store holding an immutable snapshot behind `ArcSwap`.
///
/// Readers load the current snapshot without locking; writers publish a
/// modified copy. Writes are meant for seeding, not for high churn.
#[derive(Debug, Default)]
pub struct InMemoryVariableStore {
    snapshot: ArcSwap<Snapshot>,
}

impl InMemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = VariableRecord>) -> Self {
        let store = Self::new();
        store.replace_all(records);
        store
    }

    /// Reads a JSON array of variable records.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            QueryError::StoreUnavailable(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let records: Vec<VariableRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                QueryError::StoreUnavailable(format!("Failed to parse {}: {}", path.display(), e))
            })?;
        tracing::info!(
            "Loaded {} variables from {}",
            records.len(),
            path.display()
        );
        Ok(Self::from_records(records))
    }

    /// Inserts a record, replacing any record of the same task with the same id.
    pub fn insert(&self, record: VariableRecord) {
        self.snapshot.rcu(|current| {
            let mut next = Snapshot::clone(current);
            let records = next.entry(record.task_id().clone()).or_default();
            match records.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
            next
        });
    }

    /// Replaces the whole snapshot.
    pub fn replace_all(&self, records: impl IntoIterator<Item = VariableRecord>) {
        let mut next = Snapshot::new();
        for record in records {
            let entries = next.entry(record.task_id().clone()).or_default();
            entries.retain(|r| r.id() != record.id());
            entries.push(record);
        }
        self.snapshot.store(Arc::new(next));
    }

    /// Total number of variables across all tasks.
    pub fn len(&self) -> usize {
        self.snapshot.load().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VariableStore for InMemoryVariableStore {
    fn find_all(
        &self,
        filter: &TaskFilter,
        query: &PageQuery,
    ) -> Result<PageResult<VariableRecord>, QueryError> {
        let snapshot = self.snapshot.load();
        let Some(records) = snapshot.get(&filter.task_id) else {
            return Ok(PageResult::empty(query));
        };

        let mut matching: Vec<&VariableRecord> = records
            .iter()
            .filter(|r| filter.matches(r.task_id()))
            .collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as u64;
        let start = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let window = matching
            .into_iter()
            .skip(start)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(PageResult::new(window, query.offset, query.limit, total))
    }
}
