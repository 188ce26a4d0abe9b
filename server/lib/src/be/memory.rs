use std::sync::Arc;

use concread::cowcell::{CowCell, CowCellWriteTxn};
use hashbrown::HashMap;

use super::Provisioning;
use crate::prelude::*;

#[derive(Clone, Default)]
struct MemoryBackendInner {
    entries: HashMap<Uuid, Arc<Entry>>,
    names: HashMap<(EntryClass, String), Uuid>,
}

/// An in-memory directory. Readers always see the last committed state, and
/// writers are serialised through `write()`.
pub struct MemoryBackend {
    inner: CowCell<MemoryBackendInner>,
    schema: Schema,
    global_grant: Arc<Entry>,
    config: Arc<Entry>,
}

pub struct MemoryBackendWriteTransaction<'a> {
    inner: CowCellWriteTxn<'a, MemoryBackendInner>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        MemoryBackend::new(Schema::new())
    }
}

impl MemoryBackend {
    pub fn new(schema: Schema) -> Self {
        let global_grant = Arc::new(Entry::new(EntryClass::GlobalGrant, DEFAULT_GLOBAL_GRANT_NAME));
        let config = Arc::new(Entry::new(EntryClass::Config, GLOBAL_CONFIG_NAME));

        let mut inner = MemoryBackendInner::default();
        for e in [&global_grant, &config] {
            inner.entries.insert(e.get_uuid(), e.clone());
            inner
                .names
                .insert((e.get_class(), e.get_name().to_string()), e.get_uuid());
        }

        MemoryBackend {
            inner: CowCell::new(inner),
            schema,
            global_grant,
            config,
        }
    }

    pub fn write(&self) -> MemoryBackendWriteTransaction<'_> {
        MemoryBackendWriteTransaction {
            inner: self.inner.write(),
        }
    }
}

impl Provisioning for MemoryBackend {
    fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Arc<Entry>>, OperationError> {
        Ok(self.inner.read().entries.get(&uuid).cloned())
    }

    fn get_by_name(
        &self,
        class: EntryClass,
        name: &str,
    ) -> Result<Option<Arc<Entry>>, OperationError> {
        let inner = self.inner.read();
        Ok(inner
            .names
            .get(&(class, name.to_lowercase()))
            .and_then(|uuid| inner.entries.get(uuid))
            .cloned())
    }

    fn get_global_grant(&self) -> Result<Arc<Entry>, OperationError> {
        Ok(self.global_grant.clone())
    }

    fn get_config(&self) -> Result<Arc<Entry>, OperationError> {
        Ok(self.config.clone())
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl MemoryBackendWriteTransaction<'_> {
    pub fn create(&mut self, entry: Entry) -> Result<Arc<Entry>, OperationError> {
        let inner = self.inner.get_mut();
        let name_key = (entry.get_class(), entry.get_name().to_string());

        if inner.entries.contains_key(&entry.get_uuid()) || inner.names.contains_key(&name_key) {
            admin_warn!(entry = %entry, "refusing to create duplicate entry");
            return Err(OperationError::InvalidRequest(format!(
                "entry already exists: {}",
                entry.get_name()
            )));
        }

        let entry = Arc::new(entry);
        inner.names.insert(name_key, entry.get_uuid());
        inner.entries.insert(entry.get_uuid(), entry.clone());
        Ok(entry)
    }

    /// Replace an existing entry with a new version of itself.
    pub fn replace(&mut self, entry: Entry) -> Result<Arc<Entry>, OperationError> {
        let inner = self.inner.get_mut();
        let Some(previous) = inner.entries.get(&entry.get_uuid()).cloned() else {
            return Err(OperationError::NoSuchEntry(entry.get_uuid().to_string()));
        };

        inner
            .names
            .remove(&(previous.get_class(), previous.get_name().to_string()));
        inner
            .names
            .insert((entry.get_class(), entry.get_name().to_string()), entry.get_uuid());

        let entry = Arc::new(entry);
        inner.entries.insert(entry.get_uuid(), entry.clone());
        Ok(entry)
    }

    pub fn delete(&mut self, uuid: Uuid) -> Result<(), OperationError> {
        let inner = self.inner.get_mut();
        let Some(previous) = inner.entries.remove(&uuid) else {
            return Err(OperationError::NoSuchEntry(uuid.to_string()));
        };
        inner
            .names
            .remove(&(previous.get_class(), previous.get_name().to_string()));
        Ok(())
    }

    pub fn commit(self) {
        self.inner.commit();
    }
}
