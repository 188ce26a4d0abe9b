//! The directory the engine reads from. The engine only ever consults the
//! directory, it never writes to it, so the `Provisioning` trait is a read-only
//! view. `MemoryBackend` is an in-process implementation suitable for tests and
//! for embedders that keep their directory in memory.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::prelude::*;

pub mod memory;

pub use self::memory::{MemoryBackend, MemoryBackendWriteTransaction};

/// Read access to directory entries. Implementations must be safe to share
/// between concurrent requests.
pub trait Provisioning: Send + Sync {
    fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Arc<Entry>>, OperationError>;

    fn get_by_name(
        &self,
        class: EntryClass,
        name: &str,
    ) -> Result<Option<Arc<Entry>>, OperationError>;

    /// The pseudo entry that rights without a natural target are checked against.
    fn get_global_grant(&self) -> Result<Arc<Entry>, OperationError>;

    /// The global configuration entry.
    fn get_config(&self) -> Result<Arc<Entry>, OperationError>;

    fn schema(&self) -> &Schema;

    fn get_domain_by_name(&self, name: &str) -> Result<Option<Arc<Entry>>, OperationError> {
        self.get_by_name(EntryClass::Domain, name)
    }

    /// The domain an entry lives in. A domain lives in itself.
    fn get_domain_of(&self, entry: &Entry) -> Result<Option<Arc<Entry>>, OperationError> {
        match entry.domain_name() {
            Some(domain_name) => self.get_domain_by_name(domain_name),
            None => Ok(None),
        }
    }

    /// Resolve an alias to the entry it points at. A dangling alias resolves to `None`.
    fn get_alias_target(&self, alias: &Entry) -> Result<Option<Arc<Entry>>, OperationError> {
        match alias.get_ava_single_uuid(&Attribute::AliasTargetId) {
            Some(target) => self.get_by_uuid(target),
            None => Ok(None),
        }
    }

    /// The groups an entry is a member of, directly or through nested groups.
    fn get_groups_of(&self, entry: &Entry) -> Result<Vec<Arc<Entry>>, OperationError> {
        let mut seen = BTreeSet::new();
        let mut queue: Vec<Uuid> = entry.get_ava_as_uuids(&Attribute::MemberOf).collect();
        let mut groups = Vec::new();

        while let Some(uuid) = queue.pop() {
            if !seen.insert(uuid) {
                continue;
            }
            match self.get_by_uuid(uuid)? {
                Some(group) if group.get_class().is_group() => {
                    queue.extend(group.get_ava_as_uuids(&Attribute::MemberOf));
                    groups.push(group);
                }
                Some(other) => {
                    trace!(entry = %entry.get_name(), member_of = %other, "memberof does not refer to a group, ignoring");
                }
                None => {
                    trace!(entry = %entry.get_name(), %uuid, "memberof refers to a missing entry, ignoring");
                }
            }
        }

        Ok(groups)
    }
}
