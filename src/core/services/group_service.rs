use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::common::match_id;
use crate::domain::group::{normalize_code, Group};
use crate::errors::LedgerError;
use crate::storage::{keys, load_collection, save_value, KeyValueStore};

use super::{ServiceError, ServiceResult};

/// Result of looking up a typed join code. Codes are only known locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    AlreadyJoined(Group),
    UnknownCode,
    Empty,
}

pub struct GroupService {
    store: Arc<dyn KeyValueStore>,
    groups: Vec<Group>,
}

impl GroupService {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let groups = load_collection(store.as_ref(), keys::GROUPS);
        Self { store, groups }
    }

    /// Groups, newest first.
    pub fn list(&self) -> &[Group] {
        &self.groups
    }

    pub fn find_id(&self, needle: &str) -> Option<Uuid> {
        match_id(&self.groups, needle)
    }

    pub fn create(&mut self, name: &str) -> ServiceResult<&Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("group name is required".into()));
        }
        let mut group = Group::new(name);
        while self.groups.iter().any(|existing| existing.code == group.code) {
            group = Group::new(name);
        }
        info!(id = %group.id, code = %group.code, "group created");
        self.groups.insert(0, group);
        self.persist();
        Ok(&self.groups[0])
    }

    pub fn join(&self, code: &str) -> JoinOutcome {
        let code = normalize_code(code);
        if code.is_empty() {
            return JoinOutcome::Empty;
        }
        match self.groups.iter().find(|group| group.code == code) {
            Some(group) => JoinOutcome::AlreadyJoined(group.clone()),
            None => JoinOutcome::UnknownCode,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> ServiceResult<Group> {
        let position = self
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("group {id}")))?;
        let removed = self.groups.remove(position);
        info!(%id, "group removed");
        self.persist();
        Ok(removed)
    }

    fn persist(&self) -> bool {
        save_value(self.store.as_ref(), keys::GROUPS, &self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn create_trims_and_prepends() {
        let mut service = GroupService::load(Arc::new(MemoryStore::new()));
        service.create("Trip").unwrap();
        service.create("  Flat  ").unwrap();
        assert_eq!(service.list()[0].name, "Flat");
        assert!(service.create("   ").is_err());
        assert_ne!(service.list()[0].code, service.list()[1].code);
    }

    #[test]
    fn join_matches_existing_codes_case_insensitively() {
        let mut service = GroupService::load(Arc::new(MemoryStore::new()));
        let code = service.create("Trip").unwrap().code.clone();
        match service.join(&format!(" {} ", code.to_lowercase())) {
            JoinOutcome::AlreadyJoined(group) => assert_eq!(group.name, "Trip"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(service.join("NOPE00"), JoinOutcome::UnknownCode);
        assert_eq!(service.join("   "), JoinOutcome::Empty);
    }

    #[test]
    fn remove_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut service = GroupService::load(store.clone());
        let id = service.create("Trip").unwrap().id;
        assert_eq!(GroupService::load(store.clone()).list().len(), 1);
        service.remove(id).unwrap();
        assert!(service.remove(id).is_err());
        assert!(GroupService::load(store).list().is_empty());
    }
}
