use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::common::{match_id, parse_amount};
use crate::domain::split::{default_members, even_split, Member, SplitRecord};
use crate::errors::LedgerError;
use crate::storage::{keys, load_value, save_value, KeyValueStore};

use super::{ServiceError, ServiceResult};

/// Split members (persisted) and the history of computed splits (session only).
pub struct SplitService {
    store: Arc<dyn KeyValueStore>,
    members: Vec<Member>,
    history: Vec<SplitRecord>,
}

impl SplitService {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let members = match load_value::<Vec<Member>>(store.as_ref(), keys::SPLIT_MEMBERS) {
            Some(members) => members,
            None => {
                debug!("seeding default split members");
                let seeded = default_members();
                save_value(store.as_ref(), keys::SPLIT_MEMBERS, &seeded);
                seeded
            }
        };
        Self {
            store,
            members,
            history: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn find_member(&self, needle: &str) -> Option<Uuid> {
        match_id(&self.members, needle).or_else(|| {
            self.members
                .iter()
                .find(|member| member.name.eq_ignore_ascii_case(needle.trim()))
                .map(|member| member.id)
        })
    }

    pub fn add_member(&mut self, name: &str) -> ServiceResult<&Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("member name is required".into()));
        }
        self.members.push(Member::new(name));
        info!(member = %name, "split member added");
        self.persist();
        let last = self.members.len() - 1;
        Ok(&self.members[last])
    }

    pub fn remove_member(&mut self, id: Uuid) -> ServiceResult<Member> {
        let position = self.position(id)?;
        let removed = self.members.remove(position);
        info!(member = %removed.name, "split member removed");
        self.persist();
        Ok(removed)
    }

    /// Flips whether the member takes part in the next split.
    pub fn toggle(&mut self, id: Uuid) -> ServiceResult<bool> {
        let position = self.position(id)?;
        let member = &mut self.members[position];
        member.selected = !member.selected;
        let selected = member.selected;
        self.persist();
        Ok(selected)
    }

    pub fn calculate(&mut self, total_text: &str, now: NaiveDateTime) -> ServiceResult<&SplitRecord> {
        let total = parse_amount(total_text)
            .ok_or_else(|| ServiceError::Invalid("enter a total amount".into()))?;
        if total < 0.0 {
            return Err(LedgerError::Validation(format!("`{}` is negative", total_text.trim())).into());
        }
        let shares = even_split(total, &self.members)
            .ok_or_else(|| ServiceError::Invalid("select at least one member".into()))?;
        let record = SplitRecord {
            id: Uuid::new_v4(),
            created_at: now,
            amount: total,
            shares,
        };
        info!(amount = total, people = record.shares.len(), "split calculated");
        self.history.insert(0, record);
        Ok(&self.history[0])
    }

    /// Computed splits, newest first.
    pub fn history(&self) -> &[SplitRecord] {
        &self.history
    }

    pub fn find_history_entry(&self, needle: &str) -> Option<Uuid> {
        match_id(&self.history, needle)
    }

    pub fn clear_history_entry(&mut self, id: Uuid) -> ServiceResult<SplitRecord> {
        let position = self
            .history
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("split {id}")))?;
        Ok(self.history.remove(position))
    }

    fn position(&self, id: Uuid) -> ServiceResult<usize> {
        self.members
            .iter()
            .position(|member| member.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("member {id}")).into())
    }

    fn persist(&self) -> bool {
        save_value(self.store.as_ref(), keys::SPLIT_MEMBERS, &self.members)
    }
}
