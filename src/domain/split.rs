//! Participants and results for even expense splitting.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub selected: bool,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            selected: true,
        }
    }
}

impl Identifiable for Member {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Members seeded when nothing has been stored yet.
pub fn default_members() -> Vec<Member> {
    vec![Member::new("Ming"), Member::new("Hua")]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberShare {
    pub member_id: Uuid,
    pub name: String,
    pub share: f64,
}

impl Displayable for MemberShare {
    fn display_label(&self) -> String {
        format!("{} owes {:.0}", self.name, self.share)
    }
}

/// One computed split, kept in the session history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitRecord {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub amount: f64,
    pub shares: Vec<MemberShare>,
}

impl Identifiable for SplitRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Divides `total` evenly across the selected members, rounding each share to
/// whole units. Returns `None` when nobody is selected.
pub fn even_split(total: f64, members: &[Member]) -> Option<Vec<MemberShare>> {
    let selected: Vec<&Member> = members.iter().filter(|m| m.selected).collect();
    if selected.is_empty() {
        return None;
    }
    let share = (total / selected.len() as f64).round();
    Some(
        selected
            .into_iter()
            .map(|member| MemberShare {
                member_id: member.id,
                name: member.name.clone(),
                share,
            })
            .collect(),
    )
}
