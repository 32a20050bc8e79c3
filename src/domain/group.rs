use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

pub const GROUP_CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A shared group identified by a short join code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            code: generate_code(),
        }
    }
}

impl Identifiable for Group {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Group {
    fn display_label(&self) -> String {
        format!("{} (code {})", self.name, self.code)
    }
}

/// Six uppercase base-36 characters drawn from a fresh v4 UUID.
pub fn generate_code() -> String {
    encode_code(Uuid::new_v4().as_u128())
}

fn encode_code(mut seed: u128) -> String {
    let mut code = String::with_capacity(GROUP_CODE_LEN);
    for _ in 0..GROUP_CODE_LEN {
        code.push(CODE_ALPHABET[(seed % 36) as usize] as char);
        seed /= 36;
    }
    code
}

/// Normalizes a typed code the way stored codes are written.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
