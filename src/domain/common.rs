use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Parses user-entered money text. Blank, malformed and non-finite input yield `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Resolves an id from either its full form or a unique leading prefix.
pub fn match_id<'a, T, I>(items: I, needle: &str) -> Option<Uuid>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = needle.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut found = None;
    for item in items {
        let id = item.id();
        if id.to_string().starts_with(&needle) {
            if found.is_some() {
                return None;
            }
            found = Some(id);
        }
    }
    found
}
