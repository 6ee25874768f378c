use crate::macros::id_newtypes;

id_newtypes!(TagName, AbilityId, ItemId, SkillId);

impl TagName {
    /// Normalizes to the crate's canonical tag spelling (lowercase snake_case).
    /// Registry content is expected to already be in this form; this just
    /// guards against authoring inconsistencies in hand-written JSON.
    pub fn normalized(s: &str) -> Self {
        TagName::new(s.trim().to_lowercase())
    }
}

pub type EncounterId = uuid::Uuid;

/// Pairs a `hecs::Entity` handle with a human-readable name for logging and
/// error messages, since the handle alone is meaningless in `Debug` output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityIdentifier {
    id: hecs::Entity,
    name: String,
}

impl EntityIdentifier {
    pub fn new(id: hecs::Entity, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> hecs::Entity {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
