use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Optional creature category used by geometry context filters (spec
/// §4.5: "Category-specific filters (e.g., `undead`)"). Entities without
/// this component are kept under `all` and excluded under any specific
/// category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityCategory {
    Humanoid,
    Beast,
    Undead,
    Construct,
    Elemental,
    Demon,
}

/// Which side of a fight an entity belongs to. Used by the geometry
/// resolver's `enemy`/`ally`/`self` context filter (§4.5) and by the
/// Combat Manager to decide who is a valid ability target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Players,
    Enemies,
}

impl Faction {
    pub fn is_hostile_to(&self, other: &Faction) -> bool {
        self != other
    }
}
