use std::fmt;

use crate::utils::id::TagName;

/// Non-fatal diagnostics recorded during parsing (spec §7: `UnknownTag`,
/// `GeometryConflict`, `MutuallyExclusive` are never raised as errors —
/// they are recorded here instead, and parsing always returns a value).
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    UnknownTag { tag: TagName },
    GeometryConflict { chosen: TagName, ignored: Vec<TagName> },
    MutuallyExclusive { a: TagName, b: TagName, winner: TagName },
    SynergyApplied { tag: TagName, partner: TagName, param: String },
    UnusualContext { message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownTag { tag } => write!(f, "unknown tag: {tag}"),
            Warning::GeometryConflict { chosen, ignored } => {
                let ignored = ignored.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "geometry conflict: using {chosen}, ignoring [{ignored}]")
            }
            Warning::MutuallyExclusive { a, b, winner } => {
                write!(f, "mutually exclusive: {a} vs {b}, {winner} wins")
            }
            Warning::SynergyApplied { tag, partner, param } => {
                write!(f, "synergy applied: {tag} + {partner} boosts {param}")
            }
            Warning::UnusualContext { message } => write!(f, "{message}"),
        }
    }
}
