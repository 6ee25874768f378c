use std::fmt;

/// Fatal-at-load-time error (spec §7: "raised only at `load`; fatal to
/// startup"). Every other error kind in the crate is non-fatal and gets
/// folded into a warning instead — see `effects::config::EffectConfig`.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    InvalidRegistry { reason: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidRegistry { reason } => {
                write!(f, "invalid tag registry: {reason}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::InvalidRegistry {
            reason: format!("malformed JSON: {err}"),
        }
    }
}
