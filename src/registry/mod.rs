pub mod error;
pub mod serialize;
pub mod tag_definition;
pub mod tag_registry;

pub use error::RegistryError;
pub use tag_definition::{Category, Context, StackingPolicy, TagDefinition};
pub use tag_registry::TagRegistry;
