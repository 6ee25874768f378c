pub mod resolver;
pub mod spatial;

pub use resolver::{resolve, ResolvedTargets};
pub use spatial::{AllPositioned, SpatialQuery};
