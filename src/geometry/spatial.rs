use hecs::{Entity, World};

use crate::components::Position;

/// The one seam external world/chunk code plugs into (spec §6): given
/// the live world, return every entity a geometry pattern is allowed to
/// consider as a candidate target. World/chunk generation owns spatial
/// partitioning (broad-phase culling, chunk streaming); this crate only
/// needs the resulting candidate set.
pub trait SpatialQuery {
    fn candidates(&self, world: &World) -> Vec<Entity>;
}

/// Default `SpatialQuery`: every entity carrying a `Position`. Adequate
/// for encounters small enough not to need spatial partitioning — a
/// world/chunk system can substitute its own broad-phase query (a grid,
/// a BVH, a chunk-local entity list) behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPositioned;

impl SpatialQuery for AllPositioned {
    fn candidates(&self, world: &World) -> Vec<Entity> {
        world.query::<&Position>().iter().map(|(e, _)| e).collect()
    }
}
