/// Flat defense stat feeding the damage pipeline's `defense_reduction`
/// curve (§4.7). Absent on an entity means no defense component was
/// attached at spawn time, which the damage pipeline treats as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defense(pub f32);
