use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::segment::{self, Segment};

/// Picks the winning wedge with probability `weight / total_weight`.
pub fn select_winner<R: Rng>(segments: &[Segment], rng: &mut R) -> Result<usize> {
    segment::validate(segments)?;
    let total: f64 = segments.iter().map(|s| s.weight).sum();
    let roll = rng.gen_range(0.0..total);
    let index = pick_index(segments, roll);
    debug!("roll {roll:.3} of {total:.3} -> segment {index}");
    Ok(index)
}

/// Returns the first index whose cumulative weight exceeds `roll`.
///
/// Falls through to the last index when rounding leaves `roll` at or past
/// the accumulated total.
pub fn pick_index(segments: &[Segment], roll: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, segment) in segments.iter().enumerate() {
        cumulative += segment.weight;
        if roll < cumulative {
            return index;
        }
    }
    segments.len().saturating_sub(1)
}
