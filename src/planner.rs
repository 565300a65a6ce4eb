use serde::Serialize;

use crate::error::{Result, WheelError};

pub const DEFAULT_EXTRA_REVOLUTIONS: u32 = 8;

/// Which point of the winning wedge comes to rest under the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerAlignment {
    /// The boundary after the winning wedge, `(i + 1) * angle`.
    #[default]
    TrailingEdge,
    /// The wedge midpoint, `(i + 0.5) * angle`.
    Center,
}

impl PointerAlignment {
    fn offset(self) -> f64 {
        match self {
            PointerAlignment::TrailingEdge => 1.0,
            PointerAlignment::Center => 0.5,
        }
    }
}

/// Computes forward-only target rotations that land a chosen wedge under
/// the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlanner {
    pub extra_revolutions: u32,
    pub alignment: PointerAlignment,
}

impl Default for SpinPlanner {
    fn default() -> Self {
        SpinPlanner {
            extra_revolutions: DEFAULT_EXTRA_REVOLUTIONS,
            alignment: PointerAlignment::TrailingEdge,
        }
    }
}

impl SpinPlanner {
    pub fn new(extra_revolutions: u32, alignment: PointerAlignment) -> Self {
        SpinPlanner {
            extra_revolutions,
            alignment,
        }
    }

    /// Rest angle in `[0, 360)` for `winner_index`.
    pub fn rest_angle(&self, segment_count: usize, winner_index: usize) -> Result<f64> {
        check_bounds(segment_count, winner_index)?;
        let angle_per_segment = 360.0 / segment_count as f64;
        Ok(normalize((winner_index as f64 + self.alignment.offset()) * angle_per_segment))
    }

    pub fn plan(
        &self,
        current_rotation: f64,
        segment_count: usize,
        winner_index: usize,
    ) -> Result<f64> {
        let target_mod = self.rest_angle(segment_count, winner_index)?;
        let current_mod = normalize(current_rotation);
        let mut distance = target_mod - current_mod;
        // Zero distance still travels a full turn.
        if distance <= 0.0 {
            distance += 360.0;
        }
        Ok(current_rotation + distance + 360.0 * self.extra_revolutions as f64)
    }
}

/// Trailing-edge plan: rotation that rests `winner_index` under the pointer
/// after `extra_revolutions` additional full turns.
pub fn plan_spin(
    current_rotation: f64,
    segment_count: usize,
    winner_index: usize,
    extra_revolutions: u32,
) -> Result<f64> {
    SpinPlanner::new(extra_revolutions, PointerAlignment::TrailingEdge).plan(
        current_rotation,
        segment_count,
        winner_index,
    )
}

fn check_bounds(segment_count: usize, winner_index: usize) -> Result<()> {
    if segment_count == 0 {
        return Err(WheelError::invalid("segment count must be positive"));
    }
    if winner_index >= segment_count {
        return Err(WheelError::invalid(format!(
            "winner index {winner_index} out of range for {segment_count} segments"
        )));
    }
    Ok(())
}

/// Maps any angle into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn mod_close(a: f64, b: f64) -> bool {
        let diff = normalize(a - b);
        diff < EPS || 360.0 - diff < EPS
    }

    #[test]
    fn test_first_spin_from_rest() {
        assert_eq!(plan_spin(0.0, 6, 1, 8).unwrap(), 3000.0);
    }

    #[test]
    fn test_same_winner_travels_full_turn() {
        assert_eq!(plan_spin(3000.0, 6, 1, 8).unwrap(), 6240.0);
    }

    #[test]
    fn test_last_segment_wraps_to_zero() {
        // (5 + 1) * 60 = 360 rests at 0 mod 360.
        let target = plan_spin(0.0, 6, 5, 8).unwrap();
        assert_eq!(target, 360.0 + 2880.0);
        assert!(mod_close(target, 0.0));
    }

    #[test]
    fn test_postconditions_hold_across_inputs() {
        let rotations = [0.0, 1.5, 59.9, 120.0, 359.999, 3000.0, 6240.0, 123_456.789];
        for &current in &rotations {
            for count in 1..=13usize {
                for winner in 0..count {
                    for extra in [0u32, 1, 8] {
                        let target = plan_spin(current, count, winner, extra).unwrap();
                        let expected = ((winner + 1) as f64) * 360.0 / count as f64;
                        assert!(target > current);
                        assert!(mod_close(target, expected), "{current} {count} {winner}");
                        let travel = target - current;
                        assert!(travel >= 360.0 * extra as f64 - EPS);
                        assert!(travel <= 360.0 * (extra + 1) as f64 + EPS);
                    }
                }
            }
        }
    }

    #[test]
    fn test_center_alignment() {
        let planner = SpinPlanner::new(8, PointerAlignment::Center);
        assert_eq!(planner.rest_angle(6, 1).unwrap(), 90.0);
        assert_eq!(planner.plan(0.0, 6, 1).unwrap(), 90.0 + 2880.0);
    }

    #[test]
    fn test_negative_rotation_normalizes() {
        assert_eq!(normalize(-30.0), 330.0);
        let target = plan_spin(-30.0, 6, 0, 0).unwrap();
        // from 330 forward to 60 is 90 degrees.
        assert!((target - 60.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(matches!(plan_spin(0.0, 0, 0, 8), Err(WheelError::InvalidInput(_))));
        assert!(matches!(plan_spin(0.0, 6, 6, 8), Err(WheelError::InvalidInput(_))));
    }
}
