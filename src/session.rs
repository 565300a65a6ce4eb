//! Spin session: the single owner of wheel state for one screen.
//!
//! Phases move `Idle -> Spinning -> Presenting -> Idle`. Segment edits made
//! outside `Spinning` force the wheel back to `Idle` at rotation zero with
//! the animation skipped.

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::error::{Result, WheelError};
use crate::planner::SpinPlanner;
use crate::roulette;
use crate::segment::{Segment, SegmentList};
use crate::tick::{TickNotifier, TickTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Presenting,
}

/// Read-only copy of the winning wedge, latched when the spin lands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Winner {
    pub index: usize,
    pub label: String,
    pub weight: f64,
    pub image: Option<String>,
}

impl From<&Segment> for Winner {
    fn from(segment: &Segment) -> Self {
        Winner {
            index: segment.index,
            label: segment.label.clone(),
            weight: segment.weight,
            image: segment.image.clone(),
        }
    }
}

/// What the animation driver should play for an accepted spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub winner_index: usize,
    pub from: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinRequest {
    Started(SpinPlan),
    /// Already spinning, showing a winner, or nothing to spin.
    Ignored,
}

/// Instant rotation reset emitted after a segment edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resync {
    pub from: f64,
    pub to: f64,
}

pub struct SpinSession<R, N> {
    segments: SegmentList,
    planner: SpinPlanner,
    rng: R,
    ticks: N,
    tracker: TickTracker,
    phase: SpinPhase,
    rotation: f64,
    selected_index: Option<usize>,
    winner: Option<Winner>,
    skip_next_animation: bool,
}

impl<R: Rng, N: TickNotifier> SpinSession<R, N> {
    pub fn new(segments: SegmentList, planner: SpinPlanner, rng: R, ticks: N) -> Self {
        SpinSession {
            segments,
            planner,
            rng,
            ticks,
            tracker: TickTracker::new(),
            phase: SpinPhase::Idle,
            rotation: 0.0,
            selected_index: None,
            winner: None,
            skip_next_animation: false,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Cumulative rotation the wheel is at, or heading to while spinning.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    pub fn planner(&self) -> &SpinPlanner {
        &self.planner
    }

    pub fn skip_next_animation(&self) -> bool {
        self.skip_next_animation
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// Selects a winner and plans the rotation that lands on it.
    ///
    /// State is only touched once both steps have succeeded.
    pub fn request_spin(&mut self) -> Result<SpinRequest> {
        if self.phase != SpinPhase::Idle {
            warn!("spin request ignored while {:?}", self.phase);
            return Ok(SpinRequest::Ignored);
        }
        if self.segments.is_empty() {
            warn!("spin request ignored: no segments");
            return Ok(SpinRequest::Ignored);
        }

        let winner_index = roulette::select_winner(self.segments.as_slice(), &mut self.rng)?;
        let target = self
            .planner
            .plan(self.rotation, self.segments.len(), winner_index)?;

        debug!("rotation before {:.3}, after {:.3}", self.rotation, target);
        let plan = SpinPlan {
            winner_index,
            from: self.rotation,
            target,
        };
        self.rotation = target;
        self.selected_index = Some(winner_index);
        self.winner = None;
        self.skip_next_animation = false;
        self.phase = SpinPhase::Spinning;
        info!("spinning towards segment {winner_index}");
        Ok(SpinRequest::Started(plan))
    }

    /// Feeds an animated frame; returns whether a tick was emitted.
    pub fn on_frame(&mut self, rotation: f64) -> bool {
        self.tracker
            .observe(rotation, self.segments.len(), &mut self.ticks)
    }

    /// Handles the driver's completion notification.
    ///
    /// A completion for a skipped (snapped) transition only clears the skip
    /// flag. Otherwise a finished spin latches and returns the winner.
    pub fn on_animation_complete(&mut self) -> Option<Winner> {
        if self.skip_next_animation {
            self.skip_next_animation = false;
            return None;
        }
        if self.phase != SpinPhase::Spinning {
            debug!("animation completion ignored while {:?}", self.phase);
            return None;
        }
        self.winner = self
            .selected_index
            .and_then(|index| self.segments.get(index))
            .map(Winner::from);
        self.phase = SpinPhase::Presenting;
        if let Some(winner) = &self.winner {
            info!("winner: {} (segment {})", winner.label, winner.index);
        }
        self.winner.clone()
    }

    /// Closes the winner dialog.
    pub fn dismiss_winner(&mut self) {
        if self.phase == SpinPhase::Presenting {
            self.phase = SpinPhase::Idle;
        }
    }

    pub fn add_segment(&mut self, segment: Segment) -> Result<Option<Resync>> {
        self.edit(|list| list.push(segment))
    }

    pub fn update_segment(&mut self, index: usize, segment: Segment) -> Result<Option<Resync>> {
        self.edit(|list| list.replace(index, segment))
    }

    pub fn remove_segment(&mut self, index: usize) -> Result<Option<Resync>> {
        self.edit(|list| list.remove(index).map(|_| ()))
    }

    pub fn replace_segments(&mut self, segments: SegmentList) -> Result<Option<Resync>> {
        self.edit(|list| {
            *list = segments;
            Ok(())
        })
    }

    fn edit<F>(&mut self, apply: F) -> Result<Option<Resync>>
    where
        F: FnOnce(&mut SegmentList) -> Result<()>,
    {
        if self.is_spinning() {
            warn!("segment edit rejected while spinning");
            return Err(WheelError::SpinInProgress);
        }
        let mut edited = self.segments.clone();
        apply(&mut edited)?;
        if edited == self.segments {
            return Ok(None);
        }
        self.segments = edited;
        Ok(self.resync())
    }

    fn resync(&mut self) -> Option<Resync> {
        self.phase = SpinPhase::Idle;
        self.tracker.reset();
        if self.rotation == 0.0 {
            return None;
        }
        let from = self.rotation;
        self.rotation = 0.0;
        self.skip_next_animation = true;
        info!("segments changed, snapping wheel from {from:.1} to rest");
        Some(Resync { from, to: 0.0 })
    }
}
