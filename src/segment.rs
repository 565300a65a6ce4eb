use serde::{Deserialize, Serialize};

use crate::error::{Result, WheelError};

/// One wedge of the wheel.
///
/// `index` is the wedge's position in its list and fixes its angular span:
/// wedge `i` of `n` covers `[i * 360/n, (i+1) * 360/n)` clockwise from the
/// pointer axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Segment {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Segment {
            label: label.into(),
            weight,
            index: 0,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Checks the invariants every spin relies on: a non-empty list, strictly
/// positive finite weights with a finite sum and indices equal to positions.
pub fn validate(segments: &[Segment]) -> Result<()> {
    if segments.is_empty() {
        return Err(WheelError::invalid("segment list is empty"));
    }
    for (position, segment) in segments.iter().enumerate() {
        if !segment.weight.is_finite() || segment.weight <= 0.0 {
            return Err(WheelError::invalid(format!(
                "segment '{}' has non-positive weight {}",
                segment.label, segment.weight
            )));
        }
        if segment.index != position {
            return Err(WheelError::invalid(format!(
                "segment '{}' has index {} at position {}",
                segment.label, segment.index, position
            )));
        }
    }
    check_total(segments.iter().map(|s| s.weight))
}

/// Ordered wedge list. Every mutation re-indexes so `index == position`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

impl SegmentList {
    /// Builds a list from entries in wheel order, assigning indices.
    pub fn from_entries(entries: Vec<Segment>) -> Result<Self> {
        let mut list = SegmentList { segments: entries };
        list.reindex();
        list.segments.iter().try_for_each(check_weight)?;
        check_total(list.segments.iter().map(|s| s.weight))?;
        Ok(list)
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn push(&mut self, segment: Segment) -> Result<()> {
        check_weight(&segment)?;
        check_total(self.segments.iter().map(|s| s.weight).chain([segment.weight]))?;
        self.segments.push(segment);
        self.reindex();
        Ok(())
    }

    pub fn replace(&mut self, index: usize, segment: Segment) -> Result<()> {
        check_weight(&segment)?;
        check_total(
            self.segments
                .iter()
                .enumerate()
                .map(|(i, s)| if i == index { segment.weight } else { s.weight }),
        )?;
        let slot = self
            .segments
            .get_mut(index)
            .ok_or_else(|| WheelError::invalid(format!("no segment at index {index}")))?;
        *slot = segment;
        self.reindex();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Segment> {
        if index >= self.segments.len() {
            return Err(WheelError::invalid(format!("no segment at index {index}")));
        }
        let removed = self.segments.remove(index);
        self.reindex();
        Ok(removed)
    }

    fn reindex(&mut self) {
        for (position, segment) in self.segments.iter_mut().enumerate() {
            segment.index = position;
        }
    }
}

fn check_total(weights: impl Iterator<Item = f64>) -> Result<()> {
    let total: f64 = weights.sum();
    if total.is_finite() {
        Ok(())
    } else {
        Err(WheelError::invalid(format!("total weight {total} is not finite")))
    }
}

fn check_weight(segment: &Segment) -> Result<()> {
    if segment.weight.is_finite() && segment.weight > 0.0 {
        Ok(())
    } else {
        Err(WheelError::invalid(format!(
            "segment '{}' has non-positive weight {}",
            segment.label, segment.weight
        )))
    }
}

/// The six names the wheel starts with when no segment file is configured.
pub fn default_segments() -> SegmentList {
    let entries = vec![
        Segment::new("Jane", 100.0),
        Segment::new("Jack", 50.0),
        Segment::new("James", 50.0),
        Segment::new("Brown", 50.0),
        Segment::new("Anna", 50.0),
        Segment::new("Michel", 50.0),
    ];
    let mut list = SegmentList { segments: entries };
    list.reindex();
    list
}
