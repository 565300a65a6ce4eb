use log::trace;

/// Receives one call per wedge boundary the pointer passes.
pub trait TickNotifier {
    fn tick(&mut self, segment: i64);
}

/// Notifier that only logs, used when no sound sink is attached.
#[derive(Debug, Default)]
pub struct LogTicks;

impl TickNotifier for LogTicks {
    fn tick(&mut self, segment: i64) {
        trace!("tick at segment {segment}");
    }
}

impl<F: FnMut(i64)> TickNotifier for F {
    fn tick(&mut self, segment: i64) {
        self(segment)
    }
}

/// Tracks which wedge the pointer is over and reports boundary crossings.
#[derive(Debug, Default)]
pub struct TickTracker {
    last_segment: Option<i64>,
}

impl TickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the current animated rotation. Fires `notifier` when the
    /// pointer has moved into a different wedge since the last call.
    /// The first observation after a reset only records the position.
    pub fn observe<N: TickNotifier + ?Sized>(
        &mut self,
        rotation: f64,
        segment_count: usize,
        notifier: &mut N,
    ) -> bool {
        if segment_count == 0 {
            return false;
        }
        let angle_per_segment = 360.0 / segment_count as f64;
        let segment = (rotation / angle_per_segment).floor() as i64;
        let crossed = matches!(self.last_segment, Some(last) if last != segment);
        self.last_segment = Some(segment);
        if crossed {
            notifier.tick(segment);
        }
        crossed
    }

    pub fn reset(&mut self) {
        self.last_segment = None;
    }
}
