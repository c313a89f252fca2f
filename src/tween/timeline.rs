use crate::tween::tween::{Tween, TweenState, Tweenable};

/// Where a tween is placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Seconds after the previous tween ends (negative overlaps it).
    After(f32),
    /// Absolute start time in seconds.
    At(f32),
}

impl Default for Position {
    fn default() -> Self {
        Position::After(0.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    tween: Tween,
    start: f32,
}

impl Entry {
    fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// Ordered tweens over one target, driven by explicit time deltas.
///
/// Entries are rendered in insertion order on every tick, so where two
/// overlap the later one's writes win.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    time: f32,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tween and returns its index.
    pub fn add(&mut self, tween: Tween, position: Position) -> usize {
        let start = match position {
            Position::After(offset) => {
                let prev_end = self.entries.last().map_or(0.0, Entry::end);
                (prev_end + offset).max(0.0)
            }
            Position::At(t) => t.max(0.0),
        };
        self.entries.push(Entry { tween, start });
        self.entries.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End of the latest tween.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.entries.iter().map(Entry::end).fold(0.0, f32::max)
    }

    /// Playhead position in seconds, clamped to `duration()`.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn start_time(&self, index: usize) -> Option<f32> {
        self.entries.get(index).map(|e| e.start)
    }

    #[must_use]
    pub fn tween(&self, index: usize) -> Option<&Tween> {
        self.entries.get(index).map(|e| &e.tween)
    }

    /// Every tween has rendered its final state.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.tween.state() == TweenState::Complete)
    }

    /// Advances the playhead by `dt` (negative deltas count as zero) and
    /// renders every reached tween into `target`, calling `on_update` after
    /// each write.
    pub fn tick<T, F>(&mut self, dt: f32, target: &mut T, mut on_update: F)
    where
        T: Tweenable + ?Sized,
        F: FnMut(&mut T),
    {
        if self.is_complete() {
            return;
        }

        self.time = (self.time + dt.max(0.0)).min(self.duration());

        for (index, entry) in self.entries.iter_mut().enumerate() {
            let local = self.time - entry.start;
            let before = entry.tween.state();
            if !entry.tween.render(local, target) {
                continue;
            }
            if before == TweenState::Pending {
                log::debug!("timeline: step {} started at t={:.3}", index + 1, entry.start);
            }
            if entry.tween.state() == TweenState::Complete {
                log::debug!("timeline: step {} complete at t={:.3}", index + 1, self.time);
            }
            on_update(target);
        }
    }
}
