use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// Frames to scan linearly from the cursor before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the keyframe interval of the previous sample.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline` this holds `[in_tangent, value, out_tangent]` per
    /// keyframe, so its length is `times.len() * 3`.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples with a fresh binary search. `None` for an empty or
    /// malformed track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        self.sample_at_frame(next_idx.saturating_sub(1), time)
    }

    /// Samples using `cursor` as a locality hint and updates it.
    ///
    /// Playback moves a few frames at a time, so a short linear scan from the
    /// previous interval usually hits; large jumps (loop wrap, scrubbing) fall
    /// back to a binary search.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return self.get_value_at(0);
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            (0..=MAX_SCAN_OFFSET).find_map(|offset| {
                let idx = i + offset;
                if idx >= len - 1 {
                    return Some(len - 1);
                }
                (time < self.times[idx + 1]).then_some(idx)
            })
        } else {
            (1..=MAX_SCAN_OFFSET.min(i)).find_map(|offset| {
                let idx = i - offset;
                (time >= self.times[idx]).then_some(idx)
            })
        };

        let index = found_index.unwrap_or_else(|| {
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        self.sample_at_frame(index, time)
    }

    fn get_value_at(&self, index: usize) -> Option<T> {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values.get(index * 3 + 1).copied(),
            _ => self.values.get(index).copied(),
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> Option<T> {
        let len = self.times.len();
        if index >= len - 1 {
            return self.get_value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.get_value_at(index),
            InterpolationMode::Linear => {
                let v0 = self.get_value_at(index)?;
                let v1 = self.get_value_at(next_idx)?;
                Some(T::interpolate_linear(v0, v1, t))
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = *self.values.get(i_prev + 1)?;
                let out_tangent0 = *self.values.get(i_prev + 2)?;
                let in_tangent1 = *self.values.get(i_next)?;
                let v1 = *self.values.get(i_next + 1)?;

                Some(T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_recovers_after_loop_wrap() {
        let track = KeyframeTrack::new(
            (0..10).map(|i| i as f32).collect(),
            (0..10).map(|i| i as f32 * 10.0).collect::<Vec<f32>>(),
            InterpolationMode::Linear,
        );
        let mut cursor = KeyframeCursor::default();
        assert_eq!(track.sample_with_cursor(8.5, &mut cursor), Some(85.0));
        assert_eq!(cursor.last_index, 8);
        assert_eq!(track.sample_with_cursor(0.5, &mut cursor), Some(5.0));
        assert_eq!(cursor.last_index, 0);
    }

    #[test]
    fn time_past_end_clamps_to_last_value() {
        let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 1.0], InterpolationMode::Linear);
        let mut cursor = KeyframeCursor::default();
        assert_eq!(track.sample_with_cursor(5.0, &mut cursor), Some(1.0));
    }

    #[test]
    fn empty_track_yields_none() {
        let track: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Step);
        assert_eq!(track.sample(0.0), None);
    }
}
