//! Slowly-decaying per-column peak tracker drawn behind the live spectrum
//! trace. A column jumps up to a new peak immediately but decays toward the
//! current sample by a fixed factor, so short bursts stay visible for a few
//! seconds instead of vanishing on the next frame.

/// Fraction of the held value kept per tick when decaying.
const DECAY: f32 = 0.997;

pub struct MaxHoldTrace {
    values: Vec<f32>,
}

impl MaxHoldTrace {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// One entry per pixel column. Any width change invalidates the trace:
    /// it is reallocated and filled with the current scale floor.
    pub fn ensure_width(&mut self, width: usize, floor_db: f32) {
        if self.values.len() != width {
            self.values = vec![floor_db; width];
        }
    }

    /// Feed one frame of per-column samples (already downsampled to pixel
    /// columns). `samples` must match the current width.
    pub fn update(&mut self, samples: &[f32]) {
        debug_assert_eq!(samples.len(), self.values.len());
        for (hold, &s) in self.values.iter_mut().zip(samples) {
            if s > *hold {
                *hold = s;
            } else {
                *hold = *hold * DECAY + s * (1.0 - DECAY);
            }
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Map `n` raw bins onto `width` pixel columns by integer downsampling:
/// column `x` takes bin `floor(x*n/width)`.
pub fn bins_to_columns(bins: &[f32], width: usize) -> Vec<f32> {
    let n = bins.len();
    if n == 0 || width == 0 {
        return vec![];
    }
    (0..width)
        .map(|x| bins[(x * n / width).min(n - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_adopted_immediately() {
        let mut mh = MaxHoldTrace::new();
        mh.ensure_width(4, -130.0);
        mh.update(&[-60.0, -80.0, -130.0, -50.0]);
        assert_eq!(mh.values(), &[-60.0, -80.0, -130.0, -50.0]);
    }

    #[test]
    fn test_decay_stays_between_sample_and_hold() {
        let mut mh = MaxHoldTrace::new();
        mh.ensure_width(1, -130.0);
        mh.update(&[-50.0]);
        mh.update(&[-100.0]);
        let h = mh.values()[0];
        // Strictly between the new sample and the old hold, close to the hold.
        assert!(h < -50.0 && h > -100.0);
        assert!(h > -55.0, "decay should be slow, got {h}");
    }

    #[test]
    fn test_decay_converges_to_constant_sample() {
        let mut mh = MaxHoldTrace::new();
        mh.ensure_width(1, -130.0);
        mh.update(&[-40.0]);
        for _ in 0..5000 {
            mh.update(&[-90.0]);
        }
        assert!((mh.values()[0] - -90.0).abs() < 1.0);
    }

    #[test]
    fn test_width_change_resets_to_floor() {
        let mut mh = MaxHoldTrace::new();
        mh.ensure_width(2, -130.0);
        mh.update(&[-40.0, -40.0]);
        mh.ensure_width(3, -120.0);
        assert_eq!(mh.values(), &[-120.0, -120.0, -120.0]);
        // Same width: no reset
        mh.update(&[-40.0, -40.0, -40.0]);
        mh.ensure_width(3, -120.0);
        assert_eq!(mh.values(), &[-40.0, -40.0, -40.0]);
    }

    #[test]
    fn test_bins_downsample_integer_mapping() {
        let bins: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let cols = bins_to_columns(&bins, 5);
        assert_eq!(cols, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        // More columns than bins: bins repeat, last column stays in range.
        let cols = bins_to_columns(&bins, 25);
        assert_eq!(cols.len(), 25);
        assert_eq!(cols[24], 9.0);
    }
}
