/// Evenly spaced points starting at `start`, `step` apart. Values are computed
/// as `start + step * i` rather than accumulated, like numpy's `arange`.
pub struct Linspace {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn arange(start: f64, step: f64, len: usize) -> Self {
        Linspace {
            start,
            step,
            index: 0,
            len,
        }
    }

    /// Number of `step`-spaced points that fit in `[min, max]`, or `None`
    /// when it would exceed `limit`.
    pub fn count(min: f64, max: f64, step: f64, limit: usize) -> Option<usize> {
        // floor alone would turn 4.999999999999999 steps into 4; nudge it first
        let steps = ((max - min) / step + 1e-9).floor();

        // Also rejects an infinite span and NaN
        if !(steps >= 0. && steps < limit as f64) {
            return None;
        }

        (steps as usize).checked_add(1).filter(|n| *n <= limit)
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_arange() {
    let points: Vec<_> = Linspace::arange(0., 1., Linspace::count(0., 40., 1., 100).unwrap()).collect();

    assert_eq!(points.len(), 41);
    assert_eq!(points[0], 0.);
    assert_eq!(points[40], 40.);

    assert_eq!(Linspace::count(0., 0.5, 0.1, 100), Some(6));
    assert_eq!(Linspace::count(0., 1., 0.3, 100), Some(4));
    assert_eq!(Linspace::count(0., 40., 1., 41), Some(41));
    assert_eq!(Linspace::count(0., 40., 1., 40), None);
    assert_eq!(Linspace::count(0., 1e300, 1e-300, usize::MAX), None);
    assert_eq!(Linspace::count(-1.7e308, 1.7e308, 1., usize::MAX), None);
}
