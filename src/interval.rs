#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same interval with the upper bound pulled in to `max`.
    pub fn with_max(&self, max: f64) -> Self {
        Self::new(self.min, max)
    }

    /// Values below `min` (and NaN) map to `min`.
    pub fn clamp(&self, x: f64) -> f64 {
        if x > self.max {
            self.max
        } else if x >= self.min {
            x
        } else {
            self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_closed() {
        let i = Interval::new(0.0, 1.0);
        assert!(i.contains(0.0) && i.contains(1.0));
        assert!(i.contains(0.5));
        assert!(!i.contains(-1e-12) && !i.contains(1.0 + 1e-12));
        assert!(!i.contains(f64::NAN));
    }

    #[test]
    fn with_max_keeps_the_lower_bound() {
        let i = Interval::new(0.001, f64::INFINITY).with_max(2.0);
        assert_eq!(i, Interval::new(0.001, 2.0));
        assert!(!i.contains(2.5));
    }

    #[test]
    fn clamp_maps_nan_to_min() {
        let i = Interval::new(0.0, 0.999);
        assert_eq!(i.clamp(f64::NAN), 0.0);
        assert_eq!(i.clamp(-3.0), 0.0);
        assert_eq!(i.clamp(7.0), 0.999);
        assert_eq!(i.clamp(0.25), 0.25);
    }
}
