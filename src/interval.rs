use crate::camera::Float;

/// Range of ray parameters (or color intensities) that a query accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: Float::INFINITY,
        max: Float::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: Float::NEG_INFINITY,
        max: Float::INFINITY,
    };

    pub const fn new(min: Float, max: Float) -> Self {
        Interval { min, max }
    }

    /// Inclusive on both ends
    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive on both ends
    pub fn surrounds(&self, x: Float) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: Float) -> Float {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Same lower bound, upper bound replaced. Used to shrink the search
    /// range down to the closest hit found so far.
    pub fn with_max(&self, max: Float) -> Self {
        Interval { min: self.min, max }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
