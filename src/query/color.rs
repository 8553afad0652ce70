//! Score to color mapping.

use std::fmt;

use serde::Serialize;

use crate::query::ScoreBin;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline] pub fn to_array(self) -> [u8; 3] { [self.r, self.g, self.b] }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Discrete color of a score: the color of its bin after clamping to [0, 1].
#[inline]
pub fn color_of(score: f64) -> Rgb {
    ScoreBin::of(score).color()
}
