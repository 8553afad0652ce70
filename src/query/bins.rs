use serde::{Deserialize, Serialize};

use crate::query::Rgb;

/// (lower, upper, color, label). Bins are [lower, upper) except the last, which includes 1.0.
/// The color mapper, histogram, score filter and legend all read this table.
const BINS: [(f64, f64, Rgb, &str); ScoreBin::COUNT] = [
    (0.0, 0.2, Rgb { r:  61, g:  75, b: 229 }, "0–20%"),   // deep blue
    (0.2, 0.4, Rgb { r:  75, g: 201, b: 229 }, "20–40%"),  // cyan
    (0.4, 0.6, Rgb { r: 247, g: 210, b:   1 }, "40–60%"),  // yellow
    (0.6, 0.8, Rgb { r: 255, g: 138, b:   0 }, "60–80%"),  // orange
    (0.8, 1.0, Rgb { r: 229, g:  46, b:  46 }, "80–100%"), // red
];

/// One of the five fixed score bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ScoreBin(u8);

impl ScoreBin {
    pub const COUNT: usize = 5;

    pub const ALL: [ScoreBin; ScoreBin::COUNT] = [ScoreBin(0), ScoreBin(1), ScoreBin(2), ScoreBin(3), ScoreBin(4)];

    /// Bin by index, `None` outside `0..5`.
    pub fn new(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| ScoreBin(index as u8))
    }

    /// Bin of `score` after clamping to [0, 1]. NaN falls in the first bin.
    pub fn of(score: f64) -> Self {
        let s = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self::ALL.into_iter()
            .find(|bin| bin.contains(s))
            .unwrap_or(ScoreBin(0))
    }

    #[inline] pub fn index(self) -> usize { self.0 as usize }

    #[inline] fn is_last(self) -> bool { self.index() == Self::COUNT - 1 }

    /// `(lower, upper)` bounds.
    #[inline] pub fn bounds(self) -> (f64, f64) {
        let (lo, hi, _, _) = BINS[self.index()];
        (lo, hi)
    }

    /// Whether an unclamped `score` lies in this bin.
    pub fn contains(self, score: f64) -> bool {
        let (lo, hi) = self.bounds();
        score >= lo && (score < hi || (self.is_last() && score <= hi))
    }

    #[inline] pub fn color(self) -> Rgb { BINS[self.index()].2 }

    #[inline] pub fn label(self) -> &'static str { BINS[self.index()].3 }
}

impl TryFrom<usize> for ScoreBin {
    type Error = String;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        ScoreBin::new(index).ok_or_else(|| format!("score bin must be in 0..{}, got {index}", ScoreBin::COUNT))
    }
}

impl From<ScoreBin> for usize {
    fn from(bin: ScoreBin) -> usize { bin.index() }
}

/// One legend swatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub bin: ScoreBin,
    pub label: &'static str,
    pub color: Rgb,
}

/// Legend swatches, lowest score first.
pub fn legend() -> [LegendEntry; ScoreBin::COUNT] {
    ScoreBin::ALL.map(|bin| LegendEntry { bin, label: bin.label(), color: bin.color() })
}
