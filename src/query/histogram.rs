use serde::Serialize;

use crate::point::Point;
use crate::query::{Rgb, ScoreBin};

/// Count of points in one score bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinCount {
    pub bin: ScoreBin,
    pub label: &'static str,
    pub color: Rgb,
    pub count: usize,
}

/// Point counts over the five score bins, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: [BinCount; ScoreBin::COUNT],
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest bin count, at least 1 (bar heights divide by it).
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1)
    }

    pub fn count(&self, bin: ScoreBin) -> usize {
        self.bins[bin.index()].count
    }
}

/// Bucket points by score into the fixed bins.
pub fn histogram<'a, I>(points: I) -> Histogram
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut counts = [0usize; ScoreBin::COUNT];
    for point in points {
        counts[ScoreBin::of(point.score).index()] += 1;
    }
    Histogram {
        bins: ScoreBin::ALL.map(|bin| BinCount {
            bin,
            label: bin.label(),
            color: bin.color(),
            count: counts[bin.index()],
        }),
    }
}
