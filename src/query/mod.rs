//! Per-frame derivations over a loaded shard. Everything here is pure.

mod bins;
mod color;
mod filter;
mod histogram;
mod sample;
mod viewport;

pub use bins::{legend, LegendEntry, ScoreBin};
pub use color::{color_of, Rgb};
pub use filter::{filter, Criteria, Predicate};
pub use histogram::{histogram, BinCount, Histogram};
pub use sample::sample;
pub use viewport::{cull, Viewport};
