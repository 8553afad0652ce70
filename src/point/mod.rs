mod normalize;
mod point;

pub use normalize::{normalize_point, normalize_rows, NormalizeStats, RawRow, Skip};
pub use point::{IncomeGroup, Point};
