use std::fmt;

use crate::point::Point;

const DEFAULT_CATEGORY: &str = "Other";

/// One decompressed tabular row, keyed by the fixed source schema.
/// Missing columns and empty cells are both `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRow<'a> {
    pub lon: Option<&'a str>,
    pub lat: Option<&'a str>,
    pub segregation: Option<&'a str>,
    pub pcat: Option<&'a str>,
    pub cat: Option<&'a str>,
    pub cbsa: Option<&'a str>,
    pub name: Option<&'a str>,
    pub p1a: Option<&'a str>,
    pub p2a: Option<&'a str>,
    pub p3a: Option<&'a str>,
    pub p4a: Option<&'a str>,
}

impl RawRow<'_> {
    /// True for a line with no cells at all, e.g. a blank line in the source.
    pub fn is_blank(&self) -> bool {
        [
            self.lon, self.lat, self.segregation, self.pcat, self.cat, self.cbsa,
            self.name, self.p1a, self.p2a, self.p3a, self.p4a,
        ]
        .iter()
        .all(|cell| cell.is_none_or(|s| s.trim().is_empty()))
    }
}

/// Why a row produced no point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Longitude,
    Latitude,
    Score,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Longitude => write!(f, "longitude is not a finite number"),
            Skip::Latitude => write!(f, "latitude is not a finite number"),
            Skip::Score => write!(f, "score is not a finite number"),
        }
    }
}

/// Row counts for one normalized source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows: usize,
    pub kept: usize,
    pub skipped: usize,
}

impl NormalizeStats {
    pub fn merge(&mut self, other: NormalizeStats) {
        self.rows += other.rows;
        self.kept += other.kept;
        self.skipped += other.skipped;
    }
}

fn parse_finite(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn share(value: Option<&str>) -> Option<f64> {
    parse_finite(value).map(|v| v.clamp(0.0, 1.0))
}

/// Turn one raw row into a `Point`. `ordinal` is the row's data index
/// within its source file and becomes the point id.
pub fn normalize_point(row: &RawRow<'_>, ordinal: usize) -> Result<Point, Skip> {
    let lon = parse_finite(row.lon).ok_or(Skip::Longitude)?;
    let lat = parse_finite(row.lat).ok_or(Skip::Latitude)?;
    let score = parse_finite(row.segregation).ok_or(Skip::Score)?;

    Ok(Point {
        position: [lon, lat],
        score: score.clamp(0.0, 1.0),
        category: non_blank(row.pcat).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        subcategory: non_blank(row.cat),
        name: non_blank(row.name),
        city: non_blank(row.cbsa),
        id: format!("point-{ordinal}"),
        p1a: share(row.p1a),
        p2a: share(row.p2a),
        p3a: share(row.p3a),
        p4a: share(row.p4a),
    })
}

/// Normalize every row of a source in order, counting the ones that were skipped.
pub fn normalize_rows<'a, I>(rows: I) -> (Vec<Point>, NormalizeStats)
where
    I: IntoIterator<Item = RawRow<'a>>,
{
    let mut stats = NormalizeStats::default();
    let mut points = Vec::new();
    for (ordinal, row) in rows.into_iter().enumerate() {
        stats.rows += 1;
        match normalize_point(&row, ordinal) {
            Ok(point) => {
                stats.kept += 1;
                points.push(point);
            }
            Err(_) => stats.skipped += 1,
        }
    }
    (points, stats)
}
