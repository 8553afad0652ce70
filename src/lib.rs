#![doc = "Mixatlas public API"]
mod city;
mod common;
mod config;
mod io;
mod pack;
mod point;
mod query;
mod session;

#[doc(inline)]
pub use config::{ConvertConfig, SessionConfig};

#[doc(inline)]
pub use point::{normalize_point, normalize_rows, IncomeGroup, NormalizeStats, Point, RawRow, Skip};

#[doc(inline)]
pub use city::{resolve_cities, resolve_city, BoundaryFeature, BoundaryGeometry, City, CityIndex, Ring, DEFAULT_ZOOM};

#[doc(inline)]
pub use pack::{
    build_pack, shard_path, BuildReport, DiskPack, FileHash, Manifest, MemPack, PackSink,
    PackSource, Partition, SourceReport, CITIES_FILE, MANIFEST_FILE,
};

#[cfg(feature = "download")]
#[doc(inline)]
pub use pack::HttpPack;

#[doc(inline)]
pub use query::{
    color_of, cull, filter, histogram, legend, sample, BinCount, Criteria, Histogram,
    LegendEntry, Predicate, Rgb, ScoreBin, Viewport,
};

#[doc(inline)]
pub use session::{LoadError, LoadState, LoadTicket, Selection, Session, ShardCache, ShardLoader};
