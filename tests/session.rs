// Integration tests for the runtime query path over a pack on disk:
//   load, cull, filter, histogram, color, stale-load discard

use std::{fs, io::Write};

use flate2::{write::GzEncoder, Compression};
use mixatlas::{
    build_pack, color_of, legend, ConvertConfig, Criteria, DiskPack, IncomeGroup, LoadError,
    LoadState, ScoreBin, Selection, Session, SessionConfig, ShardLoader, Viewport,
};
use tempfile::TempDir;

const BOUNDARY: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"GEOID":"35620","NAME":"New York"},
   "geometry":{"type":"Polygon","coordinates":[[[-75,40],[-73,40],[-73,42],[-75,42],[-75,40]]]}},
  {"type":"Feature","properties":{"GEOID":"16980","NAME":"Chicago"},
   "geometry":{"type":"Polygon","coordinates":[[[-89,41],[-87,41],[-87,43],[-89,43],[-89,41]]]}}
]}"#;

const ROWS: &str = "\
lon,lat,segregation,pcat,cbsa,p1a,p2a,p3a,p4a
-73.9,40.7,0.83,Retail,35620,0.1,0.1,0.7,0.1
-73.95,40.75,0.15,Food,35620,0.6,0.2,0.1,0.1
-74.5,41.5,0.45,Retail,35620,0.25,0.25,0.25,0.25
-87.6,41.9,0.99,Parks,16980,,,,
";

fn pack() -> TempDir {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("cbsas_2017.geojson"), BOUNDARY).unwrap();
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(ROWS.as_bytes()).unwrap();
    fs::write(input.path().join("places.csv.gz"), enc.finish().unwrap()).unwrap();

    let out = tempfile::tempdir().unwrap();
    build_pack(&ConvertConfig::new(input.path(), out.path())).unwrap();
    out
}

fn session(out: &TempDir) -> Session<DiskPack> {
    let loader = ShardLoader::with_manifest(DiskPack::new(out.path())).unwrap();
    Session::new(loader, SessionConfig::default())
}

#[test]
fn frame_for_a_selected_city() {
    let out = pack();
    let mut s = session(&out);

    assert_eq!(s.load_city(Some("35620")).unwrap().len(), 3);
    assert!(s.visible_points().is_empty());

    s.set_viewport(Some(Viewport::new(-74.0, 40.5, -73.5, 41.0)));
    let visible: Vec<&str> = s.visible_points().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(visible, ["point-0", "point-1"]);

    s.set_filters(Criteria { income_majority: Some(IncomeGroup::UpperMiddle), ..Criteria::default() });
    let visible = s.visible_points();
    assert_eq!(visible.len(), 1);
    assert_eq!(color_of(visible[0].score).to_string(), "rgb(229,46,46)");

    let h = s.histogram();
    assert_eq!(h.total(), 1);
    assert_eq!(h.count(ScoreBin::of(0.83)), 1);
    assert_eq!(h.bins[4].label, legend()[4].label);
}

#[test]
fn score_bin_filter_leaves_histogram_alone() {
    let out = pack();
    let mut s = session(&out);
    s.load_city(Some("35620")).unwrap();
    s.set_viewport(Some(Viewport::new(-180.0, -90.0, 180.0, 90.0)));
    s.set_filters(Criteria { score_bin: Some(ScoreBin::of(0.15)), ..Criteria::default() });

    assert_eq!(s.visible_points().len(), 1);
    let counts: Vec<usize> = s.histogram().bins.iter().map(|b| b.count).collect();
    assert_eq!(counts, [1, 0, 1, 0, 1]);
}

#[test]
fn city_without_shard_is_empty_not_failed() {
    let out = pack();
    let mut s = session(&out);
    assert!(s.load_city(Some("99999")).unwrap().is_empty());
    assert_eq!(s.state(), &LoadState::Ready);
}

#[test]
fn corrupt_shard_is_a_typed_failure() {
    let out = pack();
    fs::write(out.path().join("points/16980.json"), "[{").unwrap();
    let mut s = session(&out);

    let err = s.load_city(Some("16980")).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(matches!(s.state(), LoadState::Failed(_)));

    // other cities still load
    assert_eq!(s.load_city(Some("35620")).unwrap().len(), 3);
}

#[test]
fn switching_cities_discards_the_older_load() {
    let out = pack();
    let mut s = session(&out);

    let Selection::Pending(ny) = s.select_city(Some("35620")) else { panic!("expected fetch") };
    let Selection::Pending(chi) = s.select_city(Some("16980")) else { panic!("expected fetch") };

    let loader = s.loader();
    let ny_result = std::thread::spawn({
        let loader = loader.clone();
        let id = ny.city_id().to_string();
        move || loader.fetch(&id)
    });
    let chi_result = loader.fetch(chi.city_id());

    assert!(s.finish_load(chi, chi_result));
    assert!(!s.finish_load(ny, ny_result.join().unwrap()));
    assert_eq!(s.points().len(), 1);
    assert_eq!(s.points()[0].category, "Parks");
}

#[test]
fn in_memory_pack_round_trip() {
    use mixatlas::{normalize_rows, resolve_cities, BoundaryFeature, MemPack, Partition, RawRow};

    let rows = [
        RawRow { lon: Some("-73.9"), lat: Some("40.7"), segregation: Some("0.5"), cbsa: Some("35620"), ..RawRow::default() },
        RawRow { lon: Some("-87.6"), lat: Some("41.9"), segregation: Some("0.7"), cbsa: Some("16980"), ..RawRow::default() },
        RawRow { lon: Some("x"), lat: Some("41.9"), segregation: Some("0.7"), cbsa: Some("16980"), ..RawRow::default() },
    ];
    let (points, stats) = normalize_rows(rows);
    assert_eq!((stats.kept, stats.skipped), (2, 1));

    let features: Vec<BoundaryFeature> = serde_json::from_str::<serde_json::Value>(BOUNDARY)
        .map(|v| serde_json::from_value(v["features"].clone()).unwrap())
        .unwrap();
    let partition = Partition::new(points, resolve_cities(&features));

    let mut pack = MemPack::default();
    let manifest = partition.write_to(&mut pack).unwrap();
    assert_eq!(manifest.city_ids(), ["16980", "35620"]);
    assert_eq!(
        pack.paths(),
        ["cities.json", "points/16980.json", "points/35620.json", "points/manifest.json"]
    );

    let mut s = Session::new(ShardLoader::with_manifest(pack).unwrap(), SessionConfig::default());
    let points = s.load_city(Some("16980")).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].category, "Other");
    assert_eq!(points[0].id, "point-1");
}
