// Integration tests for the offline conversion: sources + boundary file -> pack

use std::{fs, io::Write, path::Path};

use flate2::{write::GzEncoder, Compression};
use mixatlas::{build_pack, CityIndex, ConvertConfig, DiskPack, Manifest, PackSource, Point};
use tempfile::TempDir;

const BOUNDARY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "GEOID": "1", "NAME": "Alpha" },
      "geometry": { "type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]] }
    },
    {
      "type": "Feature",
      "id": 2,
      "properties": { "NAME": "Beta", "city_center_lon": "15", "city_center_lat": 15, "zoom": 9 },
      "geometry": { "type": "MultiPolygon", "coordinates": [[[[10,10],[20,10],[20,20],[10,20],[10,10]]]] }
    },
    {
      "type": "Feature",
      "properties": { "NAME": "Nowhere" },
      "geometry": { "type": "Point", "coordinates": [0, 0] }
    }
  ]
}"#;

const ROWS: &str = "\
lon,lat,segregation,pcat,cat,cbsa,name,p1a,p2a,p3a,p4a
1.0,1.0,0.83,Retail,Clothing,1,Shop A,0.1,0.2,0.6,0.1
2.0,2.0,1.4,,,1,,,,,
abc,2.0,0.5,Food,,1,,,,,
3.0,3.0,,Food,,2,,,,,
12.0,12.0,0.3,Food,Cafe,2,Cafe,,,,
5.0,5.0,0.4,Parks,,,,,,,
";

fn gzip(text: &str) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(text.as_bytes()).unwrap();
    enc.finish().unwrap()
}

fn input_dir(sources: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cbsas_2017.geojson"), BOUNDARY).unwrap();
    for (name, text) in sources {
        fs::write(dir.path().join(name), gzip(text)).unwrap();
    }
    dir
}

fn shard(out: &Path, city_id: &str) -> Vec<Point> {
    let bytes = fs::read(out.join("points").join(format!("{city_id}.json"))).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn is_empty_dir(path: &Path) -> bool {
    !path.exists() || fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn converts_sources_into_city_shards() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    let out = tempfile::tempdir().unwrap();

    let report = build_pack(&ConvertConfig::new(input.path(), out.path())).unwrap();

    let totals = report.totals();
    assert_eq!((totals.rows, totals.kept, totals.skipped), (6, 4, 2));
    assert_eq!(report.cities, 2);
    assert_eq!(report.unassigned, 1);
    assert_eq!(report.shards(), 2);

    let alpha = shard(out.path(), "1");
    assert_eq!(alpha.len(), 2);
    assert_eq!(alpha[0].id, "point-0");
    assert_eq!(alpha[0].position, [1.0, 1.0]);
    assert_eq!(alpha[0].score, 0.83);
    assert_eq!(alpha[0].category, "Retail");
    assert_eq!(alpha[0].subcategory.as_deref(), Some("Clothing"));
    assert_eq!(alpha[0].p3a, Some(0.6));
    assert_eq!(alpha[1].id, "point-1");
    assert_eq!(alpha[1].score, 1.0);
    assert_eq!(alpha[1].category, "Other");
    assert_eq!(alpha[1].p1a, None);

    let beta = shard(out.path(), "2");
    assert_eq!(beta.len(), 1);
    assert_eq!(beta[0].id, "point-4");
    assert_eq!(beta[0].name.as_deref(), Some("Cafe"));
}

#[test]
fn writes_manifest_and_city_index() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    let out = tempfile::tempdir().unwrap();
    let report = build_pack(&ConvertConfig::new(input.path(), out.path())).unwrap();

    let pack = DiskPack::new(out.path());
    let manifest = Manifest::read_from_pack(&pack).unwrap().unwrap();
    assert_eq!(manifest, report.manifest);
    assert_eq!(manifest.city_ids(), ["1", "2"]);
    assert_eq!(manifest.count("1"), Some(2));
    assert!(!manifest.contains("3"));
    assert_eq!(manifest.files().len(), 2);

    let index = CityIndex::read_from_pack(&pack).unwrap();
    assert_eq!(index.len(), 2);
    let beta = index.get("2").unwrap();
    assert_eq!(beta.name, "Beta");
    assert_eq!(beta.center, [15.0, 15.0]);
    assert_eq!(beta.zoom, 9.0);
    assert_eq!(index.get("1").unwrap().zoom, 10.0);
    assert_eq!(index.city_at(5.0, 5.0).map(|c| c.id.as_str()), Some("1"));
    assert_eq!(index.city_at(15.0, 12.0).map(|c| c.id.as_str()), Some("2"));
    assert!(index.city_at(30.0, 30.0).is_none());

    assert!(pack.has("points/1.json"));
    assert!(!pack.has("points/3.json"));
}

#[test]
fn merges_every_source_file() {
    let extra = "lon,lat,segregation,pcat,cbsa\n4.0,4.0,0.1,Food,1\n";
    let input = input_dir(&[("a.csv.gz", ROWS), ("b.csv.gz", extra)]);
    fs::write(input.path().join("notes.txt"), "ignored").unwrap();
    let out = tempfile::tempdir().unwrap();

    let report = build_pack(&ConvertConfig::new(input.path(), out.path())).unwrap();
    let files: Vec<&str> = report.sources.iter().map(|s| s.file.as_str()).collect();
    assert_eq!(files, ["a.csv.gz", "b.csv.gz"]);
    assert_eq!(shard(out.path(), "1").len(), 3);
    assert_eq!(report.manifest.count("1"), Some(3));
}

#[test]
fn rerun_is_deterministic() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    let out = tempfile::tempdir().unwrap();
    let config = ConvertConfig::new(input.path(), out.path());

    build_pack(&config).unwrap();
    let first = fs::read(out.path().join("points/1.json")).unwrap();
    build_pack(&config).unwrap();
    assert_eq!(fs::read(out.path().join("points/1.json")).unwrap(), first);
}

#[test]
fn missing_boundary_writes_nothing() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    fs::remove_file(input.path().join("cbsas_2017.geojson")).unwrap();
    let out = tempfile::tempdir().unwrap();

    assert!(build_pack(&ConvertConfig::new(input.path(), out.path())).is_err());
    assert!(is_empty_dir(out.path()));
}

#[test]
fn missing_sources_write_nothing() {
    let input = input_dir(&[]);
    let out = tempfile::tempdir().unwrap();

    assert!(build_pack(&ConvertConfig::new(input.path(), out.path())).is_err());
    assert!(is_empty_dir(out.path()));
}

#[test]
fn corrupt_archive_aborts_the_run() {
    let input = input_dir(&[("a.csv.gz", ROWS)]);
    fs::write(input.path().join("b.csv.gz"), b"definitely not gzip").unwrap();
    let out = tempfile::tempdir().unwrap();

    assert!(build_pack(&ConvertConfig::new(input.path(), out.path())).is_err());
    assert!(is_empty_dir(out.path()));
}

#[test]
fn config_file_overrides_defaults() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    fs::rename(input.path().join("cbsas_2017.geojson"), input.path().join("metros.geojson")).unwrap();
    let out = tempfile::tempdir().unwrap();

    let config_path = input.path().join("convert.json");
    let json = serde_json::json!({
        "input_dir": input.path(),
        "out_dir": out.path(),
        "boundary_file": "metros.geojson",
    });
    fs::write(&config_path, serde_json::to_vec(&json).unwrap()).unwrap();

    let config = ConvertConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.source_suffix, ".csv.gz");
    assert_eq!(build_pack(&config).unwrap().shards(), 2);
}

#[test]
fn ragged_and_blank_lines_do_not_stop_the_run() {
    let rows = "lon,lat,segregation,cbsa\n1,1,0.5,1\n2,2,0.6,1,EXTRA\n\n12,12,0.7,2\n";
    let input = input_dir(&[("places.csv.gz", rows)]);
    let out = tempfile::tempdir().unwrap();

    let report = build_pack(&ConvertConfig::new(input.path(), out.path())).unwrap();
    let totals = report.totals();
    assert_eq!((totals.rows, totals.kept, totals.skipped), (3, 3, 0));

    let alpha: Vec<String> = shard(out.path(), "1").into_iter().map(|p| p.id).collect();
    assert_eq!(alpha, ["point-0", "point-1"]);
    assert_eq!(shard(out.path(), "2")[0].id, "point-2");
}

#[test]
fn rerun_removes_shards_of_cities_that_lost_their_points() {
    let input = input_dir(&[("places.csv.gz", ROWS)]);
    let out = tempfile::tempdir().unwrap();
    let config = ConvertConfig::new(input.path(), out.path());
    build_pack(&config).unwrap();
    assert!(out.path().join("points/2.json").is_file());

    let only_alpha = "lon,lat,segregation,cbsa\n1.0,1.0,0.5,1\n";
    fs::write(input.path().join("places.csv.gz"), gzip(only_alpha)).unwrap();
    let report = build_pack(&config).unwrap();

    assert_eq!(report.manifest.city_ids(), ["1"]);
    assert!(out.path().join("points/1.json").is_file());
    assert!(out.path().join("points/manifest.json").is_file());
    assert!(!out.path().join("points/2.json").exists());
}
