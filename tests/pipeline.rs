// Integration tests for the file-driven pipeline:
//   configuration loading, buffer loading from GeoJSON, a roads layer read from
//   a shapefile and written as CSV, and error reporting when a layer is missing.

use std::{fs, path::Path};

use osm_features::{Config, Family, Pipeline};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};

const BUFFERS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "geom_id": "PH-0001" },
          "geometry": { "type": "Polygon", "coordinates": [[[121.0,14.0],[121.02,14.0],[121.02,14.02],[121.0,14.02],[121.0,14.0]]] } },
        { "type": "Feature", "properties": { "geom_id": "PH-0002" },
          "geometry": { "type": "Polygon", "coordinates": [[[121.1,14.0],[121.12,14.0],[121.12,14.02],[121.1,14.02],[121.1,14.0]]] } }
    ]
}"#;

fn write_config(dir: &Path, buffers: &str, min_road_features: usize) -> std::path::PathBuf {
    fs::create_dir_all(dir.join("outputs")).unwrap();
    fs::write(dir.join("outputs/buffers.geojson"), buffers).unwrap();

    let config = serde_json::json!({
        "data_dir": dir,
        "country": "philippines",
        "osm_date": "240101",
        "geom_label": "dhs",
        "buffers": { "path": "outputs/buffers.geojson" },
        "projected_crs": { "epsg": 32651 },
        "min_road_features": min_road_features
    });
    let path = dir.join("config.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn loads_buffers_named_by_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&write_config(dir.path(), BUFFERS, 2)).unwrap();
    assert_eq!(config.min_road_features, 2);

    let pipeline = Pipeline::new(config).unwrap();
    let buffers = pipeline.buffers();
    assert_eq!(buffers.ids(), ["PH-0001", "PH-0002"]);
    assert!(buffers.areas().iter().all(|&a| (4.5e6..5.0e6).contains(&a)), "areas = {:?}", buffers.areas());
    assert_eq!(
        pipeline.config().output_path(Family::Buildings),
        dir.path().join("outputs/osm_features/dhs_buildings_240101.csv"),
    );
}

#[test]
fn duplicate_buffer_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let duplicated = BUFFERS.replace("PH-0002", "PH-0001");
    let config = Config::load(&write_config(dir.path(), &duplicated, 2)).unwrap();

    let err = Pipeline::new(config).unwrap_err();
    assert!(format!("{err:#}").contains("PH-0001"), "{err:#}");
}

#[test]
fn missing_layer_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("crosswalks")).unwrap();
    fs::write(dir.path().join("crosswalks/roads_type_crosswalk.csv"), "type,group\nprimary,primary\n").unwrap();

    let config = Config::load(&write_config(dir.path(), BUFFERS, 2)).unwrap();
    let pipeline = Pipeline::new(config).unwrap();

    let err = pipeline.run(&[Family::Roads]).unwrap_err();
    assert!(format!("{err:#}").contains("gis_osm_roads_free_1.shp"), "{err:#}");
    assert!(!pipeline.config().output_path(Family::Roads).exists());
}

/// Write a Geofabrik-style roads layer: `(osm_id, fclass, two-point line)` per feature.
fn write_roads(path: &Path, roads: &[(&str, Option<&str>, [(f64, f64); 2])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("osm_id").unwrap(), 12)
        .add_character_field(FieldName::try_from("fclass").unwrap(), 20);

    let mut writer = shapefile::Writer::from_path(path, table).unwrap();
    for &(id, fclass, coords) in roads {
        let line = shapefile::Polyline::new(
            coords.iter().map(|&(x, y)| shapefile::Point::new(x, y)).collect(),
        );
        let mut record = Record::default();
        record.insert("osm_id".to_string(), FieldValue::Character(Some(id.to_string())));
        record.insert("fclass".to_string(), FieldValue::Character(fclass.map(String::from)));
        writer.write_shape_and_record(&line, &record).unwrap();
    }
}

#[test]
fn roads_layer_is_written_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("crosswalks")).unwrap();
    fs::write(
        dir.path().join("crosswalks/roads_type_crosswalk.csv"),
        "type,group\nprimary,primary\nfootway,0\n",
    ).unwrap();

    write_roads(&dir.path().join("osm/philippines-240101-free.shp/gis_osm_roads_free_1.shp"), &[
        ("101", Some("primary"), [(121.005, 14.01), (121.015, 14.01)]),
        ("102", Some("footway"), [(121.105, 14.01), (121.115, 14.01)]),
        ("103", None, [(121.01, 14.005), (121.01, 14.015)]),
    ]);

    let config = Config::load(&write_config(dir.path(), BUFFERS, 0)).unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    let written = pipeline.run(&[Family::Roads]).unwrap();
    assert_eq!(written, [dir.path().join("outputs/osm_features/dhs_roads_240101.csv")]);

    let csv = fs::read_to_string(&written[0]).unwrap();
    let mut lines = csv.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();

    let mut expected = vec!["geom_id".to_string()];
    for group in ["other", "primary", "unclassified"] {
        for stat in ["count", "length", "nearest-osmid", "nearestdist"] {
            expected.push(format!("{group}_roads_{stat}"));
        }
    }
    expected.extend(["all_roads_count", "all_roads_length", "all_roads_nearestdist"].map(String::from));
    assert_eq!(header, expected);

    let rows: Vec<Vec<&str>> = lines.map(|line| line.split(',').collect()).collect();
    assert_eq!(rows.len(), 2);
    let field = |row: usize, name: &str| rows[row][header.iter().position(|h| *h == name).unwrap()];
    let number = |row: usize, name: &str| field(row, name).parse::<f64>().unwrap();

    assert_eq!(field(0, "geom_id"), "PH-0001");
    assert_eq!(field(1, "geom_id"), "PH-0002");

    // footway maps to "0", which is reported as "other"; a blank fclass is unclassified.
    assert_eq!((field(0, "other_roads_count"), field(1, "other_roads_count")), ("0", "1"));
    assert_eq!((field(0, "primary_roads_count"), field(1, "primary_roads_count")), ("1", "0"));
    assert_eq!((field(0, "unclassified_roads_count"), field(1, "unclassified_roads_count")), ("1", "0"));
    assert_eq!((field(0, "all_roads_count"), field(1, "all_roads_count")), ("2", "1"));

    // 0.01 degrees at 14N: about 1079 m east-west and 1106 m north-south.
    assert!((1050.0..1110.0).contains(&number(0, "primary_roads_length")));
    assert!((1080.0..1130.0).contains(&number(0, "unclassified_roads_length")));
    assert_eq!(number(1, "primary_roads_length"), 0.0);
    let total = number(0, "primary_roads_length") + number(0, "unclassified_roads_length");
    assert!((number(0, "all_roads_length") - total).abs() < 1e-6);

    // Every group has lines, so every buffer has a nearest road in each.
    assert_eq!(field(0, "primary_roads_nearest-osmid"), "101");
    assert_eq!(field(1, "other_roads_nearest-osmid"), "102");
    assert_eq!(field(0, "unclassified_roads_nearest-osmid"), "103");

    // Half of 0.01 degrees from each centroid to the closest vertex.
    for row in 0..2 {
        let nearest = number(row, "all_roads_nearestdist");
        assert!((500.0..600.0).contains(&nearest), "nearest = {nearest}");
    }
}
