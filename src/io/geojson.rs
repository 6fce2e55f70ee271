//! GeoJSON reading for buffer polygons.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

/// Read `(id, polygon)` pairs from a GeoJSON FeatureCollection, in file order.
pub fn read_buffers(path: &Path, id_field: &str) -> Result<Vec<(String, MultiPolygon<f64>)>> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read {}", path.display()))?;
    read_buffers_from_bytes(&bytes, id_field)
        .with_context(|| format!("[io::geojson] Failed to parse buffers from {}", path.display()))
}

pub fn read_buffers_from_bytes(bytes: &[u8], id_field: &str) -> Result<Vec<(String, MultiPolygon<f64>)>> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Invalid JSON")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] Expected a FeatureCollection"))?;

    features.iter().enumerate()
        .map(|(i, feature)| -> Result<(String, MultiPolygon<f64>)> {
            let id = match &feature["properties"][id_field] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => bail!("[io::geojson] Feature {i} has no usable {id_field:?} property: {other}"),
            };
            let geometry = parse_geometry(&feature["geometry"])
                .with_context(|| format!("[io::geojson] Buffer {id}"))?;
            Ok((id, geometry))
        })
        .collect()
}

/// Parse a Polygon or MultiPolygon geometry object.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing coordinates"))?;

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => coords.iter()
            .map(|polygon| -> Result<Polygon<f64>> { parse_polygon(as_array(polygon)?) })
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        other => bail!("unsupported geometry type {other:?}"),
    }
}

/// `[exterior, hole, hole, ...]`
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()
        .ok_or_else(|| anyhow!("polygon without rings"))?;
    Ok(Polygon::new(
        parse_ring(as_array(exterior)?)?,
        holes.iter()
            .map(|ring| -> Result<LineString<f64>> { parse_ring(as_array(ring)?) })
            .collect::<Result<_>>()?,
    ))
}

/// `[[x, y], [x, y], ...]`, closed if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| -> Result<Coord<f64>> {
            let pair = as_array(pair)?;
            ensure!(pair.len() >= 2, "coordinate needs at least two values");
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    Ok(LineString(points))
}

fn as_array(value: &Value) -> Result<&[Value]> {
    value.as_array().map(Vec::as_slice).ok_or_else(|| anyhow!("expected an array, got {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let json = br#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "geom_id": "PH-1" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1]]] } },
                { "type": "Feature", "properties": { "geom_id": 17 },
                  "geometry": { "type": "MultiPolygon", "coordinates": [
                      [[[0,0],[1,0],[1,1],[0,0]], [[0.2,0.1],[0.3,0.1],[0.3,0.2],[0.2,0.1]]],
                      [[[5,5],[6,5],[6,6],[5,5]]]
                  ] } }
            ]
        }"#;

        let buffers = read_buffers_from_bytes(json, "geom_id").unwrap();
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers[0].0, "PH-1");
        assert_eq!(buffers[0].1.0[0].exterior().0.len(), 5); // Closed on read
        assert_eq!(buffers[1].0, "17");
        assert_eq!(buffers[1].1.0.len(), 2);
        assert_eq!(buffers[1].1.0[0].interiors().len(), 1);
    }

    #[test]
    fn rejects_missing_ids_and_other_geometries() {
        let no_id = br#"{ "features": [ { "properties": {},
            "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } } ] }"#;
        assert!(read_buffers_from_bytes(no_id, "geom_id").is_err());

        let point = br#"{ "features": [ { "properties": { "geom_id": "a" },
            "geometry": { "type": "Point", "coordinates": [0, 0] } } ] }"#;
        assert!(read_buffers_from_bytes(point, "geom_id").is_err());

        assert!(read_buffers_from_bytes(b"[]", "geom_id").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffers.geojson");
        fs::write(&path, r#"{ "features": [ { "properties": { "cluster": 3 },
            "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } } ] }"#).unwrap();

        let buffers = read_buffers(&path, "cluster").unwrap();
        assert_eq!(buffers[0].0, "3");
    }
}
