//! Shapefile reading for OSM feature layers.

use std::path::Path;

use anyhow::{Context, Result, bail};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use shapefile::{
    dbase::{FieldValue, Record},
    PolygonRing, Reader, Shape,
};

use crate::{family::Family, store::{FeatureGeometry, RawFeature}};

/// Field holding the OSM id in Geofabrik exports.
pub const ID_FIELD: &str = "osm_id";

/// Read every feature of a shapefile layer, with its id and raw type.
pub fn read_features(path: &Path, family: Family) -> Result<Vec<RawFeature>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    for (row, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading record {row} of {}", path.display()))?;

        let id = read_id(&record)
            .with_context(|| format!("[io::shp] Record {row} of {}", path.display()))?;
        let geometry = to_geometry(&shape)
            .with_context(|| format!("[io::shp] Feature {id} of {}", path.display()))?;

        features.push(RawFeature {
            id,
            geometry,
            raw_type: read_text(&record, family.type_field()),
        });
    }
    Ok(features)
}

/// The feature id as text. Numeric ids are written without a fractional part.
pub fn read_id(record: &Record) -> Result<String> {
    match record.get(ID_FIELD) {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(FieldValue::Numeric(Some(n))) if n.fract() == 0.0 => Ok(format!("{}", *n as i64)),
        Some(FieldValue::Numeric(Some(n))) => Ok(n.to_string()),
        Some(FieldValue::Integer(n)) => Ok(n.to_string()),
        Some(value) => bail!("[io::shp] Unsupported or missing {ID_FIELD} value: {value:?}"),
        None => bail!("[io::shp] Missing {ID_FIELD} field"),
    }
}

/// A text attribute, `None` when absent or blank.
pub fn read_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Convert a shape into a feature geometry. M and Z values are dropped.
pub fn to_geometry(shape: &Shape) -> Result<FeatureGeometry> {
    let geometry = match shape {
        Shape::Point(p) => FeatureGeometry::Point(Point::new(p.x, p.y)),
        Shape::PointM(p) => FeatureGeometry::Point(Point::new(p.x, p.y)),
        Shape::PointZ(p) => FeatureGeometry::Point(Point::new(p.x, p.y)),
        Shape::Polyline(line) => FeatureGeometry::Line(lines(line.parts(), |p| Coord { x: p.x, y: p.y })),
        Shape::PolylineM(line) => FeatureGeometry::Line(lines(line.parts(), |p| Coord { x: p.x, y: p.y })),
        Shape::PolylineZ(line) => FeatureGeometry::Line(lines(line.parts(), |p| Coord { x: p.x, y: p.y })),
        Shape::Polygon(polygon) => FeatureGeometry::Polygon(polygons(polygon.rings(), |p| Coord { x: p.x, y: p.y })),
        Shape::PolygonM(polygon) => FeatureGeometry::Polygon(polygons(polygon.rings(), |p| Coord { x: p.x, y: p.y })),
        Shape::PolygonZ(polygon) => FeatureGeometry::Polygon(polygons(polygon.rings(), |p| Coord { x: p.x, y: p.y })),
        other => bail!("[io::shp] Unsupported shape type: {:?}", other.shapetype()),
    };
    Ok(geometry)
}

fn lines<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> Coord<f64>) -> MultiLineString<f64> {
    MultiLineString(parts.iter().map(|part| LineString(part.iter().map(&xy).collect())).collect())
}

/// Group rings into polygons: each outer ring owns the inner rings that follow it.
fn polygons<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> Coord<f64>) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in rings {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(&xy).collect();
        if coords.first() != coords.last() {
            if let Some(&first) = coords.first() { coords.push(first) }
        }

        match ring {
            PolygonRing::Outer(_) => {
                if let Some(ext) = exterior.replace(LineString(coords)) {
                    polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
            }
            PolygonRing::Inner(_) => holes.push(LineString(coords)),
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}
