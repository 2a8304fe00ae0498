use crate::error::MercantileError;
use geo_types::Geometry;
use geojson::GeoJson;
use log::debug;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
/// Coordinates are expected as longitude/latitude.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, MercantileError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        debug!("Parsing geometry as GeoJSON");
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, MercantileError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| MercantileError::GeometryParseError(e.to_string()))?;

    let geometry = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feat) => feat.geometry.ok_or_else(|| {
            MercantileError::GeometryParseError("Feature has no geometry".to_string())
        })?,
        GeoJson::FeatureCollection(_) => {
            return Err(MercantileError::GeometryParseError(
                "FeatureCollection not supported, use individual geometries".to_string(),
            ));
        }
    };

    Geometry::try_from(geometry).map_err(|e| MercantileError::GeometryParseError(e.to_string()))
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, MercantileError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| MercantileError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        MercantileError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}
