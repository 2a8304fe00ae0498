use crate::tile::Extrema;
use geo_types::{Coord, LineString, Polygon};

/// Builds the closed outline of a bounding box.
///
/// The ring runs north-east, south-east, south-west, north-west and
/// repeats the north-east corner to close.
pub fn tile_polygon(bounds: &Extrema) -> Polygon<f64> {
    let coords = vec![
        Coord { x: bounds.e, y: bounds.n },
        Coord { x: bounds.e, y: bounds.s },
        Coord { x: bounds.w, y: bounds.s },
        Coord { x: bounds.w, y: bounds.n },
        Coord { x: bounds.e, y: bounds.n },
    ];

    Polygon::new(LineString::from(coords), vec![])
}

pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileId;

    #[test]
    fn test_tile_polygon_ring_order() {
        let bounds = TileId::new(0, 0, 0).bounds();
        let poly = tile_polygon(&bounds);
        let ring: Vec<(f64, f64)> = poly.exterior().coords().map(|c| (c.x, c.y)).collect();

        assert_eq!(
            ring,
            vec![
                (180.0, 85.05112877980659),
                (180.0, -85.05112877980659),
                (-180.0, -85.05112877980659),
                (-180.0, 85.05112877980659),
                (180.0, 85.05112877980659),
            ]
        );
        assert!(poly.interiors().is_empty());
    }

    #[test]
    fn test_polygon_to_wkt() {
        let poly = TileId::new(1, 1, 1).to_polygon();
        let wkt = polygon_to_wkt(&poly);
        assert!(wkt.starts_with("POLYGON"));
        assert!(wkt.contains("180 0"));
    }

    #[test]
    fn test_polygon_to_geojson() {
        let poly = TileId::new(1, 1, 1).to_polygon();
        let json = polygon_to_geojson(&poly);
        assert!(json.contains("\"Polygon\""));
    }
}
