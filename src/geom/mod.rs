mod parse;
mod polygon;

pub use parse::{parse_geojson, parse_geometry, parse_wkt};
pub use polygon::{polygon_to_geojson, polygon_to_wkt, tile_polygon};
