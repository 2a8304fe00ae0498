use crate::coord::Coordinate;
use crate::error::MercantileError;
use crate::geom::tile_polygon;
use crate::index::{
    QuadkeyMode, ancestor, bounds, center, children, children_at_zoom, coord_to_tile,
    decode_tile_token, encode_tile_token, filename, parent, quadkey, quadkey_to_tile_with,
    tile_from_string, tiles_in_bounds, tilestr, ul, xy_bounds,
};
use crate::io::arrow::TilesToArrow;
use crate::io::parquet::TilesToGeoParquet;
use arrow_array::RecordBatch;
use geo::BoundingRect;
use geo_types::{Geometry, Point, Polygon, Rect, coord};
use geoarrow_array::array::{PointArray, PolygonArray};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A longitude/latitude bounding box in degrees.
///
/// For a valid tile `w < e` and `s < n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    pub w: f64,
    pub e: f64,
    pub n: f64,
    pub s: f64,
}

impl Extrema {
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(coord! { x: self.w, y: self.s }, coord! { x: self.e, y: self.n })
    }

    /// Whether `other` lies inside this box, edges included.
    pub fn contains(&self, other: &Extrema) -> bool {
        self.w <= other.w && self.e >= other.e && self.n >= other.n && self.s <= other.s
    }

    /// Whether the two boxes overlap with a non-zero area.
    pub fn intersects(&self, other: &Extrema) -> bool {
        self.w < other.e && other.w < self.e && self.s < other.n && other.s < self.n
    }
}

impl From<Rect<f64>> for Extrema {
    fn from(rect: Rect<f64>) -> Self {
        Extrema {
            w: rect.min().x,
            e: rect.max().x,
            n: rect.max().y,
            s: rect.min().y,
        }
    }
}

/// A Web Mercator tile address.
///
/// Under the standard scheme `0 <= x, y < 2^z`, but out-of-range tiles
/// can be constructed and give well-defined, if meaningless, results.
///
/// # Example
///
/// ```
/// use mercantile_rs::TileId;
///
/// # fn main() -> Result<(), mercantile_rs::MercantileError> {
/// let tile = TileId::from_lnglat(&(-90.0, 40.0), 10);
/// assert_eq!(tile.to_string(), "256/387/10");
///
/// let parent = tile.parent()?;
/// assert_eq!(parent, TileId::new(128, 193, 9));
///
/// let restored: TileId = "256-387-10".parse()?;
/// assert_eq!(restored, tile);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    /// Column index
    pub x: i64,
    /// Row index, counted from the north
    pub y: i64,
    /// Zoom level
    pub z: u8,
}

impl TileId {
    pub const fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Create the tile containing a longitude/latitude.
    ///
    /// # Example
    /// ```
    /// use mercantile_rs::TileId;
    /// use geo_types::Point;
    ///
    /// // From tuple
    /// let tile = TileId::from_lnglat(&(-90.0, 40.0), 10);
    /// // From Point
    /// let same = TileId::from_lnglat(&Point::new(-90.0, 40.0), 10);
    /// assert_eq!(tile, same);
    /// ```
    pub fn from_lnglat(coord: &impl Coordinate, zoom: u8) -> Self {
        coord_to_tile(coord, zoom)
    }

    /// Create a tile from a quadkey, ignoring unknown digits.
    pub fn from_quadkey(qk: &str) -> Result<Self, MercantileError> {
        quadkey_to_tile_with(qk, QuadkeyMode::Lenient)
    }

    /// Create a tile from a token made by [`TileId::token`].
    pub fn from_token(token: &str) -> Result<Self, MercantileError> {
        decode_tile_token(token)
    }

    /// Create the tiles covering an arbitrary `geo_types::Geometry`.
    ///
    /// Points resolve to the tile that contains them. Every other geometry
    /// resolves to all tiles touching its bounding rectangle. Duplicates
    /// are dropped, first occurrence wins.
    pub fn from_geometry(geom: Geometry<f64>, zoom: u8) -> Result<Vec<Self>, MercantileError> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::from_lnglat(&pt, zoom)]),
            Geometry::MultiPoint(mp) => {
                let mut seen = HashSet::new();
                Ok(mp
                    .0
                    .iter()
                    .map(|pt| Self::from_lnglat(pt, zoom))
                    .filter(|t| seen.insert(*t))
                    .collect())
            }
            Geometry::GeometryCollection(gc) => {
                let mut seen = HashSet::new();
                let mut all_tiles = Vec::new();
                for g in gc.0 {
                    for tile in Self::from_geometry(g, zoom)? {
                        if seen.insert(tile) {
                            all_tiles.push(tile);
                        }
                    }
                }
                Ok(all_tiles)
            }
            other => {
                let rect = other.bounding_rect().ok_or_else(|| {
                    MercantileError::GeometryParseError("Geometry is empty".to_string())
                })?;
                let extent = Extrema::from(rect);
                Ok(tiles_in_bounds(&extent, zoom).collect())
            }
        }
    }

    /// Upper-left corner (lng, lat).
    pub fn ul(&self) -> Point<f64> {
        ul(self)
    }

    /// Bounding box in degrees.
    pub fn bounds(&self) -> Extrema {
        bounds(self)
    }

    /// Bounding box in spherical mercator metres.
    pub fn xy_bounds(&self) -> Extrema {
        xy_bounds(self)
    }

    /// Centre of the bounding box (lng, lat).
    pub fn center(&self) -> Point<f64> {
        center(self)
    }

    pub fn parent(&self) -> Result<TileId, MercantileError> {
        parent(self)
    }

    pub fn ancestor(&self, zoom: u8) -> Result<TileId, MercantileError> {
        ancestor(self, zoom)
    }

    /// Four children, top-left, top-right, bottom-right, bottom-left.
    pub fn children(&self) -> Result<[TileId; 4], MercantileError> {
        children(self)
    }

    /// All descendants at `zoom`, in breadth-first order.
    pub fn children_at_zoom(&self, zoom: u8) -> Result<Vec<TileId>, MercantileError> {
        children_at_zoom(self, zoom)
    }

    pub fn quadkey(&self) -> String {
        quadkey(self)
    }

    /// `x-y-z` form for file names.
    pub fn filename(&self) -> String {
        filename(self)
    }

    /// Compact URL-safe Base64 token.
    pub fn token(&self) -> String {
        encode_tile_token(self)
    }

    /// Closed 5-point ring starting and ending at the north-east corner.
    pub fn to_polygon(&self) -> Polygon<f64> {
        tile_polygon(&self.bounds())
    }

    pub fn to_rect(&self) -> Rect<f64> {
        self.bounds().to_rect()
    }

    /// Converts this tile's outline to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this tile's centre to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this tile to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, MercantileError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this tile to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercantileError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tilestr(self))
    }
}

impl FromStr for TileId {
    type Err = MercantileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        tile_from_string(s)
    }
}
