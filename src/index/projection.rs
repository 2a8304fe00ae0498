use crate::coord::{Coordinate, xy};
use crate::tile::{Extrema, TileId};
use geo_types::Point;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Returns the upper-left (lng, lat) corner of a tile.
///
/// Uses the inverse Web Mercator transform. Absurd zoom levels produce
/// non-finite values rather than errors.
pub fn ul(tile: &TileId) -> Point<f64> {
    let n = 2.0_f64.powf(tile.z as f64);
    let lon_deg = tile.x as f64 / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * tile.y as f64 / n)).sinh().atan();
    let lat_deg = (180.0 / PI) * lat_rad;
    Point::new(lon_deg, lat_deg)
}

/// Returns the (lng, lat) bounding box of a tile.
///
/// The south-east corner is the upper-left corner of the diagonal
/// neighbour at the same zoom.
pub fn bounds(tile: &TileId) -> Extrema {
    let a = ul(tile);
    let b = ul(&TileId::new(tile.x + 1, tile.y + 1, tile.z));
    Extrema {
        w: a.x(),
        e: b.x(),
        n: a.y(),
        s: b.y(),
    }
}

/// Returns the bounding box of a tile in spherical mercator metres.
pub fn xy_bounds(tile: &TileId) -> Extrema {
    let b = bounds(tile);
    let (w, n) = xy(b.w, b.n);
    let (e, s) = xy(b.e, b.s);
    Extrema { w, e, n, s }
}

/// Locates the tile containing a longitude/latitude at the given zoom.
///
/// Tiles are half-open intervals, so values on a tile edge belong to the
/// tile to the east/south. Latitudes of ±90 degrees hit the pole
/// singularity and saturate the row index.
///
/// # Example
/// ```
/// use mercantile_rs::{TileId, locate_tile};
///
/// let tile = locate_tile(-90.0, 40.0, 10);
/// assert_eq!(tile, TileId::new(256, 387, 10));
/// ```
pub fn locate_tile(lng: f64, lat: f64, zoom: u8) -> TileId {
    let lat = lat * (PI / 180.0);
    let n = 2.0_f64.powf(zoom as f64);
    let xtile = ((lng + 180.0) / 360.0 * n).floor() as i64;
    let ytile = ((1.0 - (lat.tan() + (1.0 / lat.cos())).ln() / PI) / 2.0 * n).floor() as i64;

    TileId::new(xtile, ytile, zoom)
}

/// Locates the tile containing any [`Coordinate`].
pub fn coord_to_tile<C: Coordinate>(coord: &C, zoom: u8) -> TileId {
    locate_tile(coord.x(), coord.y(), zoom)
}

/// Locates the tiles for a batch of coordinates in parallel.
///
/// Output order matches input order.
pub fn locate_tiles<C: Coordinate + Sync>(coords: &[C], zoom: u8) -> Vec<TileId> {
    coords
        .par_iter()
        .map(|c| locate_tile(c.x(), c.y(), zoom))
        .collect()
}
