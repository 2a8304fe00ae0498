use crate::index::constants::MAX_LATITUDE;
use crate::index::projection::locate_tile;
use crate::tile::{Extrema, TileId};

// Keeps the south-east corner inside its tile instead of on the next edge.
const EPSILON: f64 = 1.0e-9;

/// Row-major iterator over the tiles covering a lng/lat box at one zoom.
///
/// Zero-width or zero-height boxes yield the tiles along that line.
/// Latitudes are clamped to the Web Mercator limits and indices to the
/// tile range of the zoom level, so the iterator only yields valid tiles.
pub struct TileCover {
    z: u8,
    x: i64,
    y: i64,
    minx: i64,
    maxx: i64,
    miny: i64,
    maxy: i64,
    finished: bool,
}

impl TileCover {
    pub fn new(extent: &Extrema, zoom: u8) -> TileCover {
        let w = extent.w.max(-180.0);
        let e = extent.e.min(180.0);
        let n = extent.n.min(MAX_LATITUDE);
        let s = extent.s.max(-MAX_LATITUDE);

        if !(w <= e && s <= n) {
            // Return "empty" iterator for inverted or NaN extents
            return TileCover {
                z: zoom,
                x: 0,
                y: 0,
                minx: 0,
                maxx: -1,
                miny: 0,
                maxy: -1,
                finished: true,
            };
        }

        let last = (2.0_f64.powf(zoom as f64) as i64).saturating_sub(1);
        let ul = locate_tile(w, n, zoom);
        let lr = locate_tile((e - EPSILON).max(w), (s + EPSILON).min(n), zoom);

        let minx = ul.x.clamp(0, last);
        let miny = ul.y.clamp(0, last);
        let maxx = lr.x.clamp(0, last);
        let maxy = lr.y.clamp(0, last);

        TileCover {
            z: zoom,
            x: minx,
            y: miny,
            minx,
            maxx,
            miny,
            maxy,
            finished: false,
        }
    }

    /// Number of tiles the iterator yields in total.
    ///
    /// A world cover has `4^zoom` tiles, past `u64` from zoom 32 on.
    pub fn tile_count(&self) -> u128 {
        if self.maxx < self.minx || self.maxy < self.miny {
            return 0;
        }
        let cols = (self.maxx as i128 - self.minx as i128 + 1) as u128;
        let rows = (self.maxy as i128 - self.miny as i128 + 1) as u128;
        cols.saturating_mul(rows)
    }
}

impl Iterator for TileCover {
    type Item = TileId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = TileId::new(self.x, self.y, self.z);
        if self.y < self.maxy {
            self.y += 1;
        } else if self.x < self.maxx {
            self.x += 1;
            self.y = self.miny;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

/// Returns an iterator over all tiles intersecting `extent` at `zoom`.
///
/// # Example
/// ```
/// use mercantile_rs::{Extrema, tiles_in_bounds};
///
/// let world = Extrema { w: -180.0, e: 180.0, n: 90.0, s: -90.0 };
/// assert_eq!(tiles_in_bounds(&world, 1).count(), 4);
/// ```
pub fn tiles_in_bounds(extent: &Extrema, zoom: u8) -> TileCover {
    TileCover::new(extent, zoom)
}

#[test]
fn test_cover_world() {
    let world = Extrema {
        w: -180.0,
        e: 180.0,
        n: 90.0,
        s: -90.0,
    };
    let tiles = tiles_in_bounds(&world, 1).collect::<Vec<_>>();
    assert_eq!(
        tiles,
        vec![
            TileId::new(0, 0, 1),
            TileId::new(0, 1, 1),
            TileId::new(1, 0, 1),
            TileId::new(1, 1, 1),
        ]
    );
    assert_eq!(tiles_in_bounds(&world, 3).tile_count(), 64);
    assert_eq!(tiles_in_bounds(&world, 3).count(), 64);
}

#[test]
fn test_cover_single_tile() {
    let tile = TileId::new(486, 332, 10);
    let tiles = tiles_in_bounds(&tile.bounds(), 10).collect::<Vec<_>>();
    assert_eq!(tiles, vec![tile]);
}

#[test]
fn test_cover_small_box() {
    let extent = Extrema {
        w: -105.0,
        e: -104.99,
        n: 40.0,
        s: 39.99,
    };
    let tiles = tiles_in_bounds(&extent, 14).collect::<Vec<_>>();
    assert!(!tiles.is_empty());
    assert!(tiles.contains(&locate_tile(-105.0, 40.0, 14)));
    assert!(tiles.contains(&locate_tile(-104.995, 39.995, 14)));
    for tile in &tiles {
        assert!(tile.bounds().intersects(&extent));
    }
}

#[test]
fn test_cover_point_extent() {
    let extent = Extrema {
        w: 10.0,
        e: 10.0,
        n: 5.0,
        s: 5.0,
    };
    let tiles = tiles_in_bounds(&extent, 5).collect::<Vec<_>>();
    assert_eq!(tiles, vec![locate_tile(10.0, 5.0, 5)]);
}

#[test]
fn test_cover_inverted_extent() {
    let extent = Extrema {
        w: 10.0,
        e: -10.0,
        n: 5.0,
        s: 5.0,
    };
    assert_eq!(tiles_in_bounds(&extent, 5).count(), 0);
    assert_eq!(tiles_in_bounds(&extent, 5).tile_count(), 0);
}

#[test]
fn test_cover_count_deep_zoom() {
    let world = Extrema {
        w: -180.0,
        e: 180.0,
        n: 85.0511287798066,
        s: -85.0511287798066,
    };
    assert_eq!(tiles_in_bounds(&world, 32).tile_count(), 1u128 << 64);
    assert!(tiles_in_bounds(&world, 40).tile_count() > u64::MAX as u128);

    let mut tiles = tiles_in_bounds(&world, 40);
    assert_eq!(tiles.next(), Some(TileId::new(0, 0, 40)));
}
