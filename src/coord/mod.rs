mod mercator;

pub use mercator::{EARTH_RADIUS, lnglat, xy};

use geo_types::Point;

/// Trait for types that can provide longitude/latitude coordinates.
///
/// Implemented for `(f64, f64)` tuples and `geo_types::Point<f64>`.
/// This allows functions to accept either type.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude in degrees).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude in degrees).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (-90.0, 40.0);
        assert_eq!(tuple.x(), -90.0);
        assert_eq!(tuple.y(), 40.0);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(-90.0, 40.0);
        assert_eq!(Coordinate::x(&point), -90.0);
        assert_eq!(Coordinate::y(&point), 40.0);
    }
}
