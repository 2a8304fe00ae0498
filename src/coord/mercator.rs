use std::f64::consts::PI;

/// Sphere radius used by EPSG:3857, in metres.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Converts longitude/latitude in degrees to spherical mercator metres.
///
/// Latitudes of ±90 degrees yield infinite `y`.
pub fn xy(lng: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lng.to_radians();
    let y = EARTH_RADIUS * ((PI * 0.25) + (0.5 * lat.to_radians())).tan().ln();
    (x, y)
}

/// Converts spherical mercator metres back to longitude/latitude in degrees.
pub fn lnglat(x: f64, y: f64) -> (f64, f64) {
    let lng = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI * 0.5).to_degrees();
    (lng, lat)
}
