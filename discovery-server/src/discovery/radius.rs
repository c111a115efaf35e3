//! Zoom level to search radius.
//!
//! The visible radius roughly halves with each zoom level. A fixed buffer
//! is added so merchants just outside the viewport edge are included.

/// Smallest zoom level in the table (widest view).
pub const MIN_ZOOM: f64 = 10.0;

/// Largest zoom level in the table (closest view).
pub const MAX_ZOOM: f64 = 19.0;

/// Multiplier applied to the interpolated base radius.
pub const RADIUS_BUFFER: f64 = 1.2;

/// Base visible radius in meters for zoom levels 10 through 19.
const BASE_RADIUS_M: [f64; 10] = [
    25_600.0, // 10
    12_800.0, // 11
    6_400.0,  // 12
    3_200.0,  // 13
    1_600.0,  // 14
    800.0,    // 15
    400.0,    // 16
    200.0,    // 17
    100.0,    // 18
    50.0,     // 19
];

/// Interpolated base radius in meters, before the buffer.
///
/// Fractional zooms interpolate linearly between the neighbouring integer
/// levels. Zooms outside [10, 19] clamp to the table edge; NaN is treated
/// as the widest zoom.
pub fn base_radius(zoom: f64) -> f64 {
    let zoom = if zoom.is_nan() {
        MIN_ZOOM
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    };

    let lower = zoom.floor();
    let upper = zoom.ceil();
    let lower_radius = BASE_RADIUS_M[(lower - MIN_ZOOM) as usize];
    let upper_radius = BASE_RADIUS_M[(upper - MIN_ZOOM) as usize];

    let fraction = zoom - lower;
    lower_radius + (upper_radius - lower_radius) * fraction
}

/// Search radius in meters for a map zoom level.
///
/// ```
/// use discovery_server::discovery::estimate_radius;
///
/// assert_eq!(estimate_radius(16.0), 480);
/// assert_eq!(estimate_radius(16.5), 360);
/// assert_eq!(estimate_radius(25.0), 60);
/// ```
pub fn estimate_radius(zoom: f64) -> u32 {
    (base_radius(zoom) * RADIUS_BUFFER).round() as u32
}
