//! Mercator arithmetic shared by the cylindrical projections and the tile grid.
//! <https://en.wikipedia.org/wiki/Web_Mercator_projection>
//! <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>
//!
//! Projected coordinates here are in "degrees": a full turn of longitude spans 360 units and the
//! Mercator `y` spans the same range at [`web_y_to_latitude`]`(180)`, roughly 85.0511°. Multiply
//! by [`METERS_PER_DEGREE`] to get meters on the projection plane.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::{Location, Pixels, lat_lon};

// zoom level   tile coverage  number of tiles  tile size(*) in degrees
// 0            1 tile         1 tile           360° x 170.1022°
// 1            2 × 2 tiles    4 tiles          180° x 85.0511°
// 2            4 × 4 tiles    16 tiles         90° x [variable]

/// Size of a single tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Pixels per degree of longitude at zoom level 0.
pub const TILE_SIZE_SCALE: f64 = TILE_SIZE as f64 / 360.;

/// Semi-major axis of the WGS 84 ellipsoid, in meters.
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6378137.;

pub const METERS_PER_DEGREE: f64 = WGS84_EQUATORIAL_RADIUS * PI / 180.;

pub const FLATTENING: f64 = 1. / 298.257223563;

/// First eccentricity of the WGS 84 ellipsoid, `sqrt((2 - f) f)`.
pub const ECCENTRICITY: f64 = 0.081_819_190_842_621_49;

/// Eccentricity constant used by Yandex for its tiles.
const YANDEX_ECCENTRICITY: f64 = 0.0818191908426;

/// Default precision of [`world_y_to_latitude`], in radians.
pub const LATITUDE_TOLERANCE: f64 = 1e-6;

/// Default iteration cap of [`world_y_to_latitude`].
pub const MAX_ITERATIONS: usize = 10;

/// Zoom specifies how many pixels are in the whole map. For example, zoom 0 means that the whole
/// map is just one 256x256 tile, zoom 1 means that it is 2x2 tiles, and so on.
pub fn total_pixels(zoom: f64) -> f64 {
    2f64.powf(zoom) * (TILE_SIZE as f64)
}

pub fn total_tiles(zoom: u8) -> u32 {
    2u32.pow(zoom as u32)
}

/// Pixels per degree of longitude at the given zoom level.
pub fn degrees_to_viewport_scale(zoom: f64) -> f64 {
    2f64.powf(zoom) * TILE_SIZE_SCALE
}

/// Spherical Mercator `y` of the latitude. Infinite at and beyond the poles.
pub fn web_latitude_to_y(latitude: f64) -> f64 {
    if latitude <= -90. {
        f64::NEG_INFINITY
    } else if latitude >= 90. {
        f64::INFINITY
    } else {
        latitude.to_radians().tan().asinh().to_degrees()
    }
}

pub fn web_y_to_latitude(y: f64) -> f64 {
    y.to_radians().sinh().atan().to_degrees()
}

fn conformal_factor(latitude: f64) -> f64 {
    let e = ECCENTRICITY;
    let e_sin = e * latitude.sin();
    ((1. - e_sin) / (1. + e_sin)).powf(e / 2.)
}

/// Ellipsoidal Mercator `y` of the latitude. Infinite at and beyond the poles.
pub fn world_latitude_to_y(latitude: f64) -> f64 {
    if latitude <= -90. {
        f64::NEG_INFINITY
    } else if latitude >= 90. {
        f64::INFINITY
    } else {
        let phi = latitude.to_radians();
        ((0.5 * phi + FRAC_PI_4).tan() * conformal_factor(phi))
            .ln()
            .to_degrees()
    }
}

/// Outcome of the iterative ellipsoidal inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// Best estimate in degrees.
    pub latitude: f64,

    pub iterations: usize,

    /// Whether the last step was within the tolerance. `false` when the iteration cap was hit or
    /// the estimate became non-finite.
    pub converged: bool,
}

/// Invert [`world_latitude_to_y`] by fixed-point iteration, starting from the spherical estimate.
pub fn world_y_to_latitude_with(y: f64, tolerance: f64, max_iterations: usize) -> Convergence {
    let e = (-y.to_radians()).exp();
    let mut phi = FRAC_PI_2 - 2. * e.atan();

    for iteration in 1..=max_iterations {
        let next = FRAC_PI_2 - 2. * (e * conformal_factor(phi)).atan();
        let delta = (next - phi).abs();
        phi = next;

        if !phi.is_finite() {
            return Convergence {
                latitude: phi.to_degrees(),
                iterations: iteration,
                converged: false,
            };
        }

        if delta <= tolerance {
            return Convergence {
                latitude: phi.to_degrees(),
                iterations: iteration,
                converged: true,
            };
        }
    }

    Convergence {
        latitude: phi.to_degrees(),
        iterations: max_iterations,
        converged: false,
    }
}

/// Invert [`world_latitude_to_y`]. Returns the best estimate even if the iteration did not
/// converge.
pub fn world_y_to_latitude(y: f64) -> f64 {
    let convergence = world_y_to_latitude_with(y, LATITUDE_TOLERANCE, MAX_ITERATIONS);
    if !convergence.converged {
        log::trace!(
            "Latitude of y={} did not converge after {} iterations.",
            y,
            convergence.iterations
        );
    }
    convergence.latitude
}

/// Point in meters of the Yandex flavour of the ellipsoidal Mercator.
pub fn yandex_location_to_point(location: Location) -> Pixels {
    let lambda = location.longitude().to_radians();
    let phi = location.latitude().to_radians();

    let h = (FRAC_PI_4 + phi / 2.).tan();
    let j = (FRAC_PI_4 + (YANDEX_ECCENTRICITY * phi.sin()).asin() / 2.)
        .tan()
        .powf(YANDEX_ECCENTRICITY);

    Pixels::new(
        WGS84_EQUATORIAL_RADIUS * lambda,
        WGS84_EQUATORIAL_RADIUS * (h / j).ln(),
    )
}

/// Inverse of [`yandex_location_to_point`]. The Yandex formula is algebraically the same as
/// [`world_latitude_to_y`], so the ellipsoidal iteration applies.
pub fn yandex_point_to_location(point: Pixels) -> Location {
    lat_lon(
        world_y_to_latitude(point.y() / METERS_PER_DEGREE),
        point.x() / METERS_PER_DEGREE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn viewport_scale_doubles_with_zoom() {
        assert_relative_eq!(256. / 360., degrees_to_viewport_scale(0.));
        assert_relative_eq!(
            2. * degrees_to_viewport_scale(7.),
            degrees_to_viewport_scale(8.)
        );
        assert_eq!(1, total_tiles(0));
        assert_eq!(1024, total_tiles(10));
        assert_relative_eq!(512., total_pixels(1.));
    }

    #[test]
    fn eccentricity_of_wgs84() {
        assert_relative_eq!(
            ((2. - FLATTENING) * FLATTENING).sqrt(),
            ECCENTRICITY,
            epsilon = 1e-15
        );
    }

    #[test]
    fn web_mercator_edges() {
        assert_abs_diff_eq!(0., web_latitude_to_y(0.), epsilon = 1e-12);
        assert_eq!(f64::INFINITY, web_latitude_to_y(90.));
        assert_eq!(f64::NEG_INFINITY, web_latitude_to_y(-91.));
        assert_abs_diff_eq!(85.0511287798, web_y_to_latitude(180.), epsilon = 1e-9);
        assert_abs_diff_eq!(180., web_latitude_to_y(web_y_to_latitude(180.)), epsilon = 1e-9);
    }

    #[test]
    fn world_mercator_round_trip() {
        for latitude in [-80., -45., 0., 45., 80.] {
            let convergence = world_y_to_latitude_with(
                world_latitude_to_y(latitude),
                LATITUDE_TOLERANCE,
                MAX_ITERATIONS,
            );
            assert!(convergence.converged, "{latitude}: {convergence:?}");
            assert!(convergence.iterations <= MAX_ITERATIONS);
            assert_abs_diff_eq!(latitude, convergence.latitude, epsilon = 1e-4);
        }
    }

    #[test]
    fn world_mercator_is_flatter_than_spherical() {
        assert!(world_latitude_to_y(60.) < web_latitude_to_y(60.));
        assert!(world_y_to_latitude(180.) > web_y_to_latitude(180.));
        assert_abs_diff_eq!(85.0840590501, world_y_to_latitude(180.), epsilon = 1e-5);
    }

    #[test]
    fn world_mercator_terminates_near_poles() {
        for y in [1e3, -1e3, 1e6, f64::INFINITY, f64::NEG_INFINITY] {
            let convergence = world_y_to_latitude_with(y, LATITUDE_TOLERANCE, MAX_ITERATIONS);
            assert!(convergence.iterations <= MAX_ITERATIONS);
            assert!(convergence.latitude.abs() <= 90. + 1e-9);
        }
    }

    #[test]
    fn iteration_cap_is_reported() {
        let convergence = world_y_to_latitude_with(100., 0., 3);
        assert!(!convergence.converged);
        assert_eq!(3, convergence.iterations);
    }

    #[test]
    fn yandex_round_trip() {
        for latitude in [-84., -30., 0., 55.75, 84.] {
            let location = lat_lon(latitude, 37.62);
            let point = yandex_location_to_point(location);
            let back = yandex_point_to_location(point);
            assert_abs_diff_eq!(latitude, back.latitude(), epsilon = 1e-5);
            assert_abs_diff_eq!(37.62, back.longitude(), epsilon = 1e-9);
        }
    }

    #[test]
    fn yandex_matches_world_mercator() {
        let point = yandex_location_to_point(lat_lon(55.75, 37.62));
        assert_abs_diff_eq!(
            METERS_PER_DEGREE * world_latitude_to_y(55.75),
            point.y(),
            epsilon = 1e-3
        );
    }
}
