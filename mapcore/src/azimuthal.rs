//! Azimuthal projections, which map the globe onto a plane touching it at the projection center.
//! <https://en.wikipedia.org/wiki/Map_projection#Azimuthal_(projections_onto_a_plane)>

use std::f64::consts::FRAC_PI_2;

use crate::mercator::WGS84_EQUATORIAL_RADIUS;
use crate::{Location, Pixels, lat_lon};

/// Azimuth (clockwise from north) and great-circle distance from `from` to `to`, both in radians.
pub fn azimuth_distance(from: Location, to: Location) -> (f64, f64) {
    let (sin_lat1, cos_lat1) = from.latitude().to_radians().sin_cos();
    let (sin_lat2, cos_lat2) = to.latitude().to_radians().sin_cos();
    let (sin_dlon, cos_dlon) = (to.longitude() - from.longitude()).to_radians().sin_cos();

    let cos_distance = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;
    let azimuth = sin_dlon.atan2(cos_lat1 * sin_lat2 / cos_lat2 - sin_lat1 * cos_dlon);
    let distance = cos_distance.clamp(-1., 1.).acos();

    (azimuth, distance)
}

/// Location reached by travelling `distance` radians from `origin` along the great circle of the
/// given `azimuth`. The longitude is not normalized.
pub fn location_at(origin: Location, azimuth: f64, distance: f64) -> Location {
    let (sin_lat1, cos_lat1) = origin.latitude().to_radians().sin_cos();
    let (sin_distance, cos_distance) = distance.sin_cos();
    let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

    let sin_lat2 = sin_lat1 * cos_distance + cos_lat1 * sin_distance * cos_azimuth;
    let lat2 = sin_lat2.clamp(-1., 1.).asin();
    let dlon = (sin_distance * sin_azimuth)
        .atan2(cos_lat1 * cos_distance - sin_lat1 * sin_distance * cos_azimuth);

    lat_lon(lat2.to_degrees(), origin.longitude() + dlon.to_degrees())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum AzimuthalKind {
    /// Distances from the center are preserved.
    Equidistant,

    /// Great circles are straight lines. Only the hemisphere around the center is finite.
    Gnomonic,

    /// The globe as seen from infinitely far away. Only the visible hemisphere can be inverted.
    Orthographic,

    /// Conformal, angles are preserved.
    Stereographic,
}

impl AzimuthalKind {
    /// WMS identifier of the auto-centered coordinate reference system.
    pub fn crs_id(&self) -> Option<&'static str> {
        match self {
            AzimuthalKind::Equidistant => None,
            AzimuthalKind::Gnomonic => Some("AUTO2:97001"),
            AzimuthalKind::Orthographic => Some("AUTO2:42003"),
            AzimuthalKind::Stereographic => Some("AUTO2:97002"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AzimuthalKind::Equidistant => "equidistant",
            AzimuthalKind::Gnomonic => "gnomonic",
            AzimuthalKind::Orthographic => "orthographic",
            AzimuthalKind::Stereographic => "stereographic",
        }
    }

    /// Project `location` onto the plane touching the globe at `center`. Result is in meters.
    pub fn location_to_point(&self, center: Location, location: Location) -> Pixels {
        if location == center {
            return Pixels::new(0., 0.);
        }

        let radial: fn(f64) -> f64 = match self {
            AzimuthalKind::Orthographic => return orthographic_location_to_point(center, location),
            AzimuthalKind::Equidistant => |distance| WGS84_EQUATORIAL_RADIUS * distance,
            AzimuthalKind::Gnomonic => |distance| {
                if distance < FRAC_PI_2 {
                    WGS84_EQUATORIAL_RADIUS * distance.tan()
                } else {
                    f64::INFINITY
                }
            },
            AzimuthalKind::Stereographic => {
                |distance| 2. * WGS84_EQUATORIAL_RADIUS * (distance / 2.).tan()
            }
        };

        let (azimuth, distance) = azimuth_distance(center, location);
        let map_distance = radial(distance);

        Pixels::new(map_distance * azimuth.sin(), map_distance * azimuth.cos())
    }

    /// Inverse of [`AzimuthalKind::location_to_point`]. Points which do not correspond to any
    /// location give [`Location::nan`].
    pub fn point_to_location(&self, center: Location, point: Pixels) -> Location {
        if point.x() == 0. && point.y() == 0. {
            return center;
        }

        let inverse_radial: fn(f64) -> f64 = match self {
            AzimuthalKind::Orthographic => return orthographic_point_to_location(center, point),
            AzimuthalKind::Equidistant => |map_distance| map_distance / WGS84_EQUATORIAL_RADIUS,
            AzimuthalKind::Gnomonic => |map_distance| map_distance.atan2(WGS84_EQUATORIAL_RADIUS),
            AzimuthalKind::Stereographic => {
                |map_distance| 2. * (map_distance / (2. * WGS84_EQUATORIAL_RADIUS)).atan()
            }
        };

        let azimuth = point.x().atan2(point.y());
        let distance = inverse_radial(point.x().hypot(point.y()));

        location_at(center, azimuth, distance)
    }
}

fn orthographic_location_to_point(center: Location, location: Location) -> Pixels {
    let (sin_lat0, cos_lat0) = center.latitude().to_radians().sin_cos();
    let (sin_lat, cos_lat) = location.latitude().to_radians().sin_cos();
    let (sin_dlon, cos_dlon) = (location.longitude() - center.longitude())
        .to_radians()
        .sin_cos();

    Pixels::new(
        WGS84_EQUATORIAL_RADIUS * cos_lat * sin_dlon,
        WGS84_EQUATORIAL_RADIUS * (cos_lat0 * sin_lat - sin_lat0 * cos_lat * cos_dlon),
    )
}

fn orthographic_point_to_location(center: Location, point: Pixels) -> Location {
    let x = point.x() / WGS84_EQUATORIAL_RADIUS;
    let y = point.y() / WGS84_EQUATORIAL_RADIUS;
    let r2 = x * x + y * y;

    // Beyond the horizon.
    if r2 > 1. {
        return Location::nan();
    }

    let r = r2.sqrt();
    let sin_c = r;
    let cos_c = (1. - r2).sqrt();
    let (sin_lat0, cos_lat0) = center.latitude().to_radians().sin_cos();

    lat_lon(
        (cos_c * sin_lat0 + y * sin_c * cos_lat0 / r).asin().to_degrees(),
        (x * sin_c)
            .atan2(r * cos_c * cos_lat0 - y * sin_c * sin_lat0)
            .to_degrees()
            + center.longitude(),
    )
}
