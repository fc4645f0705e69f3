//! Geographical locations and longitude arithmetic.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Tolerance used when comparing locations. Projections are not exact inverses of each other, so
/// a location which went through a round trip is still considered equal to the original one.
const EPSILON: f64 = if cfg!(debug_assertions) { 2e-9 } else { 1e-9 };

/// Geographical location given by latitude and longitude in degrees.
///
/// Latitude is clamped to `[-90, 90]` when the location is created. Longitude is not restricted,
/// which allows tracking positions past the antimeridian; see [`normalize_longitude`].
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(from = "LatLon", into = "LatLon")
)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub const ORIGIN: Location = Location {
        latitude: 0.,
        longitude: 0.,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90., 90.),
            longitude,
        }
    }

    /// Location which projections return for points they cannot map back onto the globe.
    pub fn nan() -> Self {
        Self {
            latitude: f64::NAN,
            longitude: f64::NAN,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether this location is a result of projecting a point outside of the projection's domain.
    pub fn is_nan(&self) -> bool {
        self.latitude.is_nan() || self.longitude.is_nan()
    }

    /// Same location with longitude brought into `[-180, 180]`.
    pub fn normalized(self) -> Self {
        Self {
            latitude: self.latitude,
            longitude: normalize_longitude(self.longitude),
        }
    }
}

/// Construct [`Location`] from latitude and longitude.
pub fn lat_lon(lat: f64, lon: f64) -> Location {
    Location::new(lat, lon)
}

/// Construct [`Location`] from longitude and latitude, which is the order used by GeoJSON and
/// [`geo_types`].
pub fn lon_lat(lon: f64, lat: f64) -> Location {
    Location::new(lat, lon)
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < EPSILON
            && (self.longitude - other.longitude).abs() < EPSILON
    }
}

impl From<geo_types::Point> for Location {
    fn from(point: geo_types::Point) -> Self {
        lon_lat(point.x(), point.y())
    }
}

impl From<Location> for geo_types::Point {
    fn from(location: Location) -> Self {
        geo_types::Point::new(location.longitude, location.latitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Parse `"latitude,longitude"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split(',');
        let (Some(lat), Some(lon), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(Error::format("location", s));
        };
        Ok(Self::new(parse_number("location", lat)?, parse_number("location", lon)?))
    }
}

pub(crate) fn parse_number(what: &'static str, token: &str) -> Result<f64, Error> {
    token
        .trim()
        .parse()
        .map_err(|_parse_error| Error::format(what, token))
}

/// Parse a list of locations separated with spaces or semicolons, for example
/// `"52.1,21.0 52.2,21.1;52.3,21.2"`.
pub fn parse_locations(s: &str) -> Result<Vec<Location>, Error> {
    s.split([' ', ';'])
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Bring longitude into `[-180, 180]`. Values already in range are returned untouched.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude < -180. {
        (longitude + 180.) % 360. + 180.
    } else if longitude > 180. {
        (longitude - 180.) % 360. - 180.
    } else {
        longitude
    }
}

/// Representative of `longitude` (modulo 360) which is the closest to `reference`. Used to avoid
/// jumps when the map is moved across the antimeridian.
///
/// Comparisons are strict: a longitude exactly 180° away from the reference is left as is.
pub fn nearest_longitude(longitude: f64, reference: f64) -> f64 {
    let longitude = normalize_longitude(longitude);

    if longitude > reference + 180. {
        longitude - 360.
    } else if longitude < reference - 180. {
        longitude + 360.
    } else {
        longitude
    }
}

#[cfg(feature = "serde")]
#[derive(::serde::Serialize, ::serde::Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

#[cfg(feature = "serde")]
impl From<LatLon> for Location {
    fn from(value: LatLon) -> Self {
        Self::new(value.lat, value.lon)
    }
}

#[cfg(feature = "serde")]
impl From<Location> for LatLon {
    fn from(value: Location) -> Self {
        Self {
            lat: value.latitude,
            lon: value.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn latitude_is_clamped() {
        assert_eq!(90., lat_lon(95., 10.).latitude());
        assert_eq!(-90., lat_lon(-100., 10.).latitude());
        assert_eq!(370., lat_lon(10., 370.).longitude());
    }

    #[test]
    fn equality_tolerates_rounding() {
        assert_eq!(lat_lon(52.0, 21.0), lat_lon(52.0 + 1e-10, 21.0 - 1e-10));
        assert_ne!(lat_lon(52.0, 21.0), lat_lon(52.0 + 1e-6, 21.0));
        assert_ne!(Location::nan(), Location::nan());
    }

    #[test]
    fn normalizing_longitude() {
        assert_eq!(170., normalize_longitude(-190.));
        assert_eq!(-170., normalize_longitude(190.));
        assert_eq!(180., normalize_longitude(180.));
        assert_eq!(-180., normalize_longitude(-180.));
        assert_relative_eq!(10., normalize_longitude(730.));
        assert_relative_eq!(-10., normalize_longitude(-730.));
    }

    #[test]
    fn normalizing_longitude_is_idempotent() {
        for longitude in [-1000.5, -540., -360., -181., -0.5, 0., 179.9, 180.1, 359., 725.25] {
            let once = normalize_longitude(longitude);
            assert!((-180. ..=180.).contains(&once), "{longitude} -> {once}");
            assert_eq!(once, normalize_longitude(once));
        }
    }

    #[test]
    fn nearest_longitude_across_antimeridian() {
        assert_eq!(-190., nearest_longitude(170., -170.));
        assert_eq!(190., nearest_longitude(-170., 170.));
        assert_eq!(10., nearest_longitude(10., 0.));

        // Exactly 180° away stays where it is.
        assert_eq!(180., nearest_longitude(180., 0.));
        assert_eq!(-180., nearest_longitude(-180., 0.));
    }

    #[test]
    fn parsing_location() {
        let location: Location = " 52.2297 , 21.0122 ".parse().unwrap();
        assert_eq!(lat_lon(52.2297, 21.0122), location);
        assert_eq!("52.22970,21.01220", location.to_string());
    }

    #[test]
    fn parsing_malformed_location() {
        assert_eq!(
            Err(Error::format("location", "52.2297")),
            "52.2297".parse::<Location>()
        );
        assert_eq!(
            Err(Error::format("location", "1,2,3")),
            "1,2,3".parse::<Location>()
        );
        assert_eq!(
            Err(Error::format("location", "east")),
            "52,east".parse::<Location>()
        );
    }

    #[test]
    fn parsing_list_of_locations() {
        let locations = parse_locations("1,2 3,4;;5,6 ").unwrap();
        assert_eq!(vec![lat_lon(1., 2.), lat_lon(3., 4.), lat_lon(5., 6.)], locations);
        assert!(parse_locations("1,2 x,4").is_err());
    }

    #[test]
    fn converting_to_and_from_point() {
        let point: geo_types::Point = lat_lon(51.1, 17.0).into();
        assert_eq!(17.0, point.x());
        assert_eq!(51.1, point.y());
        assert_eq!(lat_lon(51.1, 17.0), Location::from(point));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializing_location() {
        let json = serde_json::to_string(&lat_lon(1.5, 2.5)).unwrap();
        assert_eq!(r#"{"lat":1.5,"lon":2.5}"#, json);

        let location: Location = serde_json::from_str(r#"{"lat":100.0,"lon":2.5}"#).unwrap();
        assert_eq!(lat_lon(90., 2.5), location);
    }
}
