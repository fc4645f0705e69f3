use std::fmt;
use std::str::FromStr;

use crate::location::parse_number;
use crate::{Error, Location};

/// Rectangular geographical area.
///
/// North and south are clamped to `[-90, 90]` by the constructors, except for
/// [`BoundingBox::with_plane_span`], which stores spans in projection meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct BoundingBox {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

fn clamp_latitude(latitude: f64) -> f64 {
    latitude.clamp(-90., 90.)
}

impl BoundingBox {
    pub fn new(north: f64, east: f64, south: f64, west: f64) -> Self {
        Self {
            north: clamp_latitude(north),
            east,
            south: clamp_latitude(south),
            west,
        }
    }

    /// Box of `width` degrees of longitude and `height` degrees of latitude around `center`.
    pub fn from_center(center: Location, width: f64, height: f64) -> Self {
        let (w2, h2) = (width / 2., height / 2.);
        Self::new(
            center.latitude() + h2,
            center.longitude() + w2,
            center.latitude() - h2,
            center.longitude() - w2,
        )
    }

    /// Box around `center` whose `width` and `height` are given in meters on the projection plane.
    /// Used by the azimuthal projections, where the extent is not expressible in degrees. Nothing
    /// is clamped, so [`BoundingBox::width`] and [`BoundingBox::height`] return the spans intact.
    pub fn with_plane_span(center: Location, width: f64, height: f64) -> Self {
        let (w2, h2) = (width / 2., height / 2.);
        Self {
            north: center.latitude() + h2,
            east: center.longitude() + w2,
            south: center.latitude() - h2,
            west: center.longitude() - w2,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn has_valid_bounds(&self) -> bool {
        self.south < self.north && self.west < self.east
    }

    pub fn center(&self) -> Location {
        Location::new(
            (self.north + self.south) / 2.,
            (self.east + self.west) / 2.,
        )
    }

    /// Box with the same center and both spans multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::from_center(self.center(), self.width() * factor, self.height() * factor)
    }
}

impl std::ops::Mul<f64> for BoundingBox {
    type Output = BoundingBox;

    fn mul(self, factor: f64) -> Self::Output {
        self.scaled(factor)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.north, self.east, self.south, self.west)
    }
}

impl FromStr for BoundingBox {
    type Err = Error;

    /// Parse `"north,east,south,west"`. Any of space, comma, semicolon and colon separate the
    /// values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split([' ', ',', ';', ':']).filter(|token| !token.is_empty());
        let mut next = || {
            tokens
                .next()
                .ok_or_else(|| Error::format("bounding box", s))
                .and_then(|token| parse_number("bounding box", token))
        };

        let north = next()?;
        let east = next()?;
        let south = next()?;
        let west = next()?;
        Ok(Self::new(north, east, south, west))
    }
}
