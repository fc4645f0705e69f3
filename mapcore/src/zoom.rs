#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid zoom level")]
pub struct InvalidZoom;

/// Deepest zoom level a viewport can reach and any layer can request.
pub const MAX_ZOOM: f64 = 22.;

/// Fractional zoom level, validated to stay within `[0, 22]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Zoom(f64);

impl TryFrom<f64> for Zoom {
    type Error = InvalidZoom;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !(0. ..=MAX_ZOOM).contains(&value) {
            Err(InvalidZoom)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Zoom> for f64 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.)
    }
}

impl Zoom {
    /// Level `delta` away, saturating at the ends of the range. `NaN` is rejected.
    pub fn offset(self, delta: f64) -> Result<Zoom, InvalidZoom> {
        Self::try_from((self.0 + delta).clamp(0., MAX_ZOOM))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructing_zoom() {
        assert_eq!(1., f64::from(Zoom::default()));
        assert_eq!(22., f64::from(Zoom::try_from(22.).unwrap()));
        assert_eq!(InvalidZoom, Zoom::try_from(22.5).unwrap_err());
        assert_eq!(InvalidZoom, Zoom::try_from(-0.1).unwrap_err());
        assert_eq!(InvalidZoom, Zoom::try_from(f64::NAN).unwrap_err());
    }

    #[test]
    fn test_offsetting() {
        let zoom = Zoom::try_from(10.).unwrap();
        assert_eq!(10.5, f64::from(zoom.offset(0.5).unwrap()));
        assert_eq!(22., f64::from(zoom.offset(20.).unwrap()));
        assert_eq!(0., f64::from(zoom.offset(-20.).unwrap()));
        assert_eq!(Err(InvalidZoom), zoom.offset(f64::NAN));
    }
}
