//! Latitude and longitude lines drawn over the map, with their labels.

use geo_types::{Coord, Rect};

use crate::location::normalize_longitude;
use crate::mercator::degrees_to_viewport_scale;
use crate::{BoundingBox, Error, Projection, Viewport};

/// Candidate spacings of the lines, in degrees, minutes or seconds.
const LINE_DISTANCES: [f64; 7] = [1., 2., 5., 10., 15., 30., 60.];

const ONE_MINUTE: f64 = 1. / 60.;

/// Default minimum spacing of the lines, in pixels.
pub const MIN_LINE_DISTANCE: f64 = 150.;

/// Spacing of the lines, in degrees, such that they are at least `min_line_distance` pixels apart
/// at `zoom_level`. Spacings below a degree are whole minutes or seconds.
pub fn line_distance(min_line_distance: f64, zoom_level: f64) -> f64 {
    let mut min_distance = min_line_distance / degrees_to_viewport_scale(zoom_level);
    let mut scale = 1.;

    if min_distance < 1. {
        scale = if min_distance < ONE_MINUTE { 3600. } else { 60. };
        min_distance *= scale;
    }

    let distance = LINE_DISTANCES
        .iter()
        .copied()
        .find(|distance| *distance >= min_distance)
        .unwrap_or(LINE_DISTANCES[LINE_DISTANCES.len() - 1]);

    distance / scale
}

/// Label of a line at `value` degrees, e.g. `N 52°`, `E 21°30'` or `S 3°10'05"`. The precision
/// follows `line_distance`. `hemispheres` are the letters for positive and negative values.
pub fn label_text(value: f64, line_distance: f64, hemispheres: [char; 2]) -> String {
    let (value, hemisphere) = if value < -1e-8 {
        (-value, hemispheres[1])
    } else {
        (value, hemispheres[0])
    };

    let seconds = (value * 3600.).round() as i64;
    let (degrees, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);

    if line_distance < ONE_MINUTE {
        format!("{hemisphere} {degrees}°{minutes:02}'{seconds:02}\"")
    } else if line_distance < 1. {
        format!("{hemisphere} {degrees}°{minutes:02}'")
    } else {
        format!("{hemisphere} {degrees}°")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Latitude or longitude of the line, in degrees.
    pub position: f64,
    pub text: String,
}

/// Lines covering a geographical area.
#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    pub line_distance: f64,
    pub latitudes: Vec<Label>,
    pub longitudes: Vec<Label>,
}

/// Multiples of `step` within `[min, max]`.
fn lines(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let start = (min / step).ceil() * step;
    (0..)
        .map(move |i| start + i as f64 * step)
        .take_while(move |position| *position <= max)
}

impl Graticule {
    pub fn new(bounds: &BoundingBox, zoom_level: f64, min_line_distance: f64) -> Self {
        let line_distance = line_distance(min_line_distance, zoom_level);

        let latitudes = lines(bounds.south, bounds.north, line_distance)
            .map(|latitude| Label {
                position: latitude,
                text: label_text(latitude, line_distance, ['N', 'S']),
            })
            .collect();

        let longitudes = lines(bounds.west, bounds.east, line_distance)
            .map(|longitude| Label {
                position: longitude,
                text: label_text(normalize_longitude(longitude), line_distance, ['E', 'W']),
            })
            .collect();

        Self {
            line_distance,
            latitudes,
            longitudes,
        }
    }

    /// Lines visible in the viewport. `None` for projections in which lines of constant longitude
    /// are not straight, i.e. the azimuthal ones.
    pub fn for_viewport(
        viewport: &Viewport,
        projection: &Projection,
        min_line_distance: f64,
    ) -> Result<Option<Self>, Error> {
        if projection.longitude_scale().is_nan() {
            return Ok(None);
        }

        let size = viewport.size();
        let bounds = viewport
            .projector(projection)?
            .viewport_rect_to_bounding_box(Rect::new(
                Coord { x: 0., y: 0. },
                Coord {
                    x: size.width,
                    y: size.height,
                },
            ));

        Ok(Some(Self::new(&bounds, viewport.zoom_level(), min_line_distance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azimuthal::AzimuthalKind;
    use crate::viewport::Size;
    use crate::{Location, lat_lon};
    use approx::assert_relative_eq;

    #[test]
    fn line_distances() {
        // 256px per 360° at zoom 0, so 150px is about 211°.
        assert_eq!(60., line_distance(150., 0.));
        // About 13.2° at zoom 4.
        assert_eq!(15., line_distance(150., 4.));
        // About 0.82° at zoom 8, that is 49.4'.
        assert_relative_eq!(1., line_distance(150., 8.));
        // About 0.206° at zoom 10, that is 12.4'.
        assert_relative_eq!(15. / 60., line_distance(150., 10.));
        // About 2.9" at zoom 18.
        assert_relative_eq!(5. / 3600., line_distance(150., 18.));
    }

    #[test]
    fn labels() {
        assert_eq!("N 52°", label_text(52., 1., ['N', 'S']));
        assert_eq!("S 12°30'", label_text(-12.5, 0.5, ['N', 'S']));
        assert_eq!("E 21°00'15\"", label_text(21. + 15. / 3600., 5. / 3600., ['E', 'W']));
        assert_eq!("W 180°", label_text(-180., 30., ['E', 'W']));
        assert_eq!("N 0°", label_text(-1e-9, 10., ['N', 'S']));
    }

    #[test]
    fn lines_within_bounds() {
        let bounds = BoundingBox {
            north: 52.,
            east: 195.,
            south: 48.,
            west: 170.,
        };
        let graticule = Graticule::new(&bounds, 4., 150.);

        assert_eq!(15., graticule.line_distance);
        assert!(graticule.latitudes.is_empty());

        let longitudes: Vec<(f64, &str)> = graticule
            .longitudes
            .iter()
            .map(|label| (label.position, label.text.as_str()))
            .collect();
        assert_eq!(vec![(180., "E 180°"), (195., "W 165°")], longitudes);
    }

    #[test]
    fn lines_of_viewport() {
        let mut viewport = Viewport::new(Size::new(800., 600.)).unwrap();
        viewport.set_center(lat_lon(40., 10.));
        viewport.set_zoom_level(5.).unwrap();

        let graticule =
            Graticule::for_viewport(&viewport, &Projection::WebMercator, MIN_LINE_DISTANCE)
            .unwrap()
            .unwrap();

        assert_eq!(10., graticule.line_distance);
        assert!(graticule.latitudes.iter().any(|label| label.text == "N 40°"));
        assert!(graticule.longitudes.iter().any(|label| label.text == "E 10°"));

        let azimuthal = Projection::Azimuthal(AzimuthalKind::Stereographic, Location::ORIGIN);
        assert_eq!(None, Graticule::for_viewport(&viewport, &azimuthal, 150.).unwrap());
    }
}
