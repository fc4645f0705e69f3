//! Length of the scale bar shown in the corner of the map.

use crate::{Error, Projection, Viewport};

/// Default minimum width of the bar, in pixels.
pub const MIN_WIDTH: f64 = 100.;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBar {
    /// Round length the bar stands for: 1, 2 or 5 times a power of 10.
    pub meters: f64,

    /// Width of the bar in pixels.
    pub width: f64,
}

impl ScaleBar {
    /// Label like `500 m` or `20 km`.
    pub fn label(&self) -> String {
        if self.meters >= 1000. {
            format!("{:.0} km", self.meters / 1000.)
        } else {
            format!("{:.0} m", self.meters)
        }
    }

    /// Scale bar for the center of the viewport.
    pub fn for_viewport(
        viewport: &Viewport,
        projection: &Projection,
        min_width: f64,
    ) -> Result<Option<Self>, Error> {
        let pixels_per_meter = viewport
            .projector(projection)?
            .scale_pixel_per_meter(viewport.center());

        Ok(scale_length(min_width, pixels_per_meter))
    }
}

/// Shortest round length which is at least `min_width` pixels wide. `None` if the scale is not
/// positive.
pub fn scale_length(min_width: f64, pixels_per_meter: f64) -> Option<ScaleBar> {
    if !(pixels_per_meter > 0.) || !pixels_per_meter.is_finite() {
        return None;
    }

    let length = min_width / pixels_per_meter;
    let magnitude = 10f64.powf(length.log10().floor());
    let meters = match length / magnitude {
        ratio if ratio < 2. => 2. * magnitude,
        ratio if ratio < 5. => 5. * magnitude,
        _ => 10. * magnitude,
    };

    Some(ScaleBar {
        meters,
        width: meters * pixels_per_meter,
    })
}
