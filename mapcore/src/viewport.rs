use crate::location::normalize_longitude;
use crate::zoom::{InvalidZoom, MAX_ZOOM, Zoom};
use crate::{BoundingBox, Error, Location, Pixels, Projection, Projector, ViewportParameters};

/// Size of the viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Middle of the viewport.
    pub fn center(&self) -> Pixels {
        Pixels::new(self.width / 2., self.height / 2.)
    }

    /// Both dimensions are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0. && self.height > 0.
    }
}

/// Where the map should end up, for example after [`Viewport::zoom_to_bounds`]. Animating
/// towards it is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ViewTarget {
    pub center: Location,
    pub zoom_level: f64,
    pub heading: f64,
}

/// State of the map view which must persist between frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Viewport {
    center: Location,
    zoom: Zoom,
    heading: f64,
    size: Size,
    min_zoom: f64,
    max_zoom: f64,
    projection_center: Option<Location>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Location::ORIGIN,
            zoom: Zoom::default(),
            heading: 0.,
            size: Size::default(),
            min_zoom: 1.,
            max_zoom: 19.,
            projection_center: None,
        }
    }
}

impl Viewport {
    pub fn new(size: Size) -> Result<Self, Error> {
        let mut viewport = Self::default();
        viewport.set_size(size)?;
        Ok(viewport)
    }

    pub fn center(&self) -> Location {
        self.center
    }

    /// Center exactly at the given location.
    pub fn set_center(&mut self, center: Location) {
        self.center = center;
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom.into()
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Set zoom level, clamped to the configured zoom range.
    pub fn set_zoom_level(&mut self, zoom_level: f64) -> Result<(), InvalidZoom> {
        self.zoom = Zoom::try_from(zoom_level.clamp(self.min_zoom, self.max_zoom))?;
        Ok(())
    }

    /// Zoom by a scale factor, `2.0` zooming in by one level.
    pub fn zoom_by(&mut self, scale: f64) -> Result<(), InvalidZoom> {
        self.set_zoom_level(self.zoom.offset(scale.log2())?.into())
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Restrict zooming to `[min_zoom, max_zoom]`, within `[0, MAX_ZOOM]`. Current zoom level
    /// is clamped to the new range.
    pub fn set_zoom_range(&mut self, min_zoom: f64, max_zoom: f64) -> Result<(), InvalidZoom> {
        let min_zoom = Zoom::try_from(min_zoom)?;
        let max_zoom = Zoom::try_from(max_zoom)?;
        if min_zoom > max_zoom {
            return Err(InvalidZoom);
        }

        self.min_zoom = min_zoom.into();
        self.max_zoom = max_zoom.into();
        self.set_zoom_level(self.zoom_level())
    }

    /// Clockwise rotation of the map in degrees.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Set heading. Values outside of `[0, 360]` are brought into `[0, 360)`.
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = normalize_heading(heading);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) -> Result<(), Error> {
        if !size.is_valid() {
            return Err(Error::InvalidArgument(
                "viewport size must be positive and finite",
            ));
        }
        self.size = size;
        Ok(())
    }

    /// Location at which azimuthal projections touch the globe. Defaults to the map center.
    pub fn projection_center(&self) -> Location {
        self.projection_center.unwrap_or(self.center)
    }

    pub fn set_projection_center(&mut self, center: Option<Location>) {
        self.projection_center = center;
    }

    /// Center brought into the range the projection can display.
    pub(crate) fn adjusted_center(&self, projection: &Projection) -> Location {
        adjust_center(self.center, projection)
    }

    fn parameters(&self, projection: &Projection, viewport_center: Pixels) -> ViewportParameters {
        let center = self.adjusted_center(projection);
        ViewportParameters {
            projection_center: self.projection_center.unwrap_or(center),
            map_center: center,
            viewport_center,
            zoom_level: self.zoom_level(),
            heading: self.heading,
        }
    }

    /// Projector for the current frame, with the map center in the middle of the viewport.
    pub fn projector(&self, projection: &Projection) -> Result<Projector, Error> {
        Projector::new(projection, &self.parameters(projection, self.size.center()))
    }

    /// Move the map by `translation` pixels, as when it is dragged.
    pub fn translate_map(
        &mut self,
        projection: &Projection,
        translation: Pixels,
    ) -> Result<(), Error> {
        if translation.x() == 0. && translation.y() == 0. {
            return Ok(());
        }

        let mut translation = translation;
        if self.heading != 0. {
            let (sin, cos) = self.heading.to_radians().sin_cos();
            translation = Pixels::new(
                translation.x() * cos + translation.y() * sin,
                translation.y() * cos - translation.x() * sin,
            );
        }

        let projector = self.projector(projection)?;
        let center = projector.translate_location(self.adjusted_center(projection), -translation);
        self.center = adjust_center(center, projection);
        Ok(())
    }

    /// Rotate by `rotation` degrees and scale by `scale` around the `origin` pixel, then move the
    /// map by `translation`, as in a two-finger gesture.
    pub fn transform_map(
        &mut self,
        projection: &Projection,
        origin: Pixels,
        translation: Pixels,
        rotation: f64,
        scale: f64,
    ) -> Result<(), Error> {
        if rotation == 0. && scale == 1. {
            return self.translate_map(projection, translation);
        }

        let anchor = self.projector(projection)?.viewport_point_to_location(origin);

        if rotation != 0. {
            self.heading = ((self.heading + rotation) % 360. + 360.) % 360.;
        }

        if scale != 1. {
            self.zoom_by(scale)?;
        }

        self.fold_anchor(projection, anchor, origin + translation)
    }

    /// Change zoom level keeping the location under the `origin` pixel in place.
    pub fn zoom_map(
        &mut self,
        projection: &Projection,
        origin: Pixels,
        zoom_level: f64,
    ) -> Result<(), Error> {
        let zoom_level = zoom_level.clamp(self.min_zoom, self.max_zoom);
        if zoom_level == self.zoom_level() {
            return Ok(());
        }

        let anchor = self.projector(projection)?.viewport_point_to_location(origin);
        self.set_zoom_level(zoom_level)?;
        self.fold_anchor(projection, anchor, origin)
    }

    /// Recompute the center so that `anchor` is displayed at `viewport_point`.
    fn fold_anchor(
        &mut self,
        projection: &Projection,
        anchor: Location,
        viewport_point: Pixels,
    ) -> Result<(), Error> {
        let mut parameters = self.parameters(projection, viewport_point);
        parameters.map_center = anchor;
        let projector = Projector::new(projection, &parameters)?;

        let center = projector.viewport_point_to_location(self.size.center());
        self.center = adjust_center(center, projection);
        Ok(())
    }

    /// Zoom level and center at which `bbox` fills the viewport, with the map facing north.
    pub fn zoom_to_bounds(
        &self,
        projection: &Projection,
        bbox: &BoundingBox,
    ) -> Result<ViewTarget, Error> {
        if !bbox.has_valid_bounds() {
            return Err(Error::InvalidArgument("bounding box has no valid bounds"));
        }

        let rect = projection.bounding_box_to_rect(bbox);
        let scale0 = 1. / projection.viewport_scale(0.);
        let lon_zoom = (scale0 * self.size.width / rect.width()).log2();
        let lat_zoom = (scale0 * self.size.height / rect.height()).log2();

        Ok(ViewTarget {
            center: projection.point_to_location(rect.center().into()),
            zoom_level: lon_zoom.min(lat_zoom),
            heading: 0.,
        })
    }

    /// Jump to the target, clamping its zoom level to the configured range.
    pub fn apply(&mut self, target: ViewTarget) -> Result<(), InvalidZoom> {
        self.center = target.center;
        self.heading = normalize_heading(target.heading);
        self.set_zoom_level(target.zoom_level)
    }

    /// Longitude travelled by the center since `previous`. More than 180° means the map jumped
    /// across the antimeridian.
    pub fn longitude_offset(&self, previous: &Viewport) -> f64 {
        normalize_longitude(self.center.longitude())
            - normalize_longitude(previous.center.longitude())
    }
}

fn normalize_heading(heading: f64) -> f64 {
    if (0. ..=360.).contains(&heading) {
        heading
    } else {
        (heading % 360. + 360.) % 360.
    }
}

fn adjust_center(center: Location, projection: &Projection) -> Location {
    let max_latitude = projection.max_latitude();
    Location::new(
        center.latitude().clamp(-max_latitude, max_latitude),
        normalize_longitude(center.longitude()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lat_lon;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn viewport() -> Viewport {
        Viewport::new(Size::new(800., 600.)).unwrap()
    }

    #[test]
    fn rejecting_degenerate_sizes() {
        assert!(Viewport::new(Size::new(0., 600.)).is_err());
        assert!(Viewport::new(Size::new(800., f64::NAN)).is_err());
        assert!(Viewport::new(Size::new(-1., 1.)).is_err());
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut viewport = viewport();
        viewport.set_zoom_level(25.).unwrap();
        assert_eq!(19., viewport.zoom_level());
        viewport.set_zoom_level(0.).unwrap();
        assert_eq!(1., viewport.zoom_level());

        viewport.set_zoom_range(0., 20.).unwrap();
        viewport.set_zoom_level(0.).unwrap();
        assert_eq!(0., viewport.zoom_level());
        viewport.set_zoom_range(0., MAX_ZOOM).unwrap();
        viewport.set_zoom_level(30.).unwrap();
        assert_eq!(MAX_ZOOM, viewport.zoom_level());
        assert_eq!(Err(InvalidZoom), viewport.set_zoom_range(0., 22.5));
        assert_eq!(Err(InvalidZoom), viewport.set_zoom_range(5., 4.));
        assert_eq!(Err(InvalidZoom), viewport.set_zoom_level(f64::NAN));
    }

    #[test]
    fn zooming_by_scale() {
        let mut viewport = viewport();
        viewport.set_zoom_level(10.).unwrap();
        viewport.zoom_by(4.).unwrap();
        assert_relative_eq!(12., viewport.zoom_level());
        viewport.zoom_by(0.5).unwrap();
        assert_relative_eq!(11., viewport.zoom_level());
        viewport.zoom_by(1e6).unwrap();
        assert_eq!(19., viewport.zoom_level());
        assert_eq!(Err(InvalidZoom), viewport.zoom_by(f64::NAN));
    }

    #[test]
    fn heading_is_normalized_only_when_out_of_range() {
        let mut viewport = viewport();
        viewport.set_heading(360.);
        assert_eq!(360., viewport.heading());
        viewport.set_heading(-90.);
        assert_eq!(270., viewport.heading());
        viewport.set_heading(725.);
        assert_eq!(5., viewport.heading());
    }

    #[test]
    fn dragging_moves_center_the_opposite_way() {
        let projection = Projection::WebMercator;
        let mut viewport = viewport();
        viewport.set_zoom_level(10.).unwrap();
        viewport.set_center(lat_lon(52., 21.));

        // Dragging the map to the right reveals what is to the west.
        viewport
            .translate_map(&projection, Pixels::new(100., 0.))
            .unwrap();
        assert!(viewport.center().longitude() < 21.);
        assert_abs_diff_eq!(52., viewport.center().latitude(), epsilon = 1e-12);

        // Dragging it back restores the center.
        viewport
            .translate_map(&projection, Pixels::new(-100., 0.))
            .unwrap();
        assert_abs_diff_eq!(21., viewport.center().longitude(), epsilon = 1e-9);
    }

    #[test]
    fn dragging_rotated_map() {
        let projection = Projection::WebMercator;
        let mut viewport = viewport();
        viewport.set_zoom_level(10.).unwrap();
        viewport.set_heading(90.);

        // With the map turned by 90°, dragging to the right reveals what is to the south.
        viewport
            .translate_map(&projection, Pixels::new(100., 0.))
            .unwrap();
        assert!(viewport.center().latitude() < 0.);
        assert_abs_diff_eq!(0., viewport.center().longitude(), epsilon = 1e-9);
    }

    #[test]
    fn center_is_kept_within_projection() {
        let projection = Projection::WebMercator;
        let mut viewport = viewport();
        viewport.set_zoom_level(1.).unwrap();
        viewport.set_center(lat_lon(80., 179.));

        viewport
            .translate_map(&projection, Pixels::new(-100., 100.))
            .unwrap();

        assert_eq!(projection.max_latitude(), viewport.center().latitude());
        assert!((-180. ..0.).contains(&viewport.center().longitude()));
    }

    #[test]
    fn zooming_around_pixel_keeps_it_in_place() {
        let projection = Projection::WebMercator;
        let mut viewport = viewport();
        viewport.set_zoom_level(10.).unwrap();
        viewport.set_center(lat_lon(52., 21.));

        let origin = Pixels::new(700., 100.);
        let before = viewport
            .projector(&projection)
            .unwrap()
            .viewport_point_to_location(origin);

        viewport.zoom_map(&projection, origin, 12.).unwrap();
        assert_eq!(12., viewport.zoom_level());

        let after = viewport
            .projector(&projection)
            .unwrap()
            .viewport_point_to_location(origin);
        assert_abs_diff_eq!(before.latitude(), after.latitude(), epsilon = 1e-9);
        assert_abs_diff_eq!(before.longitude(), after.longitude(), epsilon = 1e-9);
    }

    #[test]
    fn rotating_around_pixel() {
        let projection = Projection::WebMercator;
        let mut viewport = viewport();
        viewport.set_zoom_level(10.).unwrap();

        let origin = Pixels::new(400., 300.);
        viewport
            .transform_map(&projection, origin, Pixels::new(0., 0.), -30., 2.)
            .unwrap();

        assert_eq!(330., viewport.heading());
        assert_relative_eq!(11., viewport.zoom_level());
        // Rotating around the center does not move it.
        assert_abs_diff_eq!(0., viewport.center().latitude(), epsilon = 1e-9);
        assert_abs_diff_eq!(0., viewport.center().longitude(), epsilon = 1e-9);
    }

    #[test]
    fn zooming_to_bounds() {
        let projection = Projection::WebMercator;
        let mut viewport = Viewport::new(Size::new(256., 256.)).unwrap();
        viewport.set_heading(45.);

        let world = BoundingBox::new(
            projection.max_latitude(),
            180.,
            -projection.max_latitude(),
            -180.,
        );
        let target = viewport.zoom_to_bounds(&projection, &world).unwrap();
        assert_abs_diff_eq!(0., target.zoom_level, epsilon = 1e-9);
        assert_abs_diff_eq!(0., target.center.latitude(), epsilon = 1e-9);
        assert_eq!(0., target.heading);

        viewport.set_zoom_range(0., 20.).unwrap();
        viewport.apply(target).unwrap();
        assert_eq!(0., viewport.heading());

        assert_eq!(
            Err(Error::InvalidArgument("bounding box has no valid bounds")),
            viewport.zoom_to_bounds(&projection, &BoundingBox::new(10., 20., 30., 5.))
        );
    }

    #[test]
    fn longitude_offset_reveals_antimeridian_jumps() {
        let mut previous = viewport();
        previous.set_center(lat_lon(0., 179.));
        let mut current = previous.clone();
        current.set_center(lat_lon(0., -179.));

        assert_eq!(-358., current.longitude_offset(&previous));
    }
}
