use geo_types::Rect;

use crate::matrix::{Matrix, translate_scale_rotate_translate};
use crate::{BoundingBox, Error, Location, Pixels, Projection};

/// Everything needed to place the projection plane on the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ViewportParameters {
    /// Location at which azimuthal projections touch the globe. Ignored by cylindrical ones.
    pub projection_center: Location,

    /// Location displayed at `viewport_center`.
    pub map_center: Location,

    /// Pixel in the viewport, usually the middle of it.
    pub viewport_center: Pixels,

    pub zoom_level: f64,

    /// Clockwise rotation of the map, in degrees.
    pub heading: f64,
}

/// Affine transformation from the projection plane to viewport pixels, along with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Pixels per plane unit.
    pub scale: f64,
    pub matrix: Matrix,
    pub inverse: Matrix,
}

impl ViewportTransform {
    fn new(projection: &Projection, parameters: &ViewportParameters) -> Result<Self, Error> {
        let scale = projection.viewport_scale(parameters.zoom_level);
        let center = projection.location_to_point(parameters.map_center);

        let matrix = translate_scale_rotate_translate(
            -center.x(),
            -center.y(),
            scale,
            -scale,
            parameters.heading,
            parameters.viewport_center.x(),
            parameters.viewport_center.y(),
        );

        if !matrix.is_finite() {
            log::warn!("Rejecting non-finite viewport transform for {parameters:?}.");
            return Err(Error::InvalidArgument("viewport transform is not finite"));
        }

        let Some(inverse) = matrix.invert() else {
            log::warn!("Rejecting non-invertible viewport transform for {parameters:?}.");
            return Err(Error::InvalidArgument("viewport transform is not invertible"));
        };

        Ok(Self {
            scale,
            matrix,
            inverse,
        })
    }
}

/// Projects geographical locations into pixels on the viewport and back.
///
/// A projector is a snapshot: it is built from the projection and the viewport parameters of a
/// single frame and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    projection: Projection,
    transform: ViewportTransform,
}

impl Projector {
    /// Re-anchor azimuthal projections at `parameters.projection_center` and compute the viewport
    /// transform. Fails if the parameters do not produce an invertible transform, for example
    /// with an infinite map center.
    pub fn new(projection: &Projection, parameters: &ViewportParameters) -> Result<Self, Error> {
        let projection = projection.with_center(parameters.projection_center);
        let transform = ViewportTransform::new(&projection, parameters)?;
        Ok(Self {
            projection,
            transform,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn viewport_scale(&self) -> f64 {
        self.transform.scale
    }

    /// Project `location` into pixels on the viewport.
    pub fn location_to_viewport_point(&self, location: Location) -> Pixels {
        self.transform
            .matrix
            .transform(self.projection.location_to_point(location))
    }

    /// Get the location displayed at the given viewport pixel.
    pub fn viewport_point_to_location(&self, point: Pixels) -> Location {
        self.projection
            .point_to_location(self.transform.inverse.transform(point))
    }

    /// Geographical area visible in the viewport rectangle. For rotated maps this is the bounding
    /// box of the rotated rectangle.
    pub fn viewport_rect_to_bounding_box(&self, rect: Rect) -> BoundingBox {
        self.projection
            .rect_to_bounding_box(&self.transform.inverse.transform_bounds(rect))
    }

    /// Pixels per meter along both axes at `location`.
    pub fn map_scale(&self, location: Location) -> (f64, f64) {
        self.projection.map_scale(location, self.transform.scale)
    }

    /// What is the local scale of the map at the provided location given the current zoom level?
    pub fn scale_pixel_per_meter(&self, location: Location) -> f64 {
        self.map_scale(location).0
    }

    /// Location displayed `translation` pixels away from `location`.
    pub fn translate_location(&self, location: Location, translation: Pixels) -> Location {
        self.projection
            .translate_location(location, translation, self.transform.scale)
    }

    /// Projection part of a WMS `GetMap` query for the bounding box at the current scale.
    pub fn wms_query_parameters(&self, bbox: &BoundingBox, version: &str) -> Option<String> {
        self.projection
            .wms_query_parameters(bbox, version, self.transform.scale)
    }
}
