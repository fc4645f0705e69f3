use std::fmt;
use std::str::FromStr;

use geo_types::{Coord, Rect};

use crate::azimuthal::AzimuthalKind;
use crate::mercator::{
    METERS_PER_DEGREE, degrees_to_viewport_scale, web_latitude_to_y, web_y_to_latitude,
    world_latitude_to_y, world_y_to_latitude, yandex_location_to_point, yandex_point_to_location,
};
use crate::{BoundingBox, Error, Location, Pixels, lat_lon};

/// Map projection, mapping geographical locations onto a plane.
///
/// Cylindrical projections produce points in meters, except [`Projection::Equirectangular`], whose
/// plane coordinates are plain degrees. Azimuthal projections carry the location at which the
/// plane touches the globe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum Projection {
    /// `EPSG:4326`, longitude and latitude used directly as plane coordinates.
    Equirectangular,

    /// `EPSG:3857`, spherical Mercator used by most tile servers.
    #[default]
    WebMercator,

    /// `EPSG:3395`, Mercator on the WGS 84 ellipsoid.
    WorldMercator,

    /// Ellipsoidal Mercator in the flavour used by Yandex tiles.
    Yandex,

    Azimuthal(AzimuthalKind, Location),
}

impl Projection {
    pub fn location_to_point(&self, location: Location) -> Pixels {
        match self {
            Projection::Equirectangular => Pixels::new(location.longitude(), location.latitude()),
            Projection::WebMercator => Pixels::new(
                METERS_PER_DEGREE * location.longitude(),
                METERS_PER_DEGREE * web_latitude_to_y(location.latitude()),
            ),
            Projection::WorldMercator => Pixels::new(
                METERS_PER_DEGREE * location.longitude(),
                METERS_PER_DEGREE * world_latitude_to_y(location.latitude()),
            ),
            Projection::Yandex => yandex_location_to_point(location),
            Projection::Azimuthal(kind, center) => kind.location_to_point(*center, location),
        }
    }

    pub fn point_to_location(&self, point: Pixels) -> Location {
        match self {
            Projection::Equirectangular => lat_lon(point.y(), point.x()),
            Projection::WebMercator => lat_lon(
                web_y_to_latitude(point.y() / METERS_PER_DEGREE),
                point.x() / METERS_PER_DEGREE,
            ),
            Projection::WorldMercator => lat_lon(
                world_y_to_latitude(point.y() / METERS_PER_DEGREE),
                point.x() / METERS_PER_DEGREE,
            ),
            Projection::Yandex => yandex_point_to_location(point),
            Projection::Azimuthal(kind, center) => kind.point_to_location(*center, point),
        }
    }

    /// Pixels per plane unit at the given zoom level.
    pub fn viewport_scale(&self, zoom_level: f64) -> f64 {
        match self {
            Projection::Equirectangular => degrees_to_viewport_scale(zoom_level),
            _ => degrees_to_viewport_scale(zoom_level) / METERS_PER_DEGREE,
        }
    }

    /// Pixels per meter along the x and y axes at `location`.
    pub fn map_scale(&self, location: Location, viewport_scale: f64) -> (f64, f64) {
        let cos = location.latitude().to_radians().cos();
        match self {
            Projection::Equirectangular => (
                viewport_scale / (METERS_PER_DEGREE * cos),
                viewport_scale / METERS_PER_DEGREE,
            ),
            Projection::WebMercator | Projection::WorldMercator | Projection::Yandex => {
                (viewport_scale / cos, viewport_scale / cos)
            }
            Projection::Azimuthal(..) => (viewport_scale, viewport_scale),
        }
    }

    /// Move `location` by `translation` given in viewport pixels (y pointing down).
    pub fn translate_location(
        &self,
        location: Location,
        translation: Pixels,
        viewport_scale: f64,
    ) -> Location {
        let cos = location.latitude().to_radians().cos();
        let (scale_x, scale_y) = match self {
            Projection::Equirectangular => (viewport_scale, viewport_scale),
            Projection::WebMercator | Projection::WorldMercator | Projection::Yandex => {
                let scale_x = METERS_PER_DEGREE * viewport_scale;
                (scale_x, scale_x / cos)
            }
            Projection::Azimuthal(..) => {
                let scale_y = viewport_scale * METERS_PER_DEGREE;
                (scale_y * cos, scale_y)
            }
        };

        lat_lon(
            location.latitude() - translation.y() / scale_y,
            location.longitude() + translation.x() / scale_x,
        )
    }

    /// Rectangle on the projection plane covering the bounding box. For azimuthal projections the
    /// box's width and height are taken as plane spans in meters.
    pub fn bounding_box_to_rect(&self, bbox: &BoundingBox) -> Rect {
        if self.is_azimuthal() {
            let center = self.location_to_point(bbox.center());
            let (w2, h2) = (bbox.width() / 2., bbox.height() / 2.);
            Rect::new(
                Coord {
                    x: center.x() - w2,
                    y: center.y() - h2,
                },
                Coord {
                    x: center.x() + w2,
                    y: center.y() + h2,
                },
            )
        } else {
            let south_west = self.location_to_point(lat_lon(bbox.south, bbox.west));
            let north_east = self.location_to_point(lat_lon(bbox.north, bbox.east));
            Rect::new(south_west.0, north_east.0)
        }
    }

    pub fn rect_to_bounding_box(&self, rect: &Rect) -> BoundingBox {
        if self.is_azimuthal() {
            let center = self.point_to_location(rect.center().into());
            BoundingBox::with_plane_span(center, rect.width(), rect.height())
        } else {
            let south_west = self.point_to_location(rect.min().into());
            let north_east = self.point_to_location(rect.max().into());
            BoundingBox::new(
                north_east.latitude(),
                north_east.longitude(),
                south_west.latitude(),
                south_west.longitude(),
            )
        }
    }

    /// Same projection touching the globe at `center`. Cylindrical projections are returned
    /// unchanged.
    #[must_use]
    pub fn with_center(&self, center: Location) -> Self {
        match self {
            Projection::Azimuthal(kind, _) => Projection::Azimuthal(*kind, center),
            other => *other,
        }
    }

    pub fn center(&self) -> Option<Location> {
        match self {
            Projection::Azimuthal(_, center) => Some(*center),
            _ => None,
        }
    }

    pub fn is_azimuthal(&self) -> bool {
        matches!(self, Projection::Azimuthal(..))
    }

    /// Whether the projection can display standard 256px Mercator tiles.
    pub fn is_web_mercator(&self) -> bool {
        matches!(
            self,
            Projection::WebMercator | Projection::WorldMercator | Projection::Yandex
        )
    }

    /// Highest latitude that can be placed in the viewport center.
    pub fn max_latitude(&self) -> f64 {
        match self {
            Projection::WebMercator => web_y_to_latitude(180.),
            Projection::WorldMercator | Projection::Yandex => world_y_to_latitude(180.),
            _ => 90.,
        }
    }

    /// Plane units per degree of longitude. NaN for azimuthal projections, where it varies.
    pub fn longitude_scale(&self) -> f64 {
        match self {
            Projection::Equirectangular => 1.,
            Projection::Azimuthal(..) => f64::NAN,
            _ => METERS_PER_DEGREE,
        }
    }

    pub fn crs_id(&self) -> Option<&'static str> {
        match self {
            Projection::Equirectangular => Some("EPSG:4326"),
            Projection::WebMercator => Some("EPSG:3857"),
            Projection::WorldMercator => Some("EPSG:3395"),
            Projection::Yandex => Some("Yandex"),
            Projection::Azimuthal(kind, _) => kind.crs_id(),
        }
    }

    /// Query parameters of a WMS `GetMap` request covering `bbox` at the given viewport scale.
    /// `None` if the projection has no CRS identifier.
    pub fn wms_query_parameters(
        &self,
        bbox: &BoundingBox,
        version: &str,
        viewport_scale: f64,
    ) -> Option<String> {
        let crs_id = self.crs_id()?;
        let rect = self.bounding_box_to_rect(bbox);
        let width = (viewport_scale * rect.width()).round() as i32;
        let height = (viewport_scale * rect.height()).round() as i32;
        let (x1, y1, x2, y2) = (rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        let crs = if version.starts_with("1.1.") {
            "SRS"
        } else {
            "CRS"
        };

        Some(match self {
            Projection::Azimuthal(_, center) => format!(
                "{crs}={crs_id},1,{},{}&BBOX={x1},{y1},{x2},{y2}&WIDTH={width}&HEIGHT={height}",
                center.longitude(),
                center.latitude(),
            ),
            // WMS 1.3 uses latitude-first axis order for geographic coordinate systems.
            _ if crs == "CRS" && crs_id == "EPSG:4326" => {
                format!("CRS={crs_id}&BBOX={y1},{x1},{y2},{x2}&WIDTH={width}&HEIGHT={height}")
            }
            _ => format!("{crs}={crs_id}&BBOX={x1},{y1},{x2},{y2}&WIDTH={width}&HEIGHT={height}"),
        })
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Equirectangular => f.write_str("EPSG:4326"),
            Projection::WebMercator => f.write_str("EPSG:3857"),
            Projection::WorldMercator => f.write_str("EPSG:3395"),
            Projection::Yandex => f.write_str("Yandex"),
            Projection::Azimuthal(kind, _) => f.write_str(kind.name()),
        }
    }
}

impl FromStr for Projection {
    type Err = Error;

    /// Parse projection by its EPSG code, WMS identifier or common name. Azimuthal projections
    /// are centered at 0,0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let azimuthal = |kind| Ok(Projection::Azimuthal(kind, Location::ORIGIN));

        match s.trim().to_lowercase().as_str() {
            "3857" | "epsg:3857" | "web" | "webmercator" | "mercator" => {
                Ok(Projection::WebMercator)
            }
            "3395" | "epsg:3395" | "world" | "worldmercator" => Ok(Projection::WorldMercator),
            "4326" | "epsg:4326" | "equirectangular" => Ok(Projection::Equirectangular),
            "yandex" | "яндекс" => Ok(Projection::Yandex),
            "equidistant" | "azimuthalequidistant" => azimuthal(AzimuthalKind::Equidistant),
            "auto2:97001" | "gnomonic" => azimuthal(AzimuthalKind::Gnomonic),
            "auto2:42003" | "orthographic" => azimuthal(AzimuthalKind::Orthographic),
            "auto2:97002" | "stereographic" => azimuthal(AzimuthalKind::Stereographic),
            _ => Err(Error::UnknownProjection(s.to_owned())),
        }
    }
}
