#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

pub mod azimuthal;
mod bounding_box;
pub mod cache;
mod error;
pub mod graticule;
mod layer;
mod location;
pub mod matrix;
pub mod mercator;
pub mod pixels;
mod projection;
mod projector;
pub mod scale_bar;
pub mod sources;
mod tiles;
mod viewport;
pub mod wms;
mod zoom;

/// Point on the projection plane or in the viewport, depending on the context.
pub type Pixels = geo_types::Point;

pub use bounding_box::BoundingBox;
pub use error::Error;
pub use layer::{TileLayer, TileLayerOptions, TileRequest};
pub use location::{
    Location, lat_lon, lon_lat, nearest_longitude, normalize_longitude, parse_locations,
};
pub use projection::Projection;
pub use projector::{Projector, ViewportParameters, ViewportTransform};
pub use tiles::{MAX_TILE_ZOOM, TileGrid, TileId};
pub use viewport::{Size, ViewTarget, Viewport};
pub use zoom::{InvalidZoom, MAX_ZOOM, Zoom};
