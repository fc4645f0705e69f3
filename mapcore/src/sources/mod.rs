//! Tile sources, which turn tile coordinates into the URLs of their images. Make sure you follow
//! terms of usage of the particular source.

mod bing;
mod openstreetmap;
mod template;

use crate::TileId;
pub use bing::BingMaps;
pub use openstreetmap::OpenStreetMap;
pub use template::{Subdomains, UriTemplate, quad_key};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub text: &'static str,
    pub url: &'static str,
}

/// Remote tile server definition, source for the [`crate::TileLayer`].
pub trait TileSource {
    /// URL of the tile image, or `None` if the source has no image for this tile.
    ///
    /// `tile_id.x` is expected to be wrapped already, see [`TileId::wrapped`].
    fn tile_url(&self, tile_id: TileId) -> Option<String>;

    fn attribution(&self) -> Option<Attribution> {
        None
    }

    fn max_zoom(&self) -> u8 {
        19
    }
}
