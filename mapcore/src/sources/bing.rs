use super::{Attribution, Subdomains, TileSource, quad_key};
use crate::TileId;

/// Bing Maps imagery, addressed by quad keys.
///
/// The URI format and subdomains come from the imagery metadata service, for example
/// `https://ecn.{subdomain}.tiles.virtualearth.net/tiles/a{quadkey}.jpeg?g=0&mkt={culture}`.
#[derive(Debug, Clone)]
pub struct BingMaps {
    uri_format: String,
    subdomains: Subdomains,
}

impl BingMaps {
    /// `{culture}` is substituted right away, `{subdomain}` and `{quadkey}` for every tile.
    pub fn new(uri_format: &str, subdomains: Subdomains, culture: &str) -> Self {
        Self {
            uri_format: uri_format.replace("{culture}", culture),
            subdomains,
        }
    }
}

impl TileSource for BingMaps {
    fn tile_url(&self, tile_id: TileId) -> Option<String> {
        if tile_id.zoom < 1 || self.subdomains.is_empty() {
            return None;
        }

        let index = (tile_id.x as i64 + tile_id.y as i64).rem_euclid(self.subdomains.len() as i64);
        let subdomain = self.subdomains.get(index as usize)?;

        Some(
            self.uri_format
                .replace("{subdomain}", subdomain)
                .replace("{quadkey}", &quad_key(tile_id.x, tile_id.y, tile_id.zoom)),
        )
    }

    fn attribution(&self) -> Option<Attribution> {
        Some(Attribution {
            text: "Microsoft Bing Maps",
            url: "https://www.microsoft.com/maps/product/terms.html",
        })
    }

    fn max_zoom(&self) -> u8 {
        21
    }
}
