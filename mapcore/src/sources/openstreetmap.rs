use super::{Attribution, TileSource, UriTemplate};
use crate::TileId;

const URI_FORMAT: &str = "http://{c}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// <https://www.openstreetmap.org/about>
#[derive(Debug)]
pub struct OpenStreetMap {
    template: UriTemplate,
}

impl OpenStreetMap {
    pub fn new() -> Self {
        Self {
            template: UriTemplate::classify(URI_FORMAT),
        }
    }
}

impl Default for OpenStreetMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMap {
    fn tile_url(&self, tile_id: TileId) -> Option<String> {
        self.template.tile_url(tile_id)
    }

    fn attribution(&self) -> Option<Attribution> {
        Some(Attribution {
            text: "OpenStreetMap contributors",
            url: "https://www.openstreetmap.org/copyright",
        })
    }

    fn max_zoom(&self) -> u8 {
        19
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomains_rotate() {
        let source = OpenStreetMap::new();
        let urls: Vec<_> = (0..4)
            .filter_map(|_| source.tile_url(TileId::new(3, 4, 2)))
            .collect();

        assert_eq!(
            vec![
                "http://a.tile.openstreetmap.org/3/4/2.png",
                "http://b.tile.openstreetmap.org/3/4/2.png",
                "http://c.tile.openstreetmap.org/3/4/2.png",
                "http://a.tile.openstreetmap.org/3/4/2.png",
            ],
            urls
        );
    }
}
