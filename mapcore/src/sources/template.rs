use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Attribution, TileSource};
use crate::mercator::TILE_SIZE;
use crate::{BoundingBox, Error, TileId};

/// Bing Maps style quad key of a tile: one base-4 digit per zoom level, most significant first.
/// Empty at zoom 0.
pub fn quad_key(x: i32, y: i32, zoom: u8) -> String {
    let mut key = vec![b'0'; zoom as usize];
    let (mut x, mut y) = (x, y);

    for digit in key.iter_mut().rev() {
        *digit = b'0' + (2 * (y & 1) + (x & 1)) as u8;
        x >>= 1;
        y >>= 1;
    }

    key.into_iter().map(char::from).collect()
}

/// Server names substituted for `{c}`, so that requests spread over several hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Subdomains(Vec<String>);

impl Subdomains {
    pub fn new<I, S>(subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(subdomains.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl Default for Subdomains {
    fn default() -> Self {
        Self::new(["a", "b", "c"])
    }
}

impl FromStr for Subdomains {
    type Err = Error;

    /// Parse a list like `a,b,c`, `a; b` or `a b c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let subdomains = Self::new(
            s.split([',', ';', ' '])
                .filter(|subdomain| !subdomain.is_empty()),
        );

        if subdomains.is_empty() {
            Err(Error::format("subdomains", s))
        } else {
            Ok(subdomains)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Addressing {
    /// `{x}`, `{y}`, `{z}`.
    Xyz,

    /// Like [`Addressing::Xyz`], with `{i}` set to 1.
    Indexed,

    /// Rows counted from the bottom, in `{v}`.
    Tms,

    /// `{q}` and its last digit in `{i}`.
    QuadKey,

    /// `{W}`, `{S}`, `{E}`, `{N}` in Web Mercator meters.
    ProjectedBounds,

    /// `{w}`, `{s}`, `{e}`, `{n}` in degrees.
    GeographicBounds,
}

impl Addressing {
    fn of(format: &str) -> Option<Self> {
        let has = |placeholders: &[&str]| placeholders.iter().all(|p| format.contains(p));

        if !has(&["{x}", "{z}"]) {
            None
        } else if format.contains("yandex") {
            Some(Self::Xyz)
        } else if has(&["{i}"]) {
            Some(Self::Indexed)
        } else if has(&["{y}"]) {
            Some(Self::Xyz)
        } else if has(&["{v}"]) {
            Some(Self::Tms)
        } else if has(&["{q}"]) {
            Some(Self::QuadKey)
        } else if has(&["{W}", "{S}", "{E}", "{N}"]) {
            Some(Self::ProjectedBounds)
        } else if has(&["{w}", "{s}", "{e}", "{n}"]) {
            Some(Self::GeographicBounds)
        } else {
            None
        }
    }
}

fn replace_bounds(format: &str, placeholders: [&str; 4], bounds: &BoundingBox) -> String {
    let [west, south, east, north] = placeholders;
    let tile_size = TILE_SIZE.to_string();

    format
        .replace(west, &bounds.west.to_string())
        .replace(south, &bounds.south.to_string())
        .replace(east, &bounds.east.to_string())
        .replace(north, &bounds.north.to_string())
        .replace("{X}", &tile_size)
        .replace("{Y}", &tile_size)
}

/// Tile source defined by a URL template, such as
/// `https://{c}.tile.openstreetmap.org/{z}/{x}/{y}.png`.
///
/// The placeholders found in the template decide how tiles are addressed:
/// XYZ, TMS (`{v}`), quad keys (`{q}`) or bounding boxes (`{W}{S}{E}{N}` in meters,
/// `{w}{s}{e}{n}` in degrees). `{c}` is replaced by the next of [`Subdomains`].
#[derive(Debug)]
pub struct UriTemplate {
    format: String,
    addressing: Option<Addressing>,
    subdomains: Option<Subdomains>,
    next_subdomain: AtomicUsize,
    max_zoom: u8,
    attribution: Option<Attribution>,
}

impl UriTemplate {
    pub fn new(format: &str) -> Result<Self, Error> {
        if format.trim().is_empty() {
            return Err(Error::InvalidArgument("URI template must not be empty"));
        }
        Ok(Self::classify(format))
    }

    pub(crate) fn classify(format: &str) -> Self {
        let addressing = Addressing::of(format);
        if addressing.is_none() {
            log::warn!("Unsupported URI template '{format}', it will not produce any tile URLs.");
        }

        Self {
            format: format.to_owned(),
            addressing,
            subdomains: format.contains("{c}").then(Subdomains::default),
            next_subdomain: AtomicUsize::new(0),
            max_zoom: 19,
            attribution: None,
        }
    }

    pub fn with_subdomains(mut self, subdomains: Subdomains) -> Self {
        self.subdomains = Some(subdomains);
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = Some(attribution);
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    fn fill(&self, addressing: Addressing, tile_id: TileId) -> Option<String> {
        let TileId { zoom, x, y } = tile_id;
        let format = &self.format;

        let xyz = |format: &str| {
            format
                .replace("{x}", &x.to_string())
                .replace("{y}", &y.to_string())
                .replace("{z}", &zoom.to_string())
        };

        Some(match addressing {
            Addressing::Xyz => xyz(format),
            Addressing::Indexed => xyz(&format.replace("{i}", "1")),
            Addressing::Tms => {
                let row = (1i64 << zoom) - 1 - y as i64;
                format
                    .replace("{x}", &x.to_string())
                    .replace("{v}", &row.to_string())
                    .replace("{z}", &zoom.to_string())
            }
            Addressing::QuadKey => {
                if zoom < 1 {
                    return None;
                }
                let key = quad_key(x, y, zoom);
                format
                    .replace("{i}", &key[key.len() - 1..])
                    .replace("{q}", &key)
            }
            Addressing::ProjectedBounds => {
                replace_bounds(format, ["{W}", "{S}", "{E}", "{N}"], &tile_id.projected_bounds())
            }
            Addressing::GeographicBounds => {
                replace_bounds(format, ["{w}", "{s}", "{e}", "{n}"], &tile_id.bounding_box())
            }
        })
    }

    fn next_subdomain(&self) -> Option<&str> {
        let subdomains = self.subdomains.as_ref().filter(|s| !s.is_empty())?;
        let index = self.next_subdomain.fetch_add(1, Ordering::Relaxed);
        subdomains.get(index % subdomains.len())
    }
}

impl FromStr for UriTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TileSource for UriTemplate {
    fn tile_url(&self, tile_id: TileId) -> Option<String> {
        let url = self.fill(self.addressing?, tile_id)?;

        if !url.contains("{c}") {
            return Some(url);
        }

        match self.next_subdomain() {
            Some(subdomain) => Some(url.replace("{c}", subdomain)),
            None => Some(url),
        }
    }

    fn attribution(&self) -> Option<Attribution> {
        self.attribution.clone()
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}
