//! Locations of the pixels of a single tile, for drawing tiles procedurally.

use crate::{Error, Location, TileId, lat_lon};

/// Geographical extent of a square tile image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TileInfo {
    /// South-west corner.
    pub min_location: Location,

    /// North-east corner.
    pub max_location: Location,

    /// Width and height of the image. At least 2, as both corners are pixels of the image.
    pixel_size: u32,
}

impl TileInfo {
    pub fn new(
        min_location: Location,
        max_location: Location,
        pixel_size: u32,
    ) -> Result<Self, Error> {
        if pixel_size < 2 {
            return Err(Error::InvalidArgument("tile must be at least 2 pixels wide"));
        }

        Ok(Self {
            min_location,
            max_location,
            pixel_size,
        })
    }

    /// Extent of a Web Mercator tile. Pixels are spaced evenly in latitude, not in Mercator `y`.
    pub fn for_tile(tile: TileId, pixel_size: u32) -> Result<Self, Error> {
        let bbox = tile.bounding_box();
        Self::new(
            lat_lon(bbox.south, bbox.west),
            lat_lon(bbox.north, bbox.east),
            pixel_size,
        )
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Location of the pixel. Row 0 is the northern edge, column 0 the western one.
    pub fn location(&self, x: u32, y: u32) -> Location {
        let last = (self.pixel_size - 1) as f64;
        let (min, max) = (self.min_location, self.max_location);

        lat_lon(
            max.latitude() - (max.latitude() - min.latitude()) * y as f64 / last,
            min.longitude() + (max.longitude() - min.longitude()) * x as f64 / last,
        )
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> TilePixels {
        TilePixels {
            info: *self,
            index: 0,
        }
    }
}

impl IntoIterator for &TileInfo {
    type Item = PixelPosition;
    type IntoIter = TilePixels;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPosition {
    pub x: u32,
    pub y: u32,
    pub location: Location,
}

/// Iterator returned by [`TileInfo::pixels`].
#[derive(Debug, Clone)]
pub struct TilePixels {
    info: TileInfo,
    index: u64,
}

impl TilePixels {
    fn len_total(&self) -> u64 {
        let size = self.info.pixel_size as u64;
        size * size
    }
}

impl Iterator for TilePixels {
    type Item = PixelPosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len_total() {
            return None;
        }

        let size = self.info.pixel_size as u64;
        let x = (self.index % size) as u32;
        let y = (self.index / size) as u32;
        self.index += 1;

        Some(PixelPosition {
            x,
            y,
            location: self.info.location(x, y),
        })
    }

    /// Exact, unless the count does not fit in `usize`.
    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.len_total() - self.index) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for TilePixels {}

impl std::iter::FusedIterator for TilePixels {}
