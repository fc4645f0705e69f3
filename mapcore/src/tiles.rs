//! Web Mercator tile addressing and the grid of tiles covering a viewport.
//! <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>

use geo_types::{Coord, Rect};

use crate::matrix::{Matrix, translate_scale_rotate_translate};
use crate::mercator::{
    METERS_PER_DEGREE, TILE_SIZE, total_pixels, web_latitude_to_y, web_y_to_latitude,
};
use crate::viewport::Size;
use crate::{BoundingBox, Error, Location};

/// Deepest tile level the grid can address. `2^30` tiles still fit the `i32` coordinates.
pub const MAX_TILE_ZOOM: i32 = 30;

/// Coordinates of the OSM-like tile.
///
/// `x` is not wrapped, so a map scrolled across the antimeridian keeps increasing (or decreasing)
/// it. Use [`TileId::x_index`] to address the tile server.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TileId {
    /// Zoom level, where 0 means no zoom.
    /// See: <https://wiki.openstreetmap.org/wiki/Zoom_levels>
    pub zoom: u8,

    /// X number of the tile.
    pub x: i32,

    /// Y number of the tile.
    pub y: i32,
}

impl TileId {
    pub fn new(zoom: u8, x: i32, y: i32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along each axis at this zoom level.
    fn tiles_per_axis(&self) -> i64 {
        1i64 << self.zoom
    }

    /// `x` wrapped into `[0, 2^zoom)`.
    pub fn x_index(&self) -> i32 {
        let n = self.tiles_per_axis();
        (((self.x as i64 % n) + n) % n) as i32
    }

    /// Same tile with `x` replaced by [`TileId::x_index`].
    pub fn wrapped(&self) -> TileId {
        TileId {
            x: self.x_index(),
            ..*self
        }
    }

    /// Tile size in degrees of longitude, which is also its height in Web Mercator `y` units.
    fn size_in_degrees(&self) -> f64 {
        360. / self.tiles_per_axis() as f64
    }

    /// Geographical area covered by the tile.
    pub fn bounding_box(&self) -> BoundingBox {
        let size = self.size_in_degrees();
        let (x, y) = (self.x as f64, self.y as f64);

        BoundingBox::new(
            web_y_to_latitude(180. - y * size),
            (x + 1.) * size - 180.,
            web_y_to_latitude(180. - (y + 1.) * size),
            x * size - 180.,
        )
    }

    /// Area covered by the tile in Web Mercator meters.
    pub fn projected_bounds(&self) -> BoundingBox {
        let size = self.size_in_degrees();
        let (x, y) = (self.x as f64, self.y as f64);

        BoundingBox {
            north: METERS_PER_DEGREE * (180. - y * size),
            east: METERS_PER_DEGREE * ((x + 1.) * size - 180.),
            south: METERS_PER_DEGREE * (180. - (y + 1.) * size),
            west: METERS_PER_DEGREE * (x * size - 180.),
        }
    }
}

/// Tiles center in tile units at the given tile zoom level.
fn tile_center(center: Location, tile_scale: f64) -> (f64, f64) {
    (
        tile_scale * (0.5 + center.longitude() / 360.),
        tile_scale * (0.5 - web_latitude_to_y(center.latitude()) / 360.),
    )
}

/// Rectangle of tiles, all at the same zoom level, covering the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TileGrid {
    pub zoom_level: i32,
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl TileGrid {
    /// Grid of tiles visible in a viewport of `viewport_size` pixels centered at `center`.
    ///
    /// Tiles are taken from the level closest to `zoom_level + zoom_level_offset`. A rotated
    /// viewport gets the grid covering all four of its corners.
    pub fn compute(
        center: Location,
        zoom_level: f64,
        zoom_level_offset: f64,
        heading: f64,
        viewport_size: Size,
    ) -> Result<TileGrid, Error> {
        if !viewport_size.is_valid() {
            return Err(Error::InvalidArgument(
                "viewport size must be positive and finite",
            ));
        }

        let tile_zoom_level = (zoom_level + zoom_level_offset).round().max(0.);
        if tile_zoom_level.is_nan() || tile_zoom_level > MAX_TILE_ZOOM as f64 {
            return Err(Error::InvalidArgument("tile zoom level is too deep"));
        }
        let tile_zoom_level = tile_zoom_level as i32;

        let tile_scale = (1i64 << tile_zoom_level) as f64;
        let scale = tile_scale / total_pixels(zoom_level);
        let (tile_center_x, tile_center_y) = tile_center(center, tile_scale);
        let view_center = viewport_size.center();

        let transform = translate_scale_rotate_translate(
            -view_center.x(),
            -view_center.y(),
            scale,
            scale,
            -heading,
            tile_center_x,
            tile_center_y,
        );

        let bounds = transform.transform_bounds(Rect::new(
            Coord { x: 0., y: 0. },
            Coord {
                x: viewport_size.width,
                y: viewport_size.height,
            },
        ));

        let grid = TileGrid {
            zoom_level: tile_zoom_level,
            x_min: bounds.min().x.floor() as i32,
            y_min: bounds.min().y.floor() as i32,
            x_max: bounds.max().x.floor() as i32,
            y_max: bounds.max().y.floor() as i32,
        };

        log::trace!("Tile grid for {center} at zoom {zoom_level}: {grid:?}.");
        Ok(grid)
    }

    /// Transformation from the layer coordinates of [`TileGrid::tile_rect`] to viewport pixels.
    pub fn render_transform(
        &self,
        center: Location,
        zoom_level: f64,
        heading: f64,
        viewport_size: Size,
    ) -> Matrix {
        let tile_scale = (1i64 << self.zoom_level) as f64;
        let scale = 2f64.powf(zoom_level) / tile_scale;
        let (tile_center_x, tile_center_y) = tile_center(center, tile_scale);
        let tile_origin_x = TILE_SIZE as f64 * (tile_center_x - self.x_min as f64);
        let tile_origin_y = TILE_SIZE as f64 * (tile_center_y - self.y_min as f64);
        let view_center = viewport_size.center();

        translate_scale_rotate_translate(
            -tile_origin_x,
            -tile_origin_y,
            scale,
            scale,
            heading,
            view_center.x(),
            view_center.y(),
        )
    }

    /// Tiles to load for this grid, from `min_zoom` up to the grid's level (capped at
    /// `max_zoom`). Lower levels act as a backdrop while the top level loads, so only the base
    /// layer of a map requests them.
    ///
    /// Rows are clamped to the map, columns are not wrapped.
    pub fn tiles(&self, min_zoom: u8, max_zoom: u8, is_base_layer: bool) -> Vec<TileId> {
        let max_zoom = self.zoom_level.min(max_zoom as i32);
        let mut min_zoom = min_zoom as i32;
        if min_zoom < max_zoom && !is_base_layer {
            min_zoom = max_zoom;
        }

        let mut tiles = Vec::new();
        for z in min_zoom..=max_zoom {
            let tile_size = 1i32 << (self.zoom_level - z);
            let x1 = self.x_min.div_euclid(tile_size);
            let x2 = self.x_max.div_euclid(tile_size);
            let y1 = self.y_min.div_euclid(tile_size).max(0);
            let y2 = self.y_max.div_euclid(tile_size).min((1 << z) - 1);

            for y in y1..=y2 {
                for x in x1..=x2 {
                    tiles.push(TileId::new(z as u8, x, y));
                }
            }
        }
        tiles
    }

    /// Pixel rectangle of a tile in the layer coordinates, where the top-left corner of the grid
    /// is at 0,0. Tiles of lower levels are proportionally larger.
    pub fn tile_rect(&self, tile: TileId) -> Rect {
        let tile_size = TILE_SIZE as f64 * 2f64.powi(self.zoom_level - tile.zoom as i32);
        let x = tile_size * tile.x as f64 - TILE_SIZE as f64 * self.x_min as f64;
        let y = tile_size * tile.y as f64 - TILE_SIZE as f64 * self.y_min as f64;

        Rect::new(
            Coord { x, y },
            Coord {
                x: x + tile_size,
                y: y + tile_size,
            },
        )
    }
}
