use geo_types::Rect;

use crate::cache::cache_key;
use crate::matrix::Matrix;
use crate::sources::TileSource;
use crate::tiles::{TileGrid, TileId};
use crate::{Error, Projection, Viewport};

/// Configuration of a [`TileLayer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TileLayerOptions {
    /// Name under which the tiles are cached. Tiles of a nameless layer are not cached.
    pub source_name: String,

    /// Added to the map's zoom level before picking the tile level. Negative values load fewer,
    /// larger tiles.
    pub zoom_level_offset: f64,

    pub min_zoom: u8,
    pub max_zoom: u8,

    /// Base layer loads tiles of all the levels below the current one, so there is always
    /// something to display while the top level loads.
    pub is_base_layer: bool,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            source_name: String::new(),
            zoom_level_offset: 0.,
            min_zoom: 0,
            max_zoom: 18,
            is_base_layer: true,
        }
    }
}

/// Tile which should be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    /// Tile as laid out on the layer, with `x` not wrapped.
    pub tile: TileId,
    pub url: String,
    pub cache_key: Option<String>,

    /// Where to draw the image, in the layer coordinates of [`TileLayer::render_transform`].
    pub rect: Rect,
}

/// Keeps track of the tiles covering the viewport.
#[derive(Debug)]
pub struct TileLayer<S> {
    source: S,
    options: TileLayerOptions,
    grid: Option<TileGrid>,
    previous: Option<Viewport>,
}

impl<S: TileSource> TileLayer<S> {
    pub fn new(source: S, options: TileLayerOptions) -> Self {
        Self {
            source,
            options,
            grid: None,
            previous: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &TileLayerOptions {
        &self.options
    }

    /// Current grid, or `None` if the layer can not be displayed.
    pub fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    /// Recompute the grid for the viewport. Returns `true` if the set of tiles to display
    /// changed, and [`TileLayer::requests`] should be consulted again.
    ///
    /// Tiles can only be displayed in Mercator projections, the grid is cleared for others.
    pub fn update(&mut self, viewport: &Viewport, projection: &Projection) -> Result<bool, Error> {
        if !projection.is_web_mercator() {
            let had_grid = self.grid.take().is_some();
            self.previous = None;
            return Ok(had_grid);
        }

        let wrapped = self
            .previous
            .as_ref()
            .is_some_and(|previous| viewport.longitude_offset(previous).abs() > 180.);

        let grid = TileGrid::compute(
            viewport.adjusted_center(projection),
            viewport.zoom_level(),
            self.options.zoom_level_offset,
            viewport.heading(),
            viewport.size(),
        )?;
        self.previous = Some(viewport.clone());

        if !wrapped && self.grid == Some(grid) {
            return Ok(false);
        }

        log::debug!(
            "Tile grid of '{}' changed to {grid:?}{}.",
            self.options.source_name,
            if wrapped { " after crossing the antimeridian" } else { "" }
        );
        self.grid = Some(grid);
        Ok(true)
    }

    /// Transformation from layer coordinates to viewport pixels. Follows the same clamped center
    /// as [`Viewport::projector`].
    pub fn render_transform(
        &self,
        viewport: &Viewport,
        projection: &Projection,
    ) -> Option<Matrix> {
        self.grid.map(|grid| {
            grid.render_transform(
                viewport.adjusted_center(projection),
                viewport.zoom_level(),
                viewport.heading(),
                viewport.size(),
            )
        })
    }

    /// Tiles of the current grid along with their URLs. Tiles for which the source has no URL
    /// are skipped.
    pub fn requests(&self) -> Vec<TileRequest> {
        let Some(grid) = self.grid else {
            return Vec::new();
        };

        let max_zoom = self.options.max_zoom.min(self.source.max_zoom());
        grid.tiles(self.options.min_zoom, max_zoom, self.options.is_base_layer)
            .into_iter()
            .filter_map(|tile| {
                let url = self.source.tile_url(tile.wrapped())?;
                let cache_key = (!self.options.source_name.is_empty())
                    .then(|| cache_key(&self.options.source_name, tile, &url));

                Some(TileRequest {
                    tile,
                    url,
                    cache_key,
                    rect: grid.tile_rect(tile),
                })
            })
            .collect()
    }
}
