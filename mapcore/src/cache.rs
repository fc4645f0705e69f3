//! Naming of cached tile images.

use std::path::{Path, PathBuf};

use url::Url;

use crate::TileId;

/// Extension of the URL's path, with `.jpeg` and missing extensions turned into `.jpg`.
fn image_extension(url: &str) -> String {
    let Ok(url) = Url::parse(url) else {
        return ".jpg".to_owned();
    };
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    match file_name.rsplit_once('.') {
        Some((_, extension))
            if !extension.is_empty() && !extension.eq_ignore_ascii_case("jpeg") =>
        {
            format!(".{extension}")
        }
        _ => ".jpg".to_owned(),
    }
}

/// Key under which the image of `tile_id`, downloaded from `url`, is cached, e.g.
/// `OpenStreetMap;zoom-3;tile-OpenStreetMap[z3x4y2].png`.
///
/// Tiles are stored under their wrapped `x`, so the copies of the world share the images.
pub fn cache_key(source_name: &str, tile_id: TileId, url: &str) -> String {
    let name = source_name.replace(';', "_");
    let extension = image_extension(url);
    let TileId { zoom, y, .. } = tile_id;
    let x = tile_id.x_index();

    format!("{name};zoom-{zoom};tile-{name}[z{zoom}x{x}y{y}]{extension}")
}

/// Location of a cached tile in a directory tree rooted at `root`. Each part of the key becomes
/// a directory.
pub fn cache_file_path(root: impl AsRef<Path>, key: &str) -> PathBuf {
    key.split(['\\', '/', ':', ';'])
        .filter(|component| !component.is_empty())
        .fold(root.as_ref().to_path_buf(), |path, component| {
            path.join(component)
        })
}
