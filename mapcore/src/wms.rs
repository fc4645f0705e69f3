//! Requests of the Web Map Service, which renders a single image for the whole viewport.
//! <https://www.ogc.org/standard/wms/>

use crate::{BoundingBox, Projector};

/// What to ask the WMS server for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct WmsOptions {
    /// Address of the service, optionally with its own query parameters.
    pub server_uri: String,
    pub version: String,

    /// Comma separated names of the layers.
    pub layers: String,
    pub styles: String,

    /// MIME type of the image.
    pub format: String,
    pub transparent: bool,
}

impl Default for WmsOptions {
    fn default() -> Self {
        Self {
            server_uri: String::new(),
            version: "1.3.0".to_owned(),
            layers: String::new(),
            styles: String::new(),
            format: "image/png".to_owned(),
            transparent: false,
        }
    }
}

impl WmsOptions {
    fn request_uri(&self, request: &str) -> Option<String> {
        if self.server_uri.is_empty() {
            return None;
        }

        let separator = if self.server_uri.ends_with(['?', '&']) {
            ""
        } else if self.server_uri.contains('?') {
            "&"
        } else {
            "?"
        };

        let uri = format!(
            "{}{separator}SERVICE=WMS&VERSION={}&REQUEST={request}",
            self.server_uri, self.version
        );
        Some(uri.replace(' ', "%20"))
    }

    /// `GetMap` request for an image of `bbox` as displayed by `projector`. `None` if there is no
    /// server, or the projection can not be requested from WMS servers.
    pub fn get_map_uri(&self, projector: &Projector, bbox: &BoundingBox) -> Option<String> {
        let projection_parameters = projector.wms_query_parameters(bbox, &self.version)?;

        self.request_uri(&format!(
            "GetMap&LAYERS={}&STYLES={}&FORMAT={}&TRANSPARENT={}&{projection_parameters}",
            self.layers,
            self.styles,
            self.format,
            if self.transparent { "TRUE" } else { "FALSE" },
        ))
    }

    /// `GetCapabilities` request, which lists the layers available on the server.
    pub fn capabilities_uri(&self) -> Option<String> {
        self.request_uri("GetCapabilities")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azimuthal::AzimuthalKind;
    use crate::{Location, Pixels, Projection, ViewportParameters, lat_lon};

    fn projector(projection: Projection) -> Projector {
        Projector::new(
            &projection,
            &ViewportParameters {
                projection_center: lat_lon(50., 10.),
                map_center: lat_lon(50., 10.),
                viewport_center: Pixels::new(400., 300.),
                zoom_level: 6.,
                heading: 0.,
            },
        )
        .unwrap()
    }

    fn options() -> WmsOptions {
        WmsOptions {
            server_uri: "https://ows.example.com/wms".to_owned(),
            layers: "Topo Base".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn capabilities() {
        assert_eq!(
            Some(
                "https://ows.example.com/wms?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetCapabilities"
                    .to_owned()
            ),
            options().capabilities_uri()
        );

        let options = WmsOptions {
            server_uri: "https://ows.example.com/mapserv?map=topo".to_owned(),
            version: "1.1.1".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            Some(
                "https://ows.example.com/mapserv?map=topo\
                 &SERVICE=WMS&VERSION=1.1.1&REQUEST=GetCapabilities"
                    .to_owned()
            ),
            options.capabilities_uri()
        );
    }

    #[test]
    fn get_map() {
        let projector = projector(Projection::WebMercator);
        let bbox = BoundingBox::new(51., 11., 49., 9.);
        let projection_parameters = projector.wms_query_parameters(&bbox, "1.3.0").unwrap();

        assert_eq!(
            Some(format!(
                "https://ows.example.com/wms?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetMap\
                 &LAYERS=Topo%20Base&STYLES=&FORMAT=image/png&TRANSPARENT=FALSE\
                 &{projection_parameters}"
            )),
            options().get_map_uri(&projector, &bbox)
        );
        assert!(projection_parameters.starts_with("CRS=EPSG:3857&BBOX="));
    }

    #[test]
    fn unsupported_requests() {
        let bbox = BoundingBox::new(51., 11., 49., 9.);
        let projection = Projection::Azimuthal(AzimuthalKind::Equidistant, Location::ORIGIN);
        assert_eq!(None, options().get_map_uri(&projector(projection), &bbox));

        let nowhere = WmsOptions::default();
        assert_eq!(None, nowhere.capabilities_uri());
        assert_eq!(
            None,
            nowhere.get_map_uri(&projector(Projection::WebMercator), &bbox)
        );
    }
}
