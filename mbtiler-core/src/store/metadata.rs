//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::MetadataCfg;
use crate::datasource::RasterExtent;
use crate::tile::TileFormat;
use tile_pyramid::Pyramid;

/// Layer type published in MBTiles metadata
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum LayerType {
    Overlay,
    Baselayer,
}

impl LayerType {
    pub fn name(&self) -> &'static str {
        match self {
            LayerType::Overlay => "overlay",
            LayerType::Baselayer => "baselayer",
        }
    }
}

/// Descriptive entries of a tile pyramid
#[derive(Clone, Debug)]
pub struct PyramidMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub format: TileFormat,
    pub layer_type: LayerType,
    /// "west,south,east,north"
    pub bounds: String,
    pub minzoom: u8,
    pub maxzoom: u8,
}

impl PyramidMetadata {
    /// Metadata of `pyramid` built over a raster with `extent`.
    /// `name` is used when the configuration has none.
    pub fn new(
        cfg: &MetadataCfg,
        name: &str,
        extent: &RasterExtent,
        pyramid: &Pyramid,
        format: TileFormat,
    ) -> PyramidMetadata {
        PyramidMetadata {
            name: cfg.name.clone().unwrap_or(name.to_string()),
            version: cfg.version.clone().unwrap_or("1.0".to_string()),
            description: cfg.description.clone().unwrap_or_default(),
            format,
            layer_type: if cfg.overlay {
                LayerType::Overlay
            } else {
                LayerType::Baselayer
            },
            bounds: extent.bounds().bounds_string(),
            minzoom: pyramid.minzoom(),
            maxzoom: pyramid.maxzoom(),
        }
    }
    /// Name/value pairs in store order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("version", self.version.clone()),
            ("maxzoom", self.maxzoom.to_string()),
            ("minzoom", self.minzoom.to_string()),
            ("format", self.format.name().to_string()),
            ("description", self.description.clone()),
            ("type", self.layer_type.name().to_string()),
            ("bounds", self.bounds.clone()),
        ]
    }
}
