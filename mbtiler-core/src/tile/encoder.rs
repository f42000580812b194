//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::TilingCfg;
use crate::core::Config;
use crate::error::{Error, Result};
use crate::tile::compositor::TileBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::fmt;
use std::str::FromStr;

/// Tile image format
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum TileFormat {
    Png,
    Jpeg,
}

impl TileFormat {
    /// Format name stored in MBTiles metadata
    pub fn name(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }
    pub fn supports_alpha(&self) -> bool {
        match self {
            TileFormat::Png => true,
            TileFormat::Jpeg => false,
        }
    }
    /// Can tiles with `bands` bands be written in this format
    pub fn supports_bands(&self, bands: u8) -> bool {
        match self {
            TileFormat::Png => bands >= 1 && bands <= 4,
            TileFormat::Jpeg => bands == 1 || bands == 3,
        }
    }
}

impl FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<TileFormat, String> {
        match s.to_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            _ => Err(format!("Unsupported tile format '{}'", s)),
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Encodes tile canvases into image files
pub trait TileEncoder {
    fn format(&self) -> TileFormat;
    fn encode(&self, tile: &TileBuffer) -> Result<Vec<u8>>;
}

/// Tile encoder based on the `image` crate
#[derive(Clone, Debug)]
pub struct ImageTileEncoder {
    pub format: TileFormat,
    pub jpeg_quality: u8,
}

impl ImageTileEncoder {
    pub fn new(format: TileFormat) -> ImageTileEncoder {
        ImageTileEncoder {
            format,
            jpeg_quality: 85,
        }
    }
}

fn color_type(bands: u8) -> Option<ColorType> {
    match bands {
        1 => Some(ColorType::L8),
        2 => Some(ColorType::La8),
        3 => Some(ColorType::Rgb8),
        4 => Some(ColorType::Rgba8),
        _ => None,
    }
}

impl TileEncoder for ImageTileEncoder {
    fn format(&self) -> TileFormat {
        self.format
    }
    fn encode(&self, tile: &TileBuffer) -> Result<Vec<u8>> {
        let color = match color_type(tile.bands) {
            Some(color) if self.format.supports_bands(tile.bands) => color,
            _ => {
                return Err(Error::Encode(format!(
                    "Can't write {} band tiles as {}",
                    tile.bands, self.format
                )))
            }
        };
        let pixels = tile.interleaved();
        let mut bytes = Vec::new();
        let res = match self.format {
            TileFormat::Png => {
                PngEncoder::new(&mut bytes).write_image(&pixels, tile.size, tile.size, color)
            }
            TileFormat::Jpeg => JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality)
                .write_image(&pixels, tile.size, tile.size, color),
        };
        res.map_err(|e| Error::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

impl<'a> Config<'a, TilingCfg> for ImageTileEncoder {
    fn from_config(cfg: &TilingCfg) -> std::result::Result<Self, String> {
        let format = TileFormat::from_str(&cfg.format)?;
        if cfg.jpeg_quality == 0 || cfg.jpeg_quality > 100 {
            return Err(format!("Invalid jpeg_quality {}", cfg.jpeg_quality));
        }
        Ok(ImageTileEncoder {
            format,
            jpeg_quality: cfg.jpeg_quality,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[tiling]
# Width and height of tiles in pixels
tile_size = 256
# Tile image format (png, jpg)
format = "png"
# Value of pixels outside the raster for formats without alpha channel
fill = 0
# Number of tiles written per transaction
commit_batch = 1000
#jpeg_quality = 85
"#;
        toml.to_string()
    }
}
