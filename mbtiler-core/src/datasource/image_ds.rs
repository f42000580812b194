//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::datasource::raster::{resample_nearest, PixelBuffer, RasterExtent, RasterSource};
use crate::datasource::worldfile::read_world_file;
use crate::error::{Error, Result};
use image::DynamicImage;
use std::path::Path;
use tile_pyramid::ReadWindow;

/// Geotransform assumed for rasters without georeference
pub const DEFAULT_GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Image file (PNG, JPEG, TIFF, ...) held in memory, georeferenced by a
/// world file.
pub struct ImageRaster {
    pub path: String,
    extent: RasterExtent,
    /// Band sequential pixels of the whole raster
    planes: Vec<u8>,
}

impl ImageRaster {
    pub fn open(path: &str) -> Result<ImageRaster> {
        let img = image::open(path)
            .map_err(|e| Error::Source(format!("Couldn't open '{}': {}", path, e)))?;
        let geo_transform = match read_world_file(Path::new(path))? {
            Some(gt) => gt,
            None => {
                warn!("No world file found for '{}', using pixel coordinates", path);
                DEFAULT_GEO_TRANSFORM
            }
        };
        let (width, height, bands, interleaved) = decode_8bit(&img);
        let extent = RasterExtent {
            width,
            height,
            bands,
            geo_transform,
        };
        let planes = deinterleave(&interleaved, bands);
        let mut raster = ImageRaster::from_planes(extent, planes)?;
        raster.path = path.to_string();
        Ok(raster)
    }
    /// Raster from band sequential pixel data
    pub fn from_planes(extent: RasterExtent, planes: Vec<u8>) -> Result<ImageRaster> {
        let expected = extent.width as usize * extent.height as usize * extent.bands as usize;
        if planes.len() != expected {
            return Err(Error::Source(format!(
                "Expected {} bytes of pixel data, got {}",
                expected,
                planes.len()
            )));
        }
        Ok(ImageRaster {
            path: "<memory>".to_string(),
            extent,
            planes,
        })
    }
    fn plane(&self, band: u8) -> &[u8] {
        let len = self.extent.width as usize * self.extent.height as usize;
        let start = band as usize * len;
        &self.planes[start..start + len]
    }
}

/// Pixel interleaved 8 bit data of all image channels
fn decode_8bit(img: &DynamicImage) -> (u32, u32, u8, Vec<u8>) {
    match img.color().channel_count() {
        1 => {
            let buf = img.to_luma8();
            (buf.width(), buf.height(), 1, buf.into_raw())
        }
        2 => {
            let buf = img.to_luma_alpha8();
            (buf.width(), buf.height(), 2, buf.into_raw())
        }
        3 => {
            let buf = img.to_rgb8();
            (buf.width(), buf.height(), 3, buf.into_raw())
        }
        _ => {
            let buf = img.to_rgba8();
            (buf.width(), buf.height(), 4, buf.into_raw())
        }
    }
}

/// Split pixel interleaved data into band planes
fn deinterleave(data: &[u8], bands: u8) -> Vec<u8> {
    let bands = bands as usize;
    let len = data.len() / bands;
    let mut planes = vec![0; data.len()];
    for (i, pixel) in data.chunks_exact(bands).enumerate() {
        for (b, value) in pixel.iter().enumerate() {
            planes[b * len + i] = *value;
        }
    }
    planes
}

impl RasterSource for ImageRaster {
    fn info(&self) -> String {
        format!(
            "Image raster {} ({}x{}x{})",
            self.path, self.extent.width, self.extent.height, self.extent.bands
        )
    }
    fn extent(&self) -> &RasterExtent {
        &self.extent
    }
    fn read_window(
        &self,
        window: &ReadWindow,
        size: (u32, u32),
        bands: u8,
    ) -> Result<PixelBuffer> {
        if window.x as u64 + window.width as u64 > self.extent.width as u64
            || window.y as u64 + window.height as u64 > self.extent.height as u64
        {
            return Err(Error::Source(format!(
                "Read window {:?} outside of raster {}x{}",
                window, self.extent.width, self.extent.height
            )));
        }
        if bands > self.extent.bands {
            return Err(Error::Source(format!(
                "Requested {} bands from raster with {} bands",
                bands, self.extent.bands
            )));
        }
        let mut buffer = PixelBuffer::new(size.0, size.1, bands);
        for band in 0..bands {
            resample_nearest(
                self.plane(band),
                self.extent.width,
                window,
                size,
                buffer.band_mut(band),
            );
        }
        Ok(buffer)
    }
}
