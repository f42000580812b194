//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::Result;
use std::cmp;
use tile_pyramid::{Extent, ReadWindow};

/// Maximal number of raster bands used for tiles
pub const MAX_TILE_BANDS: u8 = 3;

/// Size and georeference of a raster
#[derive(PartialEq, Clone, Debug)]
pub struct RasterExtent {
    pub width: u32,
    pub height: u32,
    /// Number of bands of the raster
    pub bands: u8,
    /// Affine transform `[origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height]`
    pub geo_transform: [f64; 6],
}

impl RasterExtent {
    /// Geographic bounds in the raster's coordinate units
    pub fn bounds(&self) -> Extent {
        Extent::from_geotransform(&self.geo_transform, self.width, self.height)
    }
    /// Native pixel size in x direction
    pub fn pixel_size(&self) -> f64 {
        self.geo_transform[1]
    }
    /// Number of bands written into tiles
    pub fn tile_bands(&self) -> u8 {
        cmp::min(self.bands, MAX_TILE_BANDS)
    }
}

/// Band sequential 8 bit pixel data
#[derive(PartialEq, Clone, Debug)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub bands: u8,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, bands: u8) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            bands,
            data: vec![0; width as usize * height as usize * bands as usize],
        }
    }
    fn plane_len(&self) -> usize {
        self.width as usize * self.height as usize
    }
    /// Pixels of band `band` (0-based), row by row
    pub fn band(&self, band: u8) -> &[u8] {
        let len = self.plane_len();
        let start = band as usize * len;
        &self.data[start..start + len]
    }
    pub fn band_mut(&mut self, band: u8) -> &mut [u8] {
        let len = self.plane_len();
        let start = band as usize * len;
        &mut self.data[start..start + len]
    }
}

/// Raster backend
pub trait RasterSource {
    fn info(&self) -> String;
    fn extent(&self) -> &RasterExtent;
    /// Read the first `bands` bands of `window`, resampled to `size` pixels
    fn read_window(&self, window: &ReadWindow, size: (u32, u32), bands: u8)
        -> Result<PixelBuffer>;
}

/// Nearest neighbour decimation of one band plane.
///
/// Samples the source pixel under the centre of every destination pixel.
pub fn resample_nearest(
    plane: &[u8],
    plane_width: u32,
    window: &ReadWindow,
    size: (u32, u32),
    out: &mut [u8],
) {
    let (dxsize, dysize) = (size.0 as u64, size.1 as u64);
    for dy in 0..dysize {
        let sy = window.y as u64 + ((2 * dy + 1) * window.height as u64) / (2 * dysize);
        let row = sy as usize * plane_width as usize;
        for dx in 0..dxsize {
            let sx = window.x as u64 + ((2 * dx + 1) * window.width as u64) / (2 * dxsize);
            out[(dy * dxsize + dx) as usize] = plane[row + sx as usize];
        }
    }
}
