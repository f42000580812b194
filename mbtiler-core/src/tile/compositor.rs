//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::datasource::PixelBuffer;
use crate::error::{Error, Result};
use tile_pyramid::TilePlacement;

/// Alpha value of pixels covered by raster data
pub const OPAQUE: u8 = 255;
/// Alpha value of padding pixels
pub const TRANSPARENT: u8 = 0;

/// Square band sequential tile canvas
#[derive(PartialEq, Clone, Debug)]
pub struct TileBuffer {
    pub size: u32,
    pub bands: u8,
    pub data: Vec<u8>,
}

impl TileBuffer {
    /// Canvas with all bands set to `fill`
    pub fn new(size: u32, bands: u8, fill: u8) -> TileBuffer {
        TileBuffer {
            size,
            bands,
            data: vec![fill; size as usize * size as usize * bands as usize],
        }
    }
    fn plane_len(&self) -> usize {
        self.size as usize * self.size as usize
    }
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
    pub fn pixel(&self, band: u8, x: u32, y: u32) -> u8 {
        self.band(band)[(y * self.size + x) as usize]
    }
    /// Pixel interleaved copy of the canvas
    pub fn interleaved(&self) -> Vec<u8> {
        let len = self.plane_len();
        let bands = self.bands as usize;
        let mut pixels = vec![0; self.data.len()];
        for b in 0..bands {
            let plane = &self.data[b * len..(b + 1) * len];
            for (i, value) in plane.iter().enumerate() {
                pixels[i * bands + b] = *value;
            }
        }
        pixels
    }
}

/// Builds tile canvases from decimated raster reads
#[derive(Clone, Debug)]
pub struct TileCompositor {
    pub tile_size: u32,
    /// Value of canvas pixels without raster data
    pub fill: u8,
    /// Output format has an alpha channel
    pub supports_alpha: bool,
}

impl TileCompositor {
    pub fn new(tile_size: u32, fill: u8, supports_alpha: bool) -> TileCompositor {
        TileCompositor {
            tile_size,
            fill,
            supports_alpha,
        }
    }
    /// RGB rasters get an alpha band marking the area covered by data
    pub fn adds_alpha(&self, bands: u8) -> bool {
        bands == 3 && self.supports_alpha
    }
    /// Number of bands of tiles composed from a raster with `bands` bands
    pub fn tile_bands(&self, bands: u8) -> u8 {
        if self.adds_alpha(bands) {
            4
        } else {
            bands
        }
    }
    /// Copy `data` into a new canvas at `placement`
    pub fn compose(&self, data: &PixelBuffer, placement: &TilePlacement) -> Result<TileBuffer> {
        if data.width != placement.dxsize || data.height != placement.dysize {
            return Err(Error::Source(format!(
                "Read {}x{} pixels for a {}x{} placement",
                data.width, data.height, placement.dxsize, placement.dysize
            )));
        }
        if placement.xoff + placement.dxsize > self.tile_size
            || placement.yoff + placement.dysize > self.tile_size
        {
            return Err(Error::Config(format!(
                "Placement {:?} exceeds tile size {}",
                placement, self.tile_size
            )));
        }
        let alpha = self.adds_alpha(data.bands);
        let mut tile = TileBuffer::new(self.tile_size, self.tile_bands(data.bands), self.fill);
        if alpha {
            let plane = tile.band_mut(3);
            for v in plane.iter_mut() {
                *v = TRANSPARENT;
            }
        }
        for band in 0..data.bands {
            self.blit(data.band(band), placement, tile.band_mut(band));
        }
        if alpha {
            let mask = vec![OPAQUE; placement.dxsize as usize * placement.dysize as usize];
            self.blit(&mask, placement, tile.band_mut(3));
        }
        Ok(tile)
    }
    fn blit(&self, src: &[u8], placement: &TilePlacement, dest: &mut [u8]) {
        let width = placement.dxsize as usize;
        let tile_size = self.tile_size as usize;
        for (row, line) in src.chunks_exact(width).enumerate() {
            let start = (placement.yoff as usize + row) * tile_size + placement.xoff as usize;
            dest[start..start + width].copy_from_slice(line);
        }
    }
}
