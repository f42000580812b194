//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use mbtiler_core::datasource::{ImageRaster, PixelBuffer, RasterExtent, RasterSource};
use mbtiler_core::Result;
#[cfg(feature = "with-gdal")]
use mbtiler_gdal::GdalRaster;
use tile_pyramid::ReadWindow;

/// Raster source selected at runtime
pub enum Rastersource {
    Image(ImageRaster),
    #[cfg(feature = "with-gdal")]
    Gdal(GdalRaster),
}

impl RasterSource for Rastersource {
    fn info(&self) -> String {
        match self {
            Rastersource::Image(ref ds) => ds.info(),
            #[cfg(feature = "with-gdal")]
            Rastersource::Gdal(ref ds) => ds.info(),
        }
    }
    fn extent(&self) -> &RasterExtent {
        match self {
            Rastersource::Image(ref ds) => ds.extent(),
            #[cfg(feature = "with-gdal")]
            Rastersource::Gdal(ref ds) => ds.extent(),
        }
    }
    fn read_window(
        &self,
        window: &ReadWindow,
        size: (u32, u32),
        bands: u8,
    ) -> Result<PixelBuffer> {
        match self {
            Rastersource::Image(ref ds) => ds.read_window(window, size, bands),
            #[cfg(feature = "with-gdal")]
            Rastersource::Gdal(ref ds) => ds.read_window(window, size, bands),
        }
    }
}

/// Open `path` with GDAL if available, with the image decoder otherwise
#[cfg(feature = "with-gdal")]
pub fn open_raster(path: &str) -> Result<Rastersource> {
    info!("Opening {} with GDAL {}", path, mbtiler_gdal::gdal_version());
    GdalRaster::open(path).map(Rastersource::Gdal)
}

/// Open `path` with GDAL if available, with the image decoder otherwise
#[cfg(not(feature = "with-gdal"))]
pub fn open_raster(path: &str) -> Result<Rastersource> {
    info!("Opening {}", path);
    ImageRaster::open(path).map(Rastersource::Image)
}
