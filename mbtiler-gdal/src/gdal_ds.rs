//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use gdal::Dataset;
use mbtiler_core::datasource::{PixelBuffer, RasterExtent, RasterSource};
use mbtiler_core::{Error, Result};
use std::path::Path;
use tile_pyramid::ReadWindow;

/// Raster read with GDAL
pub struct GdalRaster {
    pub path: String,
    dataset: Dataset,
    extent: RasterExtent,
}

impl GdalRaster {
    pub fn open(path: &str) -> Result<GdalRaster> {
        let dataset = Dataset::open(Path::new(path))
            .map_err(|e| Error::Source(format!("Couldn't open '{}': {}", path, e)))?;
        let (width, height) = dataset.raster_size();
        let bands = dataset.raster_count();
        if bands < 1 {
            return Err(Error::Source(format!("'{}' has no raster bands", path)));
        }
        let geo_transform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(e) => {
                warn!("{}: no geotransform ({}), using pixel coordinates", path, e);
                [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
            }
        };
        debug!(
            "GDAL driver: {} / {}",
            dataset.driver().short_name(),
            dataset.driver().long_name()
        );
        debug!("Projection: {}", dataset.projection());
        let extent = RasterExtent {
            width: width as u32,
            height: height as u32,
            bands: bands as u8,
            geo_transform,
        };
        Ok(GdalRaster {
            path: path.to_string(),
            dataset,
            extent,
        })
    }
}

impl RasterSource for GdalRaster {
    fn info(&self) -> String {
        format!(
            "GDAL raster {} ({})",
            self.path,
            self.dataset.driver().short_name()
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
        if bands > self.extent.bands {
            return Err(Error::Source(format!(
                "Can't read {} bands from {} band raster",
                bands, self.extent.bands
            )));
        }
        let mut buf = PixelBuffer::new(size.0, size.1, bands);
        for band in 0..bands {
            let rasterband = self
                .dataset
                .rasterband(band as isize + 1)
                .map_err(|e| Error::Source(e.to_string()))?;
            // Nearest neighbour resampling like GDALRasterIO
            let data = rasterband
                .read_as::<u8>(
                    (window.x as isize, window.y as isize),
                    (window.width as usize, window.height as usize),
                    (size.0 as usize, size.1 as usize),
                    None,
                )
                .map_err(|e| Error::Source(format!("{}: {}", self.path, e)))?;
            buf.band_mut(band).copy_from_slice(&data.data);
        }
        Ok(buf)
    }
}
