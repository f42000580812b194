//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod image_ds;
pub mod raster;
pub mod worldfile;


pub use self::image_ds::ImageRaster;
pub use self::raster::{PixelBuffer, RasterExtent, RasterSource};
