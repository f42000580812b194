//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

mod gdal_ds;

pub use crate::gdal_ds::GdalRaster;

/// GDAL release number, e.g. 3040100 for 3.4.1
pub fn gdal_version() -> i32 {
    gdal::version::version_info("VERSION_NUM")
        .parse::<i32>()
        .unwrap_or(0)
}
