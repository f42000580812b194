//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

#[cfg(feature = "with-gdal")]
extern crate mbtiler_gdal;

pub mod datasources;
pub mod runtime_config;
#[cfg(test)]
mod runtime_config_test;
pub mod tiler;
#[cfg(test)]
mod tiler_test;

pub use crate::datasources::{open_raster, Rastersource};
pub use crate::runtime_config::{config_from_args, gen_config, tiler_from_args};
pub use crate::tiler::{GenerationState, GenerationSummary, Tiler};
