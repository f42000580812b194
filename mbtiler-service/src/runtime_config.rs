//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::tiler::Tiler;
use clap::ArgMatches;
use mbtiler_core::core::config::{ApplicationCfg, DEFAULT_CONFIG};
use mbtiler_core::core::{parse_config, read_config, Config};
use std::str::FromStr;

/// Arguments overriding configuration values
const CONFIG_ARGS: [&str; 6] = [
    "tilesize",
    "format",
    "name",
    "description",
    "version",
    "overlay",
];

/// Configuration from config file or defaults, overridden by command line arguments
pub fn config_from_args(args: &ArgMatches) -> Result<ApplicationCfg, String> {
    let mut config: ApplicationCfg = if let Some(cfgpath) = args.value_of("config") {
        info!("Reading configuration from '{}'", cfgpath);
        read_config(cfgpath).map_err(|err| format!("Error reading configuration - {}", err))?
    } else {
        parse_config(DEFAULT_CONFIG.to_string(), "")?
    };
    if let Some(tilesize) = args.value_of("tilesize") {
        config.tiling.tile_size = u32::from_str(tilesize)
            .map_err(|_| "Error parsing 'tilesize' as integer value".to_string())?;
    }
    if let Some(format) = args.value_of("format") {
        config.tiling.format = format.to_string();
    }
    if let Some(name) = args.value_of("name") {
        config.metadata.name = Some(name.to_string());
    }
    if let Some(description) = args.value_of("description") {
        config.metadata.description = Some(description.to_string());
    }
    if let Some(version) = args.value_of("version") {
        config.metadata.version = Some(version.to_string());
    }
    if args.is_present("overlay") {
        config.metadata.overlay = true;
    }
    Ok(config)
}

pub fn tiler_from_args(config: &ApplicationCfg, args: &ArgMatches) -> Result<Tiler, String> {
    let mut tiler = Tiler::from_config(config)?;
    tiler.progress = match args.value_of("progress") {
        Some(progress) => bool::from_str(progress)
            .map_err(|_| "Error parsing 'progress' as boolean value".to_string())?,
        None => true,
    };
    Ok(tiler)
}

/// Configuration template, including values from arguments if given
pub fn gen_config(args: &ArgMatches) -> Result<String, String> {
    let runtime = args.value_of("config").is_some()
        || CONFIG_ARGS.iter().any(|arg| args.is_present(arg));
    if runtime {
        let config = config_from_args(args)?;
        let tiler = Tiler::from_config(&config)?;
        Ok(tiler.gen_runtime_config())
    } else {
        Ok(Tiler::gen_config())
    }
}
