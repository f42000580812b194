//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApplicationCfg {
    #[serde(default)]
    pub tiling: TilingCfg,
    #[serde(default)]
    pub metadata: MetadataCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TilingCfg {
    /// The width and height of an individual tile, in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Tile image format (png, jpg)
    #[serde(default = "default_format")]
    pub format: String,
    /// Value of canvas pixels not covered by raster data
    #[serde(default)]
    pub fill: u8,
    /// Number of tiles written per store transaction
    #[serde(default = "default_commit_batch")]
    pub commit_batch: u64,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for TilingCfg {
    fn default() -> TilingCfg {
        TilingCfg {
            tile_size: default_tile_size(),
            format: default_format(),
            fill: 0,
            commit_batch: default_commit_batch(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct MetadataCfg {
    /// Tileset name (Default: input file name)
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    /// Publish as overlay instead of baselayer
    #[serde(default)]
    pub overlay: bool,
}

pub fn default_tile_size() -> u32 {
    256
}

pub fn default_format() -> String {
    "png".to_string()
}

pub fn default_commit_batch() -> u64 {
    1000
}

pub fn default_jpeg_quality() -> u8 {
    85
}

pub const DEFAULT_CONFIG: &'static str = r#"
[tiling]
tile_size = 256
format = "png"

[metadata]
version = "1.0"
overlay = false
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").map_err(|e| e.to_string())?;
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| {
        let reason = e.source().map(|s| s.to_string()).unwrap_or(e.to_string());
        format!("Template error: {}", reason)
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
