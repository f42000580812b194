//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::runtime_config::{config_from_args, gen_config, tiler_from_args};
use clap::{App, AppSettings, ArgMatches};
use mbtiler_core::core::parse_config;
use mbtiler_core::core::config::ApplicationCfg;
use mbtiler_core::tile::TileFormat;
use std::env;
use std::fs;

fn args<'a>(argv: Vec<&str>) -> ArgMatches<'a> {
    App::new("test")
        .setting(AppSettings::DisableVersion)
        .args_from_usage(
            "-c, --config=[FILE] 'Load from custom config file'
             -n, --name=[NAME] 'Tileset name'
             -d, --description=[TEXT] 'Tileset description'
             -r, --version=[VERSION] 'Tileset version'
             -o, --overlay 'Publish as overlay'
             --progress=[true|false] 'Show progress bar'
             --format=[png|jpg] 'Tile format'
             --tilesize=[PX] 'Tile size'",
        )
        .get_matches_from(argv)
}

#[test]
fn test_default_config() {
    let config = config_from_args(&args(vec!["test"])).unwrap();
    assert_eq!(config.tiling.tile_size, 256);
    assert_eq!(config.tiling.format, "png");
    assert_eq!(config.metadata.version, Some("1.0".to_string()));
    assert!(!config.metadata.overlay);
    let tiler = tiler_from_args(&config, &args(vec!["test"])).unwrap();
    assert!(tiler.progress);
}

#[test]
fn test_args_override() {
    let matches = args(vec![
        "test",
        "-n",
        "Orthophoto",
        "-r",
        "2.1",
        "-o",
        "--format=jpg",
        "--tilesize",
        "512",
        "--progress=false",
    ]);
    let config = config_from_args(&matches).unwrap();
    assert_eq!(config.metadata.name, Some("Orthophoto".to_string()));
    assert_eq!(config.metadata.version, Some("2.1".to_string()));
    assert!(config.metadata.overlay);
    let tiler = tiler_from_args(&config, &matches).unwrap();
    assert_eq!(tiler.tile_size, 512);
    assert_eq!(tiler.encoder.format(), TileFormat::Jpeg);
    assert!(!tiler.progress);

    let config = config_from_args(&args(vec!["test", "--tilesize=big"]));
    assert!(config.is_err());
    let config = config_from_args(&args(vec!["test", "--format=gif"])).unwrap();
    assert!(tiler_from_args(&config, &matches).is_err());
}

#[test]
fn test_config_file() {
    let mut dir = env::temp_dir();
    dir.push("mbtiler_runtime_config_test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mbtiler.toml");
    fs::write(&path, "[tiling]\ntile_size = 128\n[metadata]\nname = \"Test\"\n").unwrap();
    let cfgpath = path.to_str().unwrap();

    let config = config_from_args(&args(vec!["test", "-c", cfgpath])).unwrap();
    assert_eq!(config.tiling.tile_size, 128);
    assert_eq!(config.metadata.name, Some("Test".to_string()));
    let config = config_from_args(&args(vec!["test", "-c", cfgpath, "-n", "Other"])).unwrap();
    assert_eq!(config.metadata.name, Some("Other".to_string()));

    let err = config_from_args(&args(vec!["test", "-c", "missing.toml"])).err();
    assert_eq!(
        err,
        Some("Error reading configuration - Could not find config file!".to_string())
    );
}

#[test]
fn test_gen_config() {
    let toml = gen_config(&args(vec!["test"])).unwrap();
    assert_eq!(Some("# mbtiler configuration"), toml.lines().next());
    let config: ApplicationCfg = parse_config(toml, "").unwrap();
    assert_eq!(config.tiling.tile_size, 256);

    let toml = gen_config(&args(vec!["test", "--tilesize=512", "-o"])).unwrap();
    assert!(toml.contains("tile_size = 512"));
    let config: ApplicationCfg = parse_config(toml, "").unwrap();
    assert!(config.metadata.overlay);
}
