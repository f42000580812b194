//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::tiler::{GenerationState, Tiler};
use mbtiler_core::core::config::{parse_config, ApplicationCfg};
use mbtiler_core::core::Config;
use mbtiler_core::datasource::{ImageRaster, PixelBuffer, RasterExtent, RasterSource};
use mbtiler_core::store::{MbtilesStore, Memstore, TileStore};
use mbtiler_core::tile::{ImageTileEncoder, TileFormat};
use mbtiler_core::{Error, Result};
use std::env;
use std::fs;
use tile_pyramid::{GridIterator, Pyramid, ReadWindow, TileAddress};

const GEO_TRANSFORM: [f64; 6] = [2600000.0, 0.5, 0.0, 1200000.0, 0.0, -0.5];

/// Raster with constant band values 10, 20, 30, ...
fn raster(width: u32, height: u32, bands: u8) -> ImageRaster {
    let len = width as usize * height as usize;
    let mut planes = Vec::with_capacity(len * bands as usize);
    for band in 0..bands {
        planes.extend(vec![10 * (band + 1); len]);
    }
    let extent = RasterExtent {
        width,
        height,
        bands,
        geo_transform: GEO_TRANSFORM,
    };
    ImageRaster::from_planes(extent, planes).unwrap()
}

fn png_tiler(tile_size: u32) -> Tiler {
    let mut tiler = Tiler::new(Box::new(ImageTileEncoder::new(TileFormat::Png)));
    tiler.tile_size = tile_size;
    tiler
}

/// Records write and commit order
#[derive(Default)]
struct RecordingStore {
    tiles: Vec<TileAddress>,
    commits: Vec<usize>,
}

impl TileStore for RecordingStore {
    fn info(&self) -> String {
        "Recording store".to_string()
    }
    fn write_tile(&mut self, address: &TileAddress, _data: &[u8]) -> Result<()> {
        self.tiles.push(*address);
        Ok(())
    }
    fn commit(&mut self) -> Result<()> {
        self.commits.push(self.tiles.len());
        Ok(())
    }
}

struct BrokenSource {
    extent: RasterExtent,
}

impl RasterSource for BrokenSource {
    fn info(&self) -> String {
        "Broken source".to_string()
    }
    fn extent(&self) -> &RasterExtent {
        &self.extent
    }
    fn read_window(
        &self,
        _window: &ReadWindow,
        _size: (u32, u32),
        _bands: u8,
    ) -> Result<PixelBuffer> {
        Err(Error::Source("read failed".to_string()))
    }
}

#[test]
fn test_square_raster() {
    let tiler = png_tiler(256);
    let mut store = Memstore::new();
    let summary = tiler.generate(&raster(512, 512, 3), &mut store).unwrap();
    assert_eq!(summary.tiles, 5);
    assert_eq!(summary.maxzoom, 1);
    assert_eq!(summary.commits, 1);
    let addresses: Vec<TileAddress> = store.tiles.keys().cloned().collect();
    assert_eq!(
        addresses,
        vec![
            TileAddress::new(0, 0, 0),
            TileAddress::new(1, 0, 0),
            TileAddress::new(1, 0, 1),
            TileAddress::new(1, 1, 0),
            TileAddress::new(1, 1, 1),
        ]
    );
    for data in store.tiles.values() {
        let img = image::load_from_memory(data).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (256, 256));
        assert!(img.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }
    assert_eq!(summary.stats.zooms(), vec![0, 1]);
    assert_eq!(summary.stats.level(1).tiles, 4);
    assert_eq!(summary.stats.level(0).tiles, 1);
}

#[test]
fn test_edge_tiles() {
    let tiler = png_tiler(256);
    let mut store = Memstore::new();
    let summary = tiler.generate(&raster(300, 256, 3), &mut store).unwrap();
    assert_eq!(summary.maxzoom, 1);
    assert_eq!(summary.tiles, 3);

    // 44 pixel column at the finest level
    let data = store.tile(&TileAddress::new(1, 1, 0)).unwrap();
    let img = image::load_from_memory(data).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(img.get_pixel(43, 255).0, [10, 20, 30, 255]);
    assert_eq!(img.get_pixel(44, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(255, 255).0, [0, 0, 0, 0]);

    // 150x128 pixels at the bottom left of the overview tile
    let data = store.tile(&TileAddress::new(0, 0, 0)).unwrap();
    let img = image::load_from_memory(data).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(149, 128).0, [10, 20, 30, 255]);
    assert_eq!(img.get_pixel(0, 255).0, [10, 20, 30, 255]);
    assert_eq!(img.get_pixel(150, 128).0[3], 0);
    assert_eq!(img.get_pixel(0, 127).0[3], 0);
}

#[test]
fn test_generation_order() {
    let pyramid = Pyramid::new(100, 60, 8).unwrap();
    let tiler = png_tiler(8);
    let mut store = RecordingStore::default();
    tiler.generate(&raster(100, 60, 1), &mut store).unwrap();
    let expected: Vec<TileAddress> = GridIterator::new(&pyramid).collect();
    assert_eq!(store.tiles, expected);
    assert_eq!(store.tiles[0], TileAddress::new(4, 0, 0));
    assert_eq!(store.tiles[1], TileAddress::new(4, 0, 1));
    assert_eq!(store.tiles.last(), Some(&TileAddress::new(0, 0, 0)));
}

#[test]
fn test_commit_batches() {
    let mut tiler = png_tiler(8);
    tiler.commit_batch = 50;
    let mut store = RecordingStore::default();
    let summary = tiler.generate(&raster(100, 60, 1), &mut store).unwrap();
    assert_eq!(summary.tiles, 143);
    assert_eq!(summary.commits, 3);
    assert_eq!(store.commits, vec![50, 100, 143]);

    // Batch size dividing the tile count
    let mut tiler = png_tiler(256);
    tiler.commit_batch = 5;
    let mut store = RecordingStore::default();
    tiler.generate(&raster(512, 512, 3), &mut store).unwrap();
    assert_eq!(store.commits, vec![5, 5]);
}

#[test]
fn test_generation_state() {
    let mut state = GenerationState::default();
    assert!(!state.tile_written(2));
    assert!(state.tile_written(2));
    state.committed();
    assert_eq!(state.uncommitted, 0);
    assert!(!state.tile_written(2));
    assert_eq!(state.tileno, 3);
    assert_eq!(state.commits, 1);
}

#[test]
fn test_jpeg_tiles() {
    let mut tiler = Tiler::new(Box::new(ImageTileEncoder::new(TileFormat::Jpeg)));
    tiler.tile_size = 64;
    tiler.fill = 255;
    let mut store = Memstore::new();
    let summary = tiler.generate(&raster(100, 64, 3), &mut store).unwrap();
    assert_eq!(summary.tiles, 3);
    let data = store.tile(&TileAddress::new(1, 1, 0)).unwrap();
    assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    let img = image::load_from_memory(data).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);

    // JPEG can't hold 2 bands
    let mut store = Memstore::new();
    match tiler.generate(&raster(100, 64, 2), &mut store) {
        Err(Error::Config(_)) => {}
        _ => panic!("2 band raster accepted for JPEG tiles"),
    }
    assert_eq!(store.tile_count(), 0);
}

#[test]
fn test_band_clamping() {
    let tiler = png_tiler(16);
    let mut store = Memstore::new();
    tiler.generate(&raster(16, 16, 4), &mut store).unwrap();
    let data = store.tile(&TileAddress::new(0, 0, 0)).unwrap();
    let img = image::load_from_memory(data).unwrap();
    // 4th source band replaced by alpha
    assert_eq!(img.to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn test_source_error() {
    let tiler = png_tiler(256);
    let source = BrokenSource {
        extent: RasterExtent {
            width: 512,
            height: 512,
            bands: 3,
            geo_transform: GEO_TRANSFORM,
        },
    };
    let mut store = Memstore::new();
    assert!(tiler.generate(&source, &mut store).is_err());
    assert_eq!(store.tile_count(), 0);
    assert_eq!(store.commits, 0);
}

#[test]
fn test_duplicate_write() {
    let tiler = png_tiler(256);
    let mut store = Memstore::new();
    store.write_tile(&TileAddress::new(0, 0, 0), &[]).unwrap();
    match tiler.generate(&raster(256, 256, 3), &mut store) {
        Err(Error::DuplicateTile(address)) => assert_eq!(address, TileAddress::new(0, 0, 0)),
        _ => panic!("duplicate tile not detected"),
    }
}

#[test]
fn test_run() {
    let mut dir = env::temp_dir();
    dir.push("mbtiler_tiler_test");
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("ortho.png");
    let output = dir.join("ortho.mbtiles");
    let _ = fs::remove_file(&output);
    let img = image::RgbImage::from_fn(300, 200, |_, _| image::Rgb([10, 20, 30]));
    img.save(&input).unwrap();
    fs::write(dir.join("ortho.pgw"), "0.5\n0\n0\n-0.5\n2600000.25\n1199999.75\n").unwrap();

    let mut tiler = png_tiler(128);
    tiler.metadata.description = Some("Test orthophoto".to_string());
    let input = input.to_str().unwrap();
    let output = output.to_str().unwrap();
    let summary = tiler.run(input, output).unwrap();
    // maxzoom 2: 3x2 + 2x1 + 1 tiles
    assert_eq!(summary.maxzoom, 2);
    assert_eq!(summary.tiles, 9);

    let store = MbtilesStore::open(output).unwrap();
    assert_eq!(store.tile_count().unwrap(), 9);
    let metadata = store.metadata().unwrap();
    let value = |name: &str| {
        metadata
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_eq!(value("name"), "ortho.png");
    assert_eq!(value("version"), "1.0");
    assert_eq!(value("description"), "Test orthophoto");
    assert_eq!(value("maxzoom"), "2");
    assert_eq!(value("minzoom"), "0");
    assert_eq!(value("format"), "png");
    assert_eq!(value("type"), "baselayer");
    assert_eq!(value("bounds"), "2600000,1199900,2600150,1200000");
    drop(store);

    match tiler.run(input, output) {
        Err(Error::AlreadyExists(_)) => {}
        _ => panic!("existing output overwritten"),
    }
}

#[test]
fn test_run_with_invalid_settings() {
    let mut dir = env::temp_dir();
    dir.push("mbtiler_tiler_test");
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("gray.png");
    let output = dir.join("gray.mbtiles");
    let _ = fs::remove_file(&output);
    let img = image::GrayAlphaImage::from_fn(64, 64, |_, _| image::LumaA([100, 255]));
    img.save(&input).unwrap();
    let input = input.to_str().unwrap();
    let output_path = output.clone();
    let output = output.to_str().unwrap();

    // Gray + alpha can't be written as JPEG
    let mut tiler = Tiler::new(Box::new(ImageTileEncoder::new(TileFormat::Jpeg)));
    tiler.tile_size = 32;
    match tiler.run(input, output) {
        Err(Error::Config(_)) => {}
        _ => panic!("2 band raster accepted for JPEG tiles"),
    }
    assert!(!output_path.exists());

    let mut tiler = png_tiler(32);
    tiler.commit_batch = 0;
    match tiler.run(input, output) {
        Err(Error::Config(_)) => {}
        _ => panic!("commit_batch 0 accepted"),
    }
    assert!(!output_path.exists());

    // Missing input
    let missing = dir.join("missing.png");
    let missing = missing.to_str().unwrap();
    let tiler = png_tiler(32);
    assert!(tiler.run(missing, output).is_err());
    assert!(!output_path.exists());

    let summary = tiler.run(input, output).unwrap();
    assert_eq!(summary.tiles, 5);
    let store = MbtilesStore::open(output).unwrap();
    assert_eq!(store.tile_count().unwrap(), 5);
    drop(store);

    // Existing output is reported before the input is read
    match tiler.run(missing, output) {
        Err(Error::AlreadyExists(p)) => assert_eq!(p, output_path),
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("existing output overwritten"),
    }
}

#[test]
fn test_runtime_config_quoting() {
    let mut tiler = png_tiler(256);
    tiler.metadata.name = Some(r#"Ortho "2021" C:\data\ortho"#.to_string());
    tiler.metadata.description = Some("Line one\nQuote \"".to_string());
    let config: ApplicationCfg =
        parse_config(tiler.gen_runtime_config(), "mbtiler.toml").unwrap();
    assert_eq!(config.metadata.name, tiler.metadata.name);
    assert_eq!(config.metadata.description, tiler.metadata.description);
    assert_eq!(config.metadata.version, None);
}

#[test]
fn test_config() {
    let config: ApplicationCfg = parse_config(Tiler::gen_config(), "mbtiler.toml").unwrap();
    let tiler = Tiler::from_config(&config).unwrap();
    assert_eq!(tiler.tile_size, 256);
    assert_eq!(tiler.commit_batch, 1000);
    assert_eq!(tiler.metadata.version, Some("1.0".to_string()));
    assert!(!tiler.metadata.overlay);

    let toml = r#"
        [tiling]
        tile_size = 512
        format = "jpg"
        fill = 255

        [metadata]
        name = "Orthophoto"
        overlay = true
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "mbtiler.toml").unwrap();
    let tiler = Tiler::from_config(&config).unwrap();
    assert_eq!(tiler.tile_size, 512);
    assert_eq!(tiler.fill, 255);
    assert_eq!(tiler.encoder.format(), TileFormat::Jpeg);
    let runtime_cfg = tiler.gen_runtime_config();
    assert!(runtime_cfg.contains(r#"format = "jpg""#));
    assert!(runtime_cfg.contains(r#"name = "Orthophoto""#));
    let config: ApplicationCfg = parse_config(runtime_cfg, "mbtiler.toml").unwrap();
    assert!(config.metadata.overlay);

    let toml = "[tiling]\ntile_size = 0\n";
    let config: ApplicationCfg = parse_config(toml.to_string(), "mbtiler.toml").unwrap();
    assert!(Tiler::from_config(&config).is_err());
}
