//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::datasources::open_raster;
use mbtiler_core::core::config::{ApplicationCfg, MetadataCfg};
use mbtiler_core::core::stats::TileSizes;
use mbtiler_core::core::Config;
use mbtiler_core::datasource::{RasterExtent, RasterSource};
use mbtiler_core::store::{MbtilesStore, OutputClaim, PyramidMetadata, TileStore};
use mbtiler_core::tile::{ImageTileEncoder, TileCompositor, TileEncoder};
use mbtiler_core::{Error, Result};
use pbr::ProgressBar;
use std::io::Stdout;
use std::path::Path;
use std::time::Instant;
use tile_pyramid::{GridIterator, Pyramid, TileAddress};

/// Raster to tile pyramid generator
pub struct Tiler {
    pub tile_size: u32,
    pub encoder: Box<dyn TileEncoder>,
    /// Value of tile pixels outside the raster
    pub fill: u8,
    /// Number of tiles per store transaction
    pub commit_batch: u64,
    pub progress: bool,
    pub metadata: MetadataCfg,
}

/// Progress of a generation run
#[derive(Default, Debug)]
pub struct GenerationState {
    /// Number of tiles written
    pub tileno: u64,
    /// Tiles written since the last commit
    pub uncommitted: u64,
    pub commits: u64,
}

impl GenerationState {
    /// Count a written tile. Returns true when a commit is due.
    pub fn tile_written(&mut self, commit_batch: u64) -> bool {
        self.tileno += 1;
        self.uncommitted += 1;
        self.uncommitted >= commit_batch
    }
    pub fn committed(&mut self) {
        self.commits += 1;
        self.uncommitted = 0;
    }
}

/// Result of a generation run
#[derive(Debug)]
pub struct GenerationSummary {
    pub tiles: u64,
    pub commits: u64,
    pub maxzoom: u8,
    /// Encoded tile sizes per zoom level
    pub stats: TileSizes,
}

impl Tiler {
    pub fn new(encoder: Box<dyn TileEncoder>) -> Tiler {
        Tiler {
            tile_size: 256,
            encoder,
            fill: 0,
            commit_batch: 1000,
            progress: false,
            metadata: MetadataCfg::default(),
        }
    }
    fn compositor(&self) -> TileCompositor {
        TileCompositor::new(
            self.tile_size,
            self.fill,
            self.encoder.format().supports_alpha(),
        )
    }
    fn check_settings(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(Error::Config("tile_size must be positive".to_string()));
        }
        if self.commit_batch == 0 {
            return Err(Error::Config("commit_batch must be positive".to_string()));
        }
        Ok(())
    }
    /// Pyramid over a raster with `extent`, if it can be tiled with the
    /// current settings
    pub fn check(&self, extent: &RasterExtent) -> Result<Pyramid> {
        self.check_settings()?;
        let pyramid = Pyramid::new(extent.width, extent.height, self.tile_size)?;
        let bands = extent.tile_bands();
        if bands == 0 {
            return Err(Error::Source("Raster has no bands".to_string()));
        }
        let format = self.encoder.format();
        if !format.supports_bands(self.compositor().tile_bands(bands)) {
            return Err(Error::Config(format!(
                "Can't write {} band raster into {} tiles",
                bands, format
            )));
        }
        Ok(pyramid)
    }
    /// Checked pyramid over a raster with `extent`
    pub fn plan(&self, extent: &RasterExtent) -> Result<Pyramid> {
        let pyramid = self.check(extent)?;
        info!(
            "Size: {} x {} x {}",
            extent.width, extent.height, extent.bands
        );
        info!("Bounds: {}", extent.bounds().bounds_string());
        info!(
            "Format of tiles: {} / Size of a tile: {} x {} pixels",
            self.encoder.format(),
            self.tile_size,
            self.tile_size
        );
        info!("Count of tiles: {}", pyramid.tile_count());
        info!("Zoom levels of the pyramid: {}", pyramid.maxzoom());
        info!(
            "Pixel resolution by zoomlevels: {:?}",
            pyramid.resolutions(extent.pixel_size())
        );
        Ok(pyramid)
    }
    /// Store metadata for a pyramid named `name` unless configured otherwise
    pub fn pyramid_metadata(
        &self,
        name: &str,
        extent: &RasterExtent,
        pyramid: &Pyramid,
    ) -> PyramidMetadata {
        PyramidMetadata::new(
            &self.metadata,
            name,
            extent,
            pyramid,
            self.encoder.format(),
        )
    }
    fn progress_bar(&self, tiles: u64) -> ProgressBar<Stdout> {
        let mut pb = ProgressBar::new(tiles);
        pb.show_speed = false;
        pb.show_percent = false;
        pb.show_time_left = false;
        pb
    }
    /// Write all tiles of the pyramid over `source` into `store`
    pub fn generate<S, T>(&self, source: &S, store: &mut T) -> Result<GenerationSummary>
    where
        S: RasterSource + ?Sized,
        T: TileStore + ?Sized,
    {
        let extent = source.extent();
        let pyramid = self.plan(extent)?;
        let bands = extent.tile_bands();
        let compositor = self.compositor();
        info!("{}", source.info());
        info!("{}", store.info());

        let mut state = GenerationState::default();
        let mut stats = TileSizes::new();
        let mut pb = self.progress_bar(pyramid.tile_count());
        let mut pb_z = None;
        for address in GridIterator::new(&pyramid) {
            if pb_z != Some(address.zoom) {
                pb_z = Some(address.zoom);
                let (cols, rows) = pyramid.level_limit(address.zoom);
                debug!(
                    "Zoom {} - pixel {:.20} - {} x {} tiles",
                    address.zoom,
                    pyramid.pixel_scale(extent.pixel_size(), address.zoom),
                    cols,
                    rows
                );
                if self.progress {
                    pb.message(&format!("Level {}: ", address.zoom));
                    pb.tick();
                }
            }
            let tile = self.render_tile(source, &pyramid, &compositor, &address, bands)?;
            store.write_tile(&address, &tile)?;
            stats.add(address.zoom, tile.len() as u64);
            if state.tile_written(self.commit_batch) {
                store.commit()?;
                state.committed();
                debug!("Committed {} tiles", state.tileno);
            }
            if self.progress {
                pb.inc();
            }
        }
        store.commit()?;
        state.committed();
        if self.progress {
            pb.finish();
        }
        Ok(GenerationSummary {
            tiles: state.tileno,
            commits: state.commits,
            maxzoom: pyramid.maxzoom(),
            stats,
        })
    }
    fn render_tile<S>(
        &self,
        source: &S,
        pyramid: &Pyramid,
        compositor: &TileCompositor,
        address: &TileAddress,
        bands: u8,
    ) -> Result<Vec<u8>>
    where
        S: RasterSource + ?Sized,
    {
        let window = pyramid
            .tile_window(address.zoom, address.column, address.row)
            .ok_or_else(|| Error::Config(format!("Tile {} outside of pyramid", address)))?;
        trace!(
            "Tile {} - read {:?} - placement {:?}",
            address,
            window.read,
            window.placement
        );
        let placement = &window.placement;
        let data = source.read_window(
            &window.read,
            (placement.dxsize, placement.dysize),
            bands,
        )?;
        let tile = compositor.compose(&data, placement)?;
        self.encoder.encode(&tile)
    }
    /// Tile raster file `input` into the new MBTiles file `output`.
    ///
    /// Nothing is left at `output` when the raster can't be opened or tiled
    /// with the current settings.
    pub fn run(&self, input: &str, output: &str) -> Result<GenerationSummary> {
        let now = Instant::now();
        self.check_settings()?;
        let claim = OutputClaim::new(output)?;
        let source = open_raster(input)?;
        let extent = source.extent();
        let pyramid = self.check(extent)?;
        let name = Path::new(input)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(input.to_string());
        let metadata = self.pyramid_metadata(&name, extent, &pyramid);
        let mut store = MbtilesStore::create_claimed(claim, &metadata.rows())?;
        let summary = self.generate(&source, &mut store)?;
        store.finish()?;
        info!(
            "{} tiles written into {} in {}s",
            summary.tiles,
            output,
            now.elapsed().as_secs()
        );
        for zoom in summary.stats.zooms() {
            debug!("Level {}: {}", zoom, summary.stats.level(zoom));
        }
        Ok(summary)
    }
}

impl<'a> Config<'a, ApplicationCfg> for Tiler {
    fn from_config(config: &ApplicationCfg) -> std::result::Result<Self, String> {
        let tiling = &config.tiling;
        if tiling.tile_size == 0 {
            return Err("tile_size must be positive".to_string());
        }
        if tiling.commit_batch == 0 {
            return Err("commit_batch must be positive".to_string());
        }
        let encoder = ImageTileEncoder::from_config(tiling)?;
        Ok(Tiler {
            tile_size: tiling.tile_size,
            encoder: Box::new(encoder),
            fill: tiling.fill,
            commit_batch: tiling.commit_batch,
            progress: false,
            metadata: config.metadata.clone(),
        })
    }
    fn gen_config() -> String {
        let mut config = String::new();
        config.push_str(TOML_HEADER);
        config.push_str(&ImageTileEncoder::gen_config());
        config.push_str(TOML_METADATA);
        config
    }
    fn gen_runtime_config(&self) -> String {
        let mut config = String::new();
        config.push_str(TOML_HEADER);
        config.push_str(&format!(
            r#"
[tiling]
tile_size = {}
format = "{}"
fill = {}
commit_batch = {}
"#,
            self.tile_size,
            self.encoder.format(),
            self.fill,
            self.commit_batch
        ));
        config.push_str("\n[metadata]\n");
        let entries = [
            ("name", &self.metadata.name),
            ("description", &self.metadata.description),
            ("version", &self.metadata.version),
        ];
        for (key, value) in entries.iter() {
            if let Some(value) = value {
                let value = toml::Value::String(value.to_string());
                config.push_str(&format!("{} = {}\n", key, value));
            }
        }
        config.push_str(&format!("overlay = {}\n", self.metadata.overlay));
        config
    }
}

const TOML_HEADER: &'static str = "# mbtiler configuration\n";

const TOML_METADATA: &'static str = r#"
[metadata]
# Tileset name (Default: input file name)
#name = "ortho"
#description = ""
version = "1.0"
# Publish as overlay instead of baselayer
overlay = false
"#;
