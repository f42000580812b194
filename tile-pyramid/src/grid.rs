//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Local raster pyramid

use std::cmp;
use std::fmt;

/// Geographic extent
#[derive(PartialEq, Clone, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    /// Extent covered by a raster with a GDAL style affine geotransform.
    ///
    /// `minx`/`maxy` are taken from the raster origin, `maxx`/`miny` are
    /// advanced by the pixel size times the raster dimensions. With the usual
    /// negative pixel height `miny` ends up south of `maxy`.
    pub fn from_geotransform(gt: &[f64; 6], width: u32, height: u32) -> Extent {
        Extent {
            minx: gt[0],
            miny: gt[3] + gt[5] * height as f64,
            maxx: gt[0] + gt[1] * width as f64,
            maxy: gt[3],
        }
    }
    /// Bounds as `west,south,east,north`
    pub fn bounds_string(&self) -> String {
        format!("{},{},{},{}", self.minx, self.miny, self.maxx, self.maxy)
    }
}

/// Tile cell in TMS adressing scheme (row 0 is the bottom row)
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct TileAddress {
    pub zoom: u8,
    pub column: u32,
    pub row: u32,
}

impl TileAddress {
    pub fn new(zoom: u8, column: u32, row: u32) -> TileAddress {
        TileAddress { zoom, column, row }
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.column, self.row)
    }
}

/// Window of native raster pixels read for one tile
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ReadWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Size and offset of the decimated data within the tile canvas
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TilePlacement {
    pub dxsize: u32,
    pub dysize: u32,
    pub xoff: u32,
    pub yoff: u32,
}

impl TilePlacement {
    /// True if the placement covers the whole tile canvas
    pub fn is_full(&self, tile_size: u32) -> bool {
        self.dxsize == tile_size && self.dysize == tile_size
    }
}

/// Read window and canvas placement of a tile
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TileWindow {
    pub address: TileAddress,
    pub read: ReadWindow,
    pub placement: TilePlacement,
}

/// Invalid pyramid parameters
#[derive(PartialEq, Clone, Debug)]
pub struct PyramidError(pub String);

impl fmt::Display for PyramidError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PyramidError {}

/// Pixel doubling pyramid over a raster.
///
/// The finest level (`maxzoom`) maps one raster pixel to one tile pixel,
/// every coarser level halves the resolution. Level `zoom` covers windows
/// of `tile_size * 2^(maxzoom-zoom)` raster pixels per tile.
#[derive(Clone, Debug)]
pub struct Pyramid {
    /// Raster width in pixels
    width: u32,
    /// Raster height in pixels
    height: u32,
    /// The width and height of an individual tile, in pixels.
    tile_size: u32,
    maxzoom: u8,
}

impl Pyramid {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Result<Pyramid, PyramidError> {
        if width == 0 || height == 0 {
            return Err(PyramidError(format!(
                "Invalid raster size {}x{}",
                width, height
            )));
        }
        if tile_size == 0 {
            return Err(PyramidError("Tile size must be positive".to_string()));
        }
        Ok(Pyramid {
            width,
            height,
            tile_size,
            maxzoom: Pyramid::compute_maxzoom(width, height, tile_size),
        })
    }
    /// Smallest zoom level `z` with `tile_size * 2^z >= max(width, height)`
    pub fn compute_maxzoom(width: u32, height: u32, tile_size: u32) -> u8 {
        let maxdim = cmp::max(width, height) as u64;
        let mut zoom = 0;
        while (tile_size as u64) << zoom < maxdim {
            zoom += 1;
        }
        zoom
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
    pub fn minzoom(&self) -> u8 {
        0
    }
    pub fn maxzoom(&self) -> u8 {
        self.maxzoom
    }
    pub fn nlevels(&self) -> u8 {
        self.maxzoom + 1
    }
    /// Size represented by one tile pixel at `zoom`, in units of `base`
    pub fn pixel_scale(&self, base: f64, zoom: u8) -> f64 {
        base * 2f64.powi(self.maxzoom as i32 - zoom as i32)
    }
    /// Pixel scale of all levels, coarsest first
    pub fn resolutions(&self, base: f64) -> Vec<f64> {
        (0..self.nlevels())
            .map(|zoom| self.pixel_scale(base, zoom))
            .collect()
    }
    /// Edge length of the raster window covered by a full tile at `zoom`.
    ///
    /// Levels above `maxzoom` read raster pixels one to one, like `maxzoom`.
    pub fn window_size(&self, zoom: u8) -> u64 {
        (self.tile_size as u64) << self.maxzoom.saturating_sub(zoom)
    }
    /// Number of (columns, rows) of grid level, (0, 0) above `maxzoom`
    pub fn level_limit(&self, zoom: u8) -> (u32, u32) {
        if zoom > self.maxzoom {
            return (0, 0);
        }
        let window = self.window_size(zoom);
        let cols = (self.width as u64 + window - 1) / window;
        let rows = (self.height as u64 + window - 1) / window;
        (cols as u32, rows as u32)
    }
    /// Number of tiles of all levels
    pub fn tile_count(&self) -> u64 {
        (0..self.nlevels())
            .map(|zoom| {
                let (cols, rows) = self.level_limit(zoom);
                cols as u64 * rows as u64
            })
            .sum()
    }
    /// Length and destination size of the window at grid index `idx` along
    /// one raster axis of `extent` pixels.
    fn axis_window(&self, extent: u32, count: u32, idx: u32, window: u64) -> (u32, u32) {
        let remainder = extent as u64 % window;
        let rsize = if idx + 1 == count && remainder != 0 {
            remainder
        } else {
            window
        };
        // sliver windows still get one destination pixel
        let dsize = cmp::max(1, rsize * self.tile_size as u64 / window);
        (rsize as u32, dsize as u32)
    }
    /// Read window and placement of tile (`column`, `row`) at `zoom`.
    ///
    /// Rows are counted from the bottom of the raster, so the vertical origin
    /// of the read window is measured from the raster's last pixel row.
    /// The decimated data is anchored at the bottom-left of the canvas.
    pub fn tile_window(&self, zoom: u8, column: u32, row: u32) -> Option<TileWindow> {
        if zoom > self.maxzoom {
            return None;
        }
        let (cols, rows) = self.level_limit(zoom);
        if column >= cols || row >= rows {
            return None;
        }
        let window = self.window_size(zoom);
        let (rxsize, dxsize) = self.axis_window(self.width, cols, column, window);
        let (rysize, dysize) = self.axis_window(self.height, rows, row, window);
        let rx = column as u64 * window;
        let ry = self.height as u64 - row as u64 * window - rysize as u64;
        Some(TileWindow {
            address: TileAddress::new(zoom, column, row),
            read: ReadWindow {
                x: rx as u32,
                y: ry as u32,
                width: rxsize,
                height: rysize,
            },
            placement: TilePlacement {
                dxsize,
                dysize,
                xoff: 0,
                yoff: self.tile_size - dysize,
            },
        })
    }
}
