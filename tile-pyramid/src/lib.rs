//! A library for local raster pyramid calculations
//!
//! ## Pyramid levels
//!
//! ```rust
//! use tile_pyramid::Pyramid;
//!
//! let pyramid = Pyramid::new(512, 512, 256).unwrap();
//! assert_eq!(pyramid.maxzoom(), 1);
//! assert_eq!(pyramid.tile_count(), 5);
//! ```
//!
//! ## Tile windows
//!
//! ```rust
//! use tile_pyramid::{Pyramid, ReadWindow};
//!
//! let pyramid = Pyramid::new(300, 256, 256).unwrap();
//! let tile = pyramid.tile_window(1, 1, 0).unwrap();
//! assert_eq!(
//!     tile.read,
//!     ReadWindow {
//!         x: 256,
//!         y: 0,
//!         width: 44,
//!         height: 256,
//!     }
//! );
//! assert_eq!(tile.placement.dxsize, 44);
//! ```
//!
//! ## Grid iterators
//!
//! ```rust
//! use tile_pyramid::{GridIterator, Pyramid};
//!
//! let pyramid = Pyramid::new(1000, 600, 256).unwrap();
//! for tile in GridIterator::new(&pyramid) {
//!     println!("Tile {}", tile);
//! }
//! ```

mod grid;
mod grid_iterator;

pub use grid::{
    Extent, Pyramid, PyramidError, ReadWindow, TileAddress, TilePlacement, TileWindow,
};
pub use grid_iterator::GridIterator;
