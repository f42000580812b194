//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Error taxonomy of a tiling run. All errors are fatal.

use std::path::PathBuf;
use tile_pyramid::{PyramidError, TileAddress};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid arguments or configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// The output path already holds data
    #[error("Output file '{}' already exists", .0.display())]
    AlreadyExists(PathBuf),
    /// Raster can't be opened or read
    #[error("Raster source error: {0}")]
    Source(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tile encoding error: {0}")]
    Encode(String),
    #[error("Tile store error: {0}")]
    Store(#[from] rusqlite::Error),
    /// A tile address was written twice
    #[error("Duplicate tile {0}")]
    DuplicateTile(TileAddress),
}

impl From<PyramidError> for Error {
    fn from(err: PyramidError) -> Error {
        Error::Config(err.0)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
