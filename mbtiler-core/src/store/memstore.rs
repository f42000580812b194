//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::{Error, Result};
use crate::store::store::TileStore;
use std::collections::BTreeMap;
use tile_pyramid::TileAddress;

/// In-memory tile store
#[derive(Default, Debug)]
pub struct Memstore {
    pub tiles: BTreeMap<TileAddress, Vec<u8>>,
    /// Number of commits
    pub commits: u64,
    /// Tiles written since the last commit
    pub pending: u64,
}

impl Memstore {
    pub fn new() -> Memstore {
        Memstore::default()
    }
    pub fn tile(&self, address: &TileAddress) -> Option<&Vec<u8>> {
        self.tiles.get(address)
    }
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl TileStore for Memstore {
    fn info(&self) -> String {
        "In-memory tile store".to_string()
    }
    fn write_tile(&mut self, address: &TileAddress, data: &[u8]) -> Result<()> {
        if self.tiles.contains_key(address) {
            return Err(Error::DuplicateTile(*address));
        }
        self.tiles.insert(*address, data.to_vec());
        self.pending += 1;
        Ok(())
    }
    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        self.pending = 0;
        Ok(())
    }
}
