//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::Result;
use tile_pyramid::TileAddress;

/// Keyed, transactional tile store
pub trait TileStore {
    fn info(&self) -> String;
    /// Insert an encoded tile. Writing an address twice is an error.
    fn write_tile(&mut self, address: &TileAddress, data: &[u8]) -> Result<()>;
    /// Make all tiles written so far durable
    fn commit(&mut self) -> Result<()>;
}
