//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod mbtiles;
pub mod memstore;
pub mod metadata;
pub mod store;


pub use self::mbtiles::{MbtilesStore, OutputClaim};
pub use self::memstore::Memstore;
pub use self::metadata::{LayerType, PyramidMetadata};
pub use self::store::TileStore;
