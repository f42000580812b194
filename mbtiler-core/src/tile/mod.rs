//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod compositor;
pub mod encoder;


pub use self::compositor::{TileBuffer, TileCompositor};
pub use self::encoder::{ImageTileEncoder, TileEncoder, TileFormat};
