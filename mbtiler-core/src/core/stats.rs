//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Encoded tile sizes per zoom level

use stats::MinMax;
use std::collections::BTreeMap;
use std::fmt;

/// Size report of one zoom level
#[derive(Debug, Default, PartialEq)]
pub struct LevelSizes {
    pub tiles: usize,
    pub bytes: u64,
    pub min: u64,
    pub max: u64,
}

impl LevelSizes {
    pub fn mean(&self) -> f64 {
        if self.tiles == 0 {
            0.0
        } else {
            self.bytes as f64 / self.tiles as f64
        }
    }
}

impl fmt::Display for LevelSizes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} tiles, {} bytes (min: {}, max: {}, mean: {:.1})",
            self.tiles,
            self.bytes,
            self.min,
            self.max,
            self.mean()
        )
    }
}

#[derive(Debug, Default)]
pub struct TileSizes {
    levels: BTreeMap<u8, (MinMax<u64>, u64)>,
}

impl TileSizes {
    pub fn new() -> TileSizes {
        TileSizes::default()
    }
    pub fn add(&mut self, zoom: u8, bytes: u64) {
        let (minmax, total) = self
            .levels
            .entry(zoom)
            .or_insert_with(|| (MinMax::new(), 0));
        minmax.add(bytes);
        *total += bytes;
    }
    /// Zoom levels with tiles, coarsest first
    pub fn zooms(&self) -> Vec<u8> {
        self.levels.keys().cloned().collect()
    }
    pub fn level(&self, zoom: u8) -> LevelSizes {
        match self.levels.get(&zoom) {
            Some((minmax, total)) => LevelSizes {
                tiles: minmax.len(),
                bytes: *total,
                min: minmax.min().cloned().unwrap_or(0),
                max: minmax.max().cloned().unwrap_or(0),
            },
            None => LevelSizes::default(),
        }
    }
}

#[test]
fn level_sizes() {
    let mut sizes = TileSizes::new();
    sizes.add(1, 100);
    sizes.add(1, 300);
    sizes.add(0, 50);
    sizes.add(1, 200);
    assert_eq!(sizes.zooms(), vec![0, 1]);
    assert_eq!(
        sizes.level(1),
        LevelSizes {
            tiles: 3,
            bytes: 600,
            min: 100,
            max: 300,
        }
    );
    assert_eq!(sizes.level(1).mean(), 200.0);
    assert_eq!(
        sizes.level(1).to_string(),
        "3 tiles, 600 bytes (min: 100, max: 300, mean: 200.0)"
    );
    assert_eq!(sizes.level(0).tiles, 1);
    assert_eq!(sizes.level(5), LevelSizes::default());
    assert_eq!(sizes.level(5).mean(), 0.0);
}
