//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Grid iterators

use crate::grid::{Pyramid, TileAddress};

/// Level-by-level iterator, finest level first.
///
/// Within a level, all rows of a column are visited before the next column.
pub struct GridIterator {
    z: u8,
    x: u32,
    y: u32,
    minz: u8,
    /// (columns, rows) per zoom level
    limits: Vec<(u32, u32)>,
    finished: bool,
}

impl GridIterator {
    pub fn new(pyramid: &Pyramid) -> GridIterator {
        GridIterator::with_levels(pyramid, pyramid.minzoom(), pyramid.maxzoom())
    }
    pub fn with_levels(pyramid: &Pyramid, minz: u8, maxz: u8) -> GridIterator {
        if minz <= maxz && maxz <= pyramid.maxzoom() {
            let limits = (0..pyramid.nlevels())
                .map(|zoom| pyramid.level_limit(zoom))
                .collect();
            GridIterator {
                z: maxz,
                x: 0,
                y: 0,
                minz,
                limits,
                finished: false,
            }
        } else {
            // Return "empty" iterator for invalid parameters
            GridIterator {
                z: 0,
                x: 0,
                y: 0,
                minz: 0,
                limits: Vec::new(),
                finished: true,
            }
        }
    }
}

impl Iterator for GridIterator {
    type Item = TileAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = TileAddress::new(self.z, self.x, self.y);
        let (maxx, maxy) = self.limits[self.z as usize];
        if self.y < maxy - 1 {
            self.y += 1;
        } else if self.x < maxx - 1 {
            self.x += 1;
            self.y = 0;
        } else if self.z > self.minz {
            self.z -= 1;
            self.x = 0;
            self.y = 0;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

#[test]
fn test_pyramid_iter() {
    let pyramid = Pyramid::new(1000, 600, 256).unwrap();
    assert_eq!(pyramid.maxzoom(), 2);
    let cells = GridIterator::new(&pyramid)
        .map(|a| (a.zoom, a.column, a.row))
        .collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![
            (2, 0, 0),
            (2, 0, 1),
            (2, 0, 2),
            (2, 1, 0),
            (2, 1, 1),
            (2, 1, 2),
            (2, 2, 0),
            (2, 2, 1),
            (2, 2, 2),
            (2, 3, 0),
            (2, 3, 1),
            (2, 3, 2),
            (1, 0, 0),
            (1, 0, 1),
            (1, 1, 0),
            (1, 1, 1),
            (0, 0, 0),
        ]
    );

    let cells = GridIterator::with_levels(&pyramid, 0, 1)
        .map(|a| (a.zoom, a.column, a.row))
        .collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![(1, 0, 0), (1, 0, 1), (1, 1, 0), (1, 1, 1), (0, 0, 0)]
    );

    let single = Pyramid::new(10, 10, 256).unwrap();
    let cells = GridIterator::new(&single).collect::<Vec<_>>();
    assert_eq!(cells, vec![TileAddress::new(0, 0, 0)]);
}

#[test]
fn test_bad_params() {
    let pyramid = Pyramid::new(1000, 600, 256).unwrap();

    // minz > maxz
    let cells = GridIterator::with_levels(&pyramid, 2, 1).collect::<Vec<_>>();
    assert_eq!(cells, vec![]);

    // maxz > pyramid maxzoom
    let cells = GridIterator::with_levels(&pyramid, 0, 3).collect::<Vec<_>>();
    assert_eq!(cells, vec![]);
}
