//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! ESRI world files

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Candidate world file paths of a raster, most specific first
pub fn world_file_candidates(raster: &Path) -> Vec<PathBuf> {
    let ext = raster
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mut exts = Vec::new();
    if ext.len() >= 2 {
        // foo.png -> foo.pgw
        let mut chars = ext.chars();
        let first = chars.next().unwrap_or_default();
        let last = chars.last().unwrap_or_default();
        exts.push(format!("{}{}w", first, last));
    }
    if !ext.is_empty() {
        exts.push(format!("{}w", ext));
    }
    exts.push("wld".to_string());
    exts.iter().map(|e| raster.with_extension(e)).collect()
}

/// Parse world file content into a GDAL geotransform.
///
/// World files reference the centre of the upper left pixel, the
/// geotransform its outer corner.
pub fn parse_world_file(content: &str) -> Result<[f64; 6]> {
    let values = content
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Source(format!("Invalid world file: {}", e)))?;
    if values.len() != 6 {
        return Err(Error::Source(format!(
            "Invalid world file: expected 6 values, found {}",
            values.len()
        )));
    }
    let (a, d, b, e, c, f) = (
        values[0], values[1], values[2], values[3], values[4], values[5],
    );
    Ok([
        c - a / 2.0 - b / 2.0,
        a,
        b,
        f - d / 2.0 - e / 2.0,
        d,
        e,
    ])
}

/// Geotransform from the world file next to `raster`, if any
pub fn read_world_file(raster: &Path) -> Result<Option<[f64; 6]>> {
    for candidate in world_file_candidates(raster) {
        if candidate.is_file() {
            debug!("Reading world file {}", candidate.display());
            let content = fs::read_to_string(&candidate)?;
            return parse_world_file(&content).map(Some);
        }
    }
    Ok(None)
}
