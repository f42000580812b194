//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! MBTiles tile store
//!
//! Tiles are stored with the bottom-up TMS row convention of the pyramid.

use crate::error::{Error, Result};
use crate::store::metadata::PyramidMetadata;
use crate::store::store::TileStore;
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tile_pyramid::TileAddress;

const SCHEMA: &str = r#"
CREATE TABLE tiles (
  zoom_level integer,
  tile_column integer,
  tile_row integer,
  tile_data blob);
CREATE UNIQUE INDEX tile_index on tiles
  (zoom_level, tile_column, tile_row);
CREATE TABLE "metadata" (
  "name" TEXT,
  "value" TEXT);
CREATE UNIQUE INDEX "name" ON "metadata"
  ("name");
"#;

const INSERT_TILE: &str =
    "INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)";

/// Output path created exclusively. The file is removed again when the claim
/// is dropped without being turned into a store.
pub struct OutputClaim {
    path: PathBuf,
    kept: bool,
}

impl OutputClaim {
    /// Create an empty file at `path`. Fails if `path` already exists.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<OutputClaim> {
        let path = path.as_ref();
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.to_path_buf()),
                _ => Error::Io(e),
            })?;
        Ok(OutputClaim {
            path: path.to_path_buf(),
            kept: false,
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for OutputClaim {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        debug!("Removing unused output {}", self.path.display());
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Couldn't remove {}: {}", self.path.display(), e);
        }
    }
}

pub struct MbtilesStore {
    path: PathBuf,
    conn: Connection,
    in_transaction: bool,
}

impl MbtilesStore {
    /// Create a new MBTiles file. Fails if `path` already exists.
    pub fn create<P: AsRef<Path>>(path: P, metadata: &PyramidMetadata) -> Result<MbtilesStore> {
        let claim = OutputClaim::new(path)?;
        MbtilesStore::create_claimed(claim, &metadata.rows())
    }
    /// Write schema and metadata `rows` into a claimed file.
    /// The file is removed if this fails.
    pub fn create_claimed(
        claim: OutputClaim,
        rows: &[(&str, String)],
    ) -> Result<MbtilesStore> {
        debug!("Creating MBTiles schema in {}", claim.path().display());
        let conn = Connection::open(claim.path())?;
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch("BEGIN")?;
        for (name, value) in rows {
            conn.execute(
                "INSERT INTO metadata (name, value) VALUES (?1, ?2)",
                params![name, value],
            )?;
        }
        conn.execute_batch("COMMIT")?;
        let mut store = MbtilesStore {
            path: claim.path().to_path_buf(),
            conn,
            in_transaction: false,
        };
        store.begin()?;
        claim.keep();
        Ok(store)
    }
    /// Open an existing MBTiles file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MbtilesStore> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("MBTiles file '{}' not found", path.display()),
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(MbtilesStore {
            path: path.to_path_buf(),
            conn,
            in_transaction: false,
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }
    /// Commit pending tiles and close the file
    pub fn finish(mut self) -> Result<()> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        self.conn.close().map_err(|(_, e)| Error::Store(e))
    }
    /// Metadata entries in insertion order
    pub fn metadata(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, value FROM metadata ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
    pub fn metadata_value(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
    pub fn tile(&self, address: &TileAddress) -> Result<Option<Vec<u8>>> {
        let data = self
            .conn
            .query_row(
                "SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
                params![address.zoom, address.column, address.row],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }
    pub fn tile_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM tiles", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => e.code == ErrorCode::ConstraintViolation,
        _ => false,
    }
}

impl TileStore for MbtilesStore {
    fn info(&self) -> String {
        format!("MBTiles file: {}", self.path.display())
    }
    fn write_tile(&mut self, address: &TileAddress, data: &[u8]) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_TILE)?;
        stmt.execute(params![address.zoom, address.column, address.row, data])
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    Error::DuplicateTile(*address)
                } else {
                    Error::Store(e)
                }
            })?;
        Ok(())
    }
    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        self.begin()
    }
}
