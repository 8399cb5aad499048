//! Linear undo/redo over raster snapshots.

use super::error::EngineError;
use super::raster::Raster;
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};

/// Default number of snapshots retained (including the initial one).
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default payload size above which `Auto` compresses snapshots.
pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: usize = 256 * 1024;

/// Compression preference for stored snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Keep raw pixel copies (fastest undo/redo, most memory).
    Off,
    /// Always gzip snapshots.
    On,
    /// Gzip snapshots whose payload reaches the threshold.
    Auto { threshold_bytes: usize },
}

/// Runtime options for [`HistoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct HistoryOptions {
    /// Maximum number of snapshots kept; the oldest are dropped beyond it.
    pub max_entries: usize,
    pub compression: CompressionMode,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            compression: CompressionMode::Auto {
                threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            },
        }
    }
}

/// A snapshot as held in the store.
enum StoredSnapshot {
    Plain(Raster),
    Compressed {
        width: u32,
        height: u32,
        stride: usize,
        raw_len: usize,
        bytes: Vec<u8>,
    },
}

impl StoredSnapshot {
    fn memory_size(&self) -> usize {
        match self {
            StoredSnapshot::Plain(raster) => raster.byte_len(),
            StoredSnapshot::Compressed { bytes, .. } => bytes.len(),
        }
    }

    fn load(&self) -> Result<Raster, EngineError> {
        match self {
            StoredSnapshot::Plain(raster) => Ok(raster.clone()),
            StoredSnapshot::Compressed {
                width,
                height,
                stride,
                raw_len,
                bytes,
            } => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut raw = Vec::with_capacity(*raw_len);
                decoder.read_to_end(&mut raw)?;
                Raster::from_argb32(*width, *height, *stride, &raw).ok_or(
                    EngineError::InvalidDimensions {
                        width: *width,
                        height: *height,
                    },
                )
            }
        }
    }
}

/// Ordered stack of immutable surface snapshots with a cursor.
///
/// The cursor points at the snapshot matching the surface's current content.
/// Pushing while the cursor is not at the end discards the redo branch first,
/// giving standard linear (not tree) undo.
pub struct HistoryStore {
    snapshots: Vec<StoredSnapshot>,
    cursor: usize,
    options: HistoryOptions,
    total_memory: usize,
}

impl HistoryStore {
    /// Creates an empty store. Callers push the initial surface snapshot immediately.
    pub fn new(options: HistoryOptions) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: 0,
            options: HistoryOptions {
                max_entries: options.max_entries.max(2),
                ..options
            },
            total_memory: 0,
        }
    }

    /// Records a committed edit.
    ///
    /// Discards everything after the cursor, appends `snapshot` and moves the
    /// cursor onto it. When the store exceeds `max_entries`, the oldest
    /// snapshots are dropped.
    pub fn push(&mut self, snapshot: Raster) -> Result<(), EngineError> {
        let stored = self.store(snapshot)?;

        if !self.snapshots.is_empty() {
            for dropped in self.snapshots.drain(self.cursor + 1..) {
                self.total_memory -= dropped.memory_size();
            }
        }

        self.total_memory += stored.memory_size();
        self.snapshots.push(stored);
        self.cursor = self.snapshots.len() - 1;

        let excess = self.snapshots.len().saturating_sub(self.options.max_entries);
        if excess > 0 {
            for dropped in self.snapshots.drain(..excess) {
                self.total_memory -= dropped.memory_size();
            }
            self.cursor -= excess;
            log::debug!("History trimmed {} oldest snapshot(s)", excess);
        }

        log::debug!(
            "History push: {} snapshot(s), cursor {}, {} bytes",
            self.snapshots.len(),
            self.cursor,
            self.total_memory
        );
        Ok(())
    }

    /// Steps back one entry and returns the snapshot to restore.
    ///
    /// Fails with [`EngineError::EmptyHistory`] at the oldest entry.
    pub fn undo(&mut self) -> Result<Raster, EngineError> {
        let raster = self.peek_undo()?;
        self.step_back();
        Ok(raster)
    }

    /// Steps forward one entry and returns the snapshot to restore.
    ///
    /// Fails with [`EngineError::EmptyHistory`] at the newest entry.
    pub fn redo(&mut self) -> Result<Raster, EngineError> {
        let raster = self.peek_redo()?;
        self.step_forward();
        Ok(raster)
    }

    /// The snapshot [`HistoryStore::undo`] would return, leaving the cursor alone.
    pub fn peek_undo(&self) -> Result<Raster, EngineError> {
        if !self.can_undo() {
            return Err(EngineError::EmptyHistory);
        }
        self.snapshots[self.cursor - 1].load()
    }

    /// The snapshot [`HistoryStore::redo`] would return, leaving the cursor alone.
    pub fn peek_redo(&self) -> Result<Raster, EngineError> {
        if !self.can_redo() {
            return Err(EngineError::EmptyHistory);
        }
        self.snapshots[self.cursor + 1].load()
    }

    /// Moves the cursor back once the caller has applied [`HistoryStore::peek_undo`].
    pub(crate) fn step_back(&mut self) {
        if self.can_undo() {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor forward once the caller has applied [`HistoryStore::peek_redo`].
    pub(crate) fn step_forward(&mut self) {
        if self.can_redo() {
            self.cursor += 1;
        }
    }

    /// Drops every snapshot and starts over with `snapshot` as the only entry.
    pub fn reset(&mut self, snapshot: Raster) -> Result<(), EngineError> {
        let stored = self.store(snapshot)?;
        self.total_memory = stored.memory_size();
        self.snapshots = vec![stored];
        self.cursor = 0;
        Ok(())
    }

    /// Loads the snapshot under the cursor (the last committed state).
    pub fn current(&self) -> Result<Option<Raster>, EngineError> {
        self.snapshots
            .get(self.cursor)
            .map(StoredSnapshot::load)
            .transpose()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_entries(&self) -> usize {
        self.options.max_entries
    }

    /// Bytes held by stored snapshots (compressed size where applicable).
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    fn store(&self, raster: Raster) -> Result<StoredSnapshot, EngineError> {
        let compress = match self.options.compression {
            CompressionMode::Off => false,
            CompressionMode::On => true,
            CompressionMode::Auto { threshold_bytes } => raster.byte_len() >= threshold_bytes,
        };
        if !compress {
            return Ok(StoredSnapshot::Plain(raster));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(raster.bytes())?;
        let bytes = encoder.finish()?;
        Ok(StoredSnapshot::Compressed {
            width: raster.width(),
            height: raster.height(),
            stride: raster.stride(),
            raw_len: raster.byte_len(),
            bytes,
        })
    }
}
