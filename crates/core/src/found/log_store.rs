//! File-backed found store.
//!
//! Every mutation is appended to the log before the in-memory set changes,
//! so a failed write leaves memory and disk in agreement. Compaction writes
//! a complete replacement log to a temp file in the same directory and
//! renames it over the original.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::entry::{LogEntry, LOG_VERSION};
use super::{FoundStore, StoreError};
use crate::catalog::ItemId;
use crate::config::StoreConfig;

/// A parsed log line with its position and original text.
struct LogLine {
    line_no: usize,
    raw: String,
    entry: LogEntry,
}

/// Contents of a log file whose header has been validated.
struct ParsedLog {
    header: String,
    store_id: Uuid,
    entries: Vec<LogLine>,
}

/// Result of replaying a log from the top.
struct Replay {
    found: BTreeSet<ItemId>,
    /// When each currently found item was marked found.
    found_at: BTreeMap<ItemId, DateTime<Utc>>,
}

#[derive(Debug)]
struct Loaded {
    store_id: Uuid,
    found: BTreeSet<ItemId>,
}

/// Append-only found log on the local filesystem.
#[derive(Debug)]
pub struct LogFoundStore {
    path: PathBuf,
    sync_writes: bool,
    state: Option<Loaded>,
    /// Abort rewrites after the temp file is written, before the rename.
    #[cfg(test)]
    fail_before_persist: bool,
}

impl LogFoundStore {
    /// Create an unloaded store for `path`. No I/O happens until
    /// [`ensure_initialized`](Self::ensure_initialized) or [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
            state: None,
            #[cfg(test)]
            fail_before_persist: false,
        }
    }

    /// Whether appends and rewrites are fsynced (default: true).
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Create the log if needed and load it.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::new(&config.path).with_sync_writes(config.sync_writes);
        store.ensure_initialized()?;
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier written into the header, available once loaded.
    pub fn store_id(&self) -> Option<Uuid> {
        self.state.as_ref().map(|s| s.store_id)
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// Create the log with a fresh header if it does not exist or is empty.
    ///
    /// The header is written to a temp file and moved into place, so the log
    /// never exists without its header. Returns `true` if the file was
    /// created by this call.
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        let dir = match non_empty_parent(&self.path) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let empty = match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(false),
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        writeln!(tmp, "{}", LogEntry::new_header())?;
        tmp.as_file().sync_all()?;

        if empty {
            // An empty log holds no progress; replace it.
            warn!(path = %self.path.display(), "Found log is empty, writing a new header");
            tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        } else {
            match tmp.persist_noclobber(&self.path) {
                Ok(_) => {}
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => return Ok(false),
                Err(e) => return Err(StoreError::Io(e.error)),
            }
        }

        info!(path = %self.path.display(), "Created found log");
        Ok(true)
    }

    /// Read the log and rebuild the found-set from scratch.
    ///
    /// On failure the previously loaded state (if any) is left untouched.
    pub fn load(&mut self) -> Result<&BTreeSet<ItemId>, StoreError> {
        let log = self.read_log()?;
        let replay = replay(&log.entries)?;

        info!(
            path = %self.path.display(),
            entries = log.entries.len(),
            found = replay.found.len(),
            "Found log loaded"
        );

        let loaded = self.state.insert(Loaded {
            store_id: log.store_id,
            found: replay.found,
        });
        Ok(&loaded.found)
    }

    fn loaded(&self) -> Result<&Loaded, StoreError> {
        self.state.as_ref().ok_or_else(|| StoreError::NotLoaded {
            path: self.path.clone(),
        })
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, StoreError> {
        let path = &self.path;
        self.state.as_mut().ok_or_else(|| StoreError::NotLoaded {
            path: path.clone(),
        })
    }

    fn read_log(&self) -> Result<ParsedLog, StoreError> {
        let bytes = fs::read(&self.path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            let line_no = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            StoreError::corrupt(line_no, format!("invalid UTF-8: {}", e.utf8_error()))
        })?;
        let mut lines = content.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) if !line.trim().is_empty() => line,
            _ => return Err(StoreError::corrupt(1, "missing header")),
        };
        let store_id = match LogEntry::parse(1, header) {
            Ok(LogEntry::Header { version, store_id }) if version == LOG_VERSION => store_id,
            Ok(LogEntry::Header { version, .. }) => {
                return Err(StoreError::corrupt(
                    1,
                    format!(
                        "unsupported log version {:?}, expected {:?}",
                        version, LOG_VERSION
                    ),
                ))
            }
            _ => {
                return Err(StoreError::corrupt(
                    1,
                    format!("expected header line, found {:?}", header),
                ))
            }
        };

        let mut entries = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let entry = LogEntry::parse(line_no, line)?;
            if matches!(entry, LogEntry::Header { .. }) {
                return Err(StoreError::corrupt(line_no, "header repeated inside log"));
            }
            entries.push(LogLine {
                line_no,
                raw: line.trim_end_matches('\r').to_string(),
                entry,
            });
        }

        Ok(ParsedLog {
            header: header.trim_end_matches('\r').to_string(),
            store_id,
            entries,
        })
    }

    fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        // No `create`: a vanished log must fail rather than restart headerless.
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(format!("{}\n", entry).as_bytes())?;
        file.flush()?;
        if self.sync_writes {
            file.sync_data()?;
        }
        Ok(())
    }

    /// Atomically replace the log with `header` followed by `lines`.
    fn rewrite<I, S>(&self, header: &str, lines: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        writeln!(tmp, "{}", header)?;
        for line in lines {
            writeln!(tmp, "{}", line.as_ref())?;
        }
        tmp.flush()?;
        if self.sync_writes {
            tmp.as_file().sync_all()?;
        }
        #[cfg(test)]
        if self.fail_before_persist {
            return Err(std::io::Error::other("rewrite interrupted before rename").into());
        }
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl FoundStore for LogFoundStore {
    fn is_found(&self, id: ItemId) -> bool {
        self.state
            .as_ref()
            .is_some_and(|loaded| loaded.found.contains(&id))
    }

    fn found_ids(&self) -> BTreeSet<ItemId> {
        self.state
            .as_ref()
            .map(|loaded| loaded.found.clone())
            .unwrap_or_default()
    }

    fn found_count(&self) -> usize {
        self.state.as_ref().map_or(0, |loaded| loaded.found.len())
    }

    fn mark_found(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.loaded()?;
        self.append(&LogEntry::Add {
            item_id: id,
            found_at: Utc::now(),
        })?;
        let inserted = self.loaded_mut()?.found.insert(id);
        debug!(item_id = id, already_found = !inserted, "Marked found");
        Ok(())
    }

    fn mark_missing(&mut self, id: ItemId) -> Result<(), StoreError> {
        if !self.loaded()?.found.contains(&id) {
            return Err(StoreError::NotFound(id));
        }
        self.append(&LogEntry::Remove { item_id: id })?;
        self.loaded_mut()?.found.remove(&id);
        debug!(item_id = id, "Marked missing");
        Ok(())
    }

    fn compact(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.loaded()?;
        let log = self.read_log()?;
        let before = log.entries.len();
        let kept: Vec<&str> = log
            .entries
            .iter()
            .filter(|line| line.entry.item_id() != Some(id))
            .map(|line| line.raw.as_str())
            .collect();
        let dropped = before - kept.len();

        if dropped == 0 {
            warn!(item_id = id, "Compaction found no log entries for item");
        } else {
            self.rewrite(&log.header, kept)?;
        }

        self.loaded_mut()?.found.remove(&id);
        info!(item_id = id, dropped, "Compacted found log for item");
        Ok(())
    }

    fn compact_all(&mut self) -> Result<(), StoreError> {
        self.loaded()?;
        let log = self.read_log()?;
        let replay = replay(&log.entries)?;

        let lines = replay.found_at.iter().map(|(&item_id, &found_at)| {
            LogEntry::Add { item_id, found_at }.to_string()
        });
        self.rewrite(&log.header, lines)?;

        info!(
            before = log.entries.len(),
            after = replay.found.len(),
            "Compacted found log"
        );
        self.loaded_mut()?.found = replay.found;
        Ok(())
    }
}

/// Rebuild the found-set by applying entries in order.
fn replay(entries: &[LogLine]) -> Result<Replay, StoreError> {
    let mut found = BTreeSet::new();
    let mut found_at = BTreeMap::new();

    for line in entries {
        match line.entry {
            LogEntry::Add { item_id, found_at: at } => {
                if found.insert(item_id) {
                    found_at.insert(item_id, at);
                }
            }
            LogEntry::Remove { item_id } => {
                if !found.remove(&item_id) {
                    return Err(StoreError::InvariantViolation {
                        line: line.line_no,
                        item_id,
                    });
                }
                found_at.remove(&item_id);
            }
            LogEntry::Header { .. } => {}
        }
    }

    Ok(Replay { found, found_at })
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
