//! Append-Only Log Module
//!
//! Buffers durability records in memory and drains them to the log file on
//! `flush`. At startup `replay` rebuilds an [`EntryStore`] from the file, and
//! `compact` rewrites the file so it only holds the live entries.
//!
//! # Locking
//! One mutex guards the pending buffer and is held for the whole of `append`,
//! `flush` and `compact`. When both locks are needed the entry store's lock is
//! taken first; the log lock is never held while waiting for the store.

use std::fs::{self, File, OpenOptions};
use std::hash::Hash;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::aof::codec::{LogCodec, CODEC_VERSION};
use crate::aof::record::LogRecord;
use crate::cache::EntryStore;
use crate::error::{CacheError, Result};
use crate::sync::lock;

// == Replay Report ==
/// What a replay did with each line of the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied_puts: usize,
    pub applied_removes: usize,
    /// PUT records whose deadline had already passed
    pub expired: usize,
    /// Lines that could not be parsed
    pub skipped: usize,
}

// == Append Log ==
#[derive(Debug)]
pub struct AppendLog {
    path: PathBuf,
    /// Encoded lines not yet written to the file
    pending: Mutex<Vec<String>>,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records waiting for the next flush.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }

    // == Append ==
    /// Queues a record. Never touches the file.
    pub fn append<K: LogCodec, V: LogCodec>(&self, record: &LogRecord<K, V>) {
        let line = record.to_line();
        lock(&self.pending).push(line);
    }

    // == Flush ==
    /// Writes all pending records to the end of the log file.
    ///
    /// On failure the records stay queued for the next attempt.
    /// Returns the number of records written.
    pub fn flush(&self) -> Result<usize> {
        let mut pending = lock(&self.pending);
        self.write_pending(&mut pending)
    }

    fn write_pending(&self, pending: &mut Vec<String>) -> Result<usize> {
        if pending.is_empty() {
            return Ok(0);
        }

        self.append_lines(pending)
            .map_err(|e| CacheError::io(&self.path, e))?;

        let written = pending.len();
        pending.clear();
        Ok(written)
    }

    fn append_lines(&self, lines: &[String]) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let start = file.metadata()?.len();

        let result = write_lines(&file, start, lines);
        if result.is_err() {
            // Drop any partial line so the retry starts clean
            let _ = file.set_len(start);
        }
        result
    }

    // == Replay ==
    /// Rebuilds `store` from the log file without logging anything.
    ///
    /// A missing file means a fresh start. Malformed lines are skipped;
    /// PUT records that expired before `now_ms` are dropped.
    pub fn replay<K, V>(&self, store: &mut EntryStore<K, V>, now_ms: u64) -> Result<ReplayReport>
    where
        K: Hash + Eq + Clone + LogCodec,
        V: Clone + LogCodec,
    {
        let mut report = ReplayReport::default();

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No log file found, starting empty");
                return Ok(report);
            }
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
            let line = line.map_err(|e| CacheError::io(&self.path, e))?;
            let line_no = index + 1;
            let parsed = match std::str::from_utf8(&line) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => LogRecord::<K, V>::parse(text),
                Err(e) => Err(format!("not valid UTF-8: {}", e)),
            };

            match parsed {
                Ok(LogRecord::Version(version)) => {
                    if version != CODEC_VERSION {
                        return Err(CacheError::UnsupportedVersion(version));
                    }
                }
                Ok(LogRecord::Put { key, value, expiry }) => {
                    if expiry.is_expired(now_ms) {
                        report.expired += 1;
                    } else {
                        store.insert(key, value, expiry);
                        report.applied_puts += 1;
                    }
                }
                Ok(LogRecord::Remove { key }) => {
                    store.remove(&key);
                    report.applied_removes += 1;
                }
                Err(reason) => {
                    warn!(
                        "{}",
                        CacheError::MalformedRecord {
                            line: line_no,
                            reason
                        }
                    );
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    // == Compact ==
    /// Rewrites the log so it holds one PUT per live entry of `store`.
    ///
    /// The new file is written next to the old one and renamed over it, so a
    /// reader sees either the complete old log or the complete new one. On any
    /// failure the old file stays in place. Returns the number of entries written.
    pub fn compact<K, V>(&self, store: &Mutex<EntryStore<K, V>>, now_ms: u64) -> Result<usize>
    where
        K: Hash + Eq + Clone + LogCodec,
        V: Clone + LogCodec,
    {
        let store_guard = lock(store);
        let snapshot = store_guard.snapshot();
        // Taken before the store is released: no mutation made after the
        // snapshot can reach the buffer until the swap is done.
        let mut pending = lock(&self.pending);
        drop(store_guard);

        // Records queued before the snapshot go to the old file first, so it
        // stays complete if the swap fails.
        self.write_pending(&mut pending)?;

        // Least recently used first, so replay rebuilds the same recency order
        let live: Vec<String> = snapshot
            .into_iter()
            .rev()
            .filter(|entry| !entry.is_expired(now_ms))
            .map(|entry| {
                LogRecord::Put {
                    key: entry.key,
                    value: entry.value,
                    expiry: entry.expiry,
                }
                .to_line()
            })
            .collect();

        let temp_path = self.temp_path();
        if let Err(e) = write_log_file(&temp_path, &live) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::io(&temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::io(&self.path, e));
        }
        // The swap is only durable once the directory entry is
        sync_parent_dir(&self.path).map_err(|e| CacheError::io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            entries = live.len(),
            "Log compaction completed"
        );
        Ok(live.len())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".new");
        PathBuf::from(name)
    }
}

/// Appends `lines` to `file`, which currently holds `start` bytes.
fn write_lines(file: &File, start: u64, lines: &[String]) -> io::Result<()> {
    let torn_tail = start > 0 && !ends_with_newline(file)?;

    let mut out = BufWriter::new(file);
    if start == 0 {
        writeln!(out, "{}", LogRecord::<u64, u64>::header().to_line())?;
    } else if torn_tail {
        // Terminate a line left unfinished by a crash
        writeln!(out)?;
    }
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    out.get_ref().sync_data()
}

fn ends_with_newline(mut file: &File) -> io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn write_log_file(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", LogRecord::<u64, u64>::header().to_line())?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    out.get_ref().sync_all()
}
