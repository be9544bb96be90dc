//! # Frequency Storage
//!
//! Persistent `command -> weight` counters backed by a plain text file.
//!
//! ## File Format
//!
//! ```text
//! git status:12
//! ls -la:3
//! ```
//!
//! Each line is split at its *last* `:`. Lines without a `:` are skipped and
//! weights that are not a base-10 unsigned integer read as 0. Bytes that are
//! not valid UTF-8 are replaced with U+FFFD. All three cases are counted in
//! the [`LoadReport`] instead of failing the load.
//!
//! ## Durability
//!
//! [`FrequencyStore::save`] writes the full mapping to a temporary file next to
//! the store, syncs it, then renames it over the store. A failed save leaves
//! the previous file untouched. There is no file locking: two processes saving
//! at the same time will each replace the file, and the earlier increment is
//! lost.

use crate::error::{PcmdError, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Delimiter between the command text and its weight in the store file
const DELIMITER: char = ':';

/// Read-only access to command weights.
///
/// Implemented by [`FrequencyStore`] and by plain maps so the sorter can be
/// driven without touching the filesystem.
pub trait WeightSource {
    /// Weight stored under the exact `command` key (0 when absent)
    fn weight(&self, command: &str) -> u64;

    /// Weight of the first whitespace-delimited token of `line`
    fn weight_of(&self, line: &str) -> u64 {
        self.weight(first_token(line))
    }
}

impl WeightSource for HashMap<String, u64> {
    fn weight(&self, command: &str) -> u64 {
        self.get(command).copied().unwrap_or(0)
    }
}

/// Counts of store lines that were tolerated rather than loaded verbatim
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines with no `:` delimiter
    pub skipped_lines: usize,
    /// Lines whose weight did not parse and was read as 0
    pub invalid_weights: usize,
    /// Lines that were not valid UTF-8 and were decoded lossily
    pub invalid_encoding: usize,
}

impl LoadReport {
    /// True when every line of the file was a well-formed entry
    pub fn is_clean(&self) -> bool {
        self.skipped_lines == 0 && self.invalid_weights == 0 && self.invalid_encoding == 0
    }
}

/// Usage counters loaded from, and flushed back to, a single store file.
///
/// The store is owned by whoever opened it; mutation needs `&mut self` and
/// nothing is shared between threads or processes.
#[derive(Debug)]
pub struct FrequencyStore {
    /// Location of the backing file
    path: PathBuf,
    /// Map of command text -> weight
    entries: HashMap<String, u64>,
    /// Tolerated parse problems from the last load
    report: LoadReport,
}

impl FrequencyStore {
    /// Open the store at `path`, creating the file (and its parent directory)
    /// if it does not exist yet.
    ///
    /// Symlinks are resolved, so saving rewrites the link target and the link
    /// itself is kept.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PcmdError::io("create directory", parent, e))?;
        }

        let file = open_or_create(&path).map_err(|e| PcmdError::io("open", &path, e))?;
        let path = fs::canonicalize(&path).unwrap_or(path);
        let (entries, report) =
            parse_entries(BufReader::new(file)).map_err(|e| PcmdError::io("read", &path, e))?;

        if !report.is_clean() {
            warn!(
                path = %path.display(),
                skipped_lines = report.skipped_lines,
                invalid_weights = report.invalid_weights,
                invalid_encoding = report.invalid_encoding,
                "store contains malformed lines; they were skipped, read as weight 0 or decoded lossily"
            );
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded frequency store");

        Ok(Self {
            path,
            entries,
            report,
        })
    }

    /// Record one use of `command`. Surrounding whitespace is ignored, so
    /// `" foo "` and `"foo"` share a counter. Returns the new weight.
    ///
    /// Only the in-memory map changes; call [`save`](Self::save) to persist.
    pub fn increment(&mut self, command: &str) -> u64 {
        let key = command.trim();
        if key.contains(['\n', '\r']) {
            warn!(
                command = key,
                "command spans several lines and will not reload as a single entry"
            );
        }

        let weight = self.entries.entry(key.to_string()).or_insert(0);
        *weight = weight.saturating_add(1);
        debug!(command = key, weight = *weight, "incremented command weight");
        *weight
    }

    /// Persist every entry, replacing the previous file content atomically.
    pub fn save(&self) -> Result<()> {
        self.commit(|writer| {
            for (command, weight) in self.entries_by_key() {
                writeln!(writer, "{command}{DELIMITER}{weight}")?;
            }
            Ok(())
        })?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "saved frequency store");
        Ok(())
    }

    /// Render into a temporary sibling file and rename it over the store once
    /// `render` and the sync have both succeeded. On any failure the temporary
    /// file is removed and the store file is left as it was.
    fn commit<F>(&self, render: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".pcmd-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| PcmdError::io("create temporary file in", dir, e))?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| PcmdError::io("set permissions on", temp.path(), e))?;
        }

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            render(&mut writer).map_err(|e| PcmdError::io("write", &self.path, e))?;
            writer
                .flush()
                .map_err(|e| PcmdError::io("write", &self.path, e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| PcmdError::io("sync", &self.path, e))?;

        temp.persist(&self.path)
            .map_err(|e| PcmdError::io("replace", &self.path, e.error))?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no command has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Malformed-line counters from loading
    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Entries sorted by weight (descending), then command (ascending)
    pub fn entries_by_weight(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(command, weight)| (command.as_str(), *weight))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    fn entries_by_key(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(command, weight)| (command.as_str(), *weight))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl WeightSource for FrequencyStore {
    fn weight(&self, command: &str) -> u64 {
        self.entries.get(command).copied().unwrap_or(0)
    }
}

/// First whitespace-delimited token of `line` (empty for a blank line)
fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

#[cfg(unix)]
fn open_or_create(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o660)
        .open(path)
}

#[cfg(not(unix))]
fn open_or_create(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

/// Decode one raw line, dropping a trailing `\r`. Invalid UTF-8 is replaced
/// with U+FFFD; the flag is false in that case.
pub(crate) fn decode_line(mut raw: Vec<u8>) -> (String, bool) {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    match String::from_utf8(raw) {
        Ok(line) => (line, true),
        Err(err) => (String::from_utf8_lossy(err.as_bytes()).into_owned(), false),
    }
}

/// Parse store lines. Later duplicates overwrite earlier ones.
fn parse_entries<R: BufRead>(reader: R) -> io::Result<(HashMap<String, u64>, LoadReport)> {
    let mut entries = HashMap::new();
    let mut report = LoadReport::default();

    for raw in reader.split(b'\n') {
        let (line, valid) = decode_line(raw?);
        if !valid {
            report.invalid_encoding += 1;
        }
        let Some((command, weight)) = line.rsplit_once(DELIMITER) else {
            report.skipped_lines += 1;
            continue;
        };

        let weight = weight.parse::<u64>().unwrap_or_else(|_| {
            report.invalid_weights += 1;
            0
        });
        entries.insert(command.to_string(), weight);
    }

    Ok((entries, report))
}
