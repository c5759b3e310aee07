//! Replays a source file against the existing entries of one target.
//!
//! The output follows the source line for line. Entry lines whose key the
//! target already has are replaced by the target's own line, so existing
//! translations survive; every other line, including entries the target
//! lacks, comes from the source. Output is re-indented per [`LineKind`] and
//! every line ends with the configured terminator.

use std::{
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    config::SyncConfig,
    error::{Error, Result},
    index::ExistingEntryIndex,
    line::{ClassifierState, LineKind, classify, entry_key},
    traits::open_utf8,
};

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Entries written from the target's existing line.
    pub preserved: usize,
    /// Entries written from the source because the target lacked them.
    pub added: usize,
    /// Non-entry lines copied from the source.
    pub passthrough: usize,
}

impl MergeStats {
    pub fn total_lines(&self) -> usize {
        self.preserved + self.added + self.passthrough
    }
}

enum Failure {
    Read(io::Error),
    Write(io::Error),
}

impl Failure {
    fn into_io(self) -> io::Error {
        match self {
            Failure::Read(e) | Failure::Write(e) => e,
        }
    }
}

fn merge_lines<R: BufRead, W: Write>(
    source: R,
    index: &ExistingEntryIndex,
    out: &mut W,
    config: &SyncConfig,
) -> std::result::Result<MergeStats, Failure> {
    let mut stats = MergeStats::default();
    let mut state = ClassifierState::default();

    for line in source.lines() {
        let line = line.map_err(Failure::Read)?;
        let trimmed = line.trim();
        let (kind, next) = classify(trimmed, state);
        state = next;

        let text = match kind {
            LineKind::Entry => match entry_key(trimmed).and_then(|key| index.get(key)) {
                Some(existing) => {
                    stats.preserved += 1;
                    existing
                }
                None => {
                    stats.added += 1;
                    trimmed
                }
            },
            _ => {
                stats.passthrough += 1;
                trimmed
            }
        };

        write_line(out, kind, text, config).map_err(Failure::Write)?;
    }
    Ok(stats)
}

fn write_line<W: Write>(
    out: &mut W,
    kind: LineKind,
    text: &str,
    config: &SyncConfig,
) -> io::Result<()> {
    for _ in 0..kind.indent_depth() {
        out.write_all(config.indent.as_bytes())?;
    }
    out.write_all(text.as_bytes())?;
    out.write_all(config.line_ending.as_bytes())
}

/// Merges `source` against `index`, writing the result to `out`.
pub fn merge<R: BufRead, W: Write>(
    source: R,
    index: &ExistingEntryIndex,
    mut out: W,
    config: &SyncConfig,
) -> io::Result<MergeStats> {
    let stats = merge_lines(source, index, &mut out, config).map_err(Failure::into_io)?;
    out.flush()?;
    Ok(stats)
}

/// Merges the file at `source` into a freshly created `scratch` file.
///
/// An existing scratch file is truncated. Both handles are closed before
/// this returns, on success and on failure.
pub fn merge_into_file(
    source: &Path,
    index: &ExistingEntryIndex,
    scratch: &Path,
    config: &SyncConfig,
) -> Result<MergeStats> {
    let reader = open_utf8(source)?;
    let file = File::create(scratch).map_err(|e| Error::io(scratch, e))?;
    let mut writer = BufWriter::new(file);

    let stats = merge_lines(reader, index, &mut writer, config).map_err(|failure| match failure {
        Failure::Read(e) => Error::io(source, e),
        Failure::Write(e) => Error::io(scratch, e),
    })?;

    let file = writer
        .into_inner()
        .map_err(|e| Error::io(scratch, e.into_error()))?;
    file.sync_all().map_err(|e| Error::io(scratch, e))?;
    Ok(stats)
}
