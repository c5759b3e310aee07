//! Traits for values built by scanning a resource file line by line.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::Path,
};

use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::error::{Error, Result};

/// Buffered UTF-8 reader over a resource file.
pub type Utf8Reader = BufReader<DecodeReaderBytes<File, Vec<u8>>>;

/// Opens `path` for line reading, stripping a byte-order mark if present.
///
/// UTF-16 files with a BOM are transcoded to UTF-8; everything else must
/// already be UTF-8 or reading will fail with `InvalidData`.
pub fn open_utf8(path: &Path) -> Result<Utf8Reader> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let decoder = DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);
    Ok(BufReader::new(decoder))
}

/// A value computed in one sequential pass over the lines of a file.
///
/// # Example
///
/// ```rust,no_run
/// use langsync::{ExistingEntryIndex, traits::FromLines};
/// let index = ExistingEntryIndex::read_from("res/values-fr/strings.xml")?;
/// println!("{} existing entries", index.len());
/// # Ok::<(), langsync::Error>(())
/// ```
pub trait FromLines: Sized {
    /// Scan any buffered reader.
    fn from_reader<R: BufRead>(reader: R) -> io::Result<Self>;

    /// Scan the file at `path`. The handle is closed before returning.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_utf8(path)?;
        Self::from_reader(reader).map_err(|e| Error::io(path, e))
    }

    /// Scan an in-memory string.
    fn from_text(text: &str) -> io::Result<Self> {
        Self::from_reader(Cursor::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_utf8_strips_bom() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("strings.xml");
        std::fs::write(&path, "\u{feff}<resources>\n</resources>\n").unwrap();

        let mut text = String::new();
        open_utf8(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "<resources>\n</resources>\n");
    }

    #[test]
    fn test_open_utf8_missing_file_names_path() {
        let err = open_utf8(Path::new("/nonexistent/strings.xml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/strings.xml"));
    }
}
