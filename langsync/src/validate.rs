//! Up-front checks that decide whether a source file may be synchronized.

use std::{
    fmt,
    io::{self, BufRead},
    path::Path,
};

use quick_xml::{Reader, events::Event};

use crate::{
    error::{Error, Result},
    line::{ClassifierState, LineKind, classify},
    traits::{FromLines, open_utf8},
};

/// Outcome of scanning a source file for constructs the line merge cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Every line is either mergeable or passes through untouched.
    Valid,
    /// A live `<string-array>` was found outside of any comment.
    ContainsGroupedArray,
    /// The file could not be checked.
    Unknown,
}

impl Eligibility {
    pub fn is_valid(self) -> bool {
        self == Eligibility::Valid
    }

    /// Human-readable description shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Eligibility::Valid => "valid resource file",
            Eligibility::ContainsGroupedArray => "contains a <string-array> outside of comments",
            Eligibility::Unknown => "unknown validation failure",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl FromLines for Eligibility {
    /// Stops at the first grouped array; comments may mention one freely.
    fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut state = ClassifierState::default();
        for line in reader.lines() {
            let (kind, next) = classify(&line?, state);
            if kind == LineKind::ArrayBegin {
                return Ok(Eligibility::ContainsGroupedArray);
            }
            state = next;
        }
        Ok(Eligibility::Valid)
    }
}

/// Scans `path` and reports whether it can be used as a sync source.
pub fn validate_file<P: AsRef<Path>>(path: P) -> Result<Eligibility> {
    Eligibility::read_from(path)
}

/// Like [`validate_file`], but folds read failures into [`Eligibility::Unknown`].
pub fn validate_file_lossy<P: AsRef<Path>>(path: P) -> Eligibility {
    match validate_file(path) {
        Ok(eligibility) => eligibility,
        Err(e) => {
            tracing::warn!("validation could not complete: {}", e);
            Eligibility::Unknown
        }
    }
}

/// Fails with [`Error::Ineligible`] unless `path` validates as [`Eligibility::Valid`].
pub fn ensure_eligible<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match validate_file(path)? {
        Eligibility::Valid => Ok(()),
        reason => Err(Error::Ineligible {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

/// Returns true when the document's root element is `<resources>`.
///
/// Only the prolog and the first start tag are read.
pub fn is_resource_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let mut xml_reader = Reader::from_reader(open_utf8(path)?);
    xml_reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                return Ok(e.name().as_ref() == b"resources");
            }
            Ok(Event::Eof) => return Ok(false),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
}

/// Fails with [`Error::NotAResourceFile`] unless the root element is `<resources>`.
pub fn ensure_resource_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if is_resource_file(path)? {
        Ok(())
    } else {
        Err(Error::NotAResourceFile(path.to_path_buf()))
    }
}
