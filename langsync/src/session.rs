//! One sync run: a source file propagated to an ordered list of targets.
//!
//! A session works in two phases. During generation each target gets an
//! index of its existing entries and a merged scratch file next to it; the
//! targets themselves are only read. If every scratch file was produced,
//! the commit phase renames each scratch file over its target. A failure
//! during generation removes every scratch file and leaves all targets as
//! they were.

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread::{self, JoinHandle},
};

use serde::Serialize;

use crate::{
    config::SyncConfig,
    discover::discover_targets_with,
    error::{Error, Result},
    events::{ChannelListener, SyncEvent, SyncListener},
    index::build_index,
    merge::{MergeStats, merge_into_file},
    validate::ensure_eligible,
};

/// What happened to one target during a successful session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub path: PathBuf,
    pub stats: MergeStats,
}

/// Summary of a successful session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub source: PathBuf,
    pub targets: Vec<TargetReport>,
}

impl SyncReport {
    pub fn updated(&self) -> usize {
        self.targets.len()
    }
}

/// A validated source/targets pairing, ready to run.
#[derive(Debug, Clone)]
pub struct SyncSession {
    source: PathBuf,
    source_name: String,
    targets: Vec<PathBuf>,
    config: SyncConfig,
}

impl SyncSession {
    /// Creates a session after checking the pairing.
    ///
    /// Every target must carry the source's file name, must not be the
    /// source itself, and must live in its own directory, since the scratch
    /// file name is fixed per directory. The scratch file name must differ
    /// from the synced file name.
    pub fn new<P: Into<PathBuf>>(source: P, targets: Vec<PathBuf>, config: SyncConfig) -> Result<Self> {
        let source = source.into();
        let source_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::invalid_session(format!("source {} has no file name", source.display()))
            })?
            .to_string();

        if config.scratch_file_name == source_name {
            return Err(Error::invalid_session(format!(
                "scratch file name `{}` is the name of the synced file",
                config.scratch_file_name
            )));
        }

        let source_key = identity(&source);
        let mut dirs = HashSet::new();
        for target in &targets {
            if target.file_name().and_then(|n| n.to_str()) != Some(source_name.as_str()) {
                return Err(Error::FileNameMismatch {
                    source_name,
                    target: target.clone(),
                });
            }
            if identity(target) == source_key {
                return Err(Error::invalid_session(format!(
                    "target {} is the source file",
                    target.display()
                )));
            }
            if !dirs.insert(identity(&parent_dir(target))) {
                return Err(Error::invalid_session(format!(
                    "more than one target in {}",
                    parent_dir(target).display()
                )));
            }
        }

        Ok(Self {
            source,
            source_name,
            targets,
            config,
        })
    }

    /// Creates a session for `source` and every locale variant found next to it.
    pub fn discover<P: Into<PathBuf>>(source: P, config: SyncConfig) -> Result<Self> {
        let source = source.into();
        let targets = discover_targets_with(&source, &config)?;
        Self::new(source, targets, config)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Path of the scratch file used for `target`.
    pub fn scratch_path(&self, target: &Path) -> PathBuf {
        parent_dir(target).join(&self.config.scratch_file_name)
    }

    /// Runs the session to completion, reporting progress to `listener`.
    ///
    /// `listener` sees one start event, one process event per generated
    /// target and exactly one terminal event. A source that does not
    /// validate is refused with [`Error::Ineligible`] before any event.
    pub fn run<L: SyncListener + ?Sized>(&self, listener: &mut L) -> Result<SyncReport> {
        ensure_eligible(&self.source)?;

        listener.notify(SyncEvent::Start(format!(
            "start from {}",
            self.source.display()
        )));
        tracing::info!(
            source = %self.source.display(),
            targets = self.targets.len(),
            "starting sync"
        );

        let removed = collect_garbage(&self.targets, &self.config);
        if removed > 0 {
            tracing::warn!(removed, "removed stale scratch files from an interrupted sync");
        }

        let reports = match self.generate(listener) {
            Ok(reports) => reports,
            Err(e) => {
                tracing::error!("sync aborted, rolling back: {}", e);
                self.rollback();
                listener.notify(SyncEvent::Errored(format!(
                    "sync failed, all resource files restored: {}",
                    e
                )));
                return Err(e);
            }
        };

        if let Err(e) = self.commit() {
            tracing::error!("commit failed: {}", e);
            listener.notify(SyncEvent::Errored(format!("sync failed during commit: {}", e)));
            return Err(e);
        }

        let report = SyncReport {
            source: self.source.clone(),
            targets: reports,
        };
        tracing::info!(updated = report.updated(), "sync complete");
        listener.notify(SyncEvent::Success(format!(
            "synchronized {} target file(s)",
            report.updated()
        )));
        Ok(report)
    }

    /// Runs the session on a background thread.
    ///
    /// Events arrive on the returned receiver; the channel closes once the
    /// session has finished.
    pub fn spawn(self) -> (JoinHandle<Result<SyncReport>>, Receiver<SyncEvent>) {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            let mut listener = ChannelListener::new(sender);
            self.run(&mut listener)
        });
        (handle, receiver)
    }

    fn generate<L: SyncListener + ?Sized>(&self, listener: &mut L) -> Result<Vec<TargetReport>> {
        let pause = self.config.pause_between_targets();
        let mut reports = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            if !pause.is_zero() {
                thread::sleep(pause);
            }

            let index = build_index(target)?;
            let scratch = self.scratch_path(target);
            let stats = merge_into_file(&self.source, &index, &scratch, &self.config)?;
            tracing::debug!(
                path = %target.display(),
                preserved = stats.preserved,
                added = stats.added,
                passthrough = stats.passthrough,
                "generated scratch file"
            );

            listener.notify(SyncEvent::Process(target.display().to_string()));
            reports.push(TargetReport {
                path: target.clone(),
                stats,
            });
        }
        Ok(reports)
    }

    /// Promotes every scratch file.
    ///
    /// The rename replaces the target in one step, so a target is never
    /// observed missing or half written.
    fn commit(&self) -> Result<()> {
        for (i, target) in self.targets.iter().enumerate() {
            let scratch = self.scratch_path(target);
            let destination = parent_dir(target).join(&self.source_name);
            if let Err(e) = fs::rename(&scratch, &destination) {
                // A failed rename leaves its target as it was, like every later one.
                for rest in &self.targets[i..] {
                    remove_scratch(&self.scratch_path(rest));
                }
                return Err(Error::io(destination, e));
            }
            tracing::debug!(path = %destination.display(), "committed");
        }
        Ok(())
    }

    fn rollback(&self) {
        for target in &self.targets {
            remove_scratch(&self.scratch_path(target));
        }
    }
}

/// Removes scratch files left next to `targets` by an interrupted run.
///
/// Returns how many were removed. Failures are logged and ignored. A
/// target that carries the scratch file name is never removed.
pub fn collect_garbage(targets: &[PathBuf], config: &SyncConfig) -> usize {
    let scratch_name = OsStr::new(&config.scratch_file_name);
    targets
        .iter()
        .filter(|target| target.file_name() != Some(scratch_name))
        .map(|target| parent_dir(target).join(scratch_name))
        .filter(|scratch| scratch.is_file() && remove_scratch(scratch))
        .count()
}

fn remove_scratch(scratch: &Path) -> bool {
    match fs::remove_file(scratch) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %scratch.display(), "could not remove scratch file: {}", e);
            false
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Canonical form of `path` when it exists, otherwise the path itself.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_rejects_mismatched_file_name() {
        let err = SyncSession::new(
            "res/values/strings.xml",
            vec![PathBuf::from("res/values-fr/strings_fr.xml")],
            SyncConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNameMismatch { .. }));
    }

    #[test]
    fn test_new_rejects_source_as_target() {
        let err = SyncSession::new(
            "res/values/strings.xml",
            vec![PathBuf::from("res/values/strings.xml")],
            SyncConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSession(_)));
    }

    #[test]
    fn test_new_rejects_targets_sharing_a_directory() {
        let err = SyncSession::new(
            "res/values/strings.xml",
            vec![
                PathBuf::from("res/values-fr/strings.xml"),
                PathBuf::from("res/values-fr/strings.xml"),
            ],
            SyncConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than one target"));
    }

    #[test]
    fn test_new_rejects_scratch_name_of_synced_file() {
        let err = SyncSession::new(
            "res/values/strings.xml",
            vec![PathBuf::from("res/values-fr/strings.xml")],
            SyncConfig::new().with_scratch_file_name("strings.xml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSession(_)));
        assert!(err.to_string().contains("scratch file name"));
    }

    #[test]
    fn test_scratch_path_uses_config() {
        let session = SyncSession::new(
            "values/strings.xml",
            vec![PathBuf::from("values-fr/strings.xml")],
            SyncConfig::new().with_scratch_file_name(".sync.xml"),
        )
        .unwrap();
        assert_eq!(
            session.scratch_path(Path::new("values-fr/strings.xml")),
            PathBuf::from("values-fr/.sync.xml")
        );
        assert_eq!(
            session.scratch_path(Path::new("strings.xml")),
            PathBuf::from("./.sync.xml")
        );
    }

    #[test]
    fn test_collect_garbage() {
        let dir = TempDir::new().unwrap();
        let fr = dir.path().join("values-fr");
        let de = dir.path().join("values-de");
        fs::create_dir_all(&fr).unwrap();
        fs::create_dir_all(&de).unwrap();
        fs::write(fr.join(".tmp.xml"), "stale").unwrap();

        let targets = vec![fr.join("strings.xml"), de.join("strings.xml")];
        assert_eq!(collect_garbage(&targets, &SyncConfig::default()), 1);
        assert!(!fr.join(".tmp.xml").exists());
        assert_eq!(collect_garbage(&targets, &SyncConfig::default()), 0);
    }

    #[test]
    fn test_collect_garbage_never_removes_targets() {
        let dir = TempDir::new().unwrap();
        let fr = dir.path().join("values-fr").join("strings.xml");
        fs::create_dir_all(fr.parent().unwrap()).unwrap();
        fs::write(&fr, "<resources>\n</resources>\n").unwrap();

        let config = SyncConfig::new().with_scratch_file_name("strings.xml");
        assert_eq!(collect_garbage(&[fr.clone()], &config), 0);
        assert!(fr.exists());
    }

    #[test]
    fn test_empty_session_succeeds() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("strings.xml");
        fs::write(&source, "<resources>\n</resources>\n").unwrap();

        let session = SyncSession::new(&source, Vec::new(), SyncConfig::default()).unwrap();
        let mut events = Vec::new();
        let report = session.run(&mut |e: SyncEvent| events.push(e)).unwrap();
        assert_eq!(report.updated(), 0);
        assert_eq!(
            events,
            vec![
                SyncEvent::Start(format!("start from {}", source.display())),
                SyncEvent::Success("synchronized 0 target file(s)".to_string()),
            ]
        );
    }
}
