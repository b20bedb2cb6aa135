//! File system watcher for `--watch`.
//!
//! Editors often save by writing a temporary file and renaming it over the
//! original, which replaces the inode. The watcher therefore observes the
//! file's parent directory and matches events by file name, so it survives
//! any number of such saves.

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

/// Events closer together than this are reported as one change.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// The watched file, split into the directory observed and the name matched.
struct Target {
    dir: PathBuf,
    name: OsString,
}

/// Reports changes to a single markdown file.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    target: Option<Target>,
    last_change: Instant,
}

impl FileWatcher {
    pub fn new() -> notify::Result<Self> {
        let (tx, events) = mpsc::channel();
        let watcher = notify::recommended_watcher(tx)?;

        Ok(Self {
            watcher,
            events,
            target: None,
            last_change: Instant::now(),
        })
    }

    /// Watch `path`, replacing any previous target.
    ///
    /// `path` should be canonical so its parent directory is real.
    pub fn watch(&mut self, path: &Path) -> notify::Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| notify::Error::path_not_found().add_path(path.to_path_buf()))?
            .to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if let Some(old) = self.target.take()
            && old.dir != dir
        {
            let _ = self.watcher.unwatch(&old.dir);
        }

        self.watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), name = ?name, "watching");
        self.target = Some(Target { dir, name });
        self.last_change = Instant::now();
        Ok(())
    }

    /// Drain pending events; `true` when the file changed since the last
    /// reported change.
    pub fn check_for_changes(&mut self) -> bool {
        let mut changed = false;
        for result in self.events.try_iter() {
            match result {
                Ok(event) => changed |= self.touches_target(&event),
                Err(e) => tracing::warn!("watch error: {}", e),
            }
        }

        if changed && self.last_change.elapsed() >= DEBOUNCE {
            self.last_change = Instant::now();
            return true;
        }
        false
    }

    fn touches_target(&self, event: &Event) -> bool {
        let Some(target) = &self.target else {
            return false;
        };

        let writes = matches!(
            event.kind,
            EventKind::Create(_)
                | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
                | EventKind::Access(AccessKind::Close(AccessMode::Write))
        );

        writes
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(target.name.as_os_str()))
    }
}
