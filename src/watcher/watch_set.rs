//! Filesystem watches, one per source

use std::path::PathBuf;

use notify::event::{MetadataKind, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::WatchConfig;
use crate::domain::Source;

/// A changed file reported by a watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path of the changed file
    pub path: PathBuf,
}

/// Check whether an event kind is a write or a creation
///
/// Renames count as writes since many editors save through a temp file.
pub fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(
                ModifyKind::Any
                    | ModifyKind::Data(_)
                    | ModifyKind::Name(_)
                    | ModifyKind::Metadata(MetadataKind::Any | MetadataKind::WriteTime)
            )
    )
}

/// Active watches for all sources
///
/// Watches are released by [`WatchSet::stop`], or on drop if the owner
/// unwinds before reaching it.
pub struct WatchSet {
    watchers: Vec<(PathBuf, RecommendedWatcher)>,
}

impl WatchSet {
    /// Start one watch per source, forwarding matching changes to `tx`
    pub fn start(
        sources: &[Source],
        config: &WatchConfig,
        tx: mpsc::UnboundedSender<ChangeEvent>,
    ) -> notify::Result<Self> {
        debug!(source_count = sources.len(), ?config, "WatchSet::start: called");
        let mut set = Self {
            watchers: Vec::with_capacity(sources.len()),
        };

        for source in sources {
            let owner = source.clone();
            let tx = tx.clone();
            let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event.kind) => {
                    for path in event.paths.into_iter().filter(|path| owner.owns(path)) {
                        if tx.send(ChangeEvent { path }).is_err() {
                            debug!(source = %owner.name, "WatchSet: receiver gone, dropping change");
                            return;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(source = %owner.name, error = %e, "WatchSet: watch error"),
            })?;

            // Pushed after watch() succeeds; an early return drops `set` and releases the rest
            watcher.watch(&source.watch_dir, config.recursive_mode())?;
            info!(source = %source.name, dir = %source.watch_dir.display(), pattern = %source.pattern(), "Watching");
            set.watchers.push((source.watch_dir.clone(), watcher));
        }

        Ok(set)
    }

    /// Number of active watches
    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    /// True when nothing is being watched
    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Release every watch
    pub fn stop(mut self) {
        debug!("WatchSet::stop: called");
        self.release();
    }

    fn release(&mut self) {
        for (dir, mut watcher) in self.watchers.drain(..) {
            match watcher.unwatch(&dir) {
                Ok(()) => debug!(?dir, "WatchSet::release: unwatched"),
                Err(e) => warn!(?dir, error = %e, "WatchSet::release: unwatch failed"),
            }
        }
    }
}

impl Drop for WatchSet {
    fn drop(&mut self) {
        self.release();
    }
}
