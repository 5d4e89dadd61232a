// src/system/watcher.rs

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;

/// Change-notification seam. Fires the callback at least once per underlying
/// change; rapid successive changes may be coalesced by the backend.
pub trait ChangeWatcher {
    /// Registers `on_change` for modifications of `path`. Each call creates
    /// one subscription; callers are responsible for calling it only once
    /// per watched resource.
    fn watch(&mut self, path: &Path, on_change: Box<dyn Fn() + Send>) -> Result<()>;

    /// Number of live subscriptions held by this watcher.
    fn subscription_count(&self) -> usize;
}

/// Filesystem-backed watcher over `notify`. Subscriptions live as long as
/// the struct; dropping it cancels all of them.
#[derive(Default)]
pub struct FsWatcher {
    subscriptions: Vec<RecommendedWatcher>,
}

impl FsWatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeWatcher for FsWatcher {
    fn watch(&mut self, path: &Path, on_change: Box<dyn Fn() + Send>) -> Result<()> {
        let watched = path.to_path_buf();
        let mut watcher =
            notify::recommended_watcher(move |event: Result<notify::Event, notify::Error>| {
                match event {
                    Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                        log::debug!("Change detected on {}: {:?}", watched.display(), event.kind);
                        on_change();
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Watcher error on {}: {}", watched.display(), e),
                }
            })
            .context("Failed to create filesystem watcher")?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch '{}'", path.display()))?;

        self.subscriptions.push(watcher);
        Ok(())
    }

    fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
