//! # Asset Hot-Reload
//!
//! While a sample runs, its WGSL shader and its texture are watched on disk.
//! Saving either file swaps the new version in between frames without
//! restarting.
//!
//! ```text
//! notify watcher ──► background thread ──► mpsc ──► AssetServer::poll
//!                                                      │
//!                                    pending (path → last event time)
//!                                                      │
//!                     drain_ready: quiet for 100 ms ───┘──► reload
//! ```
//!
//! ## Debounce
//!
//! Editors often save atomically (write a temp file, then rename), which
//! produces several events in a burst. Each event for a path resets that
//! path's timer, and the reload fires once the path has been quiet for
//! [`DEBOUNCE_DURATION`]. One burst of saves means exactly one reload.
//!
//! ## Failure
//!
//! A watcher that cannot start only disables hot-reload. A shader that fails
//! validation or a texture that fails to decode is logged and the previous
//! version stays bound.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::render::{FrameRenderer, GpuContext};

/// Quiet time a path needs before its reload fires.
pub const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// What a watched path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Shader,
    Texture,
}

/// Filesystem watching and reload dispatch.
pub struct AssetServer {
    /// `None` if the watcher failed to start.
    watcher: Option<RecommendedWatcher>,
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    watched_paths: HashMap<PathBuf, AssetKind>,
    /// Path → (kind, time of last event).
    pending_reloads: HashMap<PathBuf, (AssetKind, Instant)>,
    /// Set once the channel disconnects, so it is only logged once.
    rx_disconnected: bool,
}

impl AssetServer {
    /// Create an asset server and start the filesystem watcher.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let watcher = notify::recommended_watcher(move |res| {
            // Receiver gone means the server was dropped.
            let _ = tx.send(res);
        });

        let watcher = match watcher {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Failed to create file watcher: {e}. Hot-reload disabled.");
                None
            }
        };

        Self {
            watcher,
            rx,
            watched_paths: HashMap::new(),
            pending_reloads: HashMap::new(),
            rx_disconnected: false,
        }
    }

    /// Watch the running sample's shader source and texture.
    pub fn watch_sample(&mut self, renderer: &FrameRenderer) {
        if let Some(path) = renderer.pipeline_config().shader_path() {
            self.watch(path, AssetKind::Shader);
        }
        if let Some(path) = renderer.texture_path() {
            self.watch(path.to_path_buf(), AssetKind::Texture);
        }
    }

    /// Register a file for watching.
    pub fn watch(&mut self, path: impl Into<PathBuf>, kind: AssetKind) {
        let path = path.into();

        // Events arrive with canonical paths.
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Cannot watch '{}': {e}", path.display());
                return;
            }
        };

        if let Some(watcher) = &mut self.watcher {
            if let Err(e) = watcher.watch(&canonical, RecursiveMode::NonRecursive) {
                log::warn!("Failed to watch '{}': {e}", canonical.display());
                return;
            }
        }

        log::debug!("Watching {kind:?} '{}'", canonical.display());
        self.watched_paths.insert(canonical, kind);
    }

    /// Number of watched files.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// Drain filesystem events into the debounce buffer.
    fn poll(&mut self) {
        if self.rx_disconnected {
            return;
        }

        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    // Atomic saves show up as create.
                    use notify::EventKind;
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        let now = Instant::now();
                        for path in &event.paths {
                            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
                            self.record(&canonical, now);
                        }
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("File watcher error: {e}");
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("File watcher disconnected. Hot-reload disabled.");
                    self.rx_disconnected = true;
                    break;
                }
            }
        }
    }

    /// Note an event for `path` at `at`, restarting its debounce timer.
    fn record(&mut self, path: &Path, at: Instant) {
        if let Some(&kind) = self.watched_paths.get(path) {
            self.pending_reloads.insert(path.to_path_buf(), (kind, at));
        }
    }

    /// Return entries that have been quiet for at least the debounce duration.
    fn drain_ready(&mut self, now: Instant) -> Vec<(PathBuf, AssetKind)> {
        let mut ready = Vec::new();

        self.pending_reloads.retain(|path, (kind, timestamp)| {
            if now.saturating_duration_since(*timestamp) >= DEBOUNCE_DURATION {
                ready.push((path.clone(), *kind));
                false
            } else {
                true
            }
        });

        ready
    }

    /// Poll for changes and apply any reloads that are due. Called once per
    /// frame by the host, before the scene update.
    pub fn process_reloads(&mut self, gpu: &GpuContext, renderer: &mut FrameRenderer) {
        self.poll();

        for (path, kind) in self.drain_ready(Instant::now()) {
            match kind {
                AssetKind::Shader => reload_shader(gpu, renderer, &path),
                AssetKind::Texture => {
                    if let Err(e) = renderer.reload_texture(gpu) {
                        log::warn!("Hot-reload failed for '{}': {e}", path.display());
                    }
                }
            }
        }
    }
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new()
    }
}

fn reload_shader(gpu: &GpuContext, renderer: &mut FrameRenderer, path: &Path) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Hot-reload failed for shader '{}': {e}", path.display());
            return;
        }
    };

    if renderer.reload_shader(gpu, &source) {
        log::info!("Hot-reloaded shader: {}", path.display());
    }
}
