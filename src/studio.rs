use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;

use crate::foundation::core::Canvas;
use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::history::ring::{EntryId, History};
use crate::history::snapshot::{SNAPSHOT_SCALE, SnapshotResult, SnapshotWorker};
use crate::random::sampling::{entropy_rng, seeded_rng};
use crate::render::cpu::CpuRenderer;
use crate::render::frame::FrameRGBA;
use crate::scene::generator::Generator;
use crate::scene::model::Scene;
use crate::settings::snapshot::GeneratorSettings;
use crate::settings::store::{SettingValue, SettingsStore};

/// Notifications delivered to [`Studio::subscribe`] listeners, in the order they happen.
#[derive(Clone, Debug, PartialEq)]
pub enum StudioEvent {
    Generated { id: EntryId, items: usize },
    Navigated { index: usize, id: EntryId },
    SnapshotAttached { id: EntryId },
    AnimationToggled { animating: bool },
    SettingChanged { path: String, value: SettingValue },
}

type Listener = Box<dyn FnMut(&StudioEvent)>;

/// An interactive generation session.
///
/// Owns the settings, the renderer's surface, the scene history and the thumbnail worker. All
/// mutation goes through `&mut self`; the only background work is snapshot capture, whose results
/// are merged back by [`Studio::pump_snapshots`] or [`Studio::wait_for_snapshots`].
pub struct Studio<R = StdRng> {
    settings: SettingsStore,
    generator: Generator,
    renderer: CpuRenderer,
    history: History,
    snapshots: SnapshotWorker,
    rng: R,
    animating: bool,
    listeners: Vec<Listener>,
}

impl Studio<StdRng> {
    /// Session with an entropy-seeded RNG.
    pub fn new(canvas: Canvas) -> AbstraktResult<Self> {
        Self::with_rng(canvas, entropy_rng())
    }

    /// Session whose scenes are reproducible for a given seed and settings.
    pub fn seeded(canvas: Canvas, seed: u64) -> AbstraktResult<Self> {
        Self::with_rng(canvas, seeded_rng(seed))
    }
}

impl<R: rand::Rng> Studio<R> {
    pub fn with_rng(canvas: Canvas, rng: R) -> AbstraktResult<Self> {
        Ok(Self {
            settings: SettingsStore::default(),
            generator: Generator::new(canvas),
            renderer: CpuRenderer::new(canvas)?,
            history: History::default(),
            snapshots: SnapshotWorker::new(SNAPSHOT_SCALE)?,
            rng,
            animating: false,
            listeners: Vec::new(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.generator.canvas()
    }

    /// Sample a new scene from the current settings, draw it and record it in history.
    ///
    /// The new entry starts without a snapshot; one is captured in the background.
    #[tracing::instrument(level = "debug", skip_all, fields(history = self.history.len()))]
    pub fn generate(&mut self) -> AbstraktResult<&Scene> {
        self.pump_snapshots();

        let snapshot = GeneratorSettings::from_store(&self.settings)?;
        let previous = self.history.active().map(|e| &e.scene);
        let scene = self
            .generator
            .generate(&snapshot, previous, &mut self.rng);

        self.renderer.draw(&scene, false)?;
        let items = scene.items.len();
        let id = self.history.record(scene, None);
        self.snapshots.capture(id, self.renderer.raster());

        tracing::info!(%id, items, "scene generated");
        self.emit(&StudioEvent::Generated { id, items });
        self.history
            .entry(id)
            .map(|e| &e.scene)
            .ok_or_else(|| AbstraktError::render(format!("history entry {id} missing after record")))
    }

    /// Scene of the active history entry.
    pub fn scene(&self) -> Option<&Scene> {
        self.history.active().map(|e| &e.scene)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &CpuRenderer {
        &self.renderer
    }

    /// Select entry `index` and redraw it. Out-of-range indices return `None` and change nothing.
    pub fn navigate(&mut self, index: isize) -> AbstraktResult<Option<&Scene>> {
        self.show(|h| h.navigate(index).map(|e| e.id))
    }

    pub fn navigate_previous(&mut self) -> AbstraktResult<Option<&Scene>> {
        self.show(|h| h.navigate_previous().map(|e| e.id))
    }

    pub fn navigate_next(&mut self) -> AbstraktResult<Option<&Scene>> {
        self.show(|h| h.navigate_next().map(|e| e.id))
    }

    fn show(
        &mut self,
        select: impl FnOnce(&mut History) -> Option<EntryId>,
    ) -> AbstraktResult<Option<&Scene>> {
        let Some(id) = select(&mut self.history) else {
            return Ok(None);
        };
        let index = self.history.active_index().unwrap_or_default();
        if let Some(entry) = self.history.entry(id) {
            self.renderer.draw(&entry.scene, false)?;
        }
        tracing::debug!(%id, index, "navigated");
        self.emit(&StudioEvent::Navigated { index, id });
        Ok(self.scene())
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.animating = !self.animating;
        tracing::debug!(animating = self.animating, "animation toggled");
        self.emit(&StudioEvent::AnimationToggled {
            animating: self.animating,
        });
        self.animating
    }

    /// One animation frame: advance the wave offset and redraw from the render cache.
    ///
    /// Returns `false` without drawing when animation is off or nothing has been generated.
    pub fn tick(&mut self, fps: f64) -> AbstraktResult<bool> {
        if !self.animating {
            return Ok(false);
        }
        let Some(entry) = self.history.active() else {
            return Ok(false);
        };
        self.renderer.advance_wave_offset(fps);
        self.renderer.draw(&entry.scene, true)?;
        Ok(true)
    }

    /// Current surface without the post filter.
    pub fn raster(&self) -> FrameRGBA {
        self.renderer.raster()
    }

    /// Current surface as displayed, with the scene's filter applied.
    pub fn presented(&self) -> AbstraktResult<FrameRGBA> {
        self.renderer.presented()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Write one setting. Changing `font` loads the new file before the change is kept.
    pub fn set_setting(&mut self, path: &str, value: SettingValue) -> AbstraktResult<()> {
        let old = self.settings.get(path);
        self.settings.set(path, value.clone())?;
        if path == "font" {
            if let Err(e) = self.sync_font() {
                if let Some(old) = old {
                    self.settings.set(path, old)?;
                }
                return Err(e);
            }
        }
        self.emit(&StudioEvent::SettingChanged {
            path: path.to_string(),
            value,
        });
        Ok(())
    }

    /// Apply a JSON object of overrides (see [`SettingsStore::apply_json`]).
    pub fn apply_settings_json(&mut self, overrides: &serde_json::Value) -> AbstraktResult<()> {
        let before = self.settings.clone();
        self.settings.apply_json(overrides)?;
        if let Err(e) = self.sync_font() {
            self.settings = before;
            return Err(e);
        }
        let changed: Vec<(String, SettingValue)> = self
            .settings
            .paths()
            .into_iter()
            .filter_map(|p| {
                let now = self.settings.get(&p)?;
                (before.get(&p).as_ref() != Some(&now)).then_some((p, now))
            })
            .collect();
        for (path, value) in changed {
            self.emit(&StudioEvent::SettingChanged { path, value });
        }
        Ok(())
    }

    fn sync_font(&mut self) -> AbstraktResult<()> {
        match self.settings.text("font").filter(|p| !p.is_empty()) {
            Some(p) => {
                let path = Path::new(p).to_path_buf();
                self.renderer.set_font(Some(&path))
            }
            None => self.renderer.set_font(None),
        }
    }

    /// Register a listener for every subsequent [`StudioEvent`].
    pub fn subscribe(&mut self, listener: impl FnMut(&StudioEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Merge finished snapshots into history without blocking. Returns how many were attached.
    pub fn pump_snapshots(&mut self) -> usize {
        let done = self.snapshots.drain();
        self.attach_snapshots(done)
    }

    /// Block until outstanding snapshots finish (or `timeout` elapses) and merge them.
    pub fn wait_for_snapshots(&mut self, timeout: Duration) -> usize {
        let done = self.snapshots.wait(timeout);
        self.attach_snapshots(done)
    }

    fn attach_snapshots(&mut self, done: Vec<SnapshotResult>) -> usize {
        let mut attached = 0;
        for (id, result) in done {
            match result {
                Ok(snapshot) => {
                    if self.history.attach_snapshot(id, snapshot) {
                        attached += 1;
                        self.emit(&StudioEvent::SnapshotAttached { id });
                    } else {
                        tracing::debug!(%id, "dropping snapshot for evicted entry");
                    }
                }
                Err(e) => tracing::warn!(%id, error = %e, "snapshot capture failed"),
            }
        }
        attached
    }

    fn emit(&mut self, event: &StudioEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
