use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::hooks::HookGateway;
use crate::hotkey;
use crate::state::PanelState;
use crate::tick::FrameClock;

/// What the host should do with a key event after the panel has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The event was handled; the host suppresses its default action.
    Consumed,
    /// Not for us; the event passes through untouched.
    Passed,
}

/// Partial update applied in bulk by an embedding host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatePatch {
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    #[serde(default)]
    pub sliders: HashMap<String, f32>,
}

/// The panel core. Owns the persisted state for the process lifetime and
/// mediates every mutation, so persistence and hook notification stay
/// attached to each change. All input events are routed through here; the
/// rendering layer only draws what this struct says.
pub struct Panel {
    state: PanelState,
    path: PathBuf,
    hooks: HookGateway,
    clock: FrameClock,
    // offset of the grab point from the panel's top-left, while dragging
    drag_offset: Option<(f32, f32)>,
    visual_pos: (f32, f32),
    capturing: bool,
    initialized: bool,
}

impl Panel {
    /// Load (or heal) the state slot at `path` and build the panel around it.
    pub fn open_at(path: impl Into<PathBuf>, hooks: HookGateway) -> Self {
        let path = path.into();
        let state = PanelState::load(&path);
        let visual_pos = (state.pos.0 as f32, state.pos.1 as f32);
        Self {
            state,
            path,
            hooks,
            clock: FrameClock::new(Instant::now()),
            drag_offset: None,
            visual_pos,
            capturing: false,
            initialized: false,
        }
    }

    /// Push the persisted effect values through the hook gateway once.
    /// Idempotent: re-invoking after the first success is a no-op. Errors are
    /// not suppressed here; a throwing effect setter at startup is an
    /// integration bug the host should see.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.apply_effects()?;
        self.initialized = true;
        Ok(())
    }

    // --- mutation entry points -------------------------------------------

    /// Set a flag: notify `on_toggle` (best-effort), persist, then invoke the
    /// bound direct effect setter, whose error surfaces to the caller.
    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<()> {
        self.state.flags.insert(name.to_string(), value);
        self.hooks.notify_toggle(name, value, &self.state.flags);
        self.persist();
        match name {
            "god_mode" => self.hooks.set_health_infinite(value),
            "infinite_ammo" => self.hooks.set_ammo_infinite(value),
            "noclip" => self.hooks.set_noclip(value),
            _ => Ok(()),
        }
    }

    pub fn set_slider(&mut self, name: &str, value: f32) -> Result<()> {
        self.state.sliders.insert(name.to_string(), value);
        self.persist();
        if name == "speed_mult" {
            self.hooks.set_speed_multiplier(value)?;
        }
        Ok(())
    }

    /// Merge a partial flags/sliders update, re-invoke the four direct effect
    /// setters from the merged state, persist.
    pub fn apply_patch(&mut self, patch: StatePatch) -> Result<()> {
        self.state.flags.extend(patch.flags);
        self.state.sliders.extend(patch.sliders);
        let applied = self.apply_effects();
        self.persist();
        applied
    }

    fn apply_effects(&self) -> Result<()> {
        self.hooks.set_health_infinite(self.flag("god_mode"))?;
        self.hooks.set_ammo_infinite(self.flag("infinite_ammo"))?;
        self.hooks.set_noclip(self.flag("noclip"))?;
        self.hooks
            .set_speed_multiplier(self.slider("speed_mult").unwrap_or(1.0))?;
        Ok(())
    }

    // Write-through on every mutation. Failures must not take the panel
    // down; the slot simply keeps its previous document.
    fn persist(&self) {
        if let Err(err) = self.state.save(&self.path) {
            tracing::warn!(%err, path = %self.path.display(), "failed to persist panel state");
        }
    }

    // --- visibility -------------------------------------------------------

    /// Idempotent beyond the write-through: re-entering the current state
    /// still persists.
    pub fn set_open(&mut self, open: bool) {
        self.state.open = open;
        self.persist();
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.state.open);
    }

    pub fn minimize(&mut self) {
        self.set_open(false);
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    // --- hotkey -----------------------------------------------------------

    /// Explicit setter for embedding hosts. Identifiers are normalized;
    /// something that cannot act as a binding keeps the old one.
    pub fn set_hotkey(&mut self, key: &str) {
        match hotkey::normalize_key(key) {
            Some(key) => {
                self.state.hotkey = key;
                self.persist();
            }
            None => tracing::warn!(key, "ignoring invalid hotkey binding"),
        }
    }

    pub fn hotkey(&self) -> &str {
        &self.state.hotkey
    }

    /// Arm the one-shot capture: the next key event rebinds (or cancels).
    pub fn begin_hotkey_capture(&mut self) {
        self.capturing = true;
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Route a key-down event. Capture mode intercepts ahead of everything
    /// else and consumes exactly one event, whatever it is; outside capture,
    /// only the bound hotkey is consumed and it toggles visibility.
    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        if self.capturing {
            self.capturing = false;
            if key != hotkey::CANCEL_KEY {
                self.state.hotkey = key.to_string();
                self.persist();
            }
            return KeyOutcome::Consumed;
        }
        if key == self.state.hotkey {
            self.toggle();
            return KeyOutcome::Consumed;
        }
        KeyOutcome::Passed
    }

    // --- drag -------------------------------------------------------------

    /// Pointer-down on the header: capture the grab offset relative to the
    /// panel's current top-left and enter the drag.
    pub fn drag_start(&mut self, pointer: (f32, f32), origin: (f32, f32)) {
        self.drag_offset = Some((pointer.0 - origin.0, pointer.1 - origin.1));
    }

    /// New top-left while a drag is active; purely visual, nothing persists.
    /// `None` when no drag is in progress.
    pub fn drag_move(&mut self, pointer: (f32, f32)) -> Option<(f32, f32)> {
        let (dx, dy) = self.drag_offset?;
        let next = (pointer.0 - dx, pointer.1 - dy);
        self.visual_pos = next;
        Some(next)
    }

    /// Pointer-up: commit the final rendered origin rounded to whole pixels
    /// and persist. A release without a matching start is a no-op.
    pub fn drag_end(&mut self, origin: (f32, f32)) {
        if self.drag_offset.take().is_none() {
            return;
        }
        self.state.pos = (origin.0.round() as i32, origin.1.round() as i32);
        self.visual_pos = (self.state.pos.0 as f32, self.state.pos.1 as f32);
        self.persist();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    // --- per-frame --------------------------------------------------------

    /// Forward the flags snapshot and the clamped frame delta to the
    /// provider, best-effort. The glue layer calls this once per frame.
    pub fn tick(&mut self, now: Instant) {
        let dt = self.clock.dt(now);
        self.hooks.notify_tick(&self.state.flags, dt);
    }

    // --- accessors --------------------------------------------------------

    pub fn flag(&self, name: &str) -> bool {
        self.state.flags.get(name).copied().unwrap_or(false)
    }

    pub fn slider(&self, name: &str) -> Option<f32> {
        self.state.sliders.get(name).copied()
    }

    /// Read-only copy of the current flags.
    pub fn flags_snapshot(&self) -> HashMap<String, bool> {
        self.state.flags.clone()
    }

    /// Last committed position.
    pub fn position(&self) -> (i32, i32) {
        self.state.pos
    }

    /// Where the panel should be drawn this frame; diverges from
    /// [`Panel::position`] only mid-drag.
    pub fn visual_pos(&self) -> (f32, f32) {
        self.visual_pos
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }
}
