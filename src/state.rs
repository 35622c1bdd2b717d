use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name of the state document. The version suffix is bumped whenever the
/// schema changes shape incompatibly; older documents are then ignored and
/// healed back to defaults.
pub const STATE_FILE: &str = "trainer_state_v1.json";

/// Flags known at startup. Anything the glue layer renders must appear here so
/// a fresh install persists the complete set.
pub(crate) const DEFAULT_FLAGS: &[&str] = &[
    "god_mode",
    "infinite_ammo",
    "no_reload",
    "infinite_grenades",
    "one_hit_kill",
    "no_recoil",
    "noclip",
    "fast_use",
    "auto_pickup",
    "show_enemy_hp",
    "unlimited_dash",
    "auto_heal",
];

/// Persisted panel configuration. A single instance lives inside
/// [`crate::panel::Panel`] for the lifetime of the process and is written back
/// to its slot on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    /// Panel visibility; `false` collapses the window down to the chip.
    #[serde(default = "default_open")]
    pub open: bool,
    /// Key identifier that toggles visibility. See [`crate::hotkey`].
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    /// Last committed top-left corner of the panel, in viewport pixels.
    /// Intermediate drag frames never land here.
    #[serde(default = "default_pos")]
    pub pos: (i32, i32),
    /// Named boolean toggles.
    #[serde(default = "default_flags")]
    pub flags: HashMap<String, bool>,
    /// Named numeric values. Each slider's range and step are owned by the
    /// rendering layer, not stored here.
    #[serde(default = "default_sliders")]
    pub sliders: HashMap<String, f32>,
}

fn default_open() -> bool {
    true
}

fn default_hotkey() -> String {
    "H".into()
}

fn default_pos() -> (i32, i32) {
    (120, 120)
}

fn default_flags() -> HashMap<String, bool> {
    DEFAULT_FLAGS
        .iter()
        .map(|name| (name.to_string(), false))
        .collect()
}

fn default_sliders() -> HashMap<String, f32> {
    HashMap::from([("speed_mult".to_string(), 1.0)])
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            open: default_open(),
            hotkey: default_hotkey(),
            pos: default_pos(),
            flags: default_flags(),
            sliders: default_sliders(),
        }
    }
}

impl PanelState {
    /// Read the slot at `path`. Missing, empty or undecodable content falls
    /// back to pure defaults; a valid document is deep-merged over them so a
    /// stale file never leaves a field or a known flag missing.
    pub fn load(path: &Path) -> Self {
        let content = fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Self>(&content) {
            Ok(mut state) => {
                state.fill_missing();
                state
            }
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "stored panel state is unreadable; using defaults");
                Self::default()
            }
        }
    }

    /// Serialize the whole state and overwrite the slot, creating the parent
    /// directory on first write.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    // Default keys a stale document predates are filled in; stored keys win.
    fn fill_missing(&mut self) {
        for (name, value) in default_flags() {
            self.flags.entry(name).or_insert(value);
        }
        for (name, value) in default_sliders() {
            self.sliders.entry(name).or_insert(value);
        }
    }
}
