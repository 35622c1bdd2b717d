use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type EffectHook = Box<dyn FnMut(bool) -> Result<()> + Send>;
pub type SpeedHook = Box<dyn FnMut(f32) -> Result<()> + Send>;
pub type ToggleHook = Box<dyn FnMut(&str, bool, &HashMap<String, bool>) -> Result<()> + Send>;
pub type TickHook = Box<dyn FnMut(&HashMap<String, bool>, f32) -> Result<()> + Send>;

/// Capability table registered by the embedding game. Every entry is optional
/// and independently absent-tolerant: a missing entry turns the corresponding
/// call into a no-op.
#[derive(Default)]
pub struct HookTable {
    pub set_health_infinite: Option<EffectHook>,
    pub set_ammo_infinite: Option<EffectHook>,
    pub set_noclip: Option<EffectHook>,
    pub set_speed_multiplier: Option<SpeedHook>,
    /// Called after every flag mutation with the flag name, its new value and
    /// a snapshot of all flags. Errors are suppressed at the call site.
    pub on_toggle: Option<ToggleHook>,
    /// Called once per frame with a snapshot of all flags and the clamped
    /// frame delta in seconds. Errors are suppressed at the call site.
    pub on_tick: Option<TickHook>,
}

/// Shared slot a provider writes its [`HookTable`] into. The table may be
/// installed long after the panel started and replaced wholesale at any time,
/// with no notification; whoever installs last wins.
#[derive(Clone, Default)]
pub struct HookRegistry {
    slot: Arc<Mutex<Option<HookTable>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, table: HookTable) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(table);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Late-binding dispatcher over a [`HookRegistry`]. Capabilities are resolved
/// against the registry on every call, never captured at construction time,
/// so the install order of panel and provider does not matter.
///
/// The four direct effect setters propagate a capability's error to the
/// caller: a throwing setter at initialization or mutation time is an
/// integration bug the host should learn about. `notify_toggle` and
/// `notify_tick` are best-effort and must never break the panel's own control
/// flow; their errors are logged and discarded.
pub struct HookGateway {
    registry: HookRegistry,
}

impl HookGateway {
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry }
    }

    pub fn set_health_infinite(&self, on: bool) -> Result<()> {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return Ok(());
        };
        match slot.as_mut().and_then(|t| t.set_health_infinite.as_mut()) {
            Some(hook) => hook(on),
            None => Ok(()),
        }
    }

    pub fn set_ammo_infinite(&self, on: bool) -> Result<()> {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return Ok(());
        };
        match slot.as_mut().and_then(|t| t.set_ammo_infinite.as_mut()) {
            Some(hook) => hook(on),
            None => Ok(()),
        }
    }

    pub fn set_noclip(&self, on: bool) -> Result<()> {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return Ok(());
        };
        match slot.as_mut().and_then(|t| t.set_noclip.as_mut()) {
            Some(hook) => hook(on),
            None => Ok(()),
        }
    }

    pub fn set_speed_multiplier(&self, mult: f32) -> Result<()> {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return Ok(());
        };
        match slot.as_mut().and_then(|t| t.set_speed_multiplier.as_mut()) {
            Some(hook) => hook(mult),
            None => Ok(()),
        }
    }

    /// Best-effort per-toggle notification.
    pub fn notify_toggle(&self, name: &str, value: bool, flags: &HashMap<String, bool>) {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return;
        };
        if let Some(hook) = slot.as_mut().and_then(|t| t.on_toggle.as_mut()) {
            if let Err(err) = hook(name, value, flags) {
                tracing::debug!(%err, flag = name, "on_toggle hook failed");
            }
        }
    }

    /// Best-effort per-frame notification.
    pub fn notify_tick(&self, flags: &HashMap<String, bool>, dt: f32) {
        let Ok(mut slot) = self.registry.slot.lock() else {
            return;
        };
        if let Some(hook) = slot.as_mut().and_then(|t| t.on_tick.as_mut()) {
            if let Err(err) = hook(flags, dt) {
                tracing::debug!(%err, "on_tick hook failed");
            }
        }
    }
}
