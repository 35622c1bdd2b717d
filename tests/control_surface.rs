use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::tempdir;
use trainer_overlay::hooks::{HookGateway, HookRegistry, HookTable};
use trainer_overlay::panel::{Panel, StatePatch};
use trainer_overlay::state::{PanelState, STATE_FILE};

type CallLog = Arc<Mutex<Vec<String>>>;

fn recording_table(log: &CallLog) -> HookTable {
    let health = log.clone();
    let ammo = log.clone();
    let noclip = log.clone();
    let speed = log.clone();
    let toggle = log.clone();
    HookTable {
        set_health_infinite: Some(Box::new(move |on| {
            health.lock().unwrap().push(format!("health:{on}"));
            Ok(())
        })),
        set_ammo_infinite: Some(Box::new(move |on| {
            ammo.lock().unwrap().push(format!("ammo:{on}"));
            Ok(())
        })),
        set_noclip: Some(Box::new(move |on| {
            noclip.lock().unwrap().push(format!("noclip:{on}"));
            Ok(())
        })),
        set_speed_multiplier: Some(Box::new(move |mult| {
            speed.lock().unwrap().push(format!("speed:{mult}"));
            Ok(())
        })),
        on_toggle: Some(Box::new(move |name, value, _| {
            toggle.lock().unwrap().push(format!("toggle:{name}:{value}"));
            Ok(())
        })),
        on_tick: None,
    }
}

fn recording_panel(dir: &Path) -> (Panel, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let registry = HookRegistry::new();
    registry.install(recording_table(&log));
    let panel = Panel::open_at(dir.join(STATE_FILE), HookGateway::new(registry));
    (panel, log)
}

#[test]
fn init_applies_effects_once() {
    let dir = tempdir().unwrap();
    let (mut panel, log) = recording_panel(dir.path());

    panel.init().unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["health:false", "ammo:false", "noclip:false", "speed:1"]
    );

    panel.init().unwrap();
    assert_eq!(log.lock().unwrap().len(), 4, "second init must be a no-op");
}

#[test]
fn set_flag_notifies_persists_and_applies_the_bound_effect() {
    let dir = tempdir().unwrap();
    let (mut panel, log) = recording_panel(dir.path());

    panel.set_flag("god_mode", true).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["toggle:god_mode:true", "health:true"]
    );
    assert_eq!(
        PanelState::load(&dir.path().join(STATE_FILE))
            .flags
            .get("god_mode"),
        Some(&true)
    );

    // a flag without a direct effect setter only notifies
    log.lock().unwrap().clear();
    panel.set_flag("no_reload", true).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["toggle:no_reload:true"]);
}

#[test]
fn set_slider_persists_and_applies_the_speed_effect() {
    let dir = tempdir().unwrap();
    let (mut panel, log) = recording_panel(dir.path());

    panel.set_slider("speed_mult", 2.5).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["speed:2.5"]);
    assert_eq!(panel.slider("speed_mult"), Some(2.5));
    assert_eq!(
        PanelState::load(&dir.path().join(STATE_FILE))
            .sliders
            .get("speed_mult"),
        Some(&2.5)
    );
}

#[test]
fn apply_patch_merges_and_reapplies_all_effects() {
    let dir = tempdir().unwrap();
    let (mut panel, log) = recording_panel(dir.path());

    let patch = StatePatch {
        flags: HashMap::from([("god_mode".to_string(), true)]),
        sliders: HashMap::from([("speed_mult".to_string(), 3.0)]),
    };
    panel.apply_patch(patch).unwrap();

    assert!(panel.flag("god_mode"));
    assert_eq!(panel.slider("speed_mult"), Some(3.0));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["health:true", "ammo:false", "noclip:false", "speed:3"]
    );

    let stored = PanelState::load(&dir.path().join(STATE_FILE));
    assert_eq!(stored.flags.get("god_mode"), Some(&true));
    assert_eq!(stored.sliders.get("speed_mult"), Some(&3.0));
}

#[test]
fn snapshot_is_detached_from_internal_state() {
    let dir = tempdir().unwrap();
    let (panel, _log) = recording_panel(dir.path());

    let mut snapshot = panel.flags_snapshot();
    snapshot.insert("god_mode".to_string(), true);
    assert!(!panel.flag("god_mode"));
}

#[test]
fn failing_direct_setter_surfaces_but_the_value_is_still_stored() {
    let dir = tempdir().unwrap();
    let registry = HookRegistry::new();
    registry.install(HookTable {
        set_health_infinite: Some(Box::new(|_| anyhow::bail!("integration bug"))),
        ..HookTable::default()
    });
    let mut panel = Panel::open_at(dir.path().join(STATE_FILE), HookGateway::new(registry));

    assert!(panel.set_flag("god_mode", true).is_err());
    // the mutation itself is not rolled back; it was persisted before dispatch
    assert!(panel.flag("god_mode"));
    assert_eq!(
        PanelState::load(&dir.path().join(STATE_FILE))
            .flags
            .get("god_mode"),
        Some(&true)
    );
}

#[test]
fn hooks_installed_after_startup_still_receive_mutations() {
    let dir = tempdir().unwrap();
    let registry = HookRegistry::new();
    let mut panel = Panel::open_at(
        dir.path().join(STATE_FILE),
        HookGateway::new(registry.clone()),
    );

    // provider loads late, after the panel already initialized
    panel.init().unwrap();

    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    registry.install(recording_table(&log));

    panel.set_flag("noclip", true).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["toggle:noclip:true", "noclip:true"]
    );
}
