use eframe::egui;

use trainer_overlay::gui::OverlayApp;
use trainer_overlay::hooks::{HookGateway, HookRegistry, HookTable};
use trainer_overlay::logging;
use trainer_overlay::panel::Panel;
use trainer_overlay::state::STATE_FILE;

fn main() -> anyhow::Result<()> {
    logging::init(false, None);

    let path = dirs_next::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("trainer_overlay")
        .join(STATE_FILE);

    let registry = HookRegistry::new();
    registry.install(demo_hooks());

    let mut panel = Panel::open_at(path, HookGateway::new(registry));
    panel.init()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_transparent(true)
            .with_always_on_top(),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Trainer Overlay",
        native_options,
        Box::new(move |_cc| Box::new(OverlayApp::new(panel))),
    );
    Ok(())
}

/// Stand-in provider so the demo binary exercises the full dispatch path.
/// A real game installs its own table, possibly long after the panel started,
/// and may replace it wholesale at any time.
fn demo_hooks() -> HookTable {
    HookTable {
        set_health_infinite: Some(Box::new(|on| {
            tracing::info!(on, "health effect");
            Ok(())
        })),
        set_ammo_infinite: Some(Box::new(|on| {
            tracing::info!(on, "ammo effect");
            Ok(())
        })),
        set_noclip: Some(Box::new(|on| {
            tracing::info!(on, "noclip effect");
            Ok(())
        })),
        set_speed_multiplier: Some(Box::new(|mult| {
            tracing::info!(mult, "speed effect");
            Ok(())
        })),
        on_toggle: Some(Box::new(|name, value, _flags| {
            tracing::info!(flag = name, value, "flag toggled");
            Ok(())
        })),
        on_tick: None,
    }
}
