use eframe::egui;
use std::time::Instant;

use crate::panel::{KeyOutcome, Panel};

// Rows rendered by the glue layer, grouped into sections. The core only
// stores flag values; labels and grouping live here.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Cheats",
        &[
            ("god_mode", "God Mode"),
            ("infinite_ammo", "Infinite Ammo"),
            ("no_reload", "No Reload"),
            ("infinite_grenades", "Infinite Grenades"),
            ("one_hit_kill", "One-Hit Kill"),
            ("no_recoil", "No Recoil"),
            ("noclip", "Noclip"),
        ],
    ),
    (
        "Quality of Life",
        &[
            ("fast_use", "Fast Use"),
            ("auto_pickup", "Auto-Pickup"),
            ("show_enemy_hp", "Show Enemy HP"),
            ("unlimited_dash", "Unlimited Dash"),
            ("auto_heal", "Auto Heal"),
        ],
    ),
];

const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.2..=5.0;
const PANEL_WIDTH: f32 = 260.0;

pub struct OverlayApp {
    panel: Panel,
}

impl OverlayApp {
    pub fn new(panel: Panel) -> Self {
        Self { panel }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let pressed: Vec<egui::Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });
        for key in pressed {
            if self.panel.handle_key(key.name()) == KeyOutcome::Consumed {
                ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key));
            }
        }
    }

    fn show_panel(&mut self, ctx: &egui::Context) {
        let pos = self.panel.visual_pos();
        egui::Area::new(egui::Id::new("trainer_panel"))
            .movable(false)
            .current_pos(egui::pos2(pos.0, pos.1))
            .show(ctx, |ui| {
                let origin = ui.max_rect().min;
                egui::Frame::window(&ui.ctx().style()).show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    self.header(ui, origin);
                    ui.separator();
                    self.body(ui);
                    ui.separator();
                    self.footer(ui);
                });
            });
    }

    fn header(&mut self, ui: &mut egui::Ui, origin: egui::Pos2) {
        let row = ui
            .horizontal(|ui| {
                ui.label(egui::RichText::new("Trainer").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("–").on_hover_text("Minimize").clicked() {
                        self.panel.minimize();
                    }
                    if ui.small_button("Toggle").clicked() {
                        self.panel.toggle();
                    }
                    let rebind_label = if self.panel.is_capturing() {
                        "Press a key (Esc cancels)"
                    } else {
                        "Change Hotkey"
                    };
                    if ui.small_button(rebind_label).clicked() {
                        self.panel.begin_hotkey_capture();
                    }
                });
            })
            .response;

        // The header doubles as the drag handle.
        let drag = ui.interact(row.rect, ui.id().with("header_drag"), egui::Sense::drag());
        if drag.drag_started() {
            if let Some(pointer) = drag.interact_pointer_pos() {
                self.panel
                    .drag_start((pointer.x, pointer.y), (origin.x, origin.y));
            }
        }
        if drag.dragged() {
            if let Some(pointer) = drag.interact_pointer_pos() {
                self.panel.drag_move((pointer.x, pointer.y));
            }
        }
        if drag.drag_stopped() {
            // commit whatever was actually rendered this frame
            self.panel.drag_end((origin.x, origin.y));
        }
    }

    fn body(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Movement & Camera").small().strong());
        let mut speed = self.panel.slider("speed_mult").unwrap_or(1.0);
        let slider = egui::Slider::new(&mut speed, SPEED_RANGE)
            .step_by(0.1)
            .text("Speed Multiplier");
        if ui.add(slider).changed() {
            if let Err(err) = self.panel.set_slider("speed_mult", speed) {
                tracing::error!(%err, "speed multiplier hook rejected value");
            }
        }

        for (section, rows) in SECTIONS {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(*section).small().strong());
            for (name, label) in *rows {
                let mut value = self.panel.flag(name);
                if ui.checkbox(&mut value, *label).changed() {
                    if let Err(err) = self.panel.set_flag(name, value) {
                        tracing::error!(%err, flag = *name, "effect hook rejected value");
                    }
                }
            }
        }
    }

    fn footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.small(format!("Hotkey: {} (drag by header)", self.panel.hotkey()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(format!("v{}", crate::VERSION));
            });
        });
    }

    fn show_chip(&mut self, ctx: &egui::Context) {
        let pos = self.panel.visual_pos();
        egui::Area::new(egui::Id::new("trainer_chip"))
            .movable(false)
            .current_pos(egui::pos2(pos.0, pos.1))
            .show(ctx, |ui| {
                if ui.button("Menu").clicked() {
                    self.panel.set_open(true);
                }
            });
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.panel.tick(Instant::now());
        self.handle_keys(ctx);

        if self.panel.is_open() {
            self.show_panel(ctx);
        } else {
            self.show_chip(ctx);
        }

        // keep the frame loop running even without input
        ctx.request_repaint();
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}
