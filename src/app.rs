use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GamesDashboardApp {
    pub state: AppState,
}

impl GamesDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for GamesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: count + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a games dataset to start  (File → Open…)");
                });
                return;
            }

            panels::game_count(ui, &self.state);
            ui.separator();

            if self.state.views.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No games match the current filters.");
                });
                return;
            }

            let state = &self.state;
            StripBuilder::new(ui)
                .sizes(Size::remainder(), 2)
                .horizontal(|mut strip| {
                    strip.cell(|ui| plot::release_area_plot(ui, state));
                    strip.cell(|ui| plot::score_scatter_plot(ui, state));
                });
        });
    }
}
