use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: genres, ratings and the year range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Hold our own handle so the catalog stays readable while `state` mutates.
    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let catalog = table.catalog();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let genres = state.selection.genres.clone();
            if let Some(change) = multi_select(ui, "Genres", &catalog.genres, &genres) {
                match change {
                    SelectionChange::All(all) => state.select_all_genres(all),
                    SelectionChange::Toggle(genre) => state.toggle_genre(&genre),
                }
            }

            let ratings = state.selection.ratings.clone();
            if let Some(change) = multi_select(ui, "Ratings", &catalog.ratings, &ratings) {
                match change {
                    SelectionChange::All(all) => state.select_all_ratings(all),
                    SelectionChange::Toggle(rating) => state.toggle_rating(&rating),
                }
            }

            ui.separator();
            ui.strong("Release years");
            if let Some((min, max)) = catalog.year_bounds() {
                let (mut low, mut high) = state.selection.years;
                ui.add(egui::Slider::new(&mut low, min..=max).text("from"));
                ui.add(egui::Slider::new(&mut high, min..=max).text("to"));
                if low > high {
                    ui.label(RichText::new("\"from\" is after \"to\"").color(Color32::YELLOW));
                }
                state.set_year_range(low, high);
            }
        });
}

enum SelectionChange {
    All(bool),
    Toggle(String),
}

/// A collapsible checkbox list with All / None buttons.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    all_values: &BTreeSet<String>,
    selected: &BTreeSet<String>,
) -> Option<SelectionChange> {
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());
    let mut change = None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    change = Some(SelectionChange::All(true));
                }
                if ui.small_button("None").clicked() {
                    change = Some(SelectionChange::All(false));
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    change = Some(SelectionChange::Toggle(value.clone()));
                }
            }
        });

    change
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} games since {}",
                table.len(),
                state.config.year_threshold
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Headline above the charts.
pub fn game_count(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!(
            "Number of the selected games is: {}",
            state.views.game_count
        ));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open games dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
