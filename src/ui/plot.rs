use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Release area plot (left half of the central panel)
// ---------------------------------------------------------------------------

/// Stacked area chart: games released per year, one band per platform.
pub fn release_area_plot(ui: &mut Ui, state: &AppState) {
    Plot::new("release_area_plot")
        .legend(Legend::default())
        .x_axis_label("Release year")
        .y_axis_label("Number of games")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Top band first. Fills are opaque, so each lower band covers the
            // one above it and only its own slice of the stack stays visible.
            for layer in state.stacked_releases.iter().rev() {
                let points: PlotPoints = layer
                    .bands
                    .iter()
                    .map(|&(year, _, upper)| [year as f64, upper])
                    .collect();

                let line = Line::new(points)
                    .name(&layer.platform)
                    .color(state.platform_colors.color_for(&layer.platform))
                    .fill(0.0_f32)
                    .fill_alpha(1.0_f32)
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Critic vs user scatter (right half of the central panel)
// ---------------------------------------------------------------------------

/// Scatter of user score (x) against critic score (y), coloured by genre.
pub fn score_scatter_plot(ui: &mut Ui, state: &AppState) {
    let mut by_genre: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for point in &state.views.scatter_points {
        by_genre
            .entry(point.genre.as_str())
            .or_default()
            .push([point.user_score, point.critic_score]);
    }

    Plot::new("critic_user_scatter")
        .legend(Legend::default())
        .x_axis_label("User score")
        .y_axis_label("Critic score")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (genre, coords) in by_genre {
                let points = Points::new(PlotPoints::from(coords))
                    .name(genre)
                    .color(state.genre_colors.color_for(genre))
                    .radius(3.0);
                plot_ui.points(points);
            }
        });
}
