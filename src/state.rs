use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{stack_by_platform, StackLayer};
use crate::data::clean::clean_dataset;
use crate::data::filter::FilterSelection;
use crate::data::loader::load_file;
use crate::data::model::GameTable;
use crate::data::views::{compute_views, DashboardViews};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Cleaned dataset (None until a file is loaded). Never mutated once set.
    pub table: Option<Arc<GameTable>>,

    /// Current genre / rating / year selection.
    pub selection: FilterSelection,

    /// Views derived from `selection` (recomputed on every change).
    pub views: DashboardViews,

    /// Stacked bands of `views.release_series` for the area chart.
    pub stacked_releases: Vec<StackLayer>,

    pub platform_colors: ColorMap,
    pub genre_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            config,
            table: None,
            selection: FilterSelection::default(),
            views: DashboardViews::default(),
            stacked_releases: Vec::new(),
            platform_colors: ColorMap::default(),
            genre_colors: ColorMap::default(),
            status_message: None,
        };
        if let Some(path) = state.config.data_path.clone() {
            state.load_path(&path);
        }
        state
    }

    /// Load and clean a file, reporting failures in the status bar.
    pub fn load_path(&mut self, path: &Path) {
        match self.read_table(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn read_table(&self, path: &Path) -> Result<GameTable> {
        let raw = load_file(path)?;
        Ok(clean_dataset(&raw, self.config.year_threshold)?)
    }

    /// Ingest a freshly cleaned table, reset the selection and colours.
    pub fn set_table(&mut self, table: GameTable) {
        let catalog = table.catalog();
        self.platform_colors = ColorMap::new(catalog.platforms.iter());
        self.genre_colors = ColorMap::new(catalog.genres.iter());
        self.selection = FilterSelection::initial(&table);
        self.table = Some(Arc::new(table));
        self.status_message = None;
        self.refilter();
    }

    /// Recompute every derived view from the current selection.
    pub fn refilter(&mut self) {
        self.views = match &self.table {
            Some(table) => compute_views(table, &self.selection, self.config.empty_selection),
            None => DashboardViews::default(),
        };
        self.stacked_releases = stack_by_platform(&self.views.release_series);
    }

    /// Toggle a genre in the selection.
    pub fn toggle_genre(&mut self, genre: &str) {
        toggle(&mut self.selection.genres, genre);
        self.refilter();
    }

    /// Toggle a rating in the selection.
    pub fn toggle_rating(&mut self, rating: &str) {
        toggle(&mut self.selection.ratings, rating);
        self.refilter();
    }

    /// Select every genre (`true`) or none (`false`).
    pub fn select_all_genres(&mut self, all: bool) {
        self.selection.genres = match (&self.table, all) {
            (Some(table), true) => table.catalog().genres.clone(),
            _ => Default::default(),
        };
        self.refilter();
    }

    /// Select every rating (`true`) or none (`false`).
    pub fn select_all_ratings(&mut self, all: bool) {
        self.selection.ratings = match (&self.table, all) {
            (Some(table), true) => table.catalog().ratings.clone(),
            _ => Default::default(),
        };
        self.refilter();
    }

    /// Set the inclusive year range; an inverted range is kept and shows nothing.
    pub fn set_year_range(&mut self, low: i64, high: i64) {
        if self.selection.years != (low, high) {
            self.selection.years = (low, high);
            self.refilter();
        }
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::EmptySelectionPolicy;
    use crate::data::model::GameRecord;

    fn game(year: i64, genre: &str, rating: &str, platform: &str) -> GameRecord {
        GameRecord {
            year,
            genre: genre.into(),
            rating: rating.into(),
            platform: platform.into(),
            critic_score: 80.0,
            user_score: 8.0,
        }
    }

    fn loaded(config: DashboardConfig) -> AppState {
        let mut state = AppState::new(config);
        state.set_table(GameTable::from_games(vec![
            game(2005, "Action", "E", "PS2"),
            game(2010, "Action", "E", "X360"),
            game(2010, "RPG", "M", "PS3"),
        ]));
        state
    }

    #[test]
    fn initial_selection_shows_nothing() {
        let state = loaded(DashboardConfig::default());
        assert_eq!(state.selection.years, (2005, 2010));
        assert_eq!(state.views.game_count, 0);
        assert!(state.stacked_releases.is_empty());
    }

    #[test]
    fn initial_selection_shows_everything_when_unrestricted() {
        let state = loaded(DashboardConfig {
            empty_selection: EmptySelectionPolicy::Unrestricted,
            ..DashboardConfig::default()
        });
        assert_eq!(state.views.game_count, 3);
        assert_eq!(state.stacked_releases.len(), 3);
    }

    #[test]
    fn every_change_recomputes_the_views() {
        let mut state = loaded(DashboardConfig::default());
        state.toggle_genre("Action");
        state.toggle_rating("E");
        assert_eq!(state.views.game_count, 2);

        state.set_year_range(2006, 2010);
        assert_eq!(state.views.game_count, 1);
        assert_eq!(state.views.scatter_points[0].critic_score, 80.0);

        state.toggle_genre("Action");
        assert_eq!(state.views.game_count, 0);

        state.select_all_genres(true);
        state.select_all_ratings(true);
        assert_eq!(state.views.game_count, 2);
        state.select_all_ratings(false);
        assert!(state.views.is_empty());
    }

    #[test]
    fn inverted_year_range_is_empty() {
        let mut state = loaded(DashboardConfig::default());
        state.select_all_genres(true);
        state.select_all_ratings(true);
        state.set_year_range(2010, 2005);
        assert_eq!(state.views.game_count, 0);
    }

    #[test]
    fn load_failure_becomes_a_status_message() {
        let mut state = AppState::new(DashboardConfig::default());
        state.load_path(Path::new("/nonexistent/games.csv"));
        assert!(state.table.is_none());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }
}
