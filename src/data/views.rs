use super::aggregate::{
    count_games, group_by_year_platform, project_scatter, AggregatedSeries, ScatterPoint,
};
use super::filter::{filter_games, EmptySelectionPolicy, FilterSelection};
use super::model::GameTable;

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    pub game_count: usize,
    pub release_series: AggregatedSeries,
    pub scatter_points: Vec<ScatterPoint>,
}

impl DashboardViews {
    pub fn is_empty(&self) -> bool {
        self.game_count == 0
    }
}

/// Filter once and derive all views from the same subset.
/// Pure: safe to call from any thread against a shared table.
pub fn compute_views(
    table: &GameTable,
    selection: &FilterSelection,
    policy: EmptySelectionPolicy,
) -> DashboardViews {
    let subset = filter_games(table, selection, policy);
    let views = DashboardViews {
        game_count: count_games(&subset),
        release_series: group_by_year_platform(&subset),
        scatter_points: project_scatter(&subset),
    };
    log::debug!(
        "Recomputed views: {} games, {} series groups for {selection:?}",
        views.game_count,
        views.release_series.len()
    );
    views
}
