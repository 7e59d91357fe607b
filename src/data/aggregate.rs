use std::collections::BTreeMap;

use super::filter::FilteredSubset;

// ---------------------------------------------------------------------------
// Release series: games per (year, platform)
// ---------------------------------------------------------------------------

/// One group of the release series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub year: i64,
    pub platform: String,
    pub count: usize,
}

/// Games per `(year, platform)`, ordered by year then platform.
pub type AggregatedSeries = Vec<SeriesPoint>;

/// One point of the critic-vs-user scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub user_score: f64,
    pub critic_score: f64,
    pub genre: String,
}

pub fn count_games(subset: &FilteredSubset<'_>) -> usize {
    subset.len()
}

/// Group the subset by `(year, platform)` and count each group.
pub fn group_by_year_platform(subset: &FilteredSubset<'_>) -> AggregatedSeries {
    let mut groups: BTreeMap<(i64, &str), usize> = BTreeMap::new();
    for game in subset.iter() {
        *groups.entry((game.year, game.platform.as_str())).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((year, platform), count)| SeriesPoint {
            year,
            platform: platform.to_string(),
            count,
        })
        .collect()
}

/// `(user score, critic score, genre)` for every game, unchanged.
pub fn project_scatter(subset: &FilteredSubset<'_>) -> Vec<ScatterPoint> {
    subset
        .iter()
        .map(|game| ScatterPoint {
            user_score: game.user_score,
            critic_score: game.critic_score,
            genre: game.genre.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stacking for the area chart
// ---------------------------------------------------------------------------

/// One platform band of the stacked area chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayer {
    pub platform: String,
    /// `(year, lower, upper)` for every year in the series; `upper - lower`
    /// is this platform's count.
    pub bands: Vec<(i64, f64, f64)>,
}

/// Stack the series per platform over every year it covers. Platforms keep
/// their first-seen order; a platform without releases in a year adds 0.
pub fn stack_by_platform(series: &[SeriesPoint]) -> Vec<StackLayer> {
    let mut platforms: Vec<&str> = Vec::new();
    let mut counts: BTreeMap<(i64, &str), usize> = BTreeMap::new();
    let mut years: Vec<i64> = Vec::new();
    for point in series {
        if !platforms.contains(&point.platform.as_str()) {
            platforms.push(&point.platform);
        }
        if !years.contains(&point.year) {
            years.push(point.year);
        }
        *counts.entry((point.year, point.platform.as_str())).or_default() += point.count;
    }
    years.sort_unstable();

    let mut floor = vec![0.0; years.len()];
    platforms
        .into_iter()
        .map(|platform| {
            let bands = years
                .iter()
                .zip(floor.iter_mut())
                .map(|(&year, lower)| {
                    let count = counts.get(&(year, platform)).copied().unwrap_or(0);
                    let band = (year, *lower, *lower + count as f64);
                    *lower = band.2;
                    band
                })
                .collect();
            StackLayer {
                platform: platform.to_string(),
                bands,
            }
        })
        .collect()
}
