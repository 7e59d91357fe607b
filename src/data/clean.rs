use thiserror::Error;

use super::model::{
    CellValue, GameRecord, GameTable, RawRecord, RawTable, CRITIC_SCORE_COLUMN, GENRE_COLUMN,
    PLATFORM_COLUMN, RATING_COLUMN, REQUIRED_COLUMNS, USER_SCORE_COLUMN, YEAR_COLUMN,
};

/// Placeholder the source uses for a user score that is "to be determined".
pub const USER_SCORE_SENTINEL: &str = "tbd";

/// The raw dataset does not carry every column the cleaner needs.
#[derive(Debug, Error, PartialEq)]
#[error("dataset is missing required column(s): {}", .missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<&'static str>,
}

/// Counters reported after a cleaning pass.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct CleanStats {
    before_threshold: usize,
    incomplete: usize,
    unparseable_scores: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn the raw table into the analysis-ready [`GameTable`].
///
/// Steps, in order:
/// 1. keep rows released in or after `year_threshold` (a missing or
///    non-numeric year never matches),
/// 2. map the user-score sentinel to missing, coerce other user scores to `f64`,
/// 3. truncate the year to an integer,
/// 4. drop rows still missing any field.
///
/// An empty result is valid. Only a missing column is an error.
pub fn clean_dataset(raw: &RawTable, year_threshold: i64) -> Result<GameTable, SchemaError> {
    check_schema(raw)?;

    let mut stats = CleanStats::default();
    let mut games = Vec::with_capacity(raw.len());
    for row in &raw.rows {
        if !released_since(row, year_threshold) {
            stats.before_threshold += 1;
            continue;
        }
        match clean_row(row, &mut stats) {
            Some(game) => games.push(game),
            None => stats.incomplete += 1,
        }
    }

    if stats.unparseable_scores > 0 {
        log::warn!(
            "{} score cell(s) were neither numeric nor '{USER_SCORE_SENTINEL}'; treated as missing",
            stats.unparseable_scores
        );
    }
    log::info!(
        "Cleaned {} raw rows → {} games ({} before {year_threshold}, {} incomplete)",
        raw.len(),
        games.len(),
        stats.before_threshold,
        stats.incomplete
    );

    Ok(GameTable::from_games(games))
}

fn check_schema(raw: &RawTable) -> Result<(), SchemaError> {
    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !raw.has_column(col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

fn released_since(row: &RawRecord, year_threshold: i64) -> bool {
    RawTable::cell(row, YEAR_COLUMN)
        .as_f64()
        .is_some_and(|year| year >= year_threshold as f64)
}

fn clean_row(row: &RawRecord, stats: &mut CleanStats) -> Option<GameRecord> {
    let user_score = user_score(RawTable::cell(row, USER_SCORE_COLUMN), stats);
    let critic_score = score(RawTable::cell(row, CRITIC_SCORE_COLUMN), stats);
    // Year is numeric here: rows without one were dropped by the threshold step.
    let year = RawTable::cell(row, YEAR_COLUMN).as_f64()?.trunc() as i64;

    Some(GameRecord {
        year,
        genre: RawTable::cell(row, GENRE_COLUMN).as_label()?,
        rating: RawTable::cell(row, RATING_COLUMN).as_label()?,
        platform: RawTable::cell(row, PLATFORM_COLUMN).as_label()?,
        critic_score: critic_score?,
        user_score: user_score?,
    })
}

fn user_score(cell: &CellValue, stats: &mut CleanStats) -> Option<f64> {
    match cell {
        CellValue::String(s) if s.trim().eq_ignore_ascii_case(USER_SCORE_SENTINEL) => None,
        other => score(other, stats),
    }
}

fn score(cell: &CellValue, stats: &mut CleanStats) -> Option<f64> {
    let value = cell.as_f64();
    let blank = matches!(cell, CellValue::String(s) if s.trim().is_empty());
    if value.is_none() && !cell.is_null() && !blank {
        stats.unparseable_scores += 1;
    }
    value
}
