use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Column names of the source dataset
// ---------------------------------------------------------------------------

pub const YEAR_COLUMN: &str = "Year_of_Release";
pub const GENRE_COLUMN: &str = "Genre";
pub const RATING_COLUMN: &str = "Rating";
pub const PLATFORM_COLUMN: &str = "Platform";
pub const CRITIC_SCORE_COLUMN: &str = "Critic_Score";
pub const USER_SCORE_COLUMN: &str = "User_Score";

/// Every column the cleaner needs. Other columns are carried but ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    YEAR_COLUMN,
    GENRE_COLUMN,
    RATING_COLUMN,
    PLATFORM_COLUMN,
    CRITIC_SCORE_COLUMN,
    USER_SCORE_COLUMN,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the raw table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of CSV / JSON / Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Numeric view of the cell. Text is parsed, so `"8.5"` yields `8.5`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Categorical view of the cell, kept verbatim: `" Action"` and `"Action"`
    /// are different labels. Numbers keep their textual form (the platform
    /// `2600` is a label, not a quantity).
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::String(s) if s.is_empty() => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_finite() => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RawTable – untrusted input rows
// ---------------------------------------------------------------------------

/// One untrusted input row: column_name → cell.
pub type RawRecord = BTreeMap<String, CellValue>;

/// The raw dataset exactly as loaded, before any cleaning.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    /// Build a table whose column list is the union of keys seen in `rows`
    /// (first-seen order).
    pub fn from_rows(rows: Vec<RawRecord>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut columns = Vec::new();
        for row in &rows {
            for col in row.keys() {
                if seen.insert(col.as_str()) {
                    columns.push(col.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cell lookup; a row without the key reads as missing.
    pub fn cell<'a>(row: &'a RawRecord, column: &str) -> &'a CellValue {
        static MISSING: CellValue = CellValue::Null;
        row.get(column).unwrap_or(&MISSING)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// GameRecord – one cleaned row
// ---------------------------------------------------------------------------

/// A fully-typed game with every field present.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub year: i64,
    pub genre: String,
    pub rating: String,
    pub platform: String,
    pub critic_score: f64,
    pub user_score: f64,
}

impl GameRecord {
    /// Back to raw form, so a cleaned table can be fed through the cleaner again.
    #[cfg(test)]
    pub fn to_raw(&self) -> RawRecord {
        let mut row = RawRecord::new();
        row.insert(YEAR_COLUMN.to_string(), CellValue::Integer(self.year));
        row.insert(GENRE_COLUMN.to_string(), CellValue::String(self.genre.clone()));
        row.insert(RATING_COLUMN.to_string(), CellValue::String(self.rating.clone()));
        row.insert(PLATFORM_COLUMN.to_string(), CellValue::String(self.platform.clone()));
        row.insert(CRITIC_SCORE_COLUMN.to_string(), CellValue::Float(self.critic_score));
        row.insert(USER_SCORE_COLUMN.to_string(), CellValue::Float(self.user_score));
        row
    }
}

// ---------------------------------------------------------------------------
// GameTable – the cleaned, immutable dataset
// ---------------------------------------------------------------------------

/// Unique values of the categorical columns plus the year span.
/// Drives the filter widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueCatalog {
    pub genres: BTreeSet<String>,
    pub ratings: BTreeSet<String>,
    pub platforms: BTreeSet<String>,
    /// Sorted distinct release years.
    pub years: BTreeSet<i64>,
}

impl ValueCatalog {
    /// `(min, max)` release year, absent for an empty table.
    pub fn year_bounds(&self) -> Option<(i64, i64)> {
        Some((*self.years.first()?, *self.years.last()?))
    }
}

/// The cleaned dataset. Built once by the cleaner and never mutated; share it
/// behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTable {
    games: Vec<GameRecord>,
    catalog: ValueCatalog,
}

impl GameTable {
    /// Build the catalog from the cleaned games.
    pub fn from_games(games: Vec<GameRecord>) -> Self {
        let mut catalog = ValueCatalog::default();
        for game in &games {
            catalog.genres.insert(game.genre.clone());
            catalog.ratings.insert(game.rating.clone());
            catalog.platforms.insert(game.platform.clone());
            catalog.years.insert(game.year);
        }
        GameTable { games, catalog }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn catalog(&self) -> &ValueCatalog {
        &self.catalog
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the table is empty.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[cfg(test)]
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            self.games.iter().map(GameRecord::to_raw).collect(),
        )
    }
}
