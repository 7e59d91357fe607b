use std::collections::BTreeSet;

use serde::Deserialize;

use super::model::{GameRecord, GameTable};

// ---------------------------------------------------------------------------
// Filter selection: which genres / ratings / years are selected
// ---------------------------------------------------------------------------

/// How an empty genre or rating set is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelectionPolicy {
    /// Nothing selected → nothing matches.
    #[default]
    MatchNothing,
    /// Nothing selected → the column is not constrained.
    Unrestricted,
}

/// One filter selection as produced by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub genres: BTreeSet<String>,
    pub ratings: BTreeSet<String>,
    /// Inclusive `(low, high)` release years. `low > high` matches nothing.
    pub years: (i64, i64),
}

impl FilterSelection {
    #[cfg(test)]
    pub fn new(
        genres: impl IntoIterator<Item = impl Into<String>>,
        ratings: impl IntoIterator<Item = impl Into<String>>,
        years: (i64, i64),
    ) -> Self {
        Self {
            genres: genres.into_iter().map(Into::into).collect(),
            ratings: ratings.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// No genres, no ratings, the full year span of `table`.
    pub fn initial(table: &GameTable) -> Self {
        Self {
            genres: BTreeSet::new(),
            ratings: BTreeSet::new(),
            years: table.catalog().year_bounds().unwrap_or((0, 0)),
        }
    }

    /// Whether `game` passes every part of the selection.
    pub fn matches(&self, game: &GameRecord, policy: EmptySelectionPolicy) -> bool {
        let (low, high) = self.years;
        in_set(&self.genres, &game.genre, policy)
            && in_set(&self.ratings, &game.rating, policy)
            && (low..=high).contains(&game.year)
    }
}

fn in_set(selected: &BTreeSet<String>, value: &str, policy: EmptySelectionPolicy) -> bool {
    if selected.is_empty() {
        return policy == EmptySelectionPolicy::Unrestricted;
    }
    selected.contains(value)
}

// ---------------------------------------------------------------------------
// Filtered subset
// ---------------------------------------------------------------------------

/// Games of a [`GameTable`] that pass a selection, in table order.
/// Borrows the table; holds only row indices.
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    table: &'a GameTable,
    indices: Vec<usize>,
}

impl<'a> FilteredSubset<'a> {
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a GameRecord> + '_ {
        let games = self.table.games();
        self.indices.iter().map(move |&i| &games[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the games that pass `selection`.
///
/// A game passes when:
/// * its genre is in the selected genres,
/// * its rating is in the selected ratings,
/// * its year lies in the inclusive year range.
///
/// An empty genre/rating set is resolved by `policy`. Values that do not occur
/// in the table and inverted ranges simply match nothing.
pub fn filter_games<'a>(
    table: &'a GameTable,
    selection: &FilterSelection,
    policy: EmptySelectionPolicy,
) -> FilteredSubset<'a> {
    let indices = table
        .games()
        .iter()
        .enumerate()
        .filter(|(_, game)| selection.matches(game, policy))
        .map(|(i, _)| i)
        .collect();
    FilteredSubset { table, indices }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn game(year: i64, genre: &str, rating: &str, platform: &str) -> GameRecord {
        GameRecord {
            year,
            genre: genre.into(),
            rating: rating.into(),
            platform: platform.into(),
            critic_score: 70.0,
            user_score: 7.0,
        }
    }

    fn table() -> GameTable {
        GameTable::from_games(vec![
            game(2005, "Action", "E", "PS2"),
            game(2010, "Action", "E", "X360"),
            game(2010, "RPG", "M", "PS3"),
            game(2012, "Action", "T", "PC"),
            game(2016, "RPG", "E", "PS4"),
        ])
    }

    fn years_of(subset: &FilteredSubset<'_>) -> Vec<i64> {
        subset.iter().map(|g| g.year).collect()
    }

    #[test]
    fn matches_all_three_criteria() {
        let table = table();
        let selection = FilterSelection::new(["Action"], ["E"], (2000, 2016));
        let subset = filter_games(&table, &selection, EmptySelectionPolicy::MatchNothing);
        assert_eq!(subset.indices(), [0, 1]);
    }

    #[test]
    fn year_range_is_inclusive_on_both_ends() {
        let table = table();
        let selection = FilterSelection::new(["Action", "RPG"], ["E", "M", "T"], (2010, 2012));
        let subset = filter_games(&table, &selection, EmptySelectionPolicy::MatchNothing);
        assert_eq!(years_of(&subset), [2010, 2010, 2012]);
    }

    #[test]
    fn single_year_range_returns_only_that_year() {
        let table = table();
        let selection = FilterSelection::new(["Action", "RPG"], ["E", "M", "T"], (2005, 2005));
        let subset = filter_games(&table, &selection, EmptySelectionPolicy::MatchNothing);
        assert_eq!(years_of(&subset), [2005]);
    }

    #[test]
    fn empty_sets_match_nothing_by_default() {
        let table = table();
        let selection = FilterSelection::initial(&table);
        assert_eq!(selection.years, (2005, 2016));
        let subset = filter_games(&table, &selection, EmptySelectionPolicy::default());
        assert!(subset.is_empty());
    }

    #[test]
    fn empty_sets_are_unconstrained_when_configured() {
        let table = table();
        let selection = FilterSelection::new(Vec::<String>::new(), ["E"], (2000, 2020));
        let subset = filter_games(&table, &selection, EmptySelectionPolicy::Unrestricted);
        assert_eq!(subset.indices(), [0, 1, 4]);
    }

    #[test]
    fn invalid_selections_degrade_to_empty() {
        let table = table();
        let inverted = FilterSelection::new(["Action"], ["E"], (2016, 2000));
        assert!(filter_games(&table, &inverted, EmptySelectionPolicy::Unrestricted).is_empty());

        let unknown = FilterSelection::new(["Racing"], ["AO"], (2000, 2016));
        assert!(filter_games(&table, &unknown, EmptySelectionPolicy::MatchNothing).is_empty());
    }

    #[test]
    fn widening_a_selection_never_drops_games() {
        let table = table();
        let narrow = FilterSelection::new(["Action"], ["E"], (2008, 2012));
        let wide = FilterSelection::new(["Action", "RPG"], ["E", "T"], (2004, 2016));
        let narrow_ids = filter_games(&table, &narrow, EmptySelectionPolicy::MatchNothing);
        let wide_ids = filter_games(&table, &wide, EmptySelectionPolicy::MatchNothing);
        assert!(narrow_ids
            .indices()
            .iter()
            .all(|i| wide_ids.indices().contains(i)));
        assert!(narrow_ids.len() < wide_ids.len());
    }

    #[test]
    fn empty_table_yields_empty_subset() {
        let table = GameTable::default();
        let selection = FilterSelection::new(["Action"], ["E"], (2000, 2016));
        assert!(filter_games(&table, &selection, EmptySelectionPolicy::Unrestricted).is_empty());
    }

    const GENRES: [&str; 4] = ["Action", "RPG", "Sports", "Puzzle"];
    const RATINGS: [&str; 3] = ["E", "M", "T"];

    fn any_game() -> impl Strategy<Value = GameRecord> {
        (
            2000i64..2017,
            prop::sample::select(GENRES.to_vec()),
            prop::sample::select(RATINGS.to_vec()),
        )
            .prop_map(|(year, genre, rating)| game(year, genre, rating, "PC"))
    }

    /// `(inner, outer)` label sets with `inner ⊆ outer`.
    fn nested_sets(
        pool: &'static [&'static str],
    ) -> impl Strategy<Value = (BTreeSet<String>, BTreeSet<String>)> {
        prop::collection::vec((any::<bool>(), any::<bool>()), pool.len()).prop_map(move |flags| {
            let mut inner = BTreeSet::new();
            let mut outer = BTreeSet::new();
            for (label, (in_outer, in_inner)) in pool.iter().zip(flags) {
                if in_outer {
                    outer.insert(label.to_string());
                    if in_inner {
                        inner.insert(label.to_string());
                    }
                }
            }
            (inner, outer)
        })
    }

    proptest! {
        #[test]
        fn narrower_selection_yields_a_subset(
            games in prop::collection::vec(any_game(), 0..40),
            (inner_genres, outer_genres) in nested_sets(&GENRES),
            (inner_ratings, outer_ratings) in nested_sets(&RATINGS),
            (low, high) in (1998i64..2018, 1998i64..2018),
            (raise_low, drop_high) in (0i64..5, 0i64..5),
        ) {
            let table = GameTable::from_games(games);
            let outer = FilterSelection {
                genres: outer_genres,
                ratings: outer_ratings,
                years: (low, high),
            };
            let inner = FilterSelection {
                genres: inner_genres,
                ratings: inner_ratings,
                years: (low + raise_low, high - drop_high),
            };

            let outer_ids = filter_games(&table, &outer, EmptySelectionPolicy::MatchNothing);
            let inner_ids = filter_games(&table, &inner, EmptySelectionPolicy::MatchNothing);
            prop_assert!(inner_ids
                .indices()
                .iter()
                .all(|i| outer_ids.indices().contains(i)));
            prop_assert!(outer_ids.indices().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
