//! Generic derived view: free-text search plus categorical selectors
//!
//! Every page filters its records the same way. The query is a
//! case-insensitive substring test over a fixed list of fields per record
//! type, each categorical dimension is either unconstrained or an equality
//! test, and all dimensions are combined with AND. Filtering is stable and
//! never invents records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Records that expose the fields free-text search looks at
pub trait Searchable {
    /// Fields matched by the query, in display order
    fn search_fields(&self) -> Vec<&str>;
}

/// One categorical filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum Selector<T> {
    /// No constraint on this dimension
    All,
    /// Only records whose value equals this one
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selector<T> {
    /// Whether `value` passes this selector
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    /// Whether this dimension is unconstrained
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Filter state of one page
pub trait RecordFilter {
    /// Record type this filter applies to
    type Record: Searchable;

    /// Current free-text query, empty for none
    fn query(&self) -> &str;

    /// Categorical dimensions, ANDed together
    fn admits(&self, record: &Self::Record) -> bool;

    /// Whether every selector is `All` and the query is empty
    fn is_unconstrained(&self) -> bool;

    /// Full match test for a single record
    fn matches(&self, record: &Self::Record) -> bool {
        matches_query(record, self.query()) && self.admits(record)
    }
}

/// Case-insensitive substring test of `query` against any searchable field
pub fn matches_query<R: Searchable + ?Sized>(record: &R, query: &str) -> bool {
    contains_needle(record, &query.to_lowercase())
}

fn contains_needle<R: Searchable + ?Sized>(record: &R, needle: &str) -> bool {
    needle.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Records passing `filter`, in list order
pub fn derive_view<'a, T, F>(records: &'a [T], filter: &F) -> Vec<&'a T>
where
    F: RecordFilter,
    T: AsRef<F::Record>,
{
    let needle = filter.query().to_lowercase();
    records
        .iter()
        .filter(|item| {
            let record = (*item).as_ref();
            contains_needle(record, &needle) && filter.admits(record)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dashboard_core::types::{IdeaStatus, LogStatus};
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Note {
        title: String,
        kind: u8,
    }

    impl Searchable for Note {
        fn search_fields(&self) -> Vec<&str> {
            vec![&self.title]
        }
    }

    impl AsRef<Self> for Note {
        fn as_ref(&self) -> &Self {
            self
        }
    }

    #[derive(Default)]
    struct NoteFilter {
        query: String,
        kind: Selector<u8>,
    }

    impl RecordFilter for NoteFilter {
        type Record = Note;

        fn query(&self) -> &str {
            &self.query
        }

        fn admits(&self, record: &Note) -> bool {
            self.kind.admits(&record.kind)
        }

        fn is_unconstrained(&self) -> bool {
            self.query.is_empty() && self.kind.is_all()
        }
    }

    fn notes() -> Vec<Note> {
        vec![
            Note { title: "Alpha".to_string(), kind: 1 },
            Note { title: "beta".to_string(), kind: 2 },
            Note { title: "ALPHABET".to_string(), kind: 2 },
        ]
    }

    #[test]
    fn test_unconstrained_filter_is_identity() {
        let notes = notes();
        let filter = NoteFilter::default();
        assert!(filter.is_unconstrained());

        let view = derive_view(&notes, &filter);
        assert_eq!(view.len(), notes.len());
    }

    #[test]
    fn test_query_is_case_insensitive_and_stable() {
        let notes = notes();
        let filter = NoteFilter {
            query: "alpha".to_string(),
            ..NoteFilter::default()
        };

        let titles: Vec<&str> = derive_view(&notes, &filter)
            .into_iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Alpha", "ALPHABET"]);
    }

    #[test]
    fn test_dimensions_are_anded() {
        let notes = notes();
        let filter = NoteFilter {
            query: "alpha".to_string(),
            kind: Selector::Only(2),
        };

        let view = derive_view(&notes, &filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view.first().unwrap().title, "ALPHABET");
    }

    #[test]
    fn test_no_match_yields_empty() {
        let notes = notes();
        let filter = NoteFilter {
            query: "gamma".to_string(),
            ..NoteFilter::default()
        };
        assert!(derive_view(&notes, &filter).is_empty());
        assert!(derive_view::<Note, _>(&[], &NoteFilter::default()).is_empty());
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!("all".parse::<Selector<LogStatus>>().unwrap(), Selector::All);
        assert_eq!(
            "failed".parse::<Selector<LogStatus>>().unwrap(),
            Selector::Only(LogStatus::Failed)
        );
        assert_eq!(
            "in_progress".parse::<Selector<IdeaStatus>>().unwrap(),
            Selector::Only(IdeaStatus::InProgress)
        );
        assert!("nope".parse::<Selector<LogStatus>>().is_err());
        assert_eq!(Selector::Only(LogStatus::Blocked).to_string(), "blocked");
        assert_eq!(Selector::<LogStatus>::All.to_string(), "all");
    }
}
