//! Feedback board filter, sort, stats and NPS summary

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use dashboard_core::config::IdeaSortConfig;
use dashboard_core::types::{Idea, IdeaCategory, IdeaStatus, NpsCategory, NpsResponse};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stats::{Aggregate, round_half_up, tally};
use crate::view::{RecordFilter, Searchable, Selector};

impl Searchable for Idea {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

/// Filter state of the feedback board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaFilter {
    /// Matched against title, description and every tag
    pub query: String,
    /// Triage status
    pub status: Selector<IdeaStatus>,
    /// Category
    pub category: Selector<IdeaCategory>,
}

impl IdeaFilter {
    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl RecordFilter for IdeaFilter {
    type Record = Idea;

    fn query(&self) -> &str {
        &self.query
    }

    fn admits(&self, idea: &Idea) -> bool {
        self.status.admits(&idea.status) && self.category.admits(&idea.category)
    }

    fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && self.status.is_all() && self.category.is_all()
    }
}

/// Ordering of the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaSort {
    /// Most votes first
    #[default]
    Votes,
    /// Newest first
    Recent,
    /// Highest impact score first
    Trending,
}

impl IdeaSort {
    /// Label used by the sort picker
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Votes => "votes",
            Self::Recent => "recent",
            Self::Trending => "trending",
        }
    }
}

impl From<IdeaSortConfig> for IdeaSort {
    fn from(config: IdeaSortConfig) -> Self {
        match config {
            IdeaSortConfig::Votes => Self::Votes,
            IdeaSortConfig::Recent => Self::Recent,
            IdeaSortConfig::Trending => Self::Trending,
        }
    }
}

impl fmt::Display for IdeaSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaSort {
    type Err = dashboard_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "votes" => Ok(Self::Votes),
            "recent" => Ok(Self::Recent),
            "trending" | "impact" => Ok(Self::Trending),
            other => Err(dashboard_core::Error::validation(
                "sort",
                format!("unknown sort key '{other}'"),
            )),
        }
    }
}

/// Sort descending by the chosen key; equal keys keep their relative order
pub fn sort_ideas<T: AsRef<Idea>>(ideas: &mut [T], sort: IdeaSort) {
    match sort {
        IdeaSort::Votes => ideas.sort_by_key(|i| Reverse(i.as_ref().votes)),
        IdeaSort::Recent => ideas.sort_by_key(|i| Reverse(i.as_ref().created_at)),
        IdeaSort::Trending => ideas.sort_by_key(|i| Reverse(i.as_ref().impact_score)),
    }
}

/// Header counters of the feedback board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdeaStats {
    /// Number of ideas
    pub total_ideas: usize,
    /// Sum of votes
    pub total_votes: u64,
    /// Ideas being built
    pub in_progress: usize,
    /// Ideas released
    pub shipped: usize,
    /// Ideas per category, first-seen order
    pub by_category: IndexMap<IdeaCategory, usize>,
}

impl Aggregate for IdeaStats {
    type Record = Idea;

    fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Idea>,
    {
        let ideas: Vec<&Idea> = records.into_iter().collect();
        let with_status = |status: IdeaStatus| ideas.iter().filter(|i| i.status == status).count();

        Self {
            total_ideas: ideas.len(),
            total_votes: ideas.iter().map(|i| u64::from(i.votes)).sum(),
            in_progress: with_status(IdeaStatus::InProgress),
            shipped: with_status(IdeaStatus::Shipped),
            by_category: tally(ideas.iter().copied(), |i: &Idea| i.category),
        }
    }
}

/// Net promoter breakdown of the survey answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NpsSummary {
    /// Number of answers
    pub total: usize,
    /// Answers scoring 9 or 10
    pub promoters: usize,
    /// Answers scoring 7 or 8
    pub passives: usize,
    /// Answers scoring 6 or less
    pub detractors: usize,
    /// `round((promoters - detractors) / total * 100)`, zero without answers
    pub score: i32,
}

impl Aggregate for NpsSummary {
    type Record = NpsResponse;

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a NpsResponse>,
    {
        let mut summary = Self::default();
        for response in records {
            summary.total += 1;
            match response.category() {
                NpsCategory::Promoter => summary.promoters += 1,
                NpsCategory::Passive => summary.passives += 1,
                NpsCategory::Detractor => summary.detractors += 1,
            }
        }

        if summary.total > 0 {
            let net = summary.promoters as f64 - summary.detractors as f64;
            summary.score = round_half_up(net / summary.total as f64 * 100.0, 0) as i32;
        }
        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::derive_view;
    use dashboard_core::seed;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ids<T: AsRef<Idea>>(ideas: &[T]) -> Vec<&str> {
        ideas.iter().map(|i| i.as_ref().id.as_str()).collect()
    }

    #[rstest]
    #[case(IdeaSort::Votes, vec!["idea4", "idea1", "idea3", "idea6", "idea2", "idea5"])]
    #[case(IdeaSort::Recent, vec!["idea5", "idea6", "idea2", "idea1", "idea3", "idea4"])]
    #[case(IdeaSort::Trending, vec!["idea4", "idea1", "idea6", "idea3", "idea2", "idea5"])]
    fn test_sort_keys(#[case] sort: IdeaSort, #[case] expected: Vec<&str>) {
        let mut ideas = seed::ideas();
        sort_ideas(&mut ideas, sort);
        assert_eq!(ids(&ideas), expected);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut ideas = seed::ideas();
        for idea in &mut ideas {
            idea.votes = 7;
        }
        let before: Vec<String> = ideas.iter().map(|i| i.id.clone()).collect();
        sort_ideas(&mut ideas, IdeaSort::Votes);
        assert_eq!(ids(&ideas), before.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_works_on_borrowed_view() {
        let ideas = seed::ideas();
        let filter = IdeaFilter {
            status: Selector::Only(IdeaStatus::InProgress),
            ..IdeaFilter::default()
        };
        let mut view = derive_view(&ideas, &filter);
        sort_ideas(&mut view, IdeaSort::Trending);
        assert_eq!(ids(&view), vec!["idea1", "idea6"]);
    }

    #[test]
    fn test_query_matches_tags() {
        let ideas = seed::ideas();
        let filter = IdeaFilter {
            query: "Theming".to_string(),
            ..IdeaFilter::default()
        };
        let view = derive_view(&ideas, &filter);
        assert_eq!(ids(&view), vec!["idea1", "idea5"]);
    }

    #[test]
    fn test_category_and_status_are_anded() {
        let ideas = seed::ideas();
        let filter = IdeaFilter {
            status: Selector::Only(IdeaStatus::InProgress),
            category: Selector::Only(IdeaCategory::Feature),
            ..IdeaFilter::default()
        };
        assert_eq!(ids(&derive_view(&ideas, &filter)), vec!["idea1"]);
    }

    #[test]
    fn test_idea_stats() {
        let ideas = seed::ideas();
        let stats = IdeaStats::aggregate(&ideas);

        assert_eq!(stats.total_ideas, 6);
        assert_eq!(stats.total_votes, 1595);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.shipped, 1);
        assert_eq!(stats.by_category.get(&IdeaCategory::Feature), Some(&3));
    }

    #[test]
    fn test_nps_summary() {
        let responses = seed::nps_responses();
        let summary = NpsSummary::aggregate(&responses);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.promoters, 3);
        assert_eq!(summary.passives, 1);
        assert_eq!(summary.detractors, 1);
        assert_eq!(summary.score, 40);
    }

    #[test]
    fn test_nps_without_answers_is_zero() {
        let summary = NpsSummary::aggregate(&Vec::<NpsResponse>::new());
        assert_eq!(summary, NpsSummary::default());
    }

    #[test]
    fn test_sort_parse_and_config() {
        assert_eq!("recent".parse::<IdeaSort>().unwrap(), IdeaSort::Recent);
        assert_eq!("impact".parse::<IdeaSort>().unwrap(), IdeaSort::Trending);
        assert!("oldest".parse::<IdeaSort>().is_err());
        assert_eq!(IdeaSort::from(IdeaSortConfig::Trending), IdeaSort::Trending);
    }
}
