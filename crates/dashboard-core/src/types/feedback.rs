//! Feedback board records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labelled_enum! {
    /// Triage state of an idea
    pub enum IdeaStatus {
        /// Just submitted
        New => "new",
        /// Being evaluated
        UnderReview => "under_review",
        /// Accepted onto the roadmap
        Planned => "planned",
        /// Being built
        InProgress => "in_progress",
        /// Released
        Shipped => "shipped",
        /// Won't do
        Declined => "declined",
        /// Merged into another idea
        Duplicate => "duplicate",
    }
}

labelled_enum! {
    /// Kind of idea
    pub enum IdeaCategory {
        /// New capability
        Feature => "feature",
        /// Enhancement of an existing capability
        Improvement => "improvement",
        /// Defect
        Bug => "bug",
        /// Third-party integration
        Integration => "integration",
        /// User experience
        Ux => "ux",
        /// Speed or scale
        Performance => "performance",
        /// Anything else
        Other => "other",
    }
}

labelled_enum! {
    /// Voter-assigned importance
    pub enum Priority {
        /// Blocking
        Critical => "critical",
        /// Important
        Important => "important",
        /// Nice to have
        NiceToHave => "nice_to_have",
        /// Low
        Low => "low",
    }
}

labelled_enum! {
    /// Subscription plan of a feedback author
    pub enum Plan {
        /// Free plan
        Free => "free",
        /// Pro plan
        Pro => "pro",
        /// Enterprise plan
        Enterprise => "enterprise",
    }
}

labelled_enum! {
    /// NPS bucket of a 0-10 score
    pub enum NpsCategory {
        /// 9 or 10
        Promoter => "promoter",
        /// 7 or 8
        Passive => "passive",
        /// 0 to 6
        Detractor => "detractor",
    }
}

impl NpsCategory {
    /// Bucket of a raw score
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            9.. => Self::Promoter,
            7 | 8 => Self::Passive,
            _ => Self::Detractor,
        }
    }
}

/// Summary of a feedback author or voter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackUser {
    /// User identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Company
    pub company: Option<String>,
    /// Subscription plan
    pub plan: Plan,
    /// Votes cast so far
    pub total_votes: u32,
    /// Ideas submitted so far
    pub ideas_submitted: u32,
    /// Sign-up date
    pub joined_at: NaiveDate,
}

/// Official reply posted on an idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Reply text
    pub message: String,
    /// When it was posted
    pub responded_at: DateTime<Utc>,
    /// Team that replied
    pub responded_by: String,
}

/// An idea on the feedback board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Idea identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Category
    pub category: IdeaCategory,
    /// Triage status
    pub status: IdeaStatus,
    /// Importance
    pub priority: Priority,
    /// Vote count
    pub votes: u32,
    /// Users that voted
    pub voters: Vec<String>,
    /// Comment count
    pub comments: u32,
    /// Author
    pub author: FeedbackUser,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
    /// Target release label
    pub planned_release: Option<String>,
    /// Related ideas
    pub linked_ideas: Vec<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Computed impact, 0-100
    pub impact_score: u8,
    /// Computed effort, 0-100
    pub effort_score: u8,
    /// Official reply
    pub admin_response: Option<AdminResponse>,
    /// Idea this one was merged into
    pub merged_into: Option<String>,
    /// Follower count
    pub subscribers: u32,
    /// View count
    pub views: u32,
    /// Product area
    pub product: Option<String>,
}

impl Idea {
    /// Whether `voter` is already listed on the idea
    #[must_use]
    pub fn has_voter(&self, voter: &str) -> bool {
        self.voters.iter().any(|v| v == voter)
    }

    /// Materialise a submission
    #[must_use]
    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: IdeaDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: IdeaStatus::New,
            priority: Priority::Important,
            votes: 0,
            voters: Vec::new(),
            comments: 0,
            author: draft.author,
            created_at,
            updated_at: created_at,
            planned_release: None,
            linked_ideas: Vec::new(),
            tags: draft.tags,
            impact_score: 0,
            effort_score: 0,
            admin_response: None,
            merged_into: None,
            subscribers: 0,
            views: 0,
            product: draft.product,
        }
    }

    /// Apply a board action; `now` becomes the update time
    pub fn apply_patch(&mut self, patch: IdeaPatch, now: DateTime<Utc>) {
        match patch {
            IdeaPatch::Vote { voter } => {
                self.votes = self.votes.saturating_add(1);
                if !self.has_voter(&voter) {
                    self.voters.push(voter);
                }
            }
            IdeaPatch::Status(status) => self.status = status,
            IdeaPatch::Respond(response) => self.admin_response = Some(response),
            IdeaPatch::MergeInto { target } => {
                self.status = IdeaStatus::Duplicate;
                if !self.linked_ideas.contains(&target) {
                    self.linked_ideas.push(target.clone());
                }
                self.merged_into = Some(target);
            }
        }
        self.updated_at = now;
    }
}

impl AsRef<Self> for Idea {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Payload of the submit-idea form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDraft {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Category
    pub category: IdeaCategory,
    /// Product area
    pub product: Option<String>,
    /// Tags, already split and trimmed
    pub tags: Vec<String>,
    /// Submitting user
    pub author: FeedbackUser,
}

/// Changes accepted by a stored idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdeaPatch {
    /// One more vote, recording the voter
    Vote {
        /// Voting user id
        voter: String,
    },
    /// New triage status
    Status(IdeaStatus),
    /// Official reply
    Respond(AdminResponse),
    /// Mark as a duplicate of `target`
    MergeInto {
        /// Surviving idea
        target: String,
    },
}

/// One answer to the NPS survey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpsResponse {
    /// Response identifier
    pub id: String,
    /// Score, 0-10
    pub score: u8,
    /// Free-text comment
    pub feedback: String,
    /// Respondent
    pub user: FeedbackUser,
    /// When it was answered
    pub created_at: DateTime<Utc>,
    /// Whether someone followed up
    pub followed_up: bool,
    /// Free-form tags
    pub tags: Vec<String>,
}

impl NpsResponse {
    /// Bucket of the score, never stored
    #[must_use]
    pub const fn category(&self) -> NpsCategory {
        NpsCategory::from_score(self.score)
    }
}

impl AsRef<Self> for NpsResponse {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn author() -> FeedbackUser {
        FeedbackUser {
            id: "u9".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            company: None,
            plan: Plan::Free,
            total_votes: 0,
            ideas_submitted: 0,
            joined_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn idea() -> Idea {
        Idea::from_draft(
            "i1".to_string(),
            Utc::now(),
            IdeaDraft {
                title: "Export to PDF".to_string(),
                description: "Allow exporting the board".to_string(),
                category: IdeaCategory::Feature,
                product: None,
                tags: vec!["export".to_string()],
                author: author(),
            },
        )
    }

    #[rstest]
    #[case(10, NpsCategory::Promoter)]
    #[case(9, NpsCategory::Promoter)]
    #[case(8, NpsCategory::Passive)]
    #[case(7, NpsCategory::Passive)]
    #[case(6, NpsCategory::Detractor)]
    #[case(0, NpsCategory::Detractor)]
    fn test_nps_category(#[case] score: u8, #[case] expected: NpsCategory) {
        assert_eq!(NpsCategory::from_score(score), expected);
    }

    #[test]
    fn test_from_draft_starts_new() {
        let idea = idea();
        assert_eq!(idea.status, IdeaStatus::New);
        assert_eq!(idea.votes, 0);
        assert!(idea.voters.is_empty());
        assert_eq!(idea.created_at, idea.updated_at);
    }

    #[test]
    fn test_vote_increments_by_one_each_call() {
        let mut idea = idea();
        let now = Utc::now();

        idea.apply_patch(IdeaPatch::Vote { voter: "u1".to_string() }, now);
        idea.apply_patch(IdeaPatch::Vote { voter: "u1".to_string() }, now);

        assert_eq!(idea.votes, 2);
        assert_eq!(idea.voters, vec!["u1".to_string()]);
        assert!(idea.has_voter("u1"));
    }

    #[test]
    fn test_merge_marks_duplicate() {
        let mut idea = idea();
        idea.apply_patch(
            IdeaPatch::MergeInto {
                target: "idea1".to_string(),
            },
            Utc::now(),
        );

        assert_eq!(idea.status, IdeaStatus::Duplicate);
        assert_eq!(idea.merged_into.as_deref(), Some("idea1"));
        assert_eq!(idea.linked_ideas, vec!["idea1".to_string()]);
    }

    #[test]
    fn test_patch_serialization() {
        let patch = IdeaPatch::Status(IdeaStatus::Shipped);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["kind"], "status");
        assert_eq!(value["value"], "shipped");

        let back: IdeaPatch = serde_json::from_value(value).unwrap();
        assert_eq!(back, patch);
    }
}
