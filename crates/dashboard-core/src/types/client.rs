//! CRM client records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labelled_enum! {
    /// Position of a client in the sales lifecycle
    pub enum ClientStatus {
        /// Unqualified lead
        Lead => "lead",
        /// Qualified prospect
        Prospect => "prospect",
        /// Active opportunity
        Opportunity => "opportunity",
        /// Paying customer
        Customer => "customer",
        /// Former customer
        Churned => "churned",
        /// Dormant or archived
        Inactive => "inactive",
    }
}

labelled_enum! {
    /// Pipeline stage of a deal
    pub enum DealStage {
        /// Qualification
        Qualification => "qualification",
        /// Discovery
        Discovery => "discovery",
        /// Proposal sent
        Proposal => "proposal",
        /// In negotiation
        Negotiation => "negotiation",
        /// Won
        ClosedWon => "closed_won",
        /// Lost
        ClosedLost => "closed_lost",
    }
}

labelled_enum! {
    /// Revenue tier badge
    pub enum Tier {
        /// Below 10k
        Bronze => "bronze",
        /// 10k and above
        Silver => "silver",
        /// 50k and above
        Gold => "gold",
        /// 100k and above
        Platinum => "platinum",
    }
}

impl Tier {
    /// Lower revenue bound of platinum
    pub const PLATINUM_FLOOR: f64 = 100_000.0;
    /// Lower revenue bound of gold
    pub const GOLD_FLOOR: f64 = 50_000.0;
    /// Lower revenue bound of silver
    pub const SILVER_FLOOR: f64 = 10_000.0;

    /// Step function over revenue
    #[must_use]
    pub fn from_revenue(revenue: f64) -> Self {
        if revenue >= Self::PLATINUM_FLOOR {
            Self::Platinum
        } else if revenue >= Self::GOLD_FLOOR {
            Self::Gold
        } else if revenue >= Self::SILVER_FLOOR {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

labelled_enum! {
    /// Health score band used for colouring
    pub enum HealthBand {
        /// 80 and above
        Healthy => "healthy",
        /// 60 to 79
        Stable => "stable",
        /// 40 to 59
        Watch => "watch",
        /// Below 40
        AtRisk => "at_risk",
    }
}

impl HealthBand {
    /// Band of a 0-100 health score
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Healthy,
            60..=79 => Self::Stable,
            40..=59 => Self::Watch,
            _ => Self::AtRisk,
        }
    }
}

/// Person at a client company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Job title
    pub title: String,
    /// Exactly one contact per client is primary
    pub is_primary: bool,
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
}

/// Sales opportunity embedded in a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Deal identifier
    pub id: String,
    /// Title
    pub name: String,
    /// Contract value
    pub value: f64,
    /// Pipeline stage
    pub stage: DealStage,
    /// Win probability, 0-100
    pub probability: u8,
    /// Expected close date
    pub expected_close: Option<NaiveDate>,
    /// When the deal was opened
    pub created_at: DateTime<Utc>,
    /// Account owner
    pub owner: String,
    /// Products included
    pub products: Vec<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Deal {
    /// Still in the pipeline
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.stage, DealStage::ClosedWon | DealStage::ClosedLost)
    }

    /// Value weighted by win probability
    #[must_use]
    pub fn weighted_value(&self) -> f64 {
        self.value * f64::from(self.probability) / 100.0
    }
}

/// A CRM client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier
    pub id: String,
    /// Primary contact name
    pub name: String,
    /// Company name
    pub company: String,
    /// Industry
    pub industry: String,
    /// Website
    pub website: Option<String>,
    /// Lifecycle status
    pub status: ClientStatus,
    /// Contacts, one marked primary
    pub contacts: Vec<Contact>,
    /// Annual revenue
    pub revenue: f64,
    /// Lifetime value
    pub lifetime_value: f64,
    /// Number of projects
    pub projects: u32,
    /// Health score, 0-100
    pub health_score: u8,
    /// Last NPS answer
    pub nps: Option<u8>,
    /// When the client was added
    pub created_at: DateTime<Utc>,
    /// Last recorded activity
    pub last_activity: DateTime<Utc>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Postal address
    pub address: Address,
    /// Account owner
    pub owner: String,
    /// Team members on the account
    pub team: Vec<String>,
    /// Acquisition source
    pub source: String,
    /// Embedded deals
    pub deals: Vec<Deal>,
}

impl Client {
    /// Default health score of a newly created client
    pub const DEFAULT_HEALTH_SCORE: u8 = 50;

    /// Revenue tier, never stored
    #[must_use]
    pub fn tier(&self) -> Tier {
        Tier::from_revenue(self.revenue)
    }

    /// Health band, never stored
    #[must_use]
    pub const fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }

    /// The primary contact, falling back to the first one listed
    #[must_use]
    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.is_primary)
            .or_else(|| self.contacts.first())
    }

    /// Email of the primary contact, empty when there is none
    #[must_use]
    pub fn primary_email(&self) -> &str {
        self.primary_contact().map_or("", |c| c.email.as_str())
    }

    /// Deals that are still open
    pub fn open_deals(&self) -> impl Iterator<Item = &Deal> {
        self.deals.iter().filter(|d| d.is_open())
    }

    /// Materialise a create-form payload
    #[must_use]
    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: ClientDraft) -> Self {
        let contact = Contact {
            id: id.clone(),
            name: draft.contact_name.clone(),
            email: draft.email,
            phone: draft.phone,
            title: draft
                .contact_title
                .unwrap_or_else(|| "Primary Contact".to_string()),
            is_primary: true,
        };

        Self {
            id,
            name: draft.contact_name,
            company: draft.company,
            industry: draft.industry,
            website: draft.website,
            status: draft.status,
            contacts: vec![contact],
            revenue: 0.0,
            lifetime_value: 0.0,
            projects: 0,
            health_score: Self::DEFAULT_HEALTH_SCORE,
            nps: None,
            created_at,
            last_activity: created_at,
            tags: Vec::new(),
            address: Address::default(),
            owner: "You".to_string(),
            team: Vec::new(),
            source: "Direct".to_string(),
            deals: Vec::new(),
        }
    }

    /// Apply an edit; `now` becomes the last activity time
    pub fn apply_patch(&mut self, patch: ClientPatch, now: DateTime<Utc>) {
        match patch {
            ClientPatch::Details(draft) => {
                self.name.clone_from(&draft.contact_name);
                self.company = draft.company;
                self.industry = draft.industry;
                self.website = draft.website;
                self.status = draft.status;
                if let Some(primary) = self
                    .contacts
                    .iter_mut()
                    .find(|c| c.is_primary)
                {
                    primary.name = draft.contact_name;
                    primary.email = draft.email;
                    primary.phone = draft.phone;
                } else {
                    self.contacts.push(Contact {
                        id: self.id.clone(),
                        name: draft.contact_name,
                        email: draft.email,
                        phone: draft.phone,
                        title: "Primary Contact".to_string(),
                        is_primary: true,
                    });
                }
            }
            ClientPatch::Status(status) => self.status = status,
            ClientPatch::AddDeal(draft) => {
                let deal = Deal {
                    id: format!("{}-deal-{}", self.id, self.deals.len() + 1),
                    name: draft.name,
                    value: draft.value,
                    stage: draft.stage,
                    probability: draft.probability.min(100),
                    expected_close: draft.expected_close,
                    created_at: now,
                    owner: self.owner.clone(),
                    products: Vec::new(),
                    notes: draft.notes,
                };
                self.deals.push(deal);
            }
        }
        self.last_activity = now;
    }
}

impl AsRef<Self> for Client {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Payload of the create and edit client forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDraft {
    /// Company name
    pub company: String,
    /// Primary contact name
    pub contact_name: String,
    /// Primary contact title
    pub contact_title: Option<String>,
    /// Primary contact email
    pub email: String,
    /// Primary contact phone
    pub phone: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Industry
    pub industry: String,
    /// Lifecycle status
    pub status: ClientStatus,
}

/// Payload of the new-deal form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealDraft {
    /// Title
    pub name: String,
    /// Contract value
    pub value: f64,
    /// Starting stage
    pub stage: DealStage,
    /// Win probability, clamped to 100
    pub probability: u8,
    /// Expected close date
    pub expected_close: Option<NaiveDate>,
    /// Description
    pub notes: Option<String>,
}

/// Changes accepted by a stored client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClientPatch {
    /// Replace the editable fields
    Details(ClientDraft),
    /// Change only the lifecycle status
    Status(ClientStatus),
    /// Append a deal
    AddDeal(DealDraft),
}
