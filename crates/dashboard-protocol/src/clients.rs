//! CRM client filter, stats and pipeline board

use dashboard_core::types::{Client, ClientStatus, Deal, DealStage, Tier};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stats::{Aggregate, mean, sum_by, tally};
use crate::view::{RecordFilter, Searchable, Selector};

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.company.as_str(),
            self.primary_email(),
            self.industry.as_str(),
        ]
    }
}

/// Filter state of the clients page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFilter {
    /// Matched against contact name, company, primary email and industry
    pub query: String,
    /// Lifecycle status
    pub status: Selector<ClientStatus>,
}

impl ClientFilter {
    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl RecordFilter for ClientFilter {
    type Record = Client;

    fn query(&self) -> &str {
        &self.query
    }

    fn admits(&self, client: &Client) -> bool {
        self.status.admits(&client.status)
    }

    fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && self.status.is_all()
    }
}

/// Stat cards of the clients page, computed over the filtered list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientStats {
    /// Number of clients
    pub total_clients: usize,
    /// Clients with status customer
    pub total_customers: usize,
    /// Sum of revenue
    pub total_revenue: f64,
    /// Sum of lifetime value
    pub total_lifetime_value: f64,
    /// Mean health score of customers only, zero without customers
    pub avg_health_score: f64,
    /// Probability-weighted value of open deals
    pub pipeline_value: f64,
    /// Number of open deals
    pub open_deals: usize,
    /// Revenue per tier, first-seen order
    pub revenue_by_tier: IndexMap<Tier, f64>,
    /// Clients per industry, first-seen order
    pub by_industry: IndexMap<String, usize>,
    /// Deals per stage, first-seen order
    pub deals_by_stage: IndexMap<DealStage, usize>,
}

impl Aggregate for ClientStats {
    type Record = Client;

    fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Client>,
    {
        let clients: Vec<&Client> = records.into_iter().collect();
        let customers: Vec<&Client> = clients
            .iter()
            .copied()
            .filter(|c| c.status == ClientStatus::Customer)
            .collect();
        let deals: Vec<&Deal> = clients.iter().flat_map(|c| c.deals.iter()).collect();
        let open: Vec<&Deal> = deals.iter().copied().filter(|d| d.is_open()).collect();

        Self {
            total_clients: clients.len(),
            total_customers: customers.len(),
            total_revenue: clients.iter().map(|c| c.revenue).sum(),
            total_lifetime_value: clients.iter().map(|c| c.lifetime_value).sum(),
            avg_health_score: mean(customers.iter().map(|c| f64::from(c.health_score))),
            pipeline_value: open.iter().map(|d| d.weighted_value()).sum(),
            open_deals: open.len(),
            revenue_by_tier: sum_by(clients.iter().copied(), Client::tier, |c: &Client| {
                c.revenue
            }),
            by_industry: tally(clients.iter().copied(), |c: &Client| c.industry.clone()),
            deals_by_stage: tally(deals.iter().copied(), |d: &Deal| d.stage),
        }
    }
}

/// Stages shown as pipeline columns, in board order
pub const PIPELINE_STAGES: [DealStage; 5] = [
    DealStage::Qualification,
    DealStage::Discovery,
    DealStage::Proposal,
    DealStage::Negotiation,
    DealStage::ClosedWon,
];

/// A deal placed on the pipeline board with its owning client
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineCard<'a> {
    /// Owning client identifier
    pub client_id: &'a str,
    /// Owning client contact name
    pub client_name: &'a str,
    /// The deal itself
    pub deal: &'a Deal,
}

/// Deals grouped into pipeline columns
///
/// Every column in [`PIPELINE_STAGES`] is present, possibly empty. Lost deals
/// have no column and are left out.
pub fn pipeline_board<'a, I>(clients: I) -> IndexMap<DealStage, Vec<PipelineCard<'a>>>
where
    I: IntoIterator<Item = &'a Client>,
{
    let mut board: IndexMap<DealStage, Vec<PipelineCard<'a>>> = PIPELINE_STAGES
        .iter()
        .map(|stage| (*stage, Vec::new()))
        .collect();

    for client in clients {
        for deal in &client.deals {
            if let Some(column) = board.get_mut(&deal.stage) {
                column.push(PipelineCard {
                    client_id: &client.id,
                    client_name: &client.name,
                    deal,
                });
            }
        }
    }
    board
}
