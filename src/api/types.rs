//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::accounting::{AnnualEnergy, Environmental};
use crate::calc::CalcResults;
use crate::config::SiteConfig;
use crate::error::Advisory;
use crate::finance::FinancialSummary;
use crate::sizing::SizingResult;

/// Headline numbers of the stored run.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Whether a newer run is currently in flight.
    pub busy: bool,
    pub site: SiteConfig,
    pub renewable_target_pct: f64,
    pub sizing: SizingResult,
    pub annual: AnnualEnergy,
    pub environmental: Environmental,
    pub financial: FinancialSummary,
    pub advisories: Vec<Advisory>,
}

impl SummaryResponse {
    pub fn new(results: &CalcResults, busy: bool) -> Self {
        Self {
            busy,
            site: results.site.clone(),
            renewable_target_pct: results.renewable_target_pct,
            sizing: results.sizing.clone(),
            annual: results.accounting.annual.clone(),
            environmental: results.accounting.environmental.clone(),
            financial: results.financials.summary.clone(),
            advisories: results.advisories.clone(),
        }
    }
}

/// Optional season filter for the dispatch endpoint.
#[derive(Debug, Deserialize)]
pub struct DispatchQuery {
    /// Season name, case-insensitive. All four seasons when absent.
    pub season: Option<String>,
}

/// Optional inclusive year range for the cash-flow endpoint.
#[derive(Debug, Deserialize)]
pub struct CashFlowQuery {
    pub from: Option<u32>,
    pub to: Option<u32>,
}

/// Error response body for 4xx and 5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
