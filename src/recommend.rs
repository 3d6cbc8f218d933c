// Recommendation service: shortlists destinations, estimates each one and ranks them by total cost

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cost_engine::CostEstimator;
use crate::model::{
    CostBreakdown, DailySpendTier, Destination, HotelClass, PreferencesError, TripPreferences,
};
use crate::store::{DestinationOrder, StoreError, TravelDataStore};

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Destination not found: {0}")]
    DestinationNotFound(String),

    #[error("Invalid preferences: {0}")]
    InvalidPreferences(#[from] PreferencesError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationConfig {
    pub candidate_limit: usize,
    pub candidate_order: DestinationOrder,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 30,
            candidate_order: DestinationOrder::CityAsc,
        }
    }
}

// Incoming request body; every field is optional and falls back to a default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub origin_iata: Option<String>,
    pub nights: Option<u32>,
    pub travelers: Option<u32>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub hotel_class: Option<HotelClass>,
    pub spend_style: Option<DailySpendTier>,
}

impl RecommendationRequest {
    pub fn into_preferences(self) -> TripPreferences {
        self.into_preferences_at(Utc::now())
    }

    // Missing year/month are taken from `now`
    pub fn into_preferences_at(self, now: DateTime<Utc>) -> TripPreferences {
        TripPreferences {
            origin_iata: self
                .origin_iata
                .map(|o| o.trim().to_uppercase())
                .unwrap_or_else(|| "BER".to_string()),
            nights: self.nights.unwrap_or(5),
            travelers: self.travelers.unwrap_or(2),
            year: self.year.unwrap_or_else(|| now.year()),
            month: self.month.unwrap_or_else(|| now.month()),
            hotel_class: self.hotel_class.unwrap_or_default(),
            spend_style: self.spend_style.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub destination: Destination,
    pub cost: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationFailure {
    pub destination_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub prefs: TripPreferences,
    pub results: Vec<Recommendation>,
    pub failures: Vec<EstimationFailure>,
}

impl RecommendationResponse {
    pub fn within_budget(&self, budget_max_eur: i64) -> Vec<&Recommendation> {
        filter_by_budget(&self.results, budget_max_eur)
    }
}

// Stable sort by total; equal totals keep their input order
pub fn rank_by_total(mut results: Vec<Recommendation>) -> Vec<Recommendation> {
    results.sort_by_key(|r| r.cost.total_eur);
    results
}

// Keeps results whose optimistic bound fits the budget
pub fn filter_by_budget(results: &[Recommendation], budget_max_eur: i64) -> Vec<&Recommendation> {
    results
        .iter()
        .filter(|r| r.cost.range_low_eur <= budget_max_eur)
        .collect()
}

pub struct RecommendationService<S: TravelDataStore> {
    store: Arc<S>,
    estimator: CostEstimator,
    config: RecommendationConfig,
}

impl<S: TravelDataStore> RecommendationService<S> {
    pub fn new(store: Arc<S>, estimator: CostEstimator, config: RecommendationConfig) -> Self {
        Self {
            store,
            estimator,
            config,
        }
    }

    // Estimate a single destination by id
    pub async fn estimate_for(
        &self,
        destination_id: &str,
        prefs: &TripPreferences,
    ) -> Result<CostBreakdown, RecommendationError> {
        prefs.validate()?;

        let destination = self
            .store
            .get_destination(destination_id)
            .await?
            .ok_or_else(|| RecommendationError::DestinationNotFound(destination_id.to_string()))?;

        self.estimate_destination(&destination, prefs).await
    }

    // Estimate every candidate concurrently and rank by total cost.
    // A candidate that fails is reported in `failures` and does not abort the batch.
    pub async fn recommend(
        &self,
        prefs: TripPreferences,
    ) -> Result<RecommendationResponse, RecommendationError> {
        prefs.validate()?;

        let candidates = self
            .store
            .get_destinations_page(self.config.candidate_limit, self.config.candidate_order)
            .await?;
        debug!(count = candidates.len(), "estimating candidates");

        let outcomes = join_all(
            candidates
                .iter()
                .map(|destination| self.estimate_destination(destination, &prefs)),
        )
        .await;

        let mut results = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();
        for (destination, outcome) in candidates.into_iter().zip(outcomes) {
            match outcome {
                Ok(cost) => results.push(Recommendation { destination, cost }),
                Err(e) => {
                    warn!(destination = %destination.id, error = %e, "estimation failed");
                    failures.push(EstimationFailure {
                        destination_id: destination.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let results = rank_by_total(results);
        info!(
            results = results.len(),
            failures = failures.len(),
            "recommendations ready for {}",
            prefs.summary()
        );

        Ok(RecommendationResponse {
            prefs,
            results,
            failures,
        })
    }

    async fn estimate_destination(
        &self,
        destination: &Destination,
        prefs: &TripPreferences,
    ) -> Result<CostBreakdown, RecommendationError> {
        let quote = match &destination.iata_city_code {
            Some(code) => {
                self.store
                    .get_flight_quote(&prefs.origin_iata, code, prefs.year, prefs.month)
                    .await?
            }
            None => None,
        };

        Ok(self.estimator.estimate(destination, quote.as_ref(), prefs))
    }
}
