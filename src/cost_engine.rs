// Trip cost estimation engine
// Pure and deterministic: no I/O, no clock, no logging. The caller resolves the
// destination and the cached flight quote before calling `estimate`.

use serde::{Deserialize, Serialize};

use crate::model::{CostBreakdown, DailySpendTier, Destination, FlightQuote, TripPreferences};

pub const FLIGHT_FALLBACK_EUR: i64 = 220;

// Daily spend rates per tier, in EUR per day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpendRates {
    pub budget: f64,
    pub mid: f64,
    pub comfort: f64,
}

impl DailySpendRates {
    pub fn rate(&self, tier: DailySpendTier) -> f64 {
        match tier {
            DailySpendTier::Budget => self.budget,
            DailySpendTier::Mid => self.mid,
            DailySpendTier::Comfort => self.comfort,
        }
    }
}

impl Default for DailySpendRates {
    fn default() -> Self {
        Self {
            budget: 35.0,
            mid: 60.0,
            comfort: 90.0,
        }
    }
}

// Estimator configuration, built once and never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorConfig {
    pub daily_spend: DailySpendRates,
    pub flight_fallback_eur: i64,
    pub range_low_factor: f64,
    pub range_high_factor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            daily_spend: DailySpendRates::default(),
            flight_fallback_eur: FLIGHT_FALLBACK_EUR,
            range_low_factor: 0.90,
            range_high_factor: 1.15,
        }
    }
}

// Where the flight price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightSource {
    Cached,
    FallbackNoQuote,
    FallbackNoIataCode,
}

impl FlightSource {
    fn describe(&self) -> &'static str {
        match self {
            FlightSource::Cached => "Flight: cached median estimate",
            FlightSource::FallbackNoQuote => "Flight: fallback estimate (no cached quote)",
            FlightSource::FallbackNoIataCode => "Flight: fallback estimate (no airport code)",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    config: EstimatorConfig,
}

impl CostEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    // Estimate the trip cost for one destination.
    // `flight_quote` is the cache entry for (origin, destination city, year, month), if any.
    // Preferences are expected to be validated already.
    pub fn estimate(
        &self,
        destination: &Destination,
        flight_quote: Option<&FlightQuote>,
        prefs: &TripPreferences,
    ) -> CostBreakdown {
        let multiplier = destination
            .seasonality_for(prefs.month)
            .map(|s| s.multiplier)
            .unwrap_or(1.0);

        let (flight_eur, flight_source) = self.resolve_flight(destination, flight_quote);

        let hotel_eur = round_eur(destination.hotel_night_eur * f64::from(prefs.nights) * multiplier);

        // days = nights + 1, checkout day included
        let days = f64::from(prefs.nights) + 1.0;
        let daily_eur = round_eur(self.config.daily_spend.rate(prefs.spend_style) * days * multiplier);

        let total_eur = flight_eur.saturating_add(hotel_eur).saturating_add(daily_eur);
        let range_low_eur = round_eur(total_eur as f64 * self.config.range_low_factor);
        let range_high_eur = round_eur(total_eur as f64 * self.config.range_high_factor);

        CostBreakdown {
            flight_eur,
            hotel_eur,
            daily_eur,
            total_eur,
            range_low_eur,
            range_high_eur,
            assumptions: vec![
                format!("From {}", prefs.origin_iata),
                format!("{} nights", prefs.nights),
                format!("Seasonality x{:.2}", multiplier),
                format!("Daily spend: {}", prefs.spend_style.as_str()),
                flight_source.describe().to_string(),
            ],
        }
    }

    // Flight price is never seasonality-adjusted
    fn resolve_flight(
        &self,
        destination: &Destination,
        flight_quote: Option<&FlightQuote>,
    ) -> (i64, FlightSource) {
        if destination.iata_city_code.is_none() {
            return (self.config.flight_fallback_eur, FlightSource::FallbackNoIataCode);
        }
        match flight_quote {
            Some(quote) => (quote.median_eur, FlightSource::Cached),
            None => (self.config.flight_fallback_eur, FlightSource::FallbackNoQuote),
        }
    }
}

// Round half away from zero to whole euros
pub fn round_eur(value: f64) -> i64 {
    value.round() as i64
}
