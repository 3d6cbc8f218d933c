// Travel reference data store: destinations with their seasonality, and the flight quote cache.
// The recommendation service only reads through `TravelDataStore`; `InMemoryStore` is the
// bundled implementation used for seeding, tests and small deployments.

use std::{path::Path, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{DailySpendTier, Destination, FlightQuote, SeasonType, SeasonalityEntry};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid seed for {city}, {country}: {reason}")]
    InvalidSeed {
        city: String,
        country: String,
        reason: String,
    },

    #[error("Invalid flight quote: {0}")]
    InvalidQuote(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

// Lookup statistics for the store
#[derive(Debug, Default, Clone)]
pub struct StoreStats {
    pub destinations_count: usize,
    pub quotes_count: usize,
    pub quote_hit_count: usize,
    pub quote_miss_count: usize,
    pub destination_lookups: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    pub initial_capacity: usize,
    pub shards_count: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            shards_count: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DestinationOrder {
    #[default]
    CityAsc,
    CountryThenCityAsc,
}

// Read interface consumed by the recommendation service.
// Implementations must allow concurrent reads with no write side effects.
#[async_trait]
pub trait TravelDataStore: Send + Sync + 'static {
    // At most `limit` destinations, each with its full seasonality table
    async fn get_destinations_page(
        &self,
        limit: usize,
        order: DestinationOrder,
    ) -> Result<Vec<Destination>, StoreError>;

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError>;

    // Cached median quote, `None` on a miss
    async fn get_flight_quote(
        &self,
        origin_iata: &str,
        dest_iata_city: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<FlightQuote>, StoreError>;
}

// Upper bound for nightly rates and quoted fares, in EUR
pub const MAX_PRICE_EUR: i64 = 1_000_000;

pub fn create_quote_key(origin_iata: &str, dest_iata_city: &str, year: i32, month: u32) -> String {
    format!("{}:{}:{}:{:02}", origin_iata, dest_iata_city, year, month)
}

pub fn destination_id(city: &str, country: &str) -> String {
    let slug = |s: &str| {
        s.trim()
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    };
    format!("{}-{}", slug(city), slug(country))
}

// Seed record for a destination; seasonality may be partial
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSeed {
    pub city: String,
    pub country: String,
    pub iata_city_code: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub hotel_night_eur: f64,
    pub daily_spend_tier: DailySpendTier,
    #[serde(default)]
    pub seasonality: Vec<SeasonalityEntry>,
}

impl DestinationSeed {
    // Expand to a full destination with exactly one seasonality entry per month
    pub fn into_destination(self) -> Result<Destination, StoreError> {
        let invalid = |reason: String| StoreError::InvalidSeed {
            city: self.city.clone(),
            country: self.country.clone(),
            reason,
        };

        if !(self.hotel_night_eur.is_finite()
            && (0.0..=MAX_PRICE_EUR as f64).contains(&self.hotel_night_eur))
        {
            return Err(invalid(format!("hotel night rate {}", self.hotel_night_eur)));
        }

        let mut months: [Option<SeasonalityEntry>; 12] = [None; 12];
        for entry in &self.seasonality {
            if !(1..=12).contains(&entry.month) {
                return Err(invalid(format!("month {} out of range", entry.month)));
            }
            if !(entry.multiplier.is_finite() && entry.multiplier > 0.0) {
                return Err(invalid(format!(
                    "multiplier {} for month {} must be positive",
                    entry.multiplier, entry.month
                )));
            }
            let slot = &mut months[(entry.month - 1) as usize];
            if slot.is_some() {
                return Err(invalid(format!("duplicate month {}", entry.month)));
            }
            *slot = Some(*entry);
        }

        let seasonality = months
            .into_iter()
            .zip(1u32..)
            .map(|(entry, month)| entry.unwrap_or_else(|| SeasonalityEntry::shoulder(month)))
            .collect();

        Ok(Destination {
            id: destination_id(&self.city, &self.country),
            city: self.city,
            country: self.country,
            iata_city_code: self.iata_city_code,
            lat: self.lat,
            lng: self.lng,
            hotel_night_eur: self.hotel_night_eur,
            daily_spend_tier: self.daily_spend_tier,
            seasonality,
        })
    }
}

pub fn default_seeds() -> Vec<DestinationSeed> {
    vec![
        DestinationSeed {
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            iata_city_code: Some("LIS".to_string()),
            lat: 38.7223,
            lng: -9.1393,
            hotel_night_eur: 120.0,
            daily_spend_tier: DailySpendTier::Mid,
            seasonality: vec![
                SeasonalityEntry { month: 1, season: SeasonType::Low, multiplier: 0.85 },
                SeasonalityEntry { month: 6, season: SeasonType::High, multiplier: 1.25 },
                SeasonalityEntry { month: 9, season: SeasonType::Shoulder, multiplier: 1.0 },
            ],
        },
        DestinationSeed {
            city: "Budapest".to_string(),
            country: "Hungary".to_string(),
            iata_city_code: Some("BUD".to_string()),
            lat: 47.4979,
            lng: 19.0402,
            hotel_night_eur: 95.0,
            daily_spend_tier: DailySpendTier::Budget,
            seasonality: vec![
                SeasonalityEntry { month: 1, season: SeasonType::Low, multiplier: 0.9 },
                SeasonalityEntry { month: 7, season: SeasonType::High, multiplier: 1.2 },
                SeasonalityEntry { month: 10, season: SeasonType::Shoulder, multiplier: 1.0 },
            ],
        },
    ]
}

pub fn parse_seeds(json: &str) -> anyhow::Result<Vec<DestinationSeed>> {
    serde_json::from_str(json).context("failed to parse destination seeds")
}

pub fn load_seeds(path: impl AsRef<Path>) -> anyhow::Result<Vec<DestinationSeed>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    parse_seeds(&raw).with_context(|| format!("in seed file {}", path.display()))
}

#[derive(Default)]
pub struct InMemoryStore {
    destinations: DashMap<String, Destination>,
    // exact (city, country) -> destination id
    keys: DashMap<(String, String), String>,
    quotes: DashMap<String, FlightQuote>,
    stats: Arc<RwLock<StoreStats>>,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            destinations: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shards_count,
            ),
            keys: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shards_count,
            ),
            quotes: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shards_count,
            ),
            stats: Arc::new(RwLock::new(StoreStats::default())),
        }
    }

    pub fn with_seeds(seeds: Vec<DestinationSeed>) -> Result<Self, StoreError> {
        let store = Self::new(StoreConfig::default());
        store.seed(seeds)?;
        Ok(store)
    }

    // Insert by the exact (city, country) pair; an existing record is left untouched.
    // Returns the id of the stored destination. Pairs whose slugs collide get a numeric suffix.
    pub fn upsert_destination(&self, seed: DestinationSeed) -> Result<String, StoreError> {
        let mut destination = seed.into_destination()?;
        let pair = (destination.city.clone(), destination.country.clone());

        let slot = match self.keys.entry(pair) {
            Entry::Occupied(existing) => {
                let id = existing.get().clone();
                debug!(id = %id, "destination already seeded, keeping existing record");
                return Ok(id);
            }
            Entry::Vacant(slot) => slot,
        };

        let base_id = destination.id.clone();
        let mut suffix = 1;
        loop {
            match self.destinations.entry(destination.id.clone()) {
                Entry::Occupied(_) => {
                    suffix += 1;
                    destination.id = format!("{}-{}", base_id, suffix);
                }
                Entry::Vacant(vacant) => {
                    let id = destination.id.clone();
                    vacant.insert(destination);
                    slot.insert(id.clone());
                    self.stats.write().destinations_count += 1;
                    return Ok(id);
                }
            }
        }
    }

    pub fn seed(&self, seeds: Vec<DestinationSeed>) -> Result<usize, StoreError> {
        let count = seeds.len();
        for seed in seeds {
            self.upsert_destination(seed)?;
        }
        info!(count, "seeded destinations");
        Ok(count)
    }

    // Insert or replace the cached quote for its key
    pub fn put_flight_quote(&self, quote: FlightQuote) -> Result<(), StoreError> {
        if !(1..=12).contains(&quote.month) {
            return Err(StoreError::InvalidQuote(format!(
                "month {} out of range",
                quote.month
            )));
        }
        if !(0..=MAX_PRICE_EUR).contains(&quote.median_eur) {
            return Err(StoreError::InvalidQuote(format!(
                "median price {} outside 0..={}",
                quote.median_eur, MAX_PRICE_EUR
            )));
        }

        let key = create_quote_key(&quote.origin_iata, &quote.dest_iata_city, quote.year, quote.month);
        if self.quotes.insert(key, quote).is_none() {
            self.stats.write().quotes_count += 1;
        }
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        self.stats.read().clone()
    }
}

#[async_trait]
impl TravelDataStore for InMemoryStore {
    async fn get_destinations_page(
        &self,
        limit: usize,
        order: DestinationOrder,
    ) -> Result<Vec<Destination>, StoreError> {
        let mut all: Vec<Destination> = self.destinations.iter().map(|d| d.value().clone()).collect();

        match order {
            DestinationOrder::CityAsc => all.sort_by(|a, b| {
                a.city.cmp(&b.city).then_with(|| a.country.cmp(&b.country))
            }),
            DestinationOrder::CountryThenCityAsc => all.sort_by(|a, b| {
                a.country.cmp(&b.country).then_with(|| a.city.cmp(&b.city))
            }),
        }
        all.truncate(limit);

        Ok(all)
    }

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        self.stats.write().destination_lookups += 1;
        Ok(self.destinations.get(id).map(|d| d.value().clone()))
    }

    async fn get_flight_quote(
        &self,
        origin_iata: &str,
        dest_iata_city: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<FlightQuote>, StoreError> {
        let key = create_quote_key(origin_iata, dest_iata_city, year, month);

        match self.quotes.get(&key) {
            Some(quote) => {
                self.stats.write().quote_hit_count += 1;
                Ok(Some(quote.value().clone()))
            }
            None => {
                self.stats.write().quote_miss_count += 1;
                debug!(key = %key, "flight quote cache miss");
                Ok(None)
            }
        }
    }
}
