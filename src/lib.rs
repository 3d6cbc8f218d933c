// Trip cost estimation library: estimates flight + hotel + daily spend per destination
// and ranks a shortlist of destinations by estimated total cost

pub mod cost_engine;
pub mod model;
pub mod recommend;
pub mod store;

// Re-export key types for convenience
pub use cost_engine::{CostEstimator, DailySpendRates, EstimatorConfig, FLIGHT_FALLBACK_EUR};
pub use model::{
    CostBreakdown, DailySpendTier, Destination, FlightQuote, HotelClass, PreferencesError,
    SeasonType, SeasonalityEntry, TripPreferences,
};
pub use recommend::{
    filter_by_budget, rank_by_total, Recommendation, RecommendationConfig, RecommendationError,
    RecommendationRequest, RecommendationResponse, RecommendationService,
};
pub use store::{
    DestinationOrder, DestinationSeed, InMemoryStore, StoreConfig, StoreError, StoreStats,
    TravelDataStore,
};
