// Domain types shared by the estimator, the store and the recommendation service

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Validation errors for incoming trip preferences
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferencesError {
    #[error("Invalid month {0}: expected 1..=12")]
    InvalidMonth(u32),

    #[error("Invalid nights {0}: at least one night is required")]
    InvalidNights(u32),

    #[error("Invalid travelers {0}: at least one traveler is required")]
    InvalidTravelers(u32),

    #[error("Invalid origin code '{0}': expected three ASCII letters")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DailySpendTier {
    Budget,
    Mid,
    Comfort,
}

impl DailySpendTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailySpendTier::Budget => "BUDGET",
            DailySpendTier::Mid => "MID",
            DailySpendTier::Comfort => "COMFORT",
        }
    }
}

impl Default for DailySpendTier {
    fn default() -> Self {
        DailySpendTier::Mid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonType {
    Low,
    Shoulder,
    High,
}

// Only two classes exist for now and neither changes the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HotelClass {
    Budget,
    Mid,
}

impl Default for HotelClass {
    fn default() -> Self {
        HotelClass::Mid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalityEntry {
    pub month: u32,
    pub season: SeasonType,
    pub multiplier: f64,
}

impl SeasonalityEntry {
    pub fn shoulder(month: u32) -> Self {
        Self {
            month,
            season: SeasonType::Shoulder,
            multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub city: String,
    pub country: String,
    pub iata_city_code: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub hotel_night_eur: f64,
    pub daily_spend_tier: DailySpendTier,
    pub seasonality: Vec<SeasonalityEntry>,
}

impl Destination {
    pub fn seasonality_for(&self, month: u32) -> Option<&SeasonalityEntry> {
        self.seasonality.iter().find(|s| s.month == month)
    }
}

// Cached median flight price for one (origin, destination city, year, month)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuote {
    pub origin_iata: String,
    pub dest_iata_city: String,
    pub year: i32,
    pub month: u32,
    pub median_eur: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    pub origin_iata: String,
    pub nights: u32,
    pub travelers: u32,
    pub year: i32,
    pub month: u32,
    pub hotel_class: HotelClass,
    pub spend_style: DailySpendTier,
}

impl TripPreferences {
    pub fn validate(&self) -> Result<(), PreferencesError> {
        if !(1..=12).contains(&self.month) {
            return Err(PreferencesError::InvalidMonth(self.month));
        }
        if self.nights < 1 {
            return Err(PreferencesError::InvalidNights(self.nights));
        }
        if self.travelers < 1 {
            return Err(PreferencesError::InvalidTravelers(self.travelers));
        }
        let origin = self.origin_iata.as_bytes();
        if origin.len() != 3 || !origin.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(PreferencesError::InvalidOrigin(self.origin_iata.clone()));
        }
        Ok(())
    }

    // One-line description shown next to the results, e.g. "BER · 5 nights · 6/2026 · MID"
    pub fn summary(&self) -> String {
        format!(
            "{} · {} nights · {}/{} · {}",
            self.origin_iata,
            self.nights,
            self.month,
            self.year,
            self.spend_style.as_str()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub flight_eur: i64,
    pub hotel_eur: i64,
    pub daily_eur: i64,
    pub total_eur: i64,
    pub range_low_eur: i64,
    pub range_high_eur: i64,
    pub assumptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> TripPreferences {
        TripPreferences {
            origin_iata: "BER".to_string(),
            nights: 5,
            travelers: 2,
            year: 2026,
            month: 6,
            hotel_class: HotelClass::Mid,
            spend_style: DailySpendTier::Mid,
        }
    }

    #[test]
    fn test_valid_preferences() {
        assert_eq!(prefs().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_preferences_are_rejected() {
        let p = TripPreferences { month: 13, ..prefs() };
        assert_eq!(p.validate(), Err(PreferencesError::InvalidMonth(13)));

        let p = TripPreferences { month: 0, ..prefs() };
        assert_eq!(p.validate(), Err(PreferencesError::InvalidMonth(0)));

        let p = TripPreferences { nights: 0, ..prefs() };
        assert_eq!(p.validate(), Err(PreferencesError::InvalidNights(0)));

        let p = TripPreferences { travelers: 0, ..prefs() };
        assert_eq!(p.validate(), Err(PreferencesError::InvalidTravelers(0)));

        for origin in ["BE", "BERL", "ber", "B3R", ""] {
            let p = TripPreferences {
                origin_iata: origin.to_string(),
                ..prefs()
            };
            assert!(
                matches!(p.validate(), Err(PreferencesError::InvalidOrigin(_))),
                "origin {origin:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(prefs().summary(), "BER · 5 nights · 6/2026 · MID");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(prefs()).unwrap();
        assert_eq!(json["originIata"], "BER");
        assert_eq!(json["spendStyle"], "MID");
        assert_eq!(json["hotelClass"], "MID");

        let entry: SeasonalityEntry =
            serde_json::from_str(r#"{"month":6,"season":"HIGH","multiplier":1.25}"#).unwrap();
        assert_eq!(entry.season, SeasonType::High);
        assert_eq!(entry.multiplier, 1.25);
    }
}
