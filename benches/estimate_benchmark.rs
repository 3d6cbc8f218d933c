use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use trip_cost_estimator::{
    rank_by_total, CostEstimator, DailySpendTier, DestinationSeed, HotelClass, Recommendation,
    SeasonType, SeasonalityEntry, TripPreferences,
};

fn random_destinations(count: usize) -> Vec<trip_cost_estimator::Destination> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            DestinationSeed {
                city: format!("City{}", i),
                country: "Benchland".to_string(),
                iata_city_code: if i % 3 == 0 { None } else { Some(format!("C{:02}", i % 100)) },
                lat: 0.0,
                lng: 0.0,
                hotel_night_eur: rng.gen_range(40.0..250.0),
                daily_spend_tier: DailySpendTier::Mid,
                seasonality: (1..=12)
                    .filter_map(|month| {
                        rng.gen_bool(0.5).then(|| SeasonalityEntry {
                            month,
                            season: SeasonType::Shoulder,
                            multiplier: rng.gen_range(0.7..1.5),
                        })
                    })
                    .collect(),
            }
            .into_destination()
            .unwrap()
        })
        .collect()
}

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

pub fn estimate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("trip_cost_estimator");
    let estimator = CostEstimator::default();
    let prefs = prefs();

    for count in [30usize, 300, 3000].iter() {
        let destinations = random_destinations(*count);

        group.bench_with_input(BenchmarkId::new("estimate", count), count, |b, _| {
            b.iter(|| {
                for destination in &destinations {
                    black_box(estimator.estimate(destination, None, &prefs));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("estimate_and_rank", count), count, |b, _| {
            b.iter(|| {
                let results: Vec<Recommendation> = destinations
                    .iter()
                    .map(|destination| Recommendation {
                        destination: destination.clone(),
                        cost: estimator.estimate(destination, None, &prefs),
                    })
                    .collect();
                black_box(rank_by_total(results))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, estimate_benchmark);
criterion_main!(benches);
