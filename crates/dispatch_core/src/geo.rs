//! Geographic oracle: coordinates, road distance, pickup-time parsing.
//!
//! Distances are great-circle kilometres scaled by a road factor, rounded to
//! two decimals, and memoised in a global LRU keyed by quantized coordinates.

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use chrono::{NaiveTime, Timelike};
use lru::LruCache;
use serde::{Deserialize, Serialize};

/// Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Multiplier turning great-circle distance into an approximate road distance.
pub const ROAD_FACTOR: f64 = 1.3;

/// Cache-key quantization: one microdegree (~0.11 m at the equator).
const MICRODEG: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

fn distance_km_uncached(a: GeoPoint, b: GeoPoint) -> f64 {
    let road_km = haversine_km(a, b) * ROAD_FACTOR;
    (road_km * 100.0).round() / 100.0
}

fn quantize(p: GeoPoint) -> (i64, i64) {
    ((p.lat * MICRODEG).round() as i64, (p.lng * MICRODEG).round() as i64)
}

type DistanceKey = ((i64, i64), (i64, i64));

/// Global distance cache (50,000 entries).
fn distance_cache() -> &'static Mutex<LruCache<DistanceKey, f64>> {
    static CACHE: OnceLock<Mutex<LruCache<DistanceKey, f64>>> = OnceLock::new();
    CACHE.get_or_init(|| {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(50_000).expect("cache size must be non-zero"),
        ))
    })
}

/// Road distance between two points in km.
///
/// Symmetric, so the cache key orders its endpoints; a poisoned cache mutex
/// falls back to the direct computation.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (qa, qb) = (quantize(a), quantize(b));
    let key = if qa < qb { (qa, qb) } else { (qb, qa) };

    let mut cache = match distance_cache().lock() {
        Ok(guard) => guard,
        Err(_) => return distance_km_uncached(a, b),
    };
    *cache.get_or_insert(key, || distance_km_uncached(a, b))
}

/// Minutes needed to cover `distance_km` at `speed_kmh`.
pub fn travel_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return f64::INFINITY;
    }
    distance_km / speed_kmh * 60.0
}

/// Parse an `"HH:MM"` pickup time into minutes since midnight.
pub fn parse_pickup_minutes(text: &str) -> Result<u32, chrono::ParseError> {
    let t = NaiveTime::parse_from_str(text, "%H:%M")?;
    Ok(t.hour() * 60 + t.minute())
}
