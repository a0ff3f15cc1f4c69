//! JSON input: the three startup datasets and their record shapes.
//!
//! Any I/O or parse failure here is fatal to the run; the binary reports it
//! and exits non-zero. Unknown class *numbers* are not errors (pricing falls
//! back), only labels that do not look like `classN` at all.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::booking::{Booking, BookingId, BookingOrigin, VehicleClass};
use crate::fleet::{Vehicle, VehicleId};
use crate::geo::{parse_pickup_minutes, GeoPoint};

/// On-trip minutes assumed when the dataset omits `travel_time`.
const DEFAULT_TRAVEL_MIN: u32 = 30;

/// One row of `vehicles.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: u64,
    pub vehicle_type: String,
    pub home_lat: f64,
    pub home_lng: f64,
}

/// One row of `bookings.json` / `instant_bookings.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    pub booking_id: u64,
    pub vehicle_type: String,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub drop_lat: f64,
    pub drop_lon: f64,
    /// `"HH:MM"`.
    pub pickup_time: String,
    pub distance_km: f64,
    #[serde(default)]
    pub travel_time: Option<u32>,
}

/// Errors surfaced while loading the startup datasets.
#[derive(Debug)]
pub enum InputError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Class(String),
    Time(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(err) => write!(f, "reading dataset: {err}"),
            InputError::Json(err) => write!(f, "parsing dataset: {err}"),
            InputError::Class(label) => write!(f, "malformed vehicle class {label:?}"),
            InputError::Time(text) => write!(f, "malformed pickup time {text:?}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io(err) => Some(err),
            InputError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        InputError::Io(err)
    }
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        InputError::Json(err)
    }
}

/// Parse a `"classN"` capability label.
pub fn parse_class(label: &str) -> Result<VehicleClass, InputError> {
    label
        .strip_prefix("class")
        .and_then(|n| n.parse::<u8>().ok())
        .map(VehicleClass)
        .ok_or_else(|| InputError::Class(label.to_string()))
}

/// Turn vehicle rows into day-start vehicles.
pub fn vehicles_from_records(
    records: Vec<VehicleRecord>,
    day_start: u32,
) -> Result<Vec<Vehicle>, InputError> {
    records
        .into_iter()
        .map(|r| {
            Ok(Vehicle::new(
                VehicleId(r.vehicle_id),
                parse_class(&r.vehicle_type)?,
                GeoPoint::new(r.home_lat, r.home_lng),
                day_start,
            ))
        })
        .collect()
}

/// Turn booking rows into bookings tagged with their stream.
pub fn bookings_from_records(
    records: Vec<BookingRecord>,
    origin: BookingOrigin,
) -> Result<Vec<Booking>, InputError> {
    records
        .into_iter()
        .map(|r| {
            let pickup_min = parse_pickup_minutes(&r.pickup_time)
                .map_err(|_| InputError::Time(r.pickup_time.clone()))?;
            Ok(Booking {
                id: BookingId(r.booking_id),
                class: parse_class(&r.vehicle_type)?,
                pickup: GeoPoint::new(r.pickup_lat, r.pickup_lon),
                drop: GeoPoint::new(r.drop_lat, r.drop_lon),
                pickup_min,
                distance_km: r.distance_km,
                travel_min: r.travel_time.unwrap_or(DEFAULT_TRAVEL_MIN),
                origin,
            })
        })
        .collect()
}

pub fn load_vehicles(path: &Path, day_start: u32) -> Result<Vec<Vehicle>, InputError> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<VehicleRecord> = serde_json::from_reader(reader)?;
    vehicles_from_records(records, day_start)
}

pub fn load_bookings(path: &Path, origin: BookingOrigin) -> Result<Vec<Booking>, InputError> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<BookingRecord> = serde_json::from_reader(reader)?;
    bookings_from_records(records, origin)
}
