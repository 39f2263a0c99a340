//! Field validation and rating computation for ship payloads.
//!
//! [`validate_new`] and [`apply_patch`] are the two entry points. Both run the
//! same per-field rules in the same order and stop at the first violation.

use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{HangarError, Result};
use crate::ship::{NewShip, Ship, ShipPayload};

/// Maximum length of `name` and `planet`, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Lowest accepted speed after rounding.
pub const MIN_SPEED: f64 = 0.10;
/// Highest accepted speed after rounding.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = 3019;

/// Round to two decimals, ties toward zero.
///
/// The value is rounded from its shortest decimal representation, so `0.125`
/// becomes `0.12` and `0.126` becomes `0.13`. Returns `None` for values that
/// have no decimal representation (NaN, infinities, magnitudes beyond
/// `Decimal`).
pub fn round2_half_down(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let decimal = Decimal::from_str(&value.to_string()).ok()?;
    let rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointTowardZero);
    if rounded.is_zero() {
        return Some(0.0);
    }
    rounded.to_string().parse().ok()
}

/// Compute the derived rating from the effective speed, usage flag and
/// production date.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: &NaiveDateTime) -> Result<f64> {
    let year = prod_date.year();
    let wear = if is_used { 0.5 } else { 1.0 };
    let raw = (80.0 * speed * wear) / (1119.0 - f64::from(year) + 1.0);
    round2_half_down(raw).ok_or_else(|| {
        HangarError::bad_request(format!("rating is undefined for production year {year}"))
    })
}

/// Parse a path id, requiring a positive integer.
pub fn parse_ship_id(raw: &str) -> Result<i64> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| HangarError::bad_request(format!("invalid ship id: {raw}")))?;
    check_id(id)?;
    Ok(id)
}

/// Require a positive id.
pub fn check_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(HangarError::bad_request(format!(
            "ship id must be positive, got {id}"
        )));
    }
    Ok(())
}

/// Validate a complete payload for creation and compute its rating.
pub fn validate_new(payload: ShipPayload) -> Result<NewShip> {
    let name = required(payload.name, "name")?;
    check_text("name", &name)?;
    let planet = required(payload.planet, "planet")?;
    check_text("planet", &planet)?;
    let speed = normalize_speed(required(payload.speed, "speed")?)?;
    let crew_size = required(payload.crew_size, "crewSize")?;
    check_crew_size(crew_size)?;
    let prod_date = required(payload.prod_date, "prodDate")?;
    check_prod_date(&prod_date)?;
    let ship_type = required(payload.ship_type, "shipType")?;
    let is_used = payload.is_used.unwrap_or(false);
    let rating = compute_rating(speed, is_used, &prod_date)?;

    Ok(NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
        rating,
    })
}

/// Apply the supplied fields of a patch onto a copy of `existing`.
///
/// The rating is recomputed even when no field is supplied. On error nothing
/// about `existing` changes.
pub fn apply_patch(existing: &Ship, payload: ShipPayload) -> Result<Ship> {
    let mut ship = existing.clone();
    if let Some(name) = payload.name {
        check_text("name", &name)?;
        ship.name = name;
    }
    if let Some(planet) = payload.planet {
        check_text("planet", &planet)?;
        ship.planet = planet;
    }
    if let Some(speed) = payload.speed {
        ship.speed = normalize_speed(speed)?;
    }
    if let Some(crew_size) = payload.crew_size {
        check_crew_size(crew_size)?;
        ship.crew_size = crew_size;
    }
    if let Some(prod_date) = payload.prod_date {
        check_prod_date(&prod_date)?;
        ship.prod_date = prod_date;
    }
    if let Some(ship_type) = payload.ship_type {
        ship.ship_type = ship_type;
    }
    if let Some(is_used) = payload.is_used {
        ship.is_used = is_used;
    }
    ship.rating = compute_rating(ship.speed, ship.is_used, &ship.prod_date)?;
    Ok(ship)
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| HangarError::bad_request(format!("{field} is required")))
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(HangarError::bad_request(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(HangarError::bad_request(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

fn normalize_speed(speed: f64) -> Result<f64> {
    let rounded = round2_half_down(speed)
        .ok_or_else(|| HangarError::bad_request(format!("speed is not a number: {speed}")))?;
    if !(MIN_SPEED..=MAX_SPEED).contains(&rounded) {
        return Err(HangarError::bad_request(format!(
            "speed must be within [{MIN_SPEED}, {MAX_SPEED}], got {rounded}"
        )));
    }
    Ok(rounded)
}

fn check_crew_size(crew_size: i32) -> Result<()> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(HangarError::bad_request(format!(
            "crewSize must be within [{MIN_CREW_SIZE}, {MAX_CREW_SIZE}], got {crew_size}"
        )));
    }
    Ok(())
}

fn check_prod_date(prod_date: &NaiveDateTime) -> Result<()> {
    let year = prod_date.year();
    if !(MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&year) {
        return Err(HangarError::bad_request(format!(
            "prodDate year must be within [{MIN_PROD_YEAR}, {MAX_PROD_YEAR}], got {year}"
        )));
    }
    Ok(())
}
