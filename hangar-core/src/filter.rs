//! Translation of list query parameters into ship filters and paging.
//!
//! A request carries a sparse map of string parameters. [`ShipQuery::from_params`]
//! turns it into a conjunction of [`ShipFilter`] criteria and a [`PageRequest`].
//! Criteria can be checked in memory with [`ShipFilter::matches`]; storage
//! backends translate them into their own query language.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};

use crate::error::{HangarError, Result};
use crate::ship::{Ship, ShipType};

/// Page index used when `pageNumber` is absent.
pub const DEFAULT_PAGE_NUMBER: i64 = 0;
/// Page size used when `pageSize` is absent.
pub const DEFAULT_PAGE_SIZE: i64 = 3;

/// A single criterion over ship fields. Range bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipFilter {
    /// Name contains the substring (case-sensitive).
    NameContains(String),
    /// Planet contains the substring (case-sensitive).
    PlanetContains(String),
    /// Ship type equals.
    ShipTypeIs(ShipType),
    /// Usage flag equals.
    UsedIs(bool),
    /// Crew size within bounds.
    CrewSizeRange {
        /// Lower bound.
        min: Option<i32>,
        /// Upper bound.
        max: Option<i32>,
    },
    /// Speed within bounds.
    SpeedRange {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
    },
    /// Rating within bounds.
    RatingRange {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
    },
    /// Production date within bounds.
    ProdDateRange {
        /// Earliest production date.
        after: Option<NaiveDateTime>,
        /// Latest production date.
        before: Option<NaiveDateTime>,
    },
}

impl ShipFilter {
    /// Evaluate the criterion against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            ShipFilter::NameContains(needle) => ship.name.contains(needle.as_str()),
            ShipFilter::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            ShipFilter::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            ShipFilter::UsedIs(is_used) => ship.is_used == *is_used,
            ShipFilter::CrewSizeRange { min, max } => within(&ship.crew_size, min, max),
            ShipFilter::SpeedRange { min, max } => within(&ship.speed, min, max),
            ShipFilter::RatingRange { min, max } => within(&ship.rating, min, max),
            ShipFilter::ProdDateRange { after, before } => within(&ship.prod_date, after, before),
        }
    }
}

fn within<T: PartialOrd>(value: &T, min: &Option<T>, max: &Option<T>) -> bool {
    min.as_ref().is_none_or(|min| value >= min) && max.as_ref().is_none_or(|max| value <= max)
}

/// Field a listing is sorted by, ascending.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ShipOrder {
    /// Identifier.
    #[default]
    Id,
    /// Name.
    Name,
    /// Planet.
    Planet,
    /// Ship type.
    ShipType,
    /// Production date.
    ProdDate,
    /// Usage flag.
    IsUsed,
    /// Speed.
    Speed,
    /// Crew size.
    CrewSize,
    /// Rating.
    Rating,
}

impl ShipOrder {
    /// Compare two ships by this field, breaking ties by id.
    pub fn compare(&self, a: &Ship, b: &Ship) -> Ordering {
        let primary = match self {
            ShipOrder::Id => Ordering::Equal,
            ShipOrder::Name => a.name.cmp(&b.name),
            ShipOrder::Planet => a.planet.cmp(&b.planet),
            ShipOrder::ShipType => a.ship_type.as_str().cmp(b.ship_type.as_str()),
            ShipOrder::ProdDate => a.prod_date.cmp(&b.prod_date),
            ShipOrder::IsUsed => a.is_used.cmp(&b.is_used),
            ShipOrder::Speed => a.speed.total_cmp(&b.speed),
            ShipOrder::CrewSize => a.crew_size.cmp(&b.crew_size),
            ShipOrder::Rating => a.rating.total_cmp(&b.rating),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

impl FromStr for ShipOrder {
    type Err = HangarError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().replace('_', "").as_str() {
            "id" => Ok(ShipOrder::Id),
            "name" => Ok(ShipOrder::Name),
            "planet" => Ok(ShipOrder::Planet),
            "shiptype" => Ok(ShipOrder::ShipType),
            "proddate" | "date" => Ok(ShipOrder::ProdDate),
            "isused" => Ok(ShipOrder::IsUsed),
            "speed" => Ok(ShipOrder::Speed),
            "crewsize" => Ok(ShipOrder::CrewSize),
            "rating" => Ok(ShipOrder::Rating),
            _ => Err(HangarError::bad_request(format!("unknown order field: {value}"))),
        }
    }
}

/// Which slice of the matching ships to return.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub number: i64,
    /// Ships per page, at least one.
    pub size: i64,
    /// Sort field.
    pub order: ShipOrder,
}

impl PageRequest {
    /// Number of matching ships skipped before this page.
    pub fn offset(&self) -> i64 {
        self.number.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
            order: ShipOrder::Id,
        }
    }
}

/// Conjunctive filter plus paging for a ship listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShipQuery {
    /// Criteria that must all hold.
    pub filters: Vec<ShipFilter>,
    /// Requested page.
    pub page: PageRequest,
}

impl ShipQuery {
    /// Build a query from request parameters. Unrecognized keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let mut filters = Vec::new();

        if let Some(name) = param(params, "name") {
            filters.push(ShipFilter::NameContains(name.to_string()));
        }
        if let Some(planet) = param(params, "planet") {
            filters.push(ShipFilter::PlanetContains(planet.to_string()));
        }
        if let Some(ship_type) = param(params, "shipType") {
            filters.push(ShipFilter::ShipTypeIs(ship_type.parse()?));
        }
        if let Some(is_used) = param(params, "isUsed") {
            filters.push(ShipFilter::UsedIs(is_used.eq_ignore_ascii_case("true")));
        }

        let (min, max) = (
            parse_opt(param(params, "minCrewSize"), "minCrewSize", parse_int)?,
            parse_opt(param(params, "maxCrewSize"), "maxCrewSize", parse_int)?,
        );
        if min.is_some() || max.is_some() {
            filters.push(ShipFilter::CrewSizeRange { min, max });
        }

        let (min, max) = (
            parse_opt(param(params, "minSpeed"), "minSpeed", parse_float)?,
            parse_opt(param(params, "maxSpeed"), "maxSpeed", parse_float)?,
        );
        if min.is_some() || max.is_some() {
            filters.push(ShipFilter::SpeedRange { min, max });
        }

        let (min, max) = (
            parse_opt(param(params, "minRating"), "minRating", parse_float)?,
            parse_opt(param(params, "maxRating"), "maxRating", parse_float)?,
        );
        if min.is_some() || max.is_some() {
            filters.push(ShipFilter::RatingRange { min, max });
        }

        let (after, before) = (
            parse_opt(param(params, "after"), "after", parse_millis)?,
            parse_opt(param(params, "before"), "before", parse_millis)?,
        );
        if after.is_some() || before.is_some() {
            filters.push(ShipFilter::ProdDateRange { after, before });
        }

        let number = parse_opt(param(params, "pageNumber"), "pageNumber", parse_long)?
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        if number < 0 {
            return Err(HangarError::bad_request(format!(
                "pageNumber must not be negative, got {number}"
            )));
        }
        let size =
            parse_opt(param(params, "pageSize"), "pageSize", parse_long)?.unwrap_or(DEFAULT_PAGE_SIZE);
        if size < 1 {
            return Err(HangarError::bad_request(format!(
                "pageSize must be at least 1, got {size}"
            )));
        }
        let order = param(params, "order").map(str::parse::<ShipOrder>).transpose()?.unwrap_or_default();

        Ok(Self {
            filters,
            page: PageRequest {
                number,
                size,
                order,
            },
        })
    }

    /// Whether a ship satisfies every criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.filters.iter().all(|filter| filter.matches(ship))
    }
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

fn parse_opt<T>(
    raw: Option<&str>,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    raw.map(|value| {
        parse(value)
            .ok_or_else(|| HangarError::bad_request(format!("invalid {key} parameter: {value}")))
    })
    .transpose()
}

fn parse_int(value: &str) -> Option<i32> {
    value.parse().ok()
}

fn parse_long(value: &str) -> Option<i64> {
    value.parse().ok()
}

fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn parse_millis(value: &str) -> Option<NaiveDateTime> {
    let millis = value.parse::<i64>().ok()?;
    DateTime::from_timestamp_millis(millis).map(|instant| instant.naive_utc())
}
