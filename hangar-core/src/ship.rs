//! Ship entity and its wire representations.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HangarError;

/// Closed set of ship classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger carrier.
    Transport,
    /// Armed vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Every ship type, in declaration order.
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Wire label for the ship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = HangarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|ship_type| ship_type.as_str() == value)
            .ok_or_else(|| HangarError::bad_request(format!("unknown ship type: {value}")))
    }
}

/// A stored ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Server-assigned identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date, epoch milliseconds on the wire.
    #[serde(with = "chrono::naive::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously owned.
    pub is_used: bool,
    /// Speed, rounded to two decimals.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating, rounded to two decimals.
    pub rating: f64,
}

/// A validated ship that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously owned.
    pub is_used: bool,
    /// Speed, rounded to two decimals.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating, rounded to two decimals.
    pub rating: f64,
}

impl NewShip {
    /// Attach the identifier assigned by the repository.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Client payload for create and update.
///
/// Every field is optional so the same shape serves as a full record on create
/// and as a patch on update. `id` and `rating` are not accepted from clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipPayload {
    /// Ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production date, epoch milliseconds.
    #[serde(
        default,
        with = "chrono::naive::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<NaiveDateTime>,
    /// Whether the ship was previously owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Speed before rounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::{Ship, ShipPayload, ShipType};
    use chrono::NaiveDate;

    fn sample_ship() -> Ship {
        Ship {
            id: 7,
            name: "Orion".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Military,
            prod_date: NaiveDate::from_ymd_opt(2995, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("date"),
            is_used: true,
            speed: 0.42,
            crew_size: 120,
            rating: -0.01,
        }
    }

    #[test]
    fn ship_type_parses_wire_labels() {
        assert_eq!("MERCHANT".parse::<ShipType>().expect("parse"), ShipType::Merchant);
        assert!("merchant".parse::<ShipType>().is_err());
        assert!("CRUISER".parse::<ShipType>().is_err());
    }

    #[test]
    fn ship_serializes_camel_case_with_epoch_millis() {
        let ship = sample_ship();
        let value = serde_json::to_value(&ship).expect("serialize");

        assert_eq!(value["shipType"], "MILITARY");
        assert_eq!(value["isUsed"], true);
        assert_eq!(value["crewSize"], 120);
        assert_eq!(
            value["prodDate"].as_i64(),
            Some(ship.prod_date.and_utc().timestamp_millis())
        );
    }

    #[test]
    fn payload_ignores_id_and_rating() {
        let payload: ShipPayload = serde_json::from_str(
            r#"{"id": 99, "rating": 5.0, "name": "Nova", "prodDate": 32503680000000}"#,
        )
        .expect("deserialize");

        assert_eq!(payload.name.as_deref(), Some("Nova"));
        assert!(payload.prod_date.is_some());
        assert!(payload.speed.is_none());
        assert!(payload.ship_type.is_none());
    }

    #[test]
    fn payload_rejects_unknown_ship_type() {
        let result = serde_json::from_str::<ShipPayload>(r#"{"shipType": "CRUISER"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn payload_accepts_explicit_nulls() {
        let payload: ShipPayload =
            serde_json::from_str(r#"{"prodDate": null, "isUsed": null}"#).expect("deserialize");
        assert_eq!(payload, ShipPayload::default());
    }
}
