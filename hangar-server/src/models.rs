//! Database models for Hangar server.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use hangar_core::{HangarError, NewShip, Ship, ShipType};

use crate::schema::ship;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ship)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Ship database record.
pub struct ShipRow {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously owned.
    pub is_used: bool,
    /// Rounded speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Rounded rating.
    pub rating: f64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ship)]
/// Insertable ship columns, also used as the update changeset.
pub struct ShipChanges {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Whether the ship was previously owned.
    pub is_used: bool,
    /// Rounded speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Rounded rating.
    pub rating: f64,
}

impl TryFrom<ShipRow> for Ship {
    type Error = HangarError;

    fn try_from(row: ShipRow) -> Result<Self, Self::Error> {
        let ship_type = row
            .ship_type
            .parse::<ShipType>()
            .map_err(|_| HangarError::storage(format!("ship {} has type {}", row.id, row.ship_type)))?;
        Ok(Ship {
            id: row.id,
            name: row.name,
            planet: row.planet,
            ship_type,
            prod_date: row.prod_date,
            is_used: row.is_used,
            speed: row.speed,
            crew_size: row.crew_size,
            rating: row.rating,
        })
    }
}

impl From<&NewShip> for ShipChanges {
    fn from(ship: &NewShip) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&Ship> for ShipChanges {
    fn from(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ShipChanges, ShipRow};
    use chrono::NaiveDate;
    use hangar_core::{HangarError, Ship, ShipType};

    fn row(ship_type: &str) -> ShipRow {
        ShipRow {
            id: 3,
            name: "Hermes".to_string(),
            planet: "Venus".to_string(),
            ship_type: ship_type.to_string(),
            prod_date: NaiveDate::from_ymd_opt(2990, 3, 4)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("date"),
            is_used: false,
            speed: 0.77,
            crew_size: 12,
            rating: -0.04,
        }
    }

    #[test]
    fn row_converts_to_ship() {
        let ship = Ship::try_from(row("TRANSPORT")).expect("ship");
        assert_eq!(ship.ship_type, ShipType::Transport);
        assert_eq!(ship.id, 3);

        let changes = ShipChanges::from(&ship);
        assert_eq!(changes.ship_type, "TRANSPORT");
        assert_eq!(changes.speed, 0.77);
    }

    #[test]
    fn unknown_type_is_a_storage_error() {
        assert!(matches!(
            Ship::try_from(row("YACHT")),
            Err(HangarError::Storage(_))
        ));
    }
}
