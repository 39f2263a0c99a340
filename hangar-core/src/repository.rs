//! Storage abstraction for ships.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{HangarError, Result};
use crate::filter::ShipQuery;
use crate::ship::{NewShip, Ship};

/// One page of a ship listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShipPage {
    /// Ships on the requested page.
    pub ships: Vec<Ship>,
    /// Number of ships matching the filters across all pages.
    pub total: i64,
}

/// Persistence operations the ship service relies on.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRepository {
    /// Load the page of ships matching the query, with the total match count.
    fn find_page(&self, query: &ShipQuery) -> Result<ShipPage>;
    /// Count ships matching the query's filters, ignoring its paging.
    fn count(&self, query: &ShipQuery) -> Result<i64>;
    /// Load a ship by id.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Check whether a ship exists.
    fn exists_by_id(&self, id: i64) -> Result<bool>;
    /// Persist a new ship and return it with its assigned id.
    fn insert(&self, ship: &NewShip) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship. Removing a missing id is not an error.
    fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// Process-local repository keeping ships in a map.
#[derive(Debug, Default)]
pub struct MemoryShipRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

impl MemoryShipRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| HangarError::storage("ship store lock poisoned"))
    }
}

impl ShipRepository for MemoryShipRepository {
    fn find_page(&self, query: &ShipQuery) -> Result<ShipPage> {
        let state = self.lock()?;
        let mut matching: Vec<&Ship> = state
            .ships
            .values()
            .filter(|ship| query.matches(ship))
            .collect();
        matching.sort_by(|a, b| query.page.order.compare(a, b));
        let total = matching.len() as i64;
        let ships = matching
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page.size).unwrap_or(0))
            .cloned()
            .collect();
        Ok(ShipPage { ships, total })
    }

    fn count(&self, query: &ShipQuery) -> Result<i64> {
        let state = self.lock()?;
        let total = state.ships.values().filter(|ship| query.matches(ship)).count();
        Ok(total as i64)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        Ok(self.lock()?.ships.get(&id).cloned())
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.ships.contains_key(&id))
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let stored = ship.clone().with_id(state.last_id);
        state.ships.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut state = self.lock()?;
        match state.ships.get_mut(&ship.id) {
            Some(slot) => {
                *slot = ship.clone();
                Ok(ship.clone())
            }
            None => Err(HangarError::ship_not_found(ship.id)),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        self.lock()?.ships.remove(&id);
        Ok(())
    }
}
