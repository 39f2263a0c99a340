//! Ship operations wiring the filter builder and validation to a repository.

use std::collections::HashMap;

use crate::error::{HangarError, Result};
use crate::filter::ShipQuery;
use crate::repository::{ShipPage, ShipRepository};
use crate::ship::{Ship, ShipPayload};
use crate::validation::{apply_patch, check_id, validate_new};

/// Result of a delete request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The ship existed and was removed.
    Deleted,
    /// No ship had the requested id.
    NotFound,
}

/// Ship operations over a repository.
#[derive(Debug, Clone)]
pub struct ShipService<R> {
    repository: R,
}

impl<R: ShipRepository> ShipService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Borrow the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// List the requested page of ships matching the parameters.
    pub fn list(&self, params: &HashMap<String, String>) -> Result<ShipPage> {
        let query = ShipQuery::from_params(params)?;
        self.repository.find_page(&query)
    }

    /// Count ships matching the parameters, ignoring paging.
    pub fn count(&self, params: &HashMap<String, String>) -> Result<i64> {
        let query = ShipQuery::from_params(params)?;
        self.repository.count(&query)
    }

    /// Fetch a ship by id.
    pub fn get(&self, id: i64) -> Result<Ship> {
        check_id(id)?;
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| HangarError::ship_not_found(id))
    }

    /// Validate and persist a new ship.
    pub fn create(&self, payload: ShipPayload) -> Result<Ship> {
        let ship = validate_new(payload)?;
        self.repository.insert(&ship)
    }

    /// Apply a partial update to an existing ship.
    pub fn update(&self, id: i64, payload: ShipPayload) -> Result<Ship> {
        let existing = self.get(id)?;
        let ship = apply_patch(&existing, payload)?;
        self.repository.save(&ship)
    }

    /// Delete a ship, reporting whether it existed.
    pub fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        check_id(id)?;
        if !self.repository.exists_by_id(id)? {
            return Ok(DeleteOutcome::NotFound);
        }
        self.repository.delete_by_id(id)?;
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteOutcome, ShipService};
    use crate::error::HangarError;
    use crate::repository::{MemoryShipRepository, MockShipRepository, ShipPage, ShipRepository};
    use crate::ship::{ShipPayload, ShipType};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashMap;

    fn year_start(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("date")
    }

    fn payload(name: &str, speed: f64) -> ShipPayload {
        ShipPayload {
            name: Some(name.to_string()),
            planet: Some("Jupiter".to_string()),
            ship_type: Some(ShipType::Military),
            prod_date: Some(year_start(3000)),
            is_used: Some(false),
            speed: Some(speed),
            crew_size: Some(42),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn seeded(count: usize) -> ShipService<MemoryShipRepository> {
        let service = ShipService::new(MemoryShipRepository::new());
        for index in 0..count {
            let speed = 0.1 + index as f64 * 0.1;
            service
                .create(payload(&format!("Ship {index}"), speed))
                .expect("create");
        }
        service
    }

    #[test]
    fn create_returns_stored_ship_with_rating() {
        let service = ShipService::new(MemoryShipRepository::new());
        let ship = service.create(payload("Argo", 0.504)).expect("create");

        assert_eq!(ship.id, 1);
        assert_eq!(ship.speed, 0.5);
        assert_eq!(ship.rating, -0.02);
        assert_eq!(service.get(1).expect("get"), ship);
    }

    #[test]
    fn create_with_missing_field_persists_nothing() {
        let mut repository = MockShipRepository::new();
        repository.expect_insert().never();
        let service = ShipService::new(repository);
        let mut incomplete = payload("Argo", 0.5);
        incomplete.crew_size = None;

        assert!(matches!(
            service.create(incomplete),
            Err(HangarError::BadRequest(_))
        ));
    }

    #[test]
    fn list_defaults_to_first_three_by_id() {
        let service = seeded(5);
        let page = service.list(&HashMap::new()).expect("list");

        let ids: Vec<i64> = page.ships.iter().map(|ship| ship.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn list_combines_filters() {
        let service = seeded(8);
        let page = service
            .list(&params(&[
                ("minSpeed", "0.3"),
                ("maxSpeed", "0.5"),
                ("pageSize", "10"),
            ]))
            .expect("list");

        assert!(!page.ships.is_empty());
        assert!(
            page.ships
                .iter()
                .all(|ship| (0.3..=0.5).contains(&ship.speed))
        );
        assert_eq!(page.total, page.ships.len() as i64);
    }

    #[test]
    fn count_ignores_paging() {
        let service = seeded(5);
        let count = service
            .count(&params(&[("pageSize", "1"), ("pageNumber", "3")]))
            .expect("count");
        assert_eq!(count, 5);
    }

    #[test]
    fn count_skips_loading_ships() {
        let mut repository = MockShipRepository::new();
        repository.expect_find_page().never();
        repository
            .expect_count()
            .withf(|query| query.filters.len() == 1)
            .times(1)
            .returning(|_| Ok(12));
        let service = ShipService::new(repository);

        let count = service
            .count(&params(&[("isUsed", "true"), ("pageSize", "1")]))
            .expect("count");
        assert_eq!(count, 12);
    }

    #[test]
    fn list_rejects_bad_parameters_before_querying() {
        let mut repository = MockShipRepository::new();
        repository.expect_find_page().never();
        let service = ShipService::new(repository);

        let result = service.list(&params(&[("shipType", "YACHT")]));
        assert!(matches!(result, Err(HangarError::BadRequest(_))));
    }

    #[test]
    fn list_passes_built_query_to_repository() {
        let mut repository = MockShipRepository::new();
        repository
            .expect_find_page()
            .withf(|query| query.page.size == 7 && query.filters.len() == 1)
            .times(1)
            .returning(|_| Ok(ShipPage::default()));
        let service = ShipService::new(repository);

        let page = service
            .list(&params(&[("pageSize", "7"), ("planet", "Io")]))
            .expect("list");
        assert!(page.ships.is_empty());
    }

    #[test]
    fn get_distinguishes_bad_id_from_missing_ship() {
        let service = seeded(1);
        assert!(matches!(service.get(0), Err(HangarError::BadRequest(_))));
        assert!(matches!(service.get(-5), Err(HangarError::BadRequest(_))));
        assert!(matches!(service.get(99), Err(HangarError::NotFound(_))));
    }

    #[test]
    fn update_merges_supplied_fields() {
        let service = seeded(1);
        let patch = ShipPayload {
            name: Some("Renamed".to_string()),
            is_used: Some(true),
            ..ShipPayload::default()
        };
        let updated = service.update(1, patch).expect("update");

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.planet, "Jupiter");
        assert!(updated.is_used);
        assert_eq!(service.get(1).expect("get"), updated);
    }

    #[test]
    fn update_with_empty_patch_is_idempotent() {
        let service = seeded(1);
        let before = service.get(1).expect("get");
        let first = service.update(1, ShipPayload::default()).expect("update");
        let second = service.update(1, ShipPayload::default()).expect("update");

        assert_eq!(first, before);
        assert_eq!(second, first);
    }

    #[test]
    fn rejected_update_leaves_ship_untouched() {
        let service = seeded(1);
        let before = service.get(1).expect("get");
        let patch = ShipPayload {
            name: Some("Renamed".to_string()),
            speed: Some(1.5),
            ..ShipPayload::default()
        };

        assert!(matches!(
            service.update(1, patch),
            Err(HangarError::BadRequest(_))
        ));
        assert_eq!(service.get(1).expect("get"), before);
    }

    #[test]
    fn update_of_missing_ship_is_not_found() {
        let service = seeded(0);
        assert!(matches!(
            service.update(3, ShipPayload::default()),
            Err(HangarError::NotFound(_))
        ));
        assert!(matches!(
            service.update(0, ShipPayload::default()),
            Err(HangarError::BadRequest(_))
        ));
    }

    #[test]
    fn delete_reports_outcome() {
        let service = seeded(2);

        assert_eq!(service.delete(1), Ok(DeleteOutcome::Deleted));
        assert_eq!(service.delete(1), Ok(DeleteOutcome::NotFound));
        assert!(matches!(service.delete(0), Err(HangarError::BadRequest(_))));
        assert!(service.repository().exists_by_id(2).expect("exists"));
    }

    #[test]
    fn delete_skips_removal_when_absent() {
        let mut repository = MockShipRepository::new();
        repository.expect_exists_by_id().returning(|_| Ok(false));
        repository.expect_delete_by_id().never();
        let service = ShipService::new(repository);

        assert_eq!(service.delete(4), Ok(DeleteOutcome::NotFound));
    }

    #[test]
    fn storage_failures_propagate() {
        let mut repository = MockShipRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(HangarError::storage("disk on fire")));
        let service = ShipService::new(repository);

        assert!(matches!(service.get(1), Err(HangarError::Storage(_))));
    }
}
