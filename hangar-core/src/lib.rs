#![deny(missing_docs)]
//! Hangar core library.
//!
//! Domain types, the list filter builder, and the validation and rating rules
//! behind the Hangar ship registry. Nothing here performs I/O; storage is
//! reached through the [`ShipRepository`] trait.

pub mod error;
pub mod filter;
pub mod repository;
pub mod service;
pub mod ship;
pub mod validation;

pub use error::{HangarError, Result};
pub use filter::{PageRequest, ShipFilter, ShipOrder, ShipQuery};
pub use repository::{MemoryShipRepository, ShipPage, ShipRepository};
pub use service::{DeleteOutcome, ShipService};
pub use ship::{NewShip, Ship, ShipPayload, ShipType};
pub use validation::{apply_patch, compute_rating, parse_ship_id, round2_half_down, validate_new};
