//! PostgreSQL-backed ship repository.

use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use hangar_core::{
    HangarError, NewShip, Result, Ship, ShipFilter, ShipOrder, ShipPage, ShipQuery,
    ShipRepository,
};

use crate::db::DbPool;
use crate::models::{ShipChanges, ShipRow};
use crate::schema::ship;

type BoxedShipQuery = ship::BoxedQuery<'static, Pg>;
type PooledConnection =
    diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::pg::PgConnection>>;

/// Ship repository running diesel queries over a connection pool.
#[derive(Clone)]
pub struct DieselShipRepository {
    pool: DbPool,
}

impl DieselShipRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection> {
        self.pool.get().map_err(HangarError::storage)
    }
}

/// Escape `LIKE` metacharacters and wrap the needle in wildcards.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered(query: &ShipQuery) -> BoxedShipQuery {
    let mut statement = ship::table.into_boxed();
    for filter in &query.filters {
        statement = match filter {
            ShipFilter::NameContains(needle) => {
                statement.filter(ship::name.like(contains_pattern(needle)).escape('\\'))
            }
            ShipFilter::PlanetContains(needle) => {
                statement.filter(ship::planet.like(contains_pattern(needle)).escape('\\'))
            }
            ShipFilter::ShipTypeIs(ship_type) => {
                statement.filter(ship::ship_type.eq(ship_type.as_str()))
            }
            ShipFilter::UsedIs(is_used) => statement.filter(ship::is_used.eq(*is_used)),
            ShipFilter::CrewSizeRange { min, max } => {
                if let Some(min) = min {
                    statement = statement.filter(ship::crew_size.ge(*min));
                }
                if let Some(max) = max {
                    statement = statement.filter(ship::crew_size.le(*max));
                }
                statement
            }
            ShipFilter::SpeedRange { min, max } => {
                if let Some(min) = min {
                    statement = statement.filter(ship::speed.ge(*min));
                }
                if let Some(max) = max {
                    statement = statement.filter(ship::speed.le(*max));
                }
                statement
            }
            ShipFilter::RatingRange { min, max } => {
                if let Some(min) = min {
                    statement = statement.filter(ship::rating.ge(*min));
                }
                if let Some(max) = max {
                    statement = statement.filter(ship::rating.le(*max));
                }
                statement
            }
            ShipFilter::ProdDateRange { after, before } => {
                if let Some(after) = after {
                    statement = statement.filter(ship::prod_date.ge(*after));
                }
                if let Some(before) = before {
                    statement = statement.filter(ship::prod_date.le(*before));
                }
                statement
            }
        };
    }
    statement
}

fn ordered(statement: BoxedShipQuery, order: ShipOrder) -> BoxedShipQuery {
    let statement = match order {
        ShipOrder::Id => return statement.order(ship::id.asc()),
        ShipOrder::Name => statement.order(ship::name.asc()),
        ShipOrder::Planet => statement.order(ship::planet.asc()),
        ShipOrder::ShipType => statement.order(ship::ship_type.asc()),
        ShipOrder::ProdDate => statement.order(ship::prod_date.asc()),
        ShipOrder::IsUsed => statement.order(ship::is_used.asc()),
        ShipOrder::Speed => statement.order(ship::speed.asc()),
        ShipOrder::CrewSize => statement.order(ship::crew_size.asc()),
        ShipOrder::Rating => statement.order(ship::rating.asc()),
    };
    statement.then_order_by(ship::id.asc())
}

impl ShipRepository for DieselShipRepository {
    fn find_page(&self, query: &ShipQuery) -> Result<ShipPage> {
        let total = self.count(query)?;
        let mut conn = self.conn()?;
        let rows = ordered(filtered(query), query.page.order)
            .limit(query.page.size)
            .offset(query.page.offset())
            .select(ShipRow::as_select())
            .load::<ShipRow>(&mut conn)
            .map_err(HangarError::storage)?;
        let ships = rows
            .into_iter()
            .map(Ship::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ShipPage { ships, total })
    }

    fn count(&self, query: &ShipQuery) -> Result<i64> {
        let mut conn = self.conn()?;
        filtered(query)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(HangarError::storage)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ship::table
            .find(id)
            .select(ShipRow::as_select())
            .first::<ShipRow>(&mut conn)
            .optional()
            .map_err(HangarError::storage)?
            .map(Ship::try_from)
            .transpose()
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(exists(ship::table.find(id)))
            .get_result(&mut conn)
            .map_err(HangarError::storage)
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(ship::table)
            .values(&ShipChanges::from(ship))
            .returning(ShipRow::as_returning())
            .get_result::<ShipRow>(&mut conn)
            .map_err(HangarError::storage)?;
        Ship::try_from(row)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::update(ship::table.find(ship.id))
            .set(&ShipChanges::from(ship))
            .returning(ShipRow::as_returning())
            .get_result::<ShipRow>(&mut conn)
            .optional()
            .map_err(HangarError::storage)?
            .ok_or_else(|| HangarError::ship_not_found(ship.id))?;
        Ship::try_from(row)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ship::table.find(id))
            .execute(&mut conn)
            .map_err(HangarError::storage)?;
        Ok(())
    }
}
