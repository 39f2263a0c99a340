//! OpenAPI specification for Hangar server.

use utoipa::OpenApi;

use hangar_core::{Ship, ShipPayload, ShipType};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_ships,
        crate::routes::count_ships,
        crate::routes::get_ship,
        crate::routes::create_ship,
        crate::routes::update_ship,
        crate::routes::delete_ship,
        crate::routes::openapi_json
    ),
    components(schemas(Ship, ShipPayload, ShipType, ErrorResponse)),
    tags(
        (name = "ships", description = "Ship registry"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Hangar server.
pub struct ApiDoc;
