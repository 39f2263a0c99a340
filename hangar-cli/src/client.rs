//! HTTP client for the Hangar ship registry.

use hangar_core::{Ship, ShipPayload};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::CliResult;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the `/rest/ships` endpoints.
#[derive(Debug, Clone)]
pub struct ShipClient {
    http: Client,
    base_url: String,
}

impl ShipClient {
    /// Build a client for the server at `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let base_url = normalize_server_url(server_url)?;
        let http = Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: i64) -> String {
        format!("{}/rest/ships/{id}", self.base_url)
    }

    /// Fetch one page of ships matching the query parameters.
    pub async fn list(&self, params: &[(String, String)]) -> CliResult<Vec<Ship>> {
        let response = self.http.get(self.ships_url()).query(params).send().await?;
        Ok(check(response).await?.json::<Vec<Ship>>().await?)
    }

    /// Count ships matching the query parameters.
    pub async fn count(&self, params: &[(String, String)]) -> CliResult<i64> {
        let response = self
            .http
            .get(format!("{}/count", self.ships_url()))
            .query(params)
            .send()
            .await?;
        Ok(check(response).await?.json::<i64>().await?)
    }

    /// Fetch a single ship.
    pub async fn get(&self, id: i64) -> CliResult<Ship> {
        let response = self.http.get(self.ship_url(id)).send().await?;
        Ok(check(response).await?.json::<Ship>().await?)
    }

    /// Register a new ship.
    pub async fn create(&self, payload: &ShipPayload) -> CliResult<Ship> {
        let response = self
            .http
            .post(self.ships_url())
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json::<Ship>().await?)
    }

    /// Apply a partial update to a ship.
    pub async fn update(&self, id: i64, payload: &ShipPayload) -> CliResult<Ship> {
        let response = self
            .http
            .post(self.ship_url(id))
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json::<Ship>().await?)
    }

    /// Delete a ship.
    pub async fn delete(&self, id: i64) -> CliResult<()> {
        let response = self.http.delete(self.ship_url(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Turn non-success responses into errors carrying the server's message.
async fn check(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    Err(format!("server returned {status}: {message}").into())
}

#[cfg(test)]
mod tests {
    use super::{ShipClient, normalize_server_url};
    use chrono::NaiveDate;
    use hangar_core::{ShipPayload, ShipType};
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn ship_body(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "planet": "Titan",
            "shipType": "MERCHANT",
            "prodDate": 32503680000000_i64,
            "isUsed": false,
            "speed": 0.5,
            "crewSize": 12,
            "rating": -0.02
        })
    }

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        assert_eq!(
            normalize_server_url(" http://localhost:8080/ ").expect("url"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn normalize_server_url_rejects_empty() {
        assert!(normalize_server_url("  ").is_err());
    }

    #[tokio::test]
    async fn list_sends_filters_as_query_parameters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships")
                    .query_param("planet", "Tit")
                    .query_param("pageSize", "2");
                then.status(200)
                    .json_body(json!([ship_body(1, "Argo"), ship_body(2, "Nautilus")]));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let params = vec![
            ("planet".to_string(), "Tit".to_string()),
            ("pageSize".to_string(), "2".to_string()),
        ];

        let ships = client.list(&params).await.expect("list");

        mock.assert_async().await;
        assert_eq!(ships.len(), 2);
        assert_eq!(ships[1].name, "Nautilus");
        assert_eq!(ships[0].ship_type, ShipType::Merchant);
    }

    #[tokio::test]
    async fn count_reads_plain_number() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/count");
                then.status(200).json_body(json!(7));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        assert_eq!(client.count(&[]).await.expect("count"), 7);
    }

    #[tokio::test]
    async fn create_posts_only_supplied_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/ships").json_body(json!({
                    "name": "Argo",
                    "planet": "Titan",
                    "shipType": "MERCHANT",
                    "prodDate": 32503680000000_i64,
                    "speed": 0.5,
                    "crewSize": 12
                }));
                then.status(200).json_body(ship_body(9, "Argo"));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let payload = ShipPayload {
            name: Some("Argo".to_string()),
            planet: Some("Titan".to_string()),
            ship_type: Some(ShipType::Merchant),
            prod_date: NaiveDate::from_ymd_opt(3000, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            is_used: None,
            speed: Some(0.5),
            crew_size: Some(12),
        };

        let ship = client.create(&payload).await.expect("create");

        mock.assert_async().await;
        assert_eq!(ship.id, 9);
    }

    #[tokio::test]
    async fn update_targets_ship_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/ships/4")
                    .json_body(json!({ "isUsed": true }));
                then.status(200).json_body(ship_body(4, "Argo"));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let payload = ShipPayload {
            is_used: Some(true),
            ..ShipPayload::default()
        };

        client.update(4, &payload).await.expect("update");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn errors_surface_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/5");
                then.status(404)
                    .json_body(json!({ "message": "ship 5 not found" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/6");
                then.status(500).body("boom");
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        let error = client.get(5).await.expect_err("missing ship");
        assert!(error.to_string().contains("404"));
        assert!(error.to_string().contains("ship 5 not found"));

        let error = client.delete(6).await.expect_err("server failure");
        assert!(error.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn delete_accepts_plain_ok_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/3");
                then.status(200).body("Ok");
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        client.delete(3).await.expect("delete");
        mock.assert_async().await;
    }
}
