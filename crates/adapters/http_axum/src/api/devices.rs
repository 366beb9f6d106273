//! JSON REST handlers for devices.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use devicestore_app::ports::DeviceRepository;
use devicestore_domain::device::{Device, DevicePatch, NewDevice};
use devicestore_domain::error::ValidationError;
use devicestore_domain::id::DeviceId;

use crate::body;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a device. `id` is accepted only to reject it.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
}

/// Request body for a partial update.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
}

/// Query string of the search endpoint.
#[derive(Deserialize)]
pub struct SearchQuery {
    pub brand: Option<String>,
}

/// `{"devices": [...]}`
#[derive(Serialize)]
pub struct DevicesBody {
    pub devices: Vec<Device>,
}

/// `{"device": {...}}`
#[derive(Serialize)]
pub struct DeviceBody {
    pub device: Device,
}

/// Possible responses from the collection endpoints (list and search).
pub enum ListResponse {
    Ok(Json<DevicesBody>),
    NotFound,
}

impl ListResponse {
    fn from_devices(devices: Vec<Device>) -> Self {
        if devices.is_empty() {
            Self::NotFound
        } else {
            Self::Ok(Json(DevicesBody { devices }))
        }
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NotFound => body::status_only(StatusCode::NOT_FOUND),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceBody>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created,
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created => body::status_only(StatusCode::CREATED),
        }
    }
}

/// Possible responses from the update and delete endpoints.
pub enum AckResponse {
    Ok,
}

impl IntoResponse for AckResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => body::status_only(StatusCode::OK),
        }
    }
}

/// Decode a JSON request body whatever its `Content-Type` says.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::from)
}

/// `GET /devices`
pub async fn list<DR>(State(state): State<AppState<DR>>) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    tracing::debug!("list all devices");
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::from_devices(devices))
}

/// `GET /devices/search?brand=<value>`
pub async fn search<DR>(
    State(state): State<AppState<DR>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let brand = query.brand.ok_or(ValidationError::MissingBrandQuery)?;
    tracing::debug!(brand = %brand, "search devices");
    let devices = state.device_service.find_by_brand(&brand).await?;
    Ok(ListResponse::from_devices(devices))
}

/// `GET /devices/{id}`
pub async fn get<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    tracing::debug!(device_id = %id, "get device by id");
    let device = state.device_service.get_device(&DeviceId::from(id)).await?;
    Ok(GetResponse::Ok(Json(DeviceBody { device })))
}

/// `POST /devices`
pub async fn create<DR>(
    State(state): State<AppState<DR>>,
    body: Bytes,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    tracing::debug!("add device");
    let req: CreateDeviceRequest = parse_body(&body)?;

    if req.id.as_deref().is_some_and(|id| !id.is_empty()) {
        return Err(ValidationError::IdNotAllowed.into());
    }

    state
        .device_service
        .create_device(NewDevice::new(req.name, req.brand))
        .await?;
    Ok(CreateResponse::Created)
}

/// `PATCH /devices/{id}`
pub async fn update<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<AckResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    tracing::debug!(device_id = %id, "update device");
    let req: UpdateDeviceRequest = parse_body(&body)?;

    let patch = DevicePatch {
        name: req.name,
        brand: req.brand,
    };
    state
        .device_service
        .update_device(&DeviceId::from(id), patch)
        .await?;
    Ok(AckResponse::Ok)
}

/// `DELETE /devices/{id}`
pub async fn delete<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<AckResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    tracing::debug!(device_id = %id, "delete device");
    state
        .device_service
        .delete_device(&DeviceId::from(id))
        .await?;
    Ok(AckResponse::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use devicestore_adapter_storage_memory::InMemoryDeviceRepository;
    use devicestore_app::services::device_service::DeviceService;
    use devicestore_domain::device::DeviceChange;
    use devicestore_domain::error::DeviceStoreError;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Repository whose every call fails with the same storage error.
    struct FailingRepo;

    fn internal_error() -> DeviceStoreError {
        DeviceStoreError::Storage(Box::new(std::io::Error::other("internal error")))
    }

    impl DeviceRepository for FailingRepo {
        async fn store(&self, _device: NewDevice) -> Result<Device, DeviceStoreError> {
            Err(internal_error())
        }
        async fn find_by_id(&self, _id: &DeviceId) -> Result<Option<Device>, DeviceStoreError> {
            Err(internal_error())
        }
        async fn list(&self) -> Result<Vec<Device>, DeviceStoreError> {
            Err(internal_error())
        }
        async fn find_by_brand(&self, _brand: &str) -> Result<Vec<Device>, DeviceStoreError> {
            Err(internal_error())
        }
        async fn update(
            &self,
            _id: &DeviceId,
            _change: DeviceChange,
        ) -> Result<(), DeviceStoreError> {
            Err(internal_error())
        }
        async fn remove(&self, _id: &DeviceId) -> Result<(), DeviceStoreError> {
            Err(internal_error())
        }
    }

    fn app_with<DR>(repo: DR) -> Router
    where
        DR: DeviceRepository + Send + Sync + 'static,
    {
        crate::router::build(AppState::new(DeviceService::new(repo)))
    }

    async fn seeded() -> (InMemoryDeviceRepository, Device) {
        let repo = InMemoryDeviceRepository::new();
        let device = repo
            .store(NewDevice::new("Device1", "BrandA"))
            .await
            .unwrap();
        (repo, device)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header("content-type", "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn should_list_devices_when_store_is_not_empty() {
        let (repo, device) = seeded().await;

        let (status, body) = send(app_with(repo), "GET", "/devices", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "devices": [device] }));
    }

    #[tokio::test]
    async fn should_return_not_found_when_listing_empty_store() {
        let (status, body) =
            send(app_with(InMemoryDeviceRepository::new()), "GET", "/devices", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "Not Found" }));
    }

    #[tokio::test]
    async fn should_return_internal_error_when_listing_fails() {
        let (status, body) = send(app_with(FailingRepo), "GET", "/devices", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn should_get_device_by_id() {
        let (repo, device) = seeded().await;
        let uri = format!("/devices/{}", device.id);

        let (status, body) = send(app_with(repo), "GET", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "device": device }));
    }

    #[tokio::test]
    async fn should_return_not_found_when_id_is_unknown() {
        let (repo, _) = seeded().await;

        let (status, body) = send(app_with(repo), "GET", "/devices/2", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "Not Found" }));
    }

    #[tokio::test]
    async fn should_return_internal_error_when_get_fails() {
        let (status, body) = send(app_with(FailingRepo), "GET", "/devices/1", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn should_search_devices_by_brand() {
        let (repo, device) = seeded().await;
        repo.store(NewDevice::new("Device2", "BrandB")).await.unwrap();

        let (status, body) = send(app_with(repo), "GET", "/devices/search?brand=BrandA", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "devices": [device] }));
    }

    #[tokio::test]
    async fn should_return_not_found_when_search_has_no_results() {
        let (repo, _) = seeded().await;

        let (status, body) =
            send(app_with(repo), "GET", "/devices/search?brand=NonExistent", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "Not Found" }));
    }

    #[tokio::test]
    async fn should_reject_search_without_brand() {
        let (status, body) =
            send(app_with(InMemoryDeviceRepository::new()), "GET", "/devices/search", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing brand query parameter" }));
    }

    #[tokio::test]
    async fn should_return_internal_error_when_search_fails() {
        let (status, body) =
            send(app_with(FailingRepo), "GET", "/devices/search?brand=BrandA", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn should_create_device() {
        let repo = InMemoryDeviceRepository::new();

        let (status, body) = send(
            app_with(repo.clone()),
            "POST",
            "/devices",
            Some(r#"{"name":"Device1","brand":"BrandA"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "status": "Created" }));
        let stored = repo.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Device1");
        assert_eq!(stored[0].brand, "BrandA");
    }

    #[tokio::test]
    async fn should_reject_create_when_body_is_malformed() {
        let (status, body) = send(
            app_with(InMemoryDeviceRepository::new()),
            "POST",
            "/devices",
            Some("{"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn should_create_device_without_content_type_header() {
        let repo = InMemoryDeviceRepository::new();
        let request = Request::builder()
            .method("POST")
            .uri("/devices")
            .body(Body::from(r#"{"name":"Pixel","brand":"Google"}"#))
            .unwrap();

        let response = app_with(repo.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn should_update_device_with_plain_text_content_type() {
        let (repo, device) = seeded().await;
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/devices/{}", device.id))
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"brand":"BrandB"}"#))
            .unwrap();

        let response = app_with(repo.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let fetched = repo.find_by_id(&device.id).await.unwrap().unwrap();
        assert_eq!(fetched.brand, "BrandB");
        assert_eq!(fetched.name, "Device1");
    }

    #[tokio::test]
    async fn should_reject_create_when_body_is_empty() {
        let repo = InMemoryDeviceRepository::new();

        let (status, body) = send(app_with(repo.clone()), "POST", "/devices", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|msg| msg.contains("EOF")));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn should_reject_create_when_id_is_supplied_without_touching_storage() {
        let repo = InMemoryDeviceRepository::new();

        let (status, body) = send(
            app_with(repo.clone()),
            "POST",
            "/devices",
            Some(r#"{"id":"abc","name":"Device1","brand":"BrandA"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "device id is not a valid field" }));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn should_accept_create_when_id_is_empty() {
        let repo = InMemoryDeviceRepository::new();

        let (status, _) = send(
            app_with(repo.clone()),
            "POST",
            "/devices",
            Some(r#"{"id":"","name":"Device1","brand":"BrandA"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_missing() {
        let (status, body) = send(
            app_with(InMemoryDeviceRepository::new()),
            "POST",
            "/devices",
            Some(r#"{"brand":"BrandA"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "device name must not be empty" }));
    }

    #[tokio::test]
    async fn should_return_internal_error_when_create_fails() {
        let (status, body) = send(
            app_with(FailingRepo),
            "POST",
            "/devices",
            Some(r#"{"name":"Device1","brand":"BrandA"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn should_update_device() {
        let (repo, device) = seeded().await;
        let uri = format!("/devices/{}", device.id);

        let (status, body) = send(
            app_with(repo.clone()),
            "PATCH",
            &uri,
            Some(r#"{"name":"UpdatedDevice","brand":"BrandB"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
        let fetched = repo.find_by_id(&device.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "UpdatedDevice");
        assert_eq!(fetched.brand, "BrandB");
    }

    #[tokio::test]
    async fn should_reject_update_when_no_field_is_set() {
        let (repo, device) = seeded().await;
        let uri = format!("/devices/{}", device.id);

        let (status, body) = send(app_with(repo), "PATCH", &uri, Some("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid update request" }));
    }

    #[tokio::test]
    async fn should_reject_update_when_body_is_malformed() {
        let (repo, device) = seeded().await;
        let uri = format!("/devices/{}", device.id);

        let (status, body) = send(app_with(repo), "PATCH", &uri, Some("not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn should_return_internal_error_when_update_fails() {
        let (status, body) = send(
            app_with(FailingRepo),
            "PATCH",
            "/devices/1",
            Some(r#"{"name":"UpdatedDevice"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn should_delete_device() {
        let (repo, device) = seeded().await;
        let uri = format!("/devices/{}", device.id);

        let (status, body) = send(app_with(repo.clone()), "DELETE", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn should_return_internal_error_when_delete_fails() {
        let (status, body) = send(app_with(FailingRepo), "DELETE", "/devices/1", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }
}
