//! `PostgreSQL` implementation of [`DeviceRepository`].

use std::future::Future;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use devicestore_app::ports::DeviceRepository;
use devicestore_domain::device::{Device, DeviceChange, NewDevice};
use devicestore_domain::error::DeviceStoreError;
use devicestore_domain::id::DeviceId;
use devicestore_domain::time::{self, Timestamp};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, PgRow> for Wrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let brand: String = row.try_get("brand")?;
        let creation_time: Timestamp = row.try_get("creation_time")?;
        let update_time: Timestamp = row.try_get("update_time")?;

        Ok(Self(Device {
            id: DeviceId::from(id),
            name,
            brand,
            creation_time,
            update_time,
        }))
    }
}

const INSERT: &str = "INSERT INTO devices (id, name, brand, creation_time, update_time) VALUES ($1, $2, $3, $4, $5)";
const SELECT_BY_ID: &str =
    "SELECT id, name, brand, creation_time, update_time FROM devices WHERE id = $1";
const SELECT_ALL: &str = "SELECT id, name, brand, creation_time, update_time FROM devices";
const SELECT_BY_BRAND: &str =
    "SELECT id, name, brand, creation_time, update_time FROM devices WHERE brand = $1";
const UPDATE_NAME_AND_BRAND: &str =
    "UPDATE devices SET name = $2, brand = $3, update_time = $4 WHERE id = $1";
const UPDATE_NAME: &str = "UPDATE devices SET name = $2, update_time = $3 WHERE id = $1";
const UPDATE_BRAND: &str = "UPDATE devices SET brand = $2, update_time = $3 WHERE id = $1";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = $1";

/// `PostgreSQL`-backed device repository.
#[derive(Clone)]
pub struct PostgresDeviceRepository {
    pool: PgPool,
}

impl PostgresDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for PostgresDeviceRepository {
    fn store(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        async move {
            let device = device.into_device(DeviceId::generate(), time::now());

            sqlx::query(INSERT)
                .bind(device.id.as_str())
                .bind(&device.name)
                .bind(&device.brand)
                .bind(device.creation_time)
                .bind(device.update_time)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device)
        }
    }

    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        let brand = brand.to_string();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_BRAND)
                .bind(brand)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        id: &DeviceId,
        change: DeviceChange,
    ) -> impl Future<Output = Result<(), DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            let now = time::now();
            let query = match change {
                DeviceChange::Both { name, brand } => sqlx::query(UPDATE_NAME_AND_BRAND)
                    .bind(id)
                    .bind(name)
                    .bind(brand)
                    .bind(now),
                DeviceChange::Name(name) => sqlx::query(UPDATE_NAME).bind(id).bind(name).bind(now),
                DeviceChange::Brand(brand) => {
                    sqlx::query(UPDATE_BRAND).bind(id).bind(brand).bind(now)
                }
            };

            let result = query.execute(&pool).await.map_err(StorageError::from)?;
            if result.rows_affected() == 0 {
                tracing::debug!("update matched no device");
            }

            Ok(())
        }
    }

    fn remove(&self, id: &DeviceId) -> impl Future<Output = Result<(), DeviceStoreError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
