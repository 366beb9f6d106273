//! Device service — use-cases for managing devices.

use devicestore_domain::device::{Device, DevicePatch, NewDevice};
use devicestore_domain::error::{DeviceStoreError, NotFoundError, ValidationError};
use devicestore_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Application service for device CRUD operations.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new device after checking both fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceStoreError::Validation`] if `name` or `brand` is empty,
    /// or a storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name, device_brand = %device.brand))]
    pub async fn create_device(&self, device: NewDevice) -> Result<Device, DeviceStoreError> {
        device.validate()?;
        let created = self.repo.store(device).await?;
        tracing::debug!(device_id = %created.id, "device stored");
        Ok(created)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceStoreError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, DeviceStoreError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_devices(&self) -> Result<Vec<Device>, DeviceStoreError> {
        self.repo.list().await
    }

    /// List the devices of one brand.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>, DeviceStoreError> {
        self.repo.find_by_brand(brand).await
    }

    /// Apply a partial update to an existing device.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceStoreError::Validation`] when `id` is empty or the patch
    /// sets no field, or a storage error from the repository.
    #[tracing::instrument(skip(self, id, patch), fields(device_id = %id))]
    pub async fn update_device(
        &self,
        id: &DeviceId,
        patch: DevicePatch,
    ) -> Result<(), DeviceStoreError> {
        if id.is_empty() {
            return Err(ValidationError::MissingId.into());
        }
        let change = patch.into_change()?;
        self.repo.update(id, change).await
    }

    /// Delete a device by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn delete_device(&self, id: &DeviceId) -> Result<(), DeviceStoreError> {
        self.repo.remove(id).await
    }
}
