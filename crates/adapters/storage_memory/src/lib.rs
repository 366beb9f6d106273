//! # devicestore-adapter-storage-memory
//!
//! In-memory implementation of [`DeviceRepository`].
//!
//! Nothing survives a restart. Cloning the repository shares the same map,
//! so a clone handed to a test sees what the service wrote.
//!
//! ## Dependency rule
//! Depends on `devicestore-app` (for the port trait) and `devicestore-domain`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use devicestore_app::ports::DeviceRepository;
use devicestore_domain::device::{Device, DeviceChange, NewDevice};
use devicestore_domain::error::DeviceStoreError;
use devicestore_domain::id::DeviceId;
use devicestore_domain::time;

/// Map-backed device repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceRepository {
    devices: Arc<Mutex<HashMap<DeviceId, Device>>>,
}

impl InMemoryDeviceRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when no device is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written device behind,
    // so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<DeviceId, Device>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceRepository for InMemoryDeviceRepository {
    fn store(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, DeviceStoreError>> + Send {
        let device = device.into_device(DeviceId::generate(), time::now());
        self.lock().insert(device.id.clone(), device.clone());
        tracing::trace!(device_id = %device.id, "device inserted in memory");
        async { Ok(device) }
    }

    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DeviceStoreError>> + Send {
        let result = self.lock().get(id).cloned();
        async { Ok(result) }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send {
        let result: Vec<Device> = self.lock().values().cloned().collect();
        async { Ok(result) }
    }

    fn find_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send {
        let result: Vec<Device> = self
            .lock()
            .values()
            .filter(|device| device.brand == brand)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn update(
        &self,
        id: &DeviceId,
        change: DeviceChange,
    ) -> impl Future<Output = Result<(), DeviceStoreError>> + Send {
        if let Some(device) = self.lock().get_mut(id) {
            change.apply(device, time::now());
        }
        async { Ok(()) }
    }

    fn remove(&self, id: &DeviceId) -> impl Future<Output = Result<(), DeviceStoreError>> + Send {
        self.lock().remove(id);
        async { Ok(()) }
    }
}
