//! Storage port — repository trait for device persistence.

use std::future::Future;

use devicestore_domain::device::{Device, DeviceChange, NewDevice};
use devicestore_domain::error::DeviceStoreError;
use devicestore_domain::id::DeviceId;

/// Repository for persisting and querying [`Device`]s.
///
/// Implementations own identifier generation and timestamp management.
pub trait DeviceRepository {
    /// Persist a new device under a freshly generated id, with
    /// `creation_time == update_time == now`.
    fn store(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, DeviceStoreError>> + Send;

    /// Get a device by id. `None` means no row matched.
    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DeviceStoreError>> + Send;

    /// Get every device, in no particular order.
    fn list(&self) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send;

    /// Get the devices whose brand equals `brand` exactly (case-sensitive).
    fn find_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DeviceStoreError>> + Send;

    /// Write the columns named by `change` and refresh `update_time`.
    ///
    /// An unknown id touches no row and is not an error.
    fn update(
        &self,
        id: &DeviceId,
        change: DeviceChange,
    ) -> impl Future<Output = Result<(), DeviceStoreError>> + Send;

    /// Hard-delete a device. Removing an unknown id is not an error.
    fn remove(&self, id: &DeviceId) -> impl Future<Output = Result<(), DeviceStoreError>> + Send;
}
