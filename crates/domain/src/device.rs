//! Device — the single record managed by the service.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::time::Timestamp;

/// A stored device.
///
/// `id`, `creation_time` and `update_time` are assigned by the repository;
/// callers only ever choose `name` and `brand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub brand: String,
    pub creation_time: Timestamp,
    pub update_time: Timestamp,
}

/// Caller-supplied fields for a device that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub brand: String,
}

impl NewDevice {
    #[must_use]
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
        }
    }

    /// Check presence of both mutable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] or [`ValidationError::EmptyBrand`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.brand.is_empty() {
            return Err(ValidationError::EmptyBrand);
        }
        Ok(())
    }

    /// Turn the payload into a full record with the given identity.
    #[must_use]
    pub fn into_device(self, id: DeviceId, now: Timestamp) -> Device {
        Device {
            id,
            name: self.name,
            brand: self.brand,
            creation_time: now,
            update_time: now,
        }
    }
}

/// A partial update as received from a client.
///
/// An absent field and an empty string both mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub brand: Option<String>,
}

impl DevicePatch {
    /// Resolve the patch into the concrete columns to write.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NothingToUpdate`] when neither field is set.
    pub fn into_change(self) -> Result<DeviceChange, ValidationError> {
        let name = self.name.filter(|value| !value.is_empty());
        let brand = self.brand.filter(|value| !value.is_empty());

        match (name, brand) {
            (Some(name), Some(brand)) => Ok(DeviceChange::Both { name, brand }),
            (Some(name), None) => Ok(DeviceChange::Name(name)),
            (None, Some(brand)) => Ok(DeviceChange::Brand(brand)),
            (None, None) => Err(ValidationError::NothingToUpdate),
        }
    }
}

/// The fields an update actually writes. Never empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceChange {
    Name(String),
    Brand(String),
    Both { name: String, brand: String },
}

impl DeviceChange {
    /// Apply the change to a record and refresh its `update_time`.
    pub fn apply(self, device: &mut Device, now: Timestamp) {
        match self {
            Self::Name(name) => device.name = name,
            Self::Brand(brand) => device.brand = brand,
            Self::Both { name, brand } => {
                device.name = name;
                device.brand = brand;
            }
        }
        device.update_time = now;
    }
}
