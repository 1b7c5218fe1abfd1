use std::ops::Deref;

use masterror::{AppError, AppResult};
use zbus::{
    Result, proxy,
    zvariant::OwnedObjectPath,
};

/// UPower `Type` value for laptop batteries.
const DEVICE_TYPE_BATTERY: u32 = 2;

/// UPower `State` values that mean a power source is attached.
const STATE_CHARGING: u32 = 1;
const STATE_FULLY_CHARGED: u32 = 4;
const STATE_PENDING_CHARGE: u32 = 5;

pub struct UPowerDbus<'a>(UPowerProxy<'a>);

impl<'a> Deref for UPowerDbus<'a> {
    type Target = UPowerProxy<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl UPowerDbus<'_> {
    pub async fn new(conn: &zbus::Connection) -> AppResult<Self> {
        let upower = UPowerProxy::new(conn)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create UPowerProxy: {}", e)))?;

        Ok(Self(upower))
    }

    /// First device that is a battery powering the system, if any.
    pub async fn get_battery_device(&self) -> AppResult<Option<DeviceProxy<'static>>> {
        let devices = self.enumerate_devices().await.map_err(|e| {
            AppError::internal(format!("Failed to enumerate UPower devices: {}", e))
        })?;

        for path in devices {
            let device = DeviceProxy::builder(self.inner().connection())
                .path(path)
                .map_err(|e| AppError::internal(format!("Failed to set DeviceProxy path: {}", e)))?
                .build()
                .await
                .map_err(|e| AppError::internal(format!("Failed to build DeviceProxy: {}", e)))?;

            let device_type = device
                .device_type()
                .await
                .map_err(|e| AppError::internal(format!("Failed to get device type: {}", e)))?;
            let power_supply = device
                .power_supply()
                .await
                .map_err(|e| AppError::internal(format!("Failed to get power supply: {}", e)))?;

            if device_type == DEVICE_TYPE_BATTERY && power_supply {
                return Ok(Some(device));
            }
        }

        Ok(None)
    }
}

/// Whether a UPower device state means the device is on external power.
pub fn is_on_external_power(state: u32) -> bool {
    matches!(
        state,
        STATE_CHARGING | STATE_FULLY_CHARGED | STATE_PENDING_CHARGE
    )
}

#[proxy(
    interface = "org.freedesktop.UPower",
    default_service = "org.freedesktop.UPower",
    default_path = "/org/freedesktop/UPower"
)]
pub trait UPower {
    fn enumerate_devices(&self) -> Result<Vec<OwnedObjectPath>>;
}

#[proxy(
    default_service = "org.freedesktop.UPower",
    default_path = "/org/freedesktop/UPower/Device",
    interface = "org.freedesktop.UPower.Device"
)]
pub trait Device {
    #[zbus(property, name = "Type")]
    fn device_type(&self) -> Result<u32>;

    #[zbus(property)]
    fn power_supply(&self) -> Result<bool>;

    #[zbus(property)]
    fn percentage(&self) -> Result<f64>;

    #[zbus(property)]
    fn state(&self) -> Result<u32>;
}

#[cfg(test)]
mod tests {
    use super::is_on_external_power;

    #[test]
    fn charging_states_count_as_external_power() {
        assert!(is_on_external_power(1));
        assert!(is_on_external_power(4));
        assert!(is_on_external_power(5));
    }

    #[test]
    fn discharging_states_do_not() {
        for state in [0, 2, 3, 6] {
            assert!(!is_on_external_power(state));
        }
    }
}
