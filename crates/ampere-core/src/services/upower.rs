//! UPower-backed implementation of the battery port.
//!
//! The capability counts as absent when the system bus cannot be reached or
//! UPower lists no battery that powers the machine. Level and charging
//! notifications map onto the `Percentage` and `State` property streams of the
//! selected device.

use std::sync::Arc;

use ampere_proto::ports::battery::{
    BatteryCapability, BatteryChange, BatteryError, BatteryFuture, BatteryHandle,
    BatteryNotifications, BatteryPort, BatteryReading,
};
use futures::StreamExt;
use log::{debug, info};

mod dbus;

use dbus::{DeviceProxy, UPowerDbus, is_on_external_power};

#[derive(Debug, Default)]
pub struct UPowerPort;

impl UPowerPort {
    pub fn new() -> Self {
        Self
    }
}

impl BatteryPort for UPowerPort {
    fn probe(&self) -> BatteryFuture<'_, BatteryCapability> {
        Box::pin(async move {
            let conn = match zbus::Connection::system().await {
                Ok(conn) => conn,
                Err(err) => {
                    debug!("System bus unavailable: {err}");
                    return Ok(BatteryCapability::Unsupported);
                }
            };

            let upower = UPowerDbus::new(&conn)
                .await
                .map_err(|err| BatteryError::backend(err.to_string()))?;

            match upower
                .get_battery_device()
                .await
                .map_err(|err| BatteryError::backend(err.to_string()))?
            {
                Some(device) => {
                    info!("Using UPower battery {}", device.inner().path());
                    Ok(BatteryCapability::Supported(Arc::new(UPowerBattery { device })))
                }
                None => {
                    debug!("UPower reports no battery device");
                    Ok(BatteryCapability::Unsupported)
                }
            }
        })
    }
}

#[derive(Debug)]
struct UPowerBattery {
    device: DeviceProxy<'static>,
}

impl BatteryHandle for UPowerBattery {
    fn read(&self) -> BatteryFuture<'_, BatteryReading> {
        Box::pin(async move {
            let percentage = self
                .device
                .percentage()
                .await
                .map_err(|err| BatteryError::read(format!("Percentage: {err}")))?;
            let state = self
                .device
                .state()
                .await
                .map_err(|err| BatteryError::read(format!("State: {err}")))?;

            Ok(BatteryReading::new(
                percentage / 100.0,
                is_on_external_power(state),
            ))
        })
    }

    fn notifications(&self, change: BatteryChange) -> BatteryFuture<'_, BatteryNotifications> {
        Box::pin(async move {
            let stream: BatteryNotifications = match change {
                BatteryChange::Level => Box::pin(
                    self.device
                        .receive_percentage_changed()
                        .await
                        .map(|_| Ok(())),
                ),
                BatteryChange::Charging => Box::pin(
                    self.device
                        .receive_state_changed()
                        .await
                        .map(|_| Ok(())),
                ),
            };

            debug!("Subscribed to UPower {change} notifications");
            Ok(stream)
        })
    }
}
