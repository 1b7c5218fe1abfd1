use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio_stream::Stream;

/// Boxed future returned by [`BatteryPort`] and [`BatteryHandle`] operations.
pub type BatteryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BatteryError>> + Send + 'a>>;

/// Stream of change notifications for a single [`BatteryChange`] kind.
///
/// Items carry no payload: receivers re-read the live handle when one
/// arrives. Dropping the stream releases the underlying subscription.
pub type BatteryNotifications =
    Pin<Box<dyn Stream<Item = Result<(), BatteryError>> + Send + 'static>>;

/// Error type returned by battery port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatteryError {
    /// The host does not expose a battery-status facility.
    #[error("battery status capability unavailable: {context}")]
    Unavailable {
        /// Reason reported by the backend.
        context: Arc<str>,
    },
    /// The capability is advertised but reading the current status failed.
    #[error("failed to read battery status: {context}")]
    Read {
        /// Reason reported by the backend.
        context: Arc<str>,
    },
    /// Registering for change notifications failed.
    #[error("failed to subscribe to {change} notifications: {context}")]
    Subscribe {
        /// Notification kind that could not be registered.
        change: BatteryChange,
        /// Reason reported by the backend.
        context: Arc<str>,
    },
    /// The probe and initial read did not settle in time.
    #[error("battery probe did not settle within {timeout:?}")]
    Timeout {
        /// Allotted time before the probe was abandoned.
        timeout: Duration,
    },
    /// The transport used by the backend failed.
    #[error("battery backend failure: {context}")]
    Backend {
        /// Reason reported by the backend.
        context: Arc<str>,
    },
}

impl BatteryError {
    fn arc_from(value: impl Into<String>) -> Arc<str> {
        Arc::<str>::from(value.into())
    }

    /// Helper for constructing [`BatteryError::Unavailable`].
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: Self::arc_from(context),
        }
    }

    /// Helper for constructing [`BatteryError::Read`].
    pub fn read(context: impl Into<String>) -> Self {
        Self::Read {
            context: Self::arc_from(context),
        }
    }

    /// Helper for constructing [`BatteryError::Subscribe`].
    pub fn subscribe(change: BatteryChange, context: impl Into<String>) -> Self {
        Self::Subscribe {
            change,
            context: Self::arc_from(context),
        }
    }

    /// Helper for constructing [`BatteryError::Backend`].
    pub fn backend(context: impl Into<String>) -> Self {
        Self::Backend {
            context: Self::arc_from(context),
        }
    }
}

/// Kind of change notification a [`BatteryHandle`] can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryChange {
    /// The charge level changed.
    Level,
    /// The device was plugged in or unplugged.
    Charging,
}

impl BatteryChange {
    /// Every notification kind, in registration order.
    pub const ALL: [BatteryChange; 2] = [BatteryChange::Charging, BatteryChange::Level];
}

impl fmt::Display for BatteryChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level => f.write_str("level change"),
            Self::Charging => f.write_str("charging change"),
        }
    }
}

/// Raw battery reading as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    /// Charge as a fraction in `[0, 1]`.
    pub fraction: f64,
    /// Whether the device is connected to a power source.
    pub charging: bool,
}

impl BatteryReading {
    pub const fn new(fraction: f64, charging: bool) -> Self {
        Self { fraction, charging }
    }

    /// Charge level as a percentage clamped to `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ampere_proto::ports::battery::BatteryReading;
    ///
    /// assert_eq!(BatteryReading::new(0.5, false).level(), 50.0);
    /// assert_eq!(BatteryReading::new(1.4, false).level(), 100.0);
    /// ```
    pub fn level(&self) -> f64 {
        if self.fraction.is_nan() {
            return 0.0;
        }

        (self.fraction * 100.0).clamp(0.0, 100.0)
    }
}

/// Live battery object obtained from a successful probe.
pub trait BatteryHandle: fmt::Debug + Send + Sync {
    /// Read the current battery status.
    fn read(&self) -> BatteryFuture<'_, BatteryReading>;

    /// Register for notifications of the given kind.
    ///
    /// The subscription stays active for as long as the returned stream is
    /// alive.
    fn notifications(&self, change: BatteryChange) -> BatteryFuture<'_, BatteryNotifications>;
}

/// Outcome of the one-time capability probe.
#[derive(Debug, Clone)]
pub enum BatteryCapability {
    /// The host exposes battery status through the given handle.
    Supported(Arc<dyn BatteryHandle>),
    /// The host has no battery-status facility.
    Unsupported,
}

/// Entry point into the host's battery-status facility.
pub trait BatteryPort: fmt::Debug + Send + Sync {
    /// Check whether the host exposes battery status.
    ///
    /// Backends return [`BatteryCapability::Unsupported`] when the facility is
    /// simply absent and an error when probing itself failed. Callers treat
    /// both the same way.
    fn probe(&self) -> BatteryFuture<'_, BatteryCapability>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scales_fraction_to_percentage() {
        assert_eq!(BatteryReading::new(0.15, false).level(), 15.0);
        assert_eq!(BatteryReading::new(0.0, true).level(), 0.0);
        assert_eq!(BatteryReading::new(1.0, true).level(), 100.0);
    }

    #[test]
    fn level_is_clamped_for_out_of_range_fractions() {
        assert_eq!(BatteryReading::new(-0.2, false).level(), 0.0);
        assert_eq!(BatteryReading::new(3.0, false).level(), 100.0);
        assert_eq!(BatteryReading::new(f64::NAN, false).level(), 0.0);
    }

    #[test]
    fn subscribe_error_names_the_change_kind() {
        let err = BatteryError::subscribe(BatteryChange::Level, "no signal");
        assert_eq!(
            err.to_string(),
            "failed to subscribe to level change notifications: no signal"
        );
    }
}
