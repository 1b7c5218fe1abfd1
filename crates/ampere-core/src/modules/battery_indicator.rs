use ampere_proto::{config::IndicatorConfig, ports::battery::BatteryReading};
use log::debug;

use crate::services::{
    ServiceEvent,
    battery::{BatteryEvent, BatteryService},
};

/// Text shown in place of the gauge when battery status cannot be read.
pub const UNSUPPORTED_MESSAGE: &str = "Battery status is not supported in this browser.";

/// Latest known battery state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySnapshot {
    /// Charge percentage in `[0, 100]`.
    pub level: f64,
    pub charging: bool,
    /// Cleared for good once the probe fails.
    pub supported: bool,
}

impl Default for BatterySnapshot {
    fn default() -> Self {
        Self {
            level: 0.0,
            charging: false,
            supported: true,
        }
    }
}

impl BatterySnapshot {
    pub fn from_reading(reading: BatteryReading) -> Self {
        Self {
            level: reading.level(),
            charging: reading.charging,
            supported: true,
        }
    }

    /// Level rounded half away from zero.
    pub fn rounded_level(&self) -> u8 {
        self.level.clamp(0.0, 100.0).round() as u8
    }

    pub fn percentage_label(&self) -> String {
        format!("{}%", self.rounded_level())
    }
}

/// Fill color class of the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillTone {
    Healthy,
    Low,
}

/// Border color class of the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderTone {
    Charging,
    Idle,
}

/// Everything the gauge view needs, derived from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeData {
    /// Fraction of the gauge width to fill, in `[0, 1]`.
    pub fill_ratio: f32,
    pub fill: FillTone,
    pub border: BorderTone,
    /// `None` when the percentage overlay is turned off.
    pub label: Option<String>,
    pub charging_glyph: bool,
}

impl GaugeData {
    pub fn new(snapshot: &BatterySnapshot, config: &IndicatorConfig) -> Self {
        let fill = if snapshot.level > f64::from(config.low_level_threshold) {
            FillTone::Healthy
        } else {
            FillTone::Low
        };

        let border = if snapshot.charging {
            BorderTone::Charging
        } else {
            BorderTone::Idle
        };

        Self {
            fill_ratio: (snapshot.level.clamp(0.0, 100.0) / 100.0) as f32,
            fill,
            border,
            label: config.show_percentage.then(|| snapshot.percentage_label()),
            charging_glyph: snapshot.charging,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargingStatus {
    Charging,
    NotCharging,
}

impl From<bool> for ChargingStatus {
    fn from(charging: bool) -> Self {
        if charging {
            Self::Charging
        } else {
            Self::NotCharging
        }
    }
}

impl ChargingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Charging => "Charging",
            Self::NotCharging => "Not Charging",
        }
    }
}

/// Which of the two visual modes to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorView {
    Gauge {
        gauge: GaugeData,
        status: Option<ChargingStatus>,
    },
    Unsupported,
}

#[derive(Debug, Clone)]
pub enum Message {
    Event(ServiceEvent<BatteryService>),
}

/// Owns the battery snapshot and folds service events into it.
#[derive(Debug, Default)]
pub struct BatteryIndicator {
    snapshot: BatterySnapshot,
}

impl BatteryIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &BatterySnapshot {
        &self.snapshot
    }

    pub fn is_supported(&self) -> bool {
        self.snapshot.supported
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Event(event) => self.handle_service_event(event),
        }
    }

    fn handle_service_event(&mut self, event: ServiceEvent<BatteryService>) {
        match event {
            ServiceEvent::Init(service) => self.apply_reading(*service),
            ServiceEvent::Update(BatteryEvent::Reading(reading)) => self.apply_reading(reading),
            ServiceEvent::Error(err) => {
                debug!("Battery indicator switching to unsupported: {err}");
                self.snapshot.supported = false;
            }
        }
    }

    fn apply_reading(&mut self, reading: BatteryReading) {
        if !self.snapshot.supported {
            debug!("Ignoring battery reading after the indicator became unsupported");
            return;
        }

        self.snapshot = BatterySnapshot::from_reading(reading);
    }

    pub fn view_model(&self, config: &IndicatorConfig) -> IndicatorView {
        if !self.snapshot.supported {
            return IndicatorView::Unsupported;
        }

        IndicatorView::Gauge {
            gauge: GaugeData::new(&self.snapshot, config),
            status: config
                .show_status_label
                .then(|| ChargingStatus::from(self.snapshot.charging)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampere_proto::ports::battery::BatteryError;

    fn mounted_with(fraction: f64, charging: bool) -> BatteryIndicator {
        let mut indicator = BatteryIndicator::new();
        indicator.update(Message::Event(ServiceEvent::Init(BatteryService::new(
            BatteryReading::new(fraction, charging),
        ))));
        indicator
    }

    fn gauge_of(indicator: &BatteryIndicator) -> (GaugeData, Option<ChargingStatus>) {
        match indicator.view_model(&IndicatorConfig::default()) {
            IndicatorView::Gauge { gauge, status } => (gauge, status),
            IndicatorView::Unsupported => panic!("expected gauge, got unsupported notice"),
        }
    }

    #[test]
    fn starts_with_default_snapshot() {
        let indicator = BatteryIndicator::new();
        assert_eq!(
            *indicator.snapshot(),
            BatterySnapshot {
                level: 0.0,
                charging: false,
                supported: true,
            }
        );

        let (gauge, status) = gauge_of(&indicator);
        assert_eq!(gauge.label.as_deref(), Some("0%"));
        assert_eq!(status, Some(ChargingStatus::NotCharging));
    }

    #[test]
    fn absent_capability_renders_notice_only() {
        let mut indicator = BatteryIndicator::new();
        indicator.update(Message::Event(ServiceEvent::Error(BatteryError::unavailable(
            "no battery",
        ))));

        assert!(!indicator.is_supported());
        assert_eq!(
            indicator.view_model(&IndicatorConfig::default()),
            IndicatorView::Unsupported
        );
    }

    #[test]
    fn charging_half_full_battery() {
        let indicator = mounted_with(0.5, true);
        let (gauge, status) = gauge_of(&indicator);

        assert_eq!(indicator.snapshot().level, 50.0);
        assert_eq!(gauge.label.as_deref(), Some("50%"));
        assert_eq!(gauge.fill, FillTone::Healthy);
        assert_eq!(gauge.border, BorderTone::Charging);
        assert!(gauge.charging_glyph);
        assert_eq!(gauge.fill_ratio, 0.5);
        assert_eq!(status.map(|s| s.label()), Some("Charging"));
    }

    #[test]
    fn low_discharging_battery() {
        let indicator = mounted_with(0.15, false);
        let (gauge, status) = gauge_of(&indicator);

        assert_eq!(gauge.label.as_deref(), Some("15%"));
        assert_eq!(gauge.fill, FillTone::Low);
        assert_eq!(gauge.border, BorderTone::Idle);
        assert!(!gauge.charging_glyph);
        assert_eq!(status.map(|s| s.label()), Some("Not Charging"));
    }

    #[test]
    fn threshold_level_is_low() {
        let config = IndicatorConfig::default();
        let at_threshold = BatterySnapshot {
            level: 20.0,
            ..BatterySnapshot::default()
        };
        assert_eq!(GaugeData::new(&at_threshold, &config).fill, FillTone::Low);

        let above_threshold = BatterySnapshot {
            level: 20.5,
            ..BatterySnapshot::default()
        };
        assert_eq!(
            GaugeData::new(&above_threshold, &config).fill,
            FillTone::Healthy
        );
    }

    #[test]
    fn failed_initial_read_never_shows_gauge() {
        let mut indicator = BatteryIndicator::new();
        indicator.update(Message::Event(ServiceEvent::Error(BatteryError::read(
            "rejected",
        ))));

        assert_eq!(
            indicator.view_model(&IndicatorConfig::default()),
            IndicatorView::Unsupported
        );
    }

    #[test]
    fn level_change_replaces_snapshot() {
        let mut indicator = mounted_with(0.15, false);
        indicator.update(Message::Event(ServiceEvent::Update(BatteryEvent::Reading(
            BatteryReading::new(0.8, true),
        ))));

        let (gauge, _) = gauge_of(&indicator);
        assert_eq!(gauge.label.as_deref(), Some("80%"));
        assert_eq!(gauge.fill, FillTone::Healthy);
        assert!(indicator.is_supported());
    }

    #[test]
    fn most_recent_reading_wins() {
        let mut indicator = mounted_with(0.5, false);
        for (fraction, charging) in [(0.6, true), (0.4, false), (0.7, true)] {
            indicator.update(Message::Event(ServiceEvent::Update(BatteryEvent::Reading(
                BatteryReading::new(fraction, charging),
            ))));
        }

        assert_eq!(
            *indicator.snapshot(),
            BatterySnapshot::from_reading(BatteryReading::new(0.7, true))
        );
    }

    #[test]
    fn unsupported_is_permanent() {
        let mut indicator = mounted_with(0.5, true);
        indicator.update(Message::Event(ServiceEvent::Error(BatteryError::read(
            "gone",
        ))));
        indicator.update(Message::Event(ServiceEvent::Update(BatteryEvent::Reading(
            BatteryReading::new(0.9, true),
        ))));

        assert!(!indicator.is_supported());
        assert_eq!(
            indicator.view_model(&IndicatorConfig::default()),
            IndicatorView::Unsupported
        );
    }

    #[test]
    fn percentage_label_rounds_to_integer() {
        let cases = [(0.0, "0%"), (0.125, "13%"), (0.505, "51%"), (0.994, "99%"), (1.0, "100%")];

        for (fraction, expected) in cases {
            let snapshot = BatterySnapshot::from_reading(BatteryReading::new(fraction, false));
            assert_eq!(snapshot.percentage_label(), expected, "fraction {fraction}");
        }
    }

    #[test]
    fn hidden_overlays_follow_config() {
        let indicator = mounted_with(0.5, true);
        let config = IndicatorConfig {
            show_percentage: false,
            show_status_label: false,
            ..IndicatorConfig::default()
        };

        match indicator.view_model(&config) {
            IndicatorView::Gauge { gauge, status } => {
                assert_eq!(gauge.label, None);
                assert_eq!(status, None);
            }
            IndicatorView::Unsupported => panic!("expected gauge"),
        }
    }
}
