use std::time::Duration;

use hex_color::HexColor;
use iced::Color;
use serde::Deserialize;

mod validation;

pub use validation::ConfigValidationError;

pub const DEFAULT_CONFIG_FILE_PATH: &str = "~/.config/ampere/config.toml";

/// Largest accepted `appearance.scale_factor`.
pub const MAX_SCALE_FACTOR: f64 = 2.0;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Levels strictly above this value are drawn with the healthy fill.
    #[serde(default = "default_low_level_threshold")]
    pub low_level_threshold: u8,
    #[serde(default = "default_true")]
    pub show_status_label: bool,
    #[serde(default = "default_true")]
    pub show_percentage: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            low_level_threshold: default_low_level_threshold(),
            show_status_label: true,
            show_percentage: true,
        }
    }
}

fn default_low_level_threshold() -> u8 {
    20
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Appearance {
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(
        deserialize_with = "scale_factor_deserializer",
        default = "default_scale_factor"
    )]
    pub scale_factor: f64,
    #[serde(default = "default_healthy_fill")]
    pub healthy_fill: HexColor,
    #[serde(default = "default_low_fill")]
    pub low_fill: HexColor,
    #[serde(default = "default_charging_border")]
    pub charging_border: HexColor,
    #[serde(default = "default_idle_border")]
    pub idle_border: HexColor,
    #[serde(default = "default_label_text")]
    pub label_text: HexColor,
    #[serde(default = "default_notice_background")]
    pub notice_background: HexColor,
    #[serde(default = "default_notice_text")]
    pub notice_text: HexColor,
}

fn scale_factor_deserializer<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;

    if v <= 0.0 {
        return Err(serde::de::Error::custom(
            "Scale factor must be greater than 0.0",
        ));
    }

    if v > MAX_SCALE_FACTOR {
        return Err(serde::de::Error::custom(format!(
            "Scale factor cannot be greater than {MAX_SCALE_FACTOR}"
        )));
    }

    Ok(v)
}

fn default_scale_factor() -> f64 {
    1.0
}

fn default_healthy_fill() -> HexColor {
    HexColor::rgb(134, 239, 172)
}

fn default_low_fill() -> HexColor {
    HexColor::rgb(239, 68, 68)
}

fn default_charging_border() -> HexColor {
    HexColor::rgb(34, 197, 94)
}

fn default_idle_border() -> HexColor {
    HexColor::rgb(107, 114, 128)
}

fn default_label_text() -> HexColor {
    HexColor::rgb(107, 114, 128)
}

fn default_notice_background() -> HexColor {
    HexColor::rgb(229, 231, 235)
}

fn default_notice_text() -> HexColor {
    HexColor::rgb(55, 65, 81)
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            font_name: None,
            scale_factor: default_scale_factor(),
            healthy_fill: default_healthy_fill(),
            low_fill: default_low_fill(),
            charging_border: default_charging_border(),
            idle_border: default_idle_border(),
            label_text: default_label_text(),
            notice_background: default_notice_background(),
            notice_text: default_notice_text(),
        }
    }
}

/// Convert a configured hex color into an iced [`Color`].
pub fn to_color(color: HexColor) -> Color {
    Color::from_rgb8(color.r, color.g, color.b)
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds to wait for the capability probe; `0` waits forever.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub appearance: Appearance,
}

fn default_log_level() -> String {
    "warn".to_owned()
}

fn default_probe_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Timeout applied to the capability probe, if any.
    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_secs > 0).then(|| Duration::from_secs(self.probe_timeout_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            probe_timeout_secs: default_probe_timeout_secs(),
            indicator: IndicatorConfig::default(),
            appearance: Appearance::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").expect("empty config parses");
        assert_eq!(config, Config::default());
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn zero_timeout_disables_probe_deadline() {
        let config: Config = toml::from_str("probe_timeout_secs = 0").expect("config parses");
        assert_eq!(config.probe_timeout(), None);
    }

    #[test]
    fn parses_indicator_and_appearance_sections() {
        let config: Config = toml::from_str(
            r##"
            log_level = "debug"

            [indicator]
            low_level_threshold = 30
            show_status_label = false

            [appearance]
            scale_factor = 1.5
            low_fill = "#FF0000"
            "##,
        )
        .expect("config parses");

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.indicator.low_level_threshold, 30);
        assert!(!config.indicator.show_status_label);
        assert!(config.indicator.show_percentage);
        assert_eq!(config.appearance.scale_factor, 1.5);
        assert_eq!(config.appearance.low_fill, HexColor::rgb(255, 0, 0));
        assert_eq!(config.appearance.healthy_fill, default_healthy_fill());
    }

    #[test]
    fn rejects_out_of_range_scale_factor() {
        let result: Result<Config, _> = toml::from_str("[appearance]\nscale_factor = 0.0");
        assert!(result.is_err());

        let result: Result<Config, _> = toml::from_str("[appearance]\nscale_factor = 3.0");
        assert!(result.is_err());

        let config: Config = toml::from_str("[appearance]\nscale_factor = 2.0")
            .expect("upper bound is inclusive");
        assert_eq!(config.appearance.scale_factor, MAX_SCALE_FACTOR);
    }

    #[test]
    fn to_color_keeps_channels() {
        let color = to_color(HexColor::rgb(255, 0, 0));
        assert_eq!(color, Color::from_rgb8(255, 0, 0));
    }
}
