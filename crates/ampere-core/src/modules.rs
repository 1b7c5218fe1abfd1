pub mod battery_indicator;
