pub mod charging_icon;
pub mod gauge;
pub mod status_label;
pub mod unsupported_notice;
