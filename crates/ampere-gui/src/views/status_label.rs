use ampere_core::modules::battery_indicator::ChargingStatus;
use iced::{
    Element, Font,
    font::Weight,
    widget::text,
};

use crate::app::Message;

/// Render "Charging" / "Not Charging"
pub fn render_status(status: ChargingStatus,) -> Element<'static, Message,>
{
    text(status.label(),)
        .size(14,)
        .font(Font {
            weight: Weight::Medium,
            ..Font::DEFAULT
        },)
        .into()
}
