use iced::{
    Color, Element, Length,
    widget::{svg, svg::Handle},
};

use crate::app::Message;

const CHARGING_GLYPH: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M11 7L6 12h4v8l5-5h-4v-8z"/></svg>"#;

const ICON_SIZE: f32 = 24.0;

/// Render the lightning bolt drawn over the gauge while charging
pub fn render_charging_icon(color: Color,) -> Element<'static, Message,>
{
    svg(Handle::from_memory(CHARGING_GLYPH,),)
        .width(Length::Fixed(ICON_SIZE,),)
        .height(Length::Fixed(ICON_SIZE,),)
        .style(move |_theme, _status| svg::Style {
            color: Some(color,),
        },)
        .into()
}
