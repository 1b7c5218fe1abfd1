use ampere_core::{
    config::{Appearance, to_color},
    modules::battery_indicator::UNSUPPORTED_MESSAGE,
};
use iced::{
    Border, Element, Theme,
    widget::{container, text},
};

use crate::app::Message;

/// Render the fallback shown when battery status cannot be read
pub fn render_notice(appearance: &Appearance,) -> Element<'static, Message,>
{
    let background = to_color(appearance.notice_background,);
    let text_color = to_color(appearance.notice_text,);

    container(text(UNSUPPORTED_MESSAGE,),)
        .padding(16,)
        .style(move |_theme: &Theme| container::Style {
            text_color: Some(text_color,),
            background: Some(background.into(),),
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..Default::default()
        },)
        .into()
}
