/// Battery gauge view layer - Pure rendering, no business logic
use ampere_core::{
    config::{Appearance, to_color},
    modules::battery_indicator::{BorderTone, FillTone, GaugeData},
};
use iced::{
    Border, Element, Font, Length, Theme,
    alignment::{Horizontal, Vertical},
    font::Weight,
    widget::{Space, Stack, container, row, text},
};

use super::charging_icon::render_charging_icon;
use crate::app::Message;

const GAUGE_WIDTH: f32 = 128.0;
const GAUGE_HEIGHT: f32 = 56.0;
const BORDER_WIDTH: f32 = 2.0;

/// Render the rectangular level gauge with its overlays
pub fn render_gauge(data: &GaugeData, appearance: &Appearance,) -> Element<'static, Message,>
{
    let fill_color = to_color(match data.fill {
        FillTone::Healthy => appearance.healthy_fill,
        FillTone::Low => appearance.low_fill,
    },);
    let border_color = to_color(match data.border {
        BorderTone::Charging => appearance.charging_border,
        BorderTone::Idle => appearance.idle_border,
    },);
    let label_color = to_color(appearance.label_text,);

    let inner_width = GAUGE_WIDTH - 2.0 * BORDER_WIDTH;
    let fill = container(Space::new(
        Length::Fixed(inner_width * data.fill_ratio.clamp(0.0, 1.0,),),
        Length::Fill,
    ),)
    .height(Length::Fill,)
    .style(move |_theme: &Theme| container::Style {
        background: Some(fill_color.into(),),
        ..Default::default()
    },);

    let mut layers = Stack::new()
        .width(Length::Fill,)
        .height(Length::Fill,)
        .push(row![fill].height(Length::Fill,),);

    if let Some(label,) = &data.label {
        layers = layers.push(
            container(
                text(label.clone(),)
                    .size(18,)
                    .color(label_color,)
                    .font(Font {
                        weight: Weight::Semibold,
                        ..Font::DEFAULT
                    },),
            )
            .center(Length::Fill,),
        );
    }

    if data.charging_glyph {
        layers = layers.push(
            container(render_charging_icon(border_color,),)
                .width(Length::Fill,)
                .height(Length::Fill,)
                .align_x(Horizontal::Right,)
                .align_y(Vertical::Center,),
        );
    }

    container(layers,)
        .width(Length::Fixed(GAUGE_WIDTH,),)
        .height(Length::Fixed(GAUGE_HEIGHT,),)
        .padding(BORDER_WIDTH,)
        .clip(true,)
        .style(move |_theme: &Theme| container::Style {
            border: Border {
                color: border_color,
                width: BORDER_WIDTH,
                radius: 8.0.into(),
            },
            ..Default::default()
        },)
        .into()
}
