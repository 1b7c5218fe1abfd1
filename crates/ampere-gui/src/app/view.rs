use ampere_core::modules::battery_indicator::IndicatorView;
use iced::{
    Alignment, Element, Length, Theme,
    widget::{column, container},
};

use super::state::{App, Message};
use crate::views::{gauge, status_label, unsupported_notice};

impl App
{
    pub fn title(&self,) -> String
    {
        String::from("ampere",)
    }

    pub fn theme(&self,) -> Theme
    {
        Theme::Light
    }

    pub fn scale_factor(&self,) -> f64
    {
        self.config.appearance.scale_factor
    }

    pub fn view(&self,) -> Element<Message,>
    {
        let appearance = &self.config.appearance;

        let content: Element<Message,> =
            match self.battery_indicator.view_model(&self.config.indicator,) {
                IndicatorView::Gauge {
                    gauge: data,
                    status,
                } => {
                    let mut content = column![gauge::render_gauge(&data, appearance)]
                        .align_x(Alignment::Center,)
                        .spacing(8,);

                    if let Some(status,) = status {
                        content = content.push(status_label::render_status(status,),);
                    }

                    content.into()
                }
                IndicatorView::Unsupported => unsupported_notice::render_notice(appearance,),
            };

        container(content,).center(Length::Fill,).into()
    }
}
