use std::sync::Arc;

use ampere_core::{
    config::{self, ConfigEvent},
    modules,
    services::{
        ReadOnlyService,
        battery::{BatteryProbe, BatteryService},
    },
};
use iced::{Subscription, Task};
use log::{debug, info};

use super::state::{App, Message};
use crate::get_log_spec;

impl App
{
    pub fn update(&mut self, message: Message,) -> Task<Message,>
    {
        match message {
            Message::ConfigChanged(config,) => {
                info!("New config applied");
                debug!("Config: {config:?}");

                if config.log_level != self.config.log_level {
                    self.logger.set_new_spec(get_log_spec(&config.log_level,),);
                }

                if config.probe_timeout_secs != self.config.probe_timeout_secs {
                    debug!("Probe timeout change takes effect on the next start");
                }

                self.config = *config;

                Task::none()
            }
            Message::BatteryIndicator(message,) => {
                self.battery_indicator.update(message,);

                Task::none()
            }
        }
    }

    pub fn subscription(&self,) -> Subscription<Message,>
    {
        let probe =
            BatteryProbe::new(Arc::clone(&self.battery_port,), self.config.probe_timeout(),);

        Subscription::batch(vec![
            config::subscription(&self.config_path,).map(|event| match event {
                ConfigEvent::Updated(config,) => Message::ConfigChanged(config,),
            },),
            BatteryService::subscribe(probe,).map(|event| {
                Message::BatteryIndicator(modules::battery_indicator::Message::Event(event,),)
            },),
        ],)
    }
}
