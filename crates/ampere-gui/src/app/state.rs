use std::{path::PathBuf, sync::Arc};

use ampere_core::modules::{self, battery_indicator::BatteryIndicator};
use ampere_proto::{config::Config, ports::battery::BatteryPort};
use flexi_logger::LoggerHandle;
use iced::Task;

pub struct App {
    pub(super) config_path: PathBuf,
    pub(super) logger: LoggerHandle,
    pub(super) battery_port: Arc<dyn BatteryPort>,
    pub config: Config,
    pub battery_indicator: BatteryIndicator,
}

#[derive(Debug, Clone)]
pub enum Message {
    ConfigChanged(Box<Config>),
    BatteryIndicator(modules::battery_indicator::Message),
}

impl App {
    pub fn new(
        (logger, config, config_path, battery_port): (
            LoggerHandle,
            Config,
            PathBuf,
            Arc<dyn BatteryPort>,
        ),
    ) -> impl FnOnce() -> (Self, Task<Message>) {
        move || {
            let app = App {
                config_path,
                logger,
                battery_port,
                config,
                battery_indicator: BatteryIndicator::new(),
            };

            (app, Task::none())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampere_core::{
        services::{
            ServiceEvent,
            battery::{BatteryEvent, BatteryService},
        },
        test_utils::MockBatteryPort,
    };
    use ampere_proto::ports::battery::{BatteryError, BatteryReading};
    use flexi_logger::LoggerHandle;
    use std::sync::OnceLock;

    fn test_logger() -> LoggerHandle {
        static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();
        LOGGER
            .get_or_init(|| {
                flexi_logger::Logger::try_with_env_or_str("off")
                    .expect("failed to configure test logger")
                    .start()
                    .expect("failed to start test logger")
            })
            .clone()
    }

    fn test_app(port: MockBatteryPort) -> App {
        let port: Arc<dyn BatteryPort> = Arc::new(port);
        let (app, _) = App::new((test_logger(), Config::default(), PathBuf::new(), port))();
        app
    }

    fn battery_message(event: ServiceEvent<BatteryService>) -> Message {
        Message::BatteryIndicator(modules::battery_indicator::Message::Event(event))
    }

    #[test]
    fn app_starts_with_default_snapshot() {
        let app = test_app(MockBatteryPort::unsupported());
        let snapshot = app.battery_indicator.snapshot();

        assert_eq!(snapshot.level, 0.0);
        assert!(!snapshot.charging);
        assert!(snapshot.supported);
    }

    #[test]
    fn app_stores_injected_battery_port() {
        let port: Arc<dyn BatteryPort> = Arc::new(MockBatteryPort::unsupported());
        let (app, _) = App::new((
            test_logger(),
            Config::default(),
            PathBuf::new(),
            Arc::clone(&port),
        ))();

        assert!(Arc::ptr_eq(&app.battery_port, &port));
    }

    #[test]
    fn battery_messages_reach_the_indicator() {
        let mut app = test_app(MockBatteryPort::unsupported());

        let _ = app.update(battery_message(ServiceEvent::Init(BatteryService::new(
            BatteryReading::new(0.5, true),
        ))));
        assert_eq!(app.battery_indicator.snapshot().level, 50.0);

        let _ = app.update(battery_message(ServiceEvent::Update(BatteryEvent::Reading(
            BatteryReading::new(0.8, true),
        ))));
        assert_eq!(app.battery_indicator.snapshot().percentage_label(), "80%");
    }

    #[test]
    fn service_error_switches_to_unsupported() {
        let mut app = test_app(MockBatteryPort::unsupported());

        let _ = app.update(battery_message(ServiceEvent::Error(BatteryError::unavailable(
            "no battery",
        ))));

        assert!(!app.battery_indicator.is_supported());
    }

    #[test]
    fn config_change_is_applied_without_resetting_snapshot() {
        let mut app = test_app(MockBatteryPort::unsupported());
        let _ = app.update(battery_message(ServiceEvent::Init(BatteryService::new(
            BatteryReading::new(0.5, false),
        ))));

        let mut config = Config::default();
        config.indicator.show_status_label = false;
        config.indicator.low_level_threshold = 60;
        let _ = app.update(Message::ConfigChanged(Box::new(config.clone())));

        assert_eq!(app.config, config);
        assert_eq!(app.battery_indicator.snapshot().level, 50.0);
    }
}
