use std::{backtrace::Backtrace, panic, path::PathBuf, sync::Arc};

use ampere_core::{config::get_config, services::upower::UPowerPort};
use ampere_gui::{App, get_log_spec};
use ampere_proto::ports::battery::BatteryPort;
use clap::Parser;
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, LogSpecBuilder, Logger, Naming};
use iced::{Font, Size};
use log::{debug, error};

const WINDOW_SIZE: Size = Size::new(320.0, 200.0);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    config_path: Option<PathBuf>,
}

fn main() -> iced::Result {
    let args = Args::parse();

    let logger = Logger::with(
        LogSpecBuilder::new()
            .default(log::LevelFilter::Info)
            .build(),
    )
    .log_to_file(FileSpec::default().directory("/tmp/ampere"))
    .duplicate_to_stdout(flexi_logger::Duplicate::All)
    .rotate(
        Criterion::Age(Age::Day),
        Naming::Timestamps,
        Cleanup::KeepLogFiles(7),
    );
    let logger = logger.start().unwrap_or_else(|err| {
        eprintln!("Failed to start logger: {err}");

        std::process::exit(1);
    });
    panic::set_hook(Box::new(|info| {
        let b = Backtrace::capture();
        error!("Panic: {info} \n {b}");
    }));
    debug!("args: {args:?}");

    let (config, config_path) = get_config(args.config_path).unwrap_or_else(|err| {
        error!("Failed to read config: {err}");

        std::process::exit(1);
    });

    logger.set_new_spec(get_log_spec(&config.log_level));

    let font = match config.appearance.font_name {
        Some(ref font_name) => Font::with_name(Box::leak(font_name.clone().into_boxed_str())),
        None => Font::DEFAULT,
    };

    let battery_port: Arc<dyn BatteryPort> = Arc::new(UPowerPort::new());

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .scale_factor(App::scale_factor)
        .default_font(font)
        .window_size(WINDOW_SIZE)
        .run_with(App::new((logger, config, config_path, battery_port)))
}
