mod ui;

use std::{sync::mpsc, thread};

use clap::Parser;
use egui::Vec2;
use log::{error, warn};

use nimbus::forecast::{ForecastUpdate, OwmClient, Units, collect_forecast};
use nimbus::location::IpLookupProvider;
use ui::ForecastApp;
use ui::config::AppConfig;

const WINDOW_WIDTH: f32 = 420.0;
const WINDOW_HEIGHT: f32 = 760.0;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// OpenWeatherMap API credential; overrides the config file value
    #[arg(short, long, env = "OPENWEATHERMAP_API_KEY")]
    api_key: Option<String>,

    /// Unit system for the forecast request; overrides the config file value
    #[arg(short, long, value_enum)]
    units: Option<Units>,
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(api_key) = cli.api_key {
        app_config.api_key = Some(api_key);
    }
    if let Some(units) = cli.units {
        app_config.units = units;
    }

    let (update_tx, update_rx) = mpsc::channel::<ForecastUpdate>();

    match app_config.api_key.clone() {
        Some(api_key) => {
            let units = app_config.units;
            let share_location = app_config.share_location;
            thread::spawn(move || {
                let provider = match IpLookupProvider::new(share_location) {
                    Ok(provider) => provider,
                    Err(e) => {
                        error!("Could not build location provider: {}", e);
                        return;
                    }
                };
                let client = match OwmClient::new(api_key, units) {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Could not build weather client: {}", e);
                        return;
                    }
                };
                if let Err(e) = collect_forecast(provider, client, update_tx) {
                    error!("Forecast fetch failed: {}", e);
                }
            });
        }
        None => warn!("No API key configured; the forecast will stay on its loading screen"),
    }

    let window_position = app_config.window_position.clone();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .with_position(window_position);

    eframe::run_native(
        "Nimbus",
        native_options,
        Box::new(|cc| Ok(Box::new(ForecastApp::new(update_rx, app_config, cc)))),
    )
    .expect("could not start app");
}
