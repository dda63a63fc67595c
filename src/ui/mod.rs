pub(crate) mod config;
mod forecast_view;

use std::sync::mpsc::Receiver;

use config::AppConfig;
use egui::{Color32, Visuals, style::Widgets};
use log::error;

use nimbus::forecast::{DayForecast, ForecastUpdate};

pub(crate) const CITY_PLACEHOLDER: &str = "Loading...";

pub(crate) const PALETTE_TOMATO: Color32 = Color32::from_rgb(255, 99, 71);
pub(crate) const PALETTE_DARK_TOMATO: Color32 = Color32::from_rgb(204, 61, 38);
pub(crate) const PALETTE_WHITE: Color32 = Color32::from_rgb(255, 255, 255);

/// `ForecastApp` renders the fetched forecast as horizontally paged day
/// cards, with a spinner until the data arrives.
///
/// State has a single writer: the channel drain at the top of each frame.
/// The city label and the day sequence each transition at most once per
/// launch; a failed fetch simply never delivers its message.
pub(crate) struct ForecastApp {
    update_receiver: Receiver<ForecastUpdate>,
    city: String,
    days: Vec<DayForecast>,
    page: usize,
    swipe_accum: f32,
    app_config: AppConfig,
}

impl ForecastApp {
    pub(crate) fn new(
        update_receiver: Receiver<ForecastUpdate>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            override_text_color: Some(PALETTE_WHITE),
            faint_bg_color: PALETTE_DARK_TOMATO,
            extreme_bg_color: PALETTE_DARK_TOMATO,
            panel_fill: PALETTE_TOMATO,
            window_fill: PALETTE_TOMATO,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        Self {
            update_receiver,
            city: CITY_PLACEHOLDER.to_string(),
            days: Vec::new(),
            page: 0,
            swipe_accum: 0.0,
            app_config,
        }
    }
}

impl eframe::App for ForecastApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // apply whatever the fetch pipeline has delivered since last frame
        while let Ok(update) = self.update_receiver.try_recv() {
            match update {
                ForecastUpdate::Daily(days) => {
                    self.days = days;
                    self.page = 0;
                }
                ForecastUpdate::City(name) => self.city = name,
            }
        }

        if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }

        self.forecast_view(ctx, _frame);
    }
}
