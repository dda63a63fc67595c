use std::time::Duration;

use egui::{
    Align, Id, Layout, Rect, RichText, Sense, Spinner, Ui, Vec2,
    scroll_area::ScrollBarVisibility,
};

use nimbus::forecast::DayForecast;

use super::{CITY_PLACEHOLDER, ForecastApp, PALETTE_WHITE};

const CITY_PANEL_HEIGHT: f32 = 140.0;
const CITY_TEXT_SIZE: f32 = 45.0;
const TEMP_TEXT_SIZE: f32 = 96.0;
const CATEGORY_TEXT_SIZE: f32 = 30.0;
const DESCRIPTION_TEXT_SIZE: f32 = 20.0;
const ICON_TEXT_SIZE: f32 = 90.0;
const SPINNER_SIZE: f32 = 40.0;
const SWIPE_THRESHOLD_PX: f32 = 60.0;
const PAGE_ANIMATION_S: f32 = 0.25;
const LOADING_REPAINT_MS: u64 = 250;

impl ForecastApp {
    pub(crate) fn forecast_view(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("city")
            .exact_height(CITY_PANEL_HEIGHT)
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(&self.city)
                            .size(CITY_TEXT_SIZE)
                            .strong()
                            .color(PALETTE_WHITE),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.days.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.add(Spinner::new().size(SPINNER_SIZE).color(PALETTE_WHITE));
                });
            } else {
                let page_size = ui.available_size();
                self.handle_paging(ui, ui.max_rect());

                let target_offset = self.page as f32 * page_size.x;
                let offset = ui.ctx().animate_value_with_time(
                    Id::new("page-offset"),
                    target_offset,
                    PAGE_ANIMATION_S,
                );

                egui::ScrollArea::horizontal()
                    .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
                    .enable_scrolling(false)
                    .scroll_offset(Vec2::new(offset, 0.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            for day in &self.days {
                                day_slide(ui, day, page_size);
                            }
                        });
                    });
            }
        });

        // the fetch thread cannot wake the event loop, so poll the channel
        // at a low cadence for as long as anything is still loading
        if self.days.is_empty() || self.city == CITY_PLACEHOLDER {
            ctx.request_repaint_after(Duration::from_millis(LOADING_REPAINT_MS));
        }
    }

    /// Page flips from arrow keys or a horizontal drag past the swipe
    /// threshold. The scroll offset itself is driven, not user-scrolled.
    fn handle_paging(&mut self, ui: &Ui, panel_rect: Rect) {
        let last_page = self.days.len().saturating_sub(1);

        if ui.input(|i| i.key_pressed(egui::Key::ArrowRight)) && self.page < last_page {
            self.page += 1;
        }
        if ui.input(|i| i.key_pressed(egui::Key::ArrowLeft)) && self.page > 0 {
            self.page -= 1;
        }

        let response = ui.interact(panel_rect, Id::new("page-swipe"), Sense::drag());
        if response.dragged() {
            self.swipe_accum += response.drag_delta().x;
        }
        if response.drag_stopped() {
            if self.swipe_accum < -SWIPE_THRESHOLD_PX && self.page < last_page {
                self.page += 1;
            } else if self.swipe_accum > SWIPE_THRESHOLD_PX && self.page > 0 {
                self.page -= 1;
            }
            self.swipe_accum = 0.0;
        }
    }
}

fn day_slide(ui: &mut Ui, day: &DayForecast, page_size: Vec2) {
    ui.allocate_ui_with_layout(page_size, Layout::left_to_right(Align::Min), |ui| {
        ui.set_min_size(page_size);
        ui.add_space(10.0);
        ui.vertical(|ui| {
            ui.label(
                RichText::new(day.display_temp())
                    .size(TEMP_TEXT_SIZE)
                    .strong()
                    .color(PALETTE_WHITE),
            );
            if let Some(category) = &day.category {
                ui.label(
                    RichText::new(category)
                        .size(CATEGORY_TEXT_SIZE)
                        .color(PALETTE_WHITE),
                );
            }
            if let Some(description) = &day.description {
                ui.label(
                    RichText::new(description)
                        .size(DESCRIPTION_TEXT_SIZE)
                        .color(PALETTE_WHITE),
                );
            }
        });
        if let Some(icon) = day.icon() {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.add_space(40.0);
                ui.label(RichText::new(icon).size(ICON_TEXT_SIZE));
            });
        }
    });
}
