use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Rating, MAX_RATING};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::SurveyView;
use crate::ui::widgets::{self, ACCENT, DISABLED};

const CARD_MAX_WIDTH: f32 = 480.0;
const STAR_SIZE: f32 = 44.0;
const SUMMARY_STAR_SIZE: f32 = 18.0;

pub struct SurveyApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: SurveyView,
}

impl SurveyApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: SurveyView::default(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.view.status);
    }

    fn show_survey_card(&mut self, ui: &mut egui::Ui) {
        widgets::card_frame(24).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("Cafeteria Satisfaction Survey")
                        .strong()
                        .size(26.0),
                );
                ui.weak("Please rate your overall satisfaction with today’s meals.");
                ui.add_space(18.0);

                let mut hovered = None;
                let mut clicked = None;
                let row_width = f32::from(MAX_RATING) * (STAR_SIZE + ui.spacing().item_spacing.x);
                ui.allocate_ui(egui::vec2(row_width, STAR_SIZE), |ui| {
                    ui.horizontal(|ui| {
                        for star in Rating::ALL {
                            let response = widgets::star_button(ui, self.view.star_lit(star), STAR_SIZE);
                            if response.hovered() {
                                hovered = Some(star);
                            }
                            if response.clicked() {
                                clicked = Some(star);
                            }
                        }
                    });
                });
                self.view.hover = hovered;
                if let Some(star) = clicked {
                    self.queue(BackendCommand::SelectRating(star));
                }

                ui.add_space(18.0);
                let enabled = self.view.submit_enabled();
                let fill = if enabled { ACCENT } else { DISABLED };
                let button = egui::Button::new(
                    egui::RichText::new(self.view.submit_label())
                        .color(egui::Color32::WHITE)
                        .strong()
                        .size(17.0),
                )
                .fill(fill)
                .corner_radius(12.0)
                .min_size(egui::vec2(ui.available_width() * 0.66, 46.0));
                if ui.add_enabled(enabled, button).clicked() {
                    self.queue(BackendCommand::SubmitRating);
                }
            });
        });
    }

    fn show_overall_card(&self, ui: &mut egui::Ui) {
        let aggregate = self.view.session.aggregate;
        widgets::card_frame(18).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new("Overall result").small().weak());
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(aggregate.mean_label())
                                .strong()
                                .size(26.0)
                                .color(ACCENT),
                        );
                        ui.label(egui::RichText::new(format!("/ {MAX_RATING}.00")).color(ACCENT));
                    });
                    ui.weak(aggregate.votes_line());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            for position in 1..=MAX_RATING {
                                widgets::star_icon(
                                    ui,
                                    aggregate.star_filled(position),
                                    SUMMARY_STAR_SIZE,
                                );
                            }
                        });
                        ui.label(
                            egui::RichText::new("Updated after every submission")
                                .small()
                                .weak(),
                        );
                    });
                });
            });
        });
    }

    fn show_confirmation(&self, ctx: &egui::Context) {
        let Some(rating) = self.view.confirmation() else {
            return;
        };

        egui::Window::new("submission_confirmation")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(widgets::card_frame(24))
            .show(ctx, |ui| {
                ui.set_max_width(260.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("✔")
                            .size(30.0)
                            .color(egui::Color32::from_rgb(34, 197, 94)),
                    );
                    ui.label(
                        egui::RichText::new("Thank you for your feedback!")
                            .strong()
                            .size(18.0),
                    );
                    ui.label(rating.confirmation_label());
                    ui.weak("Your rating helps us improve the quality of the school kitchen.");
                });
            });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        if !self.view.status.is_empty() {
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::from_rgb(175, 96, 96), &self.view.status);
        }
    }
}

impl eframe::App for SurveyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(255, 247, 237)))
            .show(ctx, |ui| {
                let avail = ui.available_size();
                ui.add_space((avail.y * 0.08).clamp(12.0, 60.0));
                ui.vertical_centered(|ui| {
                    ui.set_max_width(avail.x.min(CARD_MAX_WIDTH));
                    self.show_survey_card(ui);
                    ui.add_space(20.0);
                    self.show_overall_card(ui);
                    self.show_status(ui);
                });
            });

        self.show_confirmation(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
