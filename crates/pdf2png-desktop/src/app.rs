//! The converter window.

use crate::dropped;
use crate::state::StatusModel;
use eframe::egui;
use encoding_rs::Encoding;
use pdf2png::{ConversionWorker, SubmitOutcome, POLL_INTERVAL};
use std::path::PathBuf;
use tracing::{info, warn};

const DROP_ZONE_HEIGHT: f32 = 150.0;

pub struct ConverterApp {
    worker: ConversionWorker,
    status: StatusModel,
    path_input: String,
    legacy_encoding: &'static Encoding,
}

impl ConverterApp {
    /// `initial` is submitted right away, as if it had been dropped.
    pub fn new(worker: ConversionWorker, initial: Option<PathBuf>) -> Self {
        let mut app = Self {
            worker,
            status: StatusModel::default(),
            path_input: String::new(),
            legacy_encoding: dropped::legacy_encoding(),
        };
        if let Some(path) = initial {
            app.path_input = path.display().to_string();
            app.submit(path);
        }
        app
    }

    fn submit(&mut self, path: PathBuf) {
        // A busy worker drops the request; nothing to show.
        if self.worker.submit(path) == SubmitOutcome::Accepted {
            self.poll_worker();
        }
    }

    fn poll_worker(&mut self) {
        for message in self.worker.drain() {
            self.status.apply(message);
        }
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        if files.is_empty() {
            return;
        }
        match dropped::first_path(&files) {
            Some(path) => {
                info!("Dropped {}", dropped::display_name(&path, self.legacy_encoding));
                self.submit(path);
            }
            None => warn!("Dropped item carried no usable path"),
        }
    }

    fn drop_zone(&self, ui: &mut egui::Ui, hovering: bool) {
        let stroke_color = if hovering {
            ui.visuals().selection.stroke.color
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(ui.available_width(), DROP_ZONE_HEIGHT));
                ui.vertical_centered(|ui| {
                    ui.add_space(DROP_ZONE_HEIGHT / 2.0 - 30.0);
                    ui.label(egui::RichText::new("Drop a PDF file here").size(18.0));
                    ui.label(egui::RichText::new("📄").size(28.0));
                });
            });
    }

    fn path_entry(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("…or type the path of a PDF")
                    .desired_width(ui.available_width() - 80.0),
            );
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(!self.status.is_working(), egui::Button::new("Convert"))
                .clicked();

            let input = self.path_input.trim();
            if (entered || clicked) && !input.is_empty() {
                let path = PathBuf::from(input);
                self.submit(path);
            }
        });
    }

    fn result_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.status.dialog() else {
            return;
        };

        let mut close = false;
        egui::Window::new(dialog.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(dialog.body.as_str());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            });

        if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.status.dismiss();
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.handle_drops(ctx);
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("PDF → PNG");
            ui.add_space(8.0);

            self.drop_zone(ui, hovering);
            ui.add_space(8.0);
            self.path_entry(ui);
            ui.add_space(12.0);

            ui.label(self.status.status_text());
            ui.add(egui::ProgressBar::new(self.status.progress()).show_percentage());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.strong("Output:");
                ui.label(self.worker.output_dir().display().to_string());
            });
        });

        self.result_dialog(ctx);

        // The worker cannot wake the UI; poll it.
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
