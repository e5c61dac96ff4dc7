use chrono::{DateTime, Local};
use eframe::{App, egui};
use sdc_core::{ConversionRequest, ConversionWorker, ConvertOpts, Format};
use std::path::PathBuf;
use std::time::Duration;

const MISSING_PATHS_MSG: &str = "Error: Input and output files must be selected";

#[derive(Default)]
struct State {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    status: String,
    last_done: Option<DateTime<Local>>,
}

struct AppGui {
    state: State,
    worker: ConversionWorker,
}

impl AppGui {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: State::default(),
            worker: ConversionWorker::new(ConvertOpts::default()),
        }
    }

    fn pick_input(&mut self) {
        if let Some(p) = file_dialog().pick_file() {
            self.state.status = format!("Input: {}", p.display());
            self.state.input = Some(p);
        }
    }

    fn pick_output(&mut self) {
        if let Some(p) = file_dialog().save_file() {
            self.state.status = format!("Output: {}", p.display());
            self.state.output = Some(p);
        }
    }

    fn start_conversion(&mut self, ctx: &egui::Context) {
        let (Some(input), Some(output)) = (self.state.input.clone(), self.state.output.clone())
        else {
            self.state.status = MISSING_PATHS_MSG.into();
            return;
        };
        let req = match ConversionRequest::new(input, output) {
            Ok(r) => r,
            Err(e) => {
                self.state.status = format!("Error: {}", e);
                return;
            }
        };
        let repaint = ctx.clone();
        match self.worker.submit_with(req, move || repaint.request_repaint()) {
            Ok(()) => self.state.status = "Converting...".into(),
            Err(e) => self.state.status = format!("Error: {}", e),
        }
    }

    fn collect_result(&mut self) {
        if let Some(result) = self.worker.poll() {
            if let Err(e) = &result {
                tracing::warn!("conversion failed: {}", e);
            }
            self.state.status = sdc_core::status_line(&result);
            self.state.last_done = Some(Local::now());
        }
    }
}

impl App for AppGui {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.collect_result();
        let busy = self.worker.is_busy();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Document converter");
            ui.label("JSON, YAML and XML; the format follows the file extension.");
            ui.separator();
            egui::Grid::new("paths").num_columns(2).show(ui, |ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("Select input file"))
                    .clicked()
                {
                    self.pick_input();
                }
                ui.label(path_label(&self.state.input));
                ui.end_row();
                if ui
                    .add_enabled(!busy, egui::Button::new("Select output file"))
                    .clicked()
                {
                    self.pick_output();
                }
                ui.label(path_label(&self.state.output));
                ui.end_row();
            });
            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("Convert"))
                    .clicked()
                {
                    self.start_conversion(ctx);
                }
                if busy {
                    ui.spinner();
                }
            });
            ui.separator();
            ui.label(&self.state.status);
            if let Some(time) = self.state.last_done {
                ui.label(format!("Last conversion: {}", time.format("%Y-%m-%d %H:%M:%S")));
            }
        });

        if self.worker.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

fn file_dialog() -> rfd::FileDialog {
    let exts: Vec<&str> = Format::ALL
        .iter()
        .flat_map(|f| f.extensions().iter().copied())
        .collect();
    rfd::FileDialog::new()
        .set_directory(".")
        .add_filter("Structured documents", exts.as_slice())
}

fn path_label(p: &Option<PathBuf>) -> String {
    p.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".into())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();
    let native_options = eframe::NativeOptions {
        viewport: egui::viewport::ViewportBuilder::default()
            .with_inner_size([560.0, 300.0])
            .with_min_inner_size([420.0, 240.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Document Converter",
        native_options,
        Box::new(|cc| Ok(Box::new(AppGui::new(cc)))),
    )
}
