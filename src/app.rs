//! eframe application: owns the controller and the enabled views, lays them
//! out, and handles File→Open.

use crate::controller::{LoadState, PlateController};
use crate::info_box::InfoBox;
use crate::render_chart::RenderChart;
use crate::render_details::RenderDetails;
use crate::render_grid::RenderGrid;
use crate::viewer_config::ViewerConfig;
use anyhow::Result;
use eframe::egui::{self, Ui, menu};
use std::sync::{Arc, RwLock};

pub struct QpcrApp {
    config: ViewerConfig,
    controller: Arc<RwLock<PlateController>>,
    chart: Option<RenderChart>,
    grid: Option<RenderGrid>,
    details: Option<RenderDetails>,
}

impl QpcrApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let controller = Arc::new(RwLock::new(PlateController::from_config(&config)?));
        let mut app = Self {
            config,
            controller,
            chart: None,
            grid: None,
            details: None,
        };
        app.load_and_build();
        Ok(app)
    }

    /// One load attempt. Views are constructed only once the controller is
    /// `Ready`; a failed load leaves them absent and the failure visible.
    fn load_and_build(&mut self) {
        let source = self.config.data_source.clone();
        // the controller logs the failure; it surfaces here as the Failed state
        let _ = self
            .controller
            .write()
            .expect("controller lock poisoned")
            .load(&source);
        if !self
            .controller
            .read()
            .expect("controller lock poisoned")
            .state()
            .is_ready()
        {
            return;
        }

        if let Some(chart_options) = self.config.chart.clone() {
            let info = self.config.info.then(|| {
                InfoBox::chart_info(self.config.threshold.is_some(), self.config.grid.is_some())
            });
            self.chart = Some(RenderChart::new(
                self.controller.clone(),
                chart_options,
                self.config.threshold_color,
                info,
            ));
        }
        if let Some(grid_options) = self.config.grid.clone() {
            let info = self.config.info.then(|| {
                InfoBox::grid_info(
                    self.config.chart.is_some(),
                    self.config.details,
                    self.config.threshold.is_some(),
                )
            });
            self.grid = Some(RenderGrid::new(
                self.controller.clone(),
                grid_options,
                info,
            ));
        }
        if self.config.details {
            self.details = Some(RenderDetails::new(self.controller.clone()));
        }
    }

    /// There is no retry policy on a controller; opening a dataset builds a
    /// fresh one.
    fn open_data_source(&mut self, source: String) {
        self.config.data_source = source;
        match PlateController::from_config(&self.config) {
            Ok(controller) => {
                self.controller = Arc::new(RwLock::new(controller));
                self.chart = None;
                self.grid = None;
                self.details = None;
                self.load_and_build();
            }
            Err(err) => log::error!("rebuilding controller: {err}"),
        }
    }

    pub fn render_menu_bar(&mut self, ui: &mut Ui) {
        menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open…").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_file() {
                        self.open_data_source(path.display().to_string());
                    }
                }
            });
        });
    }
}

impl eframe::App for QpcrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        // take what the panel needs, then release the lock: the grid view
        // write-locks the controller during hover dispatch
        let failure = {
            let guard = self.controller.read().expect("controller lock poisoned");
            match guard.state() {
                LoadState::Ready(_) => None,
                LoadState::Failed(err) => Some(err.clone()),
                LoadState::Uninitialized | LoadState::Loading => Some(String::new()),
            }
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            match failure {
                None => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if let Some(chart) = &mut self.chart {
                            chart.render(ui);
                            ui.separator();
                        }
                        if let Some(grid) = &mut self.grid {
                            grid.render(ui);
                            ui.separator();
                        }
                        if let Some(details) = &mut self.details {
                            details.render(ui);
                        }
                    });
                }
                Some(err) if err.is_empty() => {
                    ui.label("Loading dataset…");
                }
                Some(err) => {
                    ui.heading("Dataset failed to load");
                    ui.label(err);
                }
            }
        });
    }
}
