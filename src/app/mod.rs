use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use entity_graph_layout::{LayoutConfig, LayoutEngine, LoadOutcome};
use serde_json::Value;
use tracing::{error, info};

use crate::read_payload;

mod graph;
mod render_utils;
mod ui;

pub struct GraphViewerApp {
    payload_path: PathBuf,
    config: LayoutConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<Value, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Value, String>>,
    },
    Ready(Box<ViewModel>),
    Empty,
    Error(String),
}

struct ViewModel {
    engine: LayoutEngine,
    generation: u64,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    show_labels: bool,
    dragging: Option<String>,
}

impl GraphViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, payload_path: PathBuf, config: LayoutConfig) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(payload_path.clone()),
        };
        Self {
            payload_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(payload_path: PathBuf) -> Receiver<Result<Value, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = read_payload(&payload_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn state_for(&self, result: Result<Value, String>) -> AppState {
        let payload = match result {
            Ok(payload) => payload,
            Err(message) => {
                error!(%message, "failed to read graph payload");
                return AppState::Error(message);
            }
        };

        let mut engine = LayoutEngine::new(self.config.clone());
        match engine.load(&payload) {
            Ok(LoadOutcome::Loaded { generation, .. }) => {
                AppState::Ready(Box::new(ViewModel::new(engine, generation)))
            }
            Ok(LoadOutcome::Empty) => AppState::Empty,
            Err(error) => AppState::Error(error.to_string()),
        }
    }
}

impl eframe::App for GraphViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph payload...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Empty | AppState::Error(_) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    match &self.state {
                        AppState::Error(message) => {
                            ui.heading("Failed to load graph");
                            ui.add_space(6.0);
                            ui.label(message.as_str());
                        }
                        _ => {
                            ui.heading("No data");
                            ui.add_space(6.0);
                            ui.label("The payload contains no entities or relationships.");
                        }
                    }
                    ui.add_space(10.0);
                    retry = ui.button("Reload").clicked();
                });
                if retry {
                    self.state = AppState::Loading {
                        rx: Self::spawn_load(self.payload_path.clone()),
                    };
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.payload_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.payload_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            model.engine.teardown();
                            transition = Some(result);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.state_for(result);
            if let AppState::Ready(model) = &self.state {
                info!(generation = model.generation, "viewer showing graph");
            }
        }
    }
}
