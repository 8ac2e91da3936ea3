use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Ui, Vec2};
use entity_graph_layout::LayoutEngine;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(engine: LayoutEngine, generation: u64) -> Self {
        let center = engine.config().center;
        Self {
            engine,
            generation,
            pan: -Vec2::new(center[0], center[1]),
            zoom: 1.0,
            live_physics: true,
            show_labels: true,
            dragging: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        payload_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("entity graph");
                    ui.separator();
                    ui.label(format!("payload: {}", payload_path.display()));
                    if let Some(graph) = self.engine.graph() {
                        ui.label(format!("nodes: {}", graph.node_count()));
                        ui.label(format!("edges: {}", graph.edge_count()));
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload payload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        let center = self.engine.config().center;
                        self.pan = -Vec2::new(center[0], center[1]);
                        self.zoom = 1.0;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(state) = self.engine.simulation_state() {
                            ui.label(format!("alpha {:.4} | tick {}", state.alpha, state.tick_count));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);
        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Advance the layout every frame until it converges.");
        ui.checkbox(&mut self.show_labels, "Show labels");

        ui.add_space(8.0);
        if ui
            .button("Release pinned nodes")
            .on_hover_text("Unpin nodes fixed with shift-drag.")
            .clicked()
        {
            self.engine.release_all();
        }
        if ui.button("Clear highlight").clicked() {
            self.engine.highlight_neighborhood(None);
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label("Drag a node to move it. Hold shift when releasing to keep it pinned.");
        ui.label("Click a node to highlight its neighbors; click empty space to clear.");
        ui.label("Right or middle drag pans, scroll zooms.");
    }
}
