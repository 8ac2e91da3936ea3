use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(4.0);

        let Some(focus) = self.engine.focus().map(str::to_owned) else {
            ui.label("No node selected.");
            return;
        };

        let Some(node) = self.engine.graph().and_then(|graph| graph.node(&focus)) else {
            ui.label("Selected node is no longer in the graph.");
            return;
        };

        let style = self.engine.styles().style(node.type_tag);
        ui.label(RichText::new(&node.label).strong().color(style.color));
        ui.label(format!("id: {}", node.id));
        ui.label(format!("type: {}", node.type_tag));
        ui.label(format!("position: ({:.1}, {:.1})", node.position.x, node.position.y));
        if node.pinned {
            ui.label("pinned");
        }

        let pinned = node.pinned;
        let mut unpin = false;
        let mut next_focus = None;

        ui.add_space(8.0);
        ui.separator();
        ui.label("Relationships");
        egui::ScrollArea::vertical().show(ui, |ui| {
            let Some(graph) = self.engine.graph() else {
                return;
            };
            for edge in graph.edges().iter().filter(|edge| !edge.dimmed) {
                let other = if edge.source_id == focus {
                    &edge.target_id
                } else {
                    &edge.source_id
                };
                let other_label = graph.node(other).map_or(other.as_str(), |node| node.label.as_str());
                let arrow = if edge.source_id == focus { "→" } else { "←" };
                let text = format!("{arrow} {} {other_label} ({:.2})", edge.relation, edge.weight);
                if ui.link(text).clicked() {
                    next_focus = Some(other.clone());
                }
            }
        });

        if pinned {
            ui.add_space(8.0);
            unpin = ui.button("Unpin").clicked();
        }

        if unpin {
            self.engine.release(&focus);
        }
        if let Some(next_focus) = next_focus {
            self.engine.highlight_neighborhood(Some(&next_focus));
        }
    }
}
