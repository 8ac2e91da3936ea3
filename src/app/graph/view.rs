use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{
    circle_visible, dim_color, draw_background, edge_width, world_to_screen,
};

const DIM_FACTOR: f32 = 0.28;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let moving = if self.live_physics {
            !self.engine.tick_for(self.generation)
        } else {
            false
        };

        let Some(snapshot) = self.engine.snapshot() else {
            ui.label("No graph loaded.");
            return;
        };

        let screen_positions = snapshot
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, self.pan, self.zoom, vec2(node.x, node.y)))
            .collect::<Vec<_>>();
        let screen_radii = snapshot
            .nodes
            .iter()
            .map(|node| (node.radius * self.zoom.powf(0.6)).clamp(2.5, 40.0))
            .collect::<Vec<_>>();

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = Self::hovered_index(pointer, &screen_positions, &screen_radii)
            .map(|index| snapshot.nodes[index].id.clone());

        self.handle_node_drag(ui, rect, &response, hovered.as_deref());
        self.handle_node_click(&response, hovered.as_deref());

        for edge in &snapshot.edges {
            let start = world_to_screen(rect, self.pan, self.zoom, vec2(edge.source_x, edge.source_y));
            let end = world_to_screen(rect, self.pan, self.zoom, vec2(edge.target_x, edge.target_y));
            let base = Color32::from_rgba_unmultiplied(150, 165, 180, 150);
            let color = if edge.dimmed {
                dim_color(base, DIM_FACTOR)
            } else {
                base
            };
            painter.line_segment([start, end], Stroke::new(edge_width(edge.weight, self.zoom), color));

            if self.show_labels && !edge.dimmed && self.engine.focus().is_some() {
                painter.text(
                    start + (end - start) * 0.5,
                    Align2::CENTER_CENTER,
                    &edge.label,
                    FontId::proportional(11.0),
                    Color32::from_rgb(200, 205, 215),
                );
            }
        }

        for ((node, &position), &radius) in snapshot
            .nodes
            .iter()
            .zip(&screen_positions)
            .zip(&screen_radii)
        {
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let color = if node.dimmed {
                dim_color(node.color, DIM_FACTOR)
            } else {
                node.color
            };
            painter.circle_filled(position, radius, color);

            let is_hovered = hovered.as_deref() == Some(node.id.as_str());
            if node.pinned || is_hovered {
                painter.circle_stroke(position, radius + 2.0, Stroke::new(1.5, Color32::WHITE));
            }

            if self.show_labels && !node.dimmed {
                painter.text(
                    position + vec2(0.0, radius + 3.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(12.0),
                    Color32::from_rgb(225, 228, 235),
                );
            }
        }

        if moving || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }
    }
}
