use eframe::egui::{self, PointerButton, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Maps primary-button drags onto the engine's drag operations.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<&str>,
    ) {
        if response.drag_started_by(PointerButton::Primary)
            && let Some(id) = hovered
            && self.engine.begin_drag(id)
        {
            self.dragging = Some(id.to_owned());
        }

        let Some(id) = self.dragging.clone() else {
            return;
        };

        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            self.engine.update_drag(&id, world);
        }

        if response.drag_stopped_by(PointerButton::Primary) || !response.dragged() {
            let sticky = ui.input(|input| input.modifiers.shift);
            self.engine.end_drag(&id, sticky);
            self.dragging = None;
        }
    }

    pub(in crate::app) fn handle_node_click(&mut self, response: &egui::Response, hovered: Option<&str>) {
        if response.clicked_by(PointerButton::Primary) {
            self.engine.highlight_neighborhood(hovered);
        }
    }

    pub(in crate::app) fn hovered_index(
        pointer: Option<Pos2>,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = pointer?;
        screen_positions
            .iter()
            .zip(screen_radii)
            .enumerate()
            .filter_map(|(index, (position, radius))| {
                let distance = position.distance(pointer);
                (distance <= radius.max(4.0)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
