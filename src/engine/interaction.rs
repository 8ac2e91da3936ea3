use eframe::egui::Vec2;
use tracing::trace;

use super::adjacency::AdjacencyIndex;
use super::physics::Simulation;
use crate::payload::Graph;

/// Drag-to-pin and neighborhood highlighting for one graph.
///
/// Only `pinned`/`dimmed` flags and the simulation temperature are touched; the
/// node and edge sets never change.
#[derive(Debug, Default)]
pub struct InteractionController {
    adjacency: AdjacencyIndex,
    dragging: Option<String>,
    focus: Option<String>,
}

impl InteractionController {
    pub fn new(graph: &Graph) -> Self {
        Self {
            adjacency: AdjacencyIndex::build(graph),
            dragging: None,
            focus: None,
        }
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn begin_drag(&mut self, graph: &mut Graph, simulation: &mut Simulation, id: &str) -> bool {
        if !graph.contains(id) {
            return false;
        }

        if let Some(previous) = self.dragging.take()
            && previous != id
            && let Some(node) = graph.node_mut(&previous)
        {
            node.pinned = false;
        }

        let Some(node) = graph.node_mut(id) else {
            return false;
        };
        node.pinned = true;
        node.velocity = Vec2::ZERO;
        self.dragging = Some(id.to_owned());

        let drag_alpha = simulation.drag_alpha();
        simulation.reheat(drag_alpha, drag_alpha);
        trace!(id, alpha = simulation.alpha(), "drag started");
        true
    }

    /// Moves a pinned node straight to `position`, bypassing integration.
    pub fn update_drag(&mut self, graph: &mut Graph, id: &str, position: Vec2) -> bool {
        if !position.is_finite() {
            return false;
        }

        match graph.node_mut(id) {
            Some(node) if node.pinned => {
                node.position = position;
                node.velocity = Vec2::ZERO;
                true
            }
            _ => false,
        }
    }

    /// Unpins the node unless `sticky`, then lets the temperature decay again.
    ///
    /// Ignored unless `id` is the node currently being dragged.
    pub fn end_drag(
        &mut self,
        graph: &mut Graph,
        simulation: &mut Simulation,
        id: &str,
        sticky: bool,
    ) -> bool {
        if self.dragging.as_deref() != Some(id) {
            return false;
        }
        let Some(node) = graph.node_mut(id) else {
            return false;
        };
        if !sticky {
            node.pinned = false;
        }

        self.dragging = None;
        simulation.cool();
        trace!(id, sticky, "drag ended");
        true
    }

    /// Clears a sticky pin. A node in the middle of a drag stays pinned.
    pub fn release(&mut self, graph: &mut Graph, id: &str) -> bool {
        if self.dragging.as_deref() == Some(id) {
            return false;
        }

        match graph.node_mut(id) {
            Some(node) if node.pinned => {
                node.pinned = false;
                true
            }
            _ => false,
        }
    }

    pub fn release_all(&mut self, graph: &mut Graph) {
        let dragging = self.dragging.as_deref();
        for node in &mut graph.nodes {
            if Some(node.id.as_str()) != dragging {
                node.pinned = false;
            }
        }
    }

    /// Dims everything outside the closed 1-hop neighborhood of `id`.
    ///
    /// `None` or an unknown id clears all dimming; the return value says whether a
    /// neighborhood is now highlighted.
    pub fn highlight_neighborhood(&mut self, graph: &mut Graph, id: Option<&str>) -> bool {
        let neighborhood = id.and_then(|id| self.adjacency.closed_neighborhood(id));
        let (Some(focus), Some(neighborhood)) = (id, neighborhood) else {
            self.focus = None;
            for node in &mut graph.nodes {
                node.dimmed = false;
            }
            for edge in &mut graph.edges {
                edge.dimmed = false;
            }
            return false;
        };

        let Some(focus_index) = graph.index_of(focus) else {
            return false;
        };

        for node in &mut graph.nodes {
            node.dimmed = !neighborhood.contains(node.id.as_str());
        }
        for edge in &mut graph.edges {
            edge.dimmed = !edge.touches(focus_index);
        }
        self.focus = Some(focus.to_owned());
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use serde_json::json;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::payload::normalize;
    use crate::style::StyleTable;

    fn setup() -> (Graph, Simulation, InteractionController) {
        let mut graph = normalize(
            &json!({
                "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}, {"id": "D"}],
                "links": [{"source": "A", "target": "B"}, {"source": "B", "target": "C"}]
            }),
            &StyleTable::default(),
        )
        .unwrap()
        .into_graph()
        .unwrap();
        let simulation = Simulation::new(&LayoutConfig::default());
        simulation.seed_positions(&mut graph);
        let controller = InteractionController::new(&graph);
        (graph, simulation, controller)
    }

    fn dimmed(graph: &Graph, id: &str) -> bool {
        graph.node(id).unwrap().dimmed
    }

    #[test]
    fn begin_drag_pins_and_reheats() {
        let (mut graph, mut simulation, mut controller) = setup();
        while !simulation.tick(&mut graph) {}

        assert!(controller.begin_drag(&mut graph, &mut simulation, "B"));
        assert!(graph.node("B").unwrap().pinned);
        assert_eq!(controller.dragging(), Some("B"));
        assert!(simulation.alpha() >= 0.3 - 1e-6);
        assert!(!simulation.is_converged());
    }

    #[test]
    fn update_drag_requires_pin() {
        let (mut graph, _simulation, mut controller) = setup();
        assert!(!controller.update_drag(&mut graph, "A", vec2(1.0, 1.0)));
        assert!(!controller.update_drag(&mut graph, "missing", vec2(1.0, 1.0)));
    }

    #[test]
    fn sticky_end_keeps_pin_until_release() {
        let (mut graph, mut simulation, mut controller) = setup();
        controller.begin_drag(&mut graph, &mut simulation, "A");
        controller.update_drag(&mut graph, "A", vec2(-80.0, 10.0));
        controller.end_drag(&mut graph, &mut simulation, "A", true);

        assert!(graph.node("A").unwrap().pinned);
        assert_eq!(controller.dragging(), None);
        for _ in 0..20 {
            simulation.tick(&mut graph);
        }
        assert_eq!(graph.node("A").unwrap().position, vec2(-80.0, 10.0));

        assert!(controller.release(&mut graph, "A"));
        assert!(!graph.node("A").unwrap().pinned);
    }

    #[test]
    fn non_sticky_end_unpins_and_cools() {
        let (mut graph, mut simulation, mut controller) = setup();
        controller.begin_drag(&mut graph, &mut simulation, "C");
        controller.end_drag(&mut graph, &mut simulation, "C", false);

        assert!(!graph.node("C").unwrap().pinned);
        assert_eq!(simulation.state().alpha_target, 0.0);
    }

    #[test]
    fn ending_a_drag_on_another_node_is_ignored() {
        let (mut graph, mut simulation, mut controller) = setup();
        controller.begin_drag(&mut graph, &mut simulation, "A");
        controller.end_drag(&mut graph, &mut simulation, "A", true);
        controller.begin_drag(&mut graph, &mut simulation, "B");
        controller.update_drag(&mut graph, "B", vec2(50.0, 50.0));

        assert!(!controller.end_drag(&mut graph, &mut simulation, "A", false));
        assert!(graph.node("A").unwrap().pinned);
        assert_eq!(controller.dragging(), Some("B"));
        assert!(simulation.state().alpha_target > 0.0);

        for _ in 0..400 {
            simulation.tick(&mut graph);
        }
        assert!(!simulation.is_converged());
        assert_eq!(graph.node("B").unwrap().position, vec2(50.0, 50.0));
    }

    #[test]
    fn end_drag_without_drag_does_nothing() {
        let (mut graph, mut simulation, mut controller) = setup();
        assert!(!controller.end_drag(&mut graph, &mut simulation, "C", false));
        assert!(!controller.end_drag(&mut graph, &mut simulation, "missing", false));
    }

    #[test]
    fn starting_a_new_drag_releases_the_previous_one() {
        let (mut graph, mut simulation, mut controller) = setup();
        controller.begin_drag(&mut graph, &mut simulation, "A");
        controller.begin_drag(&mut graph, &mut simulation, "B");
        assert!(!graph.node("A").unwrap().pinned);
        assert!(graph.node("B").unwrap().pinned);
    }

    #[test]
    fn release_all_spares_active_drag() {
        let (mut graph, mut simulation, mut controller) = setup();
        controller.begin_drag(&mut graph, &mut simulation, "A");
        controller.end_drag(&mut graph, &mut simulation, "A", true);
        controller.begin_drag(&mut graph, &mut simulation, "D");

        controller.release_all(&mut graph);
        assert!(!graph.node("A").unwrap().pinned);
        assert!(graph.node("D").unwrap().pinned);
        assert!(!controller.release(&mut graph, "D"));
    }

    #[test]
    fn highlight_dims_outside_neighborhood() {
        let (mut graph, _simulation, mut controller) = setup();
        assert!(controller.highlight_neighborhood(&mut graph, Some("A")));

        assert!(!dimmed(&graph, "A"));
        assert!(!dimmed(&graph, "B"));
        assert!(dimmed(&graph, "C"));
        assert!(dimmed(&graph, "D"));
        assert!(!graph.edges()[0].dimmed);
        assert!(graph.edges()[1].dimmed);
        assert_eq!(controller.focus(), Some("A"));
    }

    #[test]
    fn unknown_highlight_clears() {
        let (mut graph, _simulation, mut controller) = setup();
        controller.highlight_neighborhood(&mut graph, Some("D"));
        assert!(dimmed(&graph, "A"));

        assert!(!controller.highlight_neighborhood(&mut graph, Some("nope")));
        assert!(graph.nodes().iter().all(|node| !node.dimmed));
        assert!(graph.edges().iter().all(|edge| !edge.dimmed));
        assert_eq!(controller.focus(), None);
    }
}
