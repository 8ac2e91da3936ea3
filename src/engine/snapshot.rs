use eframe::egui::Color32;
use serde::{Serialize, Serializer};

use super::physics::SimulationState;
use crate::payload::Graph;
use crate::style::{StyleTable, TypeTag};

fn hex_color<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!(
        "#{:02x}{:02x}{:02x}",
        color.r(),
        color.g(),
        color.b()
    ))
}

fn type_label<S: Serializer>(tag: &TypeTag, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tag.label())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", serialize_with = "type_label")]
    pub type_tag: TypeTag,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(serialize_with = "hex_color")]
    pub color: Color32,
    pub dimmed: bool,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub source_id: String,
    pub target_id: String,
    pub source_x: f32,
    pub source_y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub label: String,
    pub weight: f32,
    pub dimmed: bool,
}

/// Read-only view of one frame, handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub generation: u64,
    pub tick: u64,
    pub alpha: f32,
    pub converged: bool,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub(super) fn capture(
        graph: &Graph,
        styles: &StyleTable,
        state: SimulationState,
        converged: bool,
        generation: u64,
    ) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeSnapshot {
                id: node.id.clone(),
                label: node.label.clone(),
                type_tag: node.type_tag,
                x: node.position.x,
                y: node.position.y,
                radius: node.radius,
                color: styles.color(node.type_tag),
                dimmed: node.dimmed,
                pinned: node.pinned,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let source = graph.nodes()[edge.source].position;
                let target = graph.nodes()[edge.target].position;
                EdgeSnapshot {
                    source_id: edge.source_id.clone(),
                    target_id: edge.target_id.clone(),
                    source_x: source.x,
                    source_y: source.y,
                    target_x: target.x,
                    target_y: target.y,
                    label: edge.relation.clone(),
                    weight: edge.weight,
                    dimmed: edge.dimmed,
                }
            })
            .collect();

        Self {
            generation,
            tick: state.tick_count,
            alpha: state.alpha,
            converged,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
