use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::style::TypeTag;

pub const DEFAULT_RELATION: &str = "related";

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub type_tag: TypeTag,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pinned: bool,
    pub dimmed: bool,
    pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub source: usize,
    pub target: usize,
    pub relation: String,
    pub weight: f32,
    pub dimmed: bool,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

/// Canonical graph: unique node ids, every edge resolved to existing nodes.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

/// Result of normalizing a payload.
#[derive(Clone, Debug)]
pub enum Normalized {
    Graph(Graph),
    Empty,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_graph(self) -> Option<Graph> {
        match self {
            Self::Graph(graph) => Some(graph),
            Self::Empty => None,
        }
    }
}

impl Graph {
    pub(super) fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        index_by_id: HashMap<String, usize>,
    ) -> Self {
        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let index = self.index_of(id)?;
        self.nodes.get_mut(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }
}
