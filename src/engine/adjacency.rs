use std::collections::{HashMap, HashSet};

use crate::payload::Graph;

/// Undirected neighbor sets keyed by node id.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    neighbors: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
    pub fn build(graph: &Graph) -> Self {
        let mut neighbors = graph
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), HashSet::new()))
            .collect::<HashMap<_, _>>();

        for edge in graph.edges() {
            if let Some(set) = neighbors.get_mut(&edge.source_id) {
                set.insert(edge.target_id.clone());
            }
            if let Some(set) = neighbors.get_mut(&edge.target_id) {
                set.insert(edge.source_id.clone());
            }
        }

        Self { neighbors }
    }

    pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
        self.neighbors.get(id)
    }

    pub fn degree(&self, id: &str) -> usize {
        self.neighbors.get(id).map_or(0, HashSet::len)
    }

    /// `id` together with its direct neighbors, or `None` for an unknown id.
    pub fn closed_neighborhood<'a>(&'a self, id: &'a str) -> Option<HashSet<&'a str>> {
        let neighbors = self.neighbors.get(id)?;
        let mut closed = neighbors.iter().map(String::as_str).collect::<HashSet<_>>();
        closed.insert(id);
        Some(closed)
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payload::normalize;
    use crate::style::StyleTable;

    fn index(value: serde_json::Value) -> AdjacencyIndex {
        let graph = normalize(&value, &StyleTable::default())
            .unwrap()
            .into_graph()
            .unwrap();
        AdjacencyIndex::build(&graph)
    }

    #[test]
    fn neighbors_are_undirected() {
        let index = index(json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "links": [{"source": "a", "target": "b"}, {"source": "c", "target": "b"}]
        }));

        assert_eq!(index.degree("b"), 2);
        assert!(index.neighbors("a").unwrap().contains("b"));
        assert!(index.neighbors("c").unwrap().contains("b"));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn isolated_nodes_have_empty_sets() {
        let index = index(json!({"nodes": [{"id": "lonely"}]}));
        assert_eq!(index.degree("lonely"), 0);
        assert_eq!(
            index.closed_neighborhood("lonely").unwrap(),
            HashSet::from(["lonely"])
        );
    }

    #[test]
    fn closed_neighborhood_includes_the_focus() {
        let index = index(json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
            "links": [{"source": "a", "target": "b"}, {"source": "b", "target": "c"}]
        }));
        let focus = String::from("b");

        let closed = index.closed_neighborhood(&focus).unwrap();
        assert_eq!(closed, HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn unknown_ids_have_no_neighborhood() {
        let index = index(json!({"nodes": [{"id": "a"}]}));
        assert!(index.closed_neighborhood("zzz").is_none());
        assert_eq!(index.degree("zzz"), 0);
    }

    #[test]
    fn parallel_edges_collapse() {
        let index = index(json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "links": [
                {"source": "a", "target": "b", "label": "x"},
                {"source": "b", "target": "a", "label": "y"}
            ]
        }));
        assert_eq!(index.degree("a"), 1);
    }
}
