use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;
use serde_json::Value;
use tracing::{debug, warn};

use super::graph::{DEFAULT_RELATION, Edge, Graph, Node, Normalized};
use super::parse::{Payload, RawLink, Schema, endpoint_id};
use crate::error::GraphError;
use crate::style::{StyleTable, TypeTag};

pub fn normalize(value: &Value, styles: &StyleTable) -> Result<Normalized, GraphError> {
    let Some(payload) = Payload::from_value(value) else {
        warn!("graph payload matches neither nodes/links nor entities/relationships");
        return Ok(Normalized::Empty);
    };
    normalize_payload(payload, styles)
}

pub fn normalize_str(raw: &str, styles: &StyleTable) -> Result<Normalized, GraphError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize(&value, styles),
        Err(error) => {
            warn!(%error, "graph payload is not valid JSON");
            Ok(Normalized::Empty)
        }
    }
}

fn synthesized_id(type_tag: TypeTag, index: usize) -> String {
    format!("{}-{index}", type_tag.label().to_ascii_lowercase())
}

pub fn normalize_payload(payload: Payload, styles: &StyleTable) -> Result<Normalized, GraphError> {
    let (schema, raw_nodes, raw_links) = payload.into_parts();

    let explicit_ids = raw_nodes
        .iter()
        .filter_map(|raw| raw.explicit_id(schema))
        .collect::<HashSet<_>>();

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut index_by_id = HashMap::with_capacity(raw_nodes.len());

    for (position, raw) in raw_nodes.iter().enumerate() {
        let type_tag = raw
            .type_name()
            .map(|name| TypeTag::parse(&name))
            .unwrap_or(TypeTag::Unknown);

        let id = match raw.explicit_id(schema) {
            Some(id) => {
                if index_by_id.contains_key(&id) {
                    warn!(%id, "dropping node with duplicate id");
                    continue;
                }
                id
            }
            None => {
                let id = synthesized_id(type_tag, position);
                if explicit_ids.contains(&id) || index_by_id.contains_key(&id) {
                    return Err(GraphError::DuplicateNodeId { id });
                }
                id
            }
        };

        let label = raw.display_label(schema).unwrap_or_else(|| id.clone());
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(Node {
            id,
            label,
            type_tag,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pinned: false,
            dimmed: false,
            radius: styles.radius(type_tag),
        });
    }

    let edges = resolve_edges(schema, &raw_links, &index_by_id);

    if nodes.is_empty() && edges.is_empty() {
        return Ok(Normalized::Empty);
    }

    Ok(Normalized::Graph(Graph::from_parts(
        nodes,
        edges,
        index_by_id,
    )))
}

fn resolve_edges(
    schema: Schema,
    raw_links: &[RawLink],
    index_by_id: &HashMap<String, usize>,
) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(raw_links.len());
    let mut dropped = 0usize;

    for raw in raw_links {
        let source_id = endpoint_id(raw.source.as_ref(), schema);
        let target_id = endpoint_id(raw.target.as_ref(), schema);

        let resolved = source_id
            .zip(target_id)
            .and_then(|(source_id, target_id)| {
                let source = index_by_id.get(&source_id).copied()?;
                let target = index_by_id.get(&target_id).copied()?;
                Some((source_id, target_id, source, target))
            });

        let Some((source_id, target_id, source, target)) = resolved else {
            dropped += 1;
            continue;
        };

        edges.push(Edge {
            source_id,
            target_id,
            source,
            target,
            relation: raw
                .relation_label(schema)
                .unwrap_or_else(|| DEFAULT_RELATION.to_owned()),
            weight: raw.weight(),
            dimmed: false,
        });
    }

    if dropped > 0 {
        debug!(
            dropped,
            kept = edges.len(),
            schema = schema.label(),
            "dropped edges with unresolved endpoints"
        );
    }

    edges
}
