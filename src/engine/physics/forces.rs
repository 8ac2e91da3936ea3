use eframe::egui::Vec2;

use super::quadtree::Quadtree;
use crate::payload::Edge;
use crate::util::fallback_direction;

#[derive(Clone, Copy, Debug)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) softening: f32,
    pub(super) theta: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) padding: f32,
    pub(super) max_radius: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct SpringParams {
    pub(super) stiffness: f32,
    pub(super) rest_length: f32,
    pub(super) max_stiffness: f32,
}

fn direction_between(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        fallback_direction(from, to)
    }
}

/// Adds the charge pushing node `index` away from everything else.
pub(super) fn accumulate_repulsion(
    cell: &Quadtree,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    force: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.members {
            if other == index {
                continue;
            }
            let delta = point - positions[other];
            let distance_sq = delta.length_sq();
            let direction = direction_between(delta, distance_sq.sqrt(), index, other);
            *force += direction * (params.strength / (distance_sq + params.softening));
        }
        return;
    }

    let delta = point - cell.center_of_mass;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let far_enough = !cell.bounds.contains(point)
        && (cell.bounds.side_length() / distance) < params.theta
        && cell.mass > 1.0;

    if far_enough {
        *force += (delta / distance) * (params.strength * cell.mass / (distance_sq + params.softening));
        return;
    }

    for child in cell.children() {
        accumulate_repulsion(child, index, positions, params, force);
    }
}

/// Pushes apart every pair closer than the sum of their radii plus padding.
pub(super) fn accumulate_collisions(
    tree: &Quadtree,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    if params.strength <= 0.0 {
        return;
    }

    for (from, &point) in positions.iter().enumerate() {
        let range = radii[from] + params.max_radius + params.padding;
        tree.visit_near(point, range, &mut |to| {
            if to <= from {
                return;
            }

            let delta = point - positions[to];
            let distance = delta.length();
            let min_distance = radii[from] + radii[to] + params.padding;
            if distance >= min_distance {
                return;
            }

            let direction = direction_between(delta, distance, from, to);
            let push = direction * ((min_distance - distance) * params.strength * 0.5);
            forces[from] += push;
            forces[to] -= push;
        });
    }
}

/// Pulls each edge's endpoints toward the rest length, stiffer for heavier edges.
pub(super) fn accumulate_springs(
    edges: &[Edge],
    positions: &[Vec2],
    params: SpringParams,
    alpha: f32,
    forces: &mut [Vec2],
) {
    let node_count = positions.len();
    for edge in edges {
        let (source, target) = (edge.source, edge.target);
        if edge.is_self_loop() || source >= node_count || target >= node_count {
            continue;
        }

        let delta = positions[source] - positions[target];
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }

        let stiffness = (params.stiffness * edge.weight).min(params.max_stiffness);
        let stretch = (distance - params.rest_length) * stiffness * alpha;
        let correction = (delta / distance) * stretch;
        forces[source] -= correction;
        forces[target] += correction;
    }
}

/// Offset that moves the centroid of `positions` toward `center`.
pub(super) fn centering_offset(positions: &[Vec2], center: Vec2, strength: f32) -> Vec2 {
    if positions.is_empty() {
        return Vec2::ZERO;
    }

    let centroid = positions.iter().fold(Vec2::ZERO, |sum, &point| sum + point)
        / positions.len() as f32;
    (center - centroid) * strength
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn edge(source: usize, target: usize, weight: f32) -> Edge {
        Edge {
            source_id: source.to_string(),
            target_id: target.to_string(),
            source,
            target,
            relation: "related".to_owned(),
            weight,
            dimmed: false,
        }
    }

    const REPULSION: RepulsionParams = RepulsionParams {
        strength: 1000.0,
        softening: 1.0,
        theta: 0.72,
    };

    #[test]
    fn repulsion_pushes_pair_apart_symmetrically() {
        let positions = vec![vec2(-5.0, 0.0), vec2(5.0, 0.0)];
        let tree = Quadtree::build(&positions).unwrap();
        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        accumulate_repulsion(&tree, 0, &positions, REPULSION, &mut left);
        accumulate_repulsion(&tree, 1, &positions, REPULSION, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left + right).length() < 1e-4);
    }

    #[test]
    fn repulsion_weakens_with_distance() {
        let near = vec![Vec2::ZERO, vec2(10.0, 0.0)];
        let far = vec![Vec2::ZERO, vec2(40.0, 0.0)];
        let mut near_force = Vec2::ZERO;
        let mut far_force = Vec2::ZERO;
        accumulate_repulsion(&Quadtree::build(&near).unwrap(), 0, &near, REPULSION, &mut near_force);
        accumulate_repulsion(&Quadtree::build(&far).unwrap(), 0, &far, REPULSION, &mut far_force);
        assert!(near_force.length() > far_force.length() * 10.0);
    }

    #[test]
    fn barnes_hut_tracks_exact_sum_for_distant_cluster() {
        let mut positions = vec![vec2(-2000.0, 0.0)];
        for index in 0..60 {
            positions.push(vec2((index % 8) as f32 * 3.0, (index / 8) as f32 * 3.0));
        }
        let tree = Quadtree::build(&positions).unwrap();
        let mut approximate = Vec2::ZERO;
        accumulate_repulsion(&tree, 0, &positions, REPULSION, &mut approximate);

        let exact = positions[1..].iter().fold(Vec2::ZERO, |sum, &other| {
            let delta = positions[0] - other;
            sum + delta.normalized() * (REPULSION.strength / (delta.length_sq() + REPULSION.softening))
        });
        assert!((approximate - exact).length() / exact.length() < 0.05);
    }

    #[test]
    fn collisions_only_touch_overlapping_pairs() {
        let positions = vec![vec2(0.0, 0.0), vec2(5.0, 0.0), vec2(100.0, 0.0)];
        let radii = vec![6.0, 6.0, 6.0];
        let tree = Quadtree::build(&positions).unwrap();
        let mut forces = vec![Vec2::ZERO; 3];
        accumulate_collisions(
            &tree,
            &positions,
            &radii,
            CollisionParams {
                strength: 1.0,
                padding: 2.0,
                max_radius: 6.0,
            },
            &mut forces,
        );

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        assert_eq!(forces[2], Vec2::ZERO);
    }

    #[test]
    fn springs_pull_stretched_edges_together() {
        let positions = vec![Vec2::ZERO, vec2(300.0, 0.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        let params = SpringParams {
            stiffness: 0.05,
            rest_length: 100.0,
            max_stiffness: 0.5,
        };
        accumulate_springs(&[edge(0, 1, 1.0), edge(1, 1, 1.0)], &positions, params, 1.0, &mut forces);

        assert!(forces[0].x > 0.0);
        assert!(forces[1].x < 0.0);
        assert!((forces[0].x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn heavier_edges_pull_harder() {
        let positions = vec![Vec2::ZERO, vec2(300.0, 0.0)];
        let params = SpringParams {
            stiffness: 0.05,
            rest_length: 100.0,
            max_stiffness: 0.5,
        };
        let mut light = vec![Vec2::ZERO; 2];
        let mut heavy = vec![Vec2::ZERO; 2];
        accumulate_springs(&[edge(0, 1, 1.0)], &positions, params, 1.0, &mut light);
        accumulate_springs(&[edge(0, 1, 3.0)], &positions, params, 1.0, &mut heavy);
        assert!(heavy[0].x > light[0].x);
    }

    #[test]
    fn centering_moves_centroid_toward_center() {
        let positions = vec![vec2(10.0, 10.0), vec2(30.0, 10.0)];
        let offset = centering_offset(&positions, Vec2::ZERO, 0.5);
        assert_eq!(offset, vec2(-10.0, -5.0));
    }
}
