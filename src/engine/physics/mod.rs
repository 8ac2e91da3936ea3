mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::payload::Graph;
use crate::util::stable_pair;
use forces::{
    CollisionParams, RepulsionParams, SpringParams, accumulate_collisions, accumulate_repulsion,
    accumulate_springs, centering_offset,
};
use quadtree::Quadtree;

const PHYLLOTAXIS_ANGLE: f32 = 2.399_963_2;
const SEED_JITTER: f32 = 1.5;
const MAX_LINK_STIFFNESS: f32 = 0.5;

/// Temperature of one running layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    pub alpha: f32,
    pub alpha_target: f32,
    pub tick_count: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            tick_count: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tuning {
    repulsion: RepulsionParams,
    spring: SpringParams,
    collision_strength: f32,
    collision_padding: f32,
    centering_strength: f32,
    friction: f32,
    max_speed: f32,
    alpha_min: f32,
    alpha_decay: f32,
    drag_alpha: f32,
    initial_radius: f32,
    center: Vec2,
}

impl Tuning {
    fn from_config(config: &LayoutConfig) -> Self {
        Self {
            repulsion: RepulsionParams {
                strength: config.charge_strength.max(0.0),
                softening: config.softening.max(0.01),
                theta: config.barnes_hut_theta.clamp(0.0, 1.5),
            },
            spring: SpringParams {
                stiffness: config.link_stiffness.max(0.0),
                rest_length: config.link_distance.max(0.0),
                max_stiffness: MAX_LINK_STIFFNESS,
            },
            collision_strength: config.collision_strength.clamp(0.0, 1.0),
            collision_padding: config.collision_padding.max(0.0),
            centering_strength: config.centering_strength.clamp(0.0, 1.0),
            friction: config.friction.clamp(0.0, 0.99),
            max_speed: config.max_speed.max(0.1),
            alpha_min: config.alpha_min.clamp(0.000_01, 0.5),
            alpha_decay: config.alpha_decay.clamp(0.000_1, 1.0),
            drag_alpha: config.drag_alpha.clamp(0.0, 1.0),
            initial_radius: config.initial_radius.max(1.0),
            center: vec2(config.center[0], config.center[1]),
        }
    }
}

#[derive(Default)]
struct Scratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    centroid_positions: Vec<Vec2>,
}

/// Force-directed layout over a [`Graph`]; owns the temperature and scratch buffers.
pub struct Simulation {
    state: SimulationState,
    tuning: Tuning,
    scratch: Scratch,
}

impl Simulation {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            state: SimulationState::default(),
            tuning: Tuning::from_config(config),
            scratch: Scratch::default(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn is_converged(&self) -> bool {
        self.state.alpha < self.tuning.alpha_min
    }

    pub(crate) fn drag_alpha(&self) -> f32 {
        self.tuning.drag_alpha
    }

    /// Raises alpha to at least `alpha` and holds it near `target`.
    pub fn reheat(&mut self, alpha: f32, target: f32) {
        self.state.alpha = self.state.alpha.max(alpha.clamp(0.0, 1.0));
        self.state.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Lets alpha resume decaying toward zero.
    pub fn cool(&mut self) {
        self.state.alpha_target = 0.0;
    }

    /// Spreads unpinned nodes on a phyllotaxis spiral around the center.
    pub fn seed_positions(&self, graph: &mut Graph) {
        let center = self.tuning.center;
        for (index, node) in graph.nodes.iter_mut().enumerate() {
            if node.pinned {
                continue;
            }
            let radius = self.tuning.initial_radius * (0.5 + index as f32).sqrt();
            let angle = index as f32 * PHYLLOTAXIS_ANGLE;
            let (jx, jy) = stable_pair(&node.id);
            node.position =
                center + vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * SEED_JITTER;
            node.velocity = Vec2::ZERO;
        }
    }

    /// Advances the layout one step. Returns `true` once alpha is below `alpha_min`.
    pub fn tick(&mut self, graph: &mut Graph) -> bool {
        let tuning = self.tuning;
        let was_converged = self.is_converged();
        self.state.alpha += (self.state.alpha_target - self.state.alpha) * tuning.alpha_decay;
        self.state.tick_count += 1;
        let alpha = self.state.alpha;

        let node_count = graph.nodes.len();
        if node_count == 0 {
            return self.is_converged();
        }

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for node in &graph.nodes {
            scratch.positions.push(node.position);
            scratch.radii.push(node.radius);
            max_radius = max_radius.max(node.radius);
        }

        let forces = &mut scratch.forces;
        let positions = &scratch.positions;

        if node_count >= 2 {
            if let Some(tree) = Quadtree::build(positions) {
                let repulsion = RepulsionParams {
                    strength: tuning.repulsion.strength * alpha,
                    ..tuning.repulsion
                };
                for (index, force) in forces.iter_mut().enumerate() {
                    if graph.nodes[index].pinned {
                        continue;
                    }
                    accumulate_repulsion(&tree, index, positions, repulsion, force);
                }

                accumulate_collisions(
                    &tree,
                    positions,
                    &scratch.radii,
                    CollisionParams {
                        strength: tuning.collision_strength,
                        padding: tuning.collision_padding,
                        max_radius,
                    },
                    forces,
                );
            }

            accumulate_springs(&graph.edges, positions, tuning.spring, alpha, forces);
        }

        let max_speed_sq = tuning.max_speed * tuning.max_speed;
        for (node, force) in graph.nodes.iter_mut().zip(forces.iter()) {
            if node.pinned {
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = (node.velocity + *force) * tuning.friction;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= tuning.max_speed / speed_sq.sqrt();
            }

            let next = node.position + velocity;
            if next.is_finite() {
                node.velocity = velocity;
                node.position = next;
            } else {
                node.velocity = Vec2::ZERO;
            }
        }

        scratch.centroid_positions.clear();
        scratch.centroid_positions.extend(graph.nodes.iter().map(|node| node.position));
        let offset = centering_offset(
            &scratch.centroid_positions,
            tuning.center,
            tuning.centering_strength,
        );
        if offset.is_finite() && offset.length_sq() > 0.0 {
            for node in graph.nodes.iter_mut().filter(|node| !node.pinned) {
                node.position += offset;
            }
        }

        let converged = self.is_converged();
        if converged && !was_converged {
            debug!(tick = self.state.tick_count, alpha, "layout converged");
        }
        converged
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payload::normalize;
    use crate::style::StyleTable;

    fn chain(count: usize) -> Graph {
        let nodes = (0..count)
            .map(|index| json!({"id": format!("n{index}"), "type": "PERSON"}))
            .collect::<Vec<_>>();
        let links = (1..count)
            .map(|index| json!({"source": format!("n{}", index - 1), "target": format!("n{index}")}))
            .collect::<Vec<_>>();
        normalize(&json!({"nodes": nodes, "links": links}), &StyleTable::default())
            .unwrap()
            .into_graph()
            .unwrap()
    }

    #[test]
    fn seeding_is_deterministic_and_distinct() {
        let simulation = Simulation::new(&LayoutConfig::default());
        let mut first = chain(20);
        let mut second = chain(20);
        simulation.seed_positions(&mut first);
        simulation.seed_positions(&mut second);

        for (a, b) in first.nodes().iter().zip(second.nodes()) {
            assert_eq!(a.position, b.position);
        }
        for (index, a) in first.nodes().iter().enumerate() {
            for b in &first.nodes()[index + 1..] {
                assert!((a.position - b.position).length() > 0.5);
            }
        }
    }

    #[test]
    fn alpha_decays_monotonically_and_converges() {
        let mut simulation = Simulation::new(&LayoutConfig::default());
        let mut graph = chain(30);
        simulation.seed_positions(&mut graph);

        let mut previous = simulation.alpha();
        let mut converged_at = None;
        for tick in 1..500 {
            let converged = simulation.tick(&mut graph);
            assert!(simulation.alpha() < previous);
            previous = simulation.alpha();
            if converged {
                converged_at = Some(tick);
                break;
            }
        }

        let tick = converged_at.expect("converged within 500 ticks");
        assert!(tick <= 310);
    }

    #[test]
    fn layout_separates_nodes() {
        let mut simulation = Simulation::new(&LayoutConfig::default());
        let mut graph = chain(12);
        simulation.seed_positions(&mut graph);
        while !simulation.tick(&mut graph) {}

        let nodes = graph.nodes();
        for (index, a) in nodes.iter().enumerate() {
            assert!(a.position.is_finite());
            for b in &nodes[index + 1..] {
                assert!((a.position - b.position).length() >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn linked_nodes_settle_near_rest_length() {
        let mut simulation = Simulation::new(&LayoutConfig::default());
        let mut graph = chain(2);
        simulation.seed_positions(&mut graph);
        while !simulation.tick(&mut graph) {}

        let distance = (graph.nodes()[0].position - graph.nodes()[1].position).length();
        assert!(distance > 40.0 && distance < 250.0, "distance {distance}");
    }

    #[test]
    fn centroid_stays_near_center() {
        let config = LayoutConfig {
            center: [300.0, 200.0],
            ..LayoutConfig::default()
        };
        let mut simulation = Simulation::new(&config);
        let mut graph = chain(15);
        simulation.seed_positions(&mut graph);
        while !simulation.tick(&mut graph) {}

        let centroid = graph
            .nodes()
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.position)
            / graph.node_count() as f32;
        assert!((centroid - vec2(300.0, 200.0)).length() < 5.0);
    }

    fn pinned_pair(free_position: Vec2) -> (Simulation, Graph) {
        let config = LayoutConfig {
            centering_strength: 0.0,
            ..LayoutConfig::default()
        };
        let mut graph = chain(2);
        graph.nodes[0].position = Vec2::ZERO;
        graph.nodes[0].pinned = true;
        graph.nodes[1].position = free_position;
        (Simulation::new(&config), graph)
    }

    #[test]
    fn pinned_node_pulls_linked_node_toward_rest_length() {
        let (mut simulation, mut graph) = pinned_pair(vec2(400.0, 0.0));
        while !simulation.tick(&mut graph) {}

        let anchor = graph.nodes()[0].position;
        let free = graph.nodes()[1].position;
        assert_eq!(anchor, Vec2::ZERO);
        let distance = (free - anchor).length();
        assert!(distance > 60.0 && distance < 250.0, "distance {distance}");
        assert!(free.x > 0.0);
    }

    #[test]
    fn pinned_node_pushes_overlapping_node_away() {
        let (mut simulation, mut graph) = pinned_pair(vec2(5.0, 0.0));
        let min_distance = graph.nodes()[0].radius + graph.nodes()[1].radius;
        for _ in 0..60 {
            simulation.tick(&mut graph);
        }

        assert_eq!(graph.nodes()[0].position, Vec2::ZERO);
        let free = graph.nodes()[1].position;
        assert!(free.x > min_distance, "free node at {free:?}");
    }

    #[test]
    fn reheat_raises_alpha_and_cool_resumes_decay() {
        let mut simulation = Simulation::new(&LayoutConfig::default());
        let mut graph = chain(3);
        while !simulation.tick(&mut graph) {}

        simulation.reheat(0.3, 0.3);
        assert!((simulation.alpha() - 0.3).abs() < 1e-6);
        for _ in 0..50 {
            simulation.tick(&mut graph);
        }
        assert!(!simulation.is_converged());

        simulation.cool();
        let mut ticks = 0;
        while !simulation.tick(&mut graph) {
            ticks += 1;
            assert!(ticks < 500);
        }
    }
}
