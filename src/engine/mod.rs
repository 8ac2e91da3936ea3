mod adjacency;
mod interaction;
mod physics;
mod snapshot;

use eframe::egui::Vec2;
use serde_json::Value;
use tracing::info;

use crate::config::LayoutConfig;
use crate::error::GraphError;
use crate::payload::{Graph, Normalized, normalize, normalize_str};
use crate::style::StyleTable;
pub use adjacency::AdjacencyIndex;
pub use interaction::InteractionController;
pub use physics::{Simulation, SimulationState};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded {
        generation: u64,
        nodes: usize,
        edges: usize,
    },
    /// Nothing to lay out; the host should show its "no data" state.
    Empty,
}

struct Session {
    generation: u64,
    graph: Graph,
    simulation: Simulation,
    controller: InteractionController,
}

/// Owns at most one live graph and everything derived from it.
///
/// Every operation on a torn-down engine is a no-op: `tick` reports convergence and
/// interaction calls return `false`.
pub struct LayoutEngine {
    config: LayoutConfig,
    styles: StyleTable,
    session: Option<Session>,
    last_generation: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let styles = config.style_table();
        Self {
            config,
            styles,
            session: None,
            last_generation: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Replaces the current graph with the normalized `payload`.
    ///
    /// The previous session is torn down first, whatever the outcome.
    pub fn load(&mut self, payload: &Value) -> Result<LoadOutcome, GraphError> {
        self.teardown();
        let normalized = normalize(payload, &self.styles)?;
        Ok(self.install(normalized))
    }

    pub fn load_str(&mut self, raw: &str) -> Result<LoadOutcome, GraphError> {
        self.teardown();
        let normalized = normalize_str(raw, &self.styles)?;
        Ok(self.install(normalized))
    }

    fn install(&mut self, normalized: Normalized) -> LoadOutcome {
        let Normalized::Graph(graph) = normalized else {
            info!("graph payload normalized to an empty graph");
            return LoadOutcome::Empty;
        };
        let generation = self.load_graph(graph);
        match &self.session {
            Some(session) => LoadOutcome::Loaded {
                generation,
                nodes: session.graph.node_count(),
                edges: session.graph.edge_count(),
            },
            None => LoadOutcome::Empty,
        }
    }

    /// Starts a fresh session on an already normalized graph and returns its generation.
    pub fn load_graph(&mut self, mut graph: Graph) -> u64 {
        self.teardown();
        self.last_generation += 1;
        let generation = self.last_generation;

        let simulation = Simulation::new(&self.config);
        simulation.seed_positions(&mut graph);
        let controller = InteractionController::new(&graph);
        info!(
            generation,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );

        self.session = Some(Session {
            generation,
            graph,
            simulation,
            controller,
        });
        generation
    }

    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                generation = session.generation,
                ticks = session.simulation.state().tick_count,
                "layout session torn down"
            );
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.session.as_ref().map(|session| session.generation)
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.session.as_ref().map(|session| &session.graph)
    }

    pub fn simulation_state(&self) -> Option<SimulationState> {
        self.session.as_ref().map(|session| session.simulation.state())
    }

    pub fn adjacency(&self) -> Option<&AdjacencyIndex> {
        self.session
            .as_ref()
            .map(|session| session.controller.adjacency())
    }

    pub fn focus(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|session| session.controller.focus())
    }

    pub fn is_converged(&self) -> bool {
        self.session
            .as_ref()
            .is_none_or(|session| session.simulation.is_converged())
    }

    /// Advances the current graph one step; `true` means there is nothing left to animate.
    pub fn tick(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.simulation.tick(&mut session.graph),
            None => true,
        }
    }

    /// Ticks only if `generation` still names the live graph.
    pub fn tick_for(&mut self, generation: u64) -> bool {
        if self.generation() != Some(generation) {
            return true;
        }
        self.tick()
    }

    /// Ticks until convergence or `max_ticks`, returning the number of ticks run.
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.is_active() {
            ticks += 1;
            if self.tick() {
                break;
            }
        }
        ticks
    }

    pub fn begin_drag(&mut self, id: &str) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session
            .controller
            .begin_drag(&mut session.graph, &mut session.simulation, id)
    }

    pub fn update_drag(&mut self, id: &str, position: Vec2) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session
            .controller
            .update_drag(&mut session.graph, id, position)
    }

    pub fn end_drag(&mut self, id: &str, sticky: bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session
            .controller
            .end_drag(&mut session.graph, &mut session.simulation, id, sticky)
    }

    pub fn release(&mut self, id: &str) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.controller.release(&mut session.graph, id)
    }

    pub fn release_all(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.controller.release_all(&mut session.graph);
        true
    }

    pub fn highlight_neighborhood(&mut self, id: Option<&str>) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session
            .controller
            .highlight_neighborhood(&mut session.graph, id)
    }

    pub fn snapshot(&self) -> Option<GraphSnapshot> {
        self.session.as_ref().map(|session| {
            GraphSnapshot::capture(
                &session.graph,
                &self.styles,
                session.simulation.state(),
                session.simulation.is_converged(),
                session.generation,
            )
        })
    }
}
