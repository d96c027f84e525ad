//! Dynamic header resolution.
//!
//! A header-deriving node (Condition, and Logic when enabled) summarises its
//! inputs as text such as `RSI(14) < EMA(20)`. Each input is rendered from the
//! node that feeds it: a header-deriving upstream node contributes its
//! *cached* header, anything else renders itself from its own configuration.
//!
//! Because upstream headers are read from the cache of the previous snapshot,
//! one pass only moves information one hop. `LabelResolver::resolve` repeats
//! passes until nothing changes or `max_passes` is hit; the latter means a
//! cycle or an absurdly deep chain and is reported as `LabelingUnstable`.

pub mod format;

use crate::config::ResolverConfig;
use crate::error::LabelingUnstable;
use crate::graph::behavior::UNCONNECTED;
use crate::graph::{Edge, Node, NodeKind, StrategyGraph, behavior};
use ahash::{AHashMap, AHashSet};
use format::{parenthesize, truncate};
use itertools::Itertools;

/// Outcome of a full resolution run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Passes executed, including the final no-change pass when one was reached.
    pub passes: usize,
    /// Nodes whose header changed, in first-change order.
    pub updated: Vec<String>,
    pub unstable: Option<LabelingUnstable>,
}

impl Resolution {
    pub fn is_stable(&self) -> bool {
        self.unstable.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    config: ResolverConfig,
}

/// Read-only lookups over one snapshot, shared by every node of a pass.
struct PassContext<'g> {
    nodes: AHashMap<&'g str, &'g Node>,
    inputs: AHashMap<(&'g str, &'g str), &'g Edge>,
}

impl<'g> PassContext<'g> {
    fn new(graph: &'g StrategyGraph) -> Self {
        let nodes: AHashMap<&str, &Node> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        // Later edges overwrite earlier ones on the same input.
        let mut inputs = AHashMap::new();
        for edge in &graph.edges {
            let exposed = nodes.get(edge.source.as_str()).is_some_and(|source| {
                behavior(source.kind)
                    .output_handles(&source.data)
                    .contains(&edge.source_handle.as_str())
            });
            if exposed {
                inputs.insert((edge.target.as_str(), edge.target_handle.as_str()), edge);
            }
        }

        Self { nodes, inputs }
    }
}

impl LabelResolver {
    /// Builds a resolver; a pass bound below 1 is raised to 1.
    pub fn new(mut config: ResolverConfig) -> Self {
        config.max_passes = config.max_passes.max(1);
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether nodes of `kind` carry a graph-derived header.
    pub fn derives_header(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Condition => true,
            NodeKind::Logic => self.config.derive_logic_headers,
            NodeKind::Source | NodeKind::Indicator | NodeKind::Action => false,
        }
    }

    /// Runs passes until the headers stop changing or the pass bound is reached.
    ///
    /// A region where header-deriving nodes feed each other in a loop is
    /// reported unstable even when truncation has frozen its headers.
    pub fn resolve(&self, graph: &mut StrategyGraph) -> Resolution {
        let mut resolution = Resolution::default();
        let mut last_changed = Vec::new();
        let mut settled = false;

        while resolution.passes < self.config.max_passes {
            resolution.passes += 1;
            let changed = self.run_pass(graph);
            if changed.is_empty() {
                settled = true;
                break;
            }
            for id in &changed {
                if !resolution.updated.contains(id) {
                    resolution.updated.push(id.clone());
                }
            }
            last_changed = changed;
        }

        let node_ids = if settled {
            self.cyclic_nodes(graph)
        } else {
            last_changed
        };
        if settled && node_ids.is_empty() {
            return resolution;
        }

        let unstable = LabelingUnstable {
            passes: resolution.passes,
            node_ids,
        };
        tracing::warn!(
            passes = unstable.passes,
            nodes = %unstable.node_ids.iter().join(", "),
            "label resolution did not reach a fixed point"
        );
        resolution.unstable = Some(unstable);
        resolution
    }

    /// One pass over every node; returns the ids whose header was rewritten.
    pub fn run_pass(&self, graph: &mut StrategyGraph) -> Vec<String> {
        let updates: Vec<(usize, String)> = {
            let context = PassContext::new(graph);
            graph
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    let candidate = self.header_in(&context, node)?;
                    (node.data.calculated_header() != Some(candidate.as_str()))
                        .then_some((index, candidate))
                })
                .collect()
        };

        updates
            .into_iter()
            .map(|(index, header)| {
                let node = &mut graph.nodes[index];
                node.data.set_calculated_header(Some(header));
                node.id.clone()
            })
            .collect()
    }

    /// The header `node` would get from the current snapshot, if its kind derives one.
    pub fn candidate_header(&self, graph: &StrategyGraph, node: &Node) -> Option<String> {
        self.header_in(&PassContext::new(graph), node)
    }

    fn header_in(&self, context: &PassContext<'_>, node: &Node) -> Option<String> {
        if !self.derives_header(node.kind) {
            return None;
        }
        let mut input = |handle: &str| self.input_text(context, node, handle);
        behavior(node.kind)
            .header(&node.data, &mut input)
            .map(|header| truncate(header, self.config.max_header_chars))
    }

    /// Header-deriving nodes whose header depends on their own header, in node order.
    fn cyclic_nodes(&self, graph: &StrategyGraph) -> Vec<String> {
        let context = PassContext::new(graph);
        graph
            .nodes
            .iter()
            .filter(|node| self.derives_header(node.kind))
            .filter(|node| {
                let mut seen = AHashSet::new();
                let mut pending = self.header_feeds(&context, node);
                while let Some(id) = pending.pop() {
                    if id == node.id {
                        return true;
                    }
                    if let Some(upstream) = context.nodes.get(id.as_str()) {
                        if seen.insert(id) {
                            pending.extend(self.header_feeds(&context, upstream));
                        }
                    }
                }
                false
            })
            .map(|node| node.id.clone())
            .collect()
    }

    /// Ids of the header-deriving nodes whose cached header `node` reads.
    fn header_feeds(&self, context: &PassContext<'_>, node: &Node) -> Vec<String> {
        behavior(node.kind)
            .input_handles(&node.data)
            .iter()
            .filter_map(|handle| context.inputs.get(&(node.id.as_str(), *handle)))
            .filter(|edge| {
                context
                    .nodes
                    .get(edge.source.as_str())
                    .is_some_and(|source| self.derives_header(source.kind))
            })
            .map(|edge| edge.source.clone())
            .collect()
    }

    fn input_text(&self, context: &PassContext<'_>, node: &Node, handle: &str) -> String {
        let Some(edge) = context.inputs.get(&(node.id.as_str(), handle)) else {
            return UNCONNECTED.to_string();
        };
        let Some(source) = context.nodes.get(edge.source.as_str()) else {
            return UNCONNECTED.to_string();
        };

        // One hop of cached state only; the upstream header is never recomputed here.
        match source.data.calculated_header() {
            Some(header) if self.derives_header(source.kind) => parenthesize(header),
            _ => behavior(source.kind).operand(source, &edge.source_handle),
        }
    }
}
