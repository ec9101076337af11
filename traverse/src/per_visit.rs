use std::fmt;

use inventory::{ActivityIdx, FlowIdx, Key, Lca};
use util::Timer;

use crate::{Error, VisitSettings};

/// Identifier of a single visit; the root is `-1`, real visits count up from 0.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisitId(pub i32);

impl VisitId {
    pub const ROOT: VisitId = VisitId(-1);

    /// Position of this visit in [`VisitGraph::nodes`].
    fn position(self) -> Option<usize> {
        self.0
            .checked_add(1)
            .and_then(|pos| usize::try_from(pos).ok())
    }

    /// Id of the visit stored at `position` in [`VisitGraph::nodes`].
    fn at_position(position: usize) -> Option<VisitId> {
        i32::try_from(position).ok().map(|pos| VisitId(pos - 1))
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visit to an activity. `activity` is `None` only for the root.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitNode {
    pub unique_id: VisitId,
    pub activity: Option<ActivityIdx>,
    pub activity_key: Option<Key>,
    /// Reference product of the activity; shares the activity's index.
    pub reference_product: Option<ActivityIdx>,
    pub reference_product_production_amount: f64,
    /// Activity level of this visit.
    pub supply_amount: f64,
    pub cumulative_score: f64,
    pub direct_emissions_score: f64,
}

/// Link from a consuming visit to the visit created to supply it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitEdge {
    pub consumer_unique_id: VisitId,
    pub producer_unique_id: VisitId,
    /// `None` when the consumer is the root.
    pub consumer_index: Option<ActivityIdx>,
    pub producer_index: ActivityIdx,
    pub product_index: ActivityIdx,
    /// Amount of product demanded along this edge.
    pub amount: f64,
}

/// An elementary flow realized at one visit.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitFlow {
    pub flow_index: FlowIdx,
    pub flow_key: Key,
    pub activity_unique_id: VisitId,
    pub activity_index: ActivityIdx,
    pub activity_key: Key,
    pub amount: f64,
    pub score: f64,
}

/// Output of [`NewNodeEachVisitTraversal::calculate`].
#[derive(Debug, Clone)]
pub struct VisitGraph {
    /// Root first, then visits in the order they were created.
    pub nodes: Vec<VisitNode>,
    pub edges: Vec<VisitEdge>,
    /// Sorted by descending score.
    pub flows: Vec<VisitFlow>,
    /// Number of cumulative-score calculations performed.
    pub calculation_count: usize,
}

impl VisitGraph {
    pub fn node(&self, id: VisitId) -> Option<&VisitNode> {
        self.nodes.get(id.position()?)
    }

    /// Edges to the visits created to supply `id`.
    pub fn children(&self, id: VisitId) -> impl Iterator<Item = &VisitEdge> + '_ {
        self.edges
            .iter()
            .filter(move |edge| edge.consumer_unique_id == id)
    }
}

/// A demand on `producer` waiting to become a visit.
struct Pending {
    consumer: VisitId,
    consumer_index: Option<ActivityIdx>,
    producer: ActivityIdx,
    amount: f64,
}

/// Materializes every visit to an activity as its own node, so repeated
/// visits (including visits around a production loop) are never merged.
///
/// Visits are created in pre-order: the demanded activities in demand order,
/// each followed by everything it pulls in, inputs in definition order.
pub struct NewNodeEachVisitTraversal;

impl NewNodeEachVisitTraversal {
    /// Traverse `lca` with default settings and the given `cutoff`.
    pub fn calculate(lca: &Lca, cutoff: f64) -> Result<VisitGraph, Error> {
        Self::calculate_with(lca, &VisitSettings::with_cutoff(cutoff))
    }

    pub fn calculate_with(lca: &Lca, settings: &VisitSettings) -> Result<VisitGraph, Error> {
        settings.validate()?;
        let timer = Timer::now();
        let min_score = settings.cutoff * lca.score().abs();

        let mut graph = VisitGraph {
            nodes: Vec::with_capacity(64),
            edges: Vec::with_capacity(64),
            flows: Vec::with_capacity(64),
            calculation_count: 0,
        };
        graph.nodes.push(VisitNode {
            unique_id: VisitId::ROOT,
            activity: None,
            activity_key: None,
            reference_product: None,
            reference_product_production_amount: 1.0,
            supply_amount: 1.0,
            cumulative_score: lca.score(),
            direct_emissions_score: 0.0,
        });

        // reversed so the first demand is popped first:
        let mut stack: Vec<Pending> = lca
            .demand()
            .iter()
            .rev()
            .map(|&(producer, amount)| Pending {
                consumer: VisitId::ROOT,
                consumer_index: None,
                producer,
                amount,
            })
            .collect();

        while let Some(pending) = stack.pop() {
            if graph.calculation_count >= settings.max_calc {
                return Err(Error::VisitLimitExceeded {
                    limit: settings.max_calc,
                });
            }
            graph.calculation_count += 1;

            let cumulative_score = lca.marginal_score(pending.producer, pending.amount);
            if cumulative_score.abs() < min_score {
                log::trace!(
                    "not visiting {} for {}: score {} below cutoff",
                    pending.producer,
                    pending.consumer,
                    cumulative_score,
                );
                continue;
            }

            let id = VisitId::at_position(graph.nodes.len()).ok_or(
                Error::VisitLimitExceeded {
                    limit: settings.max_calc,
                },
            )?;
            let supply = visit(lca, &mut graph, id, &pending, cumulative_score);
            if settings.static_activities.contains(&pending.producer) {
                continue;
            }
            let inputs = &lca.inventory().activity(pending.producer).technosphere;
            for exc in inputs.iter().rev() {
                stack.push(Pending {
                    consumer: id,
                    consumer_index: Some(pending.producer),
                    producer: exc.input,
                    amount: exc.amount * supply,
                });
            }
        }

        graph
            .flows
            .sort_by(|a, b| b.score.total_cmp(&a.score));

        log::debug!(
            "per-visit traversal created {} nodes and {} flows in {} calculations",
            graph.nodes.len(),
            graph.flows.len(),
            graph.calculation_count,
        );
        timer.log_elapsed("per-visit traversal");
        Ok(graph)
    }
}

/// Create the node, edge and flows for visit `id`.
/// Returns the new visit's activity level.
fn visit(
    lca: &Lca,
    graph: &mut VisitGraph,
    id: VisitId,
    pending: &Pending,
    cumulative_score: f64,
) -> f64 {
    let activity = lca.inventory().activity(pending.producer);
    let supply_amount = pending.amount / activity.production;

    let mut direct_emissions_score = 0.0;
    for exc in &activity.biosphere {
        let amount = exc.amount * supply_amount;
        let score = amount * lca.characterize(exc.input);
        direct_emissions_score += score;
        graph.flows.push(VisitFlow {
            flow_index: exc.input,
            flow_key: lca.flow_key(exc.input).clone(),
            activity_unique_id: id,
            activity_index: pending.producer,
            activity_key: activity.key.clone(),
            amount,
            score,
        });
    }

    log::trace!(
        "visit {} of {}: supply {}, score {}",
        id,
        activity.key,
        supply_amount,
        cumulative_score,
    );
    graph.nodes.push(VisitNode {
        unique_id: id,
        activity: Some(pending.producer),
        activity_key: Some(activity.key.clone()),
        reference_product: Some(pending.producer),
        reference_product_production_amount: activity.production,
        supply_amount,
        cumulative_score,
        direct_emissions_score,
    });
    graph.edges.push(VisitEdge {
        consumer_unique_id: pending.consumer,
        producer_unique_id: id,
        consumer_index: pending.consumer_index,
        producer_index: pending.producer,
        product_index: pending.producer,
        amount: pending.amount,
    });
    supply_amount
}

#[cfg(test)]
mod test {
    use super::*;

    fn empty_graph() -> VisitGraph {
        VisitGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            flows: Vec::new(),
            calculation_count: 0,
        }
    }

    #[test]
    fn test_positions() {
        assert_eq!(VisitId::ROOT.position(), Some(0));
        assert_eq!(VisitId(4).position(), Some(5));
        assert_eq!(VisitId(-2).position(), None);
        assert_eq!(VisitId(i32::MAX).position(), None);

        assert_eq!(VisitId::at_position(0), Some(VisitId::ROOT));
        assert_eq!(VisitId::at_position(5), Some(VisitId(4)));
        assert_eq!(VisitId::at_position(i32::MAX as usize), Some(VisitId(i32::MAX - 1)));
        assert_eq!(VisitId::at_position(i32::MAX as usize + 1), None);
    }

    #[test]
    fn test_node_lookup_out_of_range() {
        let graph = empty_graph();
        assert!(graph.node(VisitId(i32::MAX)).is_none());
        assert!(graph.node(VisitId(i32::MIN)).is_none());
        assert!(graph.node(VisitId::ROOT).is_none());
        assert_eq!(graph.children(VisitId::ROOT).count(), 0);
    }
}
