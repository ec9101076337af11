use inventory::{ActivityIdx, FlowIdx, Inventory, Key, Lca};
use util::Timer;

use crate::frontier::{Frontier, ImpactHeap, Ranked, Stack};
use crate::{Error, NodeId, NodeTable, NodeTotals, Settings, Strategy};

/// One realized traversal step: `from` supplies `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    /// Consumer, or [`NodeId::Root`] for demanded activities.
    pub to: NodeId,
    /// Product (or flow) amount moving along this edge in this step.
    pub amount: f64,
    /// Exchange amount per unit of the consumer's reference product.
    pub exc_amount: f64,
    /// Score attributable to following exactly this edge.
    pub impact: f64,
}

/// Output of [`GraphTraversal::calculate`].
#[derive(Debug, Clone)]
pub struct AggregatedGraph {
    /// One entry per activity (or flow) reached, plus the root.
    pub nodes: NodeTable,
    /// Append-only log of realized edges.
    pub edges: Vec<Edge>,
    /// Total score of the solved system.
    pub score: f64,
    /// Number of edges realized.
    pub visits: usize,
}

impl AggregatedGraph {
    pub fn node(&self, id: &NodeId) -> Option<&NodeTotals> {
        self.nodes.get(id)
    }
}

#[derive(Debug, Clone, Copy)]
enum Supplier {
    Activity(ActivityIdx),
    Flow(FlowIdx),
}

/// A discovered edge waiting to be realized.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    supplier: Supplier,
    /// `None` for edges into the root.
    consumer: Option<ActivityIdx>,
    amount: f64,
    exc_amount: f64,
    impact: f64,
}

impl Ranked for Candidate {
    fn rank(&self) -> f64 {
        self.impact
    }
}

/// Walks the supply chain from the demanded activities, merging every
/// visit to the same activity into one node.
///
/// Each demanded activity is expanded to exhaustion (or to the cutoff) in
/// demand order, draining its own frontier according to the [`Strategy`].
/// Repeated visits to an activity are expanded again with their own amounts,
/// so a production cycle only terminates through the cutoff; `max_visits`
/// turns a cycle that never decays below it into [`Error::VisitLimitExceeded`].
#[derive(Debug, Clone)]
pub struct GraphTraversal<'a> {
    inventory: &'a Inventory,
    settings: Settings,
}

impl<'a> GraphTraversal<'a> {
    pub fn new(inventory: &'a Inventory, settings: Settings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            inventory,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Copy of this engine that uses `strategy`.
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        let mut settings = self.settings.clone();
        settings.strategy = strategy;
        Self {
            inventory: self.inventory,
            settings,
        }
    }

    /// Solve the system for `demand` under `method`, then traverse it.
    pub fn calculate(&self, demand: &[(Key, f64)], method: &str) -> Result<AggregatedGraph, Error> {
        self.calculate_with(self.settings.strategy, demand, method)
    }

    /// Like [`GraphTraversal::calculate`], but drains the frontier according
    /// to `strategy` instead of the configured one.
    pub fn calculate_with(
        &self,
        strategy: Strategy,
        demand: &[(Key, f64)],
        method: &str,
    ) -> Result<AggregatedGraph, Error> {
        let lca = Lca::new(self.inventory, demand, method)?;
        self.run(strategy, &lca)
    }

    /// Traverse an already-solved system.
    pub fn traverse(&self, lca: &Lca) -> Result<AggregatedGraph, Error> {
        self.run(self.settings.strategy, lca)
    }

    fn run(&self, strategy: Strategy, lca: &Lca) -> Result<AggregatedGraph, Error> {
        let timer = Timer::now();
        let mut walk = Walk::new(lca, &self.settings);
        let roots = walk.seed()?;
        for root in roots {
            match strategy {
                Strategy::ImportanceFirst => walk.drain(root, ImpactHeap::default())?,
                Strategy::DepthFirst => walk.drain(root, Stack::default())?,
            }
        }
        log::debug!(
            "{:?} traversal realized {} edges over {} nodes",
            strategy,
            walk.graph.visits,
            walk.graph.nodes.len(),
        );
        timer.log_elapsed("graph traversal");
        Ok(walk.graph)
    }
}

/// State of a single calculation.
struct Walk<'s, 'a> {
    lca: &'s Lca<'a>,
    settings: &'s Settings,
    /// |impact| below which candidates are dropped.
    min_impact: f64,
    graph: AggregatedGraph,
}

impl<'s, 'a> Walk<'s, 'a> {
    fn new(lca: &'s Lca<'a>, settings: &'s Settings) -> Self {
        let score = lca.score();
        let mut nodes = NodeTable::with_capacity(lca.inventory().num_activities() + 1);
        nodes.accumulate(
            NodeId::Root,
            NodeTotals {
                amount: 1.0,
                cum: score,
                ind: 0.0,
            },
        );
        Self {
            lca,
            settings,
            min_impact: settings.cutoff * score.abs(),
            graph: AggregatedGraph {
                nodes,
                edges: Vec::with_capacity(64),
                score,
                visits: 0,
            },
        }
    }

    /// Realize one edge into the root per demanded activity,
    /// returning the activities to expand, in demand order.
    fn seed(&mut self) -> Result<Vec<(ActivityIdx, f64)>, Error> {
        let lca = self.lca;
        let mut roots = Vec::with_capacity(lca.demand().len());
        for &(activity, amount) in lca.demand() {
            self.realize(Candidate {
                supplier: Supplier::Activity(activity),
                consumer: None,
                amount,
                exc_amount: amount,
                impact: lca.marginal_score(activity, amount),
            })?;
            roots.push((activity, amount));
        }
        Ok(roots)
    }

    /// Expand `root` and keep realizing and expanding candidates until `frontier` is empty.
    fn drain<F: Frontier<Candidate>>(
        &mut self,
        (activity, amount): (ActivityIdx, f64),
        mut frontier: F,
    ) -> Result<(), Error> {
        self.expand(activity, amount, &mut frontier);
        while let Some(candidate) = frontier.pop() {
            self.realize(candidate)?;
            if let Supplier::Activity(supplier) = candidate.supplier {
                self.expand(supplier, candidate.amount, &mut frontier);
            }
        }
        Ok(())
    }

    /// Push every input of `amount` units of `activity`'s product onto `frontier`.
    fn expand<F: Frontier<Candidate>>(&self, activity: ActivityIdx, amount: f64, frontier: &mut F) {
        let lca = self.lca;
        let data = lca.inventory().activity(activity);
        let production = data.production;

        for exc in &data.technosphere {
            let exc_amount = exc.amount / production;
            let child_amount = amount * exc_amount;
            self.offer(
                frontier,
                Candidate {
                    supplier: Supplier::Activity(exc.input),
                    consumer: Some(activity),
                    amount: child_amount,
                    exc_amount,
                    impact: lca.marginal_score(exc.input, child_amount),
                },
            );
        }

        if self.settings.include_biosphere {
            for exc in &data.biosphere {
                let exc_amount = exc.amount / production;
                let child_amount = amount * exc_amount;
                self.offer(
                    frontier,
                    Candidate {
                        supplier: Supplier::Flow(exc.input),
                        consumer: Some(activity),
                        amount: child_amount,
                        exc_amount,
                        impact: child_amount * lca.characterize(exc.input),
                    },
                );
            }
        }
    }

    fn offer<F: Frontier<Candidate>>(&self, frontier: &mut F, candidate: Candidate) {
        if candidate.impact.abs() < self.min_impact {
            log::trace!(
                "dropping {:?} -> {:?}: impact {} below cutoff",
                candidate.supplier,
                candidate.consumer,
                candidate.impact,
            );
        } else {
            frontier.push(candidate);
        }
    }

    /// Record `candidate` as an edge and add its contribution to its supplier's node.
    fn realize(&mut self, candidate: Candidate) -> Result<(), Error> {
        if self.graph.visits >= self.settings.max_visits {
            return Err(Error::VisitLimitExceeded {
                limit: self.settings.max_visits,
            });
        }
        self.graph.visits += 1;

        let (from, ind) = match candidate.supplier {
            Supplier::Activity(activity) => {
                let ind = if self.settings.include_biosphere {
                    0.0
                } else {
                    let level = candidate.amount / self.lca.production_amount(activity);
                    level * self.lca.unit_direct_score(activity)
                };
                (self.activity_id(activity), ind)
            }
            Supplier::Flow(flow) => (self.flow_id(flow), candidate.impact),
        };
        let to = match candidate.consumer {
            Some(activity) => self.activity_id(activity),
            None => NodeId::Root,
        };

        log::trace!(
            "realizing {} -> {}: amount {}, impact {}",
            from,
            to,
            candidate.amount,
            candidate.impact,
        );
        self.graph.nodes.accumulate(
            from.clone(),
            NodeTotals {
                amount: candidate.amount,
                cum: candidate.impact,
                ind,
            },
        );
        self.graph.edges.push(Edge {
            from,
            to,
            amount: candidate.amount,
            exc_amount: candidate.exc_amount,
            impact: candidate.impact,
        });
        Ok(())
    }

    fn activity_id(&self, activity: ActivityIdx) -> NodeId {
        if self.settings.use_keys {
            NodeId::Key(self.lca.activity_key(activity).clone())
        } else {
            NodeId::Activity(activity)
        }
    }

    fn flow_id(&self, flow: FlowIdx) -> NodeId {
        if self.settings.use_keys {
            NodeId::Key(self.lca.flow_key(flow).clone())
        } else {
            NodeId::Flow(flow)
        }
    }
}
