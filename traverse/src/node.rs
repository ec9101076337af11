use std::fmt;
use std::ops::AddAssign;

use inventory::{ActivityIdx, FlowIdx, Key};
use util::{HashMap, Hasher};

/// Identifier of a node in an aggregated graph.
///
/// Depending on [`crate::Settings::use_keys`], activities and flows are
/// identified by their [`Key`] or by their solver index.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum NodeId {
    /// Synthetic node standing for the whole demand; displays as `-1`.
    Root,
    Key(Key),
    Activity(ActivityIdx),
    Flow(FlowIdx),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "-1"),
            Self::Key(key) => write!(f, "{key}"),
            Self::Activity(idx) => write!(f, "{idx}"),
            Self::Flow(idx) => write!(f, "flow {idx}"),
        }
    }
}

/// Ledger entry of an aggregated node.
///
/// Contributions are merged by summing each field, which is associative
/// and commutative: the final totals don't depend on visiting order.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NodeTotals {
    /// Net amount of reference product (or flow) attributed to this node.
    pub amount: f64,
    /// Cumulative score of this node and everything upstream of it.
    pub cum: f64,
    /// Score of this node's own elementary flows.
    pub ind: f64,
}

impl AddAssign for NodeTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.amount += rhs.amount;
        self.cum += rhs.cum;
        self.ind += rhs.ind;
    }
}

/// Aggregated nodes, in order of first visit.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    entries: Vec<(NodeId, NodeTotals)>,
    positions: HashMap<NodeId, usize>,
}

impl NodeTable {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
            positions: HashMap::with_capacity_and_hasher(cap, Hasher::default()),
        }
    }

    /// Add `totals` to the entry for `id`, creating it on first visit.
    pub(crate) fn accumulate(&mut self, id: NodeId, totals: NodeTotals) {
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos].1 += totals,
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push((id, totals));
            }
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeTotals> {
        self.positions.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeTotals)> + '_ {
        self.entries.iter().map(|(id, totals)| (id, totals))
    }
}
