use util::{HashMap, Hasher, IdVec};

use crate::key::KeyRef;
use crate::{ActivityIdx, FlowIdx, Key};

type KeyMap<I> = hashbrown::HashMap<Key, I, Hasher>;

/// A single input to an activity, per unit of the activity's level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exchange<I> {
    pub input: I,
    pub amount: f64,
}

/// A production/transformation node.
#[derive(Debug, Clone)]
pub struct Activity {
    pub key: Key,
    pub name: String,
    /// Net units of reference product per unit of activity level.
    /// Self-consumption has already been subtracted.
    pub production: f64,
    /// Inputs from other activities, in definition order.
    pub technosphere: Vec<Exchange<ActivityIdx>>,
    /// Elementary flows, in definition order.
    pub biosphere: Vec<Exchange<FlowIdx>>,
}

/// An elementary (biosphere) flow.
#[derive(Debug, Clone)]
pub struct Flow {
    pub key: Key,
    pub name: String,
}

/// Characterization factors that turn flow amounts into a single score.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    factors: HashMap<FlowIdx, f64>,
}

impl Method {
    pub(crate) fn new(name: String, factors: HashMap<FlowIdx, f64>) -> Self {
        Self { name, factors }
    }

    /// Impact per unit of `flow`; uncharacterized flows score zero.
    #[inline]
    pub fn factor(&self, flow: FlowIdx) -> f64 {
        self.factors.get(&flow).copied().unwrap_or(0.0)
    }
}

/// Read-only inventory graph. Indexes are assigned in definition order.
#[derive(Debug)]
pub struct Inventory {
    activities: IdVec<ActivityIdx, Activity>,
    flows: IdVec<FlowIdx, Flow>,
    activity_keys: KeyMap<ActivityIdx>,
    flow_keys: KeyMap<FlowIdx>,
    methods: Vec<Method>,
}

impl Inventory {
    pub(crate) fn new(
        activities: IdVec<ActivityIdx, Activity>,
        flows: IdVec<FlowIdx, Flow>,
        methods: Vec<Method>,
    ) -> Self {
        let activity_keys = activities
            .iter_ids()
            .map(|(idx, act)| (act.key.clone(), idx))
            .collect();
        let flow_keys = flows
            .iter_ids()
            .map(|(idx, flow)| (flow.key.clone(), idx))
            .collect();
        Self {
            activities,
            flows,
            activity_keys,
            flow_keys,
            methods,
        }
    }

    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    pub fn num_flows(&self) -> usize {
        self.flows.len()
    }

    pub fn activity(&self, idx: ActivityIdx) -> &Activity {
        self.activities.get(idx)
    }

    pub fn flow(&self, idx: FlowIdx) -> &Flow {
        self.flows.get(idx)
    }

    pub fn activities(&self) -> impl Iterator<Item = (ActivityIdx, &Activity)> + '_ {
        self.activities.iter_ids()
    }

    pub fn activity_index(&self, key: &Key) -> Option<ActivityIdx> {
        self.activity_keys.get(key).copied()
    }

    /// Look up an activity by `(database, code)` without building a [`Key`].
    pub fn lookup_activity(&self, database: &str, code: &str) -> Option<ActivityIdx> {
        self.activity_keys
            .get(&KeyRef { database, code })
            .copied()
    }

    pub fn flow_index(&self, key: &Key) -> Option<FlowIdx> {
        self.flow_keys.get(key).copied()
    }

    pub fn lookup_flow(&self, database: &str, code: &str) -> Option<FlowIdx> {
        self.flow_keys.get(&KeyRef { database, code }).copied()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}
