//! Supply-chain graph traversal for life cycle inventory models.
//!
//! Build an [`Inventory`] with an [`InventoryBuilder`], then either:
//! - run a [`GraphTraversal`] with a demand and a characterization method,
//!   getting an aggregated node table and edge log back, or
//! - solve the system yourself with [`Lca::new`] and hand it to
//!   [`NewNodeEachVisitTraversal`], getting one node per visit back.

pub use inventory::{
    Activity, ActivityDef, ActivityIdx, Exchange, ExchangeDef, Flow, FlowIdx, Inventory,
    InventoryBuilder, Key, Lca, Method,
};
pub use traverse::{
    AggregatedGraph, Edge, Error, GraphTraversal, NewNodeEachVisitTraversal, NodeId, NodeTable,
    NodeTotals, Settings, Strategy, VisitEdge, VisitFlow, VisitGraph, VisitId, VisitNode,
    VisitSettings,
};

/// Errors raised while building or solving an inventory.
pub use inventory::Error as InventoryError;

pub use util::HashSet;
