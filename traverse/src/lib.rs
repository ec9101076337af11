//!
//! Traversals of the supply chain implied by a solved inventory system.
//!
//! Two engines are provided:
//! 1. [`GraphTraversal`] walks the graph from the demanded activities and merges
//!    every visit to an activity into one aggregated node, producing a node table
//!    and an append-only edge log. Pending edges are drained either by impact
//!    magnitude or depth-first (see [`Strategy`]).
//! 2. [`NewNodeEachVisitTraversal`] creates a fresh node for every visit, so
//!    production loops are unrolled visit by visit instead of merged.
//!
//! Both stop expanding branches whose contribution falls below a cutoff, and
//! both fail with [`Error::VisitLimitExceeded`] rather than looping forever
//! when a cycle never decays below it.

/// frontiers used to schedule pending edges
mod frontier;
pub use frontier::{Frontier, ImpactHeap, Ranked, Stack, Strategy};

/// aggregated node ids and totals
mod node;
pub use node::{NodeId, NodeTable, NodeTotals};

mod settings;
pub use settings::{Settings, VisitSettings};

/// merged-node traversal
mod aggregated;
pub use aggregated::{AggregatedGraph, Edge, GraphTraversal};

/// one-node-per-visit traversal
mod per_visit;
pub use per_visit::{
    NewNodeEachVisitTraversal, VisitEdge, VisitFlow, VisitGraph, VisitId, VisitNode,
};

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Inventory(#[from] inventory::Error),
    #[error(
        "Traversal exceeded {limit} visits \
        (this may be due to a production cycle that never falls below the cutoff)"
    )]
    VisitLimitExceeded { limit: usize },
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
