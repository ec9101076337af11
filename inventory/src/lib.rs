//!
//! The graph model traversed by `lci-graph-traverse`, plus the solver that
//! turns a demand into per-activity supply amounts and an impact score.
//!
//! An [`Inventory`] is built once from activity and flow definitions with an
//! [`InventoryBuilder`]. It is read-only afterwards. An [`Lca`] borrows the
//! inventory, factorizes its technosphere matrix for one demand and one
//! characterization [`Method`], and answers every later query (marginal
//! supply, marginal score) from the cached factorization.

/// `(database, code)` identifiers
mod key;
pub use key::Key;

/// typed indexes into the model
mod id;
pub use id::{ActivityIdx, FlowIdx};

/// read-only activity graph
mod model;
pub use model::{Activity, Exchange, Flow, Inventory, Method};

mod builder;
pub use builder::{ActivityDef, ExchangeDef, InventoryBuilder};

/// technosphere solver
mod lca;
pub use lca::Lca;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("Key {0} is defined more than once")]
    DuplicateKey(Key),
    #[error("Activity {activity} has an exchange with undefined input {input}")]
    UnknownInput { activity: Key, input: Key },
    #[error("Activity {0} has a net production amount of zero")]
    ZeroProduction(Key),
    #[error("Characterization factor given for undefined flow {0}")]
    UnknownFlow(Key),
    #[error("Characterization method \"{0}\" not found")]
    UnknownMethod(String),
    #[error("Demanded activity {0} is not part of the inventory")]
    UnknownActivity(Key),
    #[error("Demand is empty")]
    EmptyDemand,
    #[error("Technosphere matrix is singular; the system has no unique solution")]
    SingularTechnosphere,
}
