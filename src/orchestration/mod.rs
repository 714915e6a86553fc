//! # Request Handling
//!
//! Wires the pure components together into the two user-facing flows:
//!
//! - **Start**: settings + root text → tree prompt → model → storyline parser →
//!   tree builder → graph store.
//! - **Expand**: node → ancestor path → branch prompt → model → branch parser →
//!   graph store, guarded by the single expansion marker.
//!
//! [`generation`] holds the stateless prompt/model/parse steps; [`DecisionSession`]
//! owns the store and enforces the expansion gate.

pub mod generation;
pub mod session;
pub mod types;

pub use generation::{generate_branches, generate_tree};
pub use session::DecisionSession;
pub use types::{
    ExpandBranchesRequest, ExpandBranchesResponse, GenerateTreeRequest, GenerateTreeResponse,
};
