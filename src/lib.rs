//! A congruence class registry for discharging verification conditions.
//!
//! The registry is the equality-reasoning core of a sequent prover: terms
//! arrive as a stream of integer-encoded construction events, each distinct
//! application of an operator to arguments is interned exactly once in a
//! discrimination trie, and a union-find partition over the interned terms is
//! kept congruence-closed as the client asserts equalities. The verification
//! condition is discharged the moment some class's attribute bit vector
//! carries the configured number of goal facts, or a reflexivity shortcut
//! fires.
//!
//! A typical session registers the antecedent and succedent terms of one
//! sequent, asserts the antecedent equalities with [`Registry::make_congruent`],
//! and polls [`Registry::is_proved`]:
//!
//! ```
//! use congruence_registry::{Label, Registry};
//!
//! let mut reg = Registry::new(10, 10, 1000, 10);
//! let a = reg.register_cluster(Label::new(1)).unwrap();
//! let b = reg.register_cluster(Label::new(2)).unwrap();
//! reg.append_to_cluster_arg_list(a);
//! let fa = reg.register_cluster(Label::new(3)).unwrap();
//! reg.append_to_cluster_arg_list(b);
//! let fb = reg.register_cluster(Label::new(3)).unwrap();
//!
//! reg.make_congruent(a, b);
//! assert!(reg.are_congruent(fa, fb));
//! ```
//!
//! All tables are flat arenas addressed by 1-based designators; designator 0
//! is the sentinel everywhere, and slot 0 of every table is a real all-zero
//! record so sentinel reads never branch. One `Registry` value is one proof
//! session.

mod ids;
mod merge;
mod record;
mod registry;
mod stand;
mod trie;

pub use ids::{ArgId, ClassId, ClusterId, Label, StandId};
pub use record::{Attribute, GoalPolicy, MAX_ARG_DEPTH};
pub use registry::Registry;

/// Reportable failures of the registry's public contract.
///
/// Capacity exhaustion and protocol violations come back as `Err`; breakage
/// of the registry's own structural invariants is a bug and panics instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("congruence class table full ({0} classes in use)")]
    ClassCapacity(usize),
    #[error("cluster table full ({0} clusters in use)")]
    ClusterCapacity(usize),
    #[error("argument trie full ({in_use} nodes in use, {needed} more needed)")]
    ArgCapacity { in_use: usize, needed: usize },
    #[error("operator label {0} is outside the root label capacity ({1} labels)")]
    LabelCapacity(Label, usize),
    #[error("application has too many arguments ({0})")]
    ArityTooLarge(usize),
    #[error("no application of operator label {0} with the given arguments is registered")]
    NotRegistered(Label),
}
