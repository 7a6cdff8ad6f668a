//! The arena record kinds: pure data, no behavior.
//!
//! Linked lists are threaded through the records as designator fields rather
//! than materialized as collections; the merge algorithms depend on splicing
//! entries without reallocation.

use std::fmt;

use crate::ids::{ArgId, ClassId, ClusterId, Label, StandId};

/// Deepest argument position tracked per class in the signature trie.
///
/// Bounds the per-class `asop` array and therefore the arity of a registered
/// application; deeper applications are a reportable error, not a panic.
pub const MAX_ARG_DEPTH: usize = 8;

/// Fixed-width bit vector recording which goal facts are known true of a
/// congruence class.
///
/// The meaning of the individual bits is owned by the VC-translation
/// collaborator that seeds them; the registry only ORs bit vectors together
/// and counts set bits against the configured [`GoalPolicy`].
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Attribute(u32);

impl Attribute {
    pub const EMPTY: Self = Self(0);

    pub fn single(bit: u32) -> Self {
        let mut a = Self::EMPTY;
        a.set(bit);
        a
    }

    pub fn from_bits(bits: impl IntoIterator<Item = u32>) -> Self {
        let mut a = Self::EMPTY;
        for bit in bits {
            a.set(bit);
        }
        a
    }

    pub fn set(&mut self, bit: u32) {
        debug_assert!(bit < u32::BITS);
        self.0 |= 1 << bit;
    }

    pub fn contains(self, bit: u32) -> bool {
        bit < u32::BITS && self.0 & (1 << bit) != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for bit in 0..u32::BITS {
            if self.contains(bit) {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{bit}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

/// Caller-supplied proof-goal configuration.
///
/// The VC is proved the instant some class's attribute carries
/// `goal_bit_count` set bits, and the reflexivity shortcut requires the
/// equality cluster's class to carry `reflexive_marker_bit`. Both encode
/// domain knowledge owned by the VC-to-term translator; the defaults match
/// the antecedent/succedent/ultimate encoding it ships with.
#[derive(Clone, Copy, Debug)]
pub struct GoalPolicy {
    pub goal_bit_count: u32,
    pub reflexive_marker_bit: u32,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            goal_bit_count: 3,
            reflexive_marker_bit: 2,
        }
    }
}

/// A union-find node plus proof state.
///
/// `asop` ("argument-string occurrence positions") maps each trie depth to
/// the head of the chain of trie nodes where this class currently occurs as
/// an argument at that depth; `last_asop_level` bounds merge-propagation
/// scans.
#[derive(Clone, Debug, Default)]
pub(crate) struct CongruenceClass {
    /// Self when this class is the representative, otherwise one step closer
    /// to the representative.
    pub dominant: ClassId,
    pub attribute: Attribute,
    /// Head of the per-class stand list, ordered ascending by operator label.
    pub first_stand: StandId,
    /// Indexed by trie depth, 1..=MAX_ARG_DEPTH; entry 0 is unused.
    pub asop: [ArgId; MAX_ARG_DEPTH + 1],
    pub last_asop_level: usize,
}

/// One interned term: an operator applied to an interned argument signature.
#[derive(Clone, Debug, Default)]
pub(crate) struct CongruenceCluster {
    pub label: Label,
    /// Trie node terminating this term's argument signature; the trie root
    /// for nullary terms.
    pub arg_index: ArgId,
    /// The class this cluster currently belongs to; kept at the class's
    /// dominant by the merge machinery.
    pub class: ClassId,
    /// Union-find pointer among clusters discovered to denote the same value.
    pub dominant: ClusterId,
    /// Label-descending chain of clusters sharing this exact argument
    /// signature.
    pub next_with_same_arg: ClusterId,
    /// Doubly-linked, designator-ascending chain within the owning stand.
    pub next_stand_cluster: ClusterId,
    pub prev_stand_cluster: ClusterId,
}

/// One node of the signature trie: the argument at some depth of some
/// application.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClusterArgument {
    /// The dominant class of the argument: the trie edge label.
    pub cc: ClassId,
    /// First child (the next-deeper argument position).
    pub next_arg: ArgId,
    /// Parent (one depth shallower; the trie root for depth-1 nodes).
    pub prev_arg: ArgId,
    /// Next sibling under the same parent, kept sorted descending by `cc`.
    pub alternative: ArgId,
    /// Once the signature is complete, the head of the cluster chain it
    /// denotes.
    pub cluster: ClusterId,
    /// Same-depth, same-class chain driving merge re-indexing.
    pub next_same_cc_in_level: ArgId,
}

/// Per-class bucket of clusters sharing a root operator.
#[derive(Clone, Debug, Default)]
pub(crate) struct Stand {
    pub label: Label,
    /// Head of the designator-ascending cluster chain.
    pub first_cluster: ClusterId,
    /// Next operator bucket within the same class, label-ascending.
    pub next_cc_stand: StandId,
    /// Cross-class chain of all stands with this operator, designator-
    /// ascending and doubly linked.
    pub next_vrty_stand: StandId,
    pub prev_vrty_stand: StandId,
}

/// Head of the global stand chain for one operator label.
#[derive(Clone, Debug, Default)]
pub(crate) struct VarietyList {
    pub first_stand: StandId,
    /// Set once when the label is first registered; presence marker for
    /// `is_registry_label`, never cleared.
    pub tag: StandId,
}
