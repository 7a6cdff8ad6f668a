//! Designator newtypes and the fixed-capacity arenas they index.
//!
//! Every entity in the registry is addressed by a 1-based positive designator.
//! Designator `0` is the universal sentinel meaning "absent / none / end of
//! list", and slot 0 of every arena holds an all-zero record, so sentinel
//! lookups are always in bounds and never need a guard.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

pub(crate) trait IdKind: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! id_type {
    ($(#[$attr:meta])* $name:ident, $short:literal) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            /// The sentinel designator.
            pub const NONE: Self = Self(0);

            pub fn is_none(self) -> bool {
                self.0 == 0
            }

            /// The raw 1-based designator (0 for the sentinel).
            pub fn designator(self) -> u32 {
                self.0
            }
        }

        impl IdKind for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_none() {
                    write!(f, concat!($short, "-"))
                } else {
                    write!(f, concat!($short, "{}"), self.0)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Designator of a congruence class (a union-find node).
    ClassId,
    "cc"
);
id_type!(
    /// Designator of one interned term (an operator application).
    ClusterId,
    "cl"
);
id_type!(
    /// Designator of one node of the argument/signature trie.
    ArgId,
    "arg"
);
id_type!(
    /// Designator of a per-class operator bucket.
    StandId,
    "st"
);

/// An opaque operator / function-symbol label supplied by the front end.
///
/// Labels double as indexes into the per-operator variety table, so they must
/// stay below the registry's root-label capacity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Label(u32);

impl Label {
    pub const fn new(label: u32) -> Self {
        Self(label)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Label {
    fn from(label: u32) -> Self {
        Self(label)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A flat table addressed by 1-based designators, sized once at construction.
///
/// Slot 0 is the pre-populated all-zero sentinel record. The arena never
/// grows past its capacity; callers check `remaining()` before pushing, so
/// `push` only debug-asserts.
pub(crate) struct Arena<I, T> {
    slots: Vec<T>,
    capacity: usize,
    _id: PhantomData<I>,
}

impl<I: IdKind, T: Default> Arena<I, T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.push(T::default());
        Self {
            slots,
            capacity,
            _id: PhantomData,
        }
    }

    /// The designator the next `push` will assign.
    pub(crate) fn next_id(&self) -> I {
        I::from_index(self.slots.len())
    }

    pub(crate) fn push(&mut self, record: T) -> I {
        debug_assert!(self.remaining() > 0, "arena capacity exhausted");
        let id = self.next_id();
        self.slots.push(record);
        id
    }

    /// Number of live designators (the sentinel does not count).
    pub(crate) fn in_use(&self) -> usize {
        self.slots.len() - 1
    }

    pub(crate) fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.in_use())
    }

    pub(crate) fn contains(&self, id: I) -> bool {
        id.index() < self.slots.len()
    }
}

impl<I: IdKind, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.slots[id.index()]
    }
}

impl<I: IdKind, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.slots[id.index()]
    }
}
