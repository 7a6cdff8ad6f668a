//! Signature-trie maintenance under class merges.
//!
//! Interning (the downward walk) lives with the registration path in
//! `registry`; this module owns everything a merge does to the trie:
//! relabeling the absorbed class's argument occurrences, folding duplicate
//! edges together, merging suffix subtrees, and keeping sibling chains and
//! the per-class same-depth occurrence chains consistent.
//!
//! Terminology: an occurrence is a trie node whose `cc` edge label is the
//! class in question; the per-class `asop` array chains all occurrences of a
//! class at each depth through `next_same_cc_in_level`. A node folded into a
//! duplicate edge becomes dormant: unlinked from its sibling chain, detached
//! from its occurrence chain, and never visited again.

use crate::ids::{ArgId, ClassId, ClusterId};
use crate::record::MAX_ARG_DEPTH;
use crate::registry::Registry;

impl Registry {
    /// Chain `node` into `class`'s occurrence list for `level`.
    pub(crate) fn update_class_asop(&mut self, class: ClassId, level: usize, node: ArgId) {
        debug_assert!(level >= 1 && level <= MAX_ARG_DEPTH);
        let head = self.classes[class].asop[level];
        self.args[node].next_same_cc_in_level = head;
        self.classes[class].asop[level] = node;
        if level > self.classes[class].last_asop_level {
            self.classes[class].last_asop_level = level;
        }
    }

    /// Remove `node` from its class's occurrence chain at `level`. Safe to
    /// call on a node that was already detached.
    pub(crate) fn detach_occurrence(&mut self, node: ArgId, level: usize) {
        let owner = self.args[node].cc;
        let head = self.classes[owner].asop[level];
        if head == node {
            self.classes[owner].asop[level] = self.args[node].next_same_cc_in_level;
        } else {
            let mut cur = head;
            while !cur.is_none() {
                let next = self.args[cur].next_same_cc_in_level;
                if next == node {
                    self.args[cur].next_same_cc_in_level =
                        self.args[node].next_same_cc_in_level;
                    break;
                }
                cur = next;
            }
        }
        self.args[node].next_same_cc_in_level = ArgId::NONE;
    }

    /// Unhook `node` from its parent's sibling chain. The node keeps its
    /// `prev_arg` so a later re-insert knows the parent.
    pub(crate) fn unlink_sibling(&mut self, node: ArgId) {
        let parent = self.args[node].prev_arg;
        let first = self.args[parent].next_arg;
        if first == node {
            self.args[parent].next_arg = self.args[node].alternative;
        } else {
            let mut cur = first;
            while !cur.is_none() {
                let next = self.args[cur].alternative;
                if next == node {
                    self.args[cur].alternative = self.args[node].alternative;
                    break;
                }
                cur = next;
            }
        }
        self.args[node].alternative = ArgId::NONE;
    }

    /// Splice `node` into `parent`'s child chain, descending by edge class.
    fn insert_child_sorted(&mut self, parent: ArgId, node: ArgId) {
        let cc = self.args[node].cc;
        let mut prev = ArgId::NONE;
        let mut cur = self.args[parent].next_arg;
        while !cur.is_none() && self.args[cur].cc > cc {
            prev = cur;
            cur = self.args[cur].alternative;
        }
        debug_assert!(cur.is_none() || self.args[cur].cc != cc, "duplicate trie edge");
        self.args[node].alternative = cur;
        self.args[node].prev_arg = parent;
        if prev.is_none() {
            self.args[parent].next_arg = node;
        } else {
            self.args[prev].alternative = node;
        }
    }

    /// Restore sibling order for `node` after its edge class changed.
    fn resort_sibling(&mut self, node: ArgId) {
        let parent = self.args[node].prev_arg;
        self.unlink_sibling(node);
        self.insert_child_sorted(parent, node);
    }

    /// Child of `parent` whose edge resolves to the dominant `cc`, or `NONE`.
    fn find_child(&self, parent: ArgId, cc: ClassId) -> ArgId {
        let mut child = self.args[parent].next_arg;
        while !child.is_none() {
            if self.find(self.args[child].cc) == cc {
                return child;
            }
            child = self.args[child].alternative;
        }
        ArgId::NONE
    }

    /// First occurrence in `class`'s chain at `level` sharing `node`'s
    /// parent. Such a node is the duplicate edge `node` must fold into.
    fn occurrence_under_same_parent(&self, node: ArgId, class: ClassId, level: usize) -> ArgId {
        let parent = self.args[node].prev_arg;
        let mut cur = self.classes[class].asop[level];
        while !cur.is_none() {
            if self.args[cur].prev_arg == parent {
                return cur;
            }
            cur = self.args[cur].next_same_cc_in_level;
        }
        ArgId::NONE
    }

    /// Rewrite every depth-`level` occurrence of `lose` to `win`, folding
    /// occurrences that now duplicate an existing `win` edge. Folds can
    /// discover congruent clusters; those pairs land on the merge worklist.
    pub(crate) fn reindex_level(&mut self, win: ClassId, lose: ClassId, level: usize) {
        let mut occ = self.classes[lose].asop[level];
        self.classes[lose].asop[level] = ArgId::NONE;
        while !occ.is_none() {
            let next = self.args[occ].next_same_cc_in_level;
            self.args[occ].next_same_cc_in_level = ArgId::NONE;
            let duplicate = self.occurrence_under_same_parent(occ, win, level);
            if duplicate.is_none() {
                self.args[occ].cc = win;
                self.update_class_asop(win, level, occ);
                self.resort_sibling(occ);
            } else {
                self.fold_occurrence(occ, duplicate, level);
            }
            occ = next;
        }
    }

    /// Fold `occ` into the structurally identical `into`: children are moved
    /// or merged, anchored clusters are combined, and `occ` goes dormant.
    fn fold_occurrence(&mut self, occ: ArgId, into: ArgId, level: usize) {
        self.merge_suffix_into(occ, into, level + 1);
        self.unlink_sibling(occ);
        self.merge_clusters(occ, into);
        self.args[occ].cc = ClassId::NONE;
    }

    /// Move the children of `from` under `to`, merging any child whose edge
    /// already exists there. `from`'s own sibling unhooking is the caller's
    /// business.
    fn merge_suffix_into(&mut self, from: ArgId, to: ArgId, level: usize) {
        let mut child = self.args[from].next_arg;
        self.args[from].next_arg = ArgId::NONE;
        while !child.is_none() {
            let next = self.args[child].alternative;
            self.args[child].alternative = ArgId::NONE;
            let cc = self.find(self.args[child].cc);
            let existing = self.find_child(to, cc);
            if existing.is_none() {
                self.insert_child_sorted(to, child);
            } else {
                self.merge_suffix_into(child, existing, level + 1);
                self.merge_clusters(child, existing);
                self.detach_occurrence(child, level);
                self.args[child].cc = ClassId::NONE;
            }
            child = next;
        }
    }

    /// Merge the cluster chain anchored at `from_node` into `to_node`'s.
    ///
    /// Chains are kept descending by label. Two clusters meeting on the same
    /// label denote the same application of the same operator, so their
    /// classes are congruent: the pair is queued for merging and the
    /// `from`-side cluster is absorbed as an alias of the survivor.
    pub(crate) fn merge_clusters(&mut self, from_node: ArgId, to_node: ArgId) {
        let mut b = self.args[from_node].cluster;
        self.args[from_node].cluster = ClusterId::NONE;
        if b.is_none() {
            return;
        }
        // Re-anchor the whole incoming chain first so alias clusters also
        // point at the surviving node.
        let mut cur = b;
        while !cur.is_none() {
            self.clusters[cur].arg_index = to_node;
            cur = self.clusters[cur].next_with_same_arg;
        }
        let mut a = self.args[to_node].cluster;
        let mut head = ClusterId::NONE;
        let mut tail = ClusterId::NONE;
        while !a.is_none() || !b.is_none() {
            let take_a = if b.is_none() {
                true
            } else if a.is_none() {
                false
            } else if self.clusters[a].label == self.clusters[b].label {
                let ca = self.find(self.clusters[a].class);
                let cb = self.find(self.clusters[b].class);
                if ca != cb {
                    self.merge_list.push_back((ca, cb));
                }
                let dropped = b;
                b = self.clusters[b].next_with_same_arg;
                self.clusters[dropped].dominant = a;
                self.clusters[dropped].next_with_same_arg = ClusterId::NONE;
                true
            } else {
                self.clusters[a].label > self.clusters[b].label
            };
            let picked = if take_a {
                let n = self.clusters[a].next_with_same_arg;
                let cur = a;
                a = n;
                cur
            } else {
                let n = self.clusters[b].next_with_same_arg;
                let cur = b;
                b = n;
                cur
            };
            if head.is_none() {
                head = picked;
            } else {
                self.clusters[tail].next_with_same_arg = picked;
            }
            tail = picked;
        }
        if !tail.is_none() {
            self.clusters[tail].next_with_same_arg = ClusterId::NONE;
        }
        self.args[to_node].cluster = head;
    }
}
