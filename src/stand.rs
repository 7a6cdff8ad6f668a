//! Operator buckets and their chains.
//!
//! Every class keeps a label-ascending chain of stands, one per root
//! operator its member terms use; every label keeps a designator-ascending,
//! doubly linked chain of all stands carrying it across classes (the variety
//! list). The proof-search layer walks these chains through the accessor
//! methods at the bottom of this file to enumerate candidate terms without
//! ever touching the trie.

use crate::ids::{ClassId, ClusterId, Label, StandId};
use crate::registry::Registry;

impl Registry {
    /// The class a stand currently belongs to. Sentinel in, sentinel out.
    fn stand_class(&self, stand: StandId) -> ClassId {
        self.find(self.clusters[self.stands[stand].first_cluster].class)
    }

    /// Resolve a possibly absorbed cluster to its surviving alias target.
    pub(crate) fn cluster_root(&self, mut cluster: ClusterId) -> ClusterId {
        while self.clusters[cluster].dominant != cluster {
            cluster = self.clusters[cluster].dominant;
        }
        cluster
    }

    /// First cluster at or after `cluster` in its stand chain that is not an
    /// absorbed alias. Aliases linger in the chain after a fold; enumeration
    /// reports each distinct term once.
    fn skip_aliases(&self, mut cluster: ClusterId) -> ClusterId {
        while !cluster.is_none() && self.cluster_root(cluster) != cluster {
            cluster = self.clusters[cluster].next_stand_cluster;
        }
        cluster
    }

    /// The stand for `label` within `class`, or `NONE`.
    fn find_stand(&self, class: ClassId, label: Label) -> StandId {
        let mut stand = self.classes[self.find(class)].first_stand;
        while !stand.is_none() && self.stands[stand].label < label {
            stand = self.stands[stand].next_cc_stand;
        }
        if !stand.is_none() && self.stands[stand].label == label {
            stand
        } else {
            StandId::NONE
        }
    }

    /// Hook a freshly created stand into `label`'s variety chain. New stands
    /// carry the largest designator so far, so they always append at the
    /// tail.
    pub(crate) fn add_to_variety(&mut self, label: Label, stand: StandId) {
        if self.varieties[label.index()].tag.is_none() {
            self.varieties[label.index()].tag = stand;
            self.note_new_label();
        }
        let head = self.varieties[label.index()].first_stand;
        if head.is_none() {
            self.varieties[label.index()].first_stand = stand;
            return;
        }
        let mut tail = head;
        while !self.stands[tail].next_vrty_stand.is_none() {
            tail = self.stands[tail].next_vrty_stand;
        }
        self.stands[tail].next_vrty_stand = stand;
        self.stands[stand].prev_vrty_stand = tail;
    }

    fn remove_stand_from_variety(&mut self, stand: StandId) {
        let label = self.stands[stand].label;
        let prev = self.stands[stand].prev_vrty_stand;
        let next = self.stands[stand].next_vrty_stand;
        if prev.is_none() {
            self.varieties[label.index()].first_stand = next;
        } else {
            self.stands[prev].next_vrty_stand = next;
        }
        if !next.is_none() {
            self.stands[next].prev_vrty_stand = prev;
        }
        self.stands[stand].next_vrty_stand = StandId::NONE;
        self.stands[stand].prev_vrty_stand = StandId::NONE;
    }

    /// Move a whole stand from the absorbed class to `win`.
    fn adopt_stand(&mut self, stand: StandId, win: ClassId) {
        let mut cluster = self.stands[stand].first_cluster;
        while !cluster.is_none() {
            self.clusters[cluster].class = win;
            cluster = self.clusters[cluster].next_stand_cluster;
        }
    }

    /// Fold the absorbed class's stand chain into the winner's, label by
    /// label. Stands on a shared label collapse: their cluster chains join
    /// and the losing stand leaves its variety list for good.
    pub(crate) fn merge_stand_lists(&mut self, win: ClassId, lose: ClassId) {
        let mut a = self.classes[win].first_stand;
        let mut b = self.classes[lose].first_stand;
        self.classes[lose].first_stand = StandId::NONE;
        let mut head = StandId::NONE;
        let mut tail = StandId::NONE;
        while !a.is_none() || !b.is_none() {
            let take_a = if b.is_none() {
                true
            } else if a.is_none() {
                self.adopt_stand(b, win);
                false
            } else if self.stands[a].label == self.stands[b].label {
                let dead = b;
                b = self.stands[b].next_cc_stand;
                self.stands[dead].next_cc_stand = StandId::NONE;
                self.join_cluster_lists(a, dead, win);
                self.remove_stand_from_variety(dead);
                true
            } else if self.stands[a].label < self.stands[b].label {
                true
            } else {
                self.adopt_stand(b, win);
                false
            };
            let picked = if take_a {
                let n = self.stands[a].next_cc_stand;
                let p = a;
                a = n;
                p
            } else {
                let n = self.stands[b].next_cc_stand;
                let p = b;
                b = n;
                p
            };
            if head.is_none() {
                head = picked;
            } else {
                self.stands[tail].next_cc_stand = picked;
            }
            tail = picked;
        }
        if !tail.is_none() {
            self.stands[tail].next_cc_stand = StandId::NONE;
        }
        self.classes[win].first_stand = head;
    }

    /// Interleave `s2`'s cluster chain into `s1`'s, designator-ascending,
    /// retagging the incoming clusters to the surviving class.
    fn join_cluster_lists(&mut self, s1: StandId, s2: StandId, win: ClassId) {
        let mut b = self.stands[s2].first_cluster;
        self.stands[s2].first_cluster = ClusterId::NONE;
        let mut cur = b;
        while !cur.is_none() {
            self.clusters[cur].class = win;
            cur = self.clusters[cur].next_stand_cluster;
        }
        let mut a = self.stands[s1].first_cluster;
        let mut head = ClusterId::NONE;
        let mut tail = ClusterId::NONE;
        while !a.is_none() || !b.is_none() {
            let take_a = if b.is_none() {
                true
            } else if a.is_none() {
                false
            } else {
                a < b
            };
            let picked = if take_a {
                let n = self.clusters[a].next_stand_cluster;
                let p = a;
                a = n;
                p
            } else {
                let n = self.clusters[b].next_stand_cluster;
                let p = b;
                b = n;
                p
            };
            self.clusters[picked].prev_stand_cluster = tail;
            if head.is_none() {
                head = picked;
            } else {
                self.clusters[tail].next_stand_cluster = picked;
            }
            tail = picked;
        }
        if !tail.is_none() {
            self.clusters[tail].next_stand_cluster = ClusterId::NONE;
        }
        self.stands[s1].first_cluster = head;
    }

    // ------------------------------------------------------------------
    // Enumeration accessors
    // ------------------------------------------------------------------

    /// Next class (after `accessor`, or the first when `accessor` is the
    /// sentinel) whose members include a term rooted in `label`.
    pub fn advance_class_accessor(&self, label: Label, accessor: ClassId) -> ClassId {
        if label.index() >= self.varieties.len() {
            return ClassId::NONE;
        }
        let mut stand = self.varieties[label.index()].first_stand;
        if accessor.is_none() {
            return self.stand_class(stand);
        }
        let target = self.find(accessor);
        while !stand.is_none() {
            if self.stand_class(stand) == target {
                return self.stand_class(self.stands[stand].next_vrty_stand);
            }
            stand = self.stands[stand].next_vrty_stand;
        }
        ClassId::NONE
    }

    /// Whether `accessor` is the last class in `label`'s variety chain.
    pub fn is_variety_maximal(&self, label: Label, accessor: ClassId) -> bool {
        self.advance_class_accessor(label, accessor).is_none()
    }

    /// Whether `class` is a dominant root usable as an accessor under a
    /// registered `label`. Absorbed classes are not minimal.
    pub fn is_minimal_class_designator(&self, label: Label, class: ClassId) -> bool {
        !class.is_none() && self.find(class) == class && self.is_registry_label(label)
    }

    /// Next cluster (after `accessor`, or the first when `accessor` is the
    /// sentinel) among `class`'s terms rooted in `label`.
    pub fn advance_cluster_accessor(
        &self,
        class: ClassId,
        label: Label,
        accessor: ClusterId,
    ) -> ClusterId {
        let stand = self.find_stand(class, label);
        if stand.is_none() {
            return ClusterId::NONE;
        }
        if accessor.is_none() {
            return self.skip_aliases(self.stands[stand].first_cluster);
        }
        let root = self.cluster_root(accessor);
        self.skip_aliases(self.clusters[root].next_stand_cluster)
    }

    /// Whether `accessor` is the last cluster of `class`'s stand for `label`.
    pub fn is_stand_maximal(&self, class: ClassId, label: Label, accessor: ClusterId) -> bool {
        self.advance_cluster_accessor(class, label, accessor).is_none()
    }

    /// Whether `cluster` is a surviving (non-alias) cluster and `class` a
    /// minimal accessor for `label`.
    pub fn is_minimal_stand_cluster_designator(
        &self,
        class: ClassId,
        label: Label,
        cluster: ClusterId,
    ) -> bool {
        !cluster.is_none()
            && self.cluster_root(cluster) == cluster
            && self.is_minimal_class_designator(label, class)
    }
}
