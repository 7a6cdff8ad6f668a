//! Class merging: worklist-driven union with congruence propagation.
//!
//! `make_congruent` is the only entry point. Each popped pair is re-resolved
//! against the current union-find state, the numerically smaller dominant
//! survives, attributes are ORed onto it, and the two proof tests run before
//! any structural work: the goal bit count, then the reflexivity bingo. Only
//! if neither fires does the absorbed class's trie and stand state migrate,
//! which may in turn enqueue newly congruent pairs.

use log::{debug, trace};

use crate::ids::{ArgId, ClassId};
use crate::registry::Registry;

impl Registry {
    /// Assert that `first` and `second` denote the same value and propagate
    /// congruence to a fixed point. No-op once the VC is proved.
    pub fn make_congruent(&mut self, first: ClassId, second: ClassId) {
        if self.proved || first.is_none() || second.is_none() {
            return;
        }
        self.merge_list.push_back((first, second));
        while let Some((x, y)) = self.merge_list.pop_front() {
            let x = self.find_mut(x);
            let y = self.find_mut(y);
            if x == y {
                continue;
            }
            let (win, lose) = if x < y { (x, y) } else { (y, x) };
            trace!("merging {lose:?} into {win:?}");

            let merged = self.classes[win].attribute.union(self.classes[lose].attribute);
            self.classes[win].attribute = merged;
            if self.goal_satisfied(merged) {
                debug!("merge of {lose:?} into {win:?} completed attribute {merged:?}");
                self.proved = true;
                self.merge_list.clear();
                return;
            }
            if self.reflexive_test_armed && self.reflexivity_bingo(win, lose) {
                debug!("reflexivity bingo on merge of {lose:?} into {win:?}");
                self.proved = true;
                self.merge_list.clear();
                return;
            }

            self.classes[lose].dominant = win;
            self.merge_stand_lists(win, lose);
            // Deepest occurrences first, so suffix merges see already
            // relabeled subtrees below them.
            for level in (1..=self.classes[lose].last_asop_level).rev() {
                self.reindex_level(win, lose, level);
            }
        }
    }

    /// The merge-time half of the reflexive shortcut.
    ///
    /// An armed registry holds some succedent term `op(s, t)` with `op`
    /// reflexive whose class carries the reflexive marker bit. Merging the
    /// classes of `s` and `t` makes that term an instance of `op(z, z)`,
    /// which discharges the VC. One of the two classes occurs at argument
    /// depth 1 of such a term and the other at depth 2; both orientations
    /// are checked.
    fn reflexivity_bingo(&self, win: ClassId, lose: ClassId) -> bool {
        let lose_asop = &self.classes[lose].asop;
        let win_asop = &self.classes[win].asop;
        if !lose_asop[2].is_none() && !win_asop[1].is_none() {
            if self.bingo_scan(lose_asop[2], win) {
                return true;
            }
        }
        if !win_asop[2].is_none() && !lose_asop[1].is_none() {
            if self.bingo_scan(win_asop[2], lose) {
                return true;
            }
        }
        false
    }

    /// Walk a depth-2 occurrence chain looking for a term whose first
    /// argument is `other` and whose cluster chain holds a marked reflexive
    /// operator.
    fn bingo_scan(&self, mut occ: ArgId, other: ClassId) -> bool {
        let other = self.find(other);
        while !occ.is_none() {
            let parent = self.args[occ].prev_arg;
            if !parent.is_none() && self.find(self.args[parent].cc) == other {
                let mut cluster = self.args[occ].cluster;
                while !cluster.is_none() {
                    let label = self.clusters[cluster].label;
                    let class = self.find(self.clusters[cluster].class);
                    if self.reflexive_ops.contains(&label)
                        && self.classes[class]
                            .attribute
                            .contains(self.goal.reflexive_marker_bit)
                    {
                        return true;
                    }
                    cluster = self.clusters[cluster].next_with_same_arg;
                }
            }
            occ = self.args[occ].next_same_cc_in_level;
        }
        false
    }
}
