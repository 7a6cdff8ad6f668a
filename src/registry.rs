//! The registry: owner of all tables and the public proof-session contract.
//!
//! One `Registry` value is one proof session: it is created with fixed
//! capacities, driven to a proved/not-proved verdict through term
//! registration and equality assertion, and then discarded. There is no
//! ambient state; everything lives in the struct.

use hashbrown::HashSet;
use log::debug;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::ids::{Arena, ArgId, ClassId, ClusterId, Label, StandId};
use crate::record::{
    Attribute, CongruenceClass, CongruenceCluster, ClusterArgument, GoalPolicy, Stand, VarietyList,
    MAX_ARG_DEPTH,
};
use crate::Error;

/// Congruence class registry for one sequent VC.
pub struct Registry {
    pub(crate) classes: Arena<ClassId, CongruenceClass>,
    pub(crate) clusters: Arena<ClusterId, CongruenceCluster>,
    pub(crate) args: Arena<ArgId, ClusterArgument>,
    pub(crate) stands: Arena<StandId, Stand>,
    /// Indexed directly by operator label.
    pub(crate) varieties: Vec<VarietyList>,

    /// Pending argument signature being built by the client, FIFO.
    arg_queue: VecDeque<ClassId>,
    /// Class pairs still to be merged; congruence propagation terminates
    /// when this drains.
    pub(crate) merge_list: VecDeque<(ClassId, ClassId)>,
    /// Operators the succedent uses reflexively; seeds both proof shortcuts.
    pub(crate) reflexive_ops: HashSet<Label>,

    /// Root of the signature trie; nullary clusters anchor directly on it.
    pub(crate) trie_root: ArgId,
    pub(crate) goal: GoalPolicy,
    pub(crate) proved: bool,
    /// Set once a reflexive succedent operator failed the immediate check;
    /// enables the bingo test on later merges.
    pub(crate) reflexive_test_armed: bool,

    labels_in_use: usize,
}

impl Registry {
    /// A registry with the default [`GoalPolicy`] and the given upper bounds
    /// on classes, clusters, signature-trie nodes, and operator labels.
    pub fn new(
        cc_capacity: usize,
        cluster_capacity: usize,
        arg_capacity: usize,
        root_label_capacity: usize,
    ) -> Self {
        Self::with_goal_policy(
            cc_capacity,
            cluster_capacity,
            arg_capacity,
            root_label_capacity,
            GoalPolicy::default(),
        )
    }

    pub fn with_goal_policy(
        cc_capacity: usize,
        cluster_capacity: usize,
        arg_capacity: usize,
        root_label_capacity: usize,
        goal: GoalPolicy,
    ) -> Self {
        let mut args = Arena::with_capacity(arg_capacity);
        // The root is a real node so depth-1 siblings hang off `next_arg`
        // like any other level.
        let trie_root = args.push(ClusterArgument::default());
        Self {
            classes: Arena::with_capacity(cc_capacity),
            clusters: Arena::with_capacity(cluster_capacity),
            args,
            // Stands are allocated in lockstep with clusters.
            stands: Arena::with_capacity(cluster_capacity),
            varieties: vec![VarietyList::default(); root_label_capacity],
            arg_queue: VecDeque::new(),
            merge_list: VecDeque::new(),
            reflexive_ops: HashSet::new(),
            trie_root,
            goal,
            proved: false,
            reflexive_test_armed: false,
            labels_in_use: 0,
        }
    }

    // ------------------------------------------------------------------
    // Union-find lookups
    // ------------------------------------------------------------------

    /// Ultimate dominant of `class`, without mutation.
    pub(crate) fn find(&self, mut class: ClassId) -> ClassId {
        while self.classes[class].dominant != class {
            class = self.classes[class].dominant;
        }
        class
    }

    /// Ultimate dominant of `class`, halving the path on the way up.
    pub(crate) fn find_mut(&mut self, mut class: ClassId) -> ClassId {
        while self.classes[class].dominant != class {
            let grandparent = self.classes[self.classes[class].dominant].dominant;
            self.classes[class].dominant = grandparent;
            class = grandparent;
        }
        class
    }

    /// Whether the two classes are congruent under the equalities asserted so
    /// far. Pure query.
    pub fn are_congruent(&self, first: ClassId, second: ClassId) -> bool {
        first == second || self.find(first) == self.find(second)
    }

    // ------------------------------------------------------------------
    // Term construction protocol
    // ------------------------------------------------------------------

    /// Enqueue one argument of the application about to be registered,
    /// left to right.
    pub fn append_to_cluster_arg_list(&mut self, class: ClassId) {
        self.arg_queue.push_back(class);
    }

    /// Length of the pending argument queue.
    pub fn arg_list_len(&self) -> usize {
        self.arg_queue.len()
    }

    /// Pop and return the head of the pending argument queue, for callers
    /// that abandon or rebuild a signature mid-construction.
    pub fn remove_first_arg_designator(&mut self) -> Option<ClassId> {
        self.arg_queue.pop_front()
    }

    /// Whether an application of `label` to the pending arguments is already
    /// interned. The pending queue is left untouched on both outcomes.
    pub fn check_if_registered(&self, label: Label) -> bool {
        if label.index() >= self.varieties.len() {
            return false;
        }
        match self.lookup_pending() {
            Some(node) => !self.cluster_at(node, label).is_none(),
            None => false,
        }
    }

    /// Dominant class of the already-interned application of `label` to the
    /// pending arguments. Consumes the pending queue.
    pub fn get_accessor_for(&mut self, label: Label) -> Result<ClassId, Error> {
        let node = self.lookup_pending();
        self.arg_queue.clear();
        let node = node.ok_or(Error::NotRegistered(label))?;
        let cluster = self.cluster_at(node, label);
        if cluster.is_none() {
            return Err(Error::NotRegistered(label));
        }
        Ok(self.find(self.clusters[cluster].class))
    }

    /// Walk the trie along the pending arguments without mutating anything;
    /// `Some(node)` is the trie node terminating the signature.
    fn lookup_pending(&self) -> Option<ArgId> {
        let mut cur = self.trie_root;
        for &raw in &self.arg_queue {
            let want = self.find(raw);
            let mut child = self.args[cur].next_arg;
            while !child.is_none() && self.find(self.args[child].cc) != want {
                child = self.args[child].alternative;
            }
            if child.is_none() {
                return None;
            }
            cur = child;
        }
        Some(cur)
    }

    /// The cluster with `label` anchored at `node`, or `NONE`.
    fn cluster_at(&self, node: ArgId, label: Label) -> ClusterId {
        let mut cluster = self.args[node].cluster;
        while !cluster.is_none() {
            let record = &self.clusters[cluster];
            // The anchor check skips aliases whose signature migrated to a
            // different node during a merge.
            if record.label == label && record.arg_index == node {
                return cluster;
            }
            cluster = record.next_with_same_arg;
        }
        ClusterId::NONE
    }

    /// Register the application of `label` to the pending arguments,
    /// consuming the queue.
    ///
    /// Interning is idempotent: if the identical (operator, signature) pair
    /// is already registered, its dominant class is returned and no
    /// designator is allocated. Returns `ClassId::NONE` when the VC is (or
    /// just became) proved.
    pub fn register_cluster(&mut self, label: Label) -> Result<ClassId, Error> {
        if label.index() >= self.varieties.len() {
            return Err(Error::LabelCapacity(label, self.varieties.len()));
        }
        if self.arg_queue.len() > MAX_ARG_DEPTH {
            return Err(Error::ArityTooLarge(self.arg_queue.len()));
        }

        // Reflexive succedent shortcut: `x ~ y` under a reflexive operator
        // is proved outright if x and y are already congruent.
        if self.reflexive_ops.contains(&label) && self.arg_queue.len() >= 2 {
            let first = self.arg_queue[0];
            let second = self.arg_queue[1];
            if self.are_congruent(first, second) {
                debug!("reflexive shortcut proved the VC at registration of {label:?}");
                self.proved = true;
                return Ok(ClassId::NONE);
            }
            self.reflexive_test_armed = true;
        }

        if self.proved {
            // The registry still answers but does no further interning work.
            return Ok(ClassId::NONE);
        }

        if self.check_if_registered(label) {
            return self.get_accessor_for(label);
        }

        if self.classes.remaining() == 0 {
            return Err(Error::ClassCapacity(self.classes.in_use()));
        }
        if self.clusters.remaining() == 0 || self.stands.remaining() == 0 {
            return Err(Error::ClusterCapacity(self.clusters.in_use()));
        }
        if self.args.remaining() < self.arg_queue.len() {
            return Err(Error::ArgCapacity {
                in_use: self.args.in_use(),
                needed: self.arg_queue.len(),
            });
        }

        let class = self.classes.next_id();
        let cluster = self.clusters.next_id();
        let stand = self.stands.next_id();
        self.classes.push(CongruenceClass {
            dominant: class,
            attribute: Attribute::EMPTY,
            first_stand: stand,
            asop: [ArgId::NONE; MAX_ARG_DEPTH + 1],
            last_asop_level: 0,
        });
        self.clusters.push(CongruenceCluster {
            label,
            arg_index: ArgId::NONE,
            class,
            dominant: cluster,
            next_with_same_arg: ClusterId::NONE,
            next_stand_cluster: ClusterId::NONE,
            prev_stand_cluster: ClusterId::NONE,
        });
        self.stands.push(Stand {
            label,
            first_cluster: cluster,
            next_cc_stand: StandId::NONE,
            next_vrty_stand: StandId::NONE,
            prev_vrty_stand: StandId::NONE,
        });

        let node = self.intern_pending_args(label, cluster);
        self.clusters[cluster].arg_index = node;
        self.add_to_variety(label, stand);
        debug!("registered {label:?} as class {class:?} (cluster {cluster:?})");
        Ok(class)
    }

    // ------------------------------------------------------------------
    // Proof state
    // ------------------------------------------------------------------

    /// OR `attribute` onto the class's dominant; proves the VC the moment
    /// the merged attribute reaches the configured goal bit count.
    pub fn update_class_attributes(&mut self, class: ClassId, attribute: Attribute) {
        if class.is_none() {
            return;
        }
        let root = self.find_mut(class);
        let merged = self.classes[root].attribute.union(attribute);
        self.classes[root].attribute = merged;
        if self.goal_satisfied(merged) {
            debug!("class {root:?} attribute {merged:?} proves the VC");
            self.proved = true;
        }
    }

    /// Record that the succedent applies `label` reflexively.
    pub fn add_succedent_reflexive_operator(&mut self, label: Label) {
        self.reflexive_ops.insert(label);
    }

    /// Whether the VC has been proved. Monotonic: never reverts to false.
    pub fn is_proved(&self) -> bool {
        self.proved
    }

    pub(crate) fn goal_satisfied(&self, attribute: Attribute) -> bool {
        attribute.count() >= self.goal.goal_bit_count
    }

    // ------------------------------------------------------------------
    // Capacity queries
    // ------------------------------------------------------------------

    pub fn remaining_class_capacity(&self) -> usize {
        self.classes.remaining()
    }

    pub fn remaining_cluster_capacity(&self) -> usize {
        self.clusters.remaining()
    }

    pub fn remaining_arg_capacity(&self) -> usize {
        self.args.remaining()
    }

    pub fn remaining_label_capacity(&self) -> usize {
        self.varieties.len() - self.labels_in_use
    }

    /// Whether `class` is a designator this registry has handed out.
    pub fn is_class_designator(&self, class: ClassId) -> bool {
        !class.is_none() && self.classes.contains(class)
    }

    /// Whether `label` has appeared at the root of some registered term.
    pub fn is_registry_label(&self, label: Label) -> bool {
        label.index() < self.varieties.len() && !self.varieties[label.index()].tag.is_none()
    }

    pub(crate) fn note_new_label(&mut self) {
        self.labels_in_use += 1;
    }

    // ------------------------------------------------------------------
    // Interning helpers (shared with the trie module)
    // ------------------------------------------------------------------

    /// Consume the pending queue, interning missing trie nodes, and return
    /// the node terminating the signature with `cluster` anchored on it.
    fn intern_pending_args(&mut self, label: Label, cluster: ClusterId) -> ArgId {
        let mut cur = self.trie_root;
        let mut level = 0usize;
        while let Some(raw) = self.arg_queue.pop_front() {
            let cc = self.find_mut(raw);
            level += 1;
            cur = self.intern_child(cur, cc, level);
        }
        if self.args[cur].cluster.is_none() {
            self.args[cur].cluster = cluster;
        } else {
            self.chain_same_arg_cluster(label, cur, cluster);
        }
        cur
    }

    /// Child of `parent` labeled `cc`, creating and chaining it if absent.
    fn intern_child(&mut self, parent: ArgId, cc: ClassId, level: usize) -> ArgId {
        let mut prev = ArgId::NONE;
        let mut child = self.args[parent].next_arg;
        while !child.is_none() {
            let edge = self.find(self.args[child].cc);
            if edge == cc {
                return child;
            }
            if edge < cc {
                break;
            }
            prev = child;
            child = self.args[child].alternative;
        }
        // Not present: splice a new node into the descending sibling chain.
        let node = self.args.push(ClusterArgument {
            cc,
            next_arg: ArgId::NONE,
            prev_arg: parent,
            alternative: child,
            cluster: ClusterId::NONE,
            next_same_cc_in_level: ArgId::NONE,
        });
        if prev.is_none() {
            self.args[parent].next_arg = node;
        } else {
            self.args[prev].alternative = node;
        }
        self.update_class_asop(cc, level, node);
        node
    }

    /// Insert `cluster` into the label-descending chain of clusters anchored
    /// at `node` (same signature, different operator).
    fn chain_same_arg_cluster(&mut self, label: Label, node: ArgId, cluster: ClusterId) {
        let head = self.args[node].cluster;
        if self.clusters[head].label < label {
            self.clusters[cluster].next_with_same_arg = head;
            self.args[node].cluster = cluster;
            return;
        }
        let mut prev = head;
        let mut cur = self.clusters[head].next_with_same_arg;
        while !cur.is_none() && self.clusters[cur].label > label {
            prev = cur;
            cur = self.clusters[cur].next_with_same_arg;
        }
        self.clusters[prev].next_with_same_arg = cluster;
        self.clusters[cluster].next_with_same_arg = cur;
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Render one class's member terms, resolving operator labels through
    /// `symbols`. Not part of the proof logic.
    pub fn display_congruence(&self, symbols: &[&str], class: ClassId) -> String {
        let root = self.find(class);
        let mut out = format!("CC{class} -> ");
        let mut stand = self.classes[root].first_stand;
        let mut first = true;
        while !stand.is_none() {
            let mut cluster = self.stands[stand].first_cluster;
            while !cluster.is_none() {
                // Absorbed aliases render identically to their survivor.
                if self.cluster_root(cluster) == cluster {
                    if !first {
                        out.push_str(" | ");
                    }
                    self.display_cluster(symbols, cluster, &mut out);
                    first = false;
                }
                cluster = self.clusters[cluster].next_stand_cluster;
            }
            stand = self.stands[stand].next_cc_stand;
        }
        out
    }

    fn display_cluster(&self, symbols: &[&str], cluster: ClusterId, out: &mut String) {
        let record = &self.clusters[cluster];
        out.push_str(symbols.get(record.label.index()).unwrap_or(&"?"));
        // The prev chain yields arguments deepest-first; reverse back into
        // the order the client pushed them.
        let mut ccs: SmallVec<[ClassId; 4]> = SmallVec::new();
        let mut node = record.arg_index;
        while !node.is_none() && !self.args[node].prev_arg.is_none() {
            ccs.push(self.args[node].cc);
            node = self.args[node].prev_arg;
        }
        for (i, cc) in ccs.iter().rev().enumerate() {
            out.push_str(if i == 0 { " CC" } else { ", CC" });
            out.push_str(&cc.to_string());
        }
    }

    #[cfg(test)]
    pub(crate) fn arg_queue_snapshot(&self) -> Vec<ClassId> {
        self.arg_queue.iter().copied().collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.classes.in_use())
            .field("clusters", &self.clusters.in_use())
            .field("args", &self.args.in_use())
            .field("proved", &self.proved)
            .finish()
    }
}
