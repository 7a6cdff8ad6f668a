//! Randomized soundness check: the registry's verdicts must coincide with a
//! brute-force congruence closure computed over the same ground terms.

use congruence_registry::{ClassId, Label, Registry};

/// Deterministic 64-bit LCG so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 16
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

/// A ground term in the reference world: an operator applied to earlier
/// terms.
struct Term {
    label: u32,
    args: Vec<usize>,
}

/// Quadratic reference closure over term indexes.
struct Reference {
    parent: Vec<usize>,
    terms: Vec<Term>,
}

impl Reference {
    fn new(terms: Vec<Term>) -> Self {
        Self {
            parent: (0..terms.len()).collect(),
            terms,
        }
    }

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, i: usize, j: usize) {
        let (i, j) = (self.find(i), self.find(j));
        if i != j {
            self.parent[j] = i;
        }
    }

    fn connected(&self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    /// Repeatedly union terms with equal operators and pairwise-connected
    /// arguments until nothing changes.
    fn close(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.terms.len() {
                for j in i + 1..self.terms.len() {
                    if self.connected(i, j) {
                        continue;
                    }
                    let (a, b) = (&self.terms[i], &self.terms[j]);
                    if a.label != b.label || a.args.len() != b.args.len() {
                        continue;
                    }
                    if a.args
                        .iter()
                        .zip(&b.args)
                        .all(|(&x, &y)| self.connected(x, y))
                    {
                        self.union(i, j);
                        changed = true;
                    }
                }
            }
            if !changed {
                return;
            }
        }
    }
}

fn run_scenario(seed: u64, term_count: usize, merge_count: usize) {
    let mut rng = Lcg(seed);
    let mut reg = Registry::new(400, 400, 4000, 20);
    let mut terms = Vec::new();
    let mut classes: Vec<ClassId> = Vec::new();

    for i in 0..term_count {
        let label = rng.below(8) as u32;
        let arity = if i == 0 { 0 } else { rng.below(3) };
        let mut args = Vec::new();
        for _ in 0..arity {
            let arg = rng.below(i);
            args.push(arg);
            reg.append_to_cluster_arg_list(classes[arg]);
        }
        let class = reg
            .register_cluster(Label::new(label))
            .expect("capacities are sized for the scenario");
        terms.push(Term { label, args });
        classes.push(class);
    }

    let mut reference = Reference::new(terms);
    for _ in 0..merge_count {
        let i = rng.below(term_count);
        let j = rng.below(term_count);
        reg.make_congruent(classes[i], classes[j]);
        reference.union(i, j);
    }
    reference.close();

    for i in 0..term_count {
        for j in i + 1..term_count {
            assert_eq!(
                reg.are_congruent(classes[i], classes[j]),
                reference.connected(i, j),
                "seed {seed}: registry and reference disagree on terms {i} and {j}"
            );
        }
    }
}

#[test]
fn registry_matches_reference_closure_without_merges() {
    run_scenario(11, 40, 0);
}

#[test]
fn registry_matches_reference_closure_with_few_merges() {
    run_scenario(23, 50, 4);
}

#[test]
fn registry_matches_reference_closure_with_many_merges() {
    run_scenario(37, 60, 25);
    run_scenario(41, 60, 25);
    run_scenario(1009, 80, 40);
}

#[test]
fn registry_matches_reference_closure_under_heavy_sharing() {
    // Few labels and few base terms force deep structural overlap.
    let mut rng = Lcg(77);
    let mut reg = Registry::new(400, 400, 4000, 4);
    let mut terms = Vec::new();
    let mut classes: Vec<ClassId> = Vec::new();
    for i in 0..50usize {
        let label = rng.below(3) as u32;
        let arity = if i < 3 { 0 } else { 1 + rng.below(2) };
        let mut args = Vec::new();
        for _ in 0..arity {
            let arg = rng.below(i.max(1));
            args.push(arg);
            reg.append_to_cluster_arg_list(classes[arg]);
        }
        let class = reg.register_cluster(Label::new(label)).unwrap();
        terms.push(Term { label, args });
        classes.push(class);
    }
    let mut reference = Reference::new(terms);
    for _ in 0..20 {
        let i = rng.below(50);
        let j = rng.below(50);
        reg.make_congruent(classes[i], classes[j]);
        reference.union(i, j);
    }
    reference.close();
    for i in 0..50 {
        for j in i + 1..50 {
            assert_eq!(
                reg.are_congruent(classes[i], classes[j]),
                reference.connected(i, j),
                "registry and reference disagree on terms {i} and {j}"
            );
        }
    }
}
