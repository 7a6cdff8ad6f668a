//! The two reflexive-succedent shortcuts: the immediate check at
//! registration time and the bingo test that fires during a later merge.

use congruence_registry::{Attribute, GoalPolicy, Label, Registry};

const OP_EQUALS: Label = Label::new(2);
const ULTIMATE: u32 = 2;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_registry() -> Registry {
    Registry::new(10, 10, 1000, 10)
}

#[test]
fn identical_arguments_prove_at_registration() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();

    // Succedent `x = x`.
    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(x);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    assert!(goal.is_none());
    assert!(reg.is_proved());
}

#[test]
fn previously_merged_arguments_prove_at_registration() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();
    reg.make_congruent(x, y);

    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    assert!(goal.is_none());
    assert!(reg.is_proved());
}

#[test]
fn merge_after_registration_fires_the_bingo() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();

    // Succedent `x = y`, not yet discharged.
    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    assert!(!goal.is_none());
    assert!(!reg.is_proved());
    reg.update_class_attributes(goal, Attribute::single(ULTIMATE));

    // The antecedent later supplies x = y.
    reg.make_congruent(x, y);
    assert!(reg.is_proved());
}

/// Same shortcut with the argument order reversed, so the other occurrence
/// orientation is the one that matches.
#[test]
fn bingo_fires_for_the_reversed_argument_order() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();

    reg.append_to_cluster_arg_list(y);
    reg.append_to_cluster_arg_list(x);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    reg.update_class_attributes(goal, Attribute::single(ULTIMATE));

    reg.make_congruent(x, y);
    assert!(reg.is_proved());
}

#[test]
fn bingo_fires_through_a_transitive_chain() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();
    let z = reg.register_cluster(Label::new(5)).unwrap();

    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    reg.update_class_attributes(goal, Attribute::single(ULTIMATE));

    reg.make_congruent(x, z);
    assert!(!reg.is_proved());
    reg.make_congruent(z, y);
    assert!(reg.is_proved());
}

/// Without the ultimate marker on the equality's class, the merge is just a
/// merge.
#[test]
fn bingo_requires_the_marker_bit() {
    init_logs();
    let mut reg = new_registry();
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();

    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    assert!(!goal.is_none());

    reg.make_congruent(x, y);
    assert!(!reg.is_proved());
    assert!(reg.are_congruent(x, y));
}

/// A non-reflexive operator over congruent arguments is not a goal.
#[test]
fn non_reflexive_operators_never_shortcut() {
    init_logs();
    let mut reg = new_registry();
    let x = reg.register_cluster(Label::new(3)).unwrap();

    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(x);
    let cluster_class = reg.register_cluster(Label::new(1)).unwrap();
    assert!(!cluster_class.is_none());
    assert!(!reg.is_proved());
}

/// The marker bit is policy, not hard-coded: a registry configured with a
/// different marker honors it.
#[test]
fn marker_bit_follows_the_goal_policy() {
    init_logs();
    let policy = GoalPolicy {
        goal_bit_count: 3,
        reflexive_marker_bit: 5,
    };
    let mut reg = Registry::with_goal_policy(10, 10, 1000, 10, policy);
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();

    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    reg.update_class_attributes(goal, Attribute::single(ULTIMATE));

    reg.make_congruent(x, y);
    assert!(!reg.is_proved());

    let mut reg = Registry::with_goal_policy(10, 10, 1000, 10, policy);
    reg.add_succedent_reflexive_operator(OP_EQUALS);
    let x = reg.register_cluster(Label::new(3)).unwrap();
    let y = reg.register_cluster(Label::new(4)).unwrap();
    reg.append_to_cluster_arg_list(x);
    reg.append_to_cluster_arg_list(y);
    let goal = reg.register_cluster(OP_EQUALS).unwrap();
    reg.update_class_attributes(goal, Attribute::single(5));
    reg.make_congruent(x, y);
    assert!(reg.is_proved());
}
