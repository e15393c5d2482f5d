use crate::{
    query::{Combinator, Criteria, Operator, SortCondition},
    test_fixtures::Customer,
    value::Value,
};

fn samples() -> Vec<Customer> {
    vec![
        Customer::sample("Ada", "Lovelace", 36),
        Customer::sample("Alan", "Turing", 41),
        Customer::sample("Grace", "Hopper", 42).with_nickname("Amazing"),
    ]
}

#[test]
fn criteria_roundtrip_is_observably_equal() {
    let criteria = Criteria::<Customer>::always()
        .and("age", Operator::GreaterThan, 36_u64)
        .unwrap()
        .and("nickname", Operator::IsNotNull, Value::Null)
        .unwrap();

    let json = serde_json::to_string(&criteria).unwrap();
    let decoded: Criteria<Customer> = serde_json::from_str(&json).unwrap();

    let original = criteria.compile().unwrap();
    let revived = decoded.compile().unwrap();

    for customer in samples() {
        assert_eq!(original.matches(&customer), revived.matches(&customer));
    }
}

#[test]
fn criteria_roundtrip_preserves_shared_topology() {
    let mut criteria = Criteria::<Customer>::always();
    let leaf = criteria.graph_mut().push_leaf(
        "age".to_string(),
        Operator::GreaterThan,
        Value::Uint(40),
        Combinator::And,
    );
    criteria.graph_mut().attach_existing(leaf);

    let json = serde_json::to_string(&criteria).unwrap();
    let decoded: Criteria<Customer> = serde_json::from_str(&json).unwrap();

    // The shared reference decodes as a reference, not a second copy.
    assert_eq!(decoded.graph().node_count(), criteria.graph().node_count());

    let original = criteria.compile().unwrap();
    let revived = decoded.compile().unwrap();
    for customer in samples() {
        assert_eq!(original.matches(&customer), revived.matches(&customer));
    }
}

#[test]
fn sort_condition_roundtrip_orders_identically() {
    let sort = SortCondition::<Customer>::order_by("age")
        .unwrap()
        .then_by_desc("first_name")
        .unwrap();

    let json = serde_json::to_string(&sort).unwrap();
    let decoded: SortCondition<Customer> = serde_json::from_str(&json).unwrap();
    assert_eq!(sort.items(), decoded.items());

    let original = sort.compile().unwrap().unwrap();
    let revived = decoded.compile().unwrap().unwrap();

    let mut left = samples();
    let mut right = samples();
    original.sort(&mut left);
    revived.sort(&mut right);
    assert_eq!(left, right);
}

#[test]
fn enumerants_serialize_by_stable_name() {
    let criteria = Criteria::<Customer>::always()
        .and("age", Operator::GreaterThanOrEqual, 36_u64)
        .unwrap();

    let json = serde_json::to_string(&criteria).unwrap();
    assert!(json.contains("\"GreaterThanOrEqual\""));
    assert!(json.contains("\"And\""));
    assert!(json.contains("fixtures::Customer"));
}

#[test]
fn values_reconstruct_their_scalar_type() {
    let criteria = Criteria::<Customer>::always()
        .and("score", Operator::Equal, 1.5_f64)
        .unwrap()
        .and("first_name", Operator::Equal, "Ada")
        .unwrap();

    let json = serde_json::to_string(&criteria).unwrap();
    let decoded: Criteria<Customer> = serde_json::from_str(&json).unwrap();

    assert_eq!(criteria.graph(), decoded.graph());
}
