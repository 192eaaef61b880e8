use expr_server::{
    domain::{DomainSet, TupleMode, VariableDomain},
    expression::Expression,
    runtime::CancelFlag,
};
use proptest::prelude::*;

fn expression_source() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        "[a-z][a-z0-9]{0,4}",
    ];
    leaf.prop_recursive(6, 64, 2, |inner| {
        (
            inner.clone(),
            prop::sample::select(vec!['+', '-', '*', '/', '^']),
            inner,
        )
            .prop_map(|(left, op, right)| format!("({left}{op}{right})"))
    })
}

proptest! {
    #[test]
    fn prop_valid_expressions_parse_completely(source in expression_source()) {
        let expression = Expression::parse(&source).unwrap();
        prop_assert_eq!(expression.source(), source.as_str());

        let reparsed = Expression::parse(&expression.root().to_string()).unwrap();
        prop_assert_eq!(reparsed.root(), expression.root());
    }

    #[test]
    fn prop_grid_count_is_product_of_domain_sizes(
        sizes in prop::collection::vec(0usize..6, 1..4)
    ) {
        let domains: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| {
                // size 0 gives a reversed, empty range
                let upper = *size as f64 - 1.0;
                VariableDomain::new(format!("v{i}"), 0.0, 1.0, upper).unwrap()
            })
            .collect();
        let set = DomainSet::build(&domains, usize::MAX, &CancelFlag::new()).unwrap();
        let expected: usize = sizes.iter().product();

        let mut tuples = set.tuples(TupleMode::Grid).unwrap();
        prop_assert_eq!(tuples.len(), expected);
        let mut produced = 0;
        while tuples.next_tuple().is_some() {
            produced += 1;
        }
        prop_assert_eq!(produced, expected);
    }

    #[test]
    fn prop_list_yields_one_tuple_per_index(len in 1usize..20, width in 1usize..4) {
        let domains: Vec<_> = (0..width)
            .map(|i| {
                let lower = (i * 100) as f64;
                VariableDomain::new(format!("v{i}"), lower, 1.0, lower + len as f64 - 1.0).unwrap()
            })
            .collect();
        let set = DomainSet::build(&domains, usize::MAX, &CancelFlag::new()).unwrap();
        let mut tuples = set.tuples(TupleMode::List).unwrap();

        let mut index = 0;
        while let Some(tuple) = tuples.next_tuple() {
            for (i, value) in tuple.iter().enumerate() {
                prop_assert_eq!(*value, (i * 100 + index) as f64);
            }
            index += 1;
        }
        prop_assert_eq!(index, len);
    }
}
