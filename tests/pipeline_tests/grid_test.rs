use expr_server::{
    domain::{DomainSet, TupleMode, VariableDomain},
    request::{ComputationRequest, ComputeError},
    runtime::CancelFlag,
};
use pretty_assertions::assert_eq;

fn run(line: &str) -> Result<f64, ComputeError> {
    ComputationRequest::parse(line)?.run(usize::MAX, &CancelFlag::new())
}

#[test]
fn test_documented_domains() {
    let cancel = CancelFlag::new();
    let values = |lower, step, upper| {
        VariableDomain::new("x", lower, step, upper)
            .unwrap()
            .values(usize::MAX, &cancel)
            .unwrap()
    };
    assert_eq!(values(0.0, 1.0, 3.0), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(values(0.0, 0.1, 0.25), vec![0.0, 0.1, 0.2]);
    assert_eq!(values(5.0, 1.0, 2.0), Vec::<f64>::new());
}

#[test]
fn test_grid_order_with_three_variables() {
    let domains = expr_server::domain::parse_domain_spec("a:0:1:1,b:0:1:1,c:0:1:1").unwrap();
    let set = DomainSet::build(&domains, usize::MAX, &CancelFlag::new()).unwrap();
    let mut tuples = set.tuples(TupleMode::Grid).unwrap();

    let mut seen = Vec::new();
    while let Some(tuple) = tuples.next_tuple() {
        seen.push(tuple.iter().map(|v| *v as u8).collect::<Vec<_>>());
    }
    assert_eq!(
        seen,
        vec![
            vec![0, 0, 0],
            vec![0, 0, 1],
            vec![0, 1, 0],
            vec![0, 1, 1],
            vec![1, 0, 0],
            vec![1, 0, 1],
            vec![1, 1, 0],
            vec![1, 1, 1],
        ]
    );
}

#[test]
fn test_aggregations_over_two_variables() {
    let spec = "x:1:1:3,y:0:0.5:1";
    assert_eq!(run(&format!("COUNT_GRID;{spec};(x*y)")), Ok(9.0));
    assert_eq!(run(&format!("MAX_GRID;{spec};(x*y)")), Ok(3.0));
    assert_eq!(run(&format!("MIN_GRID;{spec};(x*y);(0-x)")), Ok(-3.0));
    // (1*0 + 1*.5 + 1*1 + 2*0 + ... ) / 9 = 9 / 9
    assert_eq!(run(&format!("AVG_GRID;{spec};(x*y)")), Ok(1.0));
    assert_eq!(run(&format!("AVG_LIST;{spec};(x+y)")), Ok(2.5));
}

#[test]
fn test_errors_render_with_category() {
    let render = |line: &str| run(line).unwrap_err().to_string();

    assert_eq!(
        render("MIN_GRID;x:1:1:2;(x/0)"),
        "(EvaluationError) Error while evaluating the expression '(x/0)' : \
         Division by zero at node '(x/0)'"
    );
    assert_eq!(
        render("MIN_LIST;x:0:1:2,y:0:1:1;(x+y)"),
        "(BuildError) All variable value lists must have the same length"
    );
    assert_eq!(
        render("MIN_GRID;x:0:1:2;(x+1)2"),
        "(ParseError) Parsing error for expression '(x+1)2' : \
         Invalid expression format: unexpected trailing input at 5: '2'"
    );
    assert_eq!(
        render("MIN_GRID;x:0:1:2"),
        "(FormatError) Invalid computation request format: request parts < 3"
    );
}
