use ladle::{parse, Expr};

// every node's span must sit inside its parent's, and siblings must
// appear in source order
fn assert_well_nested(expr: &Expr, lo: usize, hi: usize) {
    assert!(
        lo <= expr.start && expr.start <= expr.end && expr.end <= hi,
        "span ({}, {}) escapes enclosing ({}, {})",
        expr.start,
        expr.end,
        lo,
        hi
    );
    let mut previous_start = expr.start;
    for child in expr.children() {
        assert!(
            previous_start <= child.start,
            "child at {} precedes its left sibling at {}",
            child.start,
            previous_start
        );
        assert_well_nested(child, expr.start, expr.end);
        previous_start = child.start;
    }
}

fn check(input: &str) {
    let expr = parse(input).unwrap();
    assert_well_nested(&expr, 0, input.len());
}

#[test]
fn spans_nest_across_the_grammar() {
    check("2 + 3 * 4 ^ -5");
    check("a.b.c?.d[0].![price]");
    check("items.?[price > 10 and qty lt 5]");
    check("x = (cond ? #f(1, 2) : {k: v, 'q': {1, 2}})");
    check("new java.util.ArrayList(10)");
    check("new int[3][]{1, 2, 3}");
    check("T(java.lang.String[][]) instanceof T(Object)");
    check("@bean.method(#var, 'text').field ?: --counter");
}

#[test]
fn root_span_covers_the_token_range() {
    let expr = parse("  1 + 2  ").unwrap();
    assert_eq!((expr.start, expr.end), (2, 7));
}

#[test]
fn literal_spans_include_their_suffixes() {
    let expr = parse("42L").unwrap();
    assert_eq!((expr.start, expr.end), (0, 3));
    let expr = parse("0xFFL").unwrap();
    assert_eq!((expr.start, expr.end), (0, 5));
    let expr = parse("'ab'").unwrap();
    assert_eq!((expr.start, expr.end), (0, 4));
}
