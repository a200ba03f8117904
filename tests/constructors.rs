use ladle::{parse, ExprKind};

#[test]
fn array_constructor_with_one_dimension() {
    let expr = parse("new int[3]").unwrap();
    assert_eq!((expr.start, expr.end), (0, 10));
    match &expr.kind {
        ExprKind::ArrayConstructor { type_name, dims, initializer } => {
            assert!(matches!(type_name.kind, ExprKind::QualifiedId(_)));
            assert_eq!(dims.len(), 1);
            assert!(matches!(dims[0].as_ref().unwrap().kind, ExprKind::Int(3)));
            assert!(initializer.is_none());
        }
        other => panic!("expected array constructor, got {:?}", other),
    }
}

#[test]
fn omitted_dimension_sizes_are_recorded_as_none() {
    let expr = parse("new int[3][]").unwrap();
    match &expr.kind {
        ExprKind::ArrayConstructor { dims, .. } => {
            assert_eq!(dims.len(), 2);
            assert!(dims[0].is_some());
            assert!(dims[1].is_none());
        }
        other => panic!("expected array constructor, got {:?}", other),
    }
}

#[test]
fn array_constructor_with_initializer() {
    let expr = parse("new int[]{1, 2, 3}").unwrap();
    match &expr.kind {
        ExprKind::ArrayConstructor { dims, initializer, .. } => {
            assert_eq!(dims.len(), 1);
            assert!(dims[0].is_none());
            assert_eq!(initializer.as_ref().unwrap().len(), 3);
        }
        other => panic!("expected array constructor, got {:?}", other),
    }
}

#[test]
fn class_constructor_with_arguments() {
    let expr = parse("new java.util.ArrayList(10)").unwrap();
    match &expr.kind {
        ExprKind::Constructor { type_name, args } => {
            match &type_name.kind {
                ExprKind::QualifiedId(segments) => assert_eq!(segments.len(), 3),
                other => panic!("expected qualified id, got {:?}", other),
            }
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected constructor, got {:?}", other),
    }
}

#[test]
fn constructor_with_empty_arguments() {
    let expr = parse("new Object()").unwrap();
    assert!(matches!(expr.kind, ExprKind::Constructor { ref args, .. } if args.is_empty()));
}

#[test]
fn constructed_value_continues_the_chain() {
    let expr = parse("new int[]{1, 2}.length").unwrap();
    match &expr.kind {
        ExprKind::Compound(pieces) => {
            assert!(matches!(pieces[0].kind, ExprKind::ArrayConstructor { .. }));
            assert!(matches!(pieces[1].kind, ExprKind::Property { ref name, .. } if name == "length"));
        }
        other => panic!("expected compound, got {:?}", other),
    }
}
