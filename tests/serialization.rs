use ladle::{ast_to_json, parse, parse_template};
use serde_json::Value;

#[test]
fn ast_serializes_to_json_with_spans() {
    let expr = parse("1 + 2").unwrap();
    let json = ast_to_json(&expr).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["start"], 0);
    assert_eq!(value["end"], 5);
    assert!(value["kind"]["Binary"].is_array());
}

#[test]
fn operator_variants_appear_by_name() {
    let expr = parse("a and b").unwrap();
    let json = ast_to_json(&expr).unwrap();
    assert!(json.contains("\"And\""));

    let expr = parse("items.?[x]").unwrap();
    let json = ast_to_json(&expr).unwrap();
    assert!(json.contains("Selection"));
    assert!(json.contains("\"All\""));
}

#[test]
fn expressions_and_fragments_serialize() {
    let result = parse_template("Hello #{name}!").unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["source"], "Hello #{name}!");

    let fragments = &value["body"]["Composite"];
    assert!(fragments.is_array());
    assert_eq!(fragments.as_array().unwrap().len(), 3);
    assert_eq!(fragments[0]["Literal"], "Hello ");
}

#[test]
fn serialization_is_deterministic() {
    let input = "new int[]{1, 2}.length gt #limit ?: {a: 1}";
    let a = ast_to_json(&parse(input).unwrap()).unwrap();
    let b = ast_to_json(&parse(input).unwrap()).unwrap();
    assert_eq!(a, b);
}
