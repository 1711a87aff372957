//! JSON form of the AST, as printed by `lumen ast`

use lumen_runtime::{parse_program, VersionedProgram, AST_VERSION};
use pretty_assertions::assert_eq;

#[test]
fn test_versioned_json_shape() {
    let program = parse_program("let x = 1").unwrap();
    let json = VersionedProgram::new(program).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["ast_version"], AST_VERSION);
    assert!(value["body"].is_array());
    assert_eq!(value["body"].as_array().unwrap().len(), 1);
}

#[test]
fn test_json_reads_back() {
    let source = "func f(a, b) { { a, b: a * b } } const o = f(2, 3); o.b; o[1]";
    let program = parse_program(source).unwrap();
    let json = VersionedProgram::new(program.clone()).to_json().unwrap();

    let restored = VersionedProgram::from_json(&json).unwrap();
    assert_eq!(restored.ast_version, AST_VERSION);
    assert_eq!(restored.program, program);
}
