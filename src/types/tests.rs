use pretty_assertions::assert_eq;

use super::types::{Type, TypeId, TypeUniverse};
use crate::ast::types::TypeAnnoKind;

#[test]
fn test_primitives_are_preinterned() {
    let mut universe = TypeUniverse::new();

    assert_eq!(universe.len(), 6);
    assert_eq!(universe.intern(Type::Int), TypeId::INT);
    assert_eq!(universe.intern(Type::Unit), TypeId::UNIT);
    assert_eq!(universe.get(TypeId::STRING), &Type::String);
    assert_eq!(universe.len(), 6);
}

#[test]
fn test_function_types_are_deduplicated() {
    let mut universe = TypeUniverse::new();

    let first = universe.function(vec![TypeId::INT, TypeId::INT], TypeId::INT);
    let second = universe.function(vec![TypeId::INT, TypeId::INT], TypeId::INT);
    let other = universe.function(vec![TypeId::INT], TypeId::INT);

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(universe.len(), 8);
}

#[test]
fn test_nested_function_types() {
    let mut universe = TypeUniverse::new();

    let inner = universe.function(vec![], TypeId::BOOL);
    let outer = universe.function(vec![inner, TypeId::CHAR], TypeId::UNIT);

    assert_eq!(universe.display(outer), "(() -> bool, char) -> unit");
    assert_eq!(
        universe.as_function(outer),
        Some((&[inner, TypeId::CHAR][..], TypeId::UNIT))
    );
    assert_eq!(universe.as_function(TypeId::INT), None);
}

#[test]
fn test_display_primitives() {
    let universe = TypeUniverse::new();

    let names: Vec<String> = [
        TypeId::INT,
        TypeId::FLOAT,
        TypeId::CHAR,
        TypeId::STRING,
        TypeId::BOOL,
        TypeId::UNIT,
    ]
    .iter()
    .map(|id| universe.display(*id))
    .collect();

    assert_eq!(names, vec!["int", "float", "char", "string", "bool", "unit"]);
}

#[test]
fn test_from_anno() {
    assert_eq!(TypeUniverse::from_anno(TypeAnnoKind::Float), TypeId::FLOAT);
    assert_eq!(TypeUniverse::from_anno(TypeAnnoKind::Bool), TypeId::BOOL);
    assert!(TypeId::INT.is_numeric());
    assert!(!TypeId::CHAR.is_numeric());
}
