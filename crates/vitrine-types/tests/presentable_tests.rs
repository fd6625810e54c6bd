use std::any::Any;
use vitrine_types::*;

/// Record whose type is only known at runtime, e.g. a row from a generic table.
#[derive(Debug)]
struct Row {
    table: String,
    id: u64,
}

impl Presentable for Row {
    fn type_tag(&self) -> TypeTag {
        TypeTag::new(format!("table.{}", self.table))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_runtime_tag() {
    let row = Value::object(Row {
        table: "users".to_string(),
        id: 5,
    });

    assert_eq!(row.type_tag(), Some(TypeTag::new("table.users")));
    assert_eq!(row.downcast_ref::<Row>().map(|r| r.id), Some(5));
}

#[test]
fn test_inclusions_from_owned_list() {
    let paths = vec!["author".to_string(), "comments.author".to_string()];
    let inclusions = Inclusions::from(paths.as_slice());

    assert_eq!(inclusions.len(), 2);
    assert_eq!(inclusions.into_vec(), paths);
}
