//! Integration tests for projecting value objects back to plain data.

use indexmap::IndexMap;
use serde_json::json;
use valobj::{
    recursive_json, value_object, Data, Serializable, Shaped, ToData, ValidationAggregator,
    ValueObject,
};

fn parse_label(value: &Data, errs: &ValidationAggregator) -> Shaped<String> {
    match value.as_str() {
        Some(label) => Ok(label.to_string()),
        None => errs.fail("must be a string"),
    }
}

value_object! {
    pub struct Label(String) = parse_label;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteProps {
    title: Label,
    body: Option<String>,
    tags: IndexMap<String, Label>,
}

impl ToData for NoteProps {
    fn to_data(&self) -> Data {
        Data::object([
            ("title", self.title.to_data()),
            ("body", self.body.to_data()),
            ("tags", self.tags.to_data()),
        ])
    }
}

fn parse_note(value: &Data, errs: &ValidationAggregator) -> Shaped<NoteProps> {
    let title = Label::create_in(value.get("title"), &errs.with_path("title"));
    let body = match value.get("body") {
        Data::Undefined => None,
        other => Some(parse_label(other, &errs.with_path("body"))?),
    };

    let mut tags = IndexMap::new();
    if let Some(fields) = value.get("tags").as_object() {
        let scope = errs.with_path("tags");
        for (key, tag) in fields {
            if let Ok(label) = Label::create_in(tag, &scope.with_path(key)) {
                tags.insert(key.clone(), label);
            }
        }
    }

    Ok(NoteProps {
        title: title?,
        body,
        tags,
    })
}

value_object! {
    pub struct Note(NoteProps) = parse_note;
}

#[test]
fn test_undefined_fields_are_preserved() {
    let note = Note::create(json!({"title": "hello"})).unwrap();
    let serialized = note.as_json();

    let fields = serialized.as_object().unwrap();
    assert_eq!(fields.len(), 3);
    assert!(fields["body"].is_undefined());

    assert_eq!(note.to_json(), json!({"title": "hello", "tags": {}}));
}

#[test]
fn test_keyed_children_keep_order() {
    let note = Note::create(json!({
        "title": "t",
        "tags": {"zeta": "z", "alpha": "a"}
    }))
    .unwrap();

    let serialized = note.as_json();
    let keys: Vec<&String> = serialized.get("tags").as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_round_trip_is_value_equal() {
    let note = Note::create(json!({
        "title": "t",
        "body": "b",
        "tags": {"k": "v"}
    }))
    .unwrap();

    let rebuilt = Note::from_json(note.as_json()).unwrap();
    assert_eq!(rebuilt, note);
    assert!(!rebuilt.same_instance(&note));
    assert_eq!(rebuilt.as_json(), note.as_json());
}

#[test]
fn test_serializing_twice_is_stable() {
    let note = Note::create(json!({"title": "t"})).unwrap();
    assert_eq!(note.serializer().as_json(), note.serializer().as_json());
}

#[test]
fn test_serializable_capability() {
    let label = Label::create("x").unwrap();
    let object: &dyn Serializable = &label;

    assert_eq!(object.type_name(), "Label");
    assert_eq!(object.serialize(), Data::from("x"));
}

#[test]
fn test_recursive_json_walks_mixed_trees() {
    let label = Label::create("inner").unwrap();
    let tree = Data::object([
        ("label", Data::from(label)),
        ("list", Data::Array(vec![Data::from(1), Data::Null])),
        ("missing", Data::Undefined),
    ]);

    let plain = recursive_json(&tree);

    assert_eq!(plain.get("label"), &Data::from("inner"));
    assert!(plain.get("missing").is_undefined());
    assert_eq!(plain.to_json(), json!({"label": "inner", "list": [1, null]}));
}
