use module_info_core::{
    matches, permitted_value, validate_module, validate_module_input, FieldErrors, Module,
    ModuleInput, Validator, EMAIL_RX,
};

fn exam_types(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn numbered_exam_types(count: usize) -> Vec<String> {
    (0..count).map(|index| format!("exam-{index}")).collect()
}

fn errors_for(module: &Module) -> FieldErrors {
    let mut v = Validator::new();
    validate_module(&mut v, module);
    v.into_errors()
}

#[test]
fn module_new_leaves_store_fields_zeroed() {
    let module = Module::new("Algorithms", 90, exam_types(&["written"]));

    assert_eq!(module.id, 0);
    assert_eq!(module.version, 0);
    assert_eq!(module.created_at, 0);
    assert_eq!(module.updated_at, 0);
}

#[test]
fn name_length_boundary_is_500_bytes() {
    let at_limit = Module::new("a".repeat(500), 90, exam_types(&["written"]));
    assert!(errors_for(&at_limit).is_empty());

    let over_limit = Module::new("a".repeat(501), 90, exam_types(&["written"]));
    let errors = errors_for(&over_limit);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors["module_name"],
        "must not be more than 500 bytes long"
    );
}

#[test]
fn name_length_counts_bytes_not_chars() {
    // 250 two-byte characters fit, 251 do not.
    let at_limit = Module::new("é".repeat(250), 90, exam_types(&["written"]));
    assert!(errors_for(&at_limit).is_empty());

    let over_limit = Module::new("é".repeat(251), 90, exam_types(&["written"]));
    assert!(errors_for(&over_limit).contains_key("module_name"));
}

#[test]
fn empty_name_is_rejected() {
    let module = Module::new("", 90, exam_types(&["written"]));
    assert_eq!(errors_for(&module)["module_name"], "must be provided");
}

#[test]
fn duration_boundary_is_one() {
    let zero = Module::new("Algorithms", 0, exam_types(&["written"]));
    assert_eq!(errors_for(&zero)["module_duration"], "must be provided");

    let one = Module::new("Algorithms", 1, exam_types(&["written"]));
    assert!(errors_for(&one).is_empty());

    let negative = Module::new("Algorithms", -1, exam_types(&["written"]));
    assert_eq!(
        errors_for(&negative)["module_duration"],
        "must be a positive integer"
    );
}

#[test]
fn exam_type_cardinality_boundaries() {
    let none = Module::new("Algorithms", 90, Vec::new());
    assert_eq!(
        errors_for(&none)["exam_type"],
        "must contain at least 1 exam type"
    );

    for count in [1, 5] {
        let module = Module::new("Algorithms", 90, numbered_exam_types(count));
        assert!(errors_for(&module).is_empty(), "size {count} should pass");
    }

    let six = Module::new("Algorithms", 90, numbered_exam_types(6));
    assert_eq!(
        errors_for(&six)["exam_type"],
        "must not contain more than 5 exam types"
    );
}

#[test]
fn duplicate_exam_types_are_rejected() {
    let module = Module::new("Algorithms", 90, exam_types(&["written", "oral", "written"]));
    assert_eq!(
        errors_for(&module)["exam_type"],
        "must not contain duplicate values"
    );
}

#[test]
fn first_failed_rule_per_field_is_reported() {
    let duplicates_over_limit = exam_types(&["a", "a", "b", "c", "d", "e"]);
    let module = Module::new("", -3, duplicates_over_limit);

    let errors = errors_for(&module);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors["module_name"], "must be provided");
    assert_eq!(errors["module_duration"], "must be a positive integer");
    assert_eq!(
        errors["exam_type"],
        "must not contain more than 5 exam types"
    );
}

#[test]
fn serialization_uses_wire_names_and_hides_timestamps() {
    let mut module = Module::new("Algorithms", 90, exam_types(&["written"]));
    module.id = 3;
    module.version = 2;
    module.created_at = 1_700_000_000_000;
    module.updated_at = 1_700_000_360_000;

    let json = serde_json::to_value(&module).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "module_name": "Algorithms",
            "module_duration": 90,
            "exam_type": ["written"],
            "version": 2
        })
    );
}

#[test]
fn serialization_omits_zero_duration_and_empty_exam_types() {
    let module = Module::new("Algorithms", 0, Vec::new());

    let json = serde_json::to_value(&module).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("module_duration"));
    assert!(!object.contains_key("exam_type"));
    assert!(!object.contains_key("created_at"));
    assert_eq!(object["module_name"], "Algorithms");
}

#[test]
fn input_deserializes_from_wire_names_and_ignores_store_fields() {
    let value = serde_json::json!({
        "id": 77,
        "version": 9,
        "module_name": "Algorithms",
        "module_duration": 90,
        "exam_type": ["written", "oral"]
    });

    let input: ModuleInput = serde_json::from_value(value).unwrap();
    assert_eq!(
        input.exam_types.as_deref(),
        Some(&["written".to_string(), "oral".to_string()][..])
    );
    let module = Module::from(input);
    assert_eq!(module.id, 0);
    assert_eq!(module.version, 0);
    assert_eq!(module.name, "Algorithms");
    assert_eq!(module.exam_types, exam_types(&["written", "oral"]));
}

#[test]
fn input_keeps_missing_exam_types_apart_from_empty_list() {
    let missing: ModuleInput = serde_json::from_value(serde_json::json!({
        "module_name": "Algorithms",
        "module_duration": 90
    }))
    .unwrap();
    assert_eq!(missing.exam_types, None);

    let null: ModuleInput = serde_json::from_value(serde_json::json!({
        "module_name": "Algorithms",
        "module_duration": 90,
        "exam_type": null
    }))
    .unwrap();
    assert_eq!(null.exam_types, None);

    let empty: ModuleInput = serde_json::from_value(serde_json::json!({
        "module_name": "Algorithms",
        "module_duration": 90,
        "exam_type": []
    }))
    .unwrap();
    assert_eq!(empty.exam_types, Some(Vec::new()));

    let mut v = Validator::new();
    validate_module_input(&mut v, &missing);
    validate_module(&mut v, &Module::from(missing));
    assert_eq!(v.into_errors()["exam_type"], "must be provided");
}

#[test]
fn validator_toolkit_supports_custom_rule_sets() {
    let mut v = Validator::new();
    v.check(
        matches("coordinator@example.edu", &EMAIL_RX),
        "contact",
        "must be a valid email address",
    );
    v.check(
        permitted_value(&"remote", &["campus", "remote"]),
        "delivery",
        "must be campus or remote",
    );
    assert!(v.valid());

    v.check(
        matches("coordinator at example", &EMAIL_RX),
        "contact",
        "must be a valid email address",
    );
    assert_eq!(v.errors()["contact"], "must be a valid email address");
}
