//! A catalog-driven row of type, operator and value terms.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokenfield::{
    CatalogFormat, ConfigError, FilterCatalog, FilterGroup, FilterTerm, Key, KeyEvent, TermConfig,
    TermRow,
};

const CATALOG: &str = r#"
[status]
label = "Status"
options = ["open", "closed", "draft"]

[status.operators.is]
label = "is"
select_multiple = false

[status.operators.any_of]
label = "is any of"
select_multiple = true

[owner]
label = "Owner"
icon = "person"
options = [{ value = "ann", label = "Ann" }, { value = "bob", label = "Bob" }]

[owner.operators.is]
label = "is"
selectMultiple = false
"#;

fn catalog() -> FilterCatalog {
    FilterCatalog::from_toml_str(CATALOG).unwrap()
}

fn value_term(catalog: &FilterCatalog, group: &FilterGroup) -> FilterTerm {
    let base = TermConfig::new();
    let (filter_type, operator) = (
        group.filter_type.as_deref().unwrap(),
        group.operator.as_deref().unwrap(),
    );
    let config = catalog.value_term_config(filter_type, operator, &base).unwrap();
    let options = catalog.value_options_for(filter_type, operator).unwrap().to_vec();
    FilterTerm::new(config).with_options(options)
}

#[test]
fn test_catalog_preserves_declaration_order() {
    let catalog = catalog();
    let ids: Vec<Value> = catalog.type_options().into_iter().map(|o| o["value"].clone()).collect();
    assert_eq!(ids, vec![json!("status"), json!("owner")]);
    assert_eq!(catalog.allows_multiple("owner", "is"), Some(false));
}

#[test]
fn test_group_built_through_terms() {
    let catalog = catalog();
    let base = TermConfig::new();
    let group = Arc::new(Mutex::new(FilterGroup::new()));

    let mut type_term =
        FilterTerm::new(catalog.operator_term_config(&base)).with_options(catalog.type_options());
    let sink = group.clone();
    type_term.value_changed.connect(move |value| {
        if let Some(id) = value.as_str() {
            sink.lock().set_type(id);
        }
    });

    type_term.show_menu();
    type_term.click_option(0);
    assert_eq!(group.lock().filter_type.as_deref(), Some("status"));

    let mut operator_term = FilterTerm::new(catalog.operator_term_config(&base))
        .with_options(catalog.operator_options("status").unwrap());
    let sink = group.clone();
    operator_term.value_changed.connect(move |value| {
        if let Some(id) = value.as_str() {
            sink.lock().set_operator(id);
        }
    });
    operator_term.show_menu();
    operator_term.click_option(1);

    let snapshot = group.lock().clone();
    let mut values = value_term(&catalog, &snapshot);
    assert!(values.config().multiple);

    let sink = group.clone();
    values.value_changed.connect(move |value| sink.lock().set_values(value.clone()));
    values.show_menu();
    values.click_option(0);
    values.tick();
    values.click_option(2);

    let group = group.lock();
    assert!(group.is_finished());
    assert_eq!(group.values, Some(json!(["draft", "open"])));
}

#[test]
fn test_row_hands_focus_across_terms() {
    let catalog = catalog();
    let base = TermConfig::new();
    let mut row = TermRow::new();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    row.popups().changed().connect(move |&open| sink.lock().push(open));

    row.push(FilterTerm::new(catalog.operator_term_config(&base)).with_options(catalog.type_options()));
    row.push(
        FilterTerm::new(catalog.operator_term_config(&base))
            .with_options(catalog.operator_options("owner").unwrap()),
    );

    row.focus(0);
    row.handle_key_down(0, &KeyEvent::new(Key::ArrowRight));
    assert!(row.term(1).is_some_and(FilterTerm::is_menu_open));
    assert!(!row.term(0).is_some_and(FilterTerm::is_menu_open));

    row.handle_key_down(1, &KeyEvent::new(Key::ArrowLeft));
    assert!(row.term(0).is_some_and(FilterTerm::is_menu_open));
    assert_eq!(row.popups().open_count(), 1);

    row.blur(0);
    assert!(!row.has_popup_open());
    // Each hand-off closes one popup before opening the next.
    assert_eq!(*changes.lock(), vec![true, false, true, false, true, false]);
}

#[test]
fn test_invalid_catalog_is_rejected_or_skipped() {
    let source = r#"{
        "broken": { "label": "Broken", "operators": { "is": { "label": "is" } } },
        "fine": { "label": "Fine", "operators": { "is": { "label": "is", "selectMultiple": true } } }
    }"#;

    let err = FilterCatalog::from_json_str(source).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidOperator { ref filter, .. } if filter == "broken"));

    let lenient = FilterCatalog::load_lenient(source, CatalogFormat::Json).unwrap();
    assert_eq!(lenient.len(), 1);
    assert!(lenient.filter("fine").is_some());
}

#[test]
fn test_catalog_from_file() {
    let dir = std::env::temp_dir().join(format!("tokenfield-catalog-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let toml_path = dir.join("filters.toml");
    std::fs::write(&toml_path, CATALOG).unwrap();
    assert_eq!(FilterCatalog::from_path(&toml_path).unwrap(), catalog());

    let yaml_path = dir.join("filters.yaml");
    std::fs::write(&yaml_path, "status: {}").unwrap();
    assert!(matches!(
        FilterCatalog::from_path(&yaml_path),
        Err(ConfigError::UnsupportedFormat { .. })
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}
