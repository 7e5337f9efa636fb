//! End-to-end flows through the public term API.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokenfield::{
    FilterRequest, FilterTerm, FilterUpdate, Key, KeyEvent, ManualClock, SelectionEvent, Signal,
    TermConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record<T: Clone + Send + 'static>(signal: &Signal<T>) -> Arc<Mutex<Vec<T>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    signal.connect(move |args: &T| sink.lock().push(args.clone()));
    log
}

fn fruits() -> Vec<Value> {
    ["apple", "banana", "cherry", "damson", "elder"]
        .iter()
        .map(|name| json!({ "value": name, "label": name.to_uppercase() }))
        .collect()
}

fn term(config: TermConfig) -> (FilterTerm, ManualClock) {
    init_tracing();
    let clock = ManualClock::new();
    let term = FilterTerm::new(config.with_map_options(true).with_emit_value(true))
        .with_clock(Arc::new(clock.clone()));
    (term, clock)
}

/// Serves options from a fixed list, the way a remote collaborator would.
fn answer(term: &mut FilterTerm, request: &FilterRequest) -> bool {
    let needle = request.query.to_lowercase();
    let options = fruits()
        .into_iter()
        .filter(|option| option["value"].as_str().is_some_and(|v| v.contains(&needle)))
        .collect();
    term.resolve_filter(request.ticket, FilterUpdate::with_options(options))
}

#[test]
fn test_resolution_reuses_option_objects() {
    let (term, _) = term(TermConfig::new().with_multiple(true));
    let mut term = term.with_options(fruits()).with_value(json!(["banana", "apple"]));
    let before = term.selection().to_vec();

    term.set_value(json!(["banana", "apple"]));

    assert!(before.iter().zip(term.selection()).all(|(a, b)| a.same_as(b)));
    assert!(term.selection()[0].same_as(&term.options()[1]));
}

#[test]
fn test_toggle_round_trip_is_symmetric() {
    let (term, _) = term(TermConfig::new().with_multiple(true));
    let mut term = term.with_options(fruits());
    let added = record(&term.added);
    let removed = record(&term.removed);

    term.show_menu();
    term.click_option(2);
    term.tick();
    term.click_option(2);
    term.tick();

    assert_eq!(term.value(), &json!([]));
    assert_eq!(*added.lock(), vec![SelectionEvent { index: 0, value: json!("cherry") }]);
    assert_eq!(*removed.lock(), vec![SelectionEvent { index: 0, value: json!("cherry") }]);
}

#[test]
fn test_pick_lands_at_caret_segment() {
    let (term, _) = term(TermConfig::new().with_multiple(true));
    let mut term = term.with_options(fruits());
    term.set_value(json!(["apple", "banana", "cherry"]));
    term.show_menu();
    assert_eq!(term.input_text(), "APPLE,BANANA,CHERRY");

    term.input_with_caret("APPLE,BANxANA,CHERRY", (9, 9));
    term.click_option(3);
    assert_eq!(term.value(), &json!(["apple", "damson", "banana", "cherry"]));

    term.tick();
    assert_eq!(term.input_text(), "APPLE,DAMSON,BANANA,CHERRY");
}

#[test]
fn test_middle_removal_hole_is_refilled() {
    let (term, _) = term(TermConfig::new().with_multiple(true));
    let mut term = term.with_options(fruits()).with_value(json!(["apple", "banana", "cherry"]));
    term.show_menu();

    term.set_caret(8, 8);
    term.handle_key_down(&KeyEvent::new(Key::Backspace));
    assert_eq!(term.input_text(), "APPLE,,CHERRY");

    term.click_option(4);
    assert_eq!(term.value(), &json!(["apple", "elder", "cherry"]));
}

#[test]
fn test_only_latest_filter_answer_applies() {
    let (term, clock) = term(TermConfig::new());
    let mut term = term;
    let requests = record(&term.filter_requested);

    term.show_menu();
    term.input("an");
    clock.advance(Duration::from_millis(250));
    // The safety timer hid the menu; typing focuses the input again.
    term.tick();
    term.input("ch");
    clock.advance(Duration::from_millis(250));
    term.tick();

    let issued = requests.lock().clone();
    let latest = issued.last().cloned().unwrap();
    assert!(issued.len() >= 2);

    for stale in &issued[..issued.len() - 1] {
        assert!(!answer(&mut term, stale));
    }
    assert!(term.options().is_empty());

    assert!(answer(&mut term, &latest));
    term.tick();
    assert_eq!(term.options().len(), 1);
    assert!(term.is_menu_open());
}

#[test]
fn test_disabled_neighbour_is_skipped() {
    let (term, _) = term(TermConfig::new());
    let mut options = fruits();
    options[1]["disable"] = json!(true);
    let mut term = term.with_options(options);

    term.show_menu();
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    assert_eq!(term.option_index(), 2);
}

#[test]
fn test_all_remaining_disabled_keeps_index() {
    let (term, _) = term(TermConfig::new());
    let mut options = fruits();
    for option in options.iter_mut().skip(1) {
        option["disable"] = json!(true);
    }
    let mut term = term.with_options(options);

    term.show_menu();
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    assert_eq!(term.option_index(), 0);
}

#[test]
fn test_max_values_is_a_noop() {
    let (term, _) = term(TermConfig::new().with_multiple(true).with_max_values(2));
    let mut term = term.with_options(fruits()).with_value(json!(["apple", "banana"]));
    let values = record(&term.value_changed);
    let added = record(&term.added);

    term.show_menu();
    term.click_option(2);

    assert_eq!(term.value(), &json!(["apple", "banana"]));
    assert!(values.lock().is_empty());
    assert!(added.lock().is_empty());
}

#[test]
fn test_single_select_replace_emits_once() {
    let (term, _) = term(TermConfig::new());
    let mut term = term.with_options(fruits()).with_value(json!("apple"));
    let values = record(&term.value_changed);
    let added = record(&term.added);
    let removed = record(&term.removed);

    term.show_menu();
    term.click_option(1);

    assert_eq!(*values.lock(), vec![json!("banana")]);
    assert!(added.lock().is_empty() && removed.lock().is_empty());
}

#[test]
fn test_keyboard_only_session() {
    let (term, _) = term(TermConfig::new());
    let mut term = term.with_options(fruits());
    let shown = record(&term.popup_shown);
    let hidden = record(&term.popup_hidden);

    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    term.handle_key_down(&KeyEvent::new(Key::ArrowDown));
    assert_eq!(term.input_text(), "BANANA");

    term.handle_key_down(&KeyEvent::new(Key::Enter));
    assert_eq!(term.value(), &json!("banana"));
    assert_eq!((shown.lock().len(), hidden.lock().len()), (1, 1));
}
