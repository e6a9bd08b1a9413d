use adwatch_core::{update, AppState, Msg};

#[test]
fn noop_changes_nothing() {
    let state = AppState::new();
    let before = state.view();

    let (mut next, effects) = update(state, Msg::NoOp);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next.view(), before);
}

#[test]
fn tick_without_timers_stays_clean() {
    let state = AppState::new();

    let (mut next, effects) = update(state, Msg::Tick);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
