use super::*;

// =============================================================
// UiMode
// =============================================================

#[test]
fn ui_mode_default_is_login() {
    assert_eq!(UiMode::default(), UiMode::Login);
}

#[test]
fn ui_mode_variants_are_distinct() {
    assert_ne!(UiMode::Login, UiMode::Chat);
}
