#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// The two mutually exclusive screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiMode {
    /// Username/room form.
    #[default]
    Login,
    /// Message list plus input field.
    Chat,
}
