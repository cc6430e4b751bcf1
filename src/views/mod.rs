pub(crate) mod create;
pub(crate) mod list;

/// The screen to show next. Each screen runs its own event loop and
/// returns the state to transition to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AppState {
    Tasks,
    Create,
    Exit,
}
