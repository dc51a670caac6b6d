//! Cursor modes and shapes.

pub use cursor_icon::CursorIcon;

/// How the cursor behaves while it is over a window's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Show the window's cursor, or the default arrow if none is set.
    #[default]
    Normal,
    /// Hide the cursor while it is over the client area.
    Hidden,
    /// Hide the cursor and lock it to the window, for raw motion input.
    Disabled,
}
