//! Core monitor and window model over a pluggable OS windowing backend.
//!
//! This crate owns the monitor registry and video-mode catalog, nearest-mode
//! matching, window style derivation, DPI-aware geometry conversion,
//! aspect-constrained interactive resizing and conversion of pixel buffers
//! into native icon and cursor resources. It performs no foreign calls
//! itself: every native operation goes through the [`os::OsApi`] adapter
//! trait, which a backend crate implements for a concrete window manager.
//!
//! # Threading
//!
//! The model is single-threaded and message-pump-driven. A
//! [`context::Context`] must be created on the thread that owns the native
//! message queue, and every operation on it, including monitor callbacks,
//! runs synchronously on that thread. Nothing here is `Send` or `Sync`; the
//! confinement is load-bearing and is what makes the shared registry safe
//! without locks. The only blocking point is a
//! [`pump_events`](context::Context::pump_events) call in
//! [`Wait`](os::PumpMode::Wait) mode, which suspends until the next native
//! event.

pub use dpi;

pub mod context;
pub mod cursor;
pub mod error;
pub mod icon;
pub mod monitor;
pub mod os;
pub mod window;
