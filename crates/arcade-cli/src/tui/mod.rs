//! Minimal terminal runtime: a fixed-rate tick/render loop around `ratatui`.

mod app;
mod event;
mod event_loop;
mod runtime;

pub use self::{app::App, runtime::Runtime};
