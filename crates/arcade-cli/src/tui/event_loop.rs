use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Produces tick and render events at their configured intervals and forwards
/// terminal events in between. If an interval is not set, that event type is
/// not generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_interval: Option<Duration>,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with ticks disabled and on-demand rendering.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_interval: None,
            last_tick: now,
            last_render: now,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    /// Sets the minimum time between renders.
    ///
    /// With `None`, a render happens after every tick or terminal event.
    pub(super) fn set_render_interval(&mut self, interval: Option<Duration>) {
        self.render_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                let elapsed = now.duration_since(self.last_tick);
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(elapsed));
            }

            let render_due = self
                .render_interval
                .is_none_or(|interval| now.duration_since(self.last_render) >= interval);
            if self.dirty && render_due {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self
            .render_interval
            .filter(|_| self.dirty)
            .map(|interval| self.last_render + interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
