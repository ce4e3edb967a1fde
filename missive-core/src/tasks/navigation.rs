//! Navigation task step
//!
//! Wakes on a keypad poll, a stored message or a clock change and redraws
//! only what that event affects.

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use missive_display::TextDisplay;
use missive_hal::Keypad;

use crate::context::Shared;
use crate::input::{EdgeDetector, InputAction};
use crate::nav::{render_all, render_clock, render_header, Navigator, Redraw};

/// What woke the navigation task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavTrigger {
    Poll,
    MessageStored,
    ClockChanged,
}

/// What one step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavReport {
    /// Screen buffer was written
    pub drew: bool,
    /// Clock adjust requests raised
    pub adjusts: u8,
}

/// State the navigation task carries between steps
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub navigator: Navigator,
    pub edges: EdgeDetector,
}

impl NavigationState {
    pub const fn new(stable_polls: u8) -> Self {
        Self {
            navigator: Navigator::new(),
            edges: EdgeDetector::new(stable_polls),
        }
    }
}

/// Wait for the next poll, stored message or clock change
pub async fn wait_navigation<M: RawMutex, const N: usize>(shared: &Shared<M, N>) -> NavTrigger {
    let events = &shared.events;
    match select3(
        events.poll.wait(),
        events.message_stored.wait(),
        events.clock_changed.wait(),
    )
    .await
    {
        Either3::First(()) => NavTrigger::Poll,
        Either3::Second(()) => NavTrigger::MessageStored,
        Either3::Third(()) => NavTrigger::ClockChanged,
    }
}

/// Handle one trigger, drawing into `display`
pub fn navigation_step<M, const N: usize, K, D>(
    shared: &Shared<M, N>,
    state: &mut NavigationState,
    trigger: NavTrigger,
    keypad: &mut K,
    display: &mut D,
) -> Result<NavReport, D::Error>
where
    M: RawMutex,
    K: Keypad,
    D: TextDisplay,
{
    let mut report = NavReport::default();
    match trigger {
        NavTrigger::Poll => {
            let pressed = state.edges.update(keypad.read_key());
            let mut redraw = false;
            for action in InputAction::from_keys(pressed) {
                match action {
                    InputAction::Navigate(direction) => {
                        let outcome = shared
                            .with_store(|store| state.navigator.on_direction(direction, store));
                        redraw |= outcome.needs_redraw();
                    }
                    InputAction::Adjust(adjust) => {
                        shared.events.request_adjust(adjust);
                        report.adjusts += 1;
                    }
                }
            }
            if redraw {
                let now = shared.now();
                shared.with_store(|store| render_all(display, store, &state.navigator, now))?;
                report.drew = true;
            }
        }
        NavTrigger::MessageStored => {
            let now = shared.now();
            shared.with_store(|store| match state.navigator.on_message_stored(store) {
                Redraw::Full => render_all(display, store, &state.navigator, now),
                Redraw::Header => render_header(display, store, &state.navigator),
            })?;
            report.drew = true;
        }
        NavTrigger::ClockChanged => {
            render_clock(display, shared.now())?;
            report.drew = true;
        }
    }
    Ok(report)
}
