//! USART3 receive interrupt
//!
//! The interrupt owns the ingestor, the register-level byte source and the
//! producer half of the hand-off queue. They sit in a critical-section mutex
//! so the receive task can read the drop counters.

use core::cell::RefCell;

use defmt::*;
use embassy_stm32::interrupt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use missive_core::handoff::HandoffProducer;
use missive_core::tasks::interrupt_step;
use missive_core::Ingestor;
use missive_hal_stm32f2::UsartRx;

use crate::channels::SHARED;

/// State owned by the receive interrupt
pub struct SerialIsr {
    pub ingestor: Ingestor,
    pub rx: UsartRx,
    pub producer: HandoffProducer<'static>,
}

/// Counters the receive task reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Format)]
pub struct SerialStats {
    /// Messages thrown away because the hand-off queue was full
    pub dropped: u32,
    /// Bytes lost to receiver overrun
    pub overruns: u32,
    /// Bytes discarded for line errors
    pub line_errors: u32,
}

static SERIAL_ISR: Mutex<CriticalSectionRawMutex, RefCell<Option<SerialIsr>>> =
    Mutex::new(RefCell::new(None));

/// Hand the receive state to the interrupt and start listening
pub fn install(state: SerialIsr) {
    state.rx.listen();
    SERIAL_ISR.lock(|cell| cell.replace(Some(state)));
}

/// Snapshot of the interrupt's counters
pub fn stats() -> SerialStats {
    SERIAL_ISR.lock(|cell| match cell.borrow().as_ref() {
        Some(isr) => SerialStats {
            dropped: isr.ingestor.dropped(),
            overruns: isr.rx.overruns(),
            line_errors: isr.rx.line_errors(),
        },
        None => SerialStats::default(),
    })
}

#[allow(non_snake_case)]
#[interrupt]
fn USART3() {
    SERIAL_ISR.lock(|cell| {
        if let Some(isr) = cell.borrow_mut().as_mut() {
            interrupt_step(&SHARED, &mut isr.ingestor, &mut isr.rx, &mut isr.producer);
        }
    });
}
