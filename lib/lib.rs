#![cfg_attr(not(test), no_std)]

#[cfg(not(test))]
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(not(test))]
use defmt_rtt as _; // global logger
#[cfg(not(test))]
use panic_probe as _;

pub mod buttons;
pub mod config;
pub mod cpuload;
pub mod display;
pub mod error;
#[cfg(not(test))]
pub mod hw;
pub mod ring;
pub mod spectrum;
pub mod state;
pub mod trigger;
pub mod waveform;

#[cfg(not(test))]
static COUNT: AtomicUsize = AtomicUsize::new(0);
#[cfg(not(test))]
defmt::timestamp!("{=usize}", {
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});

/// Terminates the application and makes `probe-run` exit with exit-code = 0
#[cfg(not(test))]
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}
