mod adc;
mod helper;
mod lcd;
mod timers;

pub use adc::{Adc, AdcConfig};
pub use helper::*;
pub use lcd::IliError;
pub use timers::{FrameTimer, LoadTimer, ScanTimer};
