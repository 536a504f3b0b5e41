use crate::buttons::Command;
use crate::config::{
    FFT_LEN, LCD_WIDTH, SPECTRUM_SCALE_LABEL, SPECTRUM_TIME_LABEL, TIME_SCALE_LABEL, TRIGGER_LEN,
    VOLTAGE_SCALE_LABELS, VOLTS_PER_DIV,
};
use crate::trigger::Slope;

/// Display/trigger mode flags. Mutated only by the dispatcher, inside the
/// shared critical section.
#[derive(Clone, Copy)]
pub struct ModeState {
    pub rising_slope: bool,
    pub scale_index: usize,
    pub spectrum_mode: bool,
}

impl ModeState {
    pub const fn new() -> Self {
        ModeState {
            rising_slope: true,
            scale_index: 4,
            spectrum_mode: false,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::CycleVoltageScale => {
                self.scale_index = (self.scale_index + 1) % VOLTS_PER_DIV.len()
            }
            Command::ToggleSlope => self.rising_slope = !self.rising_slope,
            Command::ToggleSpectrumMode => self.spectrum_mode = !self.spectrum_mode,
        }
    }

    pub fn slope(&self) -> Slope {
        if self.rising_slope {
            Slope::Rising
        } else {
            Slope::Falling
        }
    }

    pub fn time_label(&self) -> &'static str {
        if self.spectrum_mode {
            SPECTRUM_TIME_LABEL
        } else {
            TIME_SCALE_LABEL
        }
    }

    pub fn scale_label(&self) -> &'static str {
        if self.spectrum_mode {
            SPECTRUM_SCALE_LABEL
        } else {
            VOLTAGE_SCALE_LABELS[self.scale_index]
        }
    }

    /// Slope readout is meaningless in spectrum mode.
    pub fn slope_label(&self) -> Option<&'static str> {
        if self.spectrum_mode {
            None
        } else {
            Some(self.slope().label())
        }
    }
}

/// Everything the pipeline stages exchange. Lives behind a single shared
/// resource; each stage locks it for the shortest stretch that touches it.
pub struct SharedState {
    pub mode: ModeState,
    pub offset: u16,
    pub trigger_window: [u16; TRIGGER_LEN],
    pub spectrum_window: [u16; FFT_LEN],
    pub processed: [i16; LCD_WIDTH],
}

impl SharedState {
    pub const fn new() -> Self {
        SharedState {
            mode: ModeState::new(),
            offset: 0,
            trigger_window: [0; TRIGGER_LEN],
            spectrum_window: [0; FFT_LEN],
            processed: [0; LCD_WIDTH],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_scale_cycles_through_all_settings() {
        let mut mode = ModeState::new();
        assert_eq!(mode.scale_label(), "2V");
        let seen: Vec<_> = (0..5)
            .map(|_| {
                mode.apply(Command::CycleVoltageScale);
                mode.scale_label()
            })
            .collect();
        assert_eq!(seen, vec!["100mV", "200mV", "500mV", "1V", "2V"]);
    }

    #[test]
    fn toggles_flip_and_restore() {
        let mut mode = ModeState::new();
        assert_eq!(mode.slope(), Slope::Rising);
        mode.apply(Command::ToggleSlope);
        assert_eq!(mode.slope(), Slope::Falling);
        mode.apply(Command::ToggleSlope);
        assert_eq!(mode.slope(), Slope::Rising);

        mode.apply(Command::ToggleSpectrumMode);
        assert!(mode.spectrum_mode);
        assert_eq!(mode.slope_label(), None);
        assert_eq!(mode.time_label(), "20kHz");
        mode.apply(Command::ToggleSpectrumMode);
        assert_eq!(mode.slope_label(), Some("Rising"));
        assert_eq!(mode.time_label(), "20us");
    }
}
