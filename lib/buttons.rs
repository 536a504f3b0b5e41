use crate::config::{
    AUTOREPEAT_INITIAL, AUTOREPEAT_NEXT, JOYSTICK_LOWER_PRESS, JOYSTICK_LOWER_RELEASE,
    JOYSTICK_UPPER_PRESS, JOYSTICK_UPPER_RELEASE, PRESSED_CEILING, PRESS_STEP, RELEASE_STEP,
};

/// Physical buttons carried in the raw bitmap.
pub const BUTTON_COUNT: usize = 5;
/// Buttons plus the four joystick pseudo-directions.
pub const INPUT_COUNT: usize = 9;

pub const JOY_RIGHT: u32 = 1 << 5;
pub const JOY_LEFT: u32 = 1 << 6;
pub const JOY_UP: u32 = 1 << 7;
pub const JOY_DOWN: u32 = 1 << 8;

/// Mode-change tokens produced by the input stage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    CycleVoltageScale,
    ToggleSlope,
    ToggleSpectrumMode,
}

/// Which press event maps to which command. Policy lives here, not in the
/// scan loop, so remapping is a one-line change.
pub const BINDINGS: [(u32, Command); 3] = [
    (1 << 1, Command::ToggleSlope),
    (1 << 2, Command::CycleVoltageScale),
    (1 << 3, Command::ToggleSpectrumMode),
];

/// Commands triggered by the given press bitmap.
pub fn commands(presses: u32) -> impl Iterator<Item = Command> {
    BINDINGS
        .iter()
        .filter_map(move |&(mask, command)| (presses & mask != 0).then(|| command))
}

/// Per-input debounce counters plus autorepeat hold counters.
///
/// Buttons use asymmetric counter steps (fast press, slow release); joystick
/// axes turn into virtual buttons through threshold hysteresis and skip the
/// counters entirely.
pub struct Debouncer {
    counters: [i32; BUTTON_COUNT],
    hold: [u32; INPUT_COUNT],
    debounced: u32,
}

impl Debouncer {
    pub const fn new() -> Self {
        Debouncer {
            counters: [0; BUTTON_COUNT],
            hold: [0; INPUT_COUNT],
            debounced: 0,
        }
    }

    /// One scan tick. Returns the press events for this tick: fresh edges in
    /// the debounced state plus any autorepeat presses.
    pub fn scan(&mut self, raw: u32, axes: (u16, u16)) -> u32 {
        let previous = self.debounced;
        self.debounce(raw);
        self.joystick(axes);
        let mut presses = !previous & self.debounced;
        presses |= self.autorepeat();
        presses
    }

    /// Currently-asserted debounced inputs.
    pub fn debounced(&self) -> u32 {
        self.debounced
    }

    fn debounce(&mut self, raw: u32) {
        for (i, counter) in self.counters.iter_mut().enumerate() {
            let mask = 1 << i;
            if raw & mask != 0 {
                *counter += PRESS_STEP;
                if *counter >= PRESSED_CEILING {
                    *counter = PRESSED_CEILING;
                    self.debounced |= mask;
                }
            } else {
                *counter -= RELEASE_STEP;
                if *counter <= 0 {
                    *counter = 0;
                    self.debounced &= !mask;
                }
            }
        }
    }

    fn joystick(&mut self, (x, y): (u16, u16)) {
        self.axis(x, JOY_RIGHT, JOY_LEFT);
        self.axis(y, JOY_UP, JOY_DOWN);
    }

    fn axis(&mut self, value: u16, high_mask: u32, low_mask: u32) {
        if value > JOYSTICK_UPPER_PRESS {
            self.debounced |= high_mask;
        }
        if value < JOYSTICK_UPPER_RELEASE {
            self.debounced &= !high_mask;
        }
        if value < JOYSTICK_LOWER_PRESS {
            self.debounced |= low_mask;
        }
        if value > JOYSTICK_LOWER_RELEASE {
            self.debounced &= !low_mask;
        }
    }

    fn autorepeat(&mut self) -> u32 {
        let mut presses = 0;
        for (i, hold) in self.hold.iter_mut().enumerate() {
            let mask = 1 << i;
            if self.debounced & mask != 0 {
                *hold += 1;
            } else {
                *hold = 0;
            }
            if *hold >= AUTOREPEAT_INITIAL && (*hold - AUTOREPEAT_INITIAL) % AUTOREPEAT_NEXT == 0 {
                presses |= mask;
            }
        }
        presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: (u16, u16) = (2048, 2048);

    #[test]
    fn press_asserts_after_two_active_scans() {
        let mut debouncer = Debouncer::new();
        assert_eq!(debouncer.scan(1, CENTER), 0);
        let presses = debouncer.scan(1, CENTER);
        assert_eq!(presses & 1, 1);
        assert_eq!(debouncer.debounced() & 1, 1);
    }

    #[test]
    fn release_clears_after_five_inactive_scans() {
        let mut debouncer = Debouncer::new();
        debouncer.scan(1, CENTER);
        debouncer.scan(1, CENTER);
        for _ in 0..4 {
            debouncer.scan(0, CENTER);
            assert_eq!(debouncer.debounced() & 1, 1);
        }
        debouncer.scan(0, CENTER);
        assert_eq!(debouncer.debounced() & 1, 0);
    }

    #[test]
    fn counter_clamps_at_ceiling() {
        let mut debouncer = Debouncer::new();
        // however long the hold, release still takes exactly five scans
        for _ in 0..100 {
            debouncer.scan(1, CENTER);
        }
        for _ in 0..4 {
            debouncer.scan(0, CENTER);
            assert_eq!(debouncer.debounced() & 1, 1);
        }
        debouncer.scan(0, CENTER);
        assert_eq!(debouncer.debounced() & 1, 0);
    }

    #[test]
    fn edge_fires_once_per_press() {
        let mut debouncer = Debouncer::new();
        debouncer.scan(1, CENTER);
        assert_eq!(debouncer.scan(1, CENTER) & 1, 1);
        // held but no new edge, well before autorepeat
        for _ in 0..10 {
            assert_eq!(debouncer.scan(1, CENTER) & 1, 0);
        }
    }

    #[test]
    fn autorepeat_starts_at_initial_delay_then_repeats() {
        let mut debouncer = Debouncer::new();
        let mut press_ticks = Vec::new();
        for tick in 1..=200u32 {
            if debouncer.scan(1, CENTER) & 1 != 0 {
                press_ticks.push(tick);
            }
        }
        // edge on tick 2, hold counter reaches 100 on tick 101
        let mut expected = vec![2];
        expected.extend((101..=200).step_by(AUTOREPEAT_NEXT as usize));
        assert_eq!(press_ticks, expected);
    }

    #[test]
    fn joystick_hysteresis_prevents_chatter() {
        let mut debouncer = Debouncer::new();
        // push right past the press threshold
        let presses = debouncer.scan(0, (JOYSTICK_UPPER_PRESS + 50, 2048));
        assert_eq!(presses & JOY_RIGHT, JOY_RIGHT);
        // drifting between the thresholds keeps it asserted
        debouncer.scan(0, (JOYSTICK_UPPER_RELEASE + 100, 2048));
        assert_eq!(debouncer.debounced() & JOY_RIGHT, JOY_RIGHT);
        // dropping below the release threshold clears it
        debouncer.scan(0, (JOYSTICK_UPPER_RELEASE - 100, 2048));
        assert_eq!(debouncer.debounced() & JOY_RIGHT, 0);
    }

    #[test]
    fn joystick_low_side_uses_mirrored_thresholds() {
        let mut debouncer = Debouncer::new();
        let presses = debouncer.scan(0, (2048, JOYSTICK_LOWER_PRESS - 50));
        assert_eq!(presses & JOY_DOWN, JOY_DOWN);
        debouncer.scan(0, (2048, JOYSTICK_LOWER_RELEASE - 100));
        assert_eq!(debouncer.debounced() & JOY_DOWN, JOY_DOWN);
        debouncer.scan(0, (2048, JOYSTICK_LOWER_RELEASE + 100));
        assert_eq!(debouncer.debounced() & JOY_DOWN, 0);
    }

    #[test]
    fn bindings_map_presses_to_commands() {
        let collected: Vec<_> = commands(1 << 1 | 1 << 3).collect();
        assert_eq!(
            collected,
            vec![Command::ToggleSlope, Command::ToggleSpectrumMode]
        );
        assert_eq!(commands(1 << 0).count(), 0);
    }
}
