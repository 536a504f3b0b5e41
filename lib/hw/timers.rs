use stm32g0xx_hal::hal::timer::CountDown;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{TIM17, TIM6, TIM7};
use stm32g0xx_hal::time::{Hertz, MicroSecond};
use stm32g0xx_hal::timer::{Timer, TimerExt};

use crate::cpuload::ExpiryTimer;

/// Periodic release of the waveform stage.
pub struct FrameTimer {
    timer: Timer<TIM6>,
    freq: Hertz,
}

impl FrameTimer {
    pub fn new(pac_tim: TIM6, freq: Hertz, rcc: &mut Rcc) -> Self {
        FrameTimer {
            timer: pac_tim.timer(rcc),
            freq,
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(self.freq);
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }
}

/// Periodic release of the input scan.
pub struct ScanTimer {
    timer: Timer<TIM7>,
    freq: Hertz,
}

impl ScanTimer {
    pub fn new(pac_tim: TIM7, freq: Hertz, rcc: &mut Rcc) -> Self {
        ScanTimer {
            timer: pac_tim.timer(rcc),
            freq,
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(self.freq);
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }
}

/// One-shot measurement window for the CPU load counter. Polled, never
/// interrupt-driven, so the counting loop keeps a stable granularity.
pub struct LoadTimer {
    timer: Timer<TIM17>,
    window: MicroSecond,
}

impl LoadTimer {
    pub fn new(pac_tim: TIM17, window: MicroSecond, rcc: &mut Rcc) -> Self {
        LoadTimer {
            timer: pac_tim.timer(rcc),
            window,
        }
    }
}

impl ExpiryTimer for LoadTimer {
    fn start(&mut self) {
        self.timer.start(self.window);
    }

    fn expired(&mut self) -> bool {
        self.timer.wait().is_ok()
    }
}
