use cortex_m::peripheral::SYST;
use display_interface_parallel_gpio::PGPIO8BitInterface;
use stm32g0xx_hal::gpio::gpioa::{PA0, PA1, PA11, PA12, PA15, PA4, PA5, PA6, PA8, PA9};
use stm32g0xx_hal::gpio::gpiob::{PB0, PB1, PB2, PB3, PB4, PB5, PB6, PB7, PB8, PB9};
use stm32g0xx_hal::gpio::{Analog, Input, Output, PullUp, PushPull};
use stm32g0xx_hal::hal::digital::v2::InputPin;
use stm32g0xx_hal::prelude::OutputPin;
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::stm32g0::stm32g070::RCC;
use stm32g0xx_hal::timer::delay::Delay;

use crate::hw::lcd::{IliError, IliLcd};

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

// PB0 - LCD_D0
type LcdD0 = PB0<Output<PushPull>>;
// PB1 - LCD_D1
type LcdD1 = PB1<Output<PushPull>>;
// PB2 - LCD_D2
type LcdD2 = PB2<Output<PushPull>>;
// PB3 - LCD_D3
type LcdD3 = PB3<Output<PushPull>>;
// PB4 - LCD_D4
type LcdD4 = PB4<Output<PushPull>>;
// PB5 - LCD_D5
type LcdD5 = PB5<Output<PushPull>>;
// PB6 - LCD_D6
type LcdD6 = PB6<Output<PushPull>>;
// PB7 - LCD_D7
type LcdD7 = PB7<Output<PushPull>>;
// PB8 - LCD_DC (Command[Low]/Data[High])
type LcdDC = PB8<Output<PushPull>>;
// PB9 - LCD_WR (Write signal)
type LcdWR = PB9<Output<PushPull>>;

// PA0 - scope analog input
pub type ScopeInput = PA0<Analog>;
// PA1 - joystick horizontal axis
pub type JoystickX = PA1<Analog>;
// PA6 - joystick vertical axis
pub type JoystickY = PA6<Analog>;

// PA4 - LCD_RST (Reset)
pub type LcdRst = PA4<Output<PushPull>>;
// PA5 - LCD_RD (Read signal)
pub type LcdRD = PA5<Output<PushPull>>;

pub type LcdInterface =
    PGPIO8BitInterface<LcdD0, LcdD1, LcdD2, LcdD3, LcdD4, LcdD5, LcdD6, LcdD7, LcdDC, LcdWR>;
pub type HwLcd = IliLcd<LcdInterface, LcdRst>;

pub fn init_lcd(
    interface: LcdInterface,
    lcd_rst: LcdRst,
    lcd_rd: LcdRD,
    delay: &mut Delay<SYST>,
) -> Result<HwLcd, IliError> {
    let mut lcd_rd = lcd_rd;
    lcd_rd.set_high().unwrap();
    IliLcd::new(interface, lcd_rst, delay)
}

/// Active-low button inputs, folded into the raw scan bitmap. Bit positions
/// match the command bindings and the debouncer's button counters.
pub struct Buttons {
    button1: PA8<Input<PullUp>>,
    button2: PA9<Input<PullUp>>,
    booster1: PA11<Input<PullUp>>,
    booster2: PA12<Input<PullUp>>,
    select: PA15<Input<PullUp>>,
}

impl Buttons {
    pub fn new(
        button1: PA8<Input<PullUp>>,
        button2: PA9<Input<PullUp>>,
        booster1: PA11<Input<PullUp>>,
        booster2: PA12<Input<PullUp>>,
        select: PA15<Input<PullUp>>,
    ) -> Self {
        Buttons {
            button1,
            button2,
            booster1,
            booster2,
            select,
        }
    }

    pub fn raw_bitmap(&self) -> u32 {
        let mut raw = 0;
        if self.button1.is_low().unwrap() {
            raw |= 1 << 0;
        }
        if self.button2.is_low().unwrap() {
            raw |= 1 << 1;
        }
        if self.booster1.is_low().unwrap() {
            raw |= 1 << 2;
        }
        if self.booster2.is_low().unwrap() {
            raw |= 1 << 3;
        }
        if self.select.is_low().unwrap() {
            raw |= 1 << 4;
        }
        raw
    }
}
