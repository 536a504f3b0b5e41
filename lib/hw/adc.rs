use stm32g0xx_hal::analog::adc::Adc as HalAdc;
use stm32g0xx_hal::hal::adc::Channel as AdcChannel;
use stm32g0xx_hal::hal::blocking::delay::DelayUs;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{ADC, RCC};

pub struct AdcConfig<I, X, Y> {
    input: I,
    x_axis: X,
    y_axis: Y,
}

impl<I, X, Y> AdcConfig<I, X, Y>
where
    I: AdcChannel<HalAdc, ID = u8>,
    X: AdcChannel<HalAdc, ID = u8>,
    Y: AdcChannel<HalAdc, ID = u8>,
{
    pub fn new(input: I, x_axis: X, y_axis: Y) -> Self {
        AdcConfig {
            input,
            x_axis,
            y_axis,
        }
    }
}

/// Free-running single-channel capture with an end-of-conversion interrupt,
/// plus on-demand conversions of the two joystick axes.
pub struct Adc {
    adc: ADC,
    channel: u8,
    x_channel: u8,
    y_channel: u8,
}

impl Adc {
    pub fn new<I, X, Y, D>(
        pac_adc: ADC,
        config: AdcConfig<I, X, Y>,
        rcc: &mut Rcc,
        delay: &mut D,
    ) -> Self
    where
        I: AdcChannel<HalAdc, ID = u8>,
        X: AdcChannel<HalAdc, ID = u8>,
        Y: AdcChannel<HalAdc, ID = u8>,
        D: DelayUs<u8>,
    {
        Adc::enable_clock_and_reset(rcc);
        let AdcConfig {
            input: _input,
            x_axis: _x_axis,
            y_axis: _y_axis,
        } = config;
        let mut adc = Adc {
            adc: pac_adc,
            channel: I::channel(),
            x_channel: X::channel(),
            y_channel: Y::channel(),
        };
        adc.disable();
        adc.enable_vreg(delay);
        adc.calibrate();
        adc.enable();
        adc.configure();
        adc
    }

    pub fn start(&mut self) {
        self.adc.isr.write(|w| {
            w.eoc().set_bit();
            w.eos().set_bit()
        });
        self.adc.ier.write(|w| w.eocie().set_bit());
        self.adc.cr.modify(|_, w| w.adstart().set_bit());
    }

    /// Latest conversion result; reading clears the pending interrupt.
    pub fn read_sample(&mut self) -> u16 {
        self.adc.dr.read().regular_data().bits()
    }

    pub fn overrun(&mut self) -> bool {
        self.adc.isr.read().ovr().bit_is_set()
    }

    pub fn clear_overrun(&mut self) {
        self.adc.isr.write(|w| w.ovr().set_bit());
    }

    /// One-shot conversion of both joystick axes. Pauses the free-running
    /// capture for the duration and restarts it afterwards; the gap in the
    /// sample stream is far below one scan period.
    pub fn read_axes(&mut self) -> (u16, u16) {
        self.stop();
        let x = self.convert_single(self.x_channel);
        let y = self.convert_single(self.y_channel);
        self.select_channel(self.channel);
        self.adc.cfgr1.modify(|_, w| w.cont().set_bit());
        self.adc.cr.modify(|_, w| w.adstart().set_bit());
        (x, y)
    }

    fn stop(&mut self) {
        if self.adc.cr.read().adstart().bit_is_set() {
            self.adc.cr.modify(|_, w| w.adstp().set_bit());
            while self.adc.cr.read().adstart().bit_is_set() {}
        }
        self.adc.cfgr1.modify(|_, w| w.cont().clear_bit());
    }

    fn convert_single(&mut self, channel: u8) -> u16 {
        self.select_channel(channel);
        self.adc.cr.modify(|_, w| w.adstart().set_bit());
        while self.adc.isr.read().eoc().bit_is_clear() {}
        self.adc.dr.read().regular_data().bits()
    }

    fn select_channel(&mut self, channel: u8) {
        self.adc.isr.write(|w| w.ccrdy().set_bit());
        self.adc
            .chselr()
            .write(|w| unsafe { w.chsel().bits(1 << channel) });
        while self.adc.isr.read().ccrdy().bit_is_clear() {}
    }

    fn configure(&mut self) {
        self.adc.cfgr1.write(|w| unsafe {
            // Right alignment
            w.align().clear_bit();
            // 12-bit resolution
            w.res().bits(0b00);
            // Free running
            w.cont().set_bit();
            // Keep the newest sample on overrun
            w.ovrmod().set_bit()
        });
        // Short sampling window keeps the capture rate up
        self.adc.smpr.write(|w| unsafe { w.smp1().bits(0b010) });
        self.select_channel(self.channel);
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr2.modify(|_, w| w.adcen().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().clear_bit());
    }

    fn enable_vreg<D: DelayUs<u8>>(&mut self, delay: &mut D) {
        self.adc.cr.modify(|_, w| w.advregen().set_bit());
        // Max starting time declared by stm32g070 datasheet is 20 us
        delay.delay_us(20);
    }

    fn enable(&mut self) {
        self.adc.isr.write(|w| w.adrdy().set_bit());
        self.adc.cr.modify(|_, w| w.aden().set_bit());
        while self.adc.isr.read().adrdy().bit_is_clear() {}
    }

    fn disable(&mut self) {
        let cr = self.adc.cr.read();
        if cr.aden().bit_is_clear() {
            return;
        }
        if cr.adstart().bit_is_set() {
            self.adc.cr.modify(|_, w| w.adstp().set_bit());
        }
        self.adc.cr.modify(|_, w| w.addis().set_bit());
        while self.adc.cr.read().aden().bit_is_set() {}
        self.adc.isr.write(|w| w.adrdy().set_bit());
    }

    fn calibrate(&mut self) {
        self.adc.cr.modify(|_, w| w.adcal().set_bit());
        while self.adc.isr.read().eocal().bit_is_clear() {}
        self.adc.isr.write(|w| w.eocal().set_bit());
    }
}
