#![no_main]
#![no_std]

use lib as _;

use cortex_m::singleton;
use heapless::spsc::{Consumer, Producer, Queue};
use lib::buttons::{self, Command, Debouncer};
use lib::config::{
    ADC_BUFFER_SIZE, COMMAND_QUEUE_LEN, FRAME_RATE_HZ, LOAD_WINDOW_MS, SCAN_RATE_HZ,
};
use lib::cpuload;
use lib::display::Display;
use lib::hw::{
    init_clock, init_lcd, Adc, AdcConfig, Buttons, FrameTimer, HwLcd, IliError, LcdInterface,
    LoadTimer, ScanTimer,
};
use lib::ring::{Reader, SampleRing, Writer};
use lib::spectrum::{self, SpectrumEngine};
use lib::state::SharedState;
use lib::trigger;
use lib::waveform as waveform_algo;
use rtic::app;
use stm32g0xx_hal::timer::delay::DelayExt;
use stm32g0xx_hal::gpio::{GpioExt, Speed};
use stm32g0xx_hal::time::U32Ext;

#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        display: Display<HwLcd, IliError>,
        shared: SharedState,
        engine: &'static mut SpectrumEngine,
        writer: Writer<ADC_BUFFER_SIZE>,
        reader: Reader<ADC_BUFFER_SIZE>,
        adc: Adc,
        frame_timer: FrameTimer,
        scan_timer: ScanTimer,
        load_timer: LoadTimer,
        buttons_input: Buttons,
        debouncer: Debouncer,
        commands_in: Producer<'static, Command, COMMAND_QUEUE_LEN>,
        commands_out: Consumer<'static, Command, COMMAND_QUEUE_LEN>,
        unloaded: u32,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Buffers
        let ring = singleton!(: SampleRing<ADC_BUFFER_SIZE> = SampleRing::new()).unwrap();
        let queue =
            singleton!(: Queue<Command, COMMAND_QUEUE_LEN> = Queue::new()).unwrap();
        let engine = singleton!(: SpectrumEngine = SpectrumEngine::new()).unwrap();
        let (writer, reader) = ring.split();
        let (commands_in, commands_out) = queue.split();

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);

        // LCD
        let interface = LcdInterface::new(
            gpiob.pb0.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb1.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb2.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb3.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb4.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb5.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb6.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb7.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb8.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb9.into_push_pull_output().set_speed(Speed::VeryHigh),
        );
        let lcd = init_lcd(
            interface,
            gpioa.pa4.into_push_pull_output(),
            gpioa.pa5.into_push_pull_output(),
            &mut delay,
        )
        .unwrap();
        let display = Display::new(lcd).unwrap();

        // Timers
        let frame_timer = FrameTimer::new(device.TIM6, FRAME_RATE_HZ.hz(), &mut rcc);
        let scan_timer = ScanTimer::new(device.TIM7, SCAN_RATE_HZ.hz(), &mut rcc);
        let mut load_timer = LoadTimer::new(device.TIM17, (LOAD_WINDOW_MS * 1000).us(), &mut rcc);

        // ADC: free-running capture on PA0, joystick axes on PA1/PA6
        let adc = Adc::new(
            device.ADC,
            AdcConfig::new(gpioa.pa0, gpioa.pa1, gpioa.pa6),
            &mut rcc,
            &mut delay,
        );

        // Buttons
        let buttons_input = Buttons::new(
            gpioa.pa8.into_pull_up_input(),
            gpioa.pa9.into_pull_up_input(),
            gpioa.pa11.into_pull_up_input(),
            gpioa.pa12.into_pull_up_input(),
            gpioa.pa15.into_pull_up_input(),
        );

        // Idle-loop calibration runs before any task can preempt it
        let unloaded = cpuload::count_until_expiry(&mut load_timer);
        defmt::info!("unloaded count: {=u32}", unloaded);

        init::LateResources {
            display,
            shared: SharedState::new(),
            engine,
            writer,
            reader,
            adc,
            frame_timer,
            scan_timer,
            load_timer,
            buttons_input,
            debouncer: Debouncer::new(),
            commands_in,
            commands_out,
            unloaded,
        }
    }

    #[idle(resources = [frame_timer, scan_timer, adc])]
    fn idle(mut cx: idle::Context) -> ! {
        cx.resources.adc.lock(|adc: &mut Adc| adc.start());
        cx.resources.scan_timer.lock(|timer: &mut ScanTimer| {
            timer.start();
        });
        cx.resources.frame_timer.lock(|timer: &mut FrameTimer| {
            timer.start();
        });
        loop {
            cortex_m::asm::nop();
        }
    }

    /// Acquisition producer: one sample per conversion, never blocks.
    #[task(binds = ADC, priority = 3, resources = [adc, writer])]
    fn adc_isr(cx: adc_isr::Context) {
        let adc: &mut Adc = cx.resources.adc;
        let writer: &mut Writer<ADC_BUFFER_SIZE> = cx.resources.writer;

        let sample = adc.read_sample();
        if adc.overrun() {
            writer.record_overrun();
            adc.clear_overrun();
        }
        writer.push(sample);
    }

    /// Periodic release of the waveform stage.
    #[task(binds = TIM6, priority = 2, resources = [frame_timer], spawn = [waveform])]
    fn frame_tick(cx: frame_tick::Context) {
        cx.resources.frame_timer.unpend();
        cx.spawn.waveform().ok();
    }

    /// Input scan: debounce, autorepeat, command mapping.
    #[task(binds = TIM7, priority = 2, resources = [scan_timer, adc, buttons_input, debouncer, commands_in], spawn = [dispatch])]
    fn scan_tick(mut cx: scan_tick::Context) {
        cx.resources.scan_timer.unpend();

        let raw = cx.resources.buttons_input.raw_bitmap();
        let axes = cx.resources.adc.lock(|adc: &mut Adc| adc.read_axes());
        let presses = cx.resources.debouncer.scan(raw, axes);
        for command in buttons::commands(presses) {
            // dropped when the queue is full; the input state is rescanned
            // on the next tick anyway
            cx.resources.commands_in.enqueue(command).ok();
        }
        cx.spawn.dispatch().ok();
    }

    /// Offset estimation plus trigger search (or spectrum capture).
    #[task(priority = 2, capacity = 2, resources = [reader, shared], spawn = [processing])]
    fn waveform(cx: waveform::Context) {
        let reader = *cx.resources.reader;
        let shared: &mut SharedState = cx.resources.shared;

        shared.offset = trigger::dc_offset(reader);
        if shared.mode.spectrum_mode {
            spectrum::capture(reader, &mut shared.spectrum_window);
        } else {
            let index = trigger::search(reader, shared.mode.slope(), shared.offset);
            trigger::capture(reader, index, &mut shared.trigger_window);
        }
        cx.spawn.processing().ok();
    }

    /// Scales the trigger window or transforms the spectrum capture.
    #[task(priority = 1, capacity = 2, resources = [shared, engine], spawn = [refresh])]
    fn processing(mut cx: processing::Context) {
        let engine: &mut SpectrumEngine = cx.resources.engine;

        let spectrum_mode = cx.resources.shared.lock(|shared: &mut SharedState| {
            if shared.mode.spectrum_mode {
                engine.load(&shared.spectrum_window, shared.offset);
            }
            shared.mode.spectrum_mode
        });

        if spectrum_mode {
            // the transform itself runs outside the critical section
            engine.run();
            cx.resources
                .shared
                .lock(|shared: &mut SharedState| engine.write_pixels(&mut shared.processed));
        } else {
            cx.resources.shared.lock(|shared: &mut SharedState| {
                let scale = waveform_algo::scale_for(shared.mode.scale_index);
                waveform_algo::process(
                    &shared.trigger_window,
                    shared.offset,
                    scale,
                    &mut shared.processed,
                );
            });
        }
        cx.spawn.refresh().ok();
    }

    /// Applies queued commands to the mode state, then always requests a
    /// redraw so the display refreshes independently of input activity.
    #[task(priority = 1, capacity = 2, resources = [commands_out, shared], spawn = [refresh])]
    fn dispatch(mut cx: dispatch::Context) {
        let commands_out: &mut Consumer<'static, Command, COMMAND_QUEUE_LEN> =
            cx.resources.commands_out;
        while let Some(command) = commands_out.dequeue() {
            cx.resources
                .shared
                .lock(|shared: &mut SharedState| shared.mode.apply(command));
        }
        cx.spawn.refresh().ok();
    }

    /// Display consumer plus the CPU load diagnostic.
    #[task(priority = 1, capacity = 4, resources = [shared, display, load_timer, unloaded, reader])]
    fn refresh(mut cx: refresh::Context) {
        let loaded = cpuload::count_until_expiry(cx.resources.load_timer);
        let load = cpuload::load_fraction(loaded, *cx.resources.unloaded);
        let percent = (load * 100.0) as u32;
        let overruns = cx
            .resources
            .reader
            .lock(|reader: &mut Reader<ADC_BUFFER_SIZE>| reader.overruns());
        defmt::debug!("cpu load {=u32}%, overruns {=u32}", percent, overruns);

        let (pixels, mode) = cx
            .resources
            .shared
            .lock(|shared: &mut SharedState| (shared.processed, shared.mode));
        cx.resources.display.refresh(&pixels, &mode, percent).unwrap();
    }

    extern "C" {
        fn USART1();
        fn USART2();
    }
};
