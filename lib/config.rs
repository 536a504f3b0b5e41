//! Compile-time configuration. Nothing in here is reconfigurable at runtime;
//! the capture buffers in particular are sized once and live for the whole
//! process.

/// Capacity of the acquisition ring buffer, in samples.
pub const ADC_BUFFER_SIZE: usize = 2048;
/// Length of the trigger-aligned window handed to the waveform stage.
pub const TRIGGER_LEN: usize = 128;
/// Length of the spectrum capture and transform.
pub const FFT_LEN: usize = 1024;

// Index arithmetic relies on mask-based wrapping.
const _: () = assert!(ADC_BUFFER_SIZE.is_power_of_two());
const _: () = assert!(TRIGGER_LEN.is_power_of_two());
const _: () = assert!(FFT_LEN.is_power_of_two());

/// Width of the scope drawing area, in pixels.
pub const LCD_WIDTH: usize = 128;
/// Height of the scope drawing area, in pixels.
pub const LCD_HEIGHT: usize = 128;

/// Full scale of the analog input, in volts.
pub const VIN_RANGE: f32 = 3.3;
/// ADC resolution.
pub const ADC_BITS: u32 = 12;
/// Height of one scope division, in pixels.
pub const PIXELS_PER_DIV: f32 = 20.0;

/// Selectable vertical scales.
pub const VOLTS_PER_DIV: [f32; 5] = [0.1, 0.2, 0.5, 1.0, 2.0];
pub const VOLTAGE_SCALE_LABELS: [&str; 5] = ["100mV", "200mV", "500mV", "1V", "2V"];

pub const TIME_SCALE_LABEL: &str = "20us";
pub const SPECTRUM_TIME_LABEL: &str = "20kHz";
pub const SPECTRUM_SCALE_LABEL: &str = "20dB";

/// Pixel row corresponding to 0 dB in spectrum mode.
pub const DB_BASELINE: f32 = 128.0;

/// Display refresh release rate.
pub const FRAME_RATE_HZ: u32 = 30;
/// Input scan rate; the debounce steps below are calibrated against it.
pub const SCAN_RATE_HZ: u32 = 200;
/// Length of one CPU load measurement window.
pub const LOAD_WINDOW_MS: u32 = 10;

/// Consecutive active scans before a button reads as pressed.
pub const SAMPLES_TO_PRESS: i32 = 2;
/// Consecutive inactive scans before a button reads as released.
pub const SAMPLES_TO_RELEASE: i32 = 5;
/// Debounce counter value at which the pressed bit asserts.
pub const PRESSED_CEILING: i32 = SAMPLES_TO_PRESS * SAMPLES_TO_RELEASE;
pub const PRESS_STEP: i32 = PRESSED_CEILING / SAMPLES_TO_PRESS;
pub const RELEASE_STEP: i32 = PRESSED_CEILING / SAMPLES_TO_RELEASE;

/// Scan ticks a button must stay held before autorepeat starts.
pub const AUTOREPEAT_INITIAL: u32 = 100;
/// Scan ticks between synthetic presses once autorepeat is running.
pub const AUTOREPEAT_NEXT: u32 = 10;

// Joystick hysteresis: the press threshold sits strictly past the release
// threshold on each side of the axis.
pub const JOYSTICK_UPPER_PRESS: u16 = 3595;
pub const JOYSTICK_UPPER_RELEASE: u16 = 3095;
pub const JOYSTICK_LOWER_PRESS: u16 = 500;
pub const JOYSTICK_LOWER_RELEASE: u16 = 1000;

/// Command queue depth; usable capacity is one item fewer.
pub const COMMAND_QUEUE_LEN: usize = 8;
