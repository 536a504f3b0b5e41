use core::f32::consts::PI;

use microfft::complex::cfft_1024;
use microfft::Complex32;
use num_traits::Float;

use crate::config::{DB_BASELINE, FFT_LEN, LCD_WIDTH};
use crate::ring::Reader;

/// Blackman window of the transform length.
pub fn blackman() -> [f32; FFT_LEN] {
    let mut window = [0.0; FFT_LEN];
    let span = (FFT_LEN - 1) as f32;
    for (i, w) in window.iter_mut().enumerate() {
        let x = i as f32 / span;
        *w = 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos();
    }
    window
}

/// Grabs the most recent transform-length stretch of raw samples.
pub fn capture<const N: usize>(reader: Reader<N>, samples: &mut [u16; FFT_LEN]) {
    let first = reader.latest() - (FFT_LEN as i32 - 1);
    for (k, slot) in samples.iter_mut().enumerate() {
        *slot = reader.get(first + k as i32);
    }
}

/// Windowed FFT plus log-magnitude conversion.
///
/// Holds its own window and bin storage so the transform can run outside any
/// critical section; every frame is independent, with no averaging or overlap
/// across cycles.
pub struct SpectrumEngine {
    window: [f32; FFT_LEN],
    bins: [Complex32; FFT_LEN],
}

impl SpectrumEngine {
    pub fn new() -> Self {
        SpectrumEngine {
            window: blackman(),
            bins: [Complex32::new(0.0, 0.0); FFT_LEN],
        }
    }

    /// Forms the complex input: offset-removed, windowed, zero imaginary.
    pub fn load(&mut self, samples: &[u16; FFT_LEN], offset: u16) {
        for ((bin, &sample), &w) in self.bins.iter_mut().zip(samples.iter()).zip(&self.window) {
            bin.re = (sample as f32 - offset as f32) * w;
            bin.im = 0.0;
        }
    }

    /// Runs the forward transform in place.
    pub fn run(&mut self) {
        cfft_1024(&mut self.bins);
    }

    /// Converts the low bins to display rows: `baseline - 10*log10(power)`.
    pub fn write_pixels(&self, pixels: &mut [i16; LCD_WIDTH]) {
        for (pixel, bin) in pixels
            .iter_mut()
            .take(LCD_WIDTH - 1)
            .zip(self.bins.iter())
        {
            let power = bin.norm_sqr();
            *pixel = (DB_BASELINE - 10.0 * power.log10()).round() as i16;
        }
        pixels[LCD_WIDTH - 1] = pixels[LCD_WIDTH - 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_tapers_to_zero_and_peaks_at_one() {
        let window = blackman();
        assert!(window[0].abs() < 1e-3);
        assert!(window[FFT_LEN - 1].abs() < 1e-3);
        let peak = window.iter().cloned().fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 0.01);
    }

    #[test]
    fn window_is_symmetric() {
        let window = blackman();
        for i in 0..FFT_LEN / 2 {
            assert!((window[i] - window[FFT_LEN - 1 - i]).abs() < 1e-5);
        }
    }

    fn sinusoid(bin: usize, amplitude: f32, offset: f32) -> [u16; FFT_LEN] {
        let mut samples = [0u16; FFT_LEN];
        for (i, s) in samples.iter_mut().enumerate() {
            let phase = 2.0 * PI * bin as f32 * i as f32 / FFT_LEN as f32;
            *s = (offset + amplitude * phase.sin()) as u16;
        }
        samples
    }

    #[test]
    fn pure_tone_dominates_its_bin() {
        let samples = sinusoid(10, 1000.0, 2048.0);
        let mut engine = SpectrumEngine::new();
        engine.load(&samples, 2048);
        engine.run();
        let mut pixels = [0i16; LCD_WIDTH];
        engine.write_pixels(&mut pixels);

        // strongest bin has the smallest pixel row
        let (strongest, _) = pixels[..LCD_WIDTH - 1]
            .iter()
            .enumerate()
            .skip(1)
            .min_by_key(|&(_, &p)| p)
            .unwrap();
        assert!((9..=11).contains(&strongest));
        // strictly stronger than everything outside the tone's neighborhood
        let peak = pixels[strongest];
        for (i, &p) in pixels[..LCD_WIDTH - 1].iter().enumerate().skip(1) {
            if !(9..=11).contains(&i) {
                assert!(peak < p, "bin {} not dominated: {} vs {}", i, peak, p);
            }
        }
    }

    #[test]
    fn frames_are_independent_and_repeatable() {
        let samples = sinusoid(25, 800.0, 2000.0);
        let mut engine = SpectrumEngine::new();
        let mut first = [0i16; LCD_WIDTH];
        let mut second = [0i16; LCD_WIDTH];

        engine.load(&samples, 2000);
        engine.run();
        engine.write_pixels(&mut first);

        engine.load(&samples, 2000);
        engine.run();
        engine.write_pixels(&mut second);

        assert_eq!(&first[..], &second[..]);
    }
}
