use num_traits::Float;

use crate::config::{ADC_BITS, LCD_HEIGHT, PIXELS_PER_DIV, VIN_RANGE, VOLTS_PER_DIV};

/// Pixels per ADC count for the selected vertical scale.
pub fn scale_for(scale_index: usize) -> f32 {
    (VIN_RANGE / (1u32 << ADC_BITS) as f32) * (PIXELS_PER_DIV / VOLTS_PER_DIV[scale_index])
}

/// Maps a trigger-aligned window into display rows, centered on the screen.
pub fn process(samples: &[u16], offset: u16, scale: f32, pixels: &mut [i16]) {
    let half = (LCD_HEIGHT / 2) as f32;
    for (pixel, &sample) in pixels.iter_mut().zip(samples.iter()) {
        let centered = sample as f32 - offset as f32;
        *pixel = (half - (scale * centered).round()) as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_matches_configuration() {
        // 3.3 / 4096 * 20 / 0.5
        let expected = 0.032_226_56;
        assert!((scale_for(2) - expected).abs() < 1e-6);
    }

    #[test]
    fn offset_sample_lands_on_centerline() {
        let samples = [2048u16; 4];
        let mut pixels = [0i16; 4];
        process(&samples, 2048, scale_for(4), &mut pixels);
        assert_eq!(pixels, [64; 4]);
    }

    #[test]
    fn excursion_scales_and_inverts() {
        // at 2V/div one pixel is 204.8 counts; +1000 counts is ~4.88 div-pixels
        let samples = [2048u16, 3048, 1048];
        let mut pixels = [0i16; 3];
        process(&samples, 2048, scale_for(4), &mut pixels);
        assert_eq!(pixels[0], 64);
        assert_eq!(pixels[1], 64 - 8);
        assert_eq!(pixels[2], 64 + 8);
    }

    #[test]
    fn reprocessing_is_stable() {
        let samples: [u16; 128] = {
            let mut s = [0; 128];
            for (i, v) in s.iter_mut().enumerate() {
                *v = 1500 + (i as u16) * 9;
            }
            s
        };
        let mut first = [0i16; 128];
        let mut second = [0i16; 128];
        process(&samples, 2000, scale_for(1), &mut first);
        process(&samples, 2000, scale_for(1), &mut second);
        assert_eq!(first, second);
    }
}
