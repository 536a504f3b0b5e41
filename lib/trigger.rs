use crate::config::LCD_WIDTH;
use crate::ring::Reader;

/// Edge direction the trigger locks onto.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Slope {
    Rising,
    Falling,
}

impl Slope {
    pub fn label(self) -> &'static str {
        match self {
            Slope::Rising => "Rising",
            Slope::Falling => "Falling",
        }
    }
}

/// Midpoint of the buffer extremes, used as the trigger level.
///
/// Scans the whole buffer every cycle instead of tracking incrementally, so
/// the level follows DC drift and amplitude changes within one cycle.
pub fn dc_offset<const N: usize>(reader: Reader<N>) -> u16 {
    let mut min = u16::MAX;
    let mut max = 0;
    for i in 0..N as i32 {
        let sample = reader.get(i);
        if sample < min {
            min = sample;
        }
        if sample > max {
            max = sample;
        }
    }
    ((min as u32 + max as u32) / 2) as u16
}

/// Locates the most recent level crossing before the display anchor.
///
/// Starts half a display width behind the newest sample and walks backwards
/// through at most half the buffer. When no crossing qualifies the anchor
/// itself is returned; an untriggered sweep is normal, not an error.
pub fn search<const N: usize>(reader: Reader<N>, slope: Slope, level: u16) -> i32 {
    let anchor = reader.latest() - (LCD_WIDTH / 2) as i32;
    let mut index = anchor;
    for _ in 0..N / 2 {
        let before = reader.get(index);
        let after = reader.get(index + 1);
        let crossing = match slope {
            Slope::Rising => before <= level && after > level,
            Slope::Falling => before >= level && after < level,
        };
        if crossing {
            return index;
        }
        index -= 1;
    }
    anchor
}

/// Copies the window ending at `end` out of the ring, handling wraparound.
pub fn capture<const N: usize>(reader: Reader<N>, end: i32, window: &mut [u16]) {
    let first = end - (window.len() as i32 - 1);
    for (k, slot) in window.iter_mut().enumerate() {
        *slot = reader.get(first + k as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::SampleRing;

    const N: usize = 256;

    fn filled(f: impl Fn(usize) -> u16) -> Reader<N> {
        let ring = Box::leak(Box::new(SampleRing::<N>::new()));
        let (mut writer, reader) = ring.split();
        for i in 0..N {
            writer.push(f(i));
        }
        reader
    }

    #[test]
    fn offset_is_midpoint_of_extremes() {
        let reader = filled(|i| if i % 2 == 0 { 100 } else { 900 });
        assert_eq!(dc_offset(reader), 500);
    }

    #[test]
    fn rising_edge_is_located() {
        // single step up at index 100
        let reader = filled(|i| if i < 100 { 100 } else { 900 });
        let level = dc_offset(reader);
        let index = search(reader, Slope::Rising, level);
        assert_eq!(index, 99);
    }

    #[test]
    fn falling_edge_is_located() {
        let reader = filled(|i| if i < 100 { 900 } else { 100 });
        let level = dc_offset(reader);
        let index = search(reader, Slope::Falling, level);
        assert_eq!(index, 99);
    }

    #[test]
    fn flat_signal_falls_back_to_anchor() {
        let reader = filled(|_| 500);
        let anchor = reader.latest() - (LCD_WIDTH / 2) as i32;
        assert_eq!(search(reader, Slope::Rising, 500), anchor);
        assert_eq!(search(reader, Slope::Falling, 500), anchor);
    }

    #[test]
    fn search_is_idempotent_on_unchanged_buffer() {
        let reader = filled(|i| (i as u16) * 7 % 1024);
        let level = dc_offset(reader);
        let first = search(reader, Slope::Rising, level);
        let second = search(reader, Slope::Rising, level);
        assert_eq!(first, second);
        assert_eq!(dc_offset(reader), level);
    }

    #[test]
    fn capture_window_ends_at_index() {
        let reader = filled(|i| i as u16);
        let mut window = [0; 4];
        capture(reader, 255, &mut window);
        assert_eq!(window, [252, 253, 254, 255]);
    }

    #[test]
    fn capture_handles_wraparound() {
        let reader = filled(|i| i as u16);
        let mut window = [0; 4];
        capture(reader, 1, &mut window);
        assert_eq!(window, [254, 255, 0, 1]);
    }
}
