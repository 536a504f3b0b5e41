use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Interrupt-filled circular sample store.
///
/// Exactly one [`Writer`] exists per ring; it lives in the acquisition
/// interrupt and never blocks. Any number of [`Reader`] handles may snapshot
/// the latest index and read backwards from it. Readers are expected to stay
/// within one buffer length of the writer; samples older than that are
/// overwritten in place, which shows up as stale data rather than corruption.
pub struct SampleRing<const N: usize> {
    samples: UnsafeCell<[u16; N]>,
    head: AtomicUsize,
    overruns: AtomicU32,
}

unsafe impl<const N: usize> Sync for SampleRing<N> {}

impl<const N: usize> SampleRing<N> {
    const MASK: usize = {
        assert!(N.is_power_of_two());
        N - 1
    };

    pub const fn new() -> Self {
        SampleRing {
            samples: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(N - 1),
            overruns: AtomicU32::new(0),
        }
    }

    /// Splits the ring into its single producer handle and a copyable
    /// consumer handle. Taking `&'static mut self` guarantees this happens
    /// at most once per ring.
    pub fn split(&'static mut self) -> (Writer<N>, Reader<N>) {
        let ring: &'static SampleRing<N> = self;
        (Writer { ring }, Reader { ring })
    }
}

/// The sole producer role; owns advancing the write index.
pub struct Writer<const N: usize> {
    ring: &'static SampleRing<N>,
}

impl<const N: usize> Writer<N> {
    /// Stores one sample at the next index. Never blocks, never retries.
    pub fn push(&mut self, sample: u16) {
        let next = (self.ring.head.load(Ordering::Relaxed) + 1) & SampleRing::<N>::MASK;
        unsafe {
            (self.ring.samples.get() as *mut u16)
                .add(next)
                .write_volatile(sample);
        }
        self.ring.head.store(next, Ordering::Release);
    }

    /// Accounts for a hardware overrun; acquisition continues regardless.
    pub fn record_overrun(&mut self) {
        self.ring.overruns.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-only view of the ring.
#[derive(Clone, Copy)]
pub struct Reader<const N: usize> {
    ring: &'static SampleRing<N>,
}

impl<const N: usize> Reader<N> {
    pub fn capacity(&self) -> usize {
        N
    }

    /// Index of the newest sample. Offsets computed backwards from this
    /// snapshot stay coherent for one full buffer length.
    pub fn latest(&self) -> i32 {
        self.ring.head.load(Ordering::Acquire) as i32
    }

    /// Reads the sample at `index`, wrapping both directions.
    pub fn get(&self, index: i32) -> u16 {
        let wrapped = (index & (N as i32 - 1)) as usize;
        unsafe {
            (self.ring.samples.get() as *const u16)
                .add(wrapped)
                .read_volatile()
        }
    }

    pub fn overruns(&self) -> u32 {
        self.ring.overruns.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh<const N: usize>() -> (Writer<N>, Reader<N>) {
        Box::leak(Box::new(SampleRing::<N>::new())).split()
    }

    #[test]
    fn new_ring_starts_at_last_slot() {
        let (_, reader) = fresh::<8>();
        assert_eq!(reader.latest(), 7);
    }

    #[test]
    fn index_advances_modulo_capacity() {
        let (mut writer, reader) = fresh::<8>();
        for k in 1..=20 {
            writer.push(k);
            assert_eq!(reader.latest(), ((8 - 1 + k as usize) & 7) as i32);
        }
    }

    #[test]
    fn negative_indices_wrap() {
        let (mut writer, reader) = fresh::<8>();
        for k in 0..8 {
            writer.push(k);
        }
        // latest() is 7, holding sample 7
        assert_eq!(reader.get(reader.latest()), 7);
        assert_eq!(reader.get(-1), 7);
        assert_eq!(reader.get(-2), 6);
        assert_eq!(reader.get(8), 0);
    }

    #[test]
    fn overruns_accumulate() {
        let (mut writer, reader) = fresh::<8>();
        assert_eq!(reader.overruns(), 0);
        writer.record_overrun();
        writer.record_overrun();
        assert_eq!(reader.overruns(), 2);
    }
}
