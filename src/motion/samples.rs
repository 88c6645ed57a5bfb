//! Trailing sample window with median and maximum
//!
//! The window is treated as full from the first call. Until `N` samples have
//! been added the untouched slots read as zero; that only skews the first few
//! frames after start-up and keeps the hot path branch-free.

/// Fixed trailing history of `N` readings (`N` must be odd)
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    values: [i32; N],
    sorted: [i32; N],
    cursor: usize,
}

impl<const N: usize> SampleWindow<N> {
    const ODD_CAPACITY: () = assert!(N % 2 == 1, "sample window capacity must be odd");

    pub fn new() -> Self {
        let _: () = Self::ODD_CAPACITY;
        Self {
            values: [0; N],
            sorted: [0; N],
            cursor: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Overwrite the oldest sample
    pub fn add(&mut self, value: i32) {
        debug_assert!(self.cursor < N, "sample cursor out of range");
        self.values[self.cursor] = value;
        self.cursor += 1;
        if self.cursor == N {
            self.cursor = 0;
        }
    }

    /// Middle value of the current contents
    ///
    /// Sorted fresh on every call; `add` always runs between queries in the
    /// frame loop so a cached order would never be reused.
    pub fn median(&mut self) -> i32 {
        self.sorted.copy_from_slice(&self.values);
        self.sorted.sort_unstable();
        self.sorted[N / 2]
    }

    /// Largest value of the current contents
    pub fn max(&self) -> i32 {
        let mut highest = self.values[0];
        for &value in &self.values[1..] {
            if value > highest {
                highest = value;
            }
        }
        highest
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.values = [0; N];
        self.cursor = 0;
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_median_of_five() {
        let mut window = SampleWindow::<5>::new();
        for v in [10, 2, 8, 4, 6] {
            window.add(v);
        }
        assert_eq!(window.median(), 6);
        assert_eq!(window.max(), 10);
    }

    #[test]
    fn test_wraparound_keeps_last_five() {
        let mut window = SampleWindow::<5>::new();
        for v in [900, 800, 1, 2, 3, 4, 5] {
            window.add(v);
        }
        assert_eq!(window.max(), 5);
        assert_eq!(window.median(), 3);
    }

    #[test]
    fn test_partial_window_reads_zeros() {
        let mut window = SampleWindow::<5>::new();
        window.add(50);
        window.add(70);
        assert_eq!(window.median(), 0);
        assert_eq!(window.max(), 70);
    }

    #[test]
    fn test_negative_values() {
        let mut window = SampleWindow::<3>::new();
        for v in [-5, -9, -7] {
            window.add(v);
        }
        assert_eq!(window.median(), -7);
        assert_eq!(window.max(), -5);
    }

    #[test]
    fn test_median_rejects_single_spike() {
        let mut window = SampleWindow::<5>::new();
        for v in [100, 110, 32_000, 105, 95] {
            window.add(v);
        }
        assert_eq!(window.median(), 105);
    }

    #[test]
    fn test_clear_resets_history() {
        let mut window = SampleWindow::<5>::new();
        for v in [1, 2, 3, 4, 5] {
            window.add(v);
        }
        window.clear();
        assert_eq!(window.max(), 0);
        assert_eq!(window.capacity(), 5);
    }

    proptest! {
        #[test]
        fn prop_median_ignores_insertion_order(mut values in prop::array::uniform5(-40_000i32..40_000)) {
            let mut window = SampleWindow::<5>::new();
            for &v in &values {
                window.add(v);
            }
            let median = window.median();
            values.sort();
            prop_assert_eq!(median, values[2]);
            prop_assert_eq!(window.max(), values[4]);
        }
    }
}
