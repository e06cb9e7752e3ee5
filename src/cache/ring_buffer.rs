//! Per-entry history of rate vectors.
//!
//! The buffer is a flat `values_num * length` slice laid out step by step:
//!
//! ```text
//! +-----+-----+-----+-----+-----+-----+-----+----
//! ! ds0 ! ds1 ! ds0 ! ds1 ! ds0 ! ds1 ! ds0 ! ...
//! +-----+-----+-----+-----+-----+-----+-----+----
//! !   t = 0   !   t = 1   !   t = 2   !   ...
//! +-----------+-----------+-----------+----
//! ```
//!
//! `index` points at the next step to overwrite. Growing only appends NaN
//! steps at the end; existing circular positions are not renumbered.

use crate::core::{CacheError, Result};

/// Growable circular buffer of rate vectors
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values_num: usize,
    slots: Vec<f64>,
    index: usize,
    length: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer for `values_num` columns
    pub fn new(values_num: usize) -> Self {
        Self {
            values_num,
            slots: Vec::new(),
            index: 0,
            length: 0,
        }
    }

    /// Number of steps the buffer can hold
    pub fn capacity(&self) -> usize {
        self.length
    }

    /// Position of the next write
    pub fn index(&self) -> usize {
        self.index
    }

    /// Grow the buffer to hold at least `steps` steps.
    ///
    /// New steps are filled with NaN. Never shrinks.
    pub fn ensure_capacity(&mut self, steps: usize) -> Result<()> {
        if self.length >= steps {
            return Ok(());
        }

        let wanted = steps
            .checked_mul(self.values_num)
            .ok_or_else(|| CacheError::allocation(format!("history of {} steps overflows", steps)))?;
        self.slots
            .try_reserve_exact(wanted - self.slots.len())
            .map_err(|e| CacheError::allocation(format!("history growth to {} steps: {}", steps, e)))?;
        self.slots.resize(wanted, f64::NAN);
        self.length = steps;
        Ok(())
    }

    /// Store one rate vector and advance the write position
    pub fn push(&mut self, rates: &[f64]) {
        if self.length == 0 {
            return;
        }
        debug_assert_eq!(rates.len(), self.values_num);
        debug_assert!(self.index < self.length);

        let start = self.index * self.values_num;
        self.slots[start..start + self.values_num].copy_from_slice(rates);
        self.index = (self.index + 1) % self.length;
    }

    /// Read the `steps` most recent rate vectors, newest first.
    ///
    /// Steps beyond the buffer's capacity are returned as NaN.
    pub fn read(&self, steps: usize) -> Vec<Vec<f64>> {
        (0..steps)
            .map(|i| {
                if i >= self.length {
                    return vec![f64::NAN; self.values_num];
                }
                let src = if i < self.index {
                    self.index - (i + 1)
                } else {
                    self.length + self.index - (i + 1)
                };
                let start = src * self.values_num;
                self.slots[start..start + self.values_num].to_vec()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().flatten().copied().collect()
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = HistoryBuffer::new(2);
        assert_eq!(buffer.capacity(), 0);
        let rows = buffer.read(2);
        assert_eq!(rows.len(), 2);
        assert!(flat(&rows).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_push_without_capacity_is_ignored() {
        let mut buffer = HistoryBuffer::new(1);
        buffer.push(&[1.0]);
        assert_eq!(buffer.index(), 0);
    }

    #[test]
    fn test_newest_first() {
        let mut buffer = HistoryBuffer::new(2);
        buffer.ensure_capacity(4).unwrap();
        buffer.push(&[1.0, 10.0]);
        buffer.push(&[2.0, 20.0]);
        buffer.push(&[3.0, 30.0]);

        let rows = buffer.read(3);
        assert_eq!(rows, vec![vec![3.0, 30.0], vec![2.0, 20.0], vec![1.0, 10.0]]);

        let rows = buffer.read(4);
        assert!(rows[3].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_wraparound() {
        let mut buffer = HistoryBuffer::new(1);
        buffer.ensure_capacity(3).unwrap();
        for v in 1..=5 {
            buffer.push(&[f64::from(v)]);
        }
        // 5 writes into 3 slots: index is back at 2
        assert_eq!(buffer.index(), 2);
        assert_eq!(flat(&buffer.read(3)), vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_never_shrinks() {
        let mut buffer = HistoryBuffer::new(1);
        buffer.ensure_capacity(5).unwrap();
        buffer.ensure_capacity(2).unwrap();
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn test_growth_after_wraparound_keeps_positions() {
        let mut buffer = HistoryBuffer::new(1);
        buffer.ensure_capacity(3).unwrap();
        for v in 1..=4 {
            buffer.push(&[f64::from(v)]);
        }
        // slots: [4, 2, 3], index 1
        buffer.ensure_capacity(5).unwrap();
        // slots: [4, 2, 3, NaN, NaN], index 1; reading walks back from
        // index 0 and then from the new tail.
        let rows = flat(&buffer.read(5));
        assert_eq!(rows[0], 4.0);
        assert!(rows[1].is_nan());
        assert!(rows[2].is_nan());
        assert_eq!(rows[3], 3.0);
        assert_eq!(rows[4], 2.0);
    }
}
