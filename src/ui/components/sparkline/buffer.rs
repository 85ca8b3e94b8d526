//! Bounded FIFO history of chart samples

extern crate alloc;
use alloc::collections::VecDeque;

use super::{ChartError, ChartResult};

/// Ordered history of at most `max_items` samples.
///
/// Samples are kept in arrival order. Pushing past capacity evicts exactly the
/// oldest sample. The backing storage is allocated once at construction.
#[derive(Debug, Clone)]
pub struct ChartBuffer {
    values: VecDeque<f32>,
    max_items: usize,
}

impl ChartBuffer {
    /// Create an empty buffer holding at most `max_items` samples
    pub fn new(max_items: usize) -> ChartResult<Self> {
        if max_items == 0 {
            return Err(ChartError::ZeroCapacity);
        }

        Ok(Self {
            values: VecDeque::with_capacity(max_items),
            max_items,
        })
    }

    /// Append a sample, returning the evicted one if the buffer was full
    pub fn push(&mut self, value: f32) -> Option<f32> {
        let evicted = if self.values.len() == self.max_items {
            self.values.pop_front()
        } else {
            None
        };

        self.values.push_back(value);
        evicted
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.values.iter().copied()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<f32> {
        self.values.back().copied()
    }

    /// Smallest and largest sample, or `None` when empty
    pub fn extent(&self) -> Option<(f32, f32)> {
        let mut iter = self.iter();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.max_items
    }

    /// Maximum number of samples kept
    pub fn capacity(&self) -> usize {
        self.max_items
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ChartBuffer::new(0).unwrap_err(), ChartError::ZeroCapacity);
    }

    #[test]
    fn test_keeps_last_max_items_in_order() {
        let mut buffer = ChartBuffer::new(4).unwrap();
        for v in 0..10 {
            buffer.push(v as f32);
        }

        let kept: Vec<f32> = buffer.iter().collect();
        assert_eq!(kept, [6.0, 7.0, 8.0, 9.0]);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_push_reports_eviction() {
        let mut buffer = ChartBuffer::new(2).unwrap();
        assert_eq!(buffer.push(1.0), None);
        assert_eq!(buffer.push(2.0), None);
        assert_eq!(buffer.push(3.0), Some(1.0));
    }

    #[test]
    fn test_single_slot_replaces() {
        let mut buffer = ChartBuffer::new(1).unwrap();
        buffer.push(5.0);
        buffer.push(7.0);

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.last(), Some(7.0));
    }

    #[test]
    fn test_extent() {
        let mut buffer = ChartBuffer::new(8).unwrap();
        assert_eq!(buffer.extent(), None);

        for v in [3.0, -1.5, 9.25, 4.0] {
            buffer.push(v);
        }
        assert_eq!(buffer.extent(), Some((-1.5, 9.25)));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buffer = ChartBuffer::new(3).unwrap();
        buffer.push(1.0);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 3);
    }
}
