use serde::{ser::SerializeSeq, Serialize, Serializer};

/// Fixed-length ring buffer holding the last `capacity` samples of a metric.
///
/// The buffer is pre-filled at construction, so its length is always
/// exactly `capacity`; pushing overwrites the oldest slot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer<T> {
    slots: Box<[T]>,
    /// Index of the oldest element
    head: usize,
}

impl<T: Copy> HistoryBuffer<T> {
    /// Create a buffer of `capacity` copies of `fill`.
    ///
    /// A zero capacity is bumped to 1 so `latest` always has a value.
    pub fn new(capacity: usize, fill: T) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![fill; capacity].into_boxed_slice(),
            head: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        self.slots[self.head] = value;
        self.head = (self.head + 1) % self.slots.len();
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Most recently pushed value (or the fill value before any push)
    pub fn latest(&self) -> T {
        let len = self.slots.len();
        self.slots[(self.head + len - 1) % len]
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn as_sequence(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}

impl<T: Copy + PartialOrd> HistoryBuffer<T> {
    /// Largest value in the window, used to scale graphs
    pub fn peak(&self) -> T {
        // Never empty: capacity is at least 1
        self.iter()
            .copied()
            .fold(self.slots[0], |max, v| if v > max { v } else { max })
    }
}

impl<T: Copy + Serialize> Serialize for HistoryBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.capacity()))?;
        for value in self.iter() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}
