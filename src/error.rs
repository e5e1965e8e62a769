use core::fmt;

/// The ways an [`IndexedMinHeap`](crate::IndexedMinHeap) operation can be refused.
///
/// A refused operation has no effect on the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// A new key was inserted into a heap that already holds `capacity` entries.
    CapacityExceeded { capacity: usize },
    /// The minimum was requested from a heap without entries.
    EmptyQueue,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::CapacityExceeded { capacity } => {
                write!(f, "heap is full (capacity {capacity})")
            }
            HeapError::EmptyQueue => f.write_str("heap is empty"),
        }
    }
}

impl std::error::Error for HeapError {}

pub type Result<T> = std::result::Result<T, HeapError>;
