//! Buffer Sizes and Memory Constraints
//!
//! The decode path never allocates. Every table is sized here at compile
//! time so the worst case is known before the firmware ships.

/// Configured devices the registry arena can hold.
///
/// Must be a power of two (`heapless::FnvIndexMap` requirement). Sixteen
/// covers a full AcuRite installation with room to spare:
/// - 16 slots × ~200 bytes/slot = ~3.2KB
pub const MAX_DEVICES: usize = 16;

/// Sink bindings per device, one per field kind.
pub const MAX_BINDINGS_PER_DEVICE: usize = 12;

/// Unconfigured transmitters remembered for diagnostics.
///
/// Neighbours' sensors on the same channel show up here; the oldest entry
/// is evicted when the table is full.
pub const MAX_OBSERVED_DEVICES: usize = 8;

/// Fields a single message can carry (Atlas with lightning: 5).
pub const MAX_MESSAGE_FIELDS: usize = 6;
