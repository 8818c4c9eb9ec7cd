//! Motion-capture frame types.
//!
//! The tracking system streams one fixed layout per datagram: a 5-byte
//! header followed by two item blocks of 75 bytes each.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     Frame number (u32)
//! 4       1     Items in block (u8)
//! 5       75    Item 0
//! 80      75    Item 1
//! 155     5     (unused tail of the 160-byte read)
//!
//! Item block (relative to item start):
//! 0       1     Item ID (u8)
//! 1       2     Item data size (u16)
//! 3       24    Name (ASCII, padded with non-printable filler)
//! 27      24    Translation x, y, z (f64 each)
//! 51      24    Rotation x, y, z in radians (f64 each)
//! ```
//!
//! All multi-byte fields are little-endian.

use serde::Serialize;

/// Number of bytes the decoder consumes from each datagram.
pub const FRAME_LEN: usize = 160;

/// Size of the frame header (frame number + item count).
pub const HEADER_LEN: usize = 5;

/// Size of one item block.
pub const ITEM_LEN: usize = 75;

/// Width of the fixed name field.
pub const NAME_LEN: usize = 24;

/// Number of item blocks in the fixed layout.
pub const ITEMS_PER_FRAME: usize = 2;

/// Frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameHeader {
    /// Sequence number assigned by the tracking system.
    pub frame_number: u32,
    /// Item count as reported by the sender (not validated).
    pub items_in_block: u8,
}

/// Three-component sample, in source units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One tracked rigid body within a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub item_id: u8,
    pub item_data_size: u16,
    /// Printable characters of the name field, in order.
    pub name: String,
    /// Raw translation as transmitted (millimetres on the Vicon stream).
    pub translation: Vec3,
    /// Raw rotation in radians.
    pub rotation: Vec3,
}

/// A fully decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFrame {
    pub header: FrameHeader,
    pub items: [ItemRecord; ITEMS_PER_FRAME],
}

impl DecodedFrame {
    /// Frame sequence number.
    pub fn frame_number(&self) -> u32 {
        self.header.frame_number
    }

    /// The item consumed by the tracker.
    pub fn primary(&self) -> &ItemRecord {
        &self.items[0]
    }
}
