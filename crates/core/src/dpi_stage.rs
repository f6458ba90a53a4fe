//! DPI stage selection report.
//!
//! Layout (17 bytes):
//!   `08 07 00 00 00 06 | 01 54 04 51 | stage (55-stage) | 00 00 00 00 | 41`
//!
//! Bytes 6..9 are the fixed register selector, byte 10 the stage index and
//! byte 11 its checksum.

use crate::performance::{REGISTER, REGISTER_LEN};
use crate::report::{self, Report};

const MAGIC: [u8; 4] = [0x01, 0x54, 0x04, 0x51];

/// Encode a DPI stage selection.
///
/// The stage is not range-checked: it is truncated to its low byte and the
/// checksum wraps accordingly. The firmware decides what to do with indices
/// it has no stage for.
pub fn encode_dpi_stage(stage: i32) -> Report {
    let stage = stage as u8;
    report::write_register(
        REGISTER,
        REGISTER_LEN,
        [
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            MAGIC[3],
            stage,
            report::checksum(stage),
            0x00,
            0x00,
            0x00,
            0x00,
        ],
    )
}
