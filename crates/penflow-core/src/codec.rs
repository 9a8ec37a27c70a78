//! Binary pen dot codec.
//!
//! A stroke's dots arrive as a packed little-endian array of fixed-size
//! records, one per pen sample.
//!
//! # Record Format (17 bytes)
//!
//! ```text
//! ┌──────────┬─────────┬─────────┬─────────┬────────┬────────┬──────────┐
//! │ Δ time   │ Force   │ X       │ Y       │ Tilt X │ Tilt Y │ Rotation │
//! │ i16      │ f32     │ f32     │ f32     │ u8     │ u8     │ u8       │
//! └──────────┴─────────┴─────────┴─────────┴────────┴────────┴──────────┘
//! ```
//!
//! The time field is a delta: absolute timestamps accumulate sequentially
//! on top of the stroke's base time. Rotation is carried but not used.

use base64::Engine;

use crate::error::{Error, Result};
use crate::types::{Dot, DotType};

/// Size of one encoded dot record in bytes.
pub const RECORD_LEN: usize = 17;

/// Factor applied to the normalized `[0, 1]` force.
pub const FORCE_SCALE: f32 = 2047.0;

/// One raw dot record as laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotRecord {
    /// Time since the previous dot (or the base time for the first dot).
    pub delta: i16,
    /// Normalized pressure.
    pub force: f32,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Horizontal tilt.
    pub tilt_x: u8,
    /// Vertical tilt.
    pub tilt_y: u8,
    /// Pen rotation, unused downstream.
    pub rotation: u8,
}

impl DotRecord {
    /// Reads a record from the first [`RECORD_LEN`] bytes of `buf`.
    pub fn read_from(buf: &[u8]) -> Option<Self> {
        if buf.len() < RECORD_LEN {
            return None;
        }
        Some(Self {
            delta: i16::from_le_bytes([buf[0], buf[1]]),
            force: f32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]),
            x: f32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]),
            y: f32::from_le_bytes([buf[10], buf[11], buf[12], buf[13]]),
            tilt_x: buf[14],
            tilt_y: buf[15],
            rotation: buf[16],
        })
    }

    /// Writes the record into the first [`RECORD_LEN`] bytes of `buf`.
    ///
    /// Returns `false` if the buffer is too small.
    pub fn write_to(&self, buf: &mut [u8]) -> bool {
        if buf.len() < RECORD_LEN {
            return false;
        }
        buf[0..2].copy_from_slice(&self.delta.to_le_bytes());
        buf[2..6].copy_from_slice(&self.force.to_le_bytes());
        buf[6..10].copy_from_slice(&self.x.to_le_bytes());
        buf[10..14].copy_from_slice(&self.y.to_le_bytes());
        buf[14] = self.tilt_x;
        buf[15] = self.tilt_y;
        buf[16] = self.rotation;
        true
    }

    /// Rejects records with a negative field.
    ///
    /// The time delta is exempt. The 8-bit fields are read as unsigned
    /// bytes and can never be negative.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("force", self.force), ("x", self.x), ("y", self.y)] {
            if value < 0.0 {
                return Err(Error::validation_field(
                    field,
                    format!("{field} must not be negative, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Force scaled to the integer range used downstream.
    pub fn scaled_force(&self) -> i32 {
        (self.force * FORCE_SCALE).round() as i32
    }
}

/// Encodes records into their packed wire form.
pub fn encode(records: &[DotRecord]) -> Vec<u8> {
    let mut bytes = vec![0u8; records.len() * RECORD_LEN];
    for (record, chunk) in records.iter().zip(bytes.chunks_exact_mut(RECORD_LEN)) {
        record.write_to(chunk);
    }
    bytes
}

/// Decodes a packed dot payload into an ordered, finalized dot list.
///
/// Deltas are taken by absolute value and accumulated on the previous
/// absolute time, so timestamps never decrease. The first dot is
/// `PenDown`, the last `PenUp` (a single dot ends up `PenUp`).
///
/// # Errors
///
/// - [`Error::Decode`] if the length is not a multiple of [`RECORD_LEN`]
/// - [`Error::Validation`] if a record has a negative field, `base_time`
///   is negative or the accumulated time overflows
/// - [`Error::EmptyStroke`] if the payload holds no records
pub fn decode(encoded: &[u8], base_time: i64, stroke_id: i32) -> Result<Vec<Dot>> {
    if encoded.len() % RECORD_LEN != 0 {
        return Err(Error::Decode {
            length: encoded.len(),
        });
    }

    if base_time < 0 {
        return Err(Error::validation_field(
            "timestamp",
            format!("base time {base_time} is negative"),
        ));
    }

    let mut dots = Vec::with_capacity(encoded.len() / RECORD_LEN);
    let mut clock = base_time;
    for chunk in encoded.chunks_exact(RECORD_LEN) {
        let Some(record) = DotRecord::read_from(chunk) else {
            return Err(Error::Decode {
                length: encoded.len(),
            });
        };
        record.validate()?;

        clock = clock
            .checked_add(i64::from(record.delta.unsigned_abs()))
            .ok_or_else(|| {
                Error::validation_field("timestamp", format!("time overflows after {clock}"))
            })?;
        dots.push(Dot {
            stroke_id,
            dot_type: DotType::PenMove,
            x: record.x,
            y: record.y,
            force: record.scaled_force(),
            tilt_x: i32::from(record.tilt_x),
            tilt_y: i32::from(record.tilt_y),
            timestamp: clock,
            sequence: dots.len() as u32,
        });
    }

    if dots.is_empty() {
        return Err(Error::EmptyStroke { stroke_id });
    }
    crate::types::finalize_dots(&mut dots, stroke_id);

    tracing::trace!(stroke_id, dots = dots.len(), "Decoded stroke dots");
    Ok(dots)
}

/// Decodes a base64 encoded dot payload.
pub fn decode_base64(encoded: &str, base_time: i64, stroke_id: i32) -> Result<Vec<Dot>> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    decode(&bytes, base_time, stroke_id)
}
