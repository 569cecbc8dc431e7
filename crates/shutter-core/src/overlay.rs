//! Bitmap shutters from overlay planes.
//!
//! [PS3.3 § C.9.2 Overlay Plane Module](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.9.2.html)
//!
//! A presentation state may name an overlay group as a bitmap display
//! shutter (Shutter Overlay Group). Overlay Data packs one bit per pixel,
//! least significant bit first, frame after frame. Overlay Origin is the
//! 1-based `(row, column)` of the plane's top-left pixel in the image, and
//! Image Frame Origin the 1-based image frame its first frame belongs to.

use shutter_geom::Coverage;

use crate::ShutterError;

/// Upper bound on the packed Overlay Data of one plane, in bytes.
pub const MAX_OVERLAY_BYTES: u64 = 1 << 28;

/// One overlay plane of a presentation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayDescriptor {
    /// Overlay group, e.g. `0x6000`.
    pub group: u16,
    /// Overlay Rows.
    pub rows: u32,
    /// Overlay Columns.
    pub columns: u32,
    /// Overlay Origin as 1-based `(row, column)`; may be negative.
    pub origin: (i32, i32),
    /// Number of Frames in Overlay.
    pub frames: u32,
    /// Image Frame Origin, 1-based.
    pub image_frame_origin: u32,
    /// Overlay Data, packed bits.
    pub data: Vec<u8>,
}

impl OverlayDescriptor {
    /// A single-frame plane at the image origin with no bits set.
    ///
    /// # Errors
    ///
    /// See [`OverlayDescriptor::with_frames`].
    pub fn new(group: u16, rows: u32, columns: u32) -> Result<Self, ShutterError> {
        Self::with_frames(group, rows, columns, 1)
    }

    /// A multi-frame plane at the image origin with no bits set.
    ///
    /// Overlay Rows and Columns are 16-bit in DICOM.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::OverlayTooLarge`] if `rows` or `columns`
    /// exceed `u16::MAX` or the packed data would exceed
    /// [`MAX_OVERLAY_BYTES`].
    pub fn with_frames(
        group: u16,
        rows: u32,
        columns: u32,
        frames: u32,
    ) -> Result<Self, ShutterError> {
        let too_large = ShutterError::OverlayTooLarge {
            group,
            rows,
            columns,
            frames,
        };
        if rows > u32::from(u16::MAX) || columns > u32::from(u16::MAX) {
            return Err(too_large);
        }
        let Some(bytes) = u64::from(rows)
            .checked_mul(u64::from(columns))
            .and_then(|bits| bits.checked_mul(u64::from(frames)))
            .map(|bits| bits.div_ceil(8))
            .filter(|bytes| *bytes <= MAX_OVERLAY_BYTES)
        else {
            return Err(too_large);
        };
        let Ok(len) = usize::try_from(bytes) else {
            return Err(too_large);
        };
        Ok(Self {
            group,
            rows,
            columns,
            origin: (1, 1),
            frames,
            image_frame_origin: 1,
            data: vec![0; len],
        })
    }

    /// Builder-style origin.
    #[must_use]
    pub fn at(mut self, row: i32, column: i32) -> Self {
        self.origin = (row, column);
        self
    }

    /// Set or clear the bit at `(row, column)` of overlay frame `frame`.
    /// Positions outside the plane are ignored.
    pub fn set(&mut self, frame: u32, row: u32, column: u32, on: bool) {
        let Some(bit) = self.bit_index(frame, row, column) else {
            return;
        };
        let Some(byte) = self.data.get_mut(bit / 8) else {
            return;
        };
        let mask = 1u8 << (bit % 8);
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Set every bit of a block of overlay frame `frame`. The part of the
    /// block outside the plane is ignored.
    pub fn fill_block(&mut self, frame: u32, row: u32, column: u32, rows: u32, columns: u32) {
        if frame >= self.frames {
            return;
        }
        let row_end = row.saturating_add(rows).min(self.rows);
        let column_end = column.saturating_add(columns).min(self.columns);
        for r in row..row_end {
            for c in column..column_end {
                self.set(frame, r, c, true);
            }
        }
    }

    /// Whether the bit at `(row, column)` of overlay frame `frame` is set.
    /// Bits missing from a truncated data element read as clear.
    #[must_use]
    pub fn is_set(&self, frame: u32, row: u32, column: u32) -> bool {
        self.bit_index(frame, row, column)
            .and_then(|bit| self.data.get(bit / 8).map(|byte| (byte >> (bit % 8)) & 1 == 1))
            .unwrap_or(false)
    }

    /// Overlay frame shown on the zero-based image frame `frame_index`.
    #[must_use]
    pub fn overlay_frame(&self, frame_index: u32) -> Option<u32> {
        let frame = i64::from(frame_index) + 1 - i64::from(self.image_frame_origin);
        u32::try_from(frame).ok().filter(|f| *f < self.frames)
    }

    fn bit_index(&self, frame: u32, row: u32, column: u32) -> Option<usize> {
        if frame >= self.frames || row >= self.rows || column >= self.columns {
            return None;
        }
        let per_frame = u64::from(self.rows) * u64::from(self.columns);
        let bit = u64::from(frame) * per_frame + u64::from(row) * u64::from(self.columns)
            + u64::from(column);
        usize::try_from(bit).ok()
    }
}

/// Rasterized shutter overlay for one image frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayBitmap {
    group: u16,
    coverage: Coverage,
}

impl OverlayBitmap {
    /// Rasterize every plane of `group` onto a `width × height` bitmap for
    /// the zero-based image frame `frame_index`.
    ///
    /// Planes of other groups, and planes with no frame for `frame_index`,
    /// contribute nothing. Bits falling outside the bitmap are clipped.
    #[must_use]
    pub fn extract(
        width: u32,
        height: u32,
        overlays: &[OverlayDescriptor],
        group: u16,
        frame_index: u32,
    ) -> Self {
        let mut coverage = Coverage::empty(width, height);
        for overlay in overlays.iter().filter(|o| o.group == group) {
            let Some(frame) = overlay.overlay_frame(frame_index) else {
                continue;
            };
            let top = i64::from(overlay.origin.0) - 1;
            let left = i64::from(overlay.origin.1) - 1;
            for row in 0..overlay.rows {
                let Ok(y) = u32::try_from(top + i64::from(row)) else {
                    continue;
                };
                if y >= height {
                    break;
                }
                for column in 0..overlay.columns {
                    let Ok(x) = u32::try_from(left + i64::from(column)) else {
                        continue;
                    };
                    if x >= width {
                        break;
                    }
                    if overlay.is_set(frame, row, column) {
                        coverage.set(x, y, true);
                    }
                }
            }
        }
        Self { group, coverage }
    }

    /// Overlay group the bitmap was extracted from.
    #[must_use]
    pub const fn group(&self) -> u16 {
        self.group
    }

    /// Pixels covered by the overlay.
    #[must_use]
    pub const fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Whether no pixel is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coverage.covered_count() == 0
    }
}
