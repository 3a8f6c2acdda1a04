// SPDX-License-Identifier: MPL-2.0
//! Raw RGBA frames grabbed from the decode engine.

/// An RGBA8 frame, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RawFrame {
    /// An opaque black frame of the given size.
    #[must_use]
    pub fn black(width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        let mut rgba = vec![0u8; pixels * 4];
        for alpha in rgba.iter_mut().skip(3).step_by(4) {
            *alpha = u8::MAX;
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Returns true when no pixel has a color channel above `threshold`.
    ///
    /// Alpha is ignored. An empty frame counts as blank.
    #[must_use]
    pub fn is_blank(&self, threshold: u8) -> bool {
        !self
            .rgba
            .chunks_exact(4)
            .any(|px| px[0] > threshold || px[1] > threshold || px[2] > threshold)
    }

    /// Returns true when the buffer length matches the dimensions.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}
