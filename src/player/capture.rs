// SPDX-License-Identifier: MPL-2.0
//! Frame capture ("screenshot").
//!
//! The engine may hand back black frames while a segment is still decoding,
//! so capture polls until a frame with visible content appears. After the
//! fallback delay it settles for whatever it last got, or a black placeholder
//! when the engine produced nothing at all. Capture therefore always
//! completes.

use super::time_format::capture_file_name;
use super::timer::{earliest, TimerSlot};
use crate::config::{CaptureConfig, CAPTURE_PLACEHOLDER_HEIGHT, CAPTURE_PLACEHOLDER_WIDTH};
use crate::domain::video::RawFrame;
use crate::error::Result;
use image_rs::{ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How the captured image was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureQuality {
    /// A frame with visible content.
    Content,
    /// The fallback fired; the frame may be blank.
    Fallback,
    /// The engine produced no usable frame; a black placeholder was used.
    Placeholder,
}

impl CaptureQuality {
    fn file_prefix(self) -> &'static str {
        match self {
            Self::Content | Self::Fallback => "screenshot",
            Self::Placeholder => "screenshot-fallback",
        }
    }
}

/// An encoded capture ready to be saved or copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub file_name: String,
    pub png: Vec<u8>,
    pub quality: CaptureQuality,
}

impl CapturedFrame {
    /// Writes the PNG into `dir` under its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)?;
        Ok(path)
    }
}

/// Encodes an RGBA frame as PNG.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn encode_png(frame: &RawFrame) -> Result<Vec<u8>> {
    let placeholder;
    let frame = if frame.is_well_formed() {
        frame
    } else {
        placeholder = RawFrame::black(CAPTURE_PLACEHOLDER_WIDTH, CAPTURE_PLACEHOLDER_HEIGHT);
        &placeholder
    };
    let mut bytes = Vec::new();
    if let Some(img) =
        ImageBuffer::<Rgba<u8>, _>::from_raw(frame.width, frame.height, frame.rgba.clone())
    {
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    }
    Ok(bytes)
}

/// Polling state of one capture request.
#[derive(Debug, Clone)]
pub struct FrameCapture {
    retry_interval: Duration,
    fallback_after: Duration,
    blank_threshold: u8,
    active: bool,
    last_frame: Option<RawFrame>,
    retry: TimerSlot,
    fallback: TimerSlot,
}

impl FrameCapture {
    #[must_use]
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            retry_interval: Duration::from_millis(config.retry_interval_ms),
            fallback_after: Duration::from_millis(config.fallback_after_ms),
            blank_threshold: config.blank_threshold,
            active: false,
            last_frame: None,
            retry: TimerSlot::default(),
            fallback: TimerSlot::default(),
        }
    }

    /// Starts a capture. Returns false if one is already running.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.last_frame = None;
        self.retry.cancel();
        self.fallback.arm(now, self.fallback_after);
        true
    }

    /// Offers a grabbed frame. Returns the finished frame when it has content,
    /// otherwise schedules another attempt.
    pub fn offer(&mut self, frame: Option<RawFrame>, now: Instant) -> Option<(RawFrame, CaptureQuality)> {
        if !self.active {
            return None;
        }
        match frame.filter(RawFrame::is_well_formed) {
            Some(frame) if !frame.is_blank(self.blank_threshold) => {
                self.finish();
                Some((frame, CaptureQuality::Content))
            }
            Some(frame) => {
                tracing::debug!("captured frame is blank, retrying");
                self.last_frame = Some(frame);
                self.retry.arm(now, self.retry_interval);
                None
            }
            None => {
                self.retry.arm(now, self.retry_interval);
                None
            }
        }
    }

    /// True when a retry is due; the caller grabs a frame and calls
    /// [`offer`](Self::offer).
    pub fn retry_due(&mut self, now: Instant) -> bool {
        self.active && self.retry.fire_if_due(now)
    }

    /// Settles for the best frame so far once the fallback is due.
    pub fn fallback_due(&mut self, now: Instant) -> Option<(RawFrame, CaptureQuality)> {
        if !self.active || !self.fallback.fire_if_due(now) {
            return None;
        }
        let result = match self.last_frame.take() {
            Some(frame) => (frame, CaptureQuality::Fallback),
            None => (
                RawFrame::black(CAPTURE_PLACEHOLDER_WIDTH, CAPTURE_PLACEHOLDER_HEIGHT),
                CaptureQuality::Placeholder,
            ),
        };
        tracing::warn!(quality = ?result.1, "using fallback capture");
        self.finish();
        Some(result)
    }

    pub fn cancel(&mut self) {
        self.finish();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        earliest([self.retry.deadline(), self.fallback.deadline()])
    }

    fn finish(&mut self) {
        self.active = false;
        self.last_frame = None;
        self.retry.cancel();
        self.fallback.cancel();
    }
}

/// Encodes a finished capture taken at `position_secs`.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn finish_capture(
    frame: &RawFrame,
    quality: CaptureQuality,
    position_secs: f64,
) -> Result<CapturedFrame> {
    Ok(CapturedFrame {
        file_name: capture_file_name(quality.file_prefix(), position_secs),
        png: encode_png(frame)?,
        quality,
    })
}
