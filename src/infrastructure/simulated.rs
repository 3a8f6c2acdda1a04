// SPDX-License-Identifier: MPL-2.0
//! In-memory engine adapter.
//!
//! [`SimulatedEngine`] implements [`DecodeEngine`] by recording every command
//! and keeping just enough state (playhead, volume, tracks) to answer queries.
//! [`SimulatedLoader`] replays scripted load results with an optional latency
//! and records the requests a network engine would have issued.
//! Both back the headless scenario runner and the controller tests.

use crate::application::port::{DecodeEngine, SourceLoader};
use crate::domain::error::EngineError;
use crate::domain::video::{DrmConfig, RawFrame, SourceDescriptor, TrackId, VariantTrack};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A command received by the simulated engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetMuted(bool),
    SetPlaybackRate(f64),
    SetAbrEnabled(bool),
    SelectVariant(TrackId),
    GrabFrame,
}

/// Decode engine that records commands.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine {
    pub commands: Vec<EngineCommand>,
    pub current_time: f64,
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
    pub rate: f64,
    pub abr_enabled: bool,
    pub tracks: Vec<VariantTrack>,
    /// Frames returned by successive grabs; `None` entries simulate failure.
    pub frames: VecDeque<Option<RawFrame>>,
}

impl SimulatedEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
            abr_enabled: true,
            ..Self::default()
        }
    }

    /// Adds variant tracks; the first one is marked active.
    #[must_use]
    pub fn with_tracks(mut self, heights: &[Option<u32>]) -> Self {
        self.tracks = heights
            .iter()
            .zip(1_u32..)
            .map(|(height, id)| VariantTrack {
                id: TrackId(id),
                height: *height,
                bandwidth: u64::from(height.unwrap_or(0)) * 2_500,
                active: id == 1,
            })
            .collect();
        self
    }

    /// Seek targets in command order.
    #[must_use]
    pub fn seeks(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                EngineCommand::Seek(time) => Some(*time),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self, wanted: &EngineCommand) -> usize {
        self.commands.iter().filter(|c| *c == wanted).count()
    }
}

impl DecodeEngine for SimulatedEngine {
    fn play(&mut self) {
        self.playing = true;
        self.commands.push(EngineCommand::Play);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.commands.push(EngineCommand::Pause);
    }

    fn seek(&mut self, time_secs: f64) {
        self.current_time = time_secs;
        self.commands.push(EngineCommand::Seek(time_secs));
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level;
        self.commands.push(EngineCommand::SetVolume(level));
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.commands.push(EngineCommand::SetMuted(muted));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.commands.push(EngineCommand::SetPlaybackRate(rate));
    }

    fn variant_tracks(&self) -> Vec<VariantTrack> {
        self.tracks.clone()
    }

    fn is_abr_enabled(&self) -> bool {
        self.abr_enabled
    }

    fn set_abr_enabled(&mut self, enabled: bool) {
        self.abr_enabled = enabled;
        self.commands.push(EngineCommand::SetAbrEnabled(enabled));
    }

    fn select_variant(&mut self, track: TrackId) {
        for variant in &mut self.tracks {
            variant.active = variant.id == track;
        }
        self.commands.push(EngineCommand::SelectVariant(track));
    }

    fn grab_frame(&mut self) -> Option<RawFrame> {
        self.commands.push(EngineCommand::GrabFrame);
        self.frames.pop_front().flatten()
    }
}

/// Segment fetched first after a manifest loads.
const FIRST_SEGMENT: &str = "init.mp4";

/// Requests made for one load call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub manifest_url: String,
    /// First segment URI, carrying the manifest signature.
    pub segment_uri: String,
    /// Headers attached to license requests; empty without DRM.
    pub license_headers: Vec<(&'static str, String)>,
}

#[derive(Debug, Default)]
struct LoaderScript {
    results: VecDeque<Result<(), EngineError>>,
    requests: Vec<LoadRequest>,
}

/// Source loader replaying scripted results. Clones share one script.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLoader {
    script: Arc<Mutex<LoaderScript>>,
    latency: Duration,
}

impl SimulatedLoader {
    /// A loader whose loads succeed after `latency`.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            script: Arc::default(),
            latency,
        }
    }

    /// Queues the result of the next load; unscripted loads succeed.
    pub fn push_result(&self, result: Result<(), EngineError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .results
            .push_back(result);
    }

    /// Manifest URLs of every load call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.manifest_url)
            .collect()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }
}

impl SourceLoader for SimulatedLoader {
    fn load(&self, source: &SourceDescriptor) -> BoxFuture<'static, Result<(), EngineError>> {
        let result = {
            let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
            script.requests.push(LoadRequest {
                manifest_url: source.manifest_url.clone(),
                segment_uri: source.sign_segment_uri(FIRST_SEGMENT),
                license_headers: source
                    .drm
                    .as_ref()
                    .map(DrmConfig::license_headers)
                    .unwrap_or_default(),
            });
            script.results.pop_front().unwrap_or(Ok(()))
        };
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed()
    }
}
