// SPDX-License-Identifier: MPL-2.0
//! Headless scenario runner.
//!
//! A scenario is a TOML file describing a source, how the simulated engine and
//! loader behave, and a list of timed inputs. [`run`] drives a controller
//! through a [`session`](crate::player::session) on the current tokio runtime
//! and collects every snapshot it publishes.
//!
//! ```toml
//! run_for_ms = 4000
//!
//! [source]
//! manifest_url = "https://cdn.example/lecture.mpd?sig=abc"
//!
//! [engine]
//! tracks = [1080, 720]
//! frames = ["blank", "content"]
//!
//! [loader]
//! latency_ms = 150
//! failures = [1003]
//!
//! [[step]]
//! at_ms = 0
//! input = { type = "load" }
//!
//! [[step]]
//! at_ms = 200
//! input = { type = "key-down", key = "ArrowRight" }
//! ```

use crate::application::port::EngineEvent;
use crate::config::PlayerConfig;
use crate::domain::error::EngineError;
use crate::domain::video::{RawFrame, SeekDirection, SourceDescriptor, TrackId};
use crate::error::{Error, Result};
use crate::infrastructure::{SimulatedEngine, SimulatedLoader};
use crate::player::session::{self, SessionEvent};
use crate::player::{
    create_controller, Command, Effect, Key, Menu, Message, PlayerSnapshot, QualitySelection,
    RetryPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Extra time the runner keeps going after the last step.
const SETTLE_AFTER_LAST_STEP_MS: u64 = 1000;

// =============================================================================
// Scenario Format
// =============================================================================

/// Behavior of the simulated engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineScript {
    /// Heights of the variant tracks, first one active.
    pub tracks: Vec<u32>,
    /// Results of successive frame grabs.
    pub frames: Vec<FrameScript>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameScript {
    /// A frame with visible content.
    Content,
    /// A black frame.
    Blank,
    /// The grab fails.
    None,
}

impl FrameScript {
    fn frame(self) -> Option<RawFrame> {
        const SIZE: u32 = 16;
        match self {
            Self::Content => Some(RawFrame {
                width: SIZE,
                height: SIZE,
                rgba: vec![160; (SIZE * SIZE * 4) as usize],
            }),
            Self::Blank => Some(RawFrame::black(SIZE, SIZE)),
            Self::None => None,
        }
    }
}

/// Behavior of the simulated loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoaderScript {
    pub latency_ms: u64,
    /// Error codes returned by the first load attempts, in order.
    pub failures: Vec<u32>,
}

/// One host or engine input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Input {
    Duration { secs: f64 },
    Time { secs: f64 },
    Progress { buffered_end_secs: f64 },
    Playing,
    Paused,
    Seeking,
    Seeked,
    Buffering { active: bool },
    EngineError { code: u32, message: String },
    TracksChanged,
    Visibility { visible: bool },
    Fullscreen { fullscreen: bool },
    Resize { width: f64 },
    PointerOver { over: bool },
    PointerDown {
        x: f64,
        #[serde(default = "one_contact")]
        contacts: usize,
    },
    PointerMove {
        x: f64,
        #[serde(default = "one_contact")]
        contacts: usize,
    },
    PointerUp,
    Click { x: f64, y: f64 },
    KeyDown {
        key: String,
        #[serde(default)]
        text_input_focused: bool,
    },
    KeyUp { key: String },
    /// Loads the scenario's source.
    Load,
    TogglePlayPause,
    SeekTo { secs: f64 },
    SeekBy { secs: f64 },
    HoldStart { direction: SeekDirection },
    HoldStop,
    Volume { level: f64 },
    ToggleMute,
    ToggleFullscreen,
    Capture,
    /// Selects a track by id, or automatic quality when omitted.
    Quality { track: Option<u32> },
    Rate { rate: f64 },
    OpenMenu { menu: Menu },
    CloseMenus,
}

fn one_contact() -> usize {
    1
}

impl Input {
    /// Converts the input into a controller message.
    #[must_use]
    pub fn into_message(self, source: &SourceDescriptor) -> Message {
        let engine = Message::Engine;
        let command = Message::Command;
        match self {
            Self::Duration { secs } => engine(EngineEvent::DurationChanged {
                duration_secs: secs,
            }),
            Self::Time { secs } => engine(EngineEvent::TimeUpdate { time_secs: secs }),
            Self::Progress { buffered_end_secs } => {
                engine(EngineEvent::Progress { buffered_end_secs })
            }
            Self::Playing => engine(EngineEvent::Playing),
            Self::Paused => engine(EngineEvent::Paused),
            Self::Seeking => engine(EngineEvent::Seeking),
            Self::Seeked => engine(EngineEvent::Seeked),
            Self::Buffering { active } => engine(EngineEvent::Buffering(active)),
            Self::EngineError { code, message } => {
                engine(EngineEvent::Error(EngineError::new(code, message)))
            }
            Self::TracksChanged => engine(EngineEvent::TracksChanged),
            Self::Visibility { visible } => Message::VisibilityChanged { visible },
            Self::Fullscreen { fullscreen } => Message::FullscreenChanged { fullscreen },
            Self::Resize { width } => Message::Resized { width },
            Self::PointerOver { over } => Message::PointerOver(over),
            Self::PointerDown { x, contacts } => Message::PointerDown { x, contacts },
            Self::PointerMove { x, contacts } => Message::PointerMove { x, contacts },
            Self::PointerUp => Message::PointerUp,
            Self::Click { x, y } => Message::Click { x, y },
            Self::KeyDown {
                key,
                text_input_focused,
            } => Message::KeyDown {
                key: Key::from_name(&key),
                text_input_focused,
            },
            Self::KeyUp { key } => Message::KeyUp {
                key: Key::from_name(&key),
            },
            Self::Load => command(Command::LoadSource(source.clone())),
            Self::TogglePlayPause => command(Command::TogglePlayPause),
            Self::SeekTo { secs } => command(Command::SeekTo(secs)),
            Self::SeekBy { secs } => command(Command::SeekBy(secs)),
            Self::HoldStart { direction } => command(Command::StartHoldSeek(direction)),
            Self::HoldStop => command(Command::StopHoldSeek),
            Self::Volume { level } => command(Command::SetVolume(level)),
            Self::ToggleMute => command(Command::ToggleMute),
            Self::ToggleFullscreen => command(Command::ToggleFullscreen),
            Self::Capture => command(Command::CaptureFrame),
            Self::Quality { track } => command(Command::SelectQuality(
                track.map_or(QualitySelection::Auto, |id| QualitySelection::Track(TrackId(id))),
            )),
            Self::Rate { rate } => command(Command::SelectRate(rate)),
            Self::OpenMenu { menu } => command(Command::OpenMenu(menu)),
            Self::CloseMenus => command(Command::CloseMenus),
        }
    }
}

/// An input applied `at_ms` after the scenario starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    pub input: Input,
}

/// A complete scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    pub source: SourceDescriptor,
    #[serde(default)]
    pub engine: EngineScript,
    #[serde(default)]
    pub loader: LoaderScript,
    /// Minimum run time; the runner always waits a little past the last step.
    #[serde(default)]
    pub run_for_ms: Option<u64>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parses a scenario from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid scenario.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut scenario: Self = toml::from_str(text)?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Total run time.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let last = self
            .steps
            .last()
            .map_or(0, |step| step.at_ms + SETTLE_AFTER_LAST_STEP_MS);
        self.run_for_ms.unwrap_or(0).max(last)
    }

    fn build_engine(&self) -> SimulatedEngine {
        let heights: Vec<Option<u32>> = self.engine.tracks.iter().copied().map(Some).collect();
        let mut engine = SimulatedEngine::new().with_tracks(&heights);
        engine.frames = self
            .engine
            .frames
            .iter()
            .map(|script| script.frame())
            .collect();
        engine
    }

    fn build_loader(&self) -> SimulatedLoader {
        let loader = SimulatedLoader::new(Duration::from_millis(self.loader.latency_ms));
        for code in &self.loader.failures {
            loader.push_result(Err(EngineError::new(*code, "scripted load failure")));
        }
        loader
    }
}

// =============================================================================
// Report
// =============================================================================

/// A snapshot and when it was published.
#[derive(Debug, Clone, Serialize)]
pub struct TimedSnapshot {
    pub at_ms: u64,
    pub snapshot: PlayerSnapshot,
}

/// Everything observed while running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub snapshots: Vec<TimedSnapshot>,
    /// File names of captured frames.
    pub captures: Vec<String>,
    /// Paths written when an output directory was given.
    pub saved: Vec<PathBuf>,
    pub fatal: Option<String>,
    /// Manifest URLs of every load attempt.
    pub load_attempts: Vec<String>,
    /// Engine seek targets in order.
    pub seeks: Vec<f64>,
    pub final_snapshot: PlayerSnapshot,
}

impl TimedSnapshot {
    /// One-line summary for terminal output.
    #[must_use]
    pub fn summary(&self) -> String {
        let s = &self.snapshot;
        let mut line = format!(
            "{:>6} ms  {}  {} ({:.0}%, buffered {:.0}%)  loading={:?}  controls={}",
            self.at_ms,
            if s.is_playing { "playing" } else { "paused " },
            s.time_label(),
            s.progress_percent(),
            s.buffered_percent(),
            s.loading_state,
            if s.controls_shown { "shown" } else { "hidden" },
        );
        if let Some(seek) = &s.seek_feedback {
            line.push_str(&format!("  seek={:+}s", seek.offset_secs));
        }
        if let Some(hold) = &s.continuous_seek_feedback {
            line.push_str(&format!("  hold={}x", hold.multiplier));
        }
        if let Some(volume) = &s.volume_feedback {
            line.push_str(&format!("  volume={:.2}", volume.level));
        }
        if let Some(error) = &s.fatal_error {
            line.push_str(&format!("  fatal={error}"));
        }
        line
    }
}

// =============================================================================
// Runner
// =============================================================================

#[derive(Default)]
struct Observed {
    snapshots: Vec<TimedSnapshot>,
    captures: Vec<String>,
    saved: Vec<PathBuf>,
    fatal: Option<String>,
}

impl Observed {
    /// Records one session event. Returns a reply for the controller, if any.
    fn record(
        &mut self,
        event: SessionEvent,
        at_ms: u64,
        out_dir: Option<&Path>,
    ) -> Result<Option<Message>> {
        match event {
            SessionEvent::Snapshot(snapshot) => {
                self.snapshots.push(TimedSnapshot { at_ms, snapshot });
            }
            SessionEvent::Effect(Effect::RequestFullscreen(fullscreen)) => {
                return Ok(Some(Message::FullscreenChanged { fullscreen }));
            }
            SessionEvent::Effect(Effect::FrameCaptured(frame)) => {
                if let Some(dir) = out_dir {
                    self.saved.push(frame.save_to_dir(dir)?);
                }
                self.captures.push(frame.file_name);
            }
            SessionEvent::Effect(Effect::Fatal(error)) => self.fatal = Some(error.to_string()),
            SessionEvent::Effect(Effect::Load { .. }) => {}
        }
        Ok(None)
    }
}

/// Runs `scenario` against the simulated engine.
///
/// Captured frames are written to `out_dir` when given. Must be awaited on a
/// current-thread runtime; pausing tokio time makes the run instantaneous.
///
/// # Errors
///
/// Returns an error if a capture cannot be saved.
pub async fn run(
    scenario: &Scenario,
    config: PlayerConfig,
    out_dir: Option<&Path>,
) -> Result<Report> {
    let loader = scenario.build_loader();
    let policy = RetryPolicy::from_config(&config.recovery);
    let controller = create_controller(config, scenario.build_engine());
    let (tx, inbox) = mpsc::channel(64);
    let (outbox, mut events) = mpsc::unbounded_channel();

    let driver = async move {
        let start = tokio::time::Instant::now();
        let end = start + Duration::from_millis(scenario.duration_ms());
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut observed = Observed::default();
        let mut steps = scenario.steps.iter().peekable();

        loop {
            let wake_at = steps
                .peek()
                .map_or(end, |step| start + Duration::from_millis(step.at_ms));
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if let Some(reply) = observed.record(event, elapsed_ms(), out_dir)? {
                        tx.send(reply)
                            .await
                            .map_err(|_| Error::Scenario("session stopped".into()))?;
                    }
                }
                () = tokio::time::sleep_until(wake_at) => {
                    let Some(step) = steps.next() else { break };
                    tracing::debug!(at_ms = step.at_ms, input = ?step.input, "scenario step");
                    let message = step.input.clone().into_message(&scenario.source);
                    tx.send(message)
                        .await
                        .map_err(|_| Error::Scenario("session stopped".into()))?;
                }
            }
        }

        drop(tx);
        let at_ms = elapsed_ms();
        while let Some(event) = events.recv().await {
            observed.record(event, at_ms, out_dir)?;
        }
        Ok::<_, Error>(observed)
    };

    let (controller, observed) = tokio::join!(
        session::run(controller, loader.clone(), policy, inbox, outbox),
        driver
    );
    let observed = observed?;

    Ok(Report {
        snapshots: observed.snapshots,
        captures: observed.captures,
        saved: observed.saved,
        fatal: observed.fatal,
        load_attempts: loader.calls(),
        seeks: controller.engine().seeks(),
        final_snapshot: controller.snapshot(),
    })
}
