// SPDX-License-Identifier: MPL-2.0
//! The playback controller.
//!
//! [`Controller`] composes the gesture, hold-seek, visibility, recovery and
//! capture components around one [`DecodeEngine`]. It is a synchronous,
//! time-injected state machine: every input carries `now`, and the host is
//! responsible for waking it at [`Controller::next_deadline`] and on every
//! display frame while [`Controller::wants_frames`] is true.
//!
//! Work the controller cannot do itself (loading a source, entering
//! fullscreen, saving a capture) is returned as [`Effect`]s.

use super::arbiter::{self, ArbiterInputs};
use super::capture::{finish_capture, CaptureQuality, CapturedFrame, FrameCapture};
use super::continuous_seek::{ContinuousSeek, StartOutcome};
use super::controls::{ControlsVisibility, Menu, SuppressionReason};
use super::feedback::{FeedbackFlags, ScrubFeedback, SeekFeedback, VolumeFeedback};
use super::gesture::{self, GestureContext};
use super::keyboard::{Key, KeyAction, KeyContext, Keyboard};
use super::quality::{self, QualityOption, QualitySelection};
use super::recovery::{ErrorResponse, LoadResolution, LoadTicket, Recovery, ReloadRequest};
use super::retry::LoadOutcome;
use super::snapshot::PlayerSnapshot;
use super::timer::{earliest, TimerSlot};
use crate::application::port::{DecodeEngine, EngineEvent};
use crate::config::PlayerConfig;
use crate::domain::error::EngineError;
use crate::domain::video::{
    clamp_time, PlaybackClock, PlaybackRate, RawFrame, SeekDirection, SourceDescriptor, TrackId,
    Volume,
};
use std::time::{Duration, Instant};

/// Host input.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Engine(EngineEvent),
    VisibilityChanged { visible: bool },
    FullscreenChanged { fullscreen: bool },
    /// Player width in pixels.
    Resized { width: f64 },
    /// Pointer entered (`true`) or left (`false`) the player.
    PointerOver(bool),
    PointerDown { x: f64, contacts: usize },
    PointerMove { x: f64, contacts: usize },
    PointerUp,
    Click { x: f64, y: f64 },
    KeyDown { key: Key, text_input_focused: bool },
    KeyUp { key: Key },
    /// Display frame callback.
    FrameTick,
    /// The deadline from [`Controller::next_deadline`] was reached.
    TimerWakeup,
    LoadFinished { ticket: LoadTicket, outcome: LoadOutcome },
    /// A UI control was activated.
    Command(Command),
}

/// Imperative UI actions, mirroring the controller's public entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadSource(SourceDescriptor),
    TogglePlayPause,
    SeekTo(f64),
    SeekBy(f64),
    StartHoldSeek(SeekDirection),
    StopHoldSeek,
    SetVolume(f64),
    ToggleMute,
    ToggleFullscreen,
    CaptureFrame,
    SelectQuality(QualitySelection),
    SelectRate(f64),
    OpenMenu(Menu),
    CloseMenus,
}

/// Work for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Load `source` (with retry), then report [`Message::LoadFinished`].
    /// A newer `Load` supersedes any load in flight.
    Load {
        ticket: LoadTicket,
        source: SourceDescriptor,
        resume_at: Option<f64>,
    },
    /// Enter (`true`) or leave (`false`) fullscreen.
    RequestFullscreen(bool),
    FrameCaptured(CapturedFrame),
    /// Playback failed terminally.
    Fatal(EngineError),
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Adaptive playback controller.
#[derive(Debug)]
pub struct Controller<E> {
    config: PlayerConfig,
    engine: E,
    source: Option<SourceDescriptor>,
    clock: PlaybackClock,
    is_playing: bool,
    engine_seeking: bool,
    buffering: bool,
    volume: Volume,
    muted: bool,
    rate: PlaybackRate,
    fullscreen: bool,
    pointer_over: bool,
    width: f64,
    feedback: FeedbackFlags,
    seek_gesture: TimerSlot,
    hold: ContinuousSeek,
    gesture: gesture::State,
    controls: ControlsVisibility,
    recovery: Recovery,
    keyboard: Keyboard,
    capture: FrameCapture,
    qualities: Vec<QualityOption>,
    selected_quality: Option<TrackId>,
}

impl<E: DecodeEngine> Controller<E> {
    #[must_use]
    pub fn new(config: PlayerConfig, engine: E) -> Self {
        Self {
            hold: ContinuousSeek::new(config.seek.clone()),
            gesture: gesture::State::new(config.gesture.clone()),
            controls: ControlsVisibility::new(&config.controls),
            recovery: Recovery::new(&config.recovery),
            capture: FrameCapture::new(&config.capture),
            config,
            engine,
            source: None,
            clock: PlaybackClock::default(),
            is_playing: false,
            engine_seeking: false,
            buffering: false,
            volume: Volume::default(),
            muted: false,
            rate: PlaybackRate::default(),
            fullscreen: false,
            pointer_over: false,
            width: 0.0,
            feedback: FeedbackFlags::default(),
            seek_gesture: TimerSlot::default(),
            keyboard: Keyboard::default(),
            qualities: Vec::new(),
            selected_quality: None,
        }
    }

    // =========================================================================
    // Message dispatch
    // =========================================================================

    /// Handles one host input.
    pub fn handle(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::Engine(event) => self.on_engine_event(event, now, &mut effects),
            Message::VisibilityChanged { visible } => self.on_visibility(visible, now),
            Message::FullscreenChanged { fullscreen } => self.fullscreen = fullscreen,
            Message::Resized { width } => self.width = width.max(0.0),
            Message::PointerOver(over) => self.pointer_over = over,
            Message::PointerDown { x, contacts } => {
                self.route_gesture(gesture::Message::PointerDown { x, contacts }, now);
            }
            Message::PointerMove { x, contacts } => {
                self.route_gesture(gesture::Message::PointerMove { x, contacts }, now);
            }
            Message::PointerUp => {
                self.route_gesture(gesture::Message::PointerUp { now }, now);
            }
            Message::Click { x, y } => {
                self.route_gesture(gesture::Message::Click { x, y, now }, now);
            }
            Message::KeyDown {
                key,
                text_input_focused,
            } => {
                let ctx = KeyContext {
                    pointer_over_player: self.pointer_over,
                    fullscreen: self.fullscreen,
                    text_input_focused,
                };
                if let Some(action) = self.keyboard.key_down(key, ctx) {
                    self.apply_key(action, now, &mut effects);
                }
            }
            Message::KeyUp { key } => {
                if let Some(action) = self.keyboard.key_up(&key) {
                    self.apply_key(action, now, &mut effects);
                }
            }
            Message::FrameTick => self.on_frame(now),
            Message::TimerWakeup => effects.extend(self.fire_due(now)),
            Message::LoadFinished { ticket, outcome } => {
                effects.extend(self.load_finished(ticket, outcome, now));
            }
            Message::Command(command) => effects.extend(self.run_command(command, now)),
        }
        self.sync_controls(now);
        effects
    }

    /// Runs every timer whose deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        self.feedback.fire_due(now);
        self.seek_gesture.fire_if_due(now);
        for effect in self.gesture.fire_due(now) {
            self.apply_gesture(effect, now);
        }
        if self.controls.fire_if_due(now) {
            tracing::trace!("controls auto-hidden");
        }

        if let Some(request) = self.recovery.fire_if_due(now, self.engine.current_time()) {
            self.issue_load(request, now, &mut effects);
        }

        if self.capture.retry_due(now) {
            let frame = self.engine.grab_frame();
            if let Some(done) = self.capture.offer(frame, now) {
                self.deliver_capture(done, &mut effects);
            }
        }
        if let Some(done) = self.capture.fallback_due(now) {
            self.deliver_capture(done, &mut effects);
        }

        self.sync_controls(now);
        effects
    }

    /// Earliest instant at which [`fire_due`](Self::fire_due) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.feedback.next_deadline(),
            self.seek_gesture.deadline(),
            self.gesture.next_deadline(),
            self.controls.deadline(),
            self.recovery.deadline(),
            self.capture.deadline(),
        ])
    }

    /// True while a hold-seek needs display frame callbacks.
    #[must_use]
    pub fn wants_frames(&self) -> bool {
        self.hold.wants_frames()
    }

    // =========================================================================
    // Imperative entry points
    // =========================================================================

    pub fn toggle_play_pause(&mut self, now: Instant) {
        if self.recovery.fatal().is_some() {
            return;
        }
        if self.is_playing {
            self.engine.pause();
            self.is_playing = false;
        } else {
            self.engine.play();
            self.is_playing = true;
        }
        self.controls.rearm(now);
        self.sync_controls(now);
    }

    /// Seeks by a signed offset. Returns the applied position.
    pub fn seek_by(&mut self, offset_secs: f64, now: Instant) -> f64 {
        self.seek_to(self.clock.current_time + offset_secs, now)
    }

    /// Seeks to an absolute position, clamped to the duration.
    pub fn seek_to(&mut self, time_secs: f64, now: Instant) -> f64 {
        if !self.clock.has_duration() {
            return self.clock.current_time;
        }
        let target = clamp_time(time_secs, self.clock.duration);
        self.engine.seek(target);
        self.clock.set_position(target);
        self.sync_controls(now);
        target
    }

    /// Starts a hold-seek. Returns true if a new session began.
    pub fn start_hold_seek(&mut self, direction: SeekDirection, now: Instant) -> bool {
        let started = match self.hold.start(direction, now, &self.clock) {
            StartOutcome::Started(feedback) => {
                tracing::debug!(?direction, from = self.clock.current_time, "hold-seek started");
                self.feedback.continuous_seek.show(feedback);
                true
            }
            StartOutcome::AlreadyActive | StartOutcome::NoDuration => false,
        };
        self.sync_controls(now);
        started
    }

    pub fn stop_hold_seek(&mut self, now: Instant) {
        self.end_hold(now);
        self.sync_controls(now);
    }

    /// Sets the volume level. A non-zero level unmutes.
    pub fn set_volume(&mut self, level: f64, now: Instant) {
        self.volume = Volume::new(level);
        self.engine.set_volume(self.volume.value());
        if !self.volume.is_silent() && self.muted {
            self.muted = false;
            self.engine.set_muted(false);
        }
        self.show_volume_feedback(self.volume.is_silent(), now);
    }

    /// Moves the volume by `steps` configured increments (may be negative).
    pub fn adjust_volume(&mut self, steps: f64, now: Instant) {
        let delta = steps * self.config.playback.volume_step;
        self.set_volume(self.volume.adjusted(delta).value(), now);
    }

    pub fn toggle_mute(&mut self, now: Instant) {
        self.muted = !self.muted;
        self.engine.set_muted(self.muted);
        self.show_volume_feedback(self.muted, now);
    }

    /// Asks the host to enter or leave fullscreen.
    #[must_use]
    pub fn toggle_fullscreen(&self) -> Effect {
        Effect::RequestFullscreen(!self.fullscreen)
    }

    /// Starts a frame capture. The capture may finish now or on a later
    /// timer wakeup.
    pub fn capture_frame(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.feedback
            .screenshot
            .show_for((), now, ms(self.config.feedback.screenshot_ms));
        if self.capture.begin(now) {
            let frame = self.engine.grab_frame();
            if let Some(done) = self.capture.offer(frame, now) {
                self.deliver_capture(done, &mut effects);
            }
        }
        effects
    }

    pub fn select_quality(&mut self, selection: QualitySelection, now: Instant) {
        match selection {
            QualitySelection::Auto => self.engine.set_abr_enabled(true),
            QualitySelection::Track(track) => {
                self.engine.select_variant(track);
                self.engine.set_abr_enabled(false);
            }
        }
        tracing::debug!(?selection, "quality selected");
        self.refresh_tracks();
        self.close_menus(now);
    }

    /// Applies the preset nearest to `rate`.
    pub fn select_rate(&mut self, rate: f64, now: Instant) {
        self.rate = quality::snap_rate(rate, &self.config.playback.rates);
        self.engine.set_playback_rate(self.rate.value());
        self.close_menus(now);
    }

    pub fn open_menu(&mut self, menu: Menu, now: Instant) {
        self.controls.open_menu(menu, now);
        self.sync_controls(now);
    }

    pub fn close_menus(&mut self, now: Instant) {
        self.controls.close_menus(now);
        self.sync_controls(now);
    }

    /// Switches to a new source. Clears any fatal state.
    pub fn load_source(&mut self, source: SourceDescriptor, now: Instant) -> Vec<Effect> {
        tracing::info!(manifest = %source.manifest_url, "loading source");
        self.source = Some(source);
        self.clock = PlaybackClock::default();
        self.qualities.clear();
        self.selected_quality = None;
        let request = self.recovery.reset_for_source();
        let mut effects = Vec::new();
        self.issue_load(request, now, &mut effects);
        self.sync_controls(now);
        effects
    }

    /// Cancels every timer and frame loop.
    pub fn teardown(&mut self) {
        self.hold.release();
        self.gesture.cancel();
        self.controls.cancel();
        self.recovery.teardown();
        self.capture.cancel();
        self.feedback.clear_all();
        self.seek_gesture.cancel();
        self.keyboard.reset();
        tracing::debug!("controller torn down");
    }

    /// Dispatches a [`Command`] to its entry point.
    pub fn run_command(&mut self, command: Command, now: Instant) -> Vec<Effect> {
        match command {
            Command::LoadSource(source) => return self.load_source(source, now),
            Command::TogglePlayPause => self.toggle_play_pause(now),
            Command::SeekTo(time) => {
                self.seek_to(time, now);
            }
            Command::SeekBy(offset) => {
                self.seek_by(offset, now);
            }
            Command::StartHoldSeek(direction) => {
                self.start_hold_seek(direction, now);
            }
            Command::StopHoldSeek => self.stop_hold_seek(now),
            Command::SetVolume(level) => self.set_volume(level, now),
            Command::ToggleMute => self.toggle_mute(now),
            Command::ToggleFullscreen => return vec![self.toggle_fullscreen()],
            Command::CaptureFrame => return self.capture_frame(now),
            Command::SelectQuality(selection) => self.select_quality(selection, now),
            Command::SelectRate(rate) => self.select_rate(rate, now),
            Command::OpenMenu(menu) => self.open_menu(menu, now),
            Command::CloseMenus => self.close_menus(now),
        }
        Vec::new()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        let preview = self.gesture.active().and_then(|gesture| gesture.preview);
        let loading_state = arbiter::resolve(ArbiterInputs {
            buffering: self.buffering,
            seeking: self.engine_seeking,
            scrubbing: self.feedback.scrub.is_active(),
            continuous_seeking: self.feedback.continuous_seek.is_active(),
            single_seek_feedback: self.feedback.single_seek.is_active(),
        });

        PlayerSnapshot {
            is_playing: self.is_playing,
            current_time: self.clock.current_time,
            duration: self.clock.duration,
            buffered_end: self.clock.buffered_end,
            display_time: preview.unwrap_or(self.clock.current_time),
            loading_state,
            controls_shown: self.controls.is_shown(),
            open_menu: self.controls.open(),
            seek_feedback: self.feedback.single_seek.get().cloned(),
            scrub_feedback: self.feedback.scrub.get().cloned(),
            continuous_seek_feedback: self.feedback.continuous_seek.get().cloned(),
            volume_feedback: self.feedback.volume.get().cloned(),
            screenshot_active: self.feedback.screenshot.is_active(),
            available_qualities: self.qualities.clone(),
            selected_quality: self.selected_quality,
            playback_rate: self.rate.value(),
            volume: self.volume.value(),
            muted: self.muted,
            fullscreen: self.fullscreen,
            fatal_error: self.recovery.fatal().map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[must_use]
    pub fn is_hold_active(&self) -> bool {
        self.hold.is_active()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn on_engine_event(&mut self, event: EngineEvent, now: Instant, effects: &mut Vec<Effect>) {
        match event {
            EngineEvent::Playing => self.is_playing = true,
            EngineEvent::Paused => self.is_playing = false,
            EngineEvent::TimeUpdate { time_secs } => {
                if !self.hold.is_active() && !self.gesture.is_scrubbing() {
                    self.clock.set_position(time_secs);
                    // buffered end never trails the playhead
                    self.clock.set_buffered_end(self.clock.buffered_end);
                }
            }
            EngineEvent::DurationChanged { duration_secs } => {
                self.clock.set_duration(duration_secs);
            }
            EngineEvent::Progress { buffered_end_secs } => {
                self.clock.set_buffered_end(buffered_end_secs);
            }
            EngineEvent::Seeking => self.engine_seeking = true,
            EngineEvent::Seeked => self.engine_seeking = false,
            EngineEvent::Buffering(buffering) => self.buffering = buffering,
            EngineEvent::RateChanged { rate } => self.rate = PlaybackRate::new(rate),
            EngineEvent::VolumeChanged { level, muted } => {
                self.volume = Volume::new(level);
                self.muted = muted;
            }
            EngineEvent::TracksChanged => self.refresh_tracks(),
            EngineEvent::Error(error) => {
                match self.recovery.on_error(error, now, self.clock.current_time) {
                    ErrorResponse::ReloadPending | ErrorResponse::Ignored => {}
                    ErrorResponse::Fatal(error) => self.enter_fatal(error, now, effects),
                }
            }
        }
    }

    fn on_visibility(&mut self, visible: bool, now: Instant) {
        if visible {
            self.recovery.page_visible(now);
            return;
        }
        if self.recovery.page_hidden(self.is_playing, self.clock.current_time) {
            tracing::debug!("page hidden, pausing playback");
            self.engine.pause();
            self.is_playing = false;
        }
        self.end_hold(now);
    }

    fn on_frame(&mut self, now: Instant) {
        if let Some(step) = self.hold.on_frame(now, self.clock.duration) {
            self.engine.seek(step.target_time);
            self.clock.set_position(step.target_time);
            self.feedback.continuous_seek.show(step);
        }
    }

    fn gesture_context(&self) -> GestureContext {
        GestureContext {
            current_time: self.clock.current_time,
            duration: self.clock.duration,
            width: self.width,
        }
    }

    fn route_gesture(&mut self, message: gesture::Message, now: Instant) {
        let ctx = self.gesture_context();
        let effect = self.gesture.handle(message, &ctx);
        self.apply_gesture(effect, now);
    }

    fn apply_gesture(&mut self, effect: gesture::Effect, now: Instant) {
        match effect {
            gesture::Effect::TouchStarted => self.controls.show(now),
            gesture::Effect::None
            | gesture::Effect::TouchEnded
            | gesture::Effect::TouchSettled => {}
            gesture::Effect::ScrubPreview { time, delta_secs } => {
                self.feedback.scrub.show(ScrubFeedback { time, delta_secs });
            }
            gesture::Effect::ScrubCommitted { time } => {
                self.seek_to(time, now);
                self.feedback
                    .scrub
                    .linger(now, self.config.gesture.scrub_feedback_linger());
            }
            gesture::Effect::ZoneSeek { direction } => {
                self.seek_with_feedback(direction, self.config.gesture.double_tap_seek_secs, now);
            }
            gesture::Effect::TogglePlayback => self.toggle_play_pause(now),
            gesture::Effect::SingleTap => {
                if !self.seek_gesture_active() {
                    self.controls.toggle(now);
                }
            }
        }
    }

    fn apply_key(&mut self, action: KeyAction, now: Instant, effects: &mut Vec<Effect>) {
        match action {
            KeyAction::TogglePlayPause => self.toggle_play_pause(now),
            KeyAction::ToggleFullscreen => effects.push(self.toggle_fullscreen()),
            KeyAction::ToggleMute => self.toggle_mute(now),
            KeyAction::CaptureFrame => effects.extend(self.capture_frame(now)),
            KeyAction::SeekAndHold(direction) => {
                if self.hold.is_active() {
                    return;
                }
                self.seek_with_feedback(direction, self.config.seek.base_step_secs, now);
                self.start_hold_seek(direction, now);
            }
            KeyAction::ReleaseHold => self.stop_hold_seek(now),
            KeyAction::Volume(steps) => self.adjust_volume(steps, now),
        }
    }

    /// Single seek with overlay; also holds off control toggles briefly.
    fn seek_with_feedback(&mut self, direction: SeekDirection, amount_secs: f64, now: Instant) {
        let offset_secs = amount_secs * direction.sign();
        let time = self.seek_by(offset_secs, now);
        self.feedback.single_seek.show_for(
            SeekFeedback {
                direction,
                offset_secs,
                time,
            },
            now,
            ms(self.config.feedback.seek_ms),
        );
        self.seek_gesture
            .arm(now, ms(self.config.feedback.seek_gesture_suppress_ms));
    }

    fn show_volume_feedback(&mut self, muted: bool, now: Instant) {
        self.feedback.volume.show_for(
            VolumeFeedback {
                level: self.volume.value(),
                muted,
            },
            now,
            ms(self.config.feedback.volume_ms),
        );
    }

    fn end_hold(&mut self, now: Instant) {
        if let Some(session) = self.hold.release() {
            tracing::debug!(target_time = session.target_time, "hold-seek released");
            self.feedback
                .continuous_seek
                .linger(now, self.config.seek.feedback_linger());
        }
    }

    fn cancel_scrub(&mut self) {
        self.gesture.cancel();
        self.feedback.scrub.clear();
    }

    fn seek_gesture_active(&self) -> bool {
        self.seek_gesture.is_armed() || self.hold.is_active() || self.gesture.is_scrubbing()
    }

    fn issue_load(&mut self, request: ReloadRequest, now: Instant, effects: &mut Vec<Effect>) {
        let Some(source) = self.source.clone() else {
            tracing::warn!("reload requested without a source");
            return;
        };
        self.end_hold(now);
        self.cancel_scrub();
        self.buffering = true;
        tracing::info!(ticket = request.ticket.0, resume_at = ?request.resume_at, "issuing load");
        effects.push(Effect::Load {
            ticket: request.ticket,
            source,
            resume_at: request.resume_at,
        });
    }

    fn load_finished(&mut self, ticket: LoadTicket, outcome: LoadOutcome, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.recovery.finish_load(ticket, outcome) {
            LoadResolution::Resume(resume_at) => {
                self.buffering = false;
                if let Some(time) = resume_at {
                    tracing::info!(time, "seeking back after reload");
                    self.engine.seek(time);
                    self.clock.set_position(time);
                }
                self.refresh_tracks();
            }
            LoadResolution::Stale | LoadResolution::Superseded => {}
            LoadResolution::Fatal(error) => self.enter_fatal(error, now, &mut effects),
        }
        effects
    }

    fn enter_fatal(&mut self, error: EngineError, now: Instant, effects: &mut Vec<Effect>) {
        self.end_hold(now);
        self.cancel_scrub();
        self.capture.cancel();
        self.buffering = false;
        self.controls.show(now);
        effects.push(Effect::Fatal(error));
    }

    fn deliver_capture(&mut self, (frame, quality): (RawFrame, CaptureQuality), effects: &mut Vec<Effect>) {
        match finish_capture(&frame, quality, self.clock.current_time) {
            Ok(captured) => {
                tracing::info!(file = %captured.file_name, ?quality, "frame captured");
                effects.push(Effect::FrameCaptured(captured));
            }
            Err(err) => tracing::error!(%err, "frame capture failed"),
        }
    }

    fn refresh_tracks(&mut self) {
        let tracks = self.engine.variant_tracks();
        self.qualities = quality::available_qualities(&tracks);
        self.selected_quality = quality::selected_quality(&tracks, self.engine.is_abr_enabled());
    }

    fn sync_controls(&mut self, now: Instant) {
        let seek_gesture = self.seek_gesture_active();
        self.controls
            .set_reason(SuppressionReason::Touch, self.gesture.is_touching(), now);
        self.controls
            .set_reason(SuppressionReason::SeekGesture, seek_gesture, now);
        self.controls
            .set_reason(SuppressionReason::NotPlaying, !self.is_playing, now);
        self.controls
            .set_reason(SuppressionReason::NotFullscreen, !self.fullscreen, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::codes;
    use crate::infrastructure::{EngineCommand, SimulatedEngine};
    use crate::player::arbiter::LoadingState;
    use crate::test_utils::{assert_abs_diff_eq, TestClock};

    /// Gives `player` a 120 s video, 900 px wide, positioned at `at` seconds.
    fn prepare(player: &mut Controller<SimulatedEngine>, at: f64, now: Instant) {
        player.handle(Message::Resized { width: 900.0 }, now);
        player.handle(
            Message::Engine(EngineEvent::DurationChanged {
                duration_secs: 120.0,
            }),
            now,
        );
        player.handle(Message::Engine(EngineEvent::TimeUpdate { time_secs: at }), now);
    }

    fn player_at(at: f64, clock: &TestClock) -> Controller<SimulatedEngine> {
        let mut player = Controller::new(PlayerConfig::default(), SimulatedEngine::new());
        prepare(&mut player, at, clock.at(0));
        player
    }

    /// A player whose source finished loading.
    fn loaded(clock: &TestClock) -> Controller<SimulatedEngine> {
        let mut player = Controller::new(PlayerConfig::default(), SimulatedEngine::new());
        let effects = player.load_source(SourceDescriptor::new("lecture.mpd"), clock.at(0));
        let Some(Effect::Load { ticket, .. }) = effects.first().cloned() else {
            panic!("expected a load effect, got {effects:?}");
        };
        player.handle(
            Message::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded,
            },
            clock.at(0),
        );
        prepare(&mut player, 0.0, clock.at(0));
        player
    }

    fn playing_fullscreen(player: &mut Controller<SimulatedEngine>, now: Instant) {
        player.handle(Message::FullscreenChanged { fullscreen: true }, now);
        player.handle(Message::Engine(EngineEvent::Playing), now);
    }

    fn click(player: &mut Controller<SimulatedEngine>, x: f64, now: Instant) -> Vec<Effect> {
        player.handle(Message::Click { x, y: 200.0 }, now)
    }

    #[test]
    fn seek_is_clamped_and_needs_duration() {
        let clock = TestClock::new();
        let mut empty = Controller::new(PlayerConfig::default(), SimulatedEngine::new());
        assert_abs_diff_eq!(empty.seek_by(10.0, clock.at(0)), 0.0);
        assert!(empty.engine().seeks().is_empty());

        let mut player = player_at(115.0, &clock);
        assert_abs_diff_eq!(player.seek_by(10.0, clock.at(0)), 120.0);
        assert_abs_diff_eq!(player.seek_to(-4.0, clock.at(0)), 0.0);
        assert_eq!(player.engine().seeks(), vec![120.0, 0.0]);
    }

    #[test]
    fn arrow_key_seeks_then_holds_until_release() {
        let clock = TestClock::new();
        let mut player = player_at(10.0, &clock);
        player.handle(Message::PointerOver(true), clock.at(0));

        let down = Message::KeyDown {
            key: Key::ArrowRight,
            text_input_focused: false,
        };
        player.handle(down.clone(), clock.at(0));
        assert!(player.is_hold_active());
        assert!(player.wants_frames());
        assert_eq!(player.engine().seeks(), vec![15.0]);

        // key repeat is ignored
        player.handle(down, clock.at(30));
        assert_eq!(player.engine().seeks(), vec![15.0]);

        player.handle(Message::FrameTick, clock.at(300));
        assert_eq!(player.engine().seeks(), vec![15.0, 20.0]);
        assert_eq!(
            player.snapshot().loading_state,
            LoadingState::ContinuousSeeking
        );

        // stale engine time is ignored while holding
        player.handle(
            Message::Engine(EngineEvent::TimeUpdate { time_secs: 3.0 }),
            clock.at(310),
        );
        assert_abs_diff_eq!(player.snapshot().current_time, 20.0);

        player.handle(
            Message::KeyUp {
                key: Key::ArrowRight,
            },
            clock.at(400),
        );
        assert!(!player.is_hold_active());
        assert!(!player.wants_frames());
        assert!(player.snapshot().continuous_seek_feedback.is_some());

        player.fire_due(clock.at(1_000));
        assert!(player.snapshot().continuous_seek_feedback.is_none());
    }

    #[test]
    fn shortcuts_need_pointer_or_fullscreen() {
        let clock = TestClock::new();
        let mut player = player_at(10.0, &clock);
        let space = Message::KeyDown {
            key: Key::Space,
            text_input_focused: false,
        };
        player.handle(space.clone(), clock.at(0));
        assert_eq!(player.engine().count(&EngineCommand::Play), 0);

        player.handle(Message::KeyUp { key: Key::Space }, clock.at(10));
        player.handle(Message::PointerOver(true), clock.at(20));
        player.handle(space, clock.at(30));
        assert_eq!(player.engine().count(&EngineCommand::Play), 1);
        assert!(player.snapshot().is_playing);
    }

    #[test]
    fn double_tap_left_seeks_back_without_showing_controls() {
        let clock = TestClock::new();
        let mut player = player_at(60.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.fire_due(clock.at(3_500));
        assert!(!player.snapshot().controls_shown);

        player.handle(Message::Engine(EngineEvent::Buffering(true)), clock.at(3_600));
        click(&mut player, 100.0, clock.at(4_000));
        click(&mut player, 110.0, clock.at(4_200));

        let snapshot = player.snapshot();
        assert!(!snapshot.controls_shown);
        assert_eq!(snapshot.loading_state, LoadingState::None);
        let feedback = snapshot.seek_feedback.expect("seek feedback");
        assert_eq!(feedback.direction, SeekDirection::Backward);
        assert_abs_diff_eq!(feedback.offset_secs, -10.0);
        assert_abs_diff_eq!(feedback.time, 50.0);

        // no deferred single tap follows the double tap
        player.fire_due(clock.at(5_000));
        let snapshot = player.snapshot();
        assert!(!snapshot.controls_shown);
        assert!(snapshot.seek_feedback.is_none());
        assert_eq!(snapshot.loading_state, LoadingState::Buffering);
    }

    #[test]
    fn single_tap_toggles_controls_after_window() {
        let clock = TestClock::new();
        let mut player = player_at(60.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.fire_due(clock.at(3_500));

        click(&mut player, 450.0, clock.at(4_000));
        player.fire_due(clock.at(4_299));
        assert!(!player.snapshot().controls_shown);
        player.fire_due(clock.at(4_300));
        assert!(player.snapshot().controls_shown);
    }

    #[test]
    fn center_double_tap_toggles_playback_without_showing_controls() {
        let clock = TestClock::new();
        let mut player = player_at(60.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.fire_due(clock.at(3_500));
        assert!(!player.snapshot().controls_shown);

        click(&mut player, 450.0, clock.at(4_000));
        click(&mut player, 455.0, clock.at(4_100));
        let snapshot = player.snapshot();
        assert!(!snapshot.is_playing);
        assert!(!snapshot.controls_shown);

        player.fire_due(clock.at(5_000));
        assert!(!player.snapshot().controls_shown);
    }

    #[test]
    fn play_pause_while_shown_restarts_hide_countdown() {
        let clock = TestClock::new();
        let mut player = player_at(60.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.toggle_play_pause(clock.at(1_000));
        player.toggle_play_pause(clock.at(2_000));

        assert_eq!(player.next_deadline(), Some(clock.at(5_500)));
        player.fire_due(clock.at(3_500));
        assert!(player.snapshot().controls_shown);
        player.fire_due(clock.at(5_500));
        assert!(!player.snapshot().controls_shown);
    }

    #[test]
    fn touch_reveals_hidden_controls_and_holds_them() {
        let clock = TestClock::new();
        let mut player = player_at(60.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.fire_due(clock.at(3_500));
        assert!(!player.snapshot().controls_shown);

        player.handle(Message::PointerDown { x: 300.0, contacts: 1 }, clock.at(4_000));
        assert!(player.snapshot().controls_shown);
        player.fire_due(clock.at(20_000));
        assert!(player.snapshot().controls_shown);
    }

    #[test]
    fn drag_scrubs_and_swallows_trailing_click() {
        let clock = TestClock::new();
        let mut player = player_at(50.0, &clock);

        player.handle(Message::PointerDown { x: 300.0, contacts: 1 }, clock.at(0));
        player.handle(Message::PointerMove { x: 750.0, contacts: 1 }, clock.at(50));
        let snapshot = player.snapshot();
        assert_abs_diff_eq!(snapshot.display_time, 80.0);
        assert_eq!(snapshot.loading_state, LoadingState::Scrubbing);
        assert!(player.engine().seeks().is_empty());

        player.handle(Message::PointerUp, clock.at(100));
        click(&mut player, 750.0, clock.at(101));
        assert_eq!(player.engine().seeks(), vec![80.0]);

        player.fire_due(clock.at(500));
        let snapshot = player.snapshot();
        assert!(snapshot.scrub_feedback.is_none());
        assert_eq!(player.next_deadline(), None);
    }

    #[test]
    fn controls_auto_hide_only_in_fullscreen_playback() {
        let clock = TestClock::new();
        let mut player = player_at(0.0, &clock);
        assert_eq!(player.next_deadline(), None);

        playing_fullscreen(&mut player, clock.at(0));
        player.fire_due(clock.at(3_499));
        assert!(player.snapshot().controls_shown);
        player.fire_due(clock.at(3_500));
        assert!(!player.snapshot().controls_shown);

        player.handle(
            Message::FullscreenChanged { fullscreen: false },
            clock.at(4_000),
        );
        assert!(player.snapshot().controls_shown);
    }

    #[test]
    fn hidden_page_pauses_and_reload_resumes_position() {
        let clock = TestClock::new();
        let mut player = loaded(&clock);
        player.handle(Message::Engine(EngineEvent::Playing), clock.at(0));
        player.handle(
            Message::Engine(EngineEvent::TimeUpdate { time_secs: 42.0 }),
            clock.at(0),
        );

        player.handle(Message::VisibilityChanged { visible: false }, clock.at(10));
        assert_eq!(player.engine().count(&EngineCommand::Pause), 1);
        assert!(!player.snapshot().is_playing);

        let error = EngineError::new(codes::VIDEO_ERROR, "decode suspended");
        let effects = player.handle(Message::Engine(EngineEvent::Error(error)), clock.at(20));
        assert!(effects.is_empty());
        assert_eq!(player.next_deadline(), None);

        player.handle(Message::VisibilityChanged { visible: true }, clock.at(1_000));
        assert!(player.fire_due(clock.at(1_099)).is_empty());
        let effects = player.fire_due(clock.at(1_100));
        let Some(Effect::Load {
            ticket, resume_at, ..
        }) = effects.first().cloned()
        else {
            panic!("expected reload, got {effects:?}");
        };
        assert_eq!(resume_at, Some(42.0));
        assert_eq!(player.snapshot().loading_state, LoadingState::Buffering);

        player.handle(
            Message::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded,
            },
            clock.at(1_500),
        );
        assert_eq!(player.engine().seeks().last().copied(), Some(42.0));
        assert_eq!(player.snapshot().loading_state, LoadingState::None);
    }

    #[test]
    fn suspension_error_while_visible_reloads_after_delay() {
        let clock = TestClock::new();
        let mut player = loaded(&clock);
        let error = EngineError::new(codes::HTTP_ERROR, "network");
        player.handle(Message::Engine(EngineEvent::Error(error)), clock.at(0));

        assert!(player.fire_due(clock.at(499)).is_empty());
        let effects = player.fire_due(clock.at(500));
        assert!(matches!(
            effects.as_slice(),
            [Effect::Load {
                resume_at: None,
                ..
            }]
        ));
    }

    #[test]
    fn stale_load_completion_is_ignored() {
        let clock = TestClock::new();
        let mut player = player_at(0.0, &clock);
        let first = player.load_source(SourceDescriptor::new("a.mpd"), clock.at(0));
        let second = player.load_source(SourceDescriptor::new("b.mpd"), clock.at(10));
        let (Some(Effect::Load { ticket: old, .. }), Some(Effect::Load { ticket: new, .. })) =
            (first.first().cloned(), second.first().cloned())
        else {
            panic!("expected two loads");
        };
        assert_ne!(old, new);

        let effects = player.handle(
            Message::LoadFinished {
                ticket: old,
                outcome: LoadOutcome::Failed(EngineError::new(4000, "gone")),
            },
            clock.at(20),
        );
        assert!(effects.is_empty());
        assert!(player.snapshot().fatal_error.is_none());
        assert_eq!(player.snapshot().loading_state, LoadingState::Buffering);

        player.handle(
            Message::LoadFinished {
                ticket: new,
                outcome: LoadOutcome::Loaded,
            },
            clock.at(30),
        );
        assert_eq!(player.snapshot().loading_state, LoadingState::None);
    }

    #[test]
    fn fatal_error_is_terminal() {
        let clock = TestClock::new();
        let mut player = loaded(&clock);
        let error = EngineError::new(6001, "key system unavailable");
        let effects = player.handle(
            Message::Engine(EngineEvent::Error(error.clone())),
            clock.at(0),
        );
        assert_eq!(effects, vec![Effect::Fatal(error)]);
        assert_eq!(
            player.snapshot().fatal_error.as_deref(),
            Some("key system unavailable (Code: 6001)")
        );

        player.toggle_play_pause(clock.at(10));
        assert_eq!(player.engine().count(&EngineCommand::Play), 0);

        // further suspension errors do not schedule reloads
        player.handle(
            Message::Engine(EngineEvent::Error(EngineError::new(codes::HTTP_ERROR, "x"))),
            clock.at(20),
        );
        assert_eq!(player.next_deadline(), None);
    }

    #[test]
    fn volume_changes_unmute_and_show_feedback() {
        let clock = TestClock::new();
        let mut player = player_at(0.0, &clock);

        player.set_volume(0.0, clock.at(0));
        let feedback = player.snapshot().volume_feedback.expect("feedback");
        assert!(feedback.muted);

        player.toggle_mute(clock.at(100));
        assert!(player.snapshot().muted);
        player.set_volume(0.4, clock.at(200));
        let snapshot = player.snapshot();
        assert!(!snapshot.muted);
        assert_abs_diff_eq!(snapshot.volume, 0.4);
        assert_eq!(
            player.engine().commands.last(),
            Some(&EngineCommand::SetMuted(false))
        );

        player.fire_due(clock.at(1_400));
        assert!(player.snapshot().volume_feedback.is_none());
    }

    #[test]
    fn capture_with_content_finishes_immediately() {
        let clock = TestClock::new();
        let mut player = player_at(65.0, &clock);
        player.engine_mut().frames.push_back(Some(RawFrame {
            width: 2,
            height: 2,
            rgba: vec![180; 16],
        }));

        let effects = player.capture_frame(clock.at(0));
        match effects.as_slice() {
            [Effect::FrameCaptured(frame)] => {
                assert_eq!(frame.file_name, "screenshot-01-05.png");
                assert_eq!(frame.quality, CaptureQuality::Content);
            }
            other => panic!("expected capture, got {other:?}"),
        }
        assert!(player.snapshot().screenshot_active);
    }

    #[test]
    fn blank_capture_falls_back_to_last_frame() {
        let clock = TestClock::new();
        let mut player = player_at(0.0, &clock);
        player
            .engine_mut()
            .frames
            .push_back(Some(RawFrame::black(2, 2)));

        assert!(player.capture_frame(clock.at(0)).is_empty());
        assert!(player.fire_due(clock.at(100)).is_empty());
        let effects = player.fire_due(clock.at(1_000));
        assert!(matches!(
            effects.as_slice(),
            [Effect::FrameCaptured(CapturedFrame {
                quality: CaptureQuality::Fallback,
                ..
            })]
        ));
    }

    #[test]
    fn capture_without_any_frame_saves_named_placeholder() {
        let clock = TestClock::new();
        let mut player = player_at(65.0, &clock);

        assert!(player.capture_frame(clock.at(0)).is_empty());
        let effects = player.fire_due(clock.at(1_000));
        match effects.as_slice() {
            [Effect::FrameCaptured(frame)] => {
                assert_eq!(frame.quality, CaptureQuality::Placeholder);
                assert_eq!(frame.file_name, "screenshot-fallback-01-05.png");
            }
            other => panic!("expected placeholder capture, got {other:?}"),
        }
    }

    #[test]
    fn quality_and_rate_menus() {
        let clock = TestClock::new();
        let engine = SimulatedEngine::new().with_tracks(&[Some(1080), Some(720), None]);
        let mut player = Controller::new(PlayerConfig::default(), engine);
        player.handle(Message::Engine(EngineEvent::TracksChanged), clock.at(0));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.available_qualities.len(), 2);
        assert_eq!(snapshot.selected_quality, None);

        player.open_menu(Menu::Quality, clock.at(0));
        assert_eq!(player.snapshot().open_menu, Some(Menu::Quality));
        player.select_quality(QualitySelection::Track(TrackId(2)), clock.at(10));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.selected_quality, Some(TrackId(2)));
        assert_eq!(snapshot.open_menu, None);
        assert!(!player.engine().abr_enabled);

        player.select_quality(QualitySelection::Auto, clock.at(20));
        assert_eq!(player.snapshot().selected_quality, None);

        player.select_rate(1.4, clock.at(30));
        assert_abs_diff_eq!(player.snapshot().playback_rate, 1.5);
        assert_abs_diff_eq!(player.engine().rate, 1.5);
    }

    #[test]
    fn fullscreen_key_requests_toggle() {
        let clock = TestClock::new();
        let mut player = player_at(0.0, &clock);
        player.handle(Message::PointerOver(true), clock.at(0));
        let effects = player.handle(
            Message::KeyDown {
                key: Key::Character('f'),
                text_input_focused: false,
            },
            clock.at(0),
        );
        assert_eq!(effects, vec![Effect::RequestFullscreen(true)]);
    }

    #[test]
    fn teardown_cancels_everything() {
        let clock = TestClock::new();
        let mut player = player_at(30.0, &clock);
        playing_fullscreen(&mut player, clock.at(0));
        player.start_hold_seek(SeekDirection::Backward, clock.at(0));
        player.set_volume(0.5, clock.at(0));
        assert!(player.next_deadline().is_some());

        player.teardown();
        assert_eq!(player.next_deadline(), None);
        assert!(!player.wants_frames());
    }
}
