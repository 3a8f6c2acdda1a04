// SPDX-License-Identifier: MPL-2.0
//! Async driver for a [`Controller`].
//!
//! The controller itself never sleeps or spawns. This module owns the event
//! loop around it: it waits on host messages, the controller's next timer
//! deadline, the display frame cadence and the load in flight, and feeds
//! each wakeup back in with the current instant.
//!
//! `Load` effects are executed here through [`load_with_retry`]; every other
//! effect is forwarded to the host along with a fresh [`PlayerSnapshot`]
//! whenever the visible state changed.

use super::controller::{Controller, Effect, Message};
use super::recovery::LoadTicket;
use super::retry::{load_with_retry, LoadOutcome, RetryPolicy};
use super::snapshot::PlayerSnapshot;
use crate::application::port::{DecodeEngine, SourceLoader};
use crate::config::FRAME_INTERVAL_MS;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output of a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The player state changed.
    Snapshot(PlayerSnapshot),
    /// Host-side work (fullscreen, captures, fatal errors).
    Effect(Effect),
}

type PendingLoad = Option<(LoadTicket, LocalBoxFuture<'static, LoadOutcome>)>;

enum Wake {
    Message(Option<Message>),
    Timer,
    Frame,
    Loaded(LoadTicket, LoadOutcome),
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

async fn next_load(pending: &mut PendingLoad) -> (LoadTicket, LoadOutcome) {
    let outcome = match pending.as_mut() {
        Some((_, load)) => load.await,
        None => std::future::pending().await,
    };
    let ticket = pending.take().map_or(LoadTicket(0), |(ticket, _)| ticket);
    (ticket, outcome)
}

/// Runs the controller until `inbox` closes, then tears it down and returns
/// it.
///
/// Must run on a single-threaded runtime or inside a `LocalSet`, since the
/// load in flight is polled in place.
pub async fn run<E, L>(
    mut controller: Controller<E>,
    loader: L,
    policy: RetryPolicy,
    mut inbox: mpsc::Receiver<Message>,
    outbox: mpsc::UnboundedSender<SessionEvent>,
) -> Controller<E>
where
    E: DecodeEngine,
    L: SourceLoader + Clone + 'static,
{
    let mut pending: PendingLoad = None;
    let mut frames = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_snapshot = controller.snapshot();
    if outbox.send(SessionEvent::Snapshot(last_snapshot.clone())).is_err() {
        controller.teardown();
        return controller;
    }

    loop {
        let deadline = controller.next_deadline();
        let wants_frames = controller.wants_frames();

        let wake = tokio::select! {
            message = inbox.recv() => Wake::Message(message),
            () = sleep_until_deadline(deadline) => Wake::Timer,
            _ = frames.tick(), if wants_frames => Wake::Frame,
            (ticket, outcome) = next_load(&mut pending) => Wake::Loaded(ticket, outcome),
        };

        let effects = match wake {
            Wake::Message(Some(message)) => controller.handle(message, now()),
            Wake::Message(None) => break,
            Wake::Timer => controller.fire_due(now()),
            Wake::Frame => controller.handle(Message::FrameTick, now()),
            Wake::Loaded(ticket, outcome) => {
                controller.handle(Message::LoadFinished { ticket, outcome }, now())
            }
        };

        for effect in effects {
            match effect {
                Effect::Load { ticket, source, .. } => {
                    if let Some((previous, _)) = pending.take() {
                        tracing::debug!(ticket = previous.0, "load superseded");
                    }
                    let loader = loader.clone();
                    let load = async move { load_with_retry(&loader, &source, policy).await };
                    pending = Some((ticket, load.boxed_local()));
                }
                other => {
                    if outbox.send(SessionEvent::Effect(other)).is_err() {
                        tracing::debug!("session output closed");
                    }
                }
            }
        }

        let snapshot = controller.snapshot();
        if snapshot != last_snapshot {
            last_snapshot = snapshot.clone();
            if outbox.send(SessionEvent::Snapshot(snapshot)).is_err() {
                tracing::debug!("session output closed, stopping");
                break;
            }
        }
    }

    controller.teardown();
    controller
}
