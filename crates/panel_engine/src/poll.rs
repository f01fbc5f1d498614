//! Status poller bound to one task id and one session.
//!
//! A poller is a scoped resource: [`spawn_poller`] returns a [`PollHandle`],
//! and stopping or dropping the handle guarantees that the poller emits
//! nothing afterwards, even if a status request was in flight.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use panel_core::{LifecycleState, SessionId, TaskId};
use panel_logging::{panel_debug, panel_trace, panel_warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ScrapeApi};

/// Sender that can be closed from the owning side.
///
/// Emitting and closing take the same lock, so once `close` returns no further
/// event can get through.
#[derive(Clone)]
pub struct EventGate {
    tx: Arc<Mutex<Option<UnboundedSender<EngineEvent>>>>,
}

impl EventGate {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Returns false once the gate is closed or the receiver is gone.
    pub fn emit(&self, event: EngineEvent) -> bool {
        match self.tx.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|tx| tx.send(event).is_ok()),
            Err(_) => false,
        }
    }

    pub fn close(&self) {
        if let Ok(mut guard) = self.tx.lock() {
            guard.take();
        }
    }
}

pub struct PollHandle {
    session: SessionId,
    task_id: TaskId,
    cancel: CancellationToken,
    gate: EventGate,
    join: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Stops the poller. Equivalent to dropping the handle.
    pub fn stop(self) {
        drop(self);
    }

    fn release(&mut self) {
        self.gate.close();
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        panel_debug!(
            "Stopping poller for task {} (session {})",
            self.task_id,
            self.session
        );
        self.release();
    }
}

/// Spawns a poller on the current tokio runtime.
///
/// The first poll happens one `interval` after the call. `cancel` is usually
/// a child of the engine's shutdown token.
pub fn spawn_poller(
    api: Arc<dyn ScrapeApi>,
    session: SessionId,
    task_id: TaskId,
    interval: Duration,
    cancel: CancellationToken,
    tx: UnboundedSender<EngineEvent>,
) -> PollHandle {
    let gate = EventGate::new(tx);
    let join = tokio::spawn(poll_loop(
        api,
        session,
        task_id.clone(),
        interval,
        cancel.clone(),
        gate.clone(),
    ));

    PollHandle {
        session,
        task_id,
        cancel,
        gate,
        join: Some(join),
    }
}

async fn poll_loop(
    api: Arc<dyn ScrapeApi>,
    session: SessionId,
    task_id: TaskId,
    interval: Duration,
    cancel: CancellationToken,
    gate: EventGate,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let listing = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            listing = api.list_tasks() => listing,
        };

        let tasks = match listing {
            Ok(tasks) => tasks,
            Err(err) => {
                panel_warn!("Status poll for task {} failed: {}", task_id, err);
                continue;
            }
        };

        let Some(entry) = tasks.into_iter().find(|entry| entry.id == task_id) else {
            panel_trace!("Task {} not visible yet (session {})", task_id, session);
            continue;
        };

        if LifecycleState::parse(&entry.status).is_none() {
            panel_warn!(
                "Task {} reported unrecognized status {:?}",
                task_id,
                entry.status
            );
        }

        let delivered = gate.emit(EngineEvent::StatusObserved {
            session,
            task_id: task_id.clone(),
            status: entry.status,
        });
        if !delivered {
            break;
        }
    }

    panel_debug!("Poller for task {} exited (session {})", task_id, session);
}
