use crate::aggregator::{record_step, reset};
use crate::config::StepTuning;
use crate::detector::StepDetector;
use crate::errors::AppError;
use crate::models::{Dashboard, HistoryEntry, InfoPanel, SamplerStatus, Snapshot, TimedSample};
use crate::storage::KeyValueStore;
use crate::view::build_snapshot;
use chrono::Local;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const QUEUE_DEPTH: usize = 256;
const NOTIFY_DEPTH: usize = 16;

#[derive(Debug, Clone)]
pub enum Event {
    PermissionResolved { granted: bool },
    Motion { samples: Vec<TimedSample> },
    SetGoal { raw: String },
    SetDarkMode { enabled: bool },
    SelectPanel { panel: String },
    Rollover { date: String },
    Refresh,
}

pub struct Controller {
    tuning: StepTuning,
    store: KeyValueStore,
    detector: StepDetector,
    dashboard: Dashboard,
    version: u64,
}

impl Controller {
    pub fn new(store: KeyValueStore, tuning: StepTuning) -> Self {
        let dashboard = store.load_dashboard(tuning.default_goal);
        info!(
            "loaded {} steps, goal {}, {} history entries",
            dashboard.counter.step_count,
            dashboard.goal,
            dashboard.history.len()
        );
        Self {
            detector: StepDetector::new(tuning.threshold),
            tuning,
            store,
            dashboard,
            version: 0,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn snapshot(&self) -> Snapshot {
        build_snapshot(&self.dashboard, &self.tuning, self.version)
    }

    pub async fn handle(&mut self, event: Event) -> bool {
        let changed = match event {
            Event::PermissionResolved { granted } => self.resolve_permission(granted),
            Event::Motion { samples } => self.observe_motion(&samples),
            Event::SetGoal { raw } => self.set_goal(&raw),
            Event::SetDarkMode { enabled } => self.set_dark_mode(enabled),
            Event::SelectPanel { panel } => self.select_panel(&panel),
            Event::Rollover { date } => self.rollover(date),
            Event::Refresh => false,
        };

        if changed {
            self.version += 1;
            if let Err(err) = self.store.persist().await {
                error!("failed to persist step data: {err}");
            }
        }
        changed
    }

    fn resolve_permission(&mut self, granted: bool) -> bool {
        let status = if granted {
            SamplerStatus::Granted
        } else {
            SamplerStatus::Denied
        };
        if self.dashboard.sampler == status {
            return false;
        }
        info!("motion permission {status:?}");
        self.dashboard.sampler = status;
        true
    }

    fn observe_motion(&mut self, samples: &[TimedSample]) -> bool {
        if self.dashboard.sampler != SamplerStatus::Granted {
            debug!("dropping {} samples without motion permission", samples.len());
            return false;
        }

        let mut detected = 0u64;
        for timed in samples {
            if self.detector.observe(timed.sample) {
                let at_ms = timed
                    .timestamp_ms
                    .unwrap_or_else(|| Local::now().timestamp_millis());
                record_step(&mut self.dashboard.counter, at_ms, self.tuning.active_window_ms);
                detected += 1;
            }
        }

        if detected == 0 {
            return false;
        }
        debug!(
            "{detected} steps detected, total {}",
            self.dashboard.counter.step_count
        );
        self.store.write_counter(&self.dashboard.counter);
        true
    }

    fn set_goal(&mut self, raw: &str) -> bool {
        let Some(goal) = parse_goal(raw) else {
            debug!("ignoring goal input {raw:?}");
            return false;
        };
        if goal == self.dashboard.goal {
            return false;
        }
        info!("goal set to {goal}");
        self.dashboard.goal = goal;
        self.store.write_goal(goal);
        true
    }

    fn set_dark_mode(&mut self, enabled: bool) -> bool {
        if self.dashboard.dark_mode == enabled {
            return false;
        }
        self.dashboard.dark_mode = enabled;
        self.store.write_dark_mode(enabled);
        true
    }

    fn select_panel(&mut self, raw: &str) -> bool {
        match raw.parse::<InfoPanel>() {
            Ok(panel) if panel != self.dashboard.panel => {
                self.dashboard.panel = panel;
                true
            }
            Ok(_) => false,
            Err(err) => {
                debug!("{err}");
                false
            }
        }
    }

    fn rollover(&mut self, date: String) -> bool {
        if self
            .dashboard
            .history
            .first()
            .is_some_and(|entry| entry.date == date)
        {
            info!("rollover for {date} already archived");
            return false;
        }

        let steps = self.dashboard.counter.step_count;
        info!("archiving {steps} steps for {date}");
        self.dashboard.history.insert(0, HistoryEntry { date, steps });
        reset(&mut self.dashboard.counter);
        self.store.write_history(&self.dashboard.history);
        self.store.write_counter(&self.dashboard.counter);
        true
    }
}

pub fn parse_goal(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|goal| *goal > 0)
}

struct Command {
    event: Event,
    reply: Option<oneshot::Sender<Snapshot>>,
}

#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<Command>,
    notify: broadcast::Sender<Snapshot>,
}

impl ControllerHandle {
    /// Queues an event and waits for the snapshot taken right after it.
    pub async fn dispatch(&self, event: Event) -> Result<Snapshot, AppError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| AppError::unavailable("step controller stopped"))?;
        rx.await
            .map_err(|_| AppError::unavailable("step controller stopped"))
    }

    pub async fn send(&self, event: Event) -> Result<(), AppError> {
        self.tx
            .send(Command { event, reply: None })
            .await
            .map_err(|_| AppError::unavailable("step controller stopped"))
    }

    pub async fn snapshot(&self) -> Result<Snapshot, AppError> {
        self.dispatch(Event::Refresh).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.notify.subscribe()
    }
}

pub fn spawn(mut controller: Controller) -> (ControllerHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Command>(QUEUE_DEPTH);
    let (notify, _) = broadcast::channel(NOTIFY_DEPTH);
    let handle = ControllerHandle {
        tx,
        notify: notify.clone(),
    };

    let task = tokio::spawn(async move {
        while let Some(Command { event, reply }) = rx.recv().await {
            let changed = controller.handle(event).await;
            let snapshot = controller.snapshot();
            if changed {
                // No subscribers is fine.
                let _ = notify.send(snapshot.clone());
            }
            if let Some(reply) = reply {
                let _ = reply.send(snapshot);
            }
        }
        debug!("step controller queue closed");
    });

    (handle, task)
}
