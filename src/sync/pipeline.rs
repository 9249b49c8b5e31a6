use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    sync::backup::BackupStore,
    sync::debounce::{Clock, Debouncer, SystemClock},
    sync::remote::{RemoteStore, SaveAck, SaveRequest, SnapshotTarget},
    sync::status::{SavePhase, SaveStatus, SyncState},
    timeline::project::TimelineProject,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SyncOpts {
    /// Quiet period after the last edit before a save fires.
    pub debounce_ms: u64,
    /// Wait after a failed save before the queue is tried again.
    pub retry_interval_ms: u64,
    /// Write the newest unsaved state to the backup store whenever a save cannot
    /// reach the remote.
    pub offline_backup: bool,
    /// Directory for file backups. `None` keeps backups off disk.
    pub backup_dir: Option<PathBuf>,
    /// Most serialized states held while offline or failing. Each entry is a full
    /// project, so past this bound the oldest waiting state is dropped; the newer ones
    /// already supersede it.
    pub max_queued: usize,
}

impl Default for SyncOpts {
    fn default() -> Self {
        Self {
            debounce_ms: 2_000,
            retry_interval_ms: 5_000,
            offline_backup: true,
            backup_dir: None,
            max_queued: 32,
        }
    }
}

impl SyncOpts {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

/// One save the host should perform, then report through [`SavePipeline::complete`].
#[derive(Clone, Debug, PartialEq)]
pub struct SaveJob {
    pub id: String,
    pub request: SaveRequest,
}

#[derive(Clone, Debug)]
struct QueuedSave {
    revision: u64,
    payload: String,
    attempts: u32,
}

/// The save state machine: `pending -> saving -> saved | failed`, with `offline` on top.
///
/// Serialized states wait in a bounded FIFO queue and are sent oldest first, one at a
/// time.
/// A failed head stays at the head and is retried after the retry interval, or as soon
/// as connectivity comes back.
pub struct SavePipeline<C: Clock = SystemClock> {
    project_id: String,
    opts: SyncOpts,
    clock: C,
    debounce: Debouncer,
    queue: VecDeque<QueuedSave>,
    in_flight: Option<String>,
    phase: SavePhase,
    online: bool,
    dirty: bool,
    manual: bool,
    retry_at: Option<Instant>,
    revision: u64,
    last_saved: Option<Instant>,
    last_error: Option<String>,
    backup: Option<Box<dyn BackupStore>>,
}

impl SavePipeline<SystemClock> {
    pub fn new(project_id: impl Into<String>, opts: SyncOpts) -> Self {
        Self::with_clock(project_id, opts, SystemClock)
    }
}

impl<C: Clock> SavePipeline<C> {
    pub fn with_clock(project_id: impl Into<String>, opts: SyncOpts, clock: C) -> Self {
        let debounce = Debouncer::new(opts.debounce());
        Self {
            project_id: project_id.into(),
            opts,
            clock,
            debounce,
            queue: VecDeque::new(),
            in_flight: None,
            phase: SavePhase::Saved,
            online: true,
            dirty: false,
            manual: false,
            retry_at: None,
            revision: 0,
            last_saved: None,
            last_error: None,
            backup: None,
        }
    }

    pub fn with_backup(mut self, store: impl BackupStore + 'static) -> Self {
        self.backup = Some(Box::new(store));
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn opts(&self) -> &SyncOpts {
        &self.opts
    }

    pub fn backup(&self) -> Option<&dyn BackupStore> {
        self.backup.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Serialized states not yet acknowledged, excluding the one in flight.
    pub fn queue_length(&self) -> usize {
        self.queue.len() - usize::from(self.in_flight.is_some())
    }

    pub fn state(&self) -> SyncState {
        SyncState {
            phase: self.phase,
            online: self.online,
            queue_length: self.queue_length(),
            last_saved: self.last_saved,
            last_error: self.last_error.clone(),
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.state().status()
    }

    /// Earliest instant at which [`poll`](Self::poll) may have work.
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.retry_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Record an edit. Re-arms the debounce; never blocks, even mid-save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        if self.in_flight.is_none() {
            self.phase = SavePhase::Pending;
        }
        let token = self.debounce.schedule(self.clock.now());
        tracing::trace!(token, "save debounce re-armed");
    }

    /// Explicit save: the next poll serializes immediately.
    pub fn save_now(&mut self) {
        self.manual = true;
        self.debounce.cancel();
        if self.in_flight.is_none() {
            self.phase = SavePhase::Pending;
        }
    }

    /// Connectivity signal. Coming back online makes the queue due at once.
    pub fn set_online(&mut self, online: bool) {
        if self.online == online {
            return;
        }
        self.online = online;
        if online {
            self.retry_at = None;
            tracing::info!(queued = self.queue.len(), "back online; flushing save queue");
        } else {
            tracing::warn!("offline; saves will queue locally");
        }
    }

    /// Advance the state machine. Returns a job when something should be sent now.
    #[tracing::instrument(skip(self, project), fields(project = %self.project_id))]
    pub fn poll(&mut self, project: &TimelineProject) -> ReelcutResult<Option<SaveJob>> {
        if self.in_flight.is_some() {
            return Ok(None);
        }
        let now = self.clock.now();

        let fired = self.debounce.fire(now).is_some();
        if self.manual || (fired && self.dirty) {
            self.manual = false;
            self.dirty = false;
            self.revision += 1;
            self.queue.push_back(QueuedSave {
                revision: self.revision,
                payload: project.to_json()?,
                attempts: 0,
            });
            while self.queue.len() > self.opts.max_queued.max(1) {
                if let Some(stale) = self.queue.pop_front() {
                    tracing::debug!(revision = stale.revision, "superseded state dropped from queue");
                }
            }
            tracing::debug!(revision = self.revision, queued = self.queue.len(), "state queued");
            if !self.online {
                self.backup_newest();
                return Ok(None);
            }
        }

        if !self.online || self.queue.is_empty() {
            return Ok(None);
        }
        if self.retry_at.is_some_and(|at| now < at) {
            return Ok(None);
        }
        self.retry_at = None;

        let Some(head) = self.queue.front_mut() else {
            return Ok(None);
        };
        head.attempts += 1;
        let job = SaveJob {
            id: uuid::Uuid::new_v4().to_string(),
            request: SaveRequest {
                project_id: self.project_id.clone(),
                revision: head.revision,
                payload: head.payload.clone(),
            },
        };
        tracing::debug!(revision = head.revision, attempt = head.attempts, "save job issued");
        self.in_flight = Some(job.id.clone());
        self.phase = SavePhase::Saving;
        Ok(Some(job))
    }

    /// Report the outcome of a job returned by [`poll`](Self::poll).
    #[tracing::instrument(skip(self, job, result), fields(project = %self.project_id, revision = job.request.revision))]
    pub fn complete(&mut self, job: &SaveJob, result: ReelcutResult<SaveAck>) -> ReelcutResult<()> {
        if self.in_flight.as_deref() != Some(job.id.as_str()) {
            return Err(ReelcutError::validation(format!(
                "save job {} is not in flight",
                job.id
            )));
        }
        self.in_flight = None;
        let now = self.clock.now();

        match result {
            Ok(ack) => {
                self.queue.pop_front();
                self.last_saved = Some(now);
                self.last_error = None;
                self.phase = if self.dirty || self.manual {
                    SavePhase::Pending
                } else {
                    SavePhase::Saved
                };
                tracing::info!(revision = ack.revision, queued = self.queue.len(), "saved");
                if self.queue.is_empty() {
                    self.clear_backup();
                }
            }
            Err(err) => {
                self.phase = SavePhase::Failed;
                self.last_error = Some(err.to_string());
                self.retry_at = Some(now + self.opts.retry_interval());
                tracing::warn!(error = %err, queued = self.queue.len(), "save failed; will retry");
                self.backup_newest();
            }
        }
        Ok(())
    }

    /// Poll, send through `remote`, complete, until nothing is due or a save fails.
    /// Returns the number of successful saves.
    pub fn drive(
        &mut self,
        project: &TimelineProject,
        remote: &mut dyn RemoteStore,
    ) -> ReelcutResult<usize> {
        let mut saved = 0;
        while let Some(job) = self.poll(project)? {
            let result = remote.save(&job.request);
            let ok = result.is_ok();
            self.complete(&job, result)?;
            if !ok {
                break;
            }
            saved += 1;
        }
        Ok(saved)
    }

    /// One-shot secondary sync. Failures are logged and returned but never touch the
    /// save status.
    pub fn export_snapshot(
        &self,
        project: &TimelineProject,
        target: &mut dyn SnapshotTarget,
    ) -> ReelcutResult<String> {
        let payload = project.to_json()?;
        target
            .publish(&self.project_id, &payload)
            .inspect(|reference| tracing::info!(%reference, "snapshot published"))
            .inspect_err(|err| tracing::warn!(error = %err, "snapshot export failed"))
    }

    /// The backed-up project, if a previous session left one.
    pub fn recover(&self) -> ReelcutResult<Option<TimelineProject>> {
        match self.backup.as_deref() {
            Some(store) => recover_from(store, &self.project_id),
            None => Ok(None),
        }
    }

    fn backup_newest(&mut self) {
        if !self.opts.offline_backup {
            return;
        }
        let (Some(store), Some(newest)) = (self.backup.as_mut(), self.queue.back()) else {
            return;
        };
        if let Err(err) = store.write(&self.project_id, &newest.payload) {
            tracing::warn!(error = %err, "could not write local backup");
        }
    }

    fn clear_backup(&mut self) {
        if let Some(store) = self.backup.as_mut() {
            if let Err(err) = store.clear(&self.project_id) {
                tracing::warn!(error = %err, "could not clear local backup");
            }
        }
    }
}

/// Read and parse the backup for `project_id` from any store.
pub fn recover_from(
    store: &dyn BackupStore,
    project_id: &str,
) -> ReelcutResult<Option<TimelineProject>> {
    store
        .read(project_id)?
        .map(|payload| TimelineProject::from_json(&payload))
        .transpose()
}

#[cfg(test)]
#[path = "../../tests/unit/sync/pipeline.rs"]
mod tests;
