use crate::{
    animation::ease::Easing,
    animation::keyframe::{self, KeyframeChange, PropertyValues, TimelineKeyframe},
    cost::calculator::{CostBreakdown, calculate_project_cost},
    editing::{Clipboard, History, Selection, SelectionBox},
    export::job::{ExportRequest, SpeedTier},
    export::upload::UploadedMedia,
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::snap_to_frame,
    placement::engine::{self, MoveOutcome, ResizeEdge, ResizeOutcome, SplitOutcome},
    placement::ripple::EditMode,
    placement::snap::snap_drag_start,
    session::opts::EngineOpts,
    sync::backup::{BackupStore, FileBackup, MemoryBackup},
    sync::debounce::{Clock, SystemClock},
    sync::pipeline::{SaveJob, SavePipeline},
    sync::remote::{RemoteStore, SaveAck, SnapshotTarget},
    sync::status::{SaveStatus, SyncState},
    timeline::asset::{Lane, TimelineAsset},
    timeline::project::TimelineProject,
};

/// Change notifications for views. Drained with [`TimelineEditor::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// The project changed; `label` names the edit.
    Edited { label: String },
    /// A move or resize was refused because the target span is occupied.
    Blocked { id: String, conflict_with: String },
    SelectionChanged,
    SaveStatusChanged(SaveStatus),
    /// The project was replaced by a local backup.
    Recovered,
}

/// Owns everything on the timeline and is the only way to change it.
///
/// Every successful edit records an undo step, marks the save pipeline dirty and emits
/// [`EditorEvent::Edited`]. A failed edit leaves the project untouched.
pub struct TimelineEditor<C: Clock = SystemClock> {
    project: TimelineProject,
    opts: EngineOpts,
    selection: Selection,
    clipboard: Clipboard,
    history: History,
    pipeline: SavePipeline<C>,
    ripple: bool,
    playhead: f64,
    last_status: SaveStatus,
    events: Vec<EditorEvent>,
}

impl TimelineEditor<SystemClock> {
    pub fn new(project: TimelineProject, opts: EngineOpts) -> Self {
        Self::with_clock(project, opts, SystemClock)
    }
}

impl<C: Clock> TimelineEditor<C> {
    /// Backups go to `opts.sync.backup_dir` when set, otherwise they stay in memory.
    pub fn with_clock(project: TimelineProject, opts: EngineOpts, clock: C) -> Self {
        let pipeline = SavePipeline::with_clock(project.id.clone(), opts.sync.clone(), clock);
        let pipeline = match &opts.sync.backup_dir {
            Some(dir) => pipeline.with_backup(FileBackup::new(dir)),
            None => pipeline.with_backup(MemoryBackup::new()),
        };
        Self::assemble(project, opts, pipeline)
    }

    pub fn with_backup(
        project: TimelineProject,
        opts: EngineOpts,
        clock: C,
        store: impl BackupStore + 'static,
    ) -> Self {
        let pipeline =
            SavePipeline::with_clock(project.id.clone(), opts.sync.clone(), clock).with_backup(store);
        Self::assemble(project, opts, pipeline)
    }

    fn assemble(project: TimelineProject, opts: EngineOpts, pipeline: SavePipeline<C>) -> Self {
        let last_status = pipeline.status();
        Self {
            project,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            history: History::new(opts.history_depth),
            ripple: opts.ripple_on_start,
            pipeline,
            opts,
            playhead: 0.0,
            last_status,
            events: Vec::new(),
        }
    }

    // Reads.

    pub fn project(&self) -> &TimelineProject {
        &self.project
    }

    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn ripple_enabled(&self) -> bool {
        self.ripple
    }

    /// Mode every placement operation runs in right now.
    pub fn mode(&self) -> EditMode {
        EditMode::from_toggle(self.ripple, self.opts.ripple)
    }

    pub fn sync_state(&self) -> SyncState {
        self.pipeline.state()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.pipeline.status()
    }

    pub fn cost(&self) -> CostBreakdown {
        calculate_project_cost(&self.project.assets)
    }

    pub fn export_request(&self, tier: SpeedTier) -> ReelcutResult<ExportRequest> {
        ExportRequest::from_project(&self.project, tier)
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // View state.

    /// Frame-aligned, never negative.
    pub fn set_playhead(&mut self, t: f64) {
        self.playhead = snap_to_frame(t, self.project.frame_rate.as_f64());
    }

    pub fn set_ripple(&mut self, enabled: bool) {
        self.ripple = enabled;
    }

    pub fn click(&mut self, id: &str) {
        self.selection.click(id);
        self.events.push(EditorEvent::SelectionChanged);
    }

    pub fn toggle_selected(&mut self, id: &str) -> bool {
        let selected = self.selection.toggle(id);
        self.events.push(EditorEvent::SelectionChanged);
        selected
    }

    pub fn box_select(&mut self, area: SelectionBox, additive: bool) -> usize {
        let hits = self.selection.box_select(&self.project, area, additive);
        self.events.push(EditorEvent::SelectionChanged);
        hits
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.push(EditorEvent::SelectionChanged);
        }
    }

    // Placement.

    pub fn move_asset(&mut self, id: &str, track: usize, start: f64) -> ReelcutResult<MoveOutcome> {
        let mode = self.mode();
        let before = self.project.clone();
        let result = engine::move_asset(&mut self.project, id, track, start, mode);
        if let Ok(MoveOutcome::Blocked { conflict_with }) = &result {
            self.blocked(id, conflict_with);
        }
        self.settle("Move", before, result)
    }

    /// Move with the drop position snapped to neighbouring edges and the playhead.
    pub fn drag_asset(
        &mut self,
        id: &str,
        track: usize,
        pointer_start: f64,
    ) -> ReelcutResult<MoveOutcome> {
        let asset = self.project.require(id)?;
        let track = self.project.clamp_track(asset.track_kind, track);
        let lane = Lane::new(asset.track_kind, track);
        let start = snap_drag_start(
            &self.project,
            id,
            lane,
            pointer_start,
            Some(self.playhead),
            self.opts.snap,
        );
        self.move_asset(id, track, start)
    }

    /// Group the edits until [`end_gesture`](Self::end_gesture) into one undo step.
    pub fn begin_gesture(&mut self, label: &str) {
        self.history.begin_batch(label, &self.project);
    }

    pub fn end_gesture(&mut self) {
        self.history.end_batch(&self.project);
    }

    pub fn resize_asset(
        &mut self,
        id: &str,
        edge: ResizeEdge,
        duration: f64,
    ) -> ReelcutResult<ResizeOutcome> {
        let mode = self.mode();
        let before = self.project.clone();
        let result = engine::resize_asset(&mut self.project, id, edge, duration, mode);
        if let Ok(ResizeOutcome::Blocked { conflict_with }) = &result {
            self.blocked(id, conflict_with);
        }
        self.settle("Resize", before, result)
    }

    /// Cut `id` at `at`. The selection is left alone apart from dropping the old id.
    pub fn split_asset(&mut self, id: &str, at: f64) -> ReelcutResult<SplitOutcome> {
        let before = self.project.clone();
        let result = engine::split_asset(&mut self.project, id, at);
        self.settle("Split", before, result)
    }

    /// Split the one selected asset at the playhead. The right half ends up selected.
    pub fn split_selected(&mut self) -> ReelcutResult<SplitOutcome> {
        let Some(id) = self.selection.single().map(str::to_string) else {
            return Err(ReelcutError::validation(format!(
                "select exactly one asset to split ({} selected)",
                self.selection.len()
            )));
        };
        let split = self.split_asset(&id, self.playhead)?;
        self.selection.replace([split.right_id.as_str()]);
        self.events.push(EditorEvent::SelectionChanged);
        Ok(split)
    }

    /// Duplicate every selected asset; the copies become the selection.
    pub fn duplicate_selected(&mut self) -> ReelcutResult<Vec<String>> {
        let mode = self.mode();
        let ids = self.selection.ids().to_vec();
        let before = self.project.clone();
        let result = ids
            .iter()
            .map(|id| engine::duplicate_asset(&mut self.project, id, mode))
            .collect::<ReelcutResult<Vec<_>>>();
        if let Ok(copies) = &result {
            self.select_new(copies);
        }
        self.settle("Duplicate", before, result)
    }

    pub fn delete_assets<S: AsRef<str>>(&mut self, ids: &[S]) -> ReelcutResult<Vec<TimelineAsset>> {
        let mode = self.mode();
        let before = self.project.clone();
        let result = engine::delete_assets(&mut self.project, ids, mode);
        self.settle("Delete", before, result)
    }

    pub fn delete_selected(&mut self) -> ReelcutResult<Vec<TimelineAsset>> {
        let ids = self.selection.ids().to_vec();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.delete_assets(&ids)
    }

    /// Place a new asset. An empty or taken id is replaced with a fresh one.
    pub fn insert_asset(&mut self, asset: TimelineAsset) -> ReelcutResult<String> {
        let mode = self.mode();
        let before = self.project.clone();
        let result = engine::insert_asset(&mut self.project, asset, mode);
        self.settle("Insert", before, result)
    }

    /// Place an upload on `track` of its kind, at `at` or the playhead.
    pub fn import_media(
        &mut self,
        media: &UploadedMedia,
        track: usize,
        at: Option<f64>,
    ) -> ReelcutResult<String> {
        let start = at.unwrap_or(self.playhead);
        let asset = media.to_asset(track, start)?;
        let id = self.insert_asset(asset)?;
        tracing::info!(%id, kind = ?media.kind, "media imported");
        Ok(id)
    }

    pub fn replace_with_composition<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        composition: TimelineAsset,
    ) -> ReelcutResult<String> {
        let mode = self.mode();
        let before = self.project.clone();
        let result = engine::replace_with_composition(&mut self.project, ids, composition, mode);
        if let Ok(id) = &result {
            self.select_new(std::slice::from_ref(id));
        }
        self.settle("Compose", before, result)
    }

    /// Apply `change` to one asset, such as a new LUT or effect list. The result must
    /// still validate, placement included.
    pub fn update_asset(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut TimelineAsset),
    ) -> ReelcutResult<()> {
        let before = self.project.clone();
        let result = self.project.require_mut(id).map(change);
        let result = result.and_then(|()| self.project.validate());
        self.settle("Update", before, result)
    }

    // Clipboard.

    pub fn copy_selected(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        self.clipboard.copy(&self.project, &ids)
    }

    pub fn cut_selected(&mut self) -> ReelcutResult<usize> {
        let copied = self.copy_selected();
        if copied > 0 {
            self.delete_selected()?;
        }
        Ok(copied)
    }

    /// Paste the clipboard at the playhead. The pasted assets become the selection.
    pub fn paste(&mut self) -> ReelcutResult<Vec<String>> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        let mode = self.mode();
        let before = self.project.clone();
        let result = self.clipboard.paste(&mut self.project, self.playhead, mode);
        if let Ok(ids) = &result {
            self.select_new(ids);
        }
        self.settle("Paste", before, result)
    }

    // Keyframes.

    pub fn add_keyframe(
        &mut self,
        id: &str,
        time: f64,
        values: PropertyValues,
        easing: Easing,
    ) -> ReelcutResult<KeyframeChange> {
        let before = self.project.clone();
        let result = self
            .project
            .require_mut(id)
            .and_then(|asset| keyframe::add_keyframe(asset, time, values, easing));
        self.settle("Keyframe", before, result)
    }

    pub fn remove_keyframe(&mut self, id: &str, index: usize) -> ReelcutResult<TimelineKeyframe> {
        let before = self.project.clone();
        let result = self
            .project
            .require_mut(id)
            .and_then(|asset| keyframe::remove_keyframe(asset, index));
        self.settle("Remove keyframe", before, result)
    }

    // History.

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.project) {
            Some(previous) => {
                self.restore(previous, "Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.project) {
            Some(next) => {
                self.restore(next, "Redo");
                true
            }
            None => false,
        }
    }

    // Persistence.

    /// Let the pipeline send whatever is due through `remote`. Returns successful saves.
    #[tracing::instrument(skip(self, remote), fields(project = %self.project.id))]
    pub fn tick(&mut self, remote: &mut dyn RemoteStore) -> ReelcutResult<usize> {
        let result = self.pipeline.drive(&self.project, remote);
        self.note_status();
        result
    }

    /// For hosts doing their own I/O: the next save to send, if one is due.
    pub fn poll_save(&mut self) -> ReelcutResult<Option<SaveJob>> {
        let job = self.pipeline.poll(&self.project);
        self.note_status();
        job
    }

    pub fn complete_save(&mut self, job: &SaveJob, result: ReelcutResult<SaveAck>) -> ReelcutResult<()> {
        let done = self.pipeline.complete(job, result);
        self.note_status();
        done
    }

    pub fn save_now(&mut self) {
        self.pipeline.save_now();
        self.note_status();
    }

    pub fn set_online(&mut self, online: bool) {
        self.pipeline.set_online(online);
        self.note_status();
    }

    pub fn export_snapshot(&self, target: &mut dyn SnapshotTarget) -> ReelcutResult<String> {
        self.pipeline.export_snapshot(&self.project, target)
    }

    /// Replace the project with the local backup, if one exists and differs.
    ///
    /// The replacement is undoable and is queued for saving like any edit.
    pub fn recover(&mut self) -> ReelcutResult<bool> {
        let Some(backup) = self.pipeline.recover()? else {
            return Ok(false);
        };
        if backup == self.project {
            return Ok(false);
        }
        backup.validate()?;
        let before = std::mem::replace(&mut self.project, backup);
        self.history.record("Recover", &before);
        self.changed("Recover");
        self.events.push(EditorEvent::Recovered);
        tracing::info!(project = %self.project.id, assets = self.project.assets.len(), "recovered from backup");
        Ok(true)
    }

    fn settle<T>(
        &mut self,
        label: &str,
        before: TimelineProject,
        result: ReelcutResult<T>,
    ) -> ReelcutResult<T> {
        match &result {
            Ok(_) if self.project != before => {
                self.history.record(label, &before);
                self.changed(label);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(label, error = %err, "edit rejected");
                self.project = before;
            }
        }
        result
    }

    fn changed(&mut self, label: &str) {
        if self.selection.retain_existing(&self.project) > 0 {
            self.events.push(EditorEvent::SelectionChanged);
        }
        self.pipeline.mark_dirty();
        self.events.push(EditorEvent::Edited {
            label: label.to_string(),
        });
        self.note_status();
    }

    fn restore(&mut self, project: TimelineProject, label: &str) {
        self.project = project;
        self.changed(label);
    }

    fn blocked(&mut self, id: &str, conflict_with: &str) {
        tracing::debug!(id, conflict_with, "edit blocked");
        self.events.push(EditorEvent::Blocked {
            id: id.to_string(),
            conflict_with: conflict_with.to_string(),
        });
    }

    fn select_new(&mut self, ids: &[String]) {
        self.selection.replace(ids);
        self.events.push(EditorEvent::SelectionChanged);
    }

    fn note_status(&mut self) {
        let status = self.pipeline.status();
        if status != self.last_status {
            self.last_status = status;
            self.events.push(EditorEvent::SaveStatusChanged(status));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
