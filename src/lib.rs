//! reelcut is the timeline engine behind a multi-track video editor.
//!
//! It owns "what is on the timeline" and nothing else: rendering happens in an external
//! service. The public API is editor-oriented:
//!
//! - Load and validate a [`TimelineProject`]
//! - Wrap it in a [`TimelineEditor`] and edit through it
//! - Tick the editor so its [`SavePipeline`] can persist the result
#![forbid(unsafe_code)]

/// Keyframes and easing curves.
pub mod animation;
/// Credit cost derived from asset provenance.
pub mod cost;
/// Selection, clipboard and undo history.
pub mod editing;
/// Render-service and upload contracts.
pub mod export;
mod foundation;
/// Collision handling, ripple edits and snapping.
pub mod placement;
/// The editor state container.
pub mod session;
/// Debounced saving with offline queueing.
pub mod sync;
/// The project and asset data model.
pub mod timeline;

pub use crate::foundation::error::{ReelcutError, ReelcutResult};
pub use crate::foundation::time::{
    Fps, TIME_EPSILON, frame_to_time, intervals_overlap, snap_to_frame, time_to_frame,
};

pub use crate::animation::ease::Easing;
pub use crate::animation::keyframe::{
    AnimProperty, AnimatedProperties, KeyframeChange, PropertyValues, TimelineKeyframe,
    add_keyframe, evaluate, evaluate_all, remove_keyframe,
};
pub use crate::cost::calculator::{CostBreakdown, CostCategory, calculate_project_cost};
pub use crate::editing::{Clipboard, History, Selection, SelectionBox};
pub use crate::export::job::{
    ExportOutcome, ExportRequest, ExportService, ExportStatus, ExportStatusResponse,
    ExportTracker, SpeedTier,
};
pub use crate::export::upload::UploadedMedia;
pub use crate::placement::engine::{
    MoveOutcome, ResizeEdge, ResizeOutcome, SplitOutcome, delete_assets, duplicate_asset,
    insert_asset, insert_group, move_asset, replace_with_composition, resize_asset,
    split_asset,
};
pub use crate::placement::ripple::{EditMode, RipplePolicy};
pub use crate::placement::snap::{SnapOpts, snap_drag_start};
pub use crate::session::editor::{EditorEvent, TimelineEditor};
pub use crate::session::opts::EngineOpts;
pub use crate::sync::backup::{BackupStore, FileBackup, MemoryBackup};
pub use crate::sync::debounce::{Clock, ManualClock, SystemClock};
pub use crate::sync::pipeline::{SaveJob, SavePipeline, SyncOpts, recover_from};
pub use crate::sync::remote::{
    MemoryRemote, MemorySnapshots, RemoteStore, SaveAck, SaveRequest, SnapshotTarget,
};
pub use crate::sync::status::{SaveStatus, SyncState};
pub use crate::timeline::asset::{
    AssetKind, AssetOrigin, ColorGrading, EffectInstance, Lane, LutSpec, Playback, Provenance,
    TextContent, TimelineAsset, TrackKind,
};
pub use crate::timeline::project::{Resolution, TimelineProject, TrackConfig};
pub use crate::timeline::transition::TransitionSpec;
