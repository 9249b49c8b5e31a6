//! Debounced persistence with an offline queue, retry and local backup.
//!
//! Nothing here owns a thread or performs network I/O. The host polls
//! [`SavePipeline::poll`] from its loop, performs the returned [`SaveJob`] however it
//! likes, and reports the result through [`SavePipeline::complete`].

/// Local durable backup of the serialized project.
pub mod backup;
/// Clocks and the cancel-and-reschedule debouncer.
pub mod debounce;
/// The save state machine.
pub mod pipeline;
/// Remote persistence and snapshot targets.
pub mod remote;
/// Save status reporting.
pub mod status;

pub use backup::{BackupStore, FileBackup, MemoryBackup};
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use pipeline::{SaveJob, SavePipeline, SyncOpts};
pub use remote::{MemoryRemote, MemorySnapshots, RemoteStore, SaveAck, SaveRequest, SnapshotTarget};
pub use status::{SavePhase, SaveStatus, SyncState};
