use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    timeline::asset::TimelineAsset,
    timeline::project::{Resolution, TimelineProject},
};

pub const EXPORT_ENDPOINT: &str = "/api/timeline/export";

pub const REFUND_NOTICE: &str = "Any credits deducted for this export will be refunded.";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

pub fn export_status_path(job_id: &str) -> String {
    format!("{EXPORT_ENDPOINT}/status/{job_id}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    #[default]
    Standard,
    Express,
}

impl SpeedTier {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "express" => Some(Self::Express),
            _ => None,
        }
    }
}

/// Body of an export submission.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub project_id: String,
    pub assets: Vec<TimelineAsset>,
    pub total_duration: f64,
    pub resolution: Resolution,
    pub aspect_ratio: String,
    pub frame_rate: f64,
    pub speed_tier: SpeedTier,
}

impl ExportRequest {
    /// Build a job from a valid, non-empty project. Assets are ordered by lane, then
    /// start time.
    pub fn from_project(project: &TimelineProject, speed_tier: SpeedTier) -> ReelcutResult<Self> {
        project.validate()?;
        if project.assets.is_empty() {
            return Err(ReelcutError::export("nothing to export: the timeline is empty"));
        }
        let mut assets = project.assets.clone();
        assets.sort_by(|a, b| {
            a.lane()
                .cmp(&b.lane())
                .then(a.start_time.total_cmp(&b.start_time))
        });
        Ok(Self {
            project_id: project.id.clone(),
            assets,
            total_duration: project.duration(),
            resolution: project.resolution,
            aspect_ratio: project.aspect_ratio.clone(),
            frame_rate: project.frame_rate.as_f64(),
            speed_tier,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ExportStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Response of the status endpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportStatusResponse {
    pub status: ExportStatus,
    /// `0..=100`.
    #[serde(default)]
    pub progress: f64,
    #[serde(default, alias = "outputVideoUrl", skip_serializing_if = "Option::is_none")]
    pub output_video_url: Option<String>,
    #[serde(default, alias = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, alias = "creditsDeducted")]
    pub credits_deducted: f64,
    #[serde(default, alias = "processingTimeMs", skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    #[serde(default, alias = "fileSizeMb", skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
}

impl ExportStatusResponse {
    pub fn in_progress(status: ExportStatus, progress: f64) -> Self {
        Self {
            status,
            progress,
            output_video_url: None,
            error_message: None,
            credits_deducted: 0.0,
            processing_time_ms: None,
            file_size_mb: None,
        }
    }
}

/// The render service as seen from the engine.
pub trait ExportService {
    /// Submit a job; returns its id.
    fn submit(&mut self, request: &ExportRequest) -> ReelcutResult<String>;
    fn status(&mut self, job_id: &str) -> ReelcutResult<ExportStatusResponse>;
}

/// Terminal state of an export, ready for display.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    Completed {
        output_video_url: String,
        credits_deducted: f64,
        processing_time_ms: Option<u64>,
        file_size_mb: Option<f64>,
    },
    Failed {
        message: String,
        refund_notice: String,
    },
}

impl ExportOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            refund_notice: REFUND_NOTICE.to_string(),
        }
    }

    fn from_terminal(response: &ExportStatusResponse) -> Self {
        match (response.status, &response.output_video_url) {
            (ExportStatus::Completed, Some(url)) => Self::Completed {
                output_video_url: url.clone(),
                credits_deducted: response.credits_deducted,
                processing_time_ms: response.processing_time_ms,
                file_size_mb: response.file_size_mb,
            },
            (ExportStatus::Completed, None) => {
                Self::failed("render finished without an output video")
            }
            _ => Self::failed(
                response
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "export failed".to_string()),
            ),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Completed {
                output_video_url, ..
            } => format!("Export ready: {output_video_url}"),
            Self::Failed {
                message,
                refund_notice,
            } => format!("Export failed: {message}. {refund_notice}"),
        }
    }
}

/// Polls one export job at a fixed interval until it reaches a terminal state.
#[derive(Clone, Debug)]
pub struct ExportTracker {
    job_id: String,
    interval: Duration,
    next_poll: Option<Instant>,
    last: Option<ExportStatusResponse>,
    outcome: Option<ExportOutcome>,
}

impl ExportTracker {
    pub fn new(job_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            job_id: job_id.into(),
            interval,
            next_poll: None,
            last: None,
            outcome: None,
        }
    }

    /// Submit `request` and start tracking the returned job.
    #[tracing::instrument(skip(service, request), fields(project = %request.project_id))]
    pub fn submit(
        service: &mut dyn ExportService,
        request: &ExportRequest,
        interval: Duration,
    ) -> ReelcutResult<Self> {
        let job_id = service.submit(request)?;
        tracing::info!(%job_id, assets = request.assets.len(), "export submitted");
        Ok(Self::new(job_id, interval))
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn status_path(&self) -> String {
        export_status_path(&self.job_id)
    }

    pub fn last_status(&self) -> Option<&ExportStatusResponse> {
        self.last.as_ref()
    }

    pub fn progress(&self) -> f64 {
        self.last.as_ref().map(|r| r.progress).unwrap_or(0.0)
    }

    pub fn outcome(&self) -> Option<&ExportOutcome> {
        self.outcome.as_ref()
    }

    /// Query the service if a poll is due at `now`. Returns the outcome once terminal.
    ///
    /// A failed status query is returned as an error; the next poll is still scheduled.
    pub fn poll(
        &mut self,
        service: &mut dyn ExportService,
        now: Instant,
    ) -> ReelcutResult<Option<&ExportOutcome>> {
        if self.outcome.is_some() {
            return Ok(self.outcome.as_ref());
        }
        if self.next_poll.is_some_and(|at| now < at) {
            return Ok(None);
        }
        self.next_poll = Some(now + self.interval);

        let response = service.status(&self.job_id)?;
        tracing::debug!(
            job_id = %self.job_id,
            status = ?response.status,
            progress = response.progress,
            "export status"
        );
        if response.status.is_terminal() {
            let outcome = ExportOutcome::from_terminal(&response);
            if let ExportOutcome::Failed { message, .. } = &outcome {
                tracing::warn!(job_id = %self.job_id, %message, "export failed");
            }
            self.outcome = Some(outcome);
        }
        self.last = Some(response);
        Ok(self.outcome.as_ref())
    }
}

/// Render service stand-in that replays a scripted list of statuses. The last status
/// repeats once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedExportService {
    pub submitted: Vec<ExportRequest>,
    script: VecDeque<ExportStatusResponse>,
    last: Option<ExportStatusResponse>,
    pub status_calls: usize,
}

impl ScriptedExportService {
    pub fn new(script: impl IntoIterator<Item = ExportStatusResponse>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl ExportService for ScriptedExportService {
    fn submit(&mut self, request: &ExportRequest) -> ReelcutResult<String> {
        self.submitted.push(request.clone());
        Ok(format!("job-{}", self.submitted.len()))
    }

    fn status(&mut self, job_id: &str) -> ReelcutResult<ExportStatusResponse> {
        self.status_calls += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next);
        }
        self.last
            .clone()
            .ok_or_else(|| ReelcutError::export(format!("unknown export job '{job_id}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
