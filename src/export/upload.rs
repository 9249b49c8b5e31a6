use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    timeline::asset::{AssetKind, AssetOrigin, Provenance, TimelineAsset},
};

/// How long a still image runs when first placed.
pub const DEFAULT_STILL_SECS: f64 = 5.0;

/// What the upload service hands back for a stored file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub url: String,
    pub storage_key: String,
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Decoded media length; required for time-based media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl UploadedMedia {
    fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self
                .storage_key
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("upload")
                .to_string(),
        }
    }

    /// An upload-origin asset using the whole source, starting at `start`.
    ///
    /// The id is left empty so the placement engine assigns one.
    pub fn to_asset(&self, track: usize, start: f64) -> ReelcutResult<TimelineAsset> {
        if self.url.trim().is_empty() {
            return Err(ReelcutError::validation("upload has no url"));
        }
        let (duration, source_duration) = match self.kind {
            AssetKind::Text => {
                return Err(ReelcutError::validation("text cannot be uploaded as media"));
            }
            AssetKind::Image => (DEFAULT_STILL_SECS, None),
            AssetKind::Video | AssetKind::Audio | AssetKind::Music => match self.duration {
                Some(d) if d.is_finite() && d > 0.0 => (d, Some(d)),
                _ => {
                    return Err(ReelcutError::validation(format!(
                        "upload '{}' has no usable duration",
                        self.display_name()
                    )));
                }
            },
        };

        Ok(
            TimelineAsset::new(String::new(), self.kind, self.display_name(), track, start, duration)
                .with_source(self.url.clone(), source_duration)
                .with_provenance(Provenance {
                    origin: AssetOrigin::Upload,
                    storage_key: Some(self.storage_key.clone()),
                    ..Provenance::default()
                }),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/upload.rs"]
mod tests;
