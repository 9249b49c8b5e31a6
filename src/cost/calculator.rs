use std::collections::BTreeMap;

use crate::timeline::asset::{AssetKind, AssetOrigin, TimelineAsset};

/// Bucket an asset's spend is reported under.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    AiVideo,
    AiImage,
    AiAudio,
    Composition,
    Upload,
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::AiVideo,
        CostCategory::AiImage,
        CostCategory::AiAudio,
        CostCategory::Composition,
        CostCategory::Upload,
    ];

    /// `None` for assets that can never carry a charge (generated text).
    pub fn of(asset: &TimelineAsset) -> Option<Self> {
        match asset.origin() {
            AssetOrigin::Upload => Some(Self::Upload),
            AssetOrigin::Composition => Some(Self::Composition),
            AssetOrigin::Generated => match asset.kind {
                AssetKind::Video => Some(Self::AiVideo),
                AssetKind::Image => Some(Self::AiImage),
                AssetKind::Audio | AssetKind::Music => Some(Self::AiAudio),
                AssetKind::Text => None,
            },
        }
    }
}

/// Credits per category plus the total.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct CostBreakdown {
    pub ai_video: f64,
    pub ai_image: f64,
    pub ai_audio: f64,
    pub composition: f64,
    /// Always zero; kept so every category shows up in reports.
    pub upload: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::AiVideo => self.ai_video,
            CostCategory::AiImage => self.ai_image,
            CostCategory::AiAudio => self.ai_audio,
            CostCategory::Composition => self.composition,
            CostCategory::Upload => self.upload,
        }
    }
}

const MILLI_PER_CREDIT: f64 = 1000.0;

// Integer milli-credits make the sum independent of asset order.
fn to_milli(credits: f64) -> i64 {
    if !credits.is_finite() || credits <= 0.0 {
        return 0;
    }
    (credits * MILLI_PER_CREDIT).round() as i64
}

fn from_milli(milli: i64) -> f64 {
    milli as f64 / MILLI_PER_CREDIT
}

fn charged_milli(asset: &TimelineAsset) -> (Option<CostCategory>, i64) {
    let category = CostCategory::of(asset);
    let milli = match category {
        None | Some(CostCategory::Upload) => 0,
        Some(_) => asset
            .provenance
            .as_ref()
            .map(|p| to_milli(p.credits_used))
            .unwrap_or(0),
    };
    (category, milli)
}

/// Credits one asset contributes. Uploads and text are always free.
pub fn asset_cost(asset: &TimelineAsset) -> f64 {
    from_milli(charged_milli(asset).1)
}

/// Sum provenance credits over `assets`, bucketed by [`CostCategory`].
#[tracing::instrument(skip(assets), fields(assets = assets.len()))]
pub fn calculate_project_cost(assets: &[TimelineAsset]) -> CostBreakdown {
    let mut buckets: BTreeMap<CostCategory, i64> = BTreeMap::new();
    for asset in assets {
        if let (Some(category), milli) = charged_milli(asset) {
            *buckets.entry(category).or_default() += milli;
        }
    }
    let bucket = |c: CostCategory| buckets.get(&c).copied().unwrap_or(0);
    let total: i64 = CostCategory::ALL.into_iter().map(bucket).sum();

    let breakdown = CostBreakdown {
        ai_video: from_milli(bucket(CostCategory::AiVideo)),
        ai_image: from_milli(bucket(CostCategory::AiImage)),
        ai_audio: from_milli(bucket(CostCategory::AiAudio)),
        composition: from_milli(bucket(CostCategory::Composition)),
        upload: 0.0,
        total: from_milli(total),
    };
    tracing::debug!(total = breakdown.total, "project cost computed");
    breakdown
}

#[cfg(test)]
#[path = "../../tests/unit/cost/calculator.rs"]
mod tests;
