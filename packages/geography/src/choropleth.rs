//! Maps mountain counts to choropleth color tiers.

use summit_map_geography_models::ChoroplethBucket;

/// Lower bounds (inclusive) of each non-empty tier, highest first.
const THRESHOLDS: &[(usize, ChoroplethBucket)] = &[
    (25, ChoroplethBucket::Tier7),
    (20, ChoroplethBucket::Tier6),
    (15, ChoroplethBucket::Tier5),
    (10, ChoroplethBucket::Tier4),
    (5, ChoroplethBucket::Tier3),
    (3, ChoroplethBucket::Tier2),
    (1, ChoroplethBucket::Tier1),
];

/// Classifies a province's mountain count into a color tier.
#[must_use]
pub fn classify(count: usize) -> ChoroplethBucket {
    THRESHOLDS
        .iter()
        .find(|(min, _)| count >= *min)
        .map_or(ChoroplethBucket::Empty, |(_, bucket)| *bucket)
}
