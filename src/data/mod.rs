pub mod labels;
pub mod model;
pub mod normalizer;
pub mod record;
pub mod source;
pub mod zones;

use crate::core::{bounds::Bounds, geo::LatLng};
use serde::{Deserialize, Serialize};

pub use labels::{LabelIndex, LabelNormalizer, TextFragment, TextLayer};
pub use model::{MenuItem, ViewFacility, ViewLocation, ViewModel, ZoneCategory};
pub use normalizer::{FacilityNormalizer, NameCollator};
pub use record::FacilityRecord;
pub use source::DatasetSource;

/// Something the spatial view can focus on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpatialTarget {
    /// Geographic point on the interactive map
    Point(LatLng),
    /// Pixel box on a rendered PDF page
    Region(Bounds),
}

/// Shared output contract of the normalizer strategies: key → spatial targets
pub trait SpatialCatalog {
    /// Targets for a key, in display order; empty when the key is unknown
    fn targets(&self, key: &str) -> Vec<SpatialTarget>;
}

/// A way of turning source material into a [`SpatialCatalog`].
///
/// The structured dataset and the rendered PDF text layer are two strategies
/// behind this one contract.
pub trait NormalizeStrategy {
    type Input: ?Sized;
    type Output: SpatialCatalog;

    fn normalize(&self, input: &Self::Input) -> Self::Output;
}

/// Facility ids resolve to all their locations, location ids to one point
impl SpatialCatalog for ViewModel {
    fn targets(&self, key: &str) -> Vec<SpatialTarget> {
        if let Some(facility) = self.facility(key) {
            return facility
                .locations
                .iter()
                .map(|l| SpatialTarget::Point(l.position))
                .collect();
        }
        self.facilities()
            .flat_map(|f| f.locations.iter())
            .find(|l| l.id == key)
            .map(|l| vec![SpatialTarget::Point(l.position)])
            .unwrap_or_default()
    }
}
