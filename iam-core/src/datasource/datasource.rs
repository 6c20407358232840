//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttribute, FeatureProperty};
use crate::core::map_settings::MapSettings;
use crate::core::settings::FeatureSettings;

/// Common adapter contract: constructed from raw text plus a process-result
/// accumulator, an adapter never lets malformed data escape as a panic or
/// `Err` - per-record failures become WARN details, a total parse failure
/// sets ERROR and leaves the adapter empty.
pub trait DatasourceInput {
    fn features(&self) -> Vec<Feature>;
    fn feature_properties(&self) -> Vec<FeatureProperty>;
    fn feature_attributes(&self) -> Vec<FeatureAttribute>;
    fn feature_settings(&self) -> Vec<FeatureSettings>;
    fn map_settings(&self) -> Option<MapSettings>;
}
