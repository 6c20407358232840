//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod aggregation;
pub mod store;

pub use self::aggregation::{AggregateCourse, AggregateType, YearSeries};
pub use self::store::FeatureStore;

/// Bulk-load mode: OVERWRITE merges into existing tables, DROPTABLE clears
/// the affected tables (and dependent caches) before inserting
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertMode {
    Overwrite,
    DropTable,
}

#[cfg(test)]
mod store_test;
