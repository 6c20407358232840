//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod map_export;
pub mod map_service;

pub use self::map_export::{export_geojson, export_settings_json, ExportOptions};
pub use self::map_service::{MapService, SourceFormat};

#[cfg(test)]
mod map_export_test;
