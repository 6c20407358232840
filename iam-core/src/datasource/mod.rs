//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod csv_ds;
pub mod datasource;
pub mod geojson;
pub mod json_settings;
pub mod kml;

pub use self::csv_ds::{CsvAttributeDatasource, CsvPropertyDatasource};
pub use self::datasource::DatasourceInput;
pub use self::geojson::GeoJsonDatasource;
pub use self::json_settings::JsonSettingsDatasource;
pub use self::kml::KmlDatasource;
