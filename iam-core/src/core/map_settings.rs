//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{Config, MapCfg};

/// Map-level presentation settings, carried alongside the feature store and
/// embedded as side-channel metadata on export
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial year window shown by the time slider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i32>,
    /// Initial map center (longitude, latitude)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl MapSettings {
    /// Right-biased merge, like settings records: defined fields of `self`
    /// win, `master` fills the rest
    pub fn merge(&self, master: &MapSettings) -> MapSettings {
        MapSettings {
            title: self.title.clone().or_else(|| master.title.clone()),
            description: self
                .description
                .clone()
                .or_else(|| master.description.clone()),
            year_from: self.year_from.or(master.year_from),
            year_to: self.year_to.or(master.year_to),
            center: self.center.or(master.center),
            zoom: self.zoom.or(master.zoom),
        }
    }
}

impl<'a> Config<'a, MapCfg> for MapSettings {
    fn from_config(cfg: &MapCfg) -> Result<Self, String> {
        Ok(MapSettings {
            title: cfg.title.clone(),
            description: cfg.description.clone(),
            year_from: cfg.year_from,
            year_to: cfg.year_to,
            center: cfg.center,
            zoom: cfg.zoom,
        })
    }
    fn gen_config() -> String {
        r#"
[map]
#title = "My map"
#description = ""
#year_from = 1800
#year_to = 2000
#center = [8.5, 47.4]
#zoom = 6.0
"#
        .to_string()
    }
}
