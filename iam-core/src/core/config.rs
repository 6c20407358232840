//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    #[serde(default)]
    pub map: MapCfg,
    #[serde(rename = "datasource", default)]
    pub datasources: Vec<DatasourceCfg>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct MapCfg {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Initial year window shown by the time slider
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    /// Initial map center (longitude, latitude)
    pub center: Option<(f64, f64)>,
    pub zoom: Option<f64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatasourceCfg {
    pub path: String,
    /// geojson, kml, csv-properties, csv-attributes or settings
    /// (default: derived from the file extension)
    pub format: Option<String>,
    /// overwrite or droptable (default: overwrite)
    pub mode: Option<String>,
}

pub const DEFAULT_CONFIG: &str = r#"
[map]
#title = "My map"
#year_from = 1800
#year_to = 2000

#[[datasource]]
#path = "features.geojson"

#[[datasource]]
#path = "population.csv"
#format = "csv-attributes"
"#;

/// Load and parse the config file into a config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into a config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").expect("static regex");
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env_vars = HashMap::new();
    for (key, value) in env::vars() {
        env_vars.insert(key, value);
    }
    context.insert("env", &env_vars);
    let toml = tera
        .render(path, &context)
        .map_err(|e| match e.source() {
            Some(source) => format!("Template error: {}", source),
            None => format!("Template error: {}", e),
        })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
