//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod color;
pub mod config;
pub mod feature;
pub mod geom;
pub mod map_settings;
pub mod process;
pub mod settings;
pub mod table;

pub use self::config::{parse_config, read_config, ApplicationCfg, Config};

#[cfg(test)]
mod geom_test;
#[cfg(test)]
mod table_test;
