//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use env_logger::Builder;
use iam_core::core::config::{read_config, ApplicationCfg, Config};
use iam_core::core::process::ProcessStatus;
use iam_core::service::{export_geojson, export_settings_json, ExportOptions, MapService, SourceFormat};
use iam_core::store::InsertMode;
use log::Record;
use std::env;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap(),
            t.tm_nsec / 1_000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG");
    let rust_log = if args.value_of("loglevel").is_none() && rust_log_env.is_ok() {
        rust_log_env.as_deref().unwrap()
    } else {
        args.value_of("loglevel").unwrap_or("info")
    };
    builder.parse_filters(rust_log);

    builder.init();
}

fn service_from_args(args: &ArgMatches<'_>) -> MapService {
    match args.value_of("config") {
        Some(path) => {
            let config: ApplicationCfg = read_config(path).unwrap_or_else(|err| {
                println!("Error reading configuration - {}", err);
                std::process::exit(1)
            });
            let mut service = MapService::from_config(&config).unwrap_or_else(|err| {
                println!("Error applying configuration - {}", err);
                std::process::exit(1)
            });
            for datasource in &config.datasources {
                let format = datasource
                    .format
                    .as_ref()
                    .map(|f| parse_or_exit::<SourceFormat>(f, "format"));
                let mode = match datasource.mode.as_deref() {
                    Some("droptable") => InsertMode::DropTable,
                    _ => InsertMode::Overwrite,
                };
                let result = service.load_file(&datasource.path, format, mode);
                report(&result);
            }
            service
        }
        None => MapService::new(),
    }
}

fn parse_or_exit<T: FromStr<Err = String>>(value: &str, what: &str) -> T {
    T::from_str(value).unwrap_or_else(|err| {
        println!("Invalid {} - {}", what, err);
        std::process::exit(1)
    })
}

fn load_inputs(service: &mut MapService, args: &ArgMatches<'_>) {
    let format = args
        .value_of("format")
        .map(|f| parse_or_exit::<SourceFormat>(f, "format"));
    if let Some(files) = args.values_of("FILE") {
        for path in files {
            let result = service.load_file(path, format, InsertMode::Overwrite);
            report(&result);
        }
    }
}

fn report(result: &iam_core::core::process::ProcessResult) {
    match result.status {
        ProcessStatus::Info => info!("{}", result.text),
        ProcessStatus::Warn => warn!("{}", result.text),
        ProcessStatus::Error => error!("{}", result.text),
    }
    for detail in &result.details {
        info!("  {}", detail);
    }
}

fn info_command(args: &ArgMatches<'_>) {
    let mut service = service_from_args(args);
    load_inputs(&mut service, args);
    let (features, properties, attributes, settings) = service.store.table_sizes();
    println!("features:   {}", features);
    println!("properties: {}", properties);
    println!("attributes: {}", attributes);
    println!("settings:   {}", settings);
    if features > 0 {
        println!(
            "extent:     {} {} {} {}",
            service.store.get_min_longitude(),
            service.store.get_min_latitude(),
            service.store.get_max_longitude(),
            service.store.get_max_latitude()
        );
    }
    if let (Some(min), Some(max)) = (
        service.store.get_attributes_minimum_year(),
        service.store.get_attributes_maximum_year(),
    ) {
        println!("years:      {} - {}", min, max);
    }
}

fn write_output(path: Option<&str>, content: &str) {
    match path {
        Some(path) => {
            let mut file = File::create(path).unwrap_or_else(|err| {
                println!("Error creating '{}' - {}", path, err);
                std::process::exit(1)
            });
            file.write_all(content.as_bytes()).unwrap_or_else(|err| {
                println!("Error writing '{}' - {}", path, err);
                std::process::exit(1)
            });
        }
        None => println!("{}", content),
    }
}

fn export_command(args: &ArgMatches<'_>) {
    let mut service = service_from_args(args);
    load_inputs(&mut service, args);
    let options = ExportOptions {
        with_attributes: !args.is_present("no-attributes"),
        with_settings: !args.is_present("no-settings"),
    };
    let document = export_geojson(&service.store, &service.map_settings, &options);
    write_output(args.value_of("out"), &document);
}

fn settings_command(args: &ArgMatches<'_>) {
    let mut service = service_from_args(args);
    load_inputs(&mut service, args);
    let document = export_settings_json(&service.store, &service.map_settings);
    write_output(args.value_of("out"), &document);
}

fn main() {
    let common_args = [
        Arg::with_name("config")
            .long("config")
            .takes_value(true)
            .help("Load and merge the datasources of a configuration file"),
        Arg::with_name("loglevel")
            .long("loglevel")
            .takes_value(true)
            .possible_values(&["error", "warn", "info", "debug"])
            .help("Log level (Default: info)"),
        Arg::with_name("format")
            .long("format")
            .takes_value(true)
            .possible_values(&[
                "geojson",
                "kml",
                "csv-properties",
                "csv-attributes",
                "settings",
            ])
            .help("Input format (Default: derived from file extension)"),
        Arg::with_name("FILE")
            .multiple(true)
            .help("Input data files"),
    ];
    let matches = App::new("iam")
        .version(env!("CARGO_PKG_VERSION"))
        .about("interactive atlas map tool")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("info")
                .about("Load data files and print store statistics")
                .args(&common_args),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Export the merged data as a GeoJSON container")
                .args(&common_args)
                .arg(
                    Arg::with_name("out")
                        .long("out")
                        .takes_value(true)
                        .help("Output file (Default: stdout)"),
                )
                .arg(
                    Arg::with_name("no-attributes")
                        .long("no-attributes")
                        .help("Skip embedded attributes"),
                )
                .arg(
                    Arg::with_name("no-settings")
                        .long("no-settings")
                        .help("Skip the settings pseudo-feature"),
                ),
        )
        .subcommand(
            SubCommand::with_name("settings")
                .about("Export map and feature settings as JSON")
                .args(&common_args)
                .arg(
                    Arg::with_name("out")
                        .long("out")
                        .takes_value(true)
                        .help("Output file (Default: stdout)"),
                ),
        )
        .subcommand(SubCommand::with_name("genconfig").about("Print a configuration template"))
        .get_matches();

    match matches.subcommand() {
        ("info", Some(args)) => {
            init_logger(args);
            info_command(args);
        }
        ("export", Some(args)) => {
            init_logger(args);
            export_command(args);
        }
        ("settings", Some(args)) => {
            init_logger(args);
            settings_command(args);
        }
        ("genconfig", _) => {
            println!("{}", MapService::gen_config());
        }
        _ => {}
    }
}
