//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use mbtiler_service::{config_from_args, gen_config, tiler_from_args};
use std::env;
use std::io::Write;
use std::process;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG");
    let default_level = if args.is_present("verbose") {
        "debug"
    } else {
        "info"
    };
    let rust_log = match (args.value_of("loglevel"), rust_log_env.as_ref()) {
        (Some(loglevel), _) => loglevel,
        (None, Ok(rust_log)) if !args.is_present("verbose") => rust_log.as_str(),
        (None, _) => default_level,
    };
    builder.parse_filters(rust_log);

    builder.init();
}

fn generate(args: &ArgMatches<'_>) -> Result<(), String> {
    let input = args.value_of("INPUT").ok_or("Input file argument is required")?;
    let output = args
        .value_of("OUTPUT")
        .ok_or("Output file argument is required")?;
    let config = config_from_args(args)?;
    let tiler = tiler_from_args(&config, args)?;
    let summary = tiler.run(input, output).map_err(|e| e.to_string())?;
    if tiler.progress {
        println!("");
    }
    info!(
        "Done creating {} with {} tiles in {} zoom levels",
        output,
        summary.tiles,
        summary.maxzoom as u16 + 1
    );
    Ok(())
}

#[cfg(feature = "with-gdal")]
extern crate mbtiler_gdal;

fn version_info() -> String {
    #[cfg(feature = "with-gdal")]
    let version = format!(
        "{} (GDAL version {})",
        crate_version!(),
        mbtiler_gdal::gdal_version()
    );
    #[cfg(not(feature = "with-gdal"))]
    let version = crate_version!().to_string();
    version
}

fn main() {
    dotenv().ok();
    let version_info = version_info();
    // The tileset version uses `-r, --version`
    let mut app = App::new("mbtiler")
        .version(&version_info as &str)
        .setting(AppSettings::DisableVersion)
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("Convert a georeferenced raster image into an MBTiles tile pyramid")
        .arg(
            Arg::from_usage("[INPUT] 'Input raster file'").required_unless("genconfig"),
        )
        .arg(
            Arg::from_usage("[OUTPUT] 'Output MBTiles file'").required_unless("genconfig"),
        )
        .args_from_usage("-n, --name=[NAME] 'Tileset name (Default: input file name)'
                          -d, --description=[TEXT] 'Tileset description'
                          -v, --verbose 'Verbose output'
                          -r, --version=[VERSION] 'Tileset version (Default: 1.0)'
                          -o, --overlay 'Publish as overlay layer instead of baselayer'
                          -c, --config=[FILE] 'Load from custom config file'
                          --genconfig 'Print configuration template'
                          --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                          --progress=[true|false] 'Show progress bar'
                          --format=[png|jpg] 'Tile image format (Default: png)'
                          --tilesize=[PX] 'Tile width and height in pixels (Default: 256)'");

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => e.exit(),
        Result::Ok(matches) => {
            init_logger(&matches);
            let result = if matches.is_present("genconfig") {
                gen_config(&matches).map(|config| println!("{}", config))
            } else {
                generate(&matches)
            };
            if let Err(e) = result {
                error!("{}", e);
                process::exit(1);
            }
        }
    }
}
