//! CLI harness for the wind-optimised loop planner.
//!
//! One subcommand, `plan`, wired the same way every subcommand in the
//! teacher's `main.rs` is: parse args with `clap`'s v2 builder API, load
//! JSON/YAML inputs eagerly, run the core operation, serialise the result
//! immediately with `serde_json::to_writer`.

use clap::{crate_version, App, Arg, SubCommand};

use windloop::config::Config;
use windloop::loader::StaticNetworkLoader;
use windloop::types::{Coordinate, WindVector};

fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));

    let matches = App::new("Wind Loop Planner")
        .version(crate_version!())
        .about("Plan a wind-optimised closed-loop cycling route over a signed junction network")
        .subcommand(
            SubCommand::with_name("plan")
                .about("Plan a loop starting near a given coordinate")
                .arg(Arg::with_name("road-graph").takes_value(true).required(true).index(1).help("Road network JSON"))
                .arg(Arg::with_name("lat").takes_value(true).required(true).index(2).help("Start latitude"))
                .arg(Arg::with_name("lon").takes_value(true).required(true).index(3).help("Start longitude"))
                .arg(Arg::with_name("target-m").takes_value(true).required(true).index(4).help("Target loop distance, metres"))
                .arg(Arg::with_name("wind-speed").takes_value(true).required(true).index(5).help("Wind speed, m/s"))
                .arg(Arg::with_name("wind-bearing").takes_value(true).required(true).index(6).help("Wind bearing (direction it blows from), degrees"))
                .arg(Arg::with_name("output").takes_value(true).required(true).index(7).help("Output JSON"))
                .arg(
                    Arg::with_name("config")
                        .short("c")
                        .long("config")
                        .takes_value(true)
                        .help("Optional YAML config overriding the tunable defaults"),
                )
                .arg(
                    Arg::with_name("tolerance")
                        .short("t")
                        .long("tolerance")
                        .takes_value(true)
                        .default_value("0.15")
                        .help("Distance tolerance fraction"),
                )
                .arg(
                    Arg::with_name("time-budget")
                        .short("b")
                        .long("time-budget")
                        .takes_value(true)
                        .default_value("30")
                        .help("Soft wall-clock budget for enumeration, seconds"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("plan") {
        log::trace!("tracing enabled");
        let loader = StaticNetworkLoader::from_reader(std::fs::File::open(matches.value_of("road-graph").unwrap())?)
            .expect("road graph invalid JSON");
        let cfg: Config = match matches.value_of("config") {
            Some(path) => serde_yaml::from_reader(std::fs::File::open(path)?).expect("config invalid YAML"),
            None => Config::default(),
        };
        log::info!("loaded configuration");

        let start = Coordinate::new(
            matches.value_of("lat").unwrap().parse().expect("lat must be a number"),
            matches.value_of("lon").unwrap().parse().expect("lon must be a number"),
        );
        let target_m: f64 = matches.value_of("target-m").unwrap().parse().expect("target-m must be a number");
        let wind = WindVector {
            speed: matches.value_of("wind-speed").unwrap().parse().expect("wind-speed must be a number"),
            bearing: matches.value_of("wind-bearing").unwrap().parse().expect("wind-bearing must be a number"),
        };
        let tolerance: f64 = matches.value_of("tolerance").unwrap().parse().expect("tolerance must be a number");
        let time_budget: f64 = matches.value_of("time-budget").unwrap().parse().expect("time-budget must be a number");

        match windloop::plan_loop(&loader, start, target_m, wind, tolerance, time_budget, &cfg) {
            Ok(plan) => {
                log::info!("loop found: {:.0} m, {} junctions", plan.actual_length_m, plan.junction_labels.len());
                serde_json::to_writer(std::fs::File::create(matches.value_of("output").unwrap())?, &plan).unwrap();
            }
            Err(e) => {
                log::warn!("planning failed: {e}");
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
