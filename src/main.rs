use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};

use levelcheck::commands;

fn sample_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("key")
                .help("Counter key, unique per host, service and counter")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("value")
                .help("Current counter value")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .index(2),
        )
        .arg(
            Arg::new("timestamp")
                .short('t')
                .long("timestamp")
                .value_name("SECONDS")
                .help("Sample time in seconds since the epoch (defaults to now)")
                .value_parser(value_parser!(f64)),
        )
}

fn build_cli() -> Command {
    Command::new("levelcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Evaluate monitoring values against levels and track counter rates")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .subcommand(
            Command::new("check")
                .about("Check a value against warn/crit levels (exit code is the state)")
                .arg(
                    Arg::new("value")
                        .help("Measured value")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .index(1),
                )
                .arg(
                    Arg::new("metric")
                        .short('m')
                        .long("metric")
                        .value_name("NAME")
                        .help("Metric name for perfdata (omit to suppress perfdata)"),
                )
                .arg(
                    Arg::new("levels")
                        .short('l')
                        .long("levels")
                        .value_name("WARN,CRIT[,WARN_LOW,CRIT_LOW]")
                        .help("Static levels; leave a slot empty to unset it"),
                )
                .arg(
                    Arg::new("levels-json")
                        .long("levels-json")
                        .value_name("JSON")
                        .help("Levels as JSON: null, [w,c], [w,c,wl,cl] or predictive parameters"),
                )
                .arg(
                    Arg::new("unit")
                        .short('u')
                        .long("unit")
                        .value_name("UNIT")
                        .help("Unit appended to rendered numbers"),
                )
                .arg(
                    Arg::new("factor")
                        .long("factor")
                        .value_parser(value_parser!(f64))
                        .help("Multiply the levels by this factor"),
                )
                .arg(
                    Arg::new("scale")
                        .long("scale")
                        .value_parser(value_parser!(f64))
                        .help("Scale of the levels relative to the value"),
                )
                .arg(
                    Arg::new("label")
                        .long("label")
                        .value_name("TEXT")
                        .help("Prefix for the output text"),
                )
                .arg(
                    Arg::new("render")
                        .long("render")
                        .value_parser(["percent", "bytes", "filesize", "age", "timestamp", "nic-speed"])
                        .help("Human readable renderer for numbers"),
                )
                .arg(
                    Arg::new("min")
                        .long("min")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Lower boundary for perfdata"),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Upper boundary for perfdata"),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Host name used for predictive levels"),
                )
                .arg(
                    Arg::new("service")
                        .long("service")
                        .value_name("SERVICE")
                        .help("Service description used for predictive levels"),
                )
                .arg(
                    Arg::new("reference")
                        .long("reference")
                        .value_parser(value_parser!(f64))
                        .help("Predicted reference value for predictive levels"),
                )
                .arg(
                    Arg::new("stdev")
                        .long("stdev")
                        .value_parser(value_parser!(f64))
                        .help("Standard deviation of the predicted reference"),
                )
                .arg(
                    Arg::new("markers")
                        .long("markers")
                        .help("Append (!)/(!!) state markers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the result as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            sample_args(Command::new("rate").about("Per-second rate of a counter")).arg(
                Arg::new("no-wrap")
                    .long("no-wrap")
                    .help("Treat a decreasing counter as unusable instead of restarted")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            sample_args(Command::new("average").about("Exponential moving average of a value"))
                .arg(
                    Arg::new("backlog")
                        .short('b')
                        .long("backlog")
                        .value_name("MINUTES")
                        .help("Minutes after which old samples weigh one half")
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("store")
                .about("Inspect the value store (use 'levelcheck store --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List stored counters and averages"))
                .subcommand(
                    Command::new("clear")
                        .about("Remove stored items")
                        .arg(
                            Arg::new("prefix")
                                .help("Only remove keys starting with this prefix")
                                .index(1),
                        ),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Set configuration values (use 'levelcheck set --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("store").about("Set the value store file").arg(
                        Arg::new("path")
                            .help("Path to the value store file")
                            .required(true)
                            .index(1),
                    ),
                )
                .subcommand(
                    Command::new("markers")
                        .about("Enable or disable state markers by default")
                        .arg(
                            Arg::new("state")
                                .help("on or off")
                                .required(true)
                                .index(1),
                        ),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Get configuration values (use 'levelcheck get --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("store").about("Show the value store file"))
                .subcommand(Command::new("markers").about("Show whether state markers are on")),
        )
}

fn main() -> Result<()> {
    levelcheck::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("version", _)) => commands::version(),
        Some(("check", sub_matches)) => {
            let outcome = commands::check(sub_matches);
            if let Err(e) = &outcome {
                println!("UNKN - {:#}", e);
            }
            std::process::exit(commands::check::exit_code(&outcome));
        }
        Some(("rate", sub_matches)) => commands::rate::execute_rate(sub_matches),
        Some(("average", sub_matches)) => commands::rate::execute_average(sub_matches),
        Some(("store", sub_matches)) => commands::store::execute(sub_matches),
        Some(("set", sub_matches)) => commands::config::handle_set(sub_matches),
        Some(("get", sub_matches)) => commands::config::handle_get(sub_matches),
        _ => {
            println!("Use 'levelcheck --help' for more information.");
            Ok(())
        }
    }
}
