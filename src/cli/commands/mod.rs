use crate::github::{search::DEFAULT_LOCATION, DEFAULT_API_URL};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("ghfetch")
        .about("Fetch GitHub users, profiles and repositories into CSV")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .help("GitHub API token, sent as a bearer token")
                .env("GITHUB_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("GitHub API base URL")
                .default_value(DEFAULT_API_URL)
                .env("GHFETCH_API_URL"),
        )
        .arg(
            Arg::new("location")
                .short('l')
                .long("location")
                .help("Search users by location")
                .default_value(DEFAULT_LOCATION)
                .env("GHFETCH_LOCATION"),
        )
        .arg(
            Arg::new("min-followers")
                .short('f')
                .long("min-followers")
                .help("Only users with more followers than this")
                .default_value("200")
                .env("GHFETCH_MIN_FOLLOWERS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("per-page")
                .long("per-page")
                .help("Search page size (1-100)")
                .default_value("100")
                .env("GHFETCH_PER_PAGE")
                .value_parser(clap::value_parser!(u32).range(1..=100)),
        )
        .arg(
            Arg::new("concurrency")
                .short('c')
                .long("concurrency")
                .help("Maximum concurrent profile/repository fetches, 0 for unbounded")
                .default_value("0")
                .env("GHFETCH_CONCURRENCY")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Per-request timeout in seconds")
                .default_value("10")
                .env("GHFETCH_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .help("Directory for users.csv and repositories.csv")
                .default_value(".")
                .env("GHFETCH_OUTPUT_DIR"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("GHFETCH_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
