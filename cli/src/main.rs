use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use nation_core::{ClientConfig, Exercise, NationClient, StdoutReporter};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Run the people create/update/delete exercise against a nation
#[derive(Parser)]
#[command(name = "nation-exercise")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Nation slug, e.g. `acme` for acme.nationbuilder.com
    slug: String,
    /// API access token
    token: String,
    /// API version path segment
    #[arg(long, default_value = "v1")]
    api_version: String,
    /// Send requests to this origin instead of the nation's subdomain
    #[arg(long, env = "NATION_ORIGIN")]
    origin: Option<String>,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Logging level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
}

/// Parse the command line. On a usage error the usage line is written to
/// `out` and the exit status is returned; help and version exit directly.
fn parse_args<I, T>(args: I, out: &mut impl Write) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) if !err.use_stderr() => err.exit(),
        Err(_) => {
            let _ = writeln!(out, "{}", Cli::command().render_usage());
            Err(1)
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args_os(), &mut std::io::stdout()) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::new(args.slug, args.token)
        .with_api_version(args.api_version)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(origin) = args.origin {
        config = config.with_origin(origin);
    }

    let client = NationClient::new(config);
    match Exercise::new(&client, StdoutReporter).run() {
        Ok(report) => {
            tracing::debug!(?report, "exercise finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
