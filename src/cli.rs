// Command-line parsing for the `cad4tb-results` binary.

use crate::category::{AlgoType, ArtifactCategory};
use crate::error::UsageError;

pub const USAGE: &str =
    "usage: cad4tb-results [-h] [-V] --pid PID [--algotype {scores,normalized,heatmap}] [--pretty]";

pub const HELP: &str = "\
Print the CAD4TB results of every imaging series of a patient.

options:
  -h, --help            show this help message and exit
  -V, --version         print version and exit
  --pid PID             patient id to get details
  --algotype {scores,normalized,heatmap}
                        only fetch this kind of result (default: all three)
  --pretty              indent the JSON output

environment:
  BOX_IP                base URL of the results box, e.g. http://10.0.0.5
  TOKEN                 API token sent as `Authorization: Token <TOKEN>`
  BOX_TIMEOUT_SECS      per-request timeout in seconds (default: 30)
  RUST_LOG              log filter for stderr (default: warn)

BOX_IP and TOKEN may also come from a .env file.";

/// Arguments of a fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub pid: String,
    pub algotype: AlgoType,
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliArgs),
    Help,
    Version,
}

/// Parse arguments (without the program name). A bad option value fails
/// right away; otherwise `--help` and `--version` win over missing or
/// unrecognized arguments. A repeated option keeps its last value, and
/// long options may be shortened to any unique prefix.
pub fn parse_args<I, S>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut pid = None;
    let mut algotype = AlgoType::All;
    let mut pretty = false;
    let mut help = false;
    let mut version = false;
    let mut unrecognized = Vec::new();

    let mut args = args.into_iter().map(Into::<String>::into);
    while let Some(arg) = args.next() {
        // Support both `--flag value` and `--flag=value`.
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        match expand_long(&flag)? {
            "-h" | "--help" => help = true,
            "-V" | "--version" => version = true,
            "--pretty" if inline.is_none() => pretty = true,
            "--pid" => pid = Some(take_value("--pid", inline, &mut args)?),
            "--algotype" => {
                let value = take_value("--algotype", inline, &mut args)?;
                algotype = value.parse::<ArtifactCategory>()?.into();
            }
            _ => unrecognized.push(arg),
        }
    }

    if help {
        return Ok(Command::Help);
    }
    if version {
        return Ok(Command::Version);
    }
    if !unrecognized.is_empty() {
        return Err(UsageError::Unrecognized(unrecognized.join(" ")));
    }
    let pid = pid.ok_or(UsageError::MissingRequired("--pid"))?;

    Ok(Command::Run(CliArgs {
        pid,
        algotype,
        pretty,
    }))
}

const LONG_OPTIONS: [&str; 5] = ["--help", "--version", "--pid", "--algotype", "--pretty"];

/// Expand a unique prefix of a long option (`--algo` -> `--algotype`).
/// Anything else comes back unchanged.
fn expand_long(flag: &str) -> Result<&str, UsageError> {
    if !flag.starts_with("--") || flag.len() <= 2 || LONG_OPTIONS.iter().any(|o| *o == flag) {
        return Ok(flag);
    }
    let matches: Vec<&'static str> = LONG_OPTIONS
        .into_iter()
        .filter(|option| option.starts_with(flag))
        .collect();
    match matches.as_slice() {
        [] => Ok(flag),
        [only] => Ok(*only),
        _ => Err(UsageError::Ambiguous {
            flag: flag.to_string(),
            candidates: matches.join(", "),
        }),
    }
}

/// `-5`, `-0.5`: values, not options.
fn is_negative_number(value: &str) -> bool {
    value
        .strip_prefix('-')
        .is_some_and(|rest| rest.parse::<f64>().is_ok() && rest.chars().all(|c| c.is_ascii_digit() || c == '.'))
}

fn take_value(
    flag: &'static str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> Result<String, UsageError> {
    match inline {
        Some(value) => Ok(value),
        None => match rest.next() {
            Some(value) if !value.starts_with('-') || value == "-" || is_negative_number(&value) => Ok(value),
            _ => Err(UsageError::MissingValue(flag)),
        },
    }
}
