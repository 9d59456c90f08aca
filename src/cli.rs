//! # Command-Line Surface
//!
//! Argument parsing into a [`Config`]: plain `env::args()` scanning by
//! hand, no argument-parsing crate. Both `--flag=value` and `--flag
//! value` are accepted, by rewriting every `key=value` argv entry into
//! two entries before scanning.

use std::fs::File;
use std::io::{self, BufReader};

use crate::error::CliError;
use crate::io::EngineIo;
use crate::stats::StatFlag;

/// Human-facing runtime version string.
const VERSION: &str = "0.1.0";

fn usage() -> String {
    format!(
        r#"tac23 v{0}

Usage:
    tac23 [--source=PATH] [--input=PATH] [--stats=PATH STATS_FLAGS...]

At least one of --source/--input must be given; the other defaults to
standard input.

Options:
    --source=PATH
        Read the XML instruction stream from PATH instead of stdin.
    --input=PATH
        Read the interpreted program's input from PATH instead of stdin.
    --stats=PATH
        Write the requested statistics to PATH after the run.
    --insts --vars --hot --frequent --print=STR --eol
        Statistics to collect, in the order given; only meaningful with
        --stats.
    -h, --help
        Show this help message and exit."#,
        VERSION
    )
}

/// Parsed, validated command-line configuration.
pub struct Config {
    pub source_path: Option<String>,
    pub input_path: Option<String>,
    pub stats_path: Option<String>,
    pub stat_flags: Vec<StatFlag>,
    pub help: bool,
}

impl Config {
    /// Parse `argv` (excluding the program name). Splits `--flag=value`
    /// into two logical tokens first so `--flag value` and `--flag=value`
    /// reach the same branch below.
    pub fn parse(argv: &[String]) -> Result<Config, CliError> {
        let tokens = split_equals(argv);

        let mut source_path = None;
        let mut input_path = None;
        let mut stats_path = None;
        let mut stat_flags = Vec::new();
        let mut help = false;

        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i].as_str();
            match tok {
                "-h" | "--help" => {
                    help = true;
                    i += 1;
                }
                "--source" => {
                    source_path = Some(require_value(&tokens, &mut i, "--source")?);
                }
                "--input" => {
                    input_path = Some(require_value(&tokens, &mut i, "--input")?);
                }
                "--stats" => {
                    stats_path = Some(require_value(&tokens, &mut i, "--stats")?);
                }
                "--insts" => {
                    stat_flags.push(StatFlag::Insts);
                    i += 1;
                }
                "--vars" => {
                    stat_flags.push(StatFlag::Vars);
                    i += 1;
                }
                "--hot" => {
                    stat_flags.push(StatFlag::Hot);
                    i += 1;
                }
                "--frequent" => {
                    stat_flags.push(StatFlag::Frequent);
                    i += 1;
                }
                "--print" => {
                    let value = require_value(&tokens, &mut i, "--print")?;
                    stat_flags.push(StatFlag::Print(value));
                }
                "--eol" => {
                    stat_flags.push(StatFlag::Eol);
                    i += 1;
                }
                other => {
                    return Err(CliError::Usage(format!("unrecognized flag '{}'", other)));
                }
            }
        }

        if help {
            if source_path.is_some()
                || input_path.is_some()
                || stats_path.is_some()
                || !stat_flags.is_empty()
            {
                return Err(CliError::Usage("--help is exclusive with other flags".to_string()));
            }
            return Ok(Config {
                source_path: None,
                input_path: None,
                stats_path: None,
                stat_flags,
                help: true,
            });
        }

        if source_path.is_none() && input_path.is_none() {
            return Err(CliError::Usage(
                "at least one of --source/--input is required".to_string(),
            ));
        }

        Ok(Config { source_path, input_path, stats_path, stat_flags, help: false })
    }

    /// Print the usage text and return the CLI-usage exit status.
    pub fn print_usage() {
        println!("{}", usage());
    }

    /// Read the XML source text, from `--source` or stdin.
    pub fn read_source(&self) -> Result<String, CliError> {
        read_text(self.source_path.as_deref())
    }

    /// Build the three I/O streams this run needs: stdout, the
    /// program-input reader (`--input` or stdin), and stderr for
    /// diagnostics.
    pub fn open_io(&self) -> Result<EngineIo<'static>, CliError> {
        let input: Box<dyn io::BufRead> = match &self.input_path {
            Some(path) => Box::new(BufReader::new(open_file(path)?)),
            None => Box::new(BufReader::new(io::stdin())),
        };
        Ok(EngineIo::new(Box::new(io::stdout()), input, Box::new(io::stderr())))
    }
}

fn open_file(path: &str) -> Result<File, CliError> {
    File::open(path)
        .map_err(|e| CliError::InputUnavailable(format!("cannot open '{}': {}", path, e)))
}

fn read_text(path: Option<&str>) -> Result<String, CliError> {
    use io::Read;
    match path {
        Some(path) => {
            let mut file = open_file(path)?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .map_err(|e| CliError::InputUnavailable(format!("cannot read '{}': {}", path, e)))?;
            Ok(buf)
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::InputUnavailable(format!("cannot read stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

/// Rewrite every `--flag=value` token into two tokens (`--flag`, `value`)
/// so the scanner in [`Config::parse`] only has one shape to handle.
fn split_equals(argv: &[String]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(argv.len());
    for arg in argv {
        if let Some(stripped) = arg.strip_prefix("--") {
            if let Some(eq) = stripped.find('=') {
                tokens.push(format!("--{}", &stripped[..eq]));
                tokens.push(stripped[eq + 1..].to_string());
                continue;
            }
        }
        tokens.push(arg.clone());
    }
    tokens
}

fn require_value(tokens: &[String], i: &mut usize, flag: &str) -> Result<String, CliError> {
    let value = tokens
        .get(*i + 1)
        .ok_or_else(|| CliError::Usage(format!("{} requires a value", flag)))?
        .clone();
    *i += 2;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_key_equals_value_shape() {
        let argv = vec!["--source=prog.xml".to_string()];
        let config = Config::parse(&argv).unwrap();
        assert_eq!(config.source_path.as_deref(), Some("prog.xml"));
    }

    #[test]
    fn accepts_key_space_value_shape() {
        let argv = vec!["--source".to_string(), "prog.xml".to_string()];
        let config = Config::parse(&argv).unwrap();
        assert_eq!(config.source_path.as_deref(), Some("prog.xml"));
    }

    #[test]
    fn requires_source_or_input() {
        let argv: Vec<String> = vec![];
        assert!(matches!(Config::parse(&argv), Err(CliError::Usage(_))));
    }

    #[test]
    fn help_rejects_other_flags() {
        let argv = vec!["--help".to_string(), "--source=prog.xml".to_string()];
        assert!(matches!(Config::parse(&argv), Err(CliError::Usage(_))));
    }

    #[test]
    fn collects_stat_flags_in_order() {
        let argv = vec![
            "--source=prog.xml".to_string(),
            "--stats=out.txt".to_string(),
            "--insts".to_string(),
            "--eol".to_string(),
        ];
        let config = Config::parse(&argv).unwrap();
        assert_eq!(config.stat_flags, vec![StatFlag::Insts, StatFlag::Eol]);
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        let argv = vec!["--bogus".to_string()];
        assert!(matches!(Config::parse(&argv), Err(CliError::Usage(_))));
    }
}
