mod config;

use config::VertConfig;

use anyhow::Result;
use clap::Parser;
use console::style;
use std::io::Write;
use std::process::ExitCode;
use vert_semver::{Classification, ClassifyError, Comparison};

/// The command was not called correctly
const USAGE_ERROR: u8 = 128;

/// The base constraint could not be parsed, nothing was compared
const CONSTRAINT_ERROR: u8 = 255;

/// Failure counts above this are reported as this value
const MAX_FAILURE_CODE: usize = 127;

const LONG_ABOUT: &str = "Version tester. Compare versions.

Vert compares two version strings, or tests version strings against a version
range, and prints the versions that passed.

    $ vert \">1.0.0\" 1.1.0 1.1.1 1.2.3 0.1.1
    1.1.0
    1.1.1
    1.2.3

With --git, versions are read as `git describe --tags` output. The commit count
and hash become build metadata, not a pre-release:

    $ vert -g \">1\" v1.10.0-123-g0239788
    1.10.0+123.g0239788

Defaults for --sort, --failed and --git can be set in a vert.toml file found in
the working directory or any of its parents:

    [output]
    sort = true
    failed = false

    [input]
    git = false";

const EXIT_CODES: &str = "Exit codes:
  0-127  Number of versions that failed (127 means 127 or more)
  128    The command was not called correctly
  255    The base version or range could not be parsed

Base formats: 1.2.3, v1.2.3, 1.2.3-alpha.1+10212015, *, !=1.0.0, >=1.2.3,
>1.2.3,<1.3.2, ~1.2.0, ^2.3, 1.2.x, 1.0.0 - 2.0.0, ^1.0 || ^2.0";

#[derive(Parser, Debug)]
#[command(name = "vert")]
#[command(version)]
#[command(about = "Version tester. Compare versions.", long_about = LONG_ABOUT)]
#[command(after_help = EXIT_CODES)]
struct Args {
    /// Show the versions that failed rather than the ones that passed
    #[arg(short, long)]
    failed: bool,

    /// Sort the versions before printing instead of keeping the order they were tested in
    #[arg(short, long)]
    sort: bool,

    /// Read versions as `git describe --tags` output and convert them
    #[arg(short, long)]
    git: bool,

    /// Version or version range to test against
    #[arg(value_name = "BASE")]
    base: String,

    /// Versions to test
    #[arg(value_name = "VERSION", required = true)]
    versions: Vec<String>,
}

/// Flags merged with the configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Options {
    failed: bool,
    sort: bool,
    git: bool,
}

impl Options {
    /// A flag given on the command line always wins, the config only fills in defaults
    fn resolve(args: &Args, config: Option<&VertConfig>) -> Self {
        Options {
            failed: args.failed || config.and_then(|c| c.output.failed).unwrap_or(false),
            sort: args.sort || config.and_then(|c| c.output.sort).unwrap_or(false),
            git: args.git || config.and_then(|c| c.input.git).unwrap_or(false),
        }
    }
}

fn exit_code(failures: usize) -> u8 {
    failures.min(MAX_FAILURE_CODE) as u8
}

/// `--help` and `--version` also arrive as parse errors, but succeed
fn parse_error_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        USAGE_ERROR
    } else {
        0
    }
}

fn print_versions(out: &mut dyn Write, result: &Classification, options: Options) -> Result<()> {
    let lines: Vec<String> = if options.failed {
        let failed = if options.sort {
            result.sorted_failed()
        } else {
            result.failed.clone()
        };
        failed.iter().map(ToString::to_string).collect()
    } else {
        let passed = if options.sort {
            result.sorted_passed()
        } else {
            result.passed.clone()
        };
        passed.iter().map(ToString::to_string).collect()
    };

    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Compare the versions and print the selected bucket, returning the exit code
fn run(args: &Args, config: Option<&VertConfig>, out: &mut dyn Write) -> Result<u8> {
    let options = Options::resolve(args, config);
    log::debug!("Running with {:?}", options);

    let comparison = match Comparison::new(&args.base, options.git) {
        Ok(comparison) => comparison,
        Err(ClassifyError::Constraint { base, source }) => {
            eprintln!(
                "{} Could not parse constraint {}: {}",
                style("Error:").red().bold(),
                style(&base).yellow(),
                source
            );
            return Ok(CONSTRAINT_ERROR);
        }
    };

    let result = comparison.classify(&args.versions[..]);
    print_versions(out, &result, options)?;

    Ok(exit_code(result.failure_count()))
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Exiting right after, a failed write has nowhere to go
            e.print().ok();
            return ExitCode::from(parse_error_code(&e));
        }
    };

    let result = VertConfig::load_from_cwd()
        .and_then(|config| run(&args, config.as_ref(), &mut std::io::stdout().lock()));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::from(USAGE_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("vert").chain(argv.iter().copied())).unwrap()
    }

    fn run_with(argv: &[&str], config: Option<&VertConfig>) -> (String, u8) {
        let mut out = Vec::new();
        let code = run(&args(argv), config, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), code)
    }

    #[test]
    fn test_run() {
        let cases: &[(&[&str], &str, u8)] = &[
            // Base case
            (&["v1.0.0", "1.0.0"], "1.0.0\n", 0),
            // One failure, four passes, sorted
            (&["-s", ">=1.0.0", "1.0.0", "1.1.1", "1.2.3", "1.0.1", "0.9.0"], "1.0.0\n1.0.1\n1.1.1\n1.2.3\n", 1),
            // One failure, four passes, unsorted
            (&[">=1.0.0", "1.0.0", "1.1.1", "1.2.3", "1.0.1", "0.9.0"], "1.0.0\n1.1.1\n1.2.3\n1.0.1\n", 1),
            // One failure, print failures
            (&["-f", "-s", ">=1.0.0", "1.0.0", "1.1.1", "1.2.3", "1.0.1", "0.9.0"], "0.9.0\n", 1),
            // Two failures, sorted
            (&["--failed", "--sort", ">=1.0.0", "0.1", "v0.9.0"], "0.1.0\n0.9.0\n", 2),
            // Convert git tag
            (&["-g", ">1", "v1.10.0-123-g0239788"], "1.10.0+123.g0239788\n", 0),
            // Nothing matched
            (&["<1.0.0", "1.1.0"], "", 1),
            (&["-f", "<1.0.0", "1.1.0"], "1.1.0\n", 1),
            (&["1.2.3", "1.2.3", "1.2.4", "1.2.5"], "1.2.3\n", 2),
        ];

        for (argv, expected_out, expected_code) in cases {
            let (out, code) = run_with(argv, None);
            assert_eq!(out, *expected_out, "output of {:?}", argv);
            assert_eq!(code, *expected_code, "exit code of {:?}", argv);
        }
    }

    #[test]
    fn test_run_unparsable_candidates() {
        let (out, code) = run_with(&["-f", "-s", "^1", "zzz", "2.0.0", "1.5.0", "0.1.0", "not.a.version"], None);
        assert_eq!(out, "0.1.0\n2.0.0\nzzz\nnot.a.version\n");
        assert_eq!(code, 4);

        let (out, code) = run_with(&["-g", ">1", "fatal: No names found, cannot describe anything."], None);
        assert_eq!(out, "");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_constraint_error() {
        let (out, code) = run_with(&["not-a-version", "1.0.0", "2.0.0"], None);
        assert_eq!(out, "");
        assert_eq!(code, CONSTRAINT_ERROR);

        let (_, code) = run_with(&["<>1.0.0", "1.0.0"], None);
        assert_eq!(code, CONSTRAINT_ERROR);
    }

    #[test]
    fn test_failure_count_is_clamped() {
        let versions: Vec<String> = (0..200).map(|i| format!("0.{}.0", i)).collect();
        let mut argv = vec![">=1.0.0"];
        argv.extend(versions.iter().map(String::as_str));

        let (_, code) = run_with(&argv, None);
        assert_eq!(code, 127);
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(127), 127);
        assert_eq!(exit_code(128), 127);
    }

    #[test]
    fn test_config_supplies_defaults() {
        let config: VertConfig = toml::from_str("[output]\nsort = true\nfailed = true\n").unwrap();
        let (out, code) = run_with(&[">=1.0.0", "1.0.0", "0.9.0", "0.1"], Some(&config));
        assert_eq!(out, "0.1.0\n0.9.0\n");
        assert_eq!(code, 2);

        let config: VertConfig = toml::from_str("[input]\ngit = true\n").unwrap();
        let (out, _) = run_with(&[">1", "v1.10.0-123-g0239788"], Some(&config));
        assert_eq!(out, "1.10.0+123.g0239788\n");
    }

    #[test]
    fn test_flags_override_config() {
        let config: VertConfig = toml::from_str("[output]\nsort = false\nfailed = false\n").unwrap();
        let options = Options::resolve(&args(&["-s", "-f", "1", "1"]), Some(&config));
        assert_eq!(
            options,
            Options {
                failed: true,
                sort: true,
                git: false
            }
        );

        let options = Options::resolve(&args(&["1", "1"]), None);
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_usage_errors() {
        let err = Args::try_parse_from(["vert", ">=1.0.0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());

        let err = Args::try_parse_from(["vert"]).unwrap_err();
        assert!(err.use_stderr());

        let err = Args::try_parse_from(["vert", "--bogus", "1", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = Args::try_parse_from(["vert", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_parse_error_code() {
        let err = Args::try_parse_from(["vert", ">=1.0.0"]).unwrap_err();
        assert_eq!(parse_error_code(&err), USAGE_ERROR);

        let err = Args::try_parse_from(["vert", "--help"]).unwrap_err();
        assert_eq!(parse_error_code(&err), 0);

        let err = Args::try_parse_from(["vert", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(parse_error_code(&err), 0);
    }
}
