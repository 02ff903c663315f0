//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use custdelta::cli::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_cli_init_command() {
    let cli = Cli::try_parse_from(["custdelta", "init"]).unwrap();
    match cli.command {
        Commands::Init { force } => assert!(!force),
        _ => panic!("Expected Init command"),
    }
}

#[test]
fn test_cli_init_command_with_force() {
    let cli = Cli::try_parse_from(["custdelta", "init", "--force"]).unwrap();
    match cli.command {
        Commands::Init { force } => assert!(force),
        _ => panic!("Expected Init command"),
    }
}

#[test]
fn test_cli_run_defaults() {
    let cli = Cli::try_parse_from(["custdelta", "run"]).unwrap();
    match cli.command {
        Commands::Run { date, no_report, json } => {
            assert!(date.is_none());
            assert!(!no_report);
            assert!(!json);
        }
        _ => panic!("Expected Run command"),
    }
    assert!(cli.config.is_none());
    assert!(!cli.verbose);
    assert!(!cli.quiet);
}

#[test]
fn test_cli_run_with_options() {
    let cli = Cli::try_parse_from(["custdelta", "run", "--date", "20240315", "--json", "--no-report"]).unwrap();
    match cli.command {
        Commands::Run { date, no_report, json } => {
            assert_eq!(date.as_deref(), Some("20240315"));
            assert!(no_report);
            assert!(json);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_cli_run_rejects_bad_date() {
    assert!(Cli::try_parse_from(["custdelta", "run", "--date", "15-03-2024"]).is_err());
    assert!(Cli::try_parse_from(["custdelta", "run", "--date", "20240230"]).is_err());
}

#[test]
fn test_cli_diff_command() {
    let cli = Cli::try_parse_from(["custdelta", "diff", "old.txt", "new.txt"]).unwrap();
    match cli.command {
        Commands::Diff {
            previous,
            current,
            output_dir,
            date,
            json,
        } => {
            assert_eq!(previous, PathBuf::from("old.txt"));
            assert_eq!(current, PathBuf::from("new.txt"));
            assert!(output_dir.is_none());
            assert!(date.is_none());
            assert!(!json);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_diff_command_with_options() {
    let cli = Cli::try_parse_from([
        "custdelta",
        "diff",
        "old.txt",
        "new.txt",
        "--output-dir",
        "out",
        "--date",
        "20240101",
        "--json",
    ])
    .unwrap();
    match cli.command {
        Commands::Diff { output_dir, date, json, .. } => {
            assert_eq!(output_dir, Some(PathBuf::from("out")));
            assert_eq!(date.as_deref(), Some("20240101"));
            assert!(json);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_diff_requires_two_files() {
    assert!(Cli::try_parse_from(["custdelta", "diff", "old.txt"]).is_err());
}

#[test]
fn test_cli_report_command() {
    let cli = Cli::try_parse_from(["custdelta", "report", "DeltaFile_20240315.txt", "--output", "chart.svg"]).unwrap();
    match cli.command {
        Commands::Report { delta_file, output, date } => {
            assert_eq!(delta_file, PathBuf::from("DeltaFile_20240315.txt"));
            assert_eq!(output, Some(PathBuf::from("chart.svg")));
            assert!(date.is_none());
        }
        _ => panic!("Expected Report command"),
    }
}

#[test]
fn test_cli_list_command() {
    let cli = Cli::try_parse_from(["custdelta", "list"]).unwrap();
    match cli.command {
        Commands::List { format } => assert_eq!(format, "pretty"),
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_global_flags() {
    let cli = Cli::try_parse_from([
        "custdelta",
        "--config",
        "/etc/custdelta.json",
        "--data-dir",
        "/srv/data",
        "-v",
        "list",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/etc/custdelta.json")));
    assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/data")));
    assert!(cli.verbose);
}

#[test]
fn test_output_format_parse() {
    assert_eq!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty));
    assert_eq!(OutputFormat::parse("json"), Ok(OutputFormat::Json));
    assert!(OutputFormat::parse("yaml").is_err());
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(["custdelta", "snapshot"]).is_err());
}
