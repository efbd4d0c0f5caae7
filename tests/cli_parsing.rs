use agent_bench::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_run_with_only() {
    let cli = Cli::try_parse_from(vec!["agent-bench", "run", "--only", "bond_yield,vix"]).unwrap();

    match cli.command {
        Some(Commands::Run(args)) => assert_eq!(args.only, vec!["bond_yield", "vix"]),
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
}

#[test]
fn test_parse_history_default_limit() {
    let cli = Cli::try_parse_from(vec!["agent-bench", "history"]).unwrap();

    match cli.command {
        Some(Commands::History(args)) => assert_eq!(args.limit, 10),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_agents_json() {
    let cli = Cli::try_parse_from(vec!["agent-bench", "--json", "agents", "--rubrics"]).unwrap();

    assert!(cli.json);
    match cli.command {
        Some(Commands::Agents(args)) => assert!(args.rubrics),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_config_flag() {
    let cli =
        Cli::try_parse_from(vec!["agent-bench", "-c", "/etc/bench.yaml", "run", "-v"]).unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("/etc/bench.yaml")));
    assert!(cli.verbose);
}

#[test]
fn test_parse_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(vec!["agent-bench", "serve"]).is_err());
}

#[test]
fn test_parse_rejects_non_numeric_limit() {
    assert!(Cli::try_parse_from(vec!["agent-bench", "history", "--limit", "lots"]).is_err());
}
