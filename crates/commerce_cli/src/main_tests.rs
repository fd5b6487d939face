use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_call_command() {
    let cli = Cli::try_parse_from([
        "commerce",
        "call",
        "accumulate_loyalty_points",
        "--arg",
        "account_id=abc123",
        "-a",
        "points=10",
        "--json",
        r#"{"accumulate_points": {}}"#,
        "--idempotency-key",
        "auto",
        "--dry-run",
    ])
    .expect("Failed to parse arguments");

    match cli.command {
        Commands::Call(args) => {
            assert_eq!(args.operation, "accumulate_loyalty_points");
            assert_eq!(
                args.args,
                vec![
                    ("account_id".to_string(), "abc123".to_string()),
                    ("points".to_string(), "10".to_string()),
                ]
            );
            assert_eq!(args.json.as_deref(), Some(r#"{"accumulate_points": {}}"#));
            assert_eq!(args.idempotency_key.as_deref(), Some("auto"));
            assert!(args.dry_run);
            assert!(args.token.is_none());
        }
        _ => panic!("Expected call command"),
    }
}

#[test]
fn test_parse_call_rejects_malformed_arg() {
    let result = Cli::try_parse_from(["commerce", "call", "list_locations", "--arg", "oops"]);

    assert!(result.is_err());
}

#[test]
fn test_parse_call_files() {
    let cli = Cli::try_parse_from([
        "commerce",
        "call",
        "create_catalog_image",
        "--file",
        "image_file=./logo.png",
    ])
    .expect("Failed to parse arguments");

    match cli.command {
        Commands::Call(args) => assert_eq!(
            args.files,
            vec![("image_file".to_string(), "./logo.png".to_string())]
        ),
        _ => panic!("Expected call command"),
    }
}

#[test]
fn test_parse_list_command() {
    let cli = Cli::try_parse_from([
        "commerce",
        "list",
        "--service",
        "Loyalty",
        "--include-deprecated",
    ])
    .expect("Failed to parse arguments");

    match cli.command {
        Commands::List(args) => {
            assert_eq!(args.service.as_deref(), Some("Loyalty"));
            assert!(args.include_deprecated);
            assert_eq!(args.format, "pretty");
        }
        _ => panic!("Expected list command"),
    }
}

#[test]
fn test_parse_config_and_auth_commands() {
    let cli = Cli::try_parse_from(["commerce", "config", "show", "--path", "./c.toml"])
        .expect("Failed to parse arguments");
    assert!(matches!(
        cli.command,
        Commands::Config(ConfigCommands::Show { path: Some(_) })
    ));

    let cli = Cli::try_parse_from(["commerce", "auth", "set-token", "abc"])
        .expect("Failed to parse arguments");
    assert!(matches!(
        cli.command,
        Commands::Auth(AuthCommands::SetToken { token: Some(_) })
    ));

    let cli = Cli::try_parse_from(["commerce", "auth", "clear"]).expect("Failed to parse arguments");
    assert!(matches!(cli.command, Commands::Auth(AuthCommands::Clear)));
}

#[tokio::test]
async fn test_run_version() {
    assert!(run(&Commands::Version).await.is_ok());
}
