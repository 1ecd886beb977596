use super::*;

#[test]
fn parses_enrich_command() {
    let cli = Cli::try_parse_from(["icebreaker", "enrich", "Ada Lovelace"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Enrich {
            ref name,
            max_cycles: None,
            pretty: false
        } if name == "Ada Lovelace"
    ));
}

#[test]
fn parses_enrich_with_overrides() {
    let cli = Cli::try_parse_from([
        "icebreaker",
        "enrich",
        "Ada Lovelace",
        "--max-cycles",
        "8",
        "--pretty",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Enrich {
            max_cycles: Some(8),
            pretty: true,
            ..
        }
    ));
}

#[test]
fn parses_resolve_command() {
    let cli = Cli::try_parse_from(["icebreaker", "resolve", "Ada Lovelace"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Resolve { max_cycles: None, .. }
    ));
}

#[test]
fn max_cycles_above_ceiling_is_rejected() {
    let result = Cli::try_parse_from(["icebreaker", "enrich", "Ada", "--max-cycles", "16"]);
    assert!(result.is_err());
}

#[test]
fn max_cycles_zero_is_rejected() {
    let result = Cli::try_parse_from(["icebreaker", "resolve", "Ada", "--max-cycles", "0"]);
    assert!(result.is_err());
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["icebreaker"]).is_err());
}

#[test]
fn builds_enricher_from_config() {
    let config = icebreaker_core::AppConfig {
        log_level: "info".to_string(),
        user_agent: "icebreaker-test/0.1".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://127.0.0.1:9/v1".to_string(),
        openai_model: "gpt-3.5-turbo".to_string(),
        serp_api_key: "serp".to_string(),
        serp_base_url: "http://127.0.0.1:9".to_string(),
        proxycurl_api_key: "curl".to_string(),
        proxycurl_base_url: "http://127.0.0.1:9/proxycurl".to_string(),
        rapidapi_key: "rapid".to_string(),
        rapidapi_host: "twitter135.p.rapidapi.com".to_string(),
        twitter_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 5,
        call_timeout_secs: 10,
        max_retries: 0,
        retry_backoff_base_ms: 0,
        resolver_max_cycles: 5,
        activity_fetch_count: 5,
        schema_retry: true,
    };

    assert!(enrich::build_enricher(&config).is_ok());

    let broken = icebreaker_core::AppConfig {
        serp_base_url: "not a url".to_string(),
        ..config
    };
    assert!(enrich::build_enricher(&broken).is_err());
}
