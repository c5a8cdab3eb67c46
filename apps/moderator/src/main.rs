use moderator::{bootstrap, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,moderator=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let client = bootstrap::http_client(&config)?;
    let tokens = bootstrap::token_provider(&config, client.clone());

    // No hosting call can succeed without a credential, so fail before touching any comment.
    if let Err(err) = tokens.access_token().await {
        tracing::error!("YouTube authentication failed: {}", err);
        return Err(err.into());
    }

    let driver = bootstrap::build_driver(&config, client, tokens)?;
    tracing::info!(
        channel_id = %config.channel_id,
        removal_mode = %config.removal_mode,
        ledger = %config.ledger_path,
        "Starting moderation run"
    );

    let summary = driver.run(&config.channel_id).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.deletions_failed > 0 {
        tracing::warn!(
            "{} rejected comments could not be removed and remain visible: {}",
            summary.deletions_failed,
            summary.failed_deletions.join(", ")
        );
    }
    Ok(())
}
