//! CLI command implementations.

use crate::ConnectionArgs;
use anyhow::{bail, Context, Result};
use hubsync_client::{ClientConfig, CredentialStore, Credentials, HubClient};
use hubsync_connector::{ConnectorConfig, HubConnector, SyncDriver};
use secrecy::SecretString;
use std::path::Path;

/// Build the connector configuration from command-line arguments.
///
/// Without a password, token or explicit credentials file, the session saved
/// by `hubsync login` is used.
pub fn connector_config(args: &ConnectionArgs) -> Result<ConnectorConfig> {
    let has_secret = args.password.is_some() || args.access_token.is_some();
    let credentials_file = match &args.credentials_file {
        Some(path) => Some(path.clone()),
        None if !has_secret => Some(CredentialStore::default_location()?.path().to_path_buf()),
        None => None,
    };

    let config = ConnectorConfig {
        username: args.username.clone().unwrap_or_default(),
        password: args.password.clone().map(SecretString::new),
        access_token: args.access_token.clone().map(SecretString::new),
        credentials_file,
        orgs: args.orgs.clone(),
        base_url: args.base_url.clone(),
        page_size: args.page_size,
    };
    config.validate()?;
    Ok(config)
}

async fn connect(args: &ConnectionArgs) -> Result<HubConnector> {
    let config = connector_config(args)?;
    HubConnector::new(config)
        .await
        .context("failed to connect to Docker Hub")
}

/// Check that the configured credentials work.
pub async fn validate(args: &ConnectionArgs) -> Result<()> {
    let connector = connect(args).await?;
    println!("Credentials are valid for {}", connector.client().host());
    Ok(())
}

/// Print connector metadata.
pub async fn metadata(args: &ConnectionArgs) -> Result<()> {
    let connector = connect(args).await?;
    println!("{}", serde_json::to_string_pretty(&connector.metadata())?);
    Ok(())
}

/// Run a full sync and write the snapshot as JSON.
pub async fn sync(args: &ConnectionArgs, output: Option<&Path>) -> Result<()> {
    let connector = connect(args).await?;

    tracing::info!(orgs = ?args.orgs, "Starting sync");
    let snapshot = SyncDriver::new(connector.resource_syncers())
        .run()
        .await
        .context("sync failed")?;

    let json = serde_json::to_string_pretty(&snapshot)?;
    write_output(&json, output)?;

    if let Some(path) = output {
        eprintln!(
            "Synced {} resources, {} entitlements, {} grants to {}",
            snapshot.resources.len(),
            snapshot.entitlements.len(),
            snapshot.grants.len(),
            path.display()
        );
    }
    Ok(())
}

/// Log in and save the session for later runs.
pub async fn login(args: &ConnectionArgs) -> Result<()> {
    let Some(username) = args.username.as_deref() else {
        bail!("username is required (--username or HUBSYNC_USERNAME)");
    };
    let secret = match (&args.password, &args.access_token) {
        (Some(_), Some(_)) => bail!("password and access token are mutually exclusive"),
        (Some(secret), None) | (None, Some(secret)) => secret.clone(),
        (None, None) => bail!("a password or access token is required to log in"),
    };

    let config = ClientConfig::default().with_base_url(&args.base_url);
    let client = HubClient::login(&config, &Credentials::new(username, secret))
        .await
        .context("login failed")?;

    let store = match &args.credentials_file {
        Some(path) => CredentialStore::new(path),
        None => CredentialStore::default_location()?,
    };
    store.save(client.host(), client.session())?;

    println!(
        "Saved session for {} to {}",
        client.host(),
        store.path().display()
    );
    Ok(())
}

fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}
