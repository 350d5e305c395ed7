mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigOverrides};

use sl_core::config::Config;
use sl_core::{ListItem, ListKind, MediaFormat, RequestParams, Resource, ResourceId, Role};
use sl_export::{ExportDispatcher, MediaTagBuilder};
use sl_sign::{Credentials, SystemClock, TokenVerifier};

/// Arguments of the `export` command.
struct ExportArgs {
    resource: String,
    resource_name: Option<String>,
    path: String,
    kind: String,
    media_format: String,
    types: Option<String>,
    role: Option<String>,
    host: Option<String>,
    params: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag.
    // Logs go to stderr so stdout stays machine-readable.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "seedlink=trace,sl_export=trace,sl_sign=debug,sl_core=debug".to_string()
        } else {
            "seedlink=info,sl_export=warn,sl_sign=warn,sl_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export {
            resource,
            resource_name,
            path,
            kind,
            media_format,
            types,
            role,
            host,
            params,
        } => {
            let config = load_runtime_config(cli.config.as_deref(), cli.overrides)?;
            let args = ExportArgs {
                resource,
                resource_name,
                path,
                kind,
                media_format,
                types,
                role,
                host,
                params,
            };
            export(&config, args)
        }
        Commands::VerifyToken { token, proxy } => {
            let config = load_runtime_config(cli.config.as_deref(), cli.overrides)?;
            verify_token(&config, &token, proxy)
        }
        Commands::Validate { path } => {
            let path = path.or(cli.config);
            validate_config(path.as_deref(), cli.overrides)
        }
        Commands::Version => {
            println!("seedlink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateSecret => {
            println!("{}", sl_sign::generate_secret());
            Ok(())
        }
    }
}

/// Load the config file (when given) and apply command-line and
/// environment overrides on top.
fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Config> {
    let mut config = match path {
        Some(p) => Config::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => Config::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// [`load_config`] for commands that act on the config; warnings go to the
/// log.
fn load_runtime_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Config> {
    let config = load_config(path, overrides)?;
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

fn export(config: &Config, args: ExportArgs) -> Result<()> {
    let mut resource = Resource::new(ResourceId::parse(&args.resource)?);
    if let Some(name) = args.resource_name {
        resource = resource.with_name(name);
    }

    let kind: ListKind = args.kind.parse()?;
    let item = match kind {
        ListKind::Directory => ListItem::directory(args.path),
        ListKind::File => ListItem::file(args.path, args.media_format.parse::<MediaFormat>()?),
    };

    let mut params = RequestParams::new();
    if let Some(role) = args.role {
        params = params.with_role(role.parse::<Role>()?);
    }
    if let Some(host) = args.host {
        params = params.with_host(host);
    }
    for pair in &args.params {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --param '{pair}': expected KEY=VALUE");
        };
        params = params.with_query(key, value);
    }

    let dispatcher = ExportDispatcher::from_config(config, Arc::new(MediaTagBuilder))?;
    let response = dispatcher.get_exports(&resource, &item, args.types.as_deref(), &params)?;

    tracing::info!(
        resource = %resource.id,
        path = %item.path,
        exports = response.len(),
        "Resolved exports"
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn verify_token(config: &Config, token: &str, proxy: bool) -> Result<()> {
    let (api_key, api_secret, section) = if proxy {
        (
            &config.proxy_signing.api_key,
            &config.proxy_signing.api_secret,
            "proxy_signing",
        )
    } else {
        (&config.signing.api_key, &config.signing.api_secret, "signing")
    };
    let Some(credentials) = Credentials::new(api_key.as_str(), api_secret.as_str()) else {
        bail!("{section} credentials are not configured");
    };

    let verifier = TokenVerifier::new(credentials, Arc::new(SystemClock));
    let claims = verifier.verify(token).context("token rejected")?;
    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}

fn validate_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {}", p.display()),
        None => println!("No config file specified, using defaults"),
    }
    let config = load_config(path, overrides)?;

    // Routing and signing settings that cannot produce any URL are fatal.
    ExportDispatcher::from_config(&config, Arc::new(MediaTagBuilder))?;

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("Configuration has {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }
    println!("  Domain: {}", display_or_none(&config.export.domain));
    println!("  Premium domain: {}", display_or_none(&config.export.premium_domain));
    println!(
        "  Sharding: {}",
        if config.export.use_subdomains {
            format!("{} x {}", config.export.pool, config.export.shard_count)
        } else {
            "disabled".to_string()
        }
    );
    println!("  Path prefix: {}", config.export.path_prefix);
    println!("  General signing: {}", enabled(config.signing.is_complete()));
    println!(
        "  Proxy signing: {}{}",
        enabled(config.proxy_signing.is_complete()),
        if config.proxy_signing.required { " (required)" } else { "" }
    );
    println!("  Subtitles: {}", enabled(config.subtitles.is_configured()));
    Ok(())
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}
