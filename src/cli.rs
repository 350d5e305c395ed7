use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sl_core::config::Config;

#[derive(Parser)]
#[command(name = "seedlink")]
#[command(author, version, about = "Export URL synthesis for torrent-backed media resources")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve export URLs for one item of a resource and print them as JSON
    Export {
        /// Resource identifier
        #[arg(long)]
        resource: String,

        /// Resource display name, used for directory archives
        #[arg(long)]
        resource_name: Option<String>,

        /// Item path inside the resource
        #[arg(long, default_value = "")]
        path: String,

        /// Item kind (file or directory)
        #[arg(long, default_value = "file")]
        kind: String,

        /// Media classifier (video, audio, image); empty for none
        #[arg(long, default_value = "")]
        media_format: String,

        /// Comma-separated export types (default: all)
        #[arg(long)]
        types: Option<String>,

        /// Caller role (free or premium)
        #[arg(long)]
        role: Option<String>,

        /// Inbound request host, used when no export domain is configured
        #[arg(long)]
        host: Option<String>,

        /// Caller query parameter as key=value; repeatable
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Verify a signed token and print its claims
    VerifyToken {
        /// Token to verify
        token: String,

        /// Verify with the proxy credentials instead of the general ones
        #[arg(long)]
        proxy: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config if not specified)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Generate a random signing secret
    GenerateSecret,
}

/// Per-field configuration overrides. Each flag also reads the environment
/// variable deployments already set.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Default export domain
    #[arg(long, global = true, env = "EXPORT_DOMAIN")]
    pub domain: Option<String>,

    /// Export domain for premium callers
    #[arg(long, global = true, env = "EXPORT_PREMIUM_DOMAIN")]
    pub premium_domain: Option<String>,

    /// General signing key
    #[arg(long, global = true, env = "EXPORT_API_KEY")]
    pub api_key: Option<String>,

    /// General signing secret
    #[arg(long, global = true, env = "EXPORT_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Role embedded in general tokens when the caller has none
    #[arg(long, global = true, env = "EXPORT_API_ROLE")]
    pub api_role: Option<String>,

    /// Route through per-resource shard subdomains
    #[arg(
        long,
        global = true,
        env = "EXPORT_USE_SUBDOMAINS",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub use_subdomains: Option<bool>,

    /// Backend pool name used in shard subdomains
    #[arg(long, global = true, env = "EXPORT_K8S_POOL")]
    pub pool: Option<String>,

    /// Number of shards in the backend pool
    #[arg(long, global = true)]
    pub shard_count: Option<u32>,

    /// Path prefix prepended to every export path
    #[arg(long, global = true, env = "EXPORT_PATH_PREFIX")]
    pub path_prefix: Option<String>,

    /// Proxy signing key
    #[arg(long, global = true, env = "EXPORT_PROXY_API_KEY")]
    pub proxy_api_key: Option<String>,

    /// Proxy signing secret
    #[arg(long, global = true, env = "EXPORT_PROXY_API_SECRET", hide_env_values = true)]
    pub proxy_api_secret: Option<String>,

    /// Proxy token TTL in seconds
    #[arg(long, global = true, env = "EXPORT_PROXY_TOKEN_TTL")]
    pub proxy_token_ttl: Option<u64>,

    /// Subtitle backend host
    #[arg(long, global = true, env = "VIDEO_INFO_SERVICE_HOST")]
    pub subtitles_host: Option<String>,

    /// Subtitle backend port
    #[arg(long, global = true, env = "VIDEO_INFO_SERVICE_PORT")]
    pub subtitles_port: Option<u16>,
}

impl ConfigOverrides {
    /// Apply every set override on top of `config`.
    pub fn apply(self, config: &mut Config) {
        let export = &mut config.export;
        set(&mut export.domain, self.domain);
        set(&mut export.premium_domain, self.premium_domain);
        set(&mut export.use_subdomains, self.use_subdomains);
        set(&mut export.pool, self.pool);
        set(&mut export.shard_count, self.shard_count);
        set(&mut export.path_prefix, self.path_prefix);

        let signing = &mut config.signing;
        set(&mut signing.api_key, self.api_key);
        set(&mut signing.api_secret, self.api_secret);
        set(&mut signing.api_role, self.api_role);

        let proxy = &mut config.proxy_signing;
        set(&mut proxy.api_key, self.proxy_api_key);
        set(&mut proxy.api_secret, self.proxy_api_secret);
        set(&mut proxy.token_ttl_secs, self.proxy_token_ttl);

        set(&mut config.subtitles.host, self.subtitles_host);
        set(&mut config.subtitles.port, self.subtitles_port);
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
