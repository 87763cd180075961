//! Server configuration from command-line arguments and the environment.

use std::net::SocketAddr;

use clap::Parser;
use libris_core::logging_facility::Profile;
use libris_core::{ApiVersion, SelectorOptions, VersionMatching, VersionSource};

#[derive(Debug, Clone, Parser)]
#[command(name = "libris-api")]
#[command(about = "Libris - media-type driven library API", long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LIBRIS_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Version used when a request names none
    #[arg(long, env = "LIBRIS_DEFAULT_VERSION", default_value = "1.0")]
    pub default_version: ApiVersion,

    /// `floor` or `exact`
    #[arg(long, env = "LIBRIS_VERSION_MATCHING", default_value = "floor")]
    pub version_matching: VersionMatching,

    /// `path`, `header:<name>` or `query:<name>`
    #[arg(long, env = "LIBRIS_VERSION_SOURCE", default_value = "path")]
    pub version_source: VersionSource,

    /// `dev` or `prod`
    #[arg(long, env = "LIBRIS_LOG_PROFILE", default_value = "dev")]
    pub log_profile: Profile,

    /// Start with the demo library loaded
    #[arg(long, env = "LIBRIS_SEED")]
    pub seed: bool,
}

/// Settled configuration; fixed once the server starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub log_profile: Profile,
    pub seed: bool,
    pub selector: SelectorOptions,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            listen: args.listen,
            log_profile: args.log_profile,
            seed: args.seed,
            selector: SelectorOptions {
                default_version: args.default_version,
                matching: args.version_matching,
                version_source: args.version_source,
                ..SelectorOptions::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from(Args::parse_from(["libris-api"]));
        assert_eq!(config.listen.port(), 5000);
        assert_eq!(config.selector, SelectorOptions::default());
        assert_eq!(config.log_profile, Profile::Development);
        assert!(!config.seed);
    }

    #[test]
    fn test_header_version_source() {
        let config = ServerConfig::from(Args::parse_from([
            "libris-api",
            "--version-source",
            "header:API-Version",
            "--version-matching",
            "exact",
            "--default-version",
            "2.0",
            "--seed",
        ]));
        assert_eq!(
            config.selector.version_source,
            VersionSource::Header("api-version".to_string())
        );
        assert_eq!(config.selector.matching, VersionMatching::Exact);
        assert_eq!(config.selector.default_version, ApiVersion::new(2, 0));
        assert!(config.seed);
    }

    #[test]
    fn test_rejects_unknown_matching() {
        assert!(Args::try_parse_from(["libris-api", "--version-matching", "ceiling"]).is_err());
    }
}
