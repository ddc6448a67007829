//! Command line interface definition

use apkfetch_config::RangeStrategyChoice;
use apkfetch_types::ByteRange;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// apkfetch - range-fetch, verify and cache APK packages
#[derive(Parser)]
#[command(name = "apkfetch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Range-fetch, verify and cache APK packages")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory artifacts are cached under
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    /// How byte ranges are sent: auto, header or fragment
    #[arg(long, global = true, value_name = "STRATEGY")]
    pub range_strategy: Option<RangeStrategyChoice>,

    /// Version of the host tool, used by `--range-strategy auto`
    #[arg(long, global = true, value_name = "VERSION")]
    pub host_version: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the three segments of a package and assemble it
    Package {
        /// Package URL
        #[arg(long)]
        url: String,

        /// Architecture directory of the package
        #[arg(long)]
        arch: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        version: String,

        /// Signature segment, e.g. bytes=0-668
        #[arg(long, value_name = "RANGE")]
        signature_range: ByteRange,

        #[arg(long, value_name = "RANGE")]
        control_range: ByteRange,

        /// Control segment digest (SRI, ALG-HEX or ALG:HEX)
        #[arg(long, value_name = "DIGEST")]
        control_digest: String,

        #[arg(long, value_name = "RANGE")]
        data_range: ByteRange,

        #[arg(long, value_name = "DIGEST")]
        data_digest: String,
    },

    /// Probe a repository index, then fetch it
    Index {
        /// Full APKINDEX.tar.gz URL
        #[arg(long)]
        url: String,

        #[arg(long)]
        arch: String,

        /// Name used in progress output (defaults to the URL)
        #[arg(long)]
        name: Option<String>,
    },

    /// Fetch a public signing key
    Keyring {
        #[arg(long)]
        url: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Import everything pinned by a lockfile
    Lock {
        /// Path to apko.lock.json
        path: PathBuf,
    },

    /// Check that a host honours range requests
    Probe {
        /// Usually a repository's APKINDEX.tar.gz URL
        #[arg(long)]
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_package() {
        let cli = Cli::try_parse_from([
            "apkfetch",
            "--range-strategy",
            "fragment",
            "package",
            "--url",
            "https://packages.wolfi.dev/os/x86_64/busybox-1.36.1-r2.apk",
            "--arch",
            "x86_64",
            "--name",
            "busybox",
            "--version",
            "1.36.1-r2",
            "--signature-range",
            "bytes=0-668",
            "--control-range",
            "bytes=669-1082",
            "--control-digest",
            "sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk=",
            "--data-range",
            "bytes=1083-",
            "--data-digest",
            "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=",
        ])
        .unwrap();

        assert_eq!(cli.global.range_strategy, Some(RangeStrategyChoice::Fragment));
        match cli.command {
            Commands::Package {
                signature_range,
                data_range,
                ..
            } => {
                assert_eq!(signature_range, ByteRange::new(0, 668).unwrap());
                assert_eq!(data_range, ByteRange::from_offset(1083));
            }
            _ => panic!("expected package command"),
        }
    }

    #[test]
    fn test_rejects_bad_range() {
        assert!(Cli::try_parse_from([
            "apkfetch",
            "package",
            "--url",
            "u",
            "--arch",
            "x86_64",
            "--name",
            "n",
            "--version",
            "1",
            "--signature-range",
            "0-668",
            "--control-range",
            "bytes=1-2",
            "--control-digest",
            "d",
            "--data-range",
            "bytes=3-4",
            "--data-digest",
            "d",
        ])
        .is_err());
    }
}
