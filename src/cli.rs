// src/cli.rs
//! CLI definitions for debforge
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use debforge::config::{Architecture, Archive, Component, RepositorySection, parse_choice};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debforge")]
#[command(author = "Debforge Contributors")]
#[command(version)]
#[command(about = "Publish Debian packages into an S3-compatible APT repository", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "DEBFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a .deb and update the repository index and manifests
    Publish {
        /// Path to the .deb file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        repo: RepoArgs,

        #[command(flatten)]
        storage: StorageArgs,

        /// Cancel pending storage calls after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the index stanza and pool path of a .deb without publishing it
    Inspect {
        /// Path to the .deb file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Repository layout options, overriding the `[repository]` config section
#[derive(Args, Debug, Default, Clone)]
pub struct RepoArgs {
    /// Repository component (e.g., main, contrib, non-free) [default: main]
    #[arg(long, value_parser = parse_component)]
    pub component: Option<Component>,

    /// Origin written to the manifests [default: "Custom Repository"]
    #[arg(long)]
    pub origin: Option<String>,

    /// Label written to the manifests [default: "Custom Repo"]
    #[arg(long)]
    pub label: Option<String>,

    /// Target architecture (e.g., amd64, arm64) [default: amd64]
    #[arg(long, value_parser = parse_architecture)]
    pub arch: Option<Architecture>,

    /// Archive (e.g., stable, testing, unstable) [default: stable]
    #[arg(long, value_parser = parse_archive)]
    pub archive: Option<Archive>,

    /// Architectures listed in the suite manifest (comma separated)
    #[arg(long = "suite-arch", value_name = "ARCH", value_delimiter = ',', value_parser = parse_architecture)]
    pub suite_architectures: Vec<Architecture>,

    /// Components listed in the suite manifest (comma separated)
    #[arg(long = "suite-component", value_name = "COMPONENT", value_delimiter = ',', value_parser = parse_component)]
    pub suite_components: Vec<Component>,
}

impl RepoArgs {
    /// Overlay the flags that were given onto a config file section
    pub fn apply(self, section: &mut RepositorySection) {
        if let Some(component) = self.component {
            section.component = Some(component);
        }
        if let Some(origin) = self.origin {
            section.origin = Some(origin);
        }
        if let Some(label) = self.label {
            section.label = Some(label);
        }
        if let Some(arch) = self.arch {
            section.architecture = Some(arch);
        }
        if let Some(archive) = self.archive {
            section.archive = Some(archive);
        }
        if !self.suite_architectures.is_empty() {
            section.architectures = self.suite_architectures;
        }
        if !self.suite_components.is_empty() {
            section.components = self.suite_components;
        }
    }
}

/// Storage options, overriding the `[storage]` config section
#[derive(Args, Debug, Default, Clone)]
pub struct StorageArgs {
    /// Name of the S3 bucket
    #[arg(long, env = "DEBFORGE_BUCKET")]
    pub bucket: Option<String>,

    /// S3-compatible endpoint (e.g., fra1.digitaloceanspaces.com)
    #[arg(long, env = "DEBFORGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Signing region [default: auto]
    #[arg(long, env = "DEBFORGE_REGION")]
    pub region: Option<String>,

    /// Access key
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Use https for the endpoint [default: true]
    #[arg(long, value_name = "BOOL")]
    pub secure: Option<bool>,

    /// Publish into a local directory instead of a bucket
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,
}

fn parse_architecture(value: &str) -> Result<Architecture, String> {
    parse_choice("architecture", value)
}

fn parse_archive(value: &str) -> Result<Archive, String> {
    parse_choice("archive", value)
}

fn parse_component(value: &str) -> Result<Component, String> {
    parse_choice("component", value)
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
    fn test_publish_flags() {
        let cli = Cli::try_parse_from([
            "debforge",
            "publish",
            "hello.deb",
            "--bucket",
            "apt",
            "--endpoint",
            "minio.local:9000",
            "--secure",
            "false",
            "--arch",
            "arm64",
            "--component",
            "non-free",
            "--suite-arch",
            "amd64,arm64",
        ])
        .unwrap();

        let Commands::Publish {
            file,
            repo,
            storage,
            timeout,
        } = cli.command
        else {
            panic!("expected publish");
        };
        assert_eq!(file, PathBuf::from("hello.deb"));
        assert_eq!(repo.arch, Some(Architecture::Arm64));
        assert_eq!(repo.component, Some(Component::NonFree));
        assert_eq!(
            repo.suite_architectures,
            vec![Architecture::Amd64, Architecture::Arm64]
        );
        assert_eq!(storage.bucket.as_deref(), Some("apt"));
        assert_eq!(storage.secure, Some(false));
        assert_eq!(timeout, None);
    }

    #[test]
    fn test_rejects_unknown_architecture() {
        let result = Cli::try_parse_from(["debforge", "inspect", "x.deb", "--arch", "vax"]);
        let Err(err) = result else {
            panic!("expected parse failure");
        };
        assert!(err.to_string().contains("unknown architecture 'vax'"));
    }

    #[test]
    fn test_repo_args_override_file() {
        let mut section = RepositorySection {
            origin: Some("From File".to_string()),
            label: Some("File Label".to_string()),
            ..Default::default()
        };
        RepoArgs {
            origin: Some("From Flag".to_string()),
            archive: Some(Archive::Testing),
            ..Default::default()
        }
        .apply(&mut section);

        let config = section.into_config();
        assert_eq!(config.origin, "From Flag");
        assert_eq!(config.label, "File Label");
        assert_eq!(config.archive, Archive::Testing);
        assert_eq!(config.component, Component::Main);
    }
}
