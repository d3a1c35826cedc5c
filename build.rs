// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Repository layout arguments shared by publish and inspect
fn repo_args() -> Vec<Arg> {
    vec![
        Arg::new("component")
            .long("component")
            .help("Repository component (e.g., main, contrib, non-free) [default: main]"),
        Arg::new("origin")
            .long("origin")
            .help("Origin written to the manifests [default: \"Custom Repository\"]"),
        Arg::new("label")
            .long("label")
            .help("Label written to the manifests [default: \"Custom Repo\"]"),
        Arg::new("arch")
            .long("arch")
            .help("Target architecture (e.g., amd64, arm64) [default: amd64]"),
        Arg::new("archive")
            .long("archive")
            .help("Archive (e.g., stable, testing, unstable) [default: stable]"),
        Arg::new("suite_arch")
            .long("suite-arch")
            .value_name("ARCH")
            .help("Architectures listed in the suite manifest (comma separated)"),
        Arg::new("suite_component")
            .long("suite-component")
            .value_name("COMPONENT")
            .help("Components listed in the suite manifest (comma separated)"),
    ]
}

fn build_cli() -> Command {
    Command::new("debforge")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Debforge Contributors")
        .about("Publish Debian packages into an S3-compatible APT repository")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .env("DEBFORGE_CONFIG")
                .help("Configuration file (TOML)"),
        )
        .subcommand(
            Command::new("publish")
                .about("Upload a .deb and update the repository index and manifests")
                .arg(Arg::new("file").required(true).value_name("FILE").help("Path to the .deb file"))
                .args(repo_args())
                .arg(Arg::new("bucket").long("bucket").env("DEBFORGE_BUCKET").help("Name of the S3 bucket"))
                .arg(
                    Arg::new("endpoint")
                        .long("endpoint")
                        .env("DEBFORGE_ENDPOINT")
                        .help("S3-compatible endpoint (e.g., fra1.digitaloceanspaces.com)"),
                )
                .arg(Arg::new("region").long("region").env("DEBFORGE_REGION").help("Signing region [default: auto]"))
                .arg(
                    Arg::new("access_key")
                        .long("access-key")
                        .env("AWS_ACCESS_KEY_ID")
                        .hide_env_values(true)
                        .help("Access key"),
                )
                .arg(
                    Arg::new("secret_key")
                        .long("secret-key")
                        .env("AWS_SECRET_ACCESS_KEY")
                        .hide_env_values(true)
                        .help("Secret access key"),
                )
                .arg(
                    Arg::new("secure")
                        .long("secure")
                        .value_name("BOOL")
                        .help("Use https for the endpoint [default: true]"),
                )
                .arg(
                    Arg::new("local_root")
                        .long("local-root")
                        .value_name("DIR")
                        .help("Publish into a local directory instead of a bucket"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .help("Cancel pending storage calls after this many seconds"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the index stanza and pool path of a .deb without publishing it")
                .arg(Arg::new("file").required(true).value_name("FILE").help("Path to the .deb file"))
                .args(repo_args()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("debforge.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
