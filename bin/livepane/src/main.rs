//! Livepane CLI
//!
//! Build-time companion of the preview bridge: checks page markup against the
//! content-path contract, writes preview bootstraps and resolves the CMS media
//! folders.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Livepane.
#[derive(Parser)]
#[command(
    name = "livepane",
    version,
    about = "Tooling for the Livepane CMS live-preview bridge"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Check built pages against the content-path contract
    Check {
        /// Directory holding the built HTML pages
        #[arg(default_value = "dist")]
        dir: std::path::PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the preview bootstrap for an entry file
    Bootstrap {
        /// Entry file with YAML frontmatter
        entry: std::path::PathBuf,
        /// Page template (home, apartments, faq, exchange-students, guide, content-page)
        #[arg(short, long, default_value = "home")]
        page: String,
        /// Initial display locale (de, en)
        #[arg(short, long)]
        locale: Option<String>,
        /// Entry slug; defaults to the file stem
        #[arg(long)]
        slug: Option<String>,
    },
    /// Resolve the media folders named by the CMS config
    MediaFolders {
        /// Path to the CMS admin config
        #[arg(default_value = "public/admin/config.yml")]
        config_yml: std::path::PathBuf,
        /// Also list every media file below the folders
        #[arg(long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    livepane::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { dir, strict } => {
            livepane::cmd::check::run(&cli.config, &dir, strict)?;
        }
        Commands::Bootstrap {
            entry,
            page,
            locale,
            slug,
        } => {
            livepane::cmd::bootstrap::run(
                &cli.config,
                &entry,
                &page,
                locale.as_deref(),
                slug.as_deref(),
            )?;
        }
        Commands::MediaFolders { config_yml, list } => {
            livepane::cmd::media::run(&config_yml, list)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["livepane", "check", "build", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Check { dir, strict } => {
                assert_eq!(dir, std::path::PathBuf::from("build"));
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_check_defaults() {
        let args = ["livepane", "check"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { dir, strict } => {
                assert_eq!(dir, std::path::PathBuf::from("dist"));
                assert!(!strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_bootstrap_command_parsing() {
        let args = [
            "livepane",
            "bootstrap",
            "src/content/apartments/loft.md",
            "--page",
            "apartments",
            "--locale",
            "en",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Bootstrap {
                entry,
                page,
                locale,
                slug,
            } => {
                assert_eq!(
                    entry,
                    std::path::PathBuf::from("src/content/apartments/loft.md")
                );
                assert_eq!(page, "apartments");
                assert_eq!(locale.as_deref(), Some("en"));
                assert!(slug.is_none());
            }
            _ => panic!("Expected Bootstrap command"),
        }
    }

    #[test]
    fn test_cli_media_folders_command_parsing() {
        let args = ["livepane", "media-folders", "--list"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::MediaFolders { config_yml, list } => {
                assert_eq!(
                    config_yml,
                    std::path::PathBuf::from("public/admin/config.yml")
                );
                assert!(list);
            }
            _ => panic!("Expected MediaFolders command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["livepane", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config() {
        let args = ["livepane", "--config", "preview.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("preview.toml"));
    }
}
