use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Scaffold CouchApp functions and manage vendors", long_about = None)]
pub struct Cli {
    /// More output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra config file, layered over the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install and update vendor bundles
    Vendor {
        #[command(subcommand)]
        command: VendorCommands,
    },

    /// Generate a function from templates
    Generate {
        /// view, list, show, filter, function, vendor, update or spatial
        kind: String,

        /// Name of the generated function
        name: String,

        /// App directory
        #[arg(default_value = ".")]
        app_dir: PathBuf,

        /// Template to copy from, relative to the templates directory
        #[arg(long)]
        template: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VendorCommands {
    /// Fetch a vendor and install it in the app
    Install {
        /// Source uri, e.g. git://github.com/couchapp/couchapp.git
        uri: String,

        /// App directory
        #[arg(default_value = ".")]
        app_dir: PathBuf,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Update one vendor, or all of them, from their recorded source
    Update {
        /// Vendor to update; all installed vendors when omitted
        name: Option<String>,

        /// App directory
        #[arg(long, default_value = ".")]
        app_dir: PathBuf,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// List installed vendors
    List {
        /// App directory
        #[arg(default_value = ".")]
        app_dir: PathBuf,
    },

    /// Show the registered fetch handlers
    Handlers,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Overwrite installed vendors (install) or install new ones (update)
    #[arg(short, long)]
    pub force: bool,

    /// Handler option, repeatable
    #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub opts: Vec<(String, String)>,

    /// Extra arguments passed to the handler
    #[arg(last = true)]
    pub args: Vec<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_with_options_and_trailing_args() {
        let cli = Cli::try_parse_from([
            "couchapp", "vendor", "install", "git://h/r.git", "myapp", "--force", "--opt",
            "branch=dev", "--", "--depth", "1",
        ])
        .unwrap();

        let Commands::Vendor {
            command: VendorCommands::Install { uri, app_dir, fetch },
        } = cli.command
        else {
            panic!("expected vendor install");
        };
        assert_eq!(uri, "git://h/r.git");
        assert_eq!(app_dir, PathBuf::from("myapp"));
        assert!(fetch.force);
        assert_eq!(fetch.opts, vec![("branch".to_string(), "dev".to_string())]);
        assert_eq!(fetch.args, vec!["--depth", "1"]);
    }

    #[test]
    fn update_defaults_to_all_vendors() {
        let cli = Cli::try_parse_from(["couchapp", "-vv", "vendor", "update"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Vendor {
            command: VendorCommands::Update { name, app_dir, .. },
        } = cli.command
        else {
            panic!("expected vendor update");
        };
        assert_eq!(name, None);
        assert_eq!(app_dir, PathBuf::from("."));
    }

    #[test]
    fn malformed_opt_is_rejected() {
        assert!(Cli::try_parse_from(["couchapp", "vendor", "install", "git://x", "--opt", "novalue"]).is_err());
    }
}
