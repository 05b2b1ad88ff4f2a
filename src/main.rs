use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use ghidra_provision::cli::{persist_config, ProvisionArgs, Provisioner};
use ghidra_provision::config::{self, ServerConfig, CONFIG_FILE_NAME};
use ghidra_provision::docker::DockerCompose;
use ghidra_provision::env_file::ENV_FILE_NAME;
use ghidra_provision::release::{ReleaseFetcher, ReleaseStore};
use ghidra_provision::ui::{self, AssumeYes, ConfirmationPort, TerminalPrompt};
use ghidra_provision::{logging, network};

#[derive(clap::Parser)]
#[command(
    name = "ghidra-provision",
    version,
    about = "Helps start a ghidra server in a docker container"
)]
struct Args {
    #[arg(
        short,
        long,
        num_args = 1..,
        action = clap::ArgAction::Append,
        help = "Users to add to the server"
    )]
    users: Vec<String>,

    #[arg(
        short,
        long,
        help = "Set server to only be accessible locally (private IP)"
    )]
    local: bool,

    #[arg(short, long, help = "Use the configuration file instead of flags")]
    config: bool,

    #[arg(long, value_name = "PATH", help = "Custom configuration file path")]
    config_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        default_value = "./projects",
        help = "Path where projects are stored"
    )]
    ppath: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        default_value = ReleaseStore::DEFAULT_PATH,
        help = "Release store file"
    )]
    releases: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Directory holding docker-compose.yml"
    )]
    compose_dir: PathBuf,

    #[arg(long, help = "Resolve and build only; do not start the container")]
    no_launch: bool,

    #[arg(short = 'y', long, help = "Answer yes to every prompt")]
    yes: bool,

    #[arg(short, long, help = "Show debug logging")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let confirm: &dyn ConfirmationPort = if args.yes {
        &AssumeYes
    } else {
        &TerminalPrompt
    };

    let server_config = if args.config {
        let loaded = config::load_config(args.config_file.as_deref())
            .context("loading configuration")?;
        for warning in &loaded.warnings {
            ui::display_warning(warning);
        }
        loaded.config
    } else {
        let server_config = ServerConfig {
            users: if args.users.is_empty() {
                ServerConfig::default().users
            } else {
                args.users.clone()
            },
            local: args.local,
            ppath: args.ppath.clone(),
        };
        let path = args
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if persist_config(&server_config, &path, confirm)? {
            ui::display_success(&format!("Saved configuration to {}", path.display()));
        }
        server_config
    };

    let fetcher = ReleaseFetcher::upstream().context("creating HTTP client")?;
    let images = DockerCompose::new(&args.compose_dir);
    let provisioner = Provisioner {
        fetcher: &fetcher,
        images: &images,
        confirm,
        lookup_ip: network::bind_address,
    };

    let outcome = provisioner.run(
        &server_config,
        &ProvisionArgs {
            releases_path: args.releases,
            env_path: args.compose_dir.join(ENV_FILE_NAME),
            launch: !args.no_launch,
        },
    )?;

    println!("{}", outcome.bind_ip);
    Ok(())
}
