//! CLI command definitions and dispatch.

mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use inspect::{inspect, ContainerInspectArgs, ImageInspectArgs, InspectArgs};

/// A3S Inspect - low-level information on a3s containers and images.
#[derive(Parser)]
#[command(name = "a3s-inspect", version, about)]
pub struct Cli {
    /// Data directory (defaults to $A3S_HOME, then ~/.a3s)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Display low-level information on containers or images
    Inspect(InspectArgs),
    /// Manage containers
    Container {
        #[command(subcommand)]
        command: ContainerCommand,
    },
    /// Manage images
    Image {
        #[command(subcommand)]
        command: ImageCommand,
    },
}

#[derive(Subcommand)]
pub enum ContainerCommand {
    /// Display low-level information on one or more containers
    Inspect(ContainerInspectArgs),
}

#[derive(Subcommand)]
pub enum ImageCommand {
    /// Display low-level information on one or more images
    Inspect(ImageInspectArgs),
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let root = cli.root.as_deref();
    match cli.command {
        Command::Inspect(args) => inspect::execute(root, args).await,
        Command::Container {
            command: ContainerCommand::Inspect(args),
        } => inspect::execute_container(root, args).await,
        Command::Image {
            command: ImageCommand::Inspect(args),
        } => inspect::execute_image(root, args).await,
    }
}
