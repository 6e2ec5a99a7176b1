use clap::Subcommand;

pub mod key;
pub mod local;

use self::key::KeyCommands;
use self::local::LocalCommands;

#[derive(Subcommand)]
pub enum Commands {
    /// Manage local key material
    #[command(subcommand)]
    Key(KeyCommands),

    /// Seal, unseal, and verify the local mock store
    #[command(subcommand)]
    Local(LocalCommands),
}

impl Commands {
    /// Run the command; the returned code becomes the process exit status.
    pub fn execute(self) -> eyre::Result<i32> {
        match self {
            Commands::Key(cmd) => cmd.execute(),
            Commands::Local(cmd) => cmd.execute(),
        }
    }
}
