use clap::Subcommand;
use noctivault_enc::generate_key_file;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Generate a random 32-byte key file (owner-only permissions)
    Gen {
        /// Destination path; defaults to the fixed config location
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl KeyCommands {
    pub fn execute(self) -> eyre::Result<i32> {
        match self {
            KeyCommands::Gen { out } => {
                let path = generate_key_file(out.as_deref())?;
                println!("{}", path.display());
                Ok(0)
            }
        }
    }
}
