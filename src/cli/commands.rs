// src/cli/commands.rs
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate one or more passwords
    Generate {
        /// Password length
        #[arg(long, short)]
        length: Option<usize>,

        /// How many passwords to generate
        #[arg(long, short, default_value_t = 1)]
        count: usize,

        /// Leave out uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Leave out lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Leave out digits
        #[arg(long)]
        no_digits: bool,

        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,

        /// Show the estimated entropy of each password
        #[arg(long)]
        entropy: bool,
    },

    /// Rate the strength of a password
    Check {
        #[arg(required = true)]
        password: String,
    },

    /// Store a password
    Add {
        #[arg(required = true)]
        site: String,

        #[arg(required = true)]
        username: String,

        /// Password to store (prompted for when omitted)
        #[arg(long, short, conflicts_with = "generate")]
        password: Option<String>,

        /// Store a freshly generated password
        #[arg(long, short)]
        generate: bool,

        #[arg(long, short)]
        notes: Option<String>,
    },

    /// List all passwords
    List,

    /// Show passwords saved for a site
    Search {
        #[arg(required = true)]
        site: String,
    },

    /// Replace a stored password
    Update {
        /// Password ID
        #[arg(required = true)]
        id: String,

        #[arg(required = true)]
        password: String,
    },

    /// Delete a password
    Delete {
        /// Password ID
        #[arg(required = true)]
        id: String,
    },

    /// Import passwords from a CSV file
    Import {
        #[arg(required = true)]
        path: PathBuf,

        #[arg(long, default_value = ",")]
        delimiter: String,

        /// The first line is a record, not a header
        #[arg(long)]
        no_header: bool,
    },

    /// Export passwords to a CSV file
    Export {
        #[arg(required = true)]
        path: PathBuf,

        #[arg(long, default_value = ",")]
        delimiter: String,

        /// Do not write a header line
        #[arg(long)]
        no_header: bool,
    },
}
