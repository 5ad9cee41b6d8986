use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "webscope", about = "Login form field inspector", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web front end
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Render a page in headless Chrome and print the detected selectors
    Analyze {
        /// Page URL
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Classify a saved HTML file (frames given as iframe srcdoc)
    Inspect {
        /// HTML file
        file: String,

        /// URL reported as the page (defaults to the file path)
        #[arg(long)]
        url: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}
