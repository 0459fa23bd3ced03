use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "layerscope")]
#[command(about = "A TUI for exploring container image file systems layer by layer")]
pub struct Cli {
    /// Base URL of the image analysis backend
    #[arg(short, long, default_value = "http://localhost:8080")]
    pub url: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run {
        /// List layers newest first instead of build order
        #[arg(long)]
        descending_layers: bool,
        /// Hide the color swatch column in the explorer listing
        #[arg(long)]
        no_legend: bool,
    },
    /// Print the image efficiency score and exit
    Score {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the layer table and exit
    Layers {
        /// List layers newest first instead of build order
        #[arg(long)]
        descending_layers: bool,
        /// Emit the table as JSON
        #[arg(long)]
        json: bool,
    },
}
