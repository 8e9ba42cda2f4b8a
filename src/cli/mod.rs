use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::AppConfig;

pub mod ask;
pub mod chat;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start an interactive chat session
    Chat {
        /// Personality used to seed the conversation
        #[arg(long)]
        personality: Option<String>,
    },
    /// Send a single prompt and print the reply
    Ask {
        prompt: String,

        /// Personality used to seed the conversation
        #[arg(long)]
        personality: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            // axum logs rejections from built-in extractors with the `axum::rejection`
            // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
            init_tracing(&format!(
                "{}=debug,tower_http=debug,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            ));
            serve::run(host, port, config).await?;
        }
        Some(Command::Chat { personality }) => {
            init_tracing(&format!("{}=warn", env!("CARGO_CRATE_NAME")));
            chat::run(config, personality).await?;
        }
        Some(Command::Ask {
            prompt,
            personality,
        }) => {
            init_tracing(&format!("{}=warn", env!("CARGO_CRATE_NAME")));
            ask::run(config, &prompt, personality.as_deref()).await?;
        }
        None => {}
    }

    Ok(())
}
