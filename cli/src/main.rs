use clap::{Parser, Subcommand};
use url::Url;

use hyoka_core::{decode, DispatchRequest, DispatchResponse, Feedback, FEEDBACK_PATH};

#[derive(Parser)]
#[command(name = "hyoka-cli", version, about = "Smoke tools for the hyoka feedback relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommand,
    },
}

#[derive(Subcommand)]
enum FeedbackCommand {
    Send {
        #[arg(long, env = "HYOKA_RELAY_BASE_URL", default_value = "http://localhost:8787")]
        base_url: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        contact: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Feedback { command } => match command {
            FeedbackCommand::Send {
                base_url,
                rating,
                comment,
                contact,
            } => send_feedback(base_url, rating, comment, contact).await,
        },
    }
}

async fn send_feedback(
    base_url: String,
    rating: u8,
    comment: String,
    contact: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let feedback = Feedback::new(rating, &comment, contact.as_deref().unwrap_or(""))?;
    let request = DispatchRequest::from_feedback(&feedback);
    let url = Url::parse(&base_url)?.join(FEEDBACK_PATH)?;

    let client = reqwest::Client::new();
    let response = client.post(url).json(&request).send().await?;
    let status = response.status();
    let body = response.text().await?;

    match decode::<DispatchResponse>(&body) {
        Some(result) if result.delivered => {
            println!("delivered ({status})");
            Ok(())
        }
        Some(_) => Err(format!("relay refused delivery ({status})").into()),
        None => Err(format!("unexpected relay response ({status}): {body}").into()),
    }
}
