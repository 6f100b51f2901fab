use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showreel::config::ShowreelConfig;
use showreel::forms::{ContactRequest, Enquiry, FormMailer, QuoteRequest, SubmissionError};
use showreel::notify::EmailJsGateway;
use showreel::testimonials::{HttpTestimonialApi, SubmissionLedger, TestimonialBoard, TestimonialDraft};

#[derive(Parser)]
#[command(name = "showreel", about = "Drone videography showreel: carousel viewer, enquiries and testimonials")]
struct Cli {
    /// TOML file with carousel, email and testimonial settings
    #[arg(long, global = true, env = "SHOWREEL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse a directory of images as a carousel
    #[cfg(feature = "viewer")]
    View {
        dir: PathBuf,
        /// Also encode the rendered frames to this video file
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Request a quote for a shoot
    Quote {
        #[arg(long)]
        service: String,
        #[arg(long, default_value = "")]
        price: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        duration: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(long, env = "SHOWREEL_EMAILJS_PUBLIC_KEY", hide_env_values = true)]
        public_key: Option<String>,
    },
    /// Send a general enquiry
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long, env = "SHOWREEL_EMAILJS_PUBLIC_KEY", hide_env_values = true)]
        public_key: Option<String>,
    },
    /// Add, delete or check this client's testimonial
    Testimonial {
        #[command(subcommand)]
        action: TestimonialAction,
    },
}

#[derive(Subcommand)]
enum TestimonialAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        text: String,
    },
    Delete {
        token: String,
    },
    /// Show whether a new testimonial can be added yet
    Status,
}

async fn send_enquiry(config: &ShowreelConfig, public_key: Option<String>, form: Enquiry) -> Result<()> {
    let mut email = config.email.clone();
    if public_key.is_some() {
        email.public_key = public_key;
    }
    let gateway = EmailJsGateway::from_settings(&email).context("email delivery is not configured")?;
    let mailer = FormMailer::new(gateway, &email);

    match mailer.submit(form).await {
        Ok(_) => {
            println!("Thanks! Your request was sent and a confirmation is on its way.");
            Ok(())
        }
        Err(SubmissionError::Invalid { reason, .. }) => {
            eprintln!("{reason}");
            std::process::exit(2);
        }
        Err(e @ SubmissionError::RetryPrompt { .. }) => {
            eprintln!("{e}");
            // Print the form back so nothing typed is lost
            let form = serde_json::to_string_pretty(e.form()).context("failed to serialize form")?;
            eprintln!("{form}");
            std::process::exit(1);
        }
    }
}

async fn testimonial(config: &ShowreelConfig, action: TestimonialAction) -> Result<()> {
    let settings = &config.testimonials;
    let ledger = SubmissionLedger::open(&settings.ledger_path, settings.cooldown_days)?;
    let mut board = TestimonialBoard::new(HttpTestimonialApi::new(&settings.base_url), ledger);

    match action {
        TestimonialAction::Add { name, role, text } => {
            let created = board.submit(TestimonialDraft { name, role, text }, Utc::now()).await?;
            println!("Testimonial {} added.", created.id);
            if let Some(token) = board.ledger().token() {
                println!("Delete token: {token}");
            }
        }
        TestimonialAction::Delete { token } => {
            board.delete(&token).await?;
            println!("Testimonial deleted.");
        }
        TestimonialAction::Status => match board.status(Utc::now()) {
            Ok(()) => println!("You can add a testimonial."),
            Err(cooldown) => println!("You can add one testimonial every week; {cooldown}."),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ShowreelConfig::load(cli.config.as_deref())?;

    match cli.command {
        #[cfg(feature = "viewer")]
        Command::View { dir, record } => {
            // raylib owns this thread until the window closes
            tokio::task::block_in_place(|| showreel::viewer::run(&dir, &config.carousel, record.as_deref()))
        }
        Command::Quote { service, price, location, duration, name, email, phone, message, public_key } => {
            let form = Enquiry::Quote(QuoteRequest {
                service_type: service,
                base_price: price,
                location,
                duration,
                name,
                email,
                phone,
                message,
            });
            send_enquiry(&config, public_key, form).await
        }
        Command::Contact { name, email, phone, subject, message, public_key } => {
            let form = Enquiry::Contact(ContactRequest { name, email, phone, subject, message });
            send_enquiry(&config, public_key, form).await
        }
        Command::Testimonial { action } => testimonial(&config, action).await,
    }
}
