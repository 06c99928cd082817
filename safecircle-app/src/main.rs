use anyhow::Result;
use clap::{Parser, Subcommand};
use safecircle_app::config::DEFAULT_CONFIG_PATH;
use safecircle_app::{AppConfig, AppContext, ErrorNotice, FlowError, Route};
use safecircle_auth::{OtpChannel, OtpInput, PhoneNumber, ResendCountdown};
use safecircle_permissions::PermissionController;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "safecircle", about = "SafeCircle account and permission setup")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a verification code for a phone number
    Signup {
        phone: String,
        #[arg(long, default_value = "sms")]
        channel: OtpChannel,
    },
    /// Verify the code sent to a phone number
    Verify { phone: String, code: String },
    /// Wait out the resend lock, then request a new code
    Resend {
        phone: String,
        #[arg(long, default_value = "sms")]
        channel: OtpChannel,
    },
    /// Location and contacts permissions
    Permissions {
        #[command(subcommand)]
        action: PermissionAction,
    },
    /// Show the current login and where the app would open
    Session,
    /// Forget the current login
    Logout,
}

#[derive(Subcommand)]
enum PermissionAction {
    Request,
    Check,
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    let context = AppContext::build(config).await?;

    match cli.command {
        Command::Signup { phone, channel } => signup(&context, &phone, channel).await,
        Command::Verify { phone, code } => verify(&context, &phone, &code).await,
        Command::Resend { phone, channel } => {
            let mut countdown = ResendCountdown::new(context.config.otp_resend_seconds);
            println!("⏳ You can resend in {}", countdown.formatted());
            countdown.run(Duration::from_secs(1)).await;
            signup(&context, &phone, channel).await
        }
        Command::Permissions { action } => permissions(&context, action).await,
        Command::Session => {
            let state = context.session.snapshot().await;
            if state.is_logged_in {
                println!("Logged in as {} ({})", state.first_name, state.phone_number);
            } else {
                println!("Not logged in");
            }
            println!("Start screen: {:?}", context.initial_route().await);
            Ok(())
        }
        Command::Logout => {
            context.session.logged_out().await;
            context.persist_session().await
        }
    }
}

fn report(error: &FlowError) {
    if let Some(notice) = ErrorNotice::from_flow_error(error) {
        eprintln!("{}", notice);
    }
}

async fn signup(context: &AppContext, phone: &str, channel: OtpChannel) -> Result<()> {
    let flow = context.flow(context.auth_api()?);
    match flow.submit_phone(phone, channel).await {
        Ok(Route::VerifyOtp { phone }) => {
            println!(
                "✅ Code sent to {}. Run: safecircle verify {} <code>",
                phone.display(&context.config.country_code),
                phone
            );
            Ok(())
        }
        Ok(route) => {
            println!("Next: {:?}", route);
            Ok(())
        }
        Err(e) => {
            report(&e);
            Err(e.into())
        }
    }
}

async fn verify(context: &AppContext, phone: &str, code: &str) -> Result<()> {
    let flow = context.flow(context.auth_api()?);
    let phone = PhoneNumber::parse(phone).map_err(|e| anyhow::anyhow!(e.message))?;
    let mut input = OtpInput::new();
    input.paste(code);

    match flow.submit_otp(&phone, &input).await {
        Ok(route) => {
            context.persist_session().await?;
            match route {
                Route::Home => println!("✅ Verified. All permissions granted."),
                _ => println!("✅ Verified. Grant permissions with: safecircle permissions request"),
            }
            Ok(())
        }
        Err(e) => {
            report(&e);
            Err(e.into())
        }
    }
}

async fn permissions(context: &AppContext, action: PermissionAction) -> Result<()> {
    match action {
        PermissionAction::Request => {
            let result = context.permissions.request_all_permissions().await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        PermissionAction::Check => {
            let snapshot = context.permissions.permissions().await;
            println!("location: {}", snapshot.location);
            println!("contacts: {}", snapshot.contacts);
        }
        PermissionAction::Clear => {
            context.permissions.service().clear_permission_data().await;
            println!("Permission data cleared");
        }
    }
    Ok(())
}
