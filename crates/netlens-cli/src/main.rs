use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use netlens_core::chat::UserPreference;
use netlens_core::query::ResourceKind;
use netlens_infrastructure::{ConfigService, LogTarget, init_logging};

mod browse;
mod commands;
mod output;

#[derive(Parser)]
#[command(name = "netlens")]
#[command(about = "Netlens - capture, browse and analyse network traffic through a remote service", long_about = None)]
struct Cli {
    /// Base URL of the analysis service (overrides config and NETLENS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Alternative configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Selects a session inside a database file.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Capture session id
    pub session: String,

    /// Database file holding the session (service default if omitted)
    #[arg(long)]
    pub db_file: Option<String>,
}

/// Page selection for list commands.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Rows per page (resource default if omitted)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List capture interfaces of the remote host
    Interfaces,
    /// Run a live capture on the remote host
    Capture {
        /// Interface id as listed by `interfaces`
        interface: String,
        /// Capture duration in seconds
        #[arg(long, default_value_t = 10)]
        duration: u32,
        /// Stop after this many packets
        #[arg(long)]
        packet_count: Option<u32>,
    },
    /// List capture files stored on the server
    Files,
    /// Upload a local .pcap/.pcapng file
    Upload {
        path: PathBuf,
        /// Process the file into a session right away
        #[arg(long)]
        process: bool,
        /// Interface label recorded with the session
        #[arg(long)]
        interface: Option<String>,
    },
    /// Process a capture file already on the server
    Process {
        file_path: String,
        #[arg(long)]
        interface: Option<String>,
    },
    /// List capture databases
    DbFiles,
    /// List capture sessions
    Sessions {
        #[arg(long)]
        db_file: Option<String>,
    },
    /// Show one capture session
    Session(SessionArgs),
    /// List packets of a session
    Packets {
        #[command(flatten)]
        target: SessionArgs,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        src_ip: Option<String>,
        #[arg(long)]
        dst_ip: Option<String>,
        #[arg(long)]
        protocol: Option<String>,
    },
    /// List anomalies of a session
    Anomalies {
        #[command(flatten)]
        target: SessionArgs,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        severity: Option<String>,
        /// Anomaly type
        #[arg(long = "type")]
        anomaly_type: Option<String>,
    },
    /// Show traffic statistics of a session
    Analytics(SessionArgs),
    /// Ask the assistant one question
    Chat {
        message: String,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        db_file: Option<String>,
        /// Response length: corto, normal or detallado
        #[arg(long, default_value_t = UserPreference::Normal)]
        preference: UserPreference,
    },
    /// Browse packets or anomalies interactively
    Browse {
        #[command(flatten)]
        target: SessionArgs,
        /// packets or anomalies
        #[arg(long, default_value_t = ResourceKind::Packets)]
        resource: ResourceKind,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init => commands::config::init(&config_service),
            ConfigAction::Show => commands::config::show(&config_service),
        };
    }

    let mut config = config_service.load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    // The terminal UI owns the screen; everything else may also log to stderr.
    let target = match cli.command {
        Commands::Browse { .. } => LogTarget::File,
        _ => LogTarget::FileAndStderr,
    };
    let _guard = init_logging(&config.logging, target, "netlens")?;

    let ctx = commands::Context::new(config)?;

    match cli.command {
        Commands::Interfaces => commands::capture::interfaces(&ctx).await?,
        Commands::Capture {
            interface,
            duration,
            packet_count,
        } => commands::capture::capture(&ctx, interface, duration, packet_count).await?,
        Commands::Files => commands::capture::files(&ctx).await?,
        Commands::Upload {
            path,
            process,
            interface,
        } => commands::capture::upload(&ctx, path, process, interface).await?,
        Commands::Process {
            file_path,
            interface,
        } => commands::capture::process(&ctx, &file_path, interface.as_deref()).await?,
        Commands::DbFiles => commands::database::db_files(&ctx).await?,
        Commands::Sessions { db_file } => commands::database::sessions(&ctx, db_file).await?,
        Commands::Session(target) => commands::database::session(&ctx, &target).await?,
        Commands::Packets {
            target,
            page,
            src_ip,
            dst_ip,
            protocol,
        } => {
            let filters = [("src_ip", src_ip), ("dst_ip", dst_ip), ("protocol", protocol)];
            commands::database::packets(&ctx, &target, &page, &filters).await?
        }
        Commands::Anomalies {
            target,
            page,
            severity,
            anomaly_type,
        } => {
            let filters = [("severity", severity), ("type", anomaly_type)];
            commands::database::anomalies(&ctx, &target, &page, &filters).await?
        }
        Commands::Analytics(target) => commands::database::analytics(&ctx, &target).await?,
        Commands::Chat {
            message,
            session,
            db_file,
            preference,
        } => commands::chat::ask(&ctx, &message, session, db_file, preference).await?,
        Commands::Browse { target, resource } => browse::run(&ctx, &target, resource).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
