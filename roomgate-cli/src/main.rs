use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roomgate_core::config::Config;
use roomgate_core::core_room::{
    HomeGate, HomeView, IdentityProvider, NewRoom, RoomId, RoomRegistry, SqlRoomDirectory,
    StaticIdentity, UserId,
};
use roomgate_core::logging::{init_logging_with_config, LogConfig};
use roomgate_core::metrics::init_metrics;
use roomgate_core::RoomAccessResolver;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

mod render;

#[derive(Parser, Debug)]
#[command(name = "roomgate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Room database, overrides the configured path
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Signed-in user; omit to act anonymously
    #[arg(short, long, global = true, env = "ROOMGATE_USER")]
    user: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the rooms you have joined and the public rooms you can join
    Rooms {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a room; the creator becomes its first member
    CreateRoom {
        /// Room name
        #[arg(short, long)]
        name: String,

        /// Make the room public (private by default)
        #[arg(long)]
        public: bool,
    },

    /// Join a public room
    Join {
        /// Room id
        #[arg(short, long)]
        room: String,
    },

    /// Write the effective configuration to a file
    InitConfig {
        /// Destination file
        #[arg(default_value = "roomgate.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = load_config(&args)?;
    let log_config = LogConfig::from_config(&config.logging)?.json_format(
        config.logging.json_format || args.json_logs,
    );
    init_logging_with_config(log_config)?;
    init_metrics();

    debug!(database = %config.store.database_path.display(), "Configuration loaded");

    let identity = StaticIdentity::from_optional(args.user.clone());

    match args.command {
        Command::Rooms { json } => list_rooms(&config, identity, json).await,
        Command::CreateRoom { name, public } => {
            let user = require_user(args.user.as_deref())?;
            create_room(&config, &user, &name, public).await
        }
        Command::Join { room } => {
            let user = require_user(args.user.as_deref())?;
            join_room(&config, &user, RoomId::new(room)).await
        }
        Command::InitConfig { path } => {
            config
                .save_to_file(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote configuration to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// File (if given) or defaults, then `ROOMGATE_*` variables, then flags
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;

    if let Some(path) = &args.database {
        config.store.database_path = path.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn require_user(user: Option<&str>) -> Result<UserId> {
    match user.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(UserId::from(id)),
        _ => anyhow::bail!("this command needs a signed-in user (--user or ROOMGATE_USER)"),
    }
}

fn open_directory(config: &Config) -> Result<Arc<SqlRoomDirectory>> {
    let path: &Path = &config.store.database_path;
    let directory = SqlRoomDirectory::open(path, config.store.pool_size)
        .with_context(|| format!("opening room database {}", path.display()))?;
    Ok(Arc::new(directory))
}

async fn list_rooms(config: &Config, identity: StaticIdentity, json: bool) -> Result<ExitCode> {
    // The store is only opened for a signed-in user
    let view = if identity.current_user().await.is_none() {
        HomeView::RedirectToLogin
    } else {
        let directory = open_directory(config)?;
        let resolver = RoomAccessResolver::new(directory, config.resolver.clone());
        HomeGate::new(Arc::new(identity), resolver).open().await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&render::view_json(&view))?);
    } else {
        print!("{}", render::render_home(&view));
    }

    Ok(match view {
        HomeView::RedirectToLogin => ExitCode::from(2),
        HomeView::Empty | HomeView::Rooms(_) => ExitCode::SUCCESS,
    })
}

async fn create_room(config: &Config, user: &UserId, name: &str, public: bool) -> Result<ExitCode> {
    let new_room = NewRoom::parse(name, public, config.rooms.max_name_length)?;
    let directory = open_directory(config)?;

    let room = directory.create_room(new_room, user).await?;
    info!(room = %room.id, "Room created");
    println!(
        "Created {} room \"{}\" ({})",
        room.visibility.as_str().to_lowercase(),
        room.name,
        room.id
    );
    Ok(ExitCode::SUCCESS)
}

async fn join_room(config: &Config, user: &UserId, room_id: RoomId) -> Result<ExitCode> {
    let directory = open_directory(config)?;

    directory.join_room(&room_id, user).await?;
    info!(room = %room_id, "Room joined");
    println!("Joined room {}", room_id);
    Ok(ExitCode::SUCCESS)
}
