use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use snapline_application::ProfileTab;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "snapline")]
#[command(about = "Snapline CLI - photo-sharing client", long_about = None)]
struct Cli {
    /// Override the API root (e.g. http://localhost:8000/api)
    #[arg(long, global = true)]
    api_root: Option<String>,

    /// Directory holding config.toml and session.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show the feed
    Feed {
        /// Show every post instead of followed users only
        #[arg(long)]
        explore: bool,
    },
    /// Like or unlike a post
    Like { post_id: u64 },
    /// Comment on a post
    Comment { post_id: u64, text: String },
    /// Follow a user
    Follow { user_id: u64 },
    /// Unfollow a user
    Unfollow { user_id: u64 },
    /// List notifications
    Notifications {
        /// Mark one notification read
        #[arg(long, conflicts_with = "all")]
        read: Option<u64>,
        /// Mark every notification read
        #[arg(long)]
        all: bool,
    },
    /// Search users
    Search { query: String },
    /// Show a profile (your own when no id is given)
    Profile {
        user_id: Option<u64>,
        #[arg(long, value_enum, default_value_t = TabArg::Posts)]
        tab: TabArg,
    },
    /// Update your bio and profile picture
    UpdateProfile {
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// List stories
    Stories {
        /// Include expired stories
        #[arg(long)]
        all: bool,
    },
    /// Publish a post
    Post {
        image: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Publish a story
    Story {
        image: PathBuf,
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Poll notifications until interrupted
    Watch,
}

#[derive(Clone, Copy, ValueEnum)]
enum TabArg {
    Posts,
    Followers,
    Following,
}

impl From<TabArg> for ProfileTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Posts => ProfileTab::Posts,
            TabArg::Followers => ProfileTab::Followers,
            TabArg::Following => ProfileTab::Following,
        }
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let app = commands::App::bootstrap(cli.config_dir.as_deref(), cli.api_root).await?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&app, username, password).await?
        }
        Commands::Register {
            username,
            email,
            first_name,
            last_name,
            password,
            password_confirm,
        } => {
            let registration = snapline_core::auth::Registration {
                username,
                email,
                first_name,
                last_name,
                password,
                password_confirm,
            };
            commands::auth::register(&app, registration).await?
        }
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app)?,
        Commands::Feed { explore } => commands::feed::show(&app, explore).await?,
        Commands::Like { post_id } => commands::feed::like(&app, post_id).await?,
        Commands::Comment { post_id, text } => {
            commands::feed::comment(&app, post_id, &text).await?
        }
        Commands::Follow { user_id } => commands::feed::follow(&app, user_id, true).await?,
        Commands::Unfollow { user_id } => commands::feed::follow(&app, user_id, false).await?,
        Commands::Notifications { read, all } => {
            commands::notifications::list(&app, read, all).await?
        }
        Commands::Search { query } => commands::search::run(&app, query).await?,
        Commands::Profile { user_id, tab } => {
            commands::profile::show(&app, user_id, tab.into()).await?
        }
        Commands::UpdateProfile { bio, picture } => {
            commands::profile::update(&app, &bio, picture.as_deref()).await?
        }
        Commands::Stories { all } => commands::publish::stories(&app, all).await?,
        Commands::Post { image, caption } => {
            commands::publish::post(&app, &image, &caption).await?
        }
        Commands::Story { image, text } => commands::publish::story(&app, &image, &text).await?,
        Commands::Watch => commands::notifications::watch(&app).await?,
    }

    Ok(())
}
