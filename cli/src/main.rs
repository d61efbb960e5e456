use clap::{Parser, Subcommand};
use respawn_cli::CliContext;
use respawn_cli::commands::{self, ModeArg, SettingsUpdate, SortArg};
use respawn_cli::{logging, readline, ticker};
use respawn_core::{AppConfig, AppConfigExt};
use std::io::Write;

/// Process arguments (the REPL commands are parsed separately per line)
#[derive(Parser)]
#[command(version, about = "Boss respawn timer tracker")]
struct Args {
    /// Keep state in memory only
    #[arg(long)]
    ephemeral: bool,
    /// Override the configured data directory
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = AppConfig::load();
    if let Some(dir) = args.data_dir {
        config.data_directory = dir;
    }
    let _log_guard = logging::init(&config.resolved_data_directory());

    let ctx = CliContext::new(config, args.ephemeral);
    let ticker = ticker::spawn_ticker(&ctx).await;
    ctx.tasks.lock().await.ticker = Some(ticker);

    commands::list(&ctx).await?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.tasks.lock().await.abort_all();
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "respawn")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Selected bosses, most urgent first
    List,
    /// The selection list
    Bosses {
        #[arg(short, long, value_enum, default_value = "default")]
        sort: SortArg,
        #[arg(long, default_value = "")]
        search: String,
    },
    Kill {
        target: String,
    },
    Cancel {
        target: String,
    },
    /// Fix a timer by time remaining or by kill time; no values cancels
    Correct {
        target: String,
        #[arg(short, long, value_enum, default_value = "remaining")]
        mode: ModeArg,
        #[arg(long)]
        hours: Option<u32>,
        #[arg(long)]
        minutes: Option<u32>,
    },
    Add {
        name: String,
        #[arg(long)]
        hours: Option<String>,
        #[arg(long)]
        minutes: Option<String>,
    },
    Delete {
        target: String,
    },
    Move {
        from: usize,
        to: usize,
    },
    Select {
        target: String,
    },
    Deselect {
        target: String,
    },
    SelectAll,
    SelectNone,
    Include {
        target: String,
    },
    Exclude {
        target: String,
    },
    /// Merge the bundled boss list
    Sync,
    Export {
        #[arg(short, long)]
        path: Option<String>,
    },
    Import {
        path: String,
    },
    Share {
        /// Page URL to attach the token to
        #[arg(long)]
        base: Option<String>,
    },
    ApplyShare {
        token: String,
    },
    Settings,
    Set {
        #[arg(long)]
        notify_respawn: Option<bool>,
        #[arg(long)]
        notify_countdown: Option<bool>,
        #[arg(long)]
        threshold: Option<u32>,
        #[arg(long)]
        float_buffer: Option<bool>,
        #[arg(long)]
        float_minutes: Option<u32>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        bell: Option<bool>,
    },
    Resume,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting\n")?;
    args.insert(0, "respawn".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::List) => commands::list(ctx).await?,
        Some(Commands::Bosses { sort, search }) => commands::bosses(ctx, sort, &search).await?,
        Some(Commands::Kill { target }) => commands::kill(ctx, &target).await?,
        Some(Commands::Cancel { target }) => commands::cancel(ctx, &target).await?,
        Some(Commands::Correct {
            target,
            mode,
            hours,
            minutes,
        }) => commands::correct(ctx, &target, mode, hours, minutes).await?,
        Some(Commands::Add {
            name,
            hours,
            minutes,
        }) => commands::add(ctx, &name, hours.as_deref(), minutes.as_deref()).await?,
        Some(Commands::Delete { target }) => commands::delete(ctx, &target).await?,
        Some(Commands::Move { from, to }) => commands::move_boss(ctx, from, to).await?,
        Some(Commands::Select { target }) => commands::select(ctx, &target, true).await?,
        Some(Commands::Deselect { target }) => commands::select(ctx, &target, false).await?,
        Some(Commands::SelectAll) => commands::select_all(ctx, true).await?,
        Some(Commands::SelectNone) => commands::select_all(ctx, false).await?,
        Some(Commands::Include { target }) => commands::include(ctx, &target, true).await?,
        Some(Commands::Exclude { target }) => commands::include(ctx, &target, false).await?,
        Some(Commands::Sync) => commands::sync(ctx).await?,
        Some(Commands::Export { path }) => commands::export(ctx, path.as_deref()).await?,
        Some(Commands::Import { path }) => commands::import(ctx, &path).await?,
        Some(Commands::Share { base }) => commands::share(ctx, base.as_deref()).await?,
        Some(Commands::ApplyShare { token }) => commands::apply_share(ctx, &token).await?,
        Some(Commands::Settings) => commands::show_settings(ctx).await?,
        Some(Commands::Set {
            notify_respawn,
            notify_countdown,
            threshold,
            float_buffer,
            float_minutes,
            notifications,
            bell,
        }) => {
            let update = SettingsUpdate {
                notify_respawn,
                notify_countdown,
                threshold,
                float_buffer,
                float_minutes,
                notifications,
                bell,
            };
            commands::set(ctx, update).await?
        }
        Some(Commands::Resume) => commands::resume(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
