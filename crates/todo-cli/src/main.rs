use std::io::{self, Write};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use todo_client::{ClientError, TodoClient};
use todo_core::{Config, TodoDraft, TodoItem};
use todo_session::{AuthView, FileTodoStorage, Screen, TodoSessionManager, ViewEvent, ViewState};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo list client - local board or remote backend")]
#[command(version)]
struct Cli {
    /// Remote backend URL; overrides config.toml
    #[arg(long, env = "TODO_API_BASE")]
    server_url: Option<String>,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account on the backend
    Register {
        /// Account email
        email: String,
    },
    /// Log in and store the session token
    Login {
        /// Account email
        email: String,
    },
    /// Drop the stored session
    Logout,
    /// Show session status
    Whoami,
    /// Show todo lists
    Lists,
    /// Create a todo list
    NewList {
        /// List name
        name: String,
    },
    /// Delete a todo list
    DropList {
        /// List id
        id: Uuid,
    },
    /// Add a todo item
    Add {
        /// Item title
        title: String,
        /// Item description
        #[arg(long, short, default_value = "")]
        description: String,
        /// List to add the item to
        #[arg(long, short)]
        list: Option<Uuid>,
        /// Due time (RFC 3339)
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Mark an item complete
    Done {
        /// Item id
        id: Uuid,
    },
    /// Delete an item
    Rm {
        /// Item id
        id: Uuid,
    },
    /// Show the board
    Show {
        /// Show the completed screen instead of the active one
        #[arg(long, default_value = "false")]
        completed: bool,
        /// Only items in this list (remote mode)
        #[arg(long, short)]
        list: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // One subscriber for both: `log` records (client crate) are bridged in,
    // `tracing` events (session crate) land directly. RUST_LOG filters.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    let api_base = cli
        .server_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.api_base.clone());

    if cli.debug {
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
        eprintln!(
            "{}",
            format!("[DEBUG] Data dir: {:?}", config.data_dir()).dimmed()
        );
    }

    if api_base.trim().is_empty() {
        run_local(&config, cli.command).await
    } else {
        if cli.debug {
            eprintln!("{}", format!("[DEBUG] Server URL: {}", api_base).dimmed());
        }
        let client = TodoClient::new(api_base, config.data_dir());
        run_remote(&client, cli.command).await
    }
}

// ---------------------------------------------------------------------------
// Remote mode
// ---------------------------------------------------------------------------

async fn run_remote(client: &TodoClient, command: Commands) -> anyhow::Result<()> {
    let result = match command {
        Commands::Register { email } => {
            let password = prompt_password()?;
            client.register(&email, &password).await.map(|_| {
                println!("{}", format!("✅ Registered {email}, you can log in now").green());
            })
        }
        Commands::Login { email } => {
            let mut view = ViewState::new();
            view.handle_event(ViewEvent::LoginStarted);

            let password = prompt_password()?;
            match client.login(&email, &password).await {
                Ok(session) => {
                    view.handle_event(ViewEvent::LoginSucceeded);
                    match session.expires_at {
                        Some(exp) => println!(
                            "{}",
                            format!("✅ Logged in as {email} (token expires at {exp})").green()
                        ),
                        None => println!("{}", format!("✅ Logged in as {email}").green()),
                    }
                    Ok(())
                }
                Err(e) => {
                    view.handle_event(ViewEvent::LoginFailed);
                    Err(e)
                }
            }
        }
        Commands::Logout => client.logout().map(|_| {
            println!("{}", "👋 Logged out".cyan());
        }),
        Commands::Whoami => {
            let auth = match client.current_session() {
                Some(session) if session.is_valid() => AuthView::Authenticated,
                _ => AuthView::Anonymous,
            };
            match auth {
                AuthView::Authenticated => println!("{}", "✅ Logged in".green()),
                _ => println!("{}", "Not logged in".yellow()),
            }
            Ok(())
        }
        Commands::Lists => match client.lists().await {
            Ok(lists) => {
                if lists.is_empty() {
                    println!("{}", "No lists yet".dimmed());
                }
                for list in lists {
                    println!("{}  {}", list.id.to_string().dimmed(), list.name.bold());
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::NewList { name } => client.create_list(&name).await.map(|list| {
            println!("{}", format!("✅ Created list {} ({})", list.name, list.id).green());
        }),
        Commands::DropList { id } => client.delete_list(id).await.map(|_| {
            println!("{}", format!("🗑️  Deleted list {id}").cyan());
        }),
        Commands::Add {
            title,
            description,
            list,
            due,
        } => {
            let mut draft = TodoDraft::new(title, description);
            draft.list_id = list;
            // The backend expects a due time on every item
            draft.due_at = Some(due.unwrap_or_else(Utc::now));
            client.add_todo(draft).await.map(|item| {
                println!("{}", format!("✅ Added {} ({})", item.title, item.id).green());
            })
        }
        Commands::Done { id } => client.complete_todo(id).await.map(|item| {
            let stamp = item.completed_on().unwrap_or_default();
            println!("{}", format!("✅ Completed {} on {stamp}", item.title).green());
        }),
        Commands::Rm { id } => client.delete_todo(id).await.map(|_| {
            println!("{}", format!("🗑️  Deleted {id}").cyan());
        }),
        Commands::Show { completed, list } => match client.todos(list).await {
            Ok(items) => {
                let screen = screen_for(completed);
                let (active, done): (Vec<_>, Vec<_>) =
                    items.into_iter().partition(|i| !i.is_completed());
                match screen {
                    Screen::Active => render_items(&active, screen),
                    Screen::Completed => render_items(&done, screen),
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        surface_client_error(e);
    }
    Ok(())
}

fn surface_client_error(err: ClientError) {
    log::error!("{err}");
    println!("{}", format!("❌ {err}").red());
    if matches!(
        err,
        ClientError::TokenExpired | ClientError::NotAuthenticated
    ) {
        println!("{}", "Run `todo login <email>` to authenticate.".yellow());
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim().to_string())
}

// ---------------------------------------------------------------------------
// Local mode
// ---------------------------------------------------------------------------

async fn run_local(config: &Config, command: Commands) -> anyhow::Result<()> {
    let storage = FileTodoStorage::new(config.data_dir());
    let manager = TodoSessionManager::new(storage).await?;

    match command {
        Commands::Register { .. }
        | Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Lists
        | Commands::NewList { .. }
        | Commands::DropList { .. } => {
            println!("{}", "❌ This command needs a remote backend".red());
            println!(
                "{}",
                "Pass --server <url> or set api_base in config.toml.".yellow()
            );
        }
        Commands::Add {
            title,
            description,
            list,
            due,
        } => {
            let mut draft = TodoDraft::new(title, description);
            draft.list_id = list;
            draft.due_at = due;
            let item = manager.add_todo(draft).await?;
            println!("{}", format!("✅ Added {} ({})", item.title, item.id).green());
        }
        Commands::Done { id } => {
            let item = manager.complete_todo(id).await?;
            let stamp = item.completed_on().unwrap_or_default();
            println!("{}", format!("✅ Completed {} on {stamp}", item.title).green());
        }
        Commands::Rm { id } => {
            let item = manager.delete_todo(id).await?;
            println!("{}", format!("🗑️  Deleted {}", item.title).cyan());
        }
        Commands::Show { completed, .. } => {
            let board = manager.board().await;
            let screen = screen_for(completed);
            match screen {
                Screen::Active => render_items(&board.active.iter().collect::<Vec<_>>(), screen),
                Screen::Completed => {
                    render_items(&board.completed.iter().collect::<Vec<_>>(), screen)
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn screen_for(completed: bool) -> Screen {
    let mut view = ViewState::new();
    if completed {
        view.handle_event(ViewEvent::ShowCompleted);
    }
    view.screen
}

fn render_items<I: std::borrow::Borrow<TodoItem>>(items: &[I], screen: Screen) {
    let heading = match screen {
        Screen::Active => "📋 My Todos",
        Screen::Completed => "✅ Completed",
    };
    println!("{}", heading.cyan().bold());

    if items.is_empty() {
        println!("{}", "Nothing here".dimmed());
        return;
    }

    for item in items {
        let item = item.borrow();
        println!("{}  {}", item.id.to_string().dimmed(), item.title.bold());
        if !item.description.is_empty() {
            println!("    {}", item.description);
        }
        if let Some(stamp) = item.completed_on() {
            println!("    {}", format!("Completed on: {stamp}").green());
        }
    }
}
