//! Non-interactive commands run from the shell instead of the TUI.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use futures::future;

use runai_core::api::ApiClient;
use runai_core::auth::SessionStore;
use runai_core::config::{Config, StorageBackend};
use runai_core::forms::{AuthForm, AuthMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Interactive,
    /// Interactive, but the session is kept in memory only
    Ephemeral,
    Login,
    Register,
    Logout,
    Status,
    Help,
    Unknown(String),
}

impl Command {
    /// Parse the arguments after the program name
    pub fn parse(args: &[String]) -> Self {
        match args.first().map(String::as_str) {
            None => Command::Interactive,
            Some("--ephemeral") => Command::Ephemeral,
            Some("--login") => Command::Login,
            Some("--register") => Command::Register,
            Some("--logout") => Command::Logout,
            Some("--status") => Command::Status,
            Some("--help") | Some("-h") => Command::Help,
            Some(other) => Command::Unknown(other.to_string()),
        }
    }
}

const USAGE: &str = "\
Usage: runai [COMMAND]

Without a command, starts the interactive terminal client.

Commands:
  --ephemeral  Start the client without saving the session to disk
  --login      Log in and save the session
  --register   Create an account and save the session
  --logout     Forget the saved session
  --status     Show the saved session and check the backend
  --help       Show this message

Environment:
  RUN_AI_API_URL   Backend URL (overrides the config file)
  RUST_LOG         Log level for runai.log (default: warn)";

pub async fn run(command: Command, mut config: Config) -> Result<()> {
    match command {
        Command::Interactive | Command::Ephemeral => Ok(()),
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Unknown(arg) => {
            eprintln!("{}", USAGE);
            bail!("Unknown argument: {}", arg)
        }
        Command::Login => authenticate(&mut config, AuthMode::Login).await,
        Command::Register => authenticate(&mut config, AuthMode::Register).await,
        Command::Logout => {
            let api = client(&config)?;
            api.logout();
            println!("Logged out.");
            Ok(())
        }
        Command::Status => status(&config).await,
    }
}

fn client(config: &Config) -> Result<ApiClient> {
    let session = SessionStore::initialize(config.open_store()?);
    ApiClient::with_timeout(&config.api_url(), session, config.request_timeout())
}

/// Prompt for credentials and run the exchange, validating them the same way
/// the login screen does.
async fn authenticate(config: &mut Config, mode: AuthMode) -> Result<()> {
    let api = client(config)?;

    let mut form = AuthForm::new(None);
    if form.mode != mode {
        form.toggle_mode();
    }

    let default_email = config.last_email.clone().unwrap_or_default();
    let prompt = if default_email.is_empty() {
        "Email: ".to_string()
    } else {
        format!("Email [{}]: ", default_email)
    };
    let typed = read_line(&prompt)?;
    form.email = if typed.trim().is_empty() {
        default_email
    } else {
        typed
    };
    form.password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let (email, password) = form.credentials()?;
    let result = match mode {
        AuthMode::Login => api.login(&email, &password).await,
        AuthMode::Register => api.register(&email, &password).await,
    };
    if let Err(e) = result {
        bail!("{}", e.user_message());
    }

    config.last_email = Some(email.clone());
    config.save().context("Failed to save config")?;
    println!("Logged in as {}.", email);
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Print the saved session and, when logged in, check the token against the
/// backend by fetching the profile and document list together.
async fn status(config: &Config) -> Result<()> {
    let api = client(config)?;
    println!("Backend: {}", api.base_url());

    let Some(email) = api.session().identity() else {
        println!("Not logged in.");
        return Ok(());
    };
    println!("Logged in as {}", email);

    let (profile, documents) = future::join(api.fetch_profile(), api.list_documents()).await;
    match profile {
        Ok(profile) => {
            let complete = profile.age.is_some() && profile.weight_kg.is_some();
            println!("Profile: {}", if complete { "filled in" } else { "incomplete" });
        }
        Err(e) => println!("Profile: {}", e.user_message()),
    }
    match documents {
        Ok(documents) => println!("Documents: {}", documents.len()),
        Err(e) => println!("Documents: {}", e.user_message()),
    }
    Ok(())
}

/// Apply the command's effect on the config used by the interactive client
pub fn prepare_config(command: &Command, config: &mut Config) {
    if *command == Command::Ephemeral {
        config.storage = StorageBackend::Memory;
    }
}
