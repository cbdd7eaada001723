use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use urlscope_core::{
    ApiClient, AppConfig, DecomposeForm, LoginForm, Navigation, RegisterForm, Route, RouteGuard,
    SessionAccessor, SubmissionState, TokenStore,
};

use crate::settings;
use crate::store::FileTokenStore;
use crate::transport::Transport;

/// Top-level CLI for the urlscope URL analysis client.
#[derive(Debug, Parser)]
#[command(name = "urlscope")]
#[command(
    about = "Split URLs into their components via the URL analysis API",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the analysis API (overrides config and URLSCOPE_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to config.toml (defaults to the XDG config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Sign in and store the credential token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account.
    Register {
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Must repeat the password.
        #[arg(long)]
        confirm: String,
    },

    /// Split a URL into scheme, host, port, path, query and fragment.
    Decompose {
        /// URL exactly as typed; validation happens server-side.
        url: String,
    },

    /// Forget the stored credential token.
    Logout,

    /// Show which page a navigation to PATH ends up on.
    Open {
        /// Route path, e.g. `/decompose`.
        path: String,
    },

    /// Ask the API how strong a password is.
    Strength { password: String },
}

/// Everything a command needs, resolved once per invocation.
struct AppContext {
    client: ApiClient,
    store: FileTokenStore,
    transport: Transport,
}

impl CliCommand {
    /// Exit code 2 means the request went through but the URL was rejected.
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let ctx = build_context(cli.config, cli.api_url)?;
        cli.command.run(&ctx)
    }

    fn run(self, ctx: &AppContext) -> Result<ExitCode> {
        let guard = RouteGuard::new(&ctx.store);
        match self {
            CliCommand::Login { email, password } => {
                if guard.navigate(Route::Login)? != Route::Login {
                    println!("Already signed in.");
                    return Ok(ExitCode::SUCCESS);
                }
                let mut form = LoginForm::new(ctx.client.clone());
                form.email = email;
                form.password = password;
                let req = form.submit()?;
                match form.resolve(ctx.transport.execute(&req), &ctx.store) {
                    Navigation::Redirect(to) => {
                        println!("Signed in. Continue at {to}.");
                        Ok(ExitCode::SUCCESS)
                    }
                    Navigation::Proceed => {
                        bail!(form.error().unwrap_or("sign-in failed").to_string())
                    }
                }
            }
            CliCommand::Register {
                fullname,
                email,
                password,
                confirm,
            } => {
                guard.navigate(Route::Register)?;
                let mut form = RegisterForm::new(ctx.client.clone());
                form.fullname = fullname;
                form.email = email;
                form.password = password;
                form.password_confirmation = confirm;
                if let Some(hint) = form.confirmation_error() {
                    bail!(hint);
                }
                let Some(req) = form.submit()? else {
                    bail!("fullname, email and password are required");
                };
                match form.resolve(ctx.transport.execute(&req)) {
                    Navigation::Redirect(to) => {
                        println!("{}", form.success().unwrap_or_default());
                        println!("Continue at {to}.");
                        Ok(ExitCode::SUCCESS)
                    }
                    Navigation::Proceed => {
                        bail!(form.error().unwrap_or("registration failed").to_string())
                    }
                }
            }
            CliCommand::Decompose { url } => {
                let landed = guard.navigate(Route::Decompose)?;
                if landed != Route::Decompose {
                    bail!("not signed in; redirected to {landed}. Run `urlscope login` first.");
                }
                let client = ctx.client.clone().with_bearer(ctx.store.token());
                let mut form = DecomposeForm::new(client);
                form.set_url(url);
                let state = form.run(|req| ctx.transport.execute(req))?;
                let failed = matches!(state, SubmissionState::Failure(_));
                print!("{}", form.view());
                Ok(if failed { ExitCode::from(2) } else { ExitCode::SUCCESS })
            }
            CliCommand::Logout => {
                ctx.store.clear()?;
                info!("signed out");
                println!("Signed out.");
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Open { path } => {
                let route = Route::from_path(&path)
                    .with_context(|| format!("no page at {path}"))?;
                let landed = guard.navigate(route)?;
                if landed == route {
                    println!("{landed}");
                } else {
                    println!("{route} -> {landed}");
                }
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Strength { password } => {
                let req = ctx.client.build_password_strength(&password)?;
                let result = ctx.client.parse_password_strength(ctx.transport.execute(&req))?;
                println!("{} (score {}/4)", result.strength, result.score);
                for suggestion in &result.suggestions {
                    println!("  - {suggestion}");
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_context(config: Option<PathBuf>, api_url: Option<String>) -> Result<AppContext> {
    let path = match config {
        Some(path) => path,
        None => settings::config_path()?,
    };
    let cfg: AppConfig = settings::load_or_init(&path)?;
    let cfg = settings::apply_overrides(cfg, std::env::var(settings::API_URL_ENV).ok(), api_url);
    info!(api = %cfg.api_base_url, config = %path.display(), "configuration loaded");

    let token_file = match &cfg.token_file {
        Some(path) => path.clone(),
        None => FileTokenStore::default_path()?,
    };

    Ok(AppContext {
        client: ApiClient::from_config(&cfg),
        store: FileTokenStore::new(token_file),
        transport: Transport::new(),
    })
}
