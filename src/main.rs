mod api_client;
mod cli;
mod config;
mod controller;
mod errors;
mod filter;
mod logging;
mod models;
mod notify;
mod render;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::api_client::ApiClient;
use crate::cli::{Cli, Cmd};
use crate::config::AppConfig;
use crate::controller::Controller;
use crate::errors::ClientError;
use crate::models::WorkoutDraft;
use crate::notify::TerminalNotifier;
use crate::render::{filter_and_render, render_stats, render_workouts};
use crate::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    let client = ApiClient::new(&config.api_base_url)
        .with_context(|| format!("Invalid API URL {}", config.api_base_url))?;
    debug!(api = %client.base_url(), session = %config.session_db_path, "configuration loaded");
    let session = SessionStore::open(&config.session_db_path)
        .with_context(|| format!("Failed to open session store {}", config.session_db_path))?;

    let mut app = Controller::new(client, session, TerminalNotifier);
    app.set_period(config.default_period);

    let outcome = match app.restore_session() {
        Ok(_) => run(cli.cmd, &mut app, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = outcome {
        // Client errors were already shown to the user as a notification.
        match e.downcast_ref::<ClientError>() {
            Some(client_err) => debug!(status = ?client_err.status(), "command failed"),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cmd: Cmd, app: &mut Controller<TerminalNotifier>, config: &AppConfig) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let options = config.render_options();

    match cmd {
        Cmd::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            app.login(&username, &password).await?;
        }
        Cmd::Register {
            username,
            email,
            password,
        } => {
            let (password, confirm) = match password {
                Some(p) => (p.clone(), p),
                None => (
                    rpassword::prompt_password("Password: ")?,
                    rpassword::prompt_password("Confirm password: ")?,
                ),
            };
            app.register(&username, &email, &password, &confirm).await?;
        }
        Cmd::Logout => app.logout()?,
        Cmd::Whoami => match app.state().current_user() {
            Some(user) => match &user.email {
                Some(email) => println!("{} <{}>", user.username, email),
                None => println!("{}", user.username),
            },
            None if app.is_signed_in() => println!("Signed in (user details unavailable)"),
            None => println!("Not logged in"),
        },
        Cmd::List(args) => {
            app.load_workouts().await?;
            let criteria = args.criteria(config.default_filter_days, today);
            debug!(?criteria, active = !criteria.is_empty(), "filtering workouts");
            for card in filter_and_render(app.state().workouts(), &criteria, &options) {
                println!("{}", card);
            }
        }
        Cmd::Show { id } => {
            let workout = app.fetch_workout(id).await?;
            for card in render_workouts(std::slice::from_ref(&workout), &options) {
                println!("{}", card);
            }
        }
        Cmd::Add(args) => {
            let created = app.add_workout(&args.into_draft(today)).await?;
            for card in render_workouts(&[created], &options) {
                println!("{}", card);
            }
        }
        Cmd::Edit { id, changes } => {
            app.load_workouts().await?;
            let current = WorkoutDraft::from(app.workout(id)?);
            let updated = app.update_workout(id, &changes.apply(current)).await?;
            for card in render_workouts(&[updated], &options) {
                println!("{}", card);
            }
        }
        Cmd::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete workout #{}?", id))? {
                println!("Cancelled");
                return Ok(());
            }
            app.delete_workout(id).await?;
        }
        Cmd::Stats { period } => {
            if let Some(period) = period {
                app.set_period(period);
            }
            app.load_stats().await?;
            println!("Statistics ({})", app.period());
            for card in render_stats(app.state().stats()) {
                println!("{}", card);
            }
        }
        Cmd::Health => {
            let health = app.health().await?;
            println!(
                "{} {} ({})",
                health.service.as_deref().unwrap_or("server"),
                health.version.as_deref().unwrap_or("?"),
                health.status
            );
        }
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
