//! Configuration and connectivity diagnostics.

use anyhow::Result;
use console::style;
use serde::Serialize;

use chatdesk_core::auth::repository::UserRepository;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub version: &'static str,
    pub data_dir: String,
    pub database: String,
    pub database_ok: bool,
    pub users: u64,
    pub debug_mode: bool,
    pub api_key_exists: bool,
    pub api_key_length: usize,
    pub api_endpoint: String,
    pub model: String,
}

/// Gather diagnostics. Never includes the API key itself.
pub async fn gather(state: &AppState) -> CheckReport {
    let database_ok = state.db_pool.ping().await.is_ok();
    let users = state.auth.users().count_users().await.unwrap_or(0);
    let provider = state.chat.provider();

    CheckReport {
        version: env!("CARGO_PKG_VERSION"),
        data_dir: state.config.data_dir.display().to_string(),
        database: state.config.db_name.clone(),
        database_ok,
        users,
        debug_mode: state.config.debug,
        api_key_exists: provider.has_api_key(),
        api_key_length: provider.api_key_len(),
        api_endpoint: provider.endpoint(),
        model: state.chat.settings().model.clone(),
    }
}

/// Print diagnostics as styled text or JSON.
pub async fn check(state: &AppState, json: bool) -> Result<()> {
    let report = gather(state).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let yes_no = |ok: bool| {
        if ok {
            style("yes").green()
        } else {
            style("no").red()
        }
    };

    println!();
    println!("  {} chatdesk v{}", style("⚡").bold(), report.version);
    println!();

    println!("  {}", style("── API ──").dim());
    println!("  Key configured: {}", yes_no(report.api_key_exists));
    if report.api_key_exists {
        println!("  Key length:     {}", report.api_key_length);
    }
    println!("  Endpoint:       {}", style(&report.api_endpoint).cyan());
    println!("  Model:          {}", report.model);
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:   {}", style(&report.data_dir).dim());
    println!("  Database:   {} ({})", report.database, yes_no(report.database_ok));
    println!("  Users:      {}", style(report.users).bold());
    println!("  Debug mode: {}", report.debug_mode);
    println!();

    Ok(())
}
