//! `pinauth audit` — display the audit log.
//!
//! Usage:
//!   pinauth audit               # show last 50 entries
//!   pinauth audit --last 20     # show last 20
//!   pinauth audit --since 7d    # entries from last 7 days

use chrono::{TimeDelta, Utc};

use crate::cli::Cli;
use crate::errors::{PinAuthError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{load_settings, output};

    let settings = load_settings(cli)?;

    let audit = AuditLog::open(settings.state_dir())
        .ok_or_else(|| PinAuthError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command.
#[cfg(not(feature = "audit-log"))]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let _ = (cli, last, since);
    Err(PinAuthError::AuditError(
        "audit log not compiled — rebuild with `cargo build --features audit-log`".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
#[cfg_attr(not(feature = "audit-log"), allow(dead_code))]
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(PinAuthError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        PinAuthError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => TimeDelta::try_days(num),
        'h' => TimeDelta::try_hours(num),
        _ => TimeDelta::try_minutes(num),
    };

    duration
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .ok_or_else(|| {
            PinAuthError::CommandFailed(format!("duration '{input}' is out of range"))
        })
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "User", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.operation, entry.details.as_deref());
        let user = entry.username.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![time, op, user.to_string(), details.to_string()]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display; failed logins show in red.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str, details: Option<&str>) -> String {
    use console::style;

    match (op, details) {
        ("authenticate", Some("accepted")) => style(op).green().to_string(),
        ("authenticate", _) => style(op).red().to_string(),
        ("add", _) => style(op).green().to_string(),
        ("update", _) => style(op).blue().to_string(),
        ("remove", _) => style(op).red().to_string(),
        ("reset", _) => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
