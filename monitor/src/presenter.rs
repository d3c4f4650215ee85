//! Terminal presenter.
//!
//! Renders a `PollingState` snapshot as plain text for `check` and `watch`.

use healthdash_common::types::{HealthRecord, PollingState, RouteStatus};
use std::fmt::{self, Write};

/// Render a snapshot.
pub fn render(state: &PollingState) -> String {
    let mut out = String::new();
    // String への書き込みは失敗しない
    write_state(&mut out, state).ok();
    out
}

fn write_state(out: &mut String, state: &PollingState) -> fmt::Result {
    if let Some(message) = state.backend_message() {
        writeln!(out, "{}\n", message)?;
    }

    render_health(out, state)?;
    out.push('\n');
    render_routes(out, state)?;

    if let Some(last_update) = state.last_update {
        writeln!(out, "\nLast update: {}", last_update.format("%H:%M:%S UTC"))?;
    }
    if state.is_refreshing() {
        writeln!(out, "(refreshing...)")?;
    }
    Ok(())
}

fn render_health(out: &mut String, state: &PollingState) -> fmt::Result {
    writeln!(out, "System status")?;

    match (&state.health_record, state.health_loading) {
        (None, true) => writeln!(out, "  checking..."),
        (None, false) => writeln!(out, "  failed to load health data"),
        (Some(record), _) => render_record(out, record),
    }
}

fn render_record(out: &mut String, record: &HealthRecord) -> fmt::Result {
    let verdict = if record.status.is_healthy() {
        "HEALTHY"
    } else {
        "UNHEALTHY"
    };
    writeln!(out, "  {}", verdict)?;

    for (service, state) in &record.services {
        writeln!(out, "  {:<12} {}", service, state)?;
    }

    if let Some(error) = &record.error {
        writeln!(out, "  error: {}", error)?;
        if record.http_status != 0 {
            writeln!(out, "  HTTP status: {}", record.http_status)?;
        }
    }

    for issue in &record.issues {
        writeln!(out, "  ! {}: {}", issue.service, issue.message)?;
        if let Some(detail) = &issue.error {
            writeln!(out, "      {}", detail)?;
        }
    }
    Ok(())
}

fn render_routes(out: &mut String, state: &PollingState) -> fmt::Result {
    let header = if state.routes_loading {
        "API routes (checking...)"
    } else {
        "API routes"
    };
    writeln!(out, "{}", header)?;

    if state.route_statuses.is_empty() {
        return writeln!(out, "  loading routes...");
    }

    for route in &state.route_statuses {
        render_route(out, route)?;
    }
    Ok(())
}

fn render_route(out: &mut String, route: &RouteStatus) -> fmt::Result {
    let mark = if route.is_healthy() { "ok " } else { "ERR" };
    let latency = route
        .result
        .response_time_ms
        .map(|ms| format!(" ({}ms)", ms))
        .unwrap_or_default();
    let code = match route.result.status_code {
        0 => String::new(),
        code => format!(" {}", code),
    };

    writeln!(
        out,
        "  {:<6} {:<14}{} [{}{}]",
        route.endpoint.method, route.endpoint.path, latency, mark, code
    )?;
    if let Some(error) = &route.result.error {
        writeln!(out, "         {}", error)?;
    }
    Ok(())
}
