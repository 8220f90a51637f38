use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::classify::MemberBuckets;
use crate::error::RecordDiagnostic;
use crate::facade::Outcome;
use crate::models::{Bucket, NormalizedMember, PublicationType};
use crate::window::{Window, WindowSummary};

/// Whole totals print without decimals, fractional ones with two.
pub fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{total:.0}")
    } else {
        format!("{total:.2}")
    }
}

fn member_line(member: &NormalizedMember) -> String {
    match &member.designation {
        Some(designation) => format!(
            "{} ({}) - {}",
            member.full_name(),
            member.email,
            designation
        ),
        None => format!("{} ({})", member.full_name(), member.email),
    }
}

/// Plain-text listing of the buckets, used by the `roster` command.
pub fn render_roster(buckets: &MemberBuckets, only: Option<Bucket>) -> String {
    let mut output = String::new();

    for bucket in Bucket::ALL {
        if only.is_some_and(|only| only != bucket) {
            continue;
        }
        let members = buckets.get(bucket);
        if members.is_empty() && only.is_none() {
            continue;
        }

        let _ = writeln!(output, "{} ({})", bucket.title(), members.len());
        for member in members {
            let _ = writeln!(output, "- {}", member_line(member));
        }
    }

    if output.is_empty() {
        let _ = writeln!(output, "No members matched.");
    }

    output
}

/// Markdown table of per-type totals, one column per window.
pub fn render_summary_table(summary: &WindowSummary) -> String {
    let mut output = String::new();

    let header: Vec<&str> = Window::ALL.iter().map(|window| window.label()).collect();
    let _ = writeln!(output, "| Type | {} |", header.join(" | "));
    let _ = writeln!(output, "|---{}|", "|---:".repeat(Window::ALL.len()));

    for kind in PublicationType::ALL {
        let cells: Vec<String> = Window::ALL
            .iter()
            .map(|window| format_total(summary.get(*window, kind)))
            .collect();
        let _ = writeln!(output, "| {} | {} |", kind.label(), cells.join(" | "));
    }

    let totals: Vec<String> = Window::ALL
        .iter()
        .map(|window| format_total(summary.window_total(*window)))
        .collect();
    let _ = writeln!(output, "| **Total** | {} |", totals.join(" | "));

    output
}

fn write_diagnostics(output: &mut String, heading: &str, diagnostics: &[RecordDiagnostic]) {
    let _ = writeln!(output, "### {heading}");
    if diagnostics.is_empty() {
        let _ = writeln!(output, "None.");
    } else {
        for diagnostic in diagnostics {
            let _ = writeln!(output, "- {diagnostic}");
        }
    }
}

pub fn build_report(
    members: &Outcome<MemberBuckets>,
    publications: &Outcome<WindowSummary>,
    now: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Lab Roster Report");
    let _ = writeln!(output, "Generated as of {}", now.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster");

    if members.value.is_empty() {
        let _ = writeln!(output, "No members to list.");
    } else {
        for (bucket, count) in members.value.counts() {
            if count == 0 {
                continue;
            }
            let _ = writeln!(output);
            let _ = writeln!(output, "### {} ({})", bucket.title(), count);
            for member in members.value.get(bucket) {
                let _ = writeln!(output, "- {}", member_line(member));
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Publication Statistics");
    let _ = writeln!(output);
    output.push_str(&render_summary_table(&publications.value));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skipped Records");
    let _ = writeln!(output);
    write_diagnostics(&mut output, "Members", &members.diagnostics);
    let _ = writeln!(output);
    write_diagnostics(&mut output, "Publications", &publications.diagnostics);

    output
}
