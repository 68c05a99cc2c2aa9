use std::path::PathBuf;

use feedtune_core::{ConfigOverrides, FeedAudit, Readiness};
use serde::Serialize;

use super::{load_config, load_inputs, CommandResult, InputPaths};

const COMMAND: &str = "audit";

#[derive(Clone, Debug, Default)]
pub struct AuditArgs {
    pub inputs: InputPaths,
    pub config: Option<PathBuf>,
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Skipped,
}

#[derive(Debug, Serialize)]
struct AuditCheck {
    name: String,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct AuditReport {
    readiness: Readiness,
    summary: String,
    checks: Vec<AuditCheck>,
    audit: FeedAudit,
}

pub fn run(args: &AuditArgs) -> CommandResult {
    let audit = match load_config(args.config.as_deref(), ConfigOverrides::default())
        .and_then(|config| {
            let loaded = load_inputs(&args.inputs, &config.feed)?;
            Ok(FeedAudit::inspect(
                &loaded.products,
                &loaded.keywords,
                loaded.crawl.as_ref(),
                &config.feed,
            ))
        }) {
        Ok(audit) => audit,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let crawl_supplied = args.inputs.crawl.is_some();
    let report = build_report(audit, crawl_supplied);

    if args.json {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"readiness\":\"not_ready\",\"summary\":\"audit serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code: 0, output };
    }

    CommandResult { exit_code: 0, output: render_human(&report) }
}

fn build_report(audit: FeedAudit, crawl_supplied: bool) -> AuditReport {
    let mut checks = Vec::new();

    checks.push(AuditCheck {
        name: "products".to_owned(),
        status: if audit.products > 0 { CheckStatus::Pass } else { CheckStatus::Warn },
        details: format!("{} loaded", audit.products),
    });

    let usable_keywords = audit.keywords - audit.zero_volume_keywords;
    checks.push(AuditCheck {
        name: "keywords".to_owned(),
        status: if usable_keywords > 0 { CheckStatus::Pass } else { CheckStatus::Warn },
        details: format!(
            "{} loaded, {} ranking, {} with zero search volume",
            audit.keywords, audit.ranking_keywords, audit.zero_volume_keywords
        ),
    });

    checks.push(if crawl_supplied {
        AuditCheck {
            name: "crawl".to_owned(),
            status: if audit.crawl_matched_products > 0 {
                CheckStatus::Pass
            } else {
                CheckStatus::Warn
            },
            details: format!(
                "{} pages, {} products matched by url",
                audit.crawl_pages, audit.crawl_matched_products
            ),
        }
    } else {
        AuditCheck {
            name: "crawl".to_owned(),
            status: CheckStatus::Skipped,
            details: "no crawl export supplied".to_owned(),
        }
    });

    for field in &audit.fields {
        let (status, details) = match (field.present, field.blank) {
            (false, _) => (CheckStatus::Warn, format!("column `{}` not found", field.column)),
            (true, 0) => (CheckStatus::Pass, format!("column `{}` filled", field.column)),
            (true, blank) => (
                CheckStatus::Warn,
                format!("column `{}` blank for {blank} products", field.column),
            ),
        };
        checks.push(AuditCheck { name: format!("field.{}", field.field), status, details });
    }

    let summary = match audit.readiness {
        Readiness::Ready => "audit: ready for keyword-driven optimization".to_owned(),
        Readiness::Partial => {
            "audit: partial; no keywords with search volume, every product uses attribute extraction"
                .to_owned()
        }
        Readiness::NotReady => "audit: not ready; no products loaded".to_owned(),
    };

    AuditReport { readiness: audit.readiness, summary, checks, audit }
}

fn render_human(report: &AuditReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
