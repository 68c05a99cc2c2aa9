use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use feedtune_cli::commands::audit::{self, AuditArgs};
use feedtune_cli::commands::optimize::{self, OptimizeArgs};
use feedtune_cli::commands::{config, InputPaths};
use feedtune_cli::io::{read_rows, OutputFormat};
use serde_json::Value;
use tempfile::TempDir;

const PRODUCTS: &str = "\
id,title,description,price,link
SOFA-1,3 Seater Fabric Sofa Grey,Comfortable sofa.,899.00,https://shop.example/sofa
TABLE-1,Solid Oak Coffee Table,,249.00,https://shop.example/table
";

const KEYWORDS: &str = "\
Keyword,Position,Search Volume,Keyword Difficulty
grey fabric sofa,45,\"1,800\",25
scented candle,3,400,10
";

const CRAWL: &str = "\
Address,Status Code,Title 1 Length
https://shop.example/sofa/,404,25
";

fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture should be writable");
    path
}

fn optimize_args(dir: &TempDir, output: &str) -> OptimizeArgs {
    OptimizeArgs {
        inputs: InputPaths {
            products: fixture(dir, "products.csv", PRODUCTS),
            keywords: Some(fixture(dir, "keywords.csv", KEYWORDS)),
            crawl: None,
        },
        output: dir.path().join(output),
        ..OptimizeArgs::default()
    }
}

fn exported(path: &Path) -> Vec<Vec<(String, String)>> {
    read_rows(path).expect("export should be readable")
}

fn cell<'a>(row: &'a [(String, String)], column: &str) -> &'a str {
    row.iter()
        .find(|(name, _)| name == column)
        .map(|(_, value)| value.as_str())
        .unwrap_or_else(|| panic!("missing column {column}"))
}

#[test]
fn optimize_writes_csv_export_in_product_order() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = optimize_args(&dir, "optimized.csv");

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 0, "expected successful optimize: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "optimize");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().expect("message");
        assert!(message.contains("2 products"), "{message}");
        assert!(message.contains("1 keyword-driven, 1 fallback"), "{message}");

        let rows = exported(&args.output);
        assert_eq!(rows.len(), 2);
        assert_eq!(cell(&rows[0], "id"), "SOFA-1");
        assert_eq!(cell(&rows[0], "title"), "Grey Fabric Sofa | 3 Seater Fabric Sofa Grey");
        assert_eq!(cell(&rows[0], "current_title"), "3 Seater Fabric Sofa Grey");
        assert_eq!(cell(&rows[0], "price"), "899.00");
        assert_eq!(cell(&rows[0], "priority_score"), "70");
        assert_eq!(cell(&rows[0], "expected_impact"), "HIGH");

        assert_eq!(cell(&rows[1], "product_id"), "TABLE-1");
        assert_eq!(cell(&rows[1], "optimized_title"), "Oak Coffee Table | Solid Oak Coffee Table");
        assert!(cell(&rows[1], "title_reasoning").starts_with("No relevant keywords found"));
    });
}

#[test]
fn optimize_output_extension_selects_json() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = optimize_args(&dir, "optimized.json");

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let raw = fs::read_to_string(&args.output).expect("json export");
        let records: Value = serde_json::from_str(&raw).expect("valid json");
        let records = records.as_array().expect("array of records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["product_id"], "SOFA-1");
        assert_eq!(records[0]["expected_impact"], "HIGH");
    });
}

#[test]
fn explicit_format_overrides_extension() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = OptimizeArgs {
            format: Some(OutputFormat::Json),
            ..optimize_args(&dir, "optimized.out")
        };

        assert_eq!(optimize::run(&args).exit_code, 0);
        let raw = fs::read_to_string(&args.output).expect("export");
        assert!(raw.trim_start().starts_with('['));
    });
}

#[test]
fn crawl_status_adds_to_the_priority_score() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = optimize_args(&dir, "optimized.csv");
        args.inputs.crawl = Some(fixture(&dir, "crawl.csv", CRAWL));

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let rows = exported(&args.output);
        assert_eq!(cell(&rows[0], "priority_score"), "80");
        assert!(cell(&rows[0], "title_reasoning").contains("HTTP 404"));
        assert_eq!(cell(&rows[1], "priority_score"), "40");
    });
}

#[test]
fn brand_from_env_is_appended_to_synthesized_titles() {
    with_env(&[("FEEDTUNE_REWRITE_BRAND", "Oakland")], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = optimize_args(&dir, "optimized.csv");

        assert_eq!(optimize::run(&args).exit_code, 0);
        let rows = exported(&args.output);
        assert_eq!(
            cell(&rows[1], "optimized_title"),
            "Oak Coffee Table | Solid Oak Coffee Table | Oakland"
        );
    });
}

#[test]
fn sequential_and_parallel_exports_match() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let parallel = optimize_args(&dir, "parallel.csv");
        let sequential = OptimizeArgs { sequential: true, ..optimize_args(&dir, "sequential.csv") };

        assert_eq!(optimize::run(&parallel).exit_code, 0);
        assert_eq!(optimize::run(&sequential).exit_code, 0);
        assert_eq!(exported(&parallel.output), exported(&sequential.output));
    });
}

#[test]
fn optimize_without_keywords_runs_fallback_only() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = OptimizeArgs {
            inputs: InputPaths {
                products: fixture(&dir, "products.csv", PRODUCTS),
                keywords: None,
                crawl: None,
            },
            output: dir.path().join("optimized.csv"),
            ..OptimizeArgs::default()
        };

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 0, "{}", result.output);
        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("0 keyword-driven, 2 fallback"), "{message}");
    });
}

#[test]
fn optimize_reports_missing_products_as_input_failure() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = OptimizeArgs {
            inputs: InputPaths {
                products: dir.path().join("absent.csv"),
                keywords: None,
                crawl: None,
            },
            output: dir.path().join("optimized.csv"),
            ..OptimizeArgs::default()
        };

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 3, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "optimize");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
        assert!(!args.output.exists());
    });
}

#[test]
fn optimize_reports_unwritable_output_as_export_failure() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = OptimizeArgs {
            output: dir.path().join("missing-dir").join("optimized.csv"),
            ..optimize_args(&dir, "unused.csv")
        };

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 5);
        assert_eq!(parse_payload(&result.output)["error_class"], "export");
    });
}

#[test]
fn optimize_returns_config_failure_for_invalid_env() {
    with_env(&[("FEEDTUNE_RUNTIME_PARALLEL", "sometimes")], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = optimize::run(&optimize_args(&dir, "optimized.csv"));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn explicit_config_path_must_exist() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = OptimizeArgs {
            config: Some(dir.path().join("feedtune.toml")),
            ..optimize_args(&dir, "optimized.csv")
        };

        let result = optimize::run(&args);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn config_file_settings_reach_the_rewriter() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = fixture(&dir, "feedtune.toml", "[rewrite]\ndelimiter = \" - \"\n");
        let args =
            OptimizeArgs { config: Some(config_path), ..optimize_args(&dir, "optimized.csv") };

        assert_eq!(optimize::run(&args).exit_code, 0);
        let rows = exported(&args.output);
        assert_eq!(cell(&rows[0], "title"), "Grey Fabric Sofa - 3 Seater Fabric Sofa Grey");
    });
}

#[test]
fn audit_json_reports_readiness_and_field_coverage() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = AuditArgs {
            inputs: InputPaths {
                products: fixture(&dir, "products.csv", PRODUCTS),
                keywords: Some(fixture(&dir, "keywords.csv", KEYWORDS)),
                crawl: Some(fixture(&dir, "crawl.csv", CRAWL)),
            },
            config: None,
            json: true,
        };

        let result = audit::run(&args);
        assert_eq!(result.exit_code, 0);

        let report = parse_payload(&result.output);
        assert_eq!(report["readiness"], "ready");
        assert_eq!(report["audit"]["products"], 2);
        assert_eq!(report["audit"]["keywords"], 2);
        assert_eq!(report["audit"]["crawl_matched_products"], 1);

        let description = report["audit"]["fields"]
            .as_array()
            .and_then(|fields| fields.iter().find(|field| field["field"] == "description"))
            .expect("description coverage");
        assert_eq!(description["present"], true);
        assert_eq!(description["blank"], 1);
    });
}

#[test]
fn audit_without_keywords_is_partial() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = AuditArgs {
            inputs: InputPaths {
                products: fixture(&dir, "products.csv", PRODUCTS),
                keywords: None,
                crawl: None,
            },
            config: None,
            json: false,
        };

        let result = audit::run(&args);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("audit: partial"));
        assert!(result.output.contains("- [skip] crawl: no crawl export supplied"));
        assert!(result.output.contains("- [warn] field.category: column `category` not found"));
    });
}

#[test]
fn config_reports_env_and_file_sources() {
    with_env(&[("FEEDTUNE_LOG_LEVEL", "debug")], || {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = fixture(&dir, "feedtune.toml", "[matching]\nmin_shared_words = 3\n");

        let result = config::run(Some(&config_path));
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let output = result.output;
        assert!(output.starts_with("effective config (source precedence: env > file > default):"));
        assert!(output.contains("- logging.level = debug (source: env (FEEDTUNE_LOG_LEVEL))"));
        assert!(output.contains(&format!(
            "- matching.min_shared_words = 3 (source: file ({}))",
            config_path.display()
        )));
        assert!(output.contains("- matching.min_search_volume = 1 (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("FEEDTUNE_LOGGING_FORMAT", "xml")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "FEEDTUNE_MATCHING_MIN_SEARCH_VOLUME",
        "FEEDTUNE_MATCHING_USE_INDEX",
        "FEEDTUNE_CLASSIFIER_PRESET",
        "FEEDTUNE_REWRITE_BRAND",
        "FEEDTUNE_REWRITE_DELIMITER",
        "FEEDTUNE_RUNTIME_PARALLEL",
        "FEEDTUNE_LOGGING_LEVEL",
        "FEEDTUNE_LOGGING_FORMAT",
        "FEEDTUNE_LOG_LEVEL",
        "FEEDTUNE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
