pub mod commands;
pub mod io;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use feedtune_core::config::{ClassifierPreset, LogFormat};

use crate::commands::audit::AuditArgs;
use crate::commands::optimize::OptimizeArgs;
use crate::commands::InputPaths;
use crate::io::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "feedtune",
    about = "Feedtune product feed optimizer",
    long_about = "Rewrite merchant feed titles and descriptions from keyword ranking data, \
                  audit feed readiness, and inspect effective configuration.",
    after_help = "Examples:\n  feedtune optimize --products feed.csv --keywords ranks.csv --output optimized.csv\n  feedtune audit --products feed.csv --keywords ranks.csv --json\n  feedtune config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to feedtune.toml (must exist when given)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level for this invocation")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Override logging.format (compact|pretty|json)")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct InputArgs {
    #[arg(long, help = "Product feed (csv, tsv, json or jsonl)")]
    products: PathBuf,
    #[arg(long, help = "Keyword ranking export")]
    keywords: Option<PathBuf>,
    #[arg(long, help = "Site crawl export used for status and length checks")]
    crawl: Option<PathBuf>,
}

impl InputArgs {
    fn into_paths(self) -> InputPaths {
        InputPaths { products: self.products, keywords: self.keywords, crawl: self.crawl }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Optimize every product and write the joined export")]
    Optimize {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long, help = "Export destination")]
        output: PathBuf,
        #[arg(long, value_enum, help = "Export format; defaults to the output extension")]
        format: Option<OutputFormat>,
        #[arg(long, help = "Brand appended to synthesized titles")]
        brand: Option<String>,
        #[arg(long, help = "Easy-win threshold preset (standard|high_volume)")]
        preset: Option<ClassifierPreset>,
        #[arg(long, help = "Process products on one thread")]
        sequential: bool,
    },
    #[command(about = "Report feed field coverage and keyword readiness")]
    Audit {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.config.as_deref(), cli.log_level.clone(), cli.log_format);

    let result = match cli.command {
        Command::Optimize { inputs, output, format, brand, preset, sequential } => {
            commands::optimize::run(&OptimizeArgs {
                inputs: inputs.into_paths(),
                output,
                format,
                config: cli.config,
                brand,
                preset,
                sequential,
            })
        }
        Command::Audit { inputs, json } => commands::audit::run(&AuditArgs {
            inputs: inputs.into_paths(),
            config: cli.config,
            json,
        }),
        Command::Config => commands::config::run(cli.config.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
