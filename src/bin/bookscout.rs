use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use bookscout::ops::telemetry;
use bookscout::{
    AnalysisError, AnalysisResult, Analyzer, AnalyzerConfig, BrowserFetcher, FetchSettings,
    SnapshotFetcher,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Parser)]
#[command(name = "bookscout")]
#[command(author, version, about = "Score the market viability of a book topic", long_about = None)]
#[command(after_help = r#"Examples:
  bookscout "sourdough baking"                       Render the live search page
  bookscout cooking --html-file saved_search.html    Score a saved results page
  bookscout "keto" --sample-cap 10 --pretty
"#)]
struct Cli {
    /// Book topic to search for
    #[arg(value_name = "KEYWORD")]
    keyword: String,

    /// Read the results page from a saved HTML file instead of a browser
    #[arg(long, env = "BOOKSCOUT_HTML_FILE", value_name = "PATH")]
    html_file: Option<PathBuf>,

    /// Maximum number of listings sampled from the page
    #[arg(long, env = "BOOKSCOUT_SAMPLE_CAP")]
    sample_cap: Option<usize>,

    /// Drop listings whose title is shorter than this many characters
    #[arg(long, env = "BOOKSCOUT_MIN_TITLE_CHARS", value_name = "N")]
    min_title_chars: Option<usize>,

    /// Navigation timeout in milliseconds
    #[arg(long, env = "BOOKSCOUT_NAV_TIMEOUT_MS", value_name = "MS")]
    nav_timeout_ms: Option<u64>,

    /// Wait for the first listing in milliseconds
    #[arg(long, env = "BOOKSCOUT_CONTENT_TIMEOUT_MS", value_name = "MS")]
    content_timeout_ms: Option<u64>,

    /// Marketplace search endpoint
    #[arg(long, env = "BOOKSCOUT_MARKETPLACE_URL", value_name = "URL")]
    marketplace_url: Option<String>,

    /// Chrome/Chromium binary (auto-detected when omitted)
    #[arg(long, env = "BOOKSCOUT_CHROME_PATH", value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value = "json", env = "BOOKSCOUT_LOG_FORMAT")]
    log_format: LogFormat,

    /// Dump Prometheus metrics to stderr after the run
    #[arg(long)]
    print_metrics: bool,
}

impl Cli {
    fn config(&self) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::default();

        if let Some(cap) = self.sample_cap {
            config.sample_cap = cap;
        }
        if let Some(min) = self.min_title_chars {
            config.min_title_chars = min;
        }
        if let Some(url) = &self.marketplace_url {
            config.marketplace_url = url.clone();
        }
        if let Some(ms) = self.nav_timeout_ms {
            config.fetch.navigation_timeout_ms = ms;
        }
        if let Some(ms) = self.content_timeout_ms {
            config.fetch.content_timeout_ms = ms;
        }

        config
    }

    fn browser_fetcher(&self, settings: FetchSettings) -> BrowserFetcher {
        let fetcher = BrowserFetcher::new(settings);
        match &self.chrome_path {
            Some(path) => fetcher.with_chrome_executable(path.clone()),
            None => fetcher,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.log_format {
        LogFormat::Json => telemetry::init_tracing(),
        LogFormat::Pretty => telemetry::init_tracing_pretty(),
    }

    let config = cli.config();
    tracing::info!(keyword = %cli.keyword, snapshot = cli.html_file.is_some(), "bookscout starting");

    let outcome = match &cli.html_file {
        Some(path) => {
            Analyzer::with_config(SnapshotFetcher::new(path.clone()), config)
                .analyze(&cli.keyword)
                .await
        }
        None => {
            let fetcher = cli.browser_fetcher(config.fetch.clone());
            Analyzer::with_config(fetcher, config)
                .analyze(&cli.keyword)
                .await
        }
    };

    let code = report(&outcome, cli.pretty);

    if cli.print_metrics {
        eprintln!("{}", telemetry::get_metrics_string());
    }

    code
}

fn report(outcome: &Result<AnalysisResult, AnalysisError>, pretty: bool) -> ExitCode {
    match outcome {
        Ok(result) => {
            let json = if pretty {
                result.to_json_pretty()
            } else {
                result.to_json()
            };
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let record = err.to_record();
            let json = if pretty {
                serde_json::to_string_pretty(&record)
            } else {
                serde_json::to_string(&record)
            };
            println!("{}", json.unwrap_or_else(|_| "{}".to_string()));

            // ! 2 = caller-fixable request, 1 = fetch failure
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
