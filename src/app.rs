use std::io::Write;
use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::catalog::{self, PriceRule, DEFAULT_ENDPOINT, DEFAULT_MULTIPLIER};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{Settings, Storefront};
use crate::events::Action;
use crate::output::{self, OutputFormat};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::utils;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const HELP: &str = "\
  add ID        add one unit of a product
  minus ID      take one unit away
  remove ID     drop the whole line
  next | prev   move between pages
  page N        jump to page N
  size N        show N products per page
  category C    filter by category (or 'all')
  checkout      pay and empty the cart
  show          print the current view
  quit          leave";

fn print_banner() {
    println!(
        "{}",
        ":: storefront :: catalog, pages and a cart that remembers ::".bold()
    );
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    endpoint: String,
    timeout: u64,
    settings: Settings,
    storage: Option<PathBuf>,
    actions: Vec<Action>,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
}

fn build_price_rule(args: &CliArgs, cfg: &ConfigFile) -> Result<PriceRule, String> {
    let multiplier = match args.multiplier.as_deref() {
        Some(raw) => utils::parse_multiplier(raw)
            .map_err(|e| format!("invalid --multiplier '{raw}': {e}"))?,
        None => cfg.price_multiplier.unwrap_or(DEFAULT_MULTIPLIER),
    };
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(format!(
            "invalid price_multiplier {multiplier}, expected positive number"
        ));
    }

    let multipliers = match args.category_multipliers.as_deref() {
        Some(raw) => utils::parse_category_multipliers_csv(raw)
            .map_err(|e| format!("invalid --category-multipliers '{raw}': {e}"))?,
        None => cfg.category_multipliers.clone().unwrap_or_default(),
    };
    if let Some((category, factor)) = multipliers
        .iter()
        .find(|(_, f)| !f.is_finite() || **f <= 0.0)
    {
        return Err(format!(
            "invalid multiplier {factor} for category '{category}', expected positive number"
        ));
    }

    if multipliers.is_empty() {
        Ok(PriceRule::Flat { multiplier })
    } else {
        Ok(PriceRule::ByCategory {
            default_multiplier: multiplier,
            multipliers,
        })
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| cfg.endpoint.clone())
        .map(|e| e.trim().to_string())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    reqwest::Url::parse(&endpoint).map_err(|e| format!("invalid endpoint '{endpoint}': {e}"))?;

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout 0, expected positive integer".to_string());
    }

    let page_size = args
        .items_per_page
        .or(cfg.items_per_page)
        .unwrap_or(crate::view::DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid items_per_page 0, expected positive integer".to_string());
    }

    let page_size_options = match args.page_size_options.as_deref() {
        Some(raw) => utils::parse_page_sizes_csv(raw)
            .map_err(|e| format!("invalid --page-size-options '{raw}': {e}"))?,
        None => match cfg.page_size_options.as_ref() {
            Some(sizes) => {
                let joined = sizes
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                utils::parse_page_sizes_csv(&joined)
                    .map_err(|e| format!("invalid page_size_options in config: {e}"))?
            }
            None => utils::DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        },
    };

    let settings = Settings {
        page_size,
        page_size_options,
        price_rule: build_price_rule(&args, &cfg)?,
        currency: cfg.currency.clone().unwrap_or_default(),
    };

    let storage = if args.memory {
        None
    } else {
        match args.storage.as_deref().or(cfg.storage.as_deref()) {
            Some(path) => Some(config::expand_tilde(path)),
            None => config::default_storage_path(),
        }
    };

    let actions = args
        .action
        .iter()
        .map(|raw| Action::parse(raw).map_err(|e| format!("invalid --action '{raw}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde(&p).to_string_lossy().to_string());
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        endpoint,
        timeout,
        settings,
        storage,
        actions,
        output,
        output_format,
        no_color,
    })
}

fn print_view<S: KeyValueStore>(storefront: &Storefront<S>) {
    print!(
        "{}",
        String::from_utf8_lossy(&output::render_text(&storefront.view()))
    );
}

fn print_notices<S: KeyValueStore>(storefront: &mut Storefront<S>) {
    for notice in storefront.take_notices() {
        println!("{}", output::render_notice(&notice));
    }
}

fn print_warning(message: &str) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "WRN".bold().yellow(),
        "]".bold().white(),
        message
    );
}

/// Runs one action and prints whatever the user should see afterwards.
fn apply<S: KeyValueStore>(storefront: &mut Storefront<S>, action: Action) {
    match storefront.dispatch(action.clone()) {
        Ok(true) => {
            print_notices(storefront);
            print_view(storefront);
        }
        Ok(false) => {
            print_notices(storefront);
            print_warning(&format!("nothing to do for {:?}", action));
        }
        Err(e) => {
            print_notices(storefront);
            print_warning(&e.to_string());
        }
    }
}

async fn interactive<S: KeyValueStore>(storefront: &mut Storefront<S>) -> Result<(), String> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        print!("{} ", ">".bold().cyan());
        let _ = std::io::stdout().flush();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read input: {e}")),
        };
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" | "?" => println!("{HELP}"),
            "show" | "ls" => print_view(storefront),
            _ => match Action::parse(command) {
                Ok(action) => apply(storefront, action),
                Err(e) => print_warning(&e),
            },
        }
    }
    Ok(())
}

async fn write_output<S: KeyValueStore>(
    storefront: &Storefront<S>,
    path: &str,
    format: OutputFormat,
) -> Result<(), String> {
    let rendered = output::render(format, &storefront.view())
        .map_err(|e| format!("failed to render output: {e}"))?;
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    info!(path, "view written");
    Ok(())
}

async fn run_session<S: KeyValueStore>(
    run: &RunConfig,
    store: S,
    client: &reqwest::Client,
) -> Result<(), String> {
    let mut storefront = Storefront::new(store, run.settings.clone()).map_err(|e| e.to_string())?;
    storefront.load_catalog(client, &run.endpoint).await;
    print_notices(&mut storefront);
    print_view(&storefront);

    if run.actions.is_empty() {
        interactive(&mut storefront).await?;
    } else {
        for action in run.actions.iter().cloned() {
            println!();
            format_kv_line("Action", &format!("{:?}", action));
            apply(&mut storefront, action);
        }
    }

    if let Some(path) = run.output.as_deref() {
        write_output(&storefront, path, run.output_format).await?;
        format_kv_line("Output", path);
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();
    format_kv_line("Endpoint", &run.endpoint);
    format_kv_line(
        "Storage",
        &run
            .storage
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "memory".to_string()),
    );
    format_kv_line("Page size", &run.settings.page_size.to_string());
    println!();

    let client = catalog::build_client(run.timeout).map_err(|e| e.to_string())?;
    match run.storage.clone() {
        Some(path) => run_session(&run, FileStore::new(path), &client).await,
        None => run_session(&run, MemoryStore::new(), &client).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    crate::logging::init(args.verbose, args.no_color);

    let cfg = match args.config.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            if args.init_config {
                config::ensure_default_config_file(&path)?;
            }
            config::load_config(&path, false)?
        }
        None => match config::default_config_path() {
            Some(path) => {
                if args.init_config {
                    config::ensure_default_config_file(&path)?;
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };
    if args.init_config {
        println!("config ready");
        return Ok(());
    }

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
