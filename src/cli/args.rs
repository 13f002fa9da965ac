use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "storefront",
    version,
    about = "catalog, pagination and persistent cart in the terminal",
    long_about = "Storefront loads a product catalog once, shows it a page at a time and keeps a cart that survives restarts.\n\nExamples:\n  storefront\n  storefront -n 20 -a 'category beauty' -a 'add 3' -o shop.html\n  storefront --endpoint http://localhost:9000/products --memory\n\nInteractive commands: add ID, minus ID, remove ID, next, prev, page N, size N, category NAME|all, checkout, show, help, quit."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "o",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the final view to a file (format inferred from extension)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text, json or html."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Catalog",
        help = "Catalog endpoint returning {\"products\": [...]}."
    )]
    pub endpoint: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Catalog",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'm',
        long = "mul",
        visible_alias = "multiplier",
        value_name = "FACTOR",
        help_heading = "Catalog",
        help = "Flat price multiplier applied to every product."
    )]
    pub multiplier: Option<String>,

    #[arg(
        long = "cm",
        visible_alias = "category-multipliers",
        value_name = "CAT=FACTOR,...",
        help_heading = "Catalog",
        help = "Per-category price multipliers (comma-separated), falling back to --multiplier."
    )]
    pub category_multipliers: Option<String>,

    #[arg(
        short = 'n',
        long = "ipp",
        visible_alias = "items-per-page",
        value_name = "N",
        help_heading = "View",
        help = "Products per page."
    )]
    pub items_per_page: Option<usize>,

    #[arg(
        long = "pso",
        visible_alias = "page-size-options",
        value_name = "N,N,...",
        help_heading = "View",
        help = "Page sizes offered by the selector (comma-separated)."
    )]
    pub page_size_options: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.storefront/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'a',
        long = "act",
        visible_alias = "action",
        value_name = "COMMAND",
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Run a command instead of the interactive session (repeatable, e.g. -a 'add 3')."
    )]
    pub action: Vec<String>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "storage",
        value_name = "FILE",
        help_heading = "Cart",
        help = "Cart storage file (defaults to ~/.storefront/storage.json)."
    )]
    pub storage: Option<String>,

    #[arg(
        long = "mem",
        visible_alias = "memory",
        help_heading = "Cart",
        help = "Keep the cart in memory only."
    )]
    pub memory: bool,
}
