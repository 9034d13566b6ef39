//! Clap argument definitions for the `hitnorm` CLI.

use std::{env, path::PathBuf, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Default number of hot matches shown per document.
pub const DEFAULT_HOT_MATCHES: usize = 3;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "hitnorm")]
#[command(about = "Normalize search engine hits into one document shape")]
pub struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `hitnorm fields`.
#[derive(Args, Debug, Clone)]
pub struct FieldsCommand {
    /// Field spec to resolve [default: from configuration]
    pub spec: Option<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `hitnorm normalize`.
#[derive(Args, Debug, Clone)]
pub struct NormalizeCommand {
    /// JSON file with the hits, or `-` for stdin
    pub file: PathBuf,

    /// Field spec [default: from configuration]
    #[arg(short = 's', long)]
    pub spec: Option<String>,

    /// JSON file with explain payloads keyed by document id, overriding the hits' own
    #[arg(long)]
    pub explain_other: Option<PathBuf>,

    /// Marker before highlighted terms [default: from configuration]
    #[arg(long)]
    pub pre: Option<String>,

    /// Marker after highlighted terms [default: from configuration]
    #[arg(long)]
    pub post: Option<String>,

    /// Characters shown for fields without a highlight [default: from configuration]
    #[arg(long)]
    pub snippet_length: Option<usize>,

    /// Score hot matches are measured against [default: the best score in the file]
    #[arg(long)]
    pub max_score: Option<f64>,

    /// Hot matches shown per document [default: 3]
    #[arg(short = 'n', long)]
    pub hot: Option<usize>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `hitnorm escape`.
#[derive(Args, Debug, Clone)]
pub struct EscapeCommand {
    /// Text to escape
    pub text: String,

    /// Escape for HTML instead of Solr query syntax
    #[arg(long)]
    pub html: bool,
}

/// Arguments for `hitnorm hydrate`.
#[derive(Args, Debug, Clone)]
pub struct HydrateCommand {
    /// Query text substituted into the template
    pub query: String,

    /// Template string
    #[arg(short = 't', long, required_unless_present = "file", conflicts_with = "file")]
    pub template: Option<String>,

    /// JSON template file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// JSON object reachable as #$qOption.<path>##
    #[arg(long)]
    pub q_option: Option<String>,

    /// Keyword used when the query has too few words [default: from configuration]
    #[arg(long)]
    pub default_keyword: Option<String>,

    /// Percent-encode substituted text
    #[arg(long)]
    pub encode_uri: bool,
}

/// Arguments for `hitnorm init`.
#[derive(Args, Debug, Clone, Copy)]
pub struct InitCommand {
    /// Create global ~/.hitnorm.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `hitnorm` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show how a field spec resolves
    Fields(FieldsCommand),

    /// Normalize raw hits from a JSON file
    #[command(after_help = "\
Input is either an array of source documents or an object:
  {\"docs\": [...], \"highlighting\": {id: {field: snippet}}, \"explain\": {id: payload}}")]
    Normalize(NormalizeCommand),

    /// Take query URLs apart
    Url {
        /// What to do with the URL
        #[command(subcommand)]
        what: UrlWhat,
    },

    /// Escape user text for Solr queries or HTML
    Escape(EscapeCommand),

    /// Fill in a query template
    Hydrate(HydrateCommand),

    /// Initialize hitnorm configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

/// What to do with `hitnorm url`.
#[derive(Clone, Subcommand)]
pub enum UrlWhat {
    /// Split a URL into its parts and query arguments
    Parse {
        /// URL to parse
        url: String,

        /// Custom headers as a JSON object, merged over derived ones
        #[arg(long, default_value = "")]
        headers: String,

        #[command(flatten)]
        /// Output formatting flags.
        output: OutputArgs,
    },
    /// Read collection, handler and arguments from a Solr URL
    Solr {
        /// Solr request URL
        url: String,

        /// Remove arguments the searcher sets itself, warning about each
        #[arg(long)]
        sanitize: bool,

        #[command(flatten)]
        /// Output formatting flags.
        output: OutputArgs,
    },
    /// Build Elasticsearch document and explain URLs
    Es {
        /// Elasticsearch base URL
        url: String,

        /// Index name
        #[arg(long)]
        index: String,

        /// Document id
        #[arg(long)]
        id: String,

        /// Mapping type
        #[arg(long = "type")]
        doc_type: Option<String>,
    },
}

/// Parses CLI arguments, printing hierarchical help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp && env::args().len() <= 2 {
                print_hierarchical_help();
                exit(0);
            }
            e.exit();
        }
    }
}

/// Prints custom help with hierarchical subcommand display.
fn print_hierarchical_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: hitnorm [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }

        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");

        for subsub in sub.get_subcommands() {
            let subname = subsub.get_name();
            if subname == "help" {
                continue;
            }
            let subabout = subsub
                .get_about()
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!("    {subname:8} {subabout}");
        }
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log more (-v for debug, -vv for trace)");
    println!("  -h, --help        Print help");
}
