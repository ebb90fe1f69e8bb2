use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tiger_parse::precedence::shape_program;
use tiger_parse::{parse_str_with, tokenize, ParseOptions, Tok, DEFAULT_MAX_DEPTH};

/// Maximum source file size in bytes (1MB)
const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "tiger")]
#[command(about = "Tiger front end: tokenize and parse Tiger sources")]
struct Cli {
    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// Path to .tig source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = TokenFormat::Text)]
        format: TokenFormat,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Path to .tig source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = AstFormat::Dump)]
        format: AstFormat,

        /// Regroup binary operator chains by precedence before printing
        #[arg(long)]
        shape: bool,

        /// Maximum expression nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TokenFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AstFormat {
    Dump,
    Debug,
    Json,
}

/// One row of `tokens --format json`.
#[derive(Serialize)]
struct TokenRow<'a> {
    tag: &'static str,
    text: &'a str,
    start: u32,
    end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a Tok> for TokenRow<'a> {
    fn from(tok: &'a Tok) -> Self {
        Self {
            tag: tok.tag.name(),
            text: &tok.text,
            start: tok.span.start,
            end: tok.span.end,
            error: tok.error.as_ref().map(|e| e.to_string()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tokens { file, format } => cmd_tokens(&file, format),
        Commands::Parse {
            file,
            format,
            shape,
            max_depth,
        } => cmd_parse(&file, format, shape, max_depth),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &str) -> Result<String> {
    let src =
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;

    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    tracing::debug!(path, bytes = src.len(), "read source");
    Ok(src)
}

fn cmd_tokens(file: &str, format: TokenFormat) -> Result<()> {
    let src = read_source(file)?;
    let tokens = tokenize(&src).with_context(|| format!("failed to tokenize '{file}'"))?;

    match format {
        TokenFormat::Text => {
            for tok in &tokens {
                println!("{tok}");
            }
        }
        TokenFormat::Json => {
            let rows: Vec<TokenRow> = tokens.iter().map(TokenRow::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn cmd_parse(file: &str, format: AstFormat, shape: bool, max_depth: usize) -> Result<()> {
    let src = read_source(file)?;
    let opts = ParseOptions { max_depth };
    let program =
        parse_str_with(&src, opts).with_context(|| format!("failed to parse '{file}'"))?;

    let Some(mut program) = program else {
        tracing::warn!(file, "source contains no tokens to parse");
        if let AstFormat::Json = format {
            println!("null");
        }
        return Ok(());
    };

    if shape {
        program = shape_program(program)
            .with_context(|| format!("failed to apply operator precedence in '{file}'"))?;
    }

    match format {
        AstFormat::Dump => print!("{}", program.dump()),
        AstFormat::Debug => println!("{program:#?}"),
        AstFormat::Json => println!("{}", serde_json::to_string_pretty(&program)?),
    }
    Ok(())
}
