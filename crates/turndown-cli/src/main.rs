use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use turndown::{utf8, TurndownOptions, TurndownService};

#[derive(Parser, Debug)]
#[command(name = "turndown")]
#[command(about = "Convert HTML to CommonMark Markdown")]
#[command(version)]
struct Cli {
    /// HTML file to convert (reads stdin when absent or `-`)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Write Markdown to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Heading style: setext or atx
    #[arg(long, value_name = "STYLE")]
    heading_style: Option<String>,

    /// Thematic break string
    #[arg(long, value_name = "STRING")]
    hr: Option<String>,

    /// Bullet list marker: *, - or +
    #[arg(long, value_name = "CHAR")]
    bullet: Option<String>,

    /// Code block style: indented or fenced
    #[arg(long, value_name = "STYLE")]
    code_block_style: Option<String>,

    /// Fence for fenced code blocks: ``` or ~~~
    #[arg(long, value_name = "FENCE")]
    fence: Option<String>,

    /// Emphasis delimiter: _ or *
    #[arg(long, value_name = "CHAR")]
    em_delimiter: Option<String>,

    /// Strong delimiter: ** or __
    #[arg(long, value_name = "STRING")]
    strong_delimiter: Option<String>,

    /// Link style: inlined or referenced
    #[arg(long, value_name = "STYLE")]
    link_style: Option<String>,

    /// Reference style: full, collapsed or shortcut
    #[arg(long, value_name = "STYLE")]
    link_reference_style: Option<String>,

    /// Hard line break string
    #[arg(long, value_name = "STRING")]
    br: Option<String>,

    /// Keep whitespace inside inline code verbatim
    #[arg(long)]
    preformatted_code: bool,

    /// Only escape characters that start Markdown blocks or links
    #[arg(long)]
    minimal_escape: bool,

    /// Keep elements with this tag as HTML (repeatable)
    #[arg(long, value_name = "TAG")]
    keep: Vec<String>,

    /// Drop elements with this tag and their content (repeatable)
    #[arg(long, value_name = "TAG")]
    remove: Vec<String>,

    /// Set any converter option by name (repeatable)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn turndown_options(&self) -> Result<TurndownOptions> {
        let mut options = TurndownOptions::default();

        let flags = [
            ("headingStyle", &self.heading_style),
            ("hr", &self.hr),
            ("bulletListMarker", &self.bullet),
            ("codeBlockStyle", &self.code_block_style),
            ("fence", &self.fence),
            ("emDelimiter", &self.em_delimiter),
            ("strongDelimiter", &self.strong_delimiter),
            ("linkStyle", &self.link_style),
            ("linkReferenceStyle", &self.link_reference_style),
            ("br", &self.br),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                options.set(key, value)?;
            }
        }
        if self.preformatted_code {
            options.preformatted_code = true;
        }
        if self.minimal_escape {
            options.set("escape", "minimal")?;
        }

        for pair in &self.options {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("expected KEY=VALUE, got {pair:?}"))?;
            options
                .set(key.trim(), value)
                .with_context(|| format!("invalid --option {pair:?}"))?;
        }

        Ok(options)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    let bytes = match input {
        Some(path) if path.as_os_str() != "-" => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            bytes
        }
    };
    if std::str::from_utf8(&bytes).is_err() {
        log::warn!("input is not valid UTF-8; malformed bytes are read as single code points");
    }
    Ok(utf8::decode_lossy(&bytes))
}

fn write_output(output: Option<&PathBuf>, markdown: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, markdown)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = cli.turndown_options()?;
    let mut service = TurndownService::with_options(options);
    for tag in &cli.keep {
        service.keep(tag.as_str());
    }
    for tag in &cli.remove {
        service.remove(tag.as_str());
    }

    let html = read_input(cli.input.as_ref())?;
    log::info!("converting {} bytes of HTML", html.len());

    let mut markdown = service.turndown_html(&html).context("conversion failed")?;
    markdown.push('\n');

    write_output(cli.output.as_ref(), &markdown)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
