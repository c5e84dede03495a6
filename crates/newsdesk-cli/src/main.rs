use anyhow::{Context, Result, anyhow};
use newsdesk_config::Config;
use newsdesk_engine::document::Document;
use newsdesk_engine::editing::{EditorSettings, tools};
use newsdesk_engine::embed;
use newsdesk_engine::io;
use newsdesk_engine::normalize::{Normalized, normalize_with_report};
use newsdesk_engine::render::render_html;
use std::path::{Path, PathBuf};
use std::{env, process};

const USAGE: &str = "\
Usage: newsdesk <command> [args]

Commands:
  render <file>      Print the article body in <file> as HTML
  inspect <file>     Summarize the blocks in <file> and report degraded ones
  normalize <file>   Print the normalized form of <file> as JSON
  embed <url>        Print the embed URL for a video link
  list [dir]         List document files (defaults to the configured articles directory)
  tools              Show which editor tools the configuration enables";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Render(PathBuf),
    Inspect(PathBuf),
    Normalize(PathBuf),
    Embed(String),
    List(Option<PathBuf>),
    Tools,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let (command, rest) = args.split_first().ok_or("missing command")?;
    let single = |what: &str| match rest {
        [arg] => Ok(arg.clone()),
        [] => Err(format!("{command}: missing {what}")),
        _ => Err(format!("{command}: expected a single {what}")),
    };

    match command.as_str() {
        "render" => single("file").map(|f| Command::Render(f.into())),
        "inspect" => single("file").map(|f| Command::Inspect(f.into())),
        "normalize" => single("file").map(|f| Command::Normalize(f.into())),
        "embed" => single("url").map(Command::Embed),
        "list" => match rest {
            [] => Ok(Command::List(None)),
            [dir] => Ok(Command::List(Some(dir.into()))),
            _ => Err("list: expected at most one directory".to_string()),
        },
        "tools" if rest.is_empty() => Ok(Command::Tools),
        "tools" => Err("tools: takes no arguments".to_string()),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    match command {
        Command::Render(file) => {
            let document = io::read_document_at(&file)?;
            println!("{}", render_html(&document));
        }
        Command::Inspect(file) => {
            let normalized = read_with_report(&file)?;
            print!("{}", describe(&normalized));
        }
        Command::Normalize(file) => {
            let document = io::read_document_at(&file)?;
            println!("{}", document.to_json_pretty());
        }
        Command::Embed(url) => match embed::resolve(&url) {
            Ok(locator) => println!("{}", locator.embed_url()),
            Err(reason) => {
                eprintln!("Error: {url}: {reason}");
                process::exit(1);
            }
        },
        Command::List(dir) => {
            let dir = match dir {
                Some(dir) => dir,
                None => configured_articles_dir()?,
            };
            list(&dir)?;
        }
        Command::Tools => {
            let settings = Config::load()?.map(|config| config.editor).unwrap_or_default();
            print!("{}", describe_tools(&settings));
        }
    }

    Ok(())
}

fn read_with_report(file: &Path) -> Result<Normalized> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let raw = serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("{} is not valid JSON: {e}", file.display());
        serde_json::Value::Null
    });
    Ok(normalize_with_report(&raw))
}

fn describe(normalized: &Normalized) -> String {
    let document = &normalized.document;
    let summary = document.summary();
    let mut out = format!(
        "blocks: {}\nfallback: {}\nhighlighted: {}\n",
        summary.block_count, summary.fallback_count, summary.highlighted_count
    );
    for (block_type, count) in &summary.by_type {
        out.push_str(&format!("  {block_type}: {count}\n"));
    }
    for degradation in &normalized.degradations {
        out.push_str(&format!(
            "degraded block {}: {}\n",
            degradation.index, degradation.reason
        ));
    }
    if let Some(excerpt) = document.excerpt(160) {
        out.push_str(&format!("excerpt: {excerpt}\n"));
    }
    out
}

const BUILTIN_TOOLS: [&str; 6] = [
    tools::PARAGRAPH,
    tools::HEADER,
    tools::LIST,
    tools::QUOTE,
    tools::VIDEO,
    tools::LINK,
];

fn describe_tools(settings: &EditorSettings) -> String {
    let mut out = String::new();
    for name in BUILTIN_TOOLS {
        let state = if settings.tools.is_enabled(name) {
            "enabled"
        } else {
            "disabled"
        };
        out.push_str(&format!("{name}\t{state}\n"));
    }
    if let Some(header) = &settings.tools.header {
        out.push_str(&format!("header levels: {:?}\n", header.levels));
    }
    if settings.read_only {
        out.push_str("read-only\n");
    }
    out
}

fn configured_articles_dir() -> Result<PathBuf> {
    let config_path = Config::config_path();
    Config::load()?
        .map(|config| config.articles_path)
        .ok_or_else(|| {
            anyhow!(
                "no directory given and no config file found at {}",
                config_path.display()
            )
        })
}

fn list(dir: &Path) -> Result<()> {
    for file in io::scan_document_files(dir)? {
        let document = io::read_document(&file, dir)?;
        println!("{}", list_line(file.as_str(), &document));
    }
    Ok(())
}

fn list_line(file: &str, document: &Document) -> String {
    let summary = document.summary();
    format!(
        "{file}\t{} blocks\t{} fallback\t{}",
        summary.block_count,
        summary.fallback_count,
        summary.first_block_type.as_deref().unwrap_or("-")
    )
}
