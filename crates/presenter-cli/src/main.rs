use anyhow::{Context, Result, bail};
use html_escape::encode_text;
use presenter_config::Config;
use presenter_engine::{
    Doc, HandleLinkExtension, Markdown, Options, ParseMode, TargetBlankExtension, io, parse_slide,
};
use std::{env, fmt::Write as _, path::PathBuf, process};

const USAGE: &str = "Usage: presenter [--titles-only] [--html] <file>";
const TIME_FORMAT: &str = "%H:%M %d %b %Y";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: PathBuf,
    mode: ParseMode,
    html: bool,
}

/// Parses the arguments following the program name.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut path = None;
    let mut mode = ParseMode::Full;
    let mut html = false;

    for arg in args {
        match arg.as_str() {
            "--titles-only" => mode = ParseMode::TitlesOnly,
            "--html" => html = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if path.is_some() => bail!("only one file can be given"),
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let Some(path) = path else {
        bail!("no file given");
    };
    Ok(Args { path, mode, html })
}

/// Builds the engine the config asks for.
fn engine(config: &Config) -> Markdown {
    let options = Options {
        strikethrough: config.markdown.strikethrough,
        tasklists: config.markdown.tasklists,
        raw_html: config.markdown.raw_html,
    };
    let mut builder = Markdown::builder().options(options);
    if config.extensions.handle_links {
        builder = builder.extension(HandleLinkExtension);
    }
    if config.extensions.target_blank {
        builder = builder.extension(TargetBlankExtension);
    }
    builder.build()
}

fn render_outline(doc: &Doc<'_>) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", doc.title_or_empty())?;
    if let Some(subtitle) = &doc.subtitle {
        writeln!(out, "  {subtitle}")?;
    }
    if let Some(time) = &doc.time {
        writeln!(out, "  Time: {}", time.format(TIME_FORMAT))?;
    }
    if !doc.tags.is_empty() {
        writeln!(out, "  Tags: {}", doc.tags.join(", "))?;
    }
    if let Some(summary) = &doc.summary {
        writeln!(out, "  Summary: {summary}")?;
    }
    for author in &doc.authors {
        writeln!(out, "Author: {}", author.text_lines().join(" / "))?;
    }
    for section in &doc.sections {
        let indent = "  ".repeat(usize::from(section.level().saturating_sub(2)));
        let marker = if section.is_empty() { " (empty)" } else { "" };
        writeln!(out, "{indent}- {}{marker}", section.title_text())?;
    }
    Ok(out)
}

fn render_html(doc: &Doc<'_>) -> Result<String> {
    let mut out = String::new();
    if let Some(title) = &doc.title {
        writeln!(out, "<h1>{}</h1>", encode_text(title))?;
    }
    if let Some(subtitle) = &doc.subtitle {
        writeln!(out, "<h2 class=\"subtitle\">{}</h2>", encode_text(subtitle))?;
    }
    for author in &doc.authors {
        writeln!(out, "<div class=\"author\">\n{}</div>", author.render())?;
    }
    for section in &doc.sections {
        let level = section.level();
        let class = if section.is_empty() { " class=\"empty\"" } else { "" };
        writeln!(
            out,
            "<section>\n<h{level}{class}>{}</h{level}>\n{}</section>",
            section.render_title(),
            section.render()
        )?;
    }
    Ok(out)
}

fn run(args: &Args, config: &Config) -> Result<String> {
    if !io::is_present_file(&args.path) {
        log::warn!(
            "{} has none of the extensions {:?}",
            args.path.display(),
            io::EXTENSIONS
        );
    }
    let source = io::read_file(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let engine = engine(config);
    log::debug!("using {engine:?}");
    let tree = engine.parse(&source);
    let doc = parse_slide(&tree, args.mode)
        .with_context(|| format!("failed to parse {}", args.path.display()))?;

    if args.html {
        render_html(&doc)
    } else {
        render_outline(&doc)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config = match Config::load()? {
        Some(config) => {
            log::info!("Loaded config from {}", Config::config_path().display());
            config
        }
        None => Config::default(),
    };

    print!("{}", run(&args, &config)?);
    Ok(())
}
