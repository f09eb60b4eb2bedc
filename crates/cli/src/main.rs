use anyhow::Context;
use clap::{Parser, Subcommand};
use cx_webhook::config::{self, Config};
use cx_webhook::{WebhookRequest, WebhookResponse};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cxhook")]
#[command(about = "Webhook fulfillment tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Decode one recorded webhook call and print its routing fields (tag, intent, page, session, parameters).
    Inspect {
        /// Config file path (default: CXHOOK_CONFIG_PATH or ~/.cxhook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Request body file; reads stdin when omitted or "-".
        file: Option<PathBuf>,
    },

    /// Split a recorded batch (JSON array of webhook calls) into one fixture file per call.
    Split {
        /// Config file path (default: CXHOOK_CONFIG_PATH or ~/.cxhook/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Recorded batch file.
        batch: PathBuf,

        /// Output directory (default from config fixtures.directory)
        #[arg(long, short, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Print a text response (interruptible) for the given lines.
    Text {
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Print a synthesized-speech response sourced from SSML.
    Ssml {
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        markup: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("cxhook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Inspect { config, file }) => run_inspect(config, file),
        Some(Commands::Split { config, batch, out }) => run_split(config, batch, out),
        Some(Commands::Text { config, lines }) => run_text(config, lines),
        Some(Commands::Ssml { config, markup }) => run_ssml(config, markup),
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };
    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn read_body(file: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) if path.as_path() != Path::new("-") => std::fs::read(&path)
            .with_context(|| format!("reading request body from {}", path.display())),
        _ => {
            let mut body = Vec::new();
            io::stdin()
                .read_to_end(&mut body)
                .context("reading request body from stdin")?;
            Ok(body)
        }
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> anyhow::Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", s);
    Ok(())
}

fn run_inspect(config_path: Option<PathBuf>, file: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let body = read_body(file)?;
    let req = WebhookRequest::from_slice(&body).context("decoding webhook request")?;

    println!("tag:       {}", req.tag());
    println!(
        "intent:    {} ({:.2})",
        req.intent_info.display_name, req.intent_info.confidence
    );
    println!("page:      {}", req.page_info.display_name);
    match req.session_id() {
        Ok(id) => println!("session:   {}", id),
        Err(e) => {
            log::warn!("{}", e);
            println!("session:   -");
        }
    }
    println!("language:  {}", req.language_code);
    if !req.text.is_empty() {
        println!("text:      {}", req.text);
    }
    for p in &req.page_info.form_info.parameter_info {
        println!(
            "form:      {}{} [{}]{}",
            p.display_name,
            if p.required { "*" } else { "" },
            p.state,
            if p.just_collected { " (just collected)" } else { "" }
        );
    }
    if !req.session_info.parameters.is_empty() {
        let params = serde_json::Value::Object(req.session_info.parameters.clone());
        print_json(&params, config::resolve_pretty(&config))?;
    }
    Ok(())
}

fn run_split(
    config_path: Option<PathBuf>,
    batch: PathBuf,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (config, path) = config::load_config(config_path)?;
    let dir = out.unwrap_or_else(|| config::resolve_fixtures_dir(&config, &path));
    let written = cx_webhook::fixtures::split_batch_file(&batch, &dir, &config.fixtures.prefix)?;
    for p in written {
        println!("{}", p.display());
    }
    Ok(())
}

fn write_response(config: &Config, resp: &WebhookResponse) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if config::resolve_pretty(config) {
        resp.encode_pretty(&mut out)?;
    } else {
        resp.encode(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn run_text(config_path: Option<PathBuf>, lines: Vec<String>) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let mut resp = WebhookResponse::default();
    write_response(&config, resp.set_text_reply(lines))
}

fn run_ssml(config_path: Option<PathBuf>, markup: String) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let mut resp = WebhookResponse::default();
    write_response(&config, resp.set_ssml_reply(markup))
}
