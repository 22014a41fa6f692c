use crate::{
    companies,
    config::{Config, Format},
    orchestrator::{Orchestrator, RequestState},
    render::{self, ReportView},
    report::Report,
    sections,
    service::{HttpReportService, ReportService, RunResponse},
    util::{ensure_dir, now_rfc3339, sha256_hex, slugify},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// A failed request whose error banner has already been printed.
#[derive(Debug, thiserror::Error)]
#[error("report request failed for {company}")]
pub struct ReportFailed {
    pub company: String,
}

#[derive(Parser, Debug)]
#[command(name = "finreport")]
#[command(about = "Fetch and read AI-generated financial reports for well-known companies")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./finreport.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the companies a report can be requested for.
    Companies {
        #[arg(long)]
        json: bool,
    },
    /// Request a report from the service and render it.
    Report {
        /// Company name; prompts interactively when omitted.
        #[arg(long)]
        company: Option<String>,
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Save the raw report, the full response and an index here.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Override service.endpoint.
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Render a saved service response without touching the network.
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "Report")]
        company: String,
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// Print the sections of a markdown report as JSON.
    Sections {
        #[arg(long)]
        input: PathBuf,
    },
}

pub async fn dispatch(args: Args) -> Result<()> {
    // Logging comes up even when the config is bad so the failure gets reported.
    let loaded = load_config(args.config.as_deref());
    let log_cfg = loaded.as_ref().ok().cloned().unwrap_or_default();
    let log_path = resolve_log_path(&log_cfg);
    let _guard = init_logging(&args, &log_cfg, log_path.as_deref())?;
    let cfg = loaded?;

    match &args.cmd {
        Command::Companies { json } => list_companies(*json),
        Command::Report {
            company,
            format,
            out_dir,
            endpoint,
        } => {
            let company = match company {
                Some(name) => Some(companies::resolve(name)?),
                None => prompt_company()?,
            };
            let service = match endpoint {
                Some(url) => HttpReportService::with_endpoint(&cfg, url)?,
                None => HttpReportService::new(&cfg)?,
            };
            let out_dir = out_dir
                .clone()
                .or_else(|| cfg.output.save.then(|| PathBuf::from(&cfg.output.out_dir)));
            let format = format.unwrap_or(cfg.output.format);
            report(&cfg, &service, company, format, out_dir.as_deref()).await
        }
        Command::Render {
            input,
            company,
            format,
        } => render_file(input, company, format.unwrap_or(cfg.output.format)),
        Command::Sections { input } => print_sections(input),
    }
}

fn load_config(user: Option<&Path>) -> Result<Config> {
    match resolve_config_path(user)? {
        Some(p) => Config::load(&p),
        None => Ok(Config::default()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = user {
        if !p.exists() {
            return Err(anyhow!("config file does not exist: {}", p.display()));
        }
        return Ok(Some(p.to_path_buf()));
    }
    let default = PathBuf::from("finreport.toml");
    if default.exists() {
        Ok(Some(default))
    } else {
        Ok(None)
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the rendered report; diagnostics go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(PathBuf::from(&cfg.output.out_dir).join("finreport.log"))
}

fn list_companies(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(companies::CATALOG)?);
    } else {
        for c in companies::CATALOG {
            println!("{c}");
        }
    }
    Ok(())
}

fn prompt_company() -> Result<Option<&'static str>> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow!("no --company given and stdin is not a terminal"));
    }
    companies::pick()
}

async fn report(
    cfg: &Config,
    service: &dyn ReportService,
    company: Option<&'static str>,
    format: Format,
    out_dir: Option<&Path>,
) -> Result<()> {
    let mut orch = Orchestrator::new();
    orch.select(company);
    if !orch.can_submit() {
        warn!("no company selected; nothing to do");
        return Ok(());
    }

    let started = now_rfc3339();
    info!("endpoint={}", service.endpoint());
    eprintln!("{}", render::LOADING_HINT);

    let state = orch.submit(service).await;
    let company = company.unwrap_or_default();

    match state {
        RequestState::Succeeded(report) => {
            if let Some(dir) = out_dir {
                let job_dir = save_report(cfg, dir, company, service.endpoint(), report, &started)?;
                info!("saved report to {}", job_dir.display());
            }
            print!("{}", render::render_state(company, state, format)?);
            Ok(())
        }
        RequestState::Failed(_) => {
            eprint!("{}", render::render_state(company, state, Format::Text)?);
            Err(ReportFailed {
                company: company.to_string(),
            }
            .into())
        }
        RequestState::Idle | RequestState::Loading => {
            Err(anyhow!("request for {company} finished without a result"))
        }
    }
}

fn save_report(
    cfg: &Config,
    out_root: &Path,
    company: &str,
    endpoint: &str,
    report: &Report,
    started: &str,
) -> Result<PathBuf> {
    let id = sha256_hex(format!("{company}:{started}:{}", report.raw).as_bytes());
    let job_dir = out_root.join(format!("{}-{}", slugify(company)?, &id[..12]));
    ensure_dir(&job_dir)?;

    std::fs::write(job_dir.join(&cfg.output.markdown_filename), &report.raw)
        .with_context(|| format!("writing report markdown in {}", job_dir.display()))?;
    std::fs::write(
        job_dir.join(&cfg.output.response_filename),
        serde_json::to_string_pretty(&serde_json::json!({ "result": report }))?,
    )?;

    if cfg.output.write_index_json {
        let titles: Vec<String> = sections::parse(&report.raw)
            .into_iter()
            .map(|s| s.title)
            .collect();
        let index = serde_json::json!({
            "id": id,
            "company": company,
            "endpoint": endpoint,
            "started": started,
            "finished": now_rfc3339(),
            "sections": titles,
            "token_usage": report.token_usage,
            "report_markdown": cfg.output.markdown_filename,
            "response": cfg.output.response_filename,
        });
        std::fs::write(job_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }

    Ok(job_dir)
}

fn render_file(input: &Path, company: &str, format: Format) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading response: {}", input.display()))?;
    let report = RunResponse::decode_lenient(&raw)
        .with_context(|| format!("decoding response JSON: {}", input.display()))?;
    let view = ReportView::from_report(company, &report);
    print!("{}", render::render(&view, format)?);
    Ok(())
}

fn print_sections(input: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading markdown: {}", input.display()))?;
    let parsed = sections::parse(&raw);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
