//! AQM 交互式仿真
//!
//! 从标准输入读取菜单选择或单行命令，对一个定长 AQM 队列做入队/出队/查看。

use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use aqm_sim::cli::Session;
use aqm_sim::error::SimError;
use aqm_sim::queue::{AqmConfig, AqmQueue, EvictPolicy};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "aqm-sim", about = "Active Queue Management simulator (interactive)")]
struct Args {
    /// JSON 配置文件（AqmConfig）；命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
    /// 队列容量（默认 10）
    #[arg(long)]
    capacity: Option<usize>,
    /// 触发准入控制的占用阈值（默认 8）
    #[arg(long)]
    threshold: Option<usize>,
    /// 丢弃队头的概率，[0, 1]（默认 0.2）
    #[arg(long)]
    drop_probability: Option<f64>,
    #[arg(long, value_enum)]
    policy: Option<EvictPolicy>,
    /// 固定随机种子
    #[arg(long)]
    seed: Option<u64>,
    /// Output queue events as JSON
    #[arg(long)]
    events_json: Option<PathBuf>,
    /// 不打印菜单和输入提示
    #[arg(long)]
    quiet: bool,
}

fn resolve_config(args: &Args) -> Result<AqmConfig, SimError> {
    let mut cfg = match &args.config {
        Some(path) => AqmConfig::from_json_file(path)?,
        None => AqmConfig::default(),
    };
    if let Some(c) = args.capacity {
        cfg.capacity = c;
    }
    if let Some(t) = args.threshold {
        cfg.threshold = t;
    }
    if let Some(p) = args.drop_probability {
        cfg.drop_probability = p;
    }
    if let Some(policy) = args.policy {
        cfg.policy = policy;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: Args) -> Result<(), SimError> {
    let cfg = resolve_config(&args)?;
    let queue = match args.seed {
        Some(seed) => AqmQueue::seeded(&cfg, seed)?,
        None => AqmQueue::from_config(&cfg)?,
    };
    tracing::info!(?cfg, "队列已创建");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(queue, stdin.lock(), BufWriter::new(stdout.lock()));
    if args.quiet {
        session = session.quiet();
    }
    if args.events_json.is_some() {
        session = session.with_viz();
    }
    session.run()?;

    let (_queue, viz) = session.into_parts();
    if let (Some(path), Some(v)) = (args.events_json, viz) {
        fs::write(&path, v.to_json()?)?;
        eprintln!("wrote queue events to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    // 日志写到 stderr，默认只显示 warn，避免和交互提示混在一起
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
