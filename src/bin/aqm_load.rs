//! AQM 负载仿真
//!
//! 以固定间隔注入数据包、以固定速率服务，对比 AQM 与 DropTail 的丢弃情况。

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use aqm_sim::error::SimError;
use aqm_sim::queue::{AqmConfig, AqmQueue, DropTailQueue, EvictPolicy, PacketQueue};
use aqm_sim::sim::{LoadOpts, LoadReport, LoadWorld, SimTime, run_load};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Discipline {
    Aqm,
    DropTail,
}

#[derive(Debug, Parser)]
#[command(name = "aqm-load", about = "AQM 负载仿真：固定到达/服务速率")]
struct Args {
    #[arg(long, value_enum, default_value_t = Discipline::Aqm)]
    discipline: Discipline,
    #[arg(long, default_value_t = 10)]
    capacity: usize,
    #[arg(long, default_value_t = 8)]
    threshold: usize,
    #[arg(long, default_value_t = 0.2)]
    drop_probability: f64,
    #[arg(long, value_enum, default_value_t = EvictPolicy::InsertAfterEvict)]
    policy: EvictPolicy,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value_t = 1_000)]
    pkts: u64,
    /// 两个 packet 到达间隔（微秒）
    #[arg(long, default_value_t = 10)]
    arrival_gap_us: u64,
    /// 服务间隔（微秒）；0 表示不服务
    #[arg(long, default_value_t = 12)]
    service_gap_us: u64,
    /// 仿真运行到多少毫秒；不指定则运行到全部处理完
    #[arg(long)]
    until_ms: Option<u64>,
    /// Output queue events as JSON
    #[arg(long)]
    events_json: Option<PathBuf>,
    /// 以 JSON 打印汇总
    #[arg(long)]
    json: bool,
}

fn simulate<Q: PacketQueue + 'static>(
    queue: Q,
    opts: &LoadOpts,
    viz_path: Option<&PathBuf>,
) -> Result<LoadReport, SimError> {
    let mut world = LoadWorld::new(queue);
    if viz_path.is_some() {
        world = world.with_viz();
    }
    let report = run_load(&mut world, opts);
    if let (Some(path), Some(v)) = (viz_path, world.viz.take()) {
        fs::write(path, v.to_json()?)?;
        eprintln!("wrote queue events to {}", path.display());
    }
    Ok(report)
}

fn run(args: Args) -> Result<(), SimError> {
    let opts = LoadOpts {
        packets: args.pkts,
        arrival_gap: SimTime::from_micros(args.arrival_gap_us),
        service_gap: SimTime::from_micros(args.service_gap_us),
        until: args.until_ms.map(SimTime::from_millis),
        ..LoadOpts::default()
    };
    let report = match args.discipline {
        Discipline::Aqm => {
            let cfg = AqmConfig::new(args.capacity, args.threshold, args.drop_probability)
                .with_policy(args.policy);
            simulate(AqmQueue::seeded(&cfg, args.seed)?, &opts, args.events_json.as_ref())?
        }
        Discipline::DropTail => {
            simulate(DropTailQueue::new(args.capacity)?, &opts, args.events_json.as_ref())?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let s = report.stats;
        println!(
            "done @ {}, arrivals={}, accepted={}, evicted={}, rejected={}, dequeued={}, max_len={}/{}, final_len={}",
            report.end,
            report.arrivals,
            s.accepted,
            s.evicted,
            s.rejected,
            s.dequeued,
            report.max_len,
            report.capacity,
            report.final_len
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
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
