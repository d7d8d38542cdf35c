//! 负载仿真
//!
//! 以固定间隔产生到达、以固定速率服务队头，观察队列在过载时的丢弃行为。
//! 到达间隔小于服务间隔时队列会逐渐填满并持续触发准入控制。

use std::net::Ipv4Addr;

use serde::Serialize;
use tracing::{debug, info};

use crate::net::{Packet, PacketId, SourceAddr};
use crate::queue::{PacketQueue, QueueStats};
use crate::viz::VizLogger;

use super::{Event, SimTime, Simulator};

/// 负载参数
#[derive(Debug, Clone)]
pub struct LoadOpts {
    /// 总到达数
    pub packets: u64,
    pub arrival_gap: SimTime,
    pub service_gap: SimTime,
    /// 第一次服务发生的时刻（留出时间让队列积压）
    pub service_start: SimTime,
    /// None 表示一直运行到所有到达都被处理完
    pub until: Option<SimTime>,
    /// 源地址从这里开始递增
    pub base_addr: Ipv4Addr,
}

impl Default for LoadOpts {
    fn default() -> Self {
        Self {
            packets: 1_000,
            arrival_gap: SimTime::from_micros(10),
            service_gap: SimTime::from_micros(12),
            service_start: SimTime::ZERO,
            until: Some(SimTime::from_millis(50)),
            base_addr: Ipv4Addr::new(10, 0, 0, 1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub end: SimTime,
    pub arrivals: u64,
    pub stats: QueueStats,
    pub max_len: usize,
    pub final_len: usize,
    pub capacity: usize,
}

/// 负载仿真的世界状态
#[derive(Debug)]
pub struct LoadWorld<Q> {
    pub queue: Q,
    pub viz: Option<VizLogger>,
    arrivals: u64,
    max_len: usize,
    arrivals_done: bool,
}

impl<Q: PacketQueue> LoadWorld<Q> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            viz: None,
            arrivals: 0,
            max_len: 0,
            arrivals_done: false,
        }
    }

    pub fn with_viz(mut self) -> Self {
        let mut viz = VizLogger::default();
        viz.record_meta(&self.queue);
        self.viz = Some(viz);
        self
    }

    fn arrive(&mut self, now: SimTime, pkt: Packet) {
        self.arrivals += 1;
        let copy = self.viz.as_ref().map(|_| pkt.clone());
        let outcome = self.queue.enqueue(pkt);
        let len = self.queue.len();
        self.max_len = self.max_len.max(len);
        if let (Some(v), Some(pkt)) = (&mut self.viz, copy) {
            v.set_now(now);
            v.record_enqueue(&pkt, &outcome, len, self.queue.capacity());
        }
    }

    fn serve(&mut self, now: SimTime) {
        let pkt = self.queue.dequeue();
        if let Some(v) = &mut self.viz {
            v.set_now(now);
            v.record_dequeue(pkt.as_ref(), self.queue.len(), self.queue.capacity());
        }
    }
}

fn nth_addr(base: Ipv4Addr, n: u64) -> SourceAddr {
    SourceAddr(Ipv4Addr::from(u32::from(base).wrapping_add(n as u32)))
}

struct Arrive {
    n: u64,
    opts: LoadOpts,
}

impl<Q: PacketQueue + 'static> Event<LoadWorld<Q>> for Arrive {
    fn execute(self: Box<Self>, sim: &mut Simulator<LoadWorld<Q>>, world: &mut LoadWorld<Q>) {
        let Arrive { n, opts } = *self;
        let id = match PacketId::new(format!("pkt{n}")) {
            Ok(id) => id,
            Err(_) => return,
        };
        world.arrive(sim.now(), Packet::new(id, nth_addr(opts.base_addr, n)));

        if n + 1 < opts.packets {
            let at = sim.now().saturating_add(opts.arrival_gap);
            sim.schedule(at, Arrive { n: n + 1, opts });
        } else {
            world.arrivals_done = true;
            debug!(now = %sim.now(), "所有到达已注入");
        }
    }
}

struct Serve {
    gap: SimTime,
}

impl<Q: PacketQueue + 'static> Event<LoadWorld<Q>> for Serve {
    fn execute(self: Box<Self>, sim: &mut Simulator<LoadWorld<Q>>, world: &mut LoadWorld<Q>) {
        world.serve(sim.now());
        // 到达结束且队列排空后停止服务，`run` 才能结束
        if world.arrivals_done && world.queue.is_empty() {
            return;
        }
        let at = sim.now().saturating_add(self.gap);
        sim.schedule(at, *self);
    }
}

/// 运行负载仿真直到 `opts.until`，或在未设置时运行到事件耗尽
pub fn run_load<Q: PacketQueue + 'static>(world: &mut LoadWorld<Q>, opts: &LoadOpts) -> LoadReport {
    let mut sim: Simulator<LoadWorld<Q>> = Simulator::default();
    if opts.packets > 0 {
        sim.schedule(
            SimTime::ZERO,
            Arrive {
                n: 0,
                opts: opts.clone(),
            },
        );
    } else {
        world.arrivals_done = true;
    }
    if opts.service_gap > SimTime::ZERO {
        sim.schedule(opts.service_start, Serve { gap: opts.service_gap });
    }
    match opts.until {
        Some(until) => sim.run_until(until, world),
        None => sim.run(world),
    }

    let report = LoadReport {
        end: sim.now(),
        arrivals: world.arrivals,
        stats: *world.queue.stats(),
        max_len: world.max_len,
        final_len: world.queue.len(),
        capacity: world.queue.capacity(),
    };
    info!(
        arrivals = report.arrivals,
        accepted = report.stats.accepted,
        evicted = report.stats.evicted,
        rejected = report.stats.rejected,
        dequeued = report.stats.dequeued,
        max_len = report.max_len,
        "负载仿真结束"
    );
    report
}
