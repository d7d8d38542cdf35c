//! 交互式会话
//!
//! 菜单与原始交互方式一致：1 入队、2 出队、3 查看队列、4 退出；
//! 也接受 `enqueue <id> <ip>` 这类单行命令，方便脚本驱动。
//! 地址在这里校验，非法地址不会进入队列。

use std::io::{self, BufRead, Write};

use crate::error::{CommandError, PacketError};
use crate::net::Packet;
use crate::queue::{AqmQueue, EnqueueOutcome, PacketQueue};
use crate::viz::VizLogger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `None` 表示参数需要逐项提示输入
    Enqueue(Option<(String, String)>),
    Dequeue,
    Show,
    Stats,
    Help,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let cmd = match head.to_ascii_lowercase().as_str() {
            "1" | "enqueue" | "enq" => {
                return match args.as_slice() {
                    [] => Ok(Command::Enqueue(None)),
                    [_] => Err(CommandError::MissingArgument("ip")),
                    [id, ip] => Ok(Command::Enqueue(Some((id.to_string(), ip.to_string())))),
                    [_, _, extra, ..] => Err(CommandError::UnexpectedArgument(extra.to_string())),
                };
            }
            "2" | "dequeue" | "deq" => Command::Dequeue,
            "3" | "show" | "view" => Command::Show,
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "4" | "exit" | "quit" => Command::Exit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        if let Some(extra) = args.first() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }
        Ok(cmd)
    }
}

const MENU: &str = "\nSelect an action:\n\
1. Enqueue a packet\n\
2. Dequeue a packet\n\
3. View the current queue\n\
4. Exit\n";

/// 一次交互会话：从 `input` 读命令，把状态行写到 `out`
pub struct Session<R, W> {
    queue: AqmQueue,
    input: R,
    out: W,
    viz: Option<VizLogger>,
    prompts: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(queue: AqmQueue, input: R, out: W) -> Self {
        Self {
            queue,
            input,
            out,
            viz: None,
            prompts: true,
        }
    }

    /// 关闭菜单与输入提示（脚本模式）
    pub fn quiet(mut self) -> Self {
        self.prompts = false;
        self
    }

    pub fn with_viz(mut self) -> Self {
        let mut viz = VizLogger::default();
        viz.record_meta(&self.queue);
        self.viz = Some(viz);
        self
    }

    pub fn queue(&self) -> &AqmQueue {
        &self.queue
    }

    pub fn into_parts(self) -> (AqmQueue, Option<VizLogger>) {
        (self.queue, self.viz)
    }

    /// 运行到 `exit` 或输入结束
    pub fn run(&mut self) -> io::Result<()> {
        if self.prompts {
            writeln!(self.out, "Welcome to the Active Queue Management (AQM) Simulator!")?;
            writeln!(
                self.out,
                "This educational tool demonstrates the concept of AQM in networking with IP addresses."
            )?;
        }
        loop {
            if self.prompts {
                write!(self.out, "{MENU}Enter the number corresponding to your choice: ")?;
                self.out.flush()?;
            }
            let Some(line) = self.read_line()? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(Command::Exit) => {
                    writeln!(self.out, "Exiting the simulator. Goodbye!")?;
                    break;
                }
                Ok(cmd) => self.execute(cmd)?,
                Err(CommandError::Unknown(_)) => {
                    writeln!(self.out, "Invalid option. Please try again.")?
                }
                Err(e) => writeln!(self.out, "{e}. Please try again.")?,
            }
        }
        self.out.flush()
    }

    pub fn execute(&mut self, cmd: Command) -> io::Result<()> {
        match cmd {
            Command::Enqueue(Some((id, ip))) => self.enqueue(&id, &ip),
            Command::Enqueue(None) => {
                let Some(id) = self.prompt("Enter packet identifier (e.g., 'packet1', 'packet2'): ")?
                else {
                    return Ok(());
                };
                let Some(ip) =
                    self.prompt("Enter the IP address of the packet (e.g., '192.168.1.1'): ")?
                else {
                    return Ok(());
                };
                self.enqueue(&id, &ip)
            }
            Command::Dequeue => self.dequeue(),
            Command::Show => self.show(),
            Command::Stats => self.stats(),
            Command::Help => {
                writeln!(
                    self.out,
                    "commands: enqueue <id> <ip> | dequeue | show | stats | help | exit (or 1-4)"
                )
            }
            Command::Exit => Ok(()),
        }
    }

    fn enqueue(&mut self, id: &str, ip: &str) -> io::Result<()> {
        let pkt = match Packet::parse(id, ip) {
            Ok(pkt) => pkt,
            Err(PacketError::InvalidAddress(s)) => {
                return writeln!(self.out, "Invalid IP address format: {s}. Please try again.");
            }
            Err(PacketError::EmptyId) => {
                return writeln!(self.out, "Invalid packet identifier. Please try again.");
            }
        };

        let threshold = self.queue.threshold();
        let was_full = self.queue.is_full();
        let at_threshold = self.queue.len() >= threshold;
        let copy = self.viz.as_ref().map(|_| pkt.clone());
        let (pid, src) = (pkt.id().clone(), pkt.src());

        let outcome = self.queue.enqueue(pkt);
        if let (Some(v), Some(pkt)) = (&mut self.viz, copy) {
            v.record_enqueue(&pkt, &outcome, self.queue.len(), self.queue.capacity());
        }

        if was_full {
            writeln!(self.out, "Queue is full! Applying AQM for IP {src}...")?;
            if at_threshold {
                writeln!(
                    self.out,
                    "Queue size exceeds threshold ({threshold}). Dropping packet from IP {src}..."
                )?;
            } else {
                writeln!(
                    self.out,
                    "Queue size is within limits. No packet dropped for IP {src}."
                )?;
            }
        }
        match outcome {
            EnqueueOutcome::Accepted => {
                writeln!(self.out, "Packet {pid} from IP {src} added to the queue.")
            }
            EnqueueOutcome::DroppedExisting { evicted, rejected } => {
                writeln!(self.out, "{evicted} dropped to manage congestion.")?;
                match rejected {
                    None => writeln!(self.out, "Packet {pid} from IP {src} added to the queue."),
                    Some(_) => writeln!(
                        self.out,
                        "Packet {pid} from IP {src} not added; a slot is now free, please retry."
                    ),
                }
            }
            EnqueueOutcome::NoDropRejected(_) if at_threshold => writeln!(
                self.out,
                "No packet dropped for IP {src}. Packet {pid} rejected."
            ),
            EnqueueOutcome::NoDropRejected(_) => {
                writeln!(self.out, "Packet {pid} from IP {src} rejected.")
            }
        }
    }

    fn dequeue(&mut self) -> io::Result<()> {
        let pkt = self.queue.dequeue();
        if let Some(v) = &mut self.viz {
            v.record_dequeue(pkt.as_ref(), self.queue.len(), self.queue.capacity());
        }
        match pkt {
            Some(pkt) => writeln!(self.out, "{pkt} dequeued."),
            None => writeln!(self.out, "Queue is empty. No packets to dequeue."),
        }
    }

    fn show(&mut self) -> io::Result<()> {
        if self.queue.is_empty() {
            return writeln!(self.out, "Queue is empty.");
        }
        writeln!(self.out, "Current queue state:")?;
        for pkt in self.queue.iter() {
            writeln!(self.out, "{pkt}")?;
        }
        Ok(())
    }

    fn stats(&mut self) -> io::Result<()> {
        let s = *self.queue.stats();
        writeln!(
            self.out,
            "len={}/{} state={:?} policy={:?} accepted={} evicted={} rejected={} dequeued={} empty_dequeues={} admission_checks={}",
            self.queue.len(),
            self.queue.capacity(),
            self.queue.state(),
            self.queue.policy(),
            s.accepted,
            s.evicted,
            s.rejected,
            s.dequeued,
            s.empty_dequeues,
            s.admission_checks
        )
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        if self.prompts {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        // 与 scanf("%s") 一致：只取第一个单词
        Ok(self
            .read_line()?
            .map(|l| l.split_whitespace().next().unwrap_or_default().to_string()))
    }

    /// 非 UTF-8 字节按替换字符处理，坏输入只影响当前这一行
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
