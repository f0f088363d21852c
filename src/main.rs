use anyhow::{bail, Result};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::thread_rng;
use skiplist::lock::{RawFairRwLock, RawLock, RawMutex};
use skiplist::{Skiplist, SkiplistConfig};
use std::str::FromStr;
use std::sync::{Arc, Barrier};
use std::thread::spawn;
use std::time::Instant;
use structopt::StructOpt;

#[derive(Debug, Clone, Copy)]
enum LockKind {
    Mutex,
    RwLock,
}

impl FromStr for LockKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mutex" => Ok(LockKind::Mutex),
            "rwlock" => Ok(LockKind::RwLock),
            _ => Err(format!("unknown lock {}, expected mutex or rwlock", s)),
        }
    }
}

/// Hammers a shared skiplist: concurrent inserts, a barrier, concurrent
/// deletes, then checks every count.
#[derive(Debug, StructOpt)]
struct Opt {
    /// Overrides SKIPLIST_MAX_LEVEL
    #[structopt(short, long)]
    max_level: Option<usize>,
    #[structopt(short, long, default_value = "8")]
    threads: usize,
    /// Distinct values, 0..values
    #[structopt(short, long, default_value = "4")]
    values: u64,
    /// Inserts per value
    #[structopt(short, long, default_value = "200")]
    inserts: usize,
    /// Deletes per value, at most `inserts`
    #[structopt(short, long, default_value = "150")]
    deletes: usize,
    #[structopt(short, long, default_value = "mutex")]
    lock: LockKind,
}

fn split_jobs(values: u64, per_value: usize, threads: usize) -> Vec<Vec<u64>> {
    let mut jobs: Vec<u64> = (0..values)
        .flat_map(|v| std::iter::repeat(v).take(per_value))
        .collect();
    jobs.shuffle(&mut thread_rng());
    let mut chunks = vec![vec![]; threads];
    for (i, job) in jobs.into_iter().enumerate() {
        chunks[i % threads].push(job);
    }
    chunks
}

fn run<R>(opt: &Opt, config: &SkiplistConfig) -> Result<()>
where
    R: RawLock + Send + Sync + 'static,
{
    let list: Skiplist<u64, R> = Skiplist::with_config(config, |a: &u64, b: &u64| a < b)?;
    let list = Arc::new(list);
    let inserts = split_jobs(opt.values, opt.inserts, opt.threads);
    let deletes = split_jobs(opt.values, opt.deletes, opt.threads);
    let barrier = Arc::new(Barrier::new(opt.threads));
    let start = Instant::now();
    let mut handlers = vec![];
    for (id, (ins, del)) in inserts.into_iter().zip(deletes).enumerate() {
        let list = Arc::clone(&list);
        let barrier = Arc::clone(&barrier);
        handlers.push(spawn(move || {
            debug!("worker {} inserting {} values", id, ins.len());
            for v in ins {
                list.insert(v);
            }
            barrier.wait();
            debug!("worker {} deleting {} values", id, del.len());
            del.iter().filter(|v| !list.delete(v)).count()
        }));
    }
    let mut missed = 0;
    for handler in handlers {
        missed += handler
            .join()
            .map_err(|_| anyhow::anyhow!("worker panicked"))?;
    }
    info!("workload done in {:?}: {:?}", start.elapsed(), list);
    if missed > 0 {
        bail!("{} deletes found nothing", missed);
    }
    let expected = (opt.inserts - opt.deletes) as u64;
    for v in 0..opt.values {
        let count = list.count(&v);
        info!("count({}) = {}", v, count);
        if count != expected {
            bail!("count({}) is {}, expected {}", v, count, expected);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    if opt.deletes > opt.inserts {
        bail!("deletes ({}) exceed inserts ({})", opt.deletes, opt.inserts);
    }
    if opt.threads == 0 {
        bail!("need at least one thread");
    }
    let mut config = SkiplistConfig::from_env()?;
    if let Some(max_level) = opt.max_level {
        config.max_level = max_level;
    }
    info!("running {:?} with {:?}", opt, config);
    match opt.lock {
        LockKind::Mutex => run::<RawMutex>(&opt, &config),
        LockKind::RwLock => run::<RawFairRwLock>(&opt, &config),
    }
}
