use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use loam_world::{GenCtx, WorldGen};

/// Lock-free pool for reusing `GenCtx` noise sources across worker jobs.
pub struct GenCtxPool {
    available_tx: Sender<GenCtx>,
    available_rx: Receiver<GenCtx>,
    allocated: AtomicUsize,
    max_contexts: usize,
}

impl GenCtxPool {
    pub fn new(max_contexts: usize) -> Self {
        let max_contexts = max_contexts.max(1);
        let (tx, rx) = bounded(max_contexts);
        Self {
            available_tx: tx,
            available_rx: rx,
            allocated: AtomicUsize::new(0),
            max_contexts,
        }
    }

    pub fn with_capacity_from_workers(worker_count: usize) -> Arc<Self> {
        Arc::new(Self::new(worker_count.max(1) * 2))
    }

    /// Runs `f` with a pooled context, creating one if under capacity and
    /// otherwise waiting for another job to hand one back.
    pub fn with_ctx<R>(&self, wg: &WorldGen, f: impl FnOnce(&GenCtx) -> R) -> R {
        let ctx = self.acquire(wg);
        let out = f(&ctx);
        let _ = self.available_tx.send(ctx);
        out
    }

    fn acquire(&self, wg: &WorldGen) -> GenCtx {
        if let Ok(ctx) = self.available_rx.try_recv() {
            return ctx;
        }
        loop {
            let current = self.allocated.load(Ordering::Acquire);
            if current < self.max_contexts {
                let prev = self.allocated.fetch_add(1, Ordering::AcqRel);
                if prev < self.max_contexts {
                    return wg.make_gen_ctx();
                }
                self.allocated.fetch_sub(1, Ordering::AcqRel);
            }
            // Both ends live in `self`, so the channel cannot disconnect.
            if let Ok(ctx) = self.available_rx.recv() {
                return ctx;
            }
        }
    }

    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_are_reused() {
        let pool = GenCtxPool::new(2);
        let wg = WorldGen::default();
        let a = pool.with_ctx(&wg, |ctx| ctx.seed);
        let b = pool.with_ctx(&wg, |ctx| ctx.seed);
        assert_eq!(a, b);
        assert_eq!(pool.allocated(), 1);
    }
}
