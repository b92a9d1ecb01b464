//! Elapsed-time instrumentation for synchronous and asynchronous work.
//!
//! [`Timing::measure`] and [`Timing::measure_async`] share one contract: the
//! wrapped work is invoked immediately with the given context and arguments,
//! its result is handed back untouched, and exactly one `debug` record with
//! the elapsed time is emitted under the [`TIMING_TARGET`] log target.
//!
//! For asynchronous work the record is emitted when the returned future
//! resolves, whatever it resolves to. The caller is never blocked. A future
//! that is dropped unfinished never resolves and so logs nothing.
//!
//! ```rust
//! use dockwatch::timing::Timing;
//!
//! let timing = Timing::new();
//! let sum = timing.measure("sum", |base: u32, extra: u32| base + extra, 40, 2);
//! assert_eq!(sum, 42);
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

/// Log target of every timing record.
pub const TIMING_TARGET: &str = "dockwatch::timing";

/// Stopwatch that reports through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timing;

impl Timing {
    pub const fn new() -> Self {
        Timing
    }

    /// Run `work(context, args)` and log how long it took.
    pub fn measure<C, A, R, F>(&self, label: &str, work: F, context: C, args: A) -> R
    where
        F: FnOnce(C, A) -> R,
    {
        let started = Instant::now();
        let result = work(context, args);
        record(label, started.elapsed());
        result
    }

    /// Start `work(context, args)` now and return a future that resolves to
    /// its output, logging the elapsed time at resolution.
    ///
    /// The clock starts when this method is called, not when the returned
    /// future is first polled. A future dropped before it completes emits no
    /// record.
    pub fn measure_async<C, A, F, Fut>(
        &self,
        label: &str,
        work: F,
        context: C,
        args: A,
    ) -> impl Future<Output = Fut::Output> + use<C, A, F, Fut>
    where
        F: FnOnce(C, A) -> Fut,
        Fut: Future,
    {
        let started = Instant::now();
        let pending = work(context, args);
        let label = label.to_owned();
        async move {
            let output = pending.await;
            record(&label, started.elapsed());
            output
        }
    }
}

fn record(label: &str, elapsed: Duration) {
    log::debug!(target: TIMING_TARGET, "{} took {:?}", label, elapsed);
}
