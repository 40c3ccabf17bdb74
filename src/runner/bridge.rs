//! Running async entry points from synchronous code
//!
//! Every adapter here blocks the calling thread until the future is done.
//! None of them may be called from inside a running tokio runtime.

use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};

/// A current-thread runtime with IO and timers enabled
pub fn default_runtime() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Block until `future` finishes and return its output
pub fn run_until_complete<Fut: Future>(runtime: &Runtime, future: Fut) -> Fut::Output {
    runtime.block_on(future)
}

/// Start `future` and keep the runtime going until Ctrl-C.
///
/// Returns only once the interrupt arrives; the task is aborted then.
pub fn run_forever<Fut>(runtime: &Runtime, future: Fut) -> io::Result<()>
where
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = runtime.spawn(future);
    let result = runtime.block_on(tokio::signal::ctrl_c());
    tracing::debug!("interrupted, stopping task");
    task.abort();
    result
}

/// Turn an async function into a blocking one that runs on `runtime`
pub fn blocking<A, F, Fut>(runtime: Arc<Runtime>, f: F) -> impl Fn(A) -> Fut::Output
where
    F: Fn(A) -> Fut,
    Fut: Future,
{
    move |args| runtime.block_on(f(args))
}

/// Like [`blocking`], but the function also receives a handle to the
/// runtime it runs on
pub fn blocking_with_handle<A, F, Fut>(runtime: Arc<Runtime>, f: F) -> impl Fn(A) -> Fut::Output
where
    F: Fn(A, Handle) -> Fut,
    Fut: Future,
{
    move |args| {
        let handle = runtime.handle().clone();
        runtime.block_on(f(args, handle))
    }
}
