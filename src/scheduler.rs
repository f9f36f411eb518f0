//! The scheduler: process-wide singleton state plus the six public
//! operations that mutate it.
//!
//! Everything here runs on a single OS thread, so the "singleton" is a
//! plain `static mut` rather than anything `Arc`/`Mutex`-wrapped. There is
//! no second thread that could ever contend for it; the preemption signal,
//! not a lock, is what keeps the timer handler from observing a
//! half-updated run queue (see [`crate::gate`]).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{fatal, Error};
use crate::gate::{self, Gate};
use crate::list::RunQueue;
use crate::ports::{self, Context};
use crate::thread::{EntryFn, Thread as ThreadRecord, ThreadId, ThreadState};
use crate::timer;

static mut SCHEDULER: Option<Scheduler> = None;

/// Set by whichever scheduler-loop iteration is about to switch into a
/// thread for the first time; read and cleared by [`trampoline`] the moment
/// that thread starts running. A single slot suffices because only one
/// context is ever mid-first-switch at a time.
static mut PENDING_ENTRY: Option<(EntryFn, usize)> = None;

struct Scheduler {
    table: HashMap<ThreadId, ThreadRecord>,
    queue: RunQueue,
    current: Option<ThreadId>,
    scheduler_context: Context,
    next_id: u64,
}

impl Scheduler {
    fn alloc_id(&mut self) -> ThreadId {
        let id = ThreadId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn scheduler() -> &'static mut Scheduler {
    unsafe {
        SCHEDULER
            .as_mut()
            .expect("uthread: no running scheduler (call uthread::init first)")
    }
}

/// A handle identifying a thread, independent of whether it is still
/// running. Cheap to copy; the name is cached at creation time (mirroring
/// `std::thread::Thread`) so it stays readable even after the thread this
/// handle names has terminated and been reaped.
#[derive(Clone, Debug)]
pub struct Thread {
    id: ThreadId,
    name: Arc<str>,
}

impl Thread {
    /// The name this thread was spawned with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owned capability to wait for a spawned thread to finish. Not `Clone`:
/// `join` consumes it, so at most one thread can ever be blocked waiting on
/// a given target, enforced at compile time rather than at a `waiter` slot.
pub struct JoinHandle {
    thread: Thread,
}

impl JoinHandle {
    /// The handle of the thread this `JoinHandle` will wait for.
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Block the calling thread until the target has terminated. A no-op if
    /// the target has already terminated (or, degenerately, never existed).
    pub fn join(self) {
        wait(self.thread.id);
    }
}

/// Bootstrap the scheduler: create the initial thread bound to
/// `(entry, arg)`, arm the preemption timer, and run threads to completion.
/// Returns once every spawned thread has terminated; the host's own `main`
/// then ends normally, which is what actually exits the process with
/// success. This function never calls `process::exit` on the success path;
/// only [`crate::error::fatal`] does, on the genuinely unrecoverable paths.
///
/// # Panics
/// Aborts the process with `FATAL_REINIT` if called more than once.
pub fn init(entry: EntryFn, arg: usize) {
    log::debug!("init: bootstrapping scheduler");
    unsafe {
        if SCHEDULER.is_some() {
            fatal(Error::Reinit, "init");
        }
        SCHEDULER = Some(Scheduler {
            table: HashMap::new(),
            queue: RunQueue::new(),
            current: None,
            scheduler_context: Context::default(),
            next_id: 0,
        });
    }

    // Blocked from here until the first thread's trampoline (or resume
    // tail) explicitly opens the gate again; see crate::gate.
    gate::block();

    let sched = scheduler();
    let id = sched.alloc_id();
    let name: Arc<str> = Arc::from("main");
    let record = match ThreadRecord::new(id, name, entry, arg, trampoline) {
        Some(t) => t,
        None => fatal(Error::Alloc, "init"),
    };
    sched.table.insert(id, record);
    sched.queue.push_tail(id);
    log::debug!("init: created thread {id:?} (\"main\")");

    unsafe { timer::arm() };

    run_loop();

    timer::disarm();
    log::debug!("init: run queue drained, scheduler returning");
}

/// Spawn a new thread named `name` that begins by calling `entry(arg)`.
/// Returns a [`JoinHandle`] that can later `join` on it.
///
/// # Panics
/// Aborts the process with `FATAL_ALLOC` if the thread record or its stack
/// cannot be allocated.
pub fn spawn(name: impl Into<String>, entry: EntryFn, arg: usize) -> JoinHandle {
    let _gate = Gate::acquire();
    let sched = scheduler();
    let id = sched.alloc_id();
    let name: Arc<str> = Arc::from(name.into());
    let record = match ThreadRecord::new(id, Arc::clone(&name), entry, arg, trampoline) {
        Some(t) => t,
        None => fatal(Error::Alloc, "spawn"),
    };
    sched.table.insert(id, record);
    sched.queue.push_tail(id);
    log::debug!("spawn: created thread {id:?} ({name:?})");
    JoinHandle {
        thread: Thread { id, name },
    }
}

/// Voluntarily give up the remainder of this thread's quantum. Resumes once
/// every other thread that was READY at the time has had its turn.
///
/// # Panics
/// Panics if called outside of any thread (i.e. before `init` has started
/// running one).
pub fn yield_now() {
    park_current_as(ThreadState::Ready);
}

/// Terminate the calling thread. If another thread is waiting for this one
/// via `join`, that thread becomes READY again. Never returns.
///
/// # Panics
/// Panics if called outside of any thread.
pub fn exit() -> ! {
    gate::block();
    let sched = scheduler();
    let id = sched
        .current
        .expect("uthread::exit called with no running thread");
    sched.queue.remove(id);
    if let Some(record) = sched.table.get(&id) {
        if let Some(waiter) = record.waiter {
            if let Some(w) = sched.table.get_mut(&waiter) {
                w.state = ThreadState::Ready;
            }
        }
    }
    log::debug!("exit: thread {id:?} terminated");
    // Free the record (and its stack) before the final switch. Nothing
    // resumes into this context again, so the stack this call itself is
    // running on being deallocated out from under it is safe in practice:
    // no other code runs between the free and the switch (single OS
    // thread), and the switch never touches this stack's contents again.
    sched.table.remove(&id);
    sched.current = None;

    let scheduler_ctx: *const Context = &sched.scheduler_context;
    let mut discarded = Context::default();
    unsafe { ports::switch(&mut discarded, scheduler_ctx) };
    unreachable!("a reaped thread was switched back into");
}

/// Block the calling thread until `target` has terminated. Returns
/// immediately if `target` has already terminated or never existed.
fn wait(target: ThreadId) {
    gate::block();
    let sched = scheduler();
    if !sched.table.contains_key(&target) {
        gate::unblock();
        return;
    }
    let id = sched
        .current
        .expect("uthread::join called with no running thread");
    sched
        .table
        .get_mut(&target)
        .expect("checked above")
        .waiter = Some(id);
    sched
        .table
        .get_mut(&id)
        .expect("current thread missing from table")
        .state = ThreadState::Waiting;
    switch_to_scheduler(id);
    gate::unblock();
}

/// The currently running thread's handle. Does not enter the gate (pure
/// read), mirroring `std::thread::current`.
///
/// # Panics
/// Panics if called outside of any thread.
pub fn current() -> Thread {
    let sched = scheduler();
    let id = sched
        .current
        .expect("uthread::current called with no running thread");
    let record = sched
        .table
        .get(&id)
        .expect("current thread missing from table");
    Thread {
        id,
        name: Arc::clone(&record.name),
    }
}

/// Tear down the singleton scheduler so a later [`init`] can run in the same
/// process. Gated behind the `test-support` feature: production code must
/// invoke `init` exactly once per process (re-entry is `FATAL_REINIT`), but
/// an integration test binary that drives several `#[sequential]` scenarios
/// through the singleton needs a way to start each one from a clean slate,
/// the same way this lineage's other singleton-scheduler crates expose a
/// `reset_task_manager`-style hook for exactly that purpose.
///
/// # Panics
/// Panics if called while a thread is still running (i.e. from inside a
/// spawned thread, or before the previous `init` has returned).
#[cfg(feature = "test-support")]
pub fn reset_scheduler_for_tests() {
    unsafe {
        if let Some(sched) = SCHEDULER.as_ref() {
            assert!(
                sched.current.is_none(),
                "reset_scheduler_for_tests called while a thread was still running"
            );
        }
        SCHEDULER = None;
        PENDING_ENTRY = None;
    }
}

/// Entry point for the preemption timer's signal handler. Identical to a
/// voluntary `yield_now`, just invoked asynchronously.
pub(crate) fn preempt() {
    if scheduler().current.is_some() {
        park_current_as(ThreadState::Ready);
    }
}

fn park_current_as(new_state: ThreadState) {
    gate::block();
    let sched = scheduler();
    let id = sched
        .current
        .expect("uthread: yield/preempt with no running thread");
    sched
        .table
        .get_mut(&id)
        .expect("current thread missing from table")
        .state = new_state;
    switch_to_scheduler(id);
    gate::unblock();
}

/// Switch from thread `id`'s context to the scheduler context. Returns once
/// the scheduler resumes this thread again.
fn switch_to_scheduler(id: ThreadId) {
    let sched = scheduler();
    let thread_ctx: *mut Context = &mut sched
        .table
        .get_mut(&id)
        .expect("current thread missing from table")
        .context;
    let scheduler_ctx: *const Context = &sched.scheduler_context;
    unsafe { ports::switch(thread_ctx, scheduler_ctx) };
}

/// The first code a freshly created thread ever executes, on its own stack.
/// Reads the pending `(entry, arg)` pair the scheduler stashed immediately
/// before switching in, opens the gate (this is the one resume that was
/// never itself the far side of a `yield_now`/`wait`, so nobody else will),
/// runs the thread's entry function, and implicitly exits if it returns.
extern "C" fn trampoline() -> ! {
    let (entry, arg) = unsafe { PENDING_ENTRY.take() }
        .expect("trampoline entered with no pending entry recorded");
    gate::unblock();
    entry(arg);
    exit();
}

/// Scheduler loop: repeatedly pick the next non-WAITING thread, resume it,
/// and reclassify it on return. See the module's top-level documentation
/// for why this needs no `Gate` of its own.
fn run_loop() {
    loop {
        let sched = scheduler();
        if sched.queue.is_empty() {
            break;
        }
        let table = &sched.table;
        let next = sched.queue.find_first(|id| {
            table
                .get(&id)
                .map(|t| t.state != ThreadState::Waiting)
                .unwrap_or(false)
        });
        let id = match next {
            Some(id) => id,
            None => {
                log::debug!("run_loop: every queued thread is waiting, deadlocked");
                fatal(Error::Deadlock, "scheduler loop")
            }
        };

        sched.queue.remove(id);
        let record = sched
            .table
            .get_mut(&id)
            .expect("run queue referenced an unknown thread");
        record.state = ThreadState::Running;
        if let Some(pending) = record.pending.take() {
            unsafe { PENDING_ENTRY = Some(pending) };
        }
        sched.current = Some(id);

        log::trace!("run_loop: switching into {id:?}");
        let scheduler_ctx: *mut Context = &mut sched.scheduler_context;
        let thread_ctx: *const Context = &sched
            .table
            .get(&id)
            .expect("run queue referenced an unknown thread")
            .context;
        unsafe { ports::switch(scheduler_ctx, thread_ctx) };
        log::trace!("run_loop: resumed from {id:?}");

        let sched = scheduler();
        sched.current = None;
        if sched.table.contains_key(&id) {
            sched.queue.push_tail(id);
        }
    }
}
