//! The process-wide dispatcher and its free functions.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicUsize, Ordering},
};

use errproc::{Error, Processor, global};

static GLOBAL: Mutex<()> = Mutex::new(());

/// Serializes tests touching the global dispatcher and leaves it empty.
fn exclusive() -> MutexGuard<'static, ()> {
    let guard = GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    global::reset();
    guard
}

fn counting(calls: &Arc<AtomicUsize>) -> Processor {
    let calls = calls.clone();
    Processor::new(move |_: &Error| {
        calls.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_starts_empty_and_resets() {
    let _guard = exclusive();
    assert!(global::dispatcher().registry().is_empty());
    assert_eq!(global::debug(), "");

    global::with([Processor::named("log", |_: &Error| {})]);
    assert_eq!(global::debug(), "log\n");

    global::reset();
    assert_eq!(global::debug(), "");
}

#[test]
fn test_register_process_revoke() {
    let _guard = exclusive();
    let calls = Arc::new(AtomicUsize::new(0));

    let revocation = global::register([counting(&calls)]);
    let err = global::new_error("boom");
    let result = global::process::<()>(Err(err.clone()));
    assert!(Error::ptr_eq(&result.unwrap_err(), &err));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(global::process(Ok::<_, Error>(())).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    revocation.revoke();
    revocation.revoke();
    let _ = global::process::<()>(Err(err));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_process_with_uses_only_given_processors() {
    let _guard = exclusive();
    let registered = Arc::new(AtomicUsize::new(0));
    let adhoc = Arc::new(AtomicUsize::new(0));
    global::with([counting(&registered)]);

    let _ = global::process_with::<(), _>(Err(global::new_error("adhoc")), [counting(&adhoc)]);
    assert_eq!(adhoc.load(Ordering::SeqCst), 1);
    assert_eq!(registered.load(Ordering::SeqCst), 0);
    assert_eq!(global::dispatcher().registry().len(), 1);

    global::reset();
}

#[test]
fn test_constructors_mirror_error() {
    let base = global::new_error("base");
    let wrapped = global::wrap(global::wrap(base.clone(), "outer"), "inner");
    assert_eq!(wrapped.to_string(), "inner: outer: base");
    assert!(Error::ptr_eq(&global::cause(&wrapped), &base));

    let formatted = global::wrapf(
        global::errorf(format_args!("status {}", 503)),
        format_args!("request {}", 9),
    );
    assert_eq!(formatted.to_string(), "request 9: status 503");

    let message = global::wrap_with_message(base.clone(), "context");
    assert!(message.stack().is_none());
    let stacked = global::wrap_with_stack(message);
    assert!(stacked.stack().is_some());
    assert_eq!(stacked.to_string(), "context: base");
    assert!(Error::ptr_eq(&global::cause(&stacked), &base));
}
