//! Dispatch scenarios on explicit dispatchers: short-circuiting on `Ok`,
//! register/revoke round trips, independent registrations and ad-hoc
//! processing.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use errproc::{Dispatcher, Error, Processor};

/// Records every error a processor receives.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Error>>>);

impl Recorder {
    fn processor(&self, name: &'static str) -> Processor {
        let seen = self.0.clone();
        Processor::named(name, move |err: &Error| {
            seen.lock().unwrap().push(err.clone());
        })
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn all_are(&self, err: &Error) -> bool {
        self.0.lock().unwrap().iter().all(|seen| Error::ptr_eq(seen, err))
    }
}

fn counting(calls: &Arc<AtomicUsize>) -> Processor {
    let calls = calls.clone();
    Processor::new(move |_: &Error| {
        calls.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_ok_short_circuits_for_any_registry_state() {
    let calls = Arc::new(AtomicUsize::new(0));

    let empty = Dispatcher::empty();
    assert_eq!(empty.process(Ok::<_, Error>("value")).unwrap(), "value");

    let busy = Dispatcher::new((0..8).map(|_| counting(&calls)));
    assert_eq!(busy.process(Ok::<_, Error>(1)).unwrap(), 1);
    assert_eq!(
        busy.process_with(Ok::<_, Error>(2), [counting(&calls)]).unwrap(),
        2
    );

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_log_then_alert_each_fire_once_per_call() {
    let dispatcher = Dispatcher::empty();
    let log = Recorder::default();
    let alert = Recorder::default();
    let err = Error::new("boom");

    let _revoke_log = dispatcher.register([log.processor("log")]);
    let result = dispatcher.process::<()>(Err(err.clone()));
    assert!(Error::ptr_eq(&result.unwrap_err(), &err));
    assert_eq!(log.len(), 1);
    assert_eq!(alert.len(), 0);

    let _revoke_alert = dispatcher.register([alert.processor("alert")]);
    let _ = dispatcher.process::<()>(Err(err.clone()));
    assert_eq!(log.len(), 2);
    assert_eq!(alert.len(), 1);

    assert!(log.all_are(&err));
    assert!(alert.all_are(&err));
}

#[test]
fn test_revoke_then_reprocess() {
    let dispatcher = Dispatcher::empty();
    let log = Recorder::default();
    let alert = Recorder::default();
    let err = Error::new("boom");

    let _revoke_log = dispatcher.register([log.processor("log")]);
    let revoke_alert = dispatcher.register([alert.processor("alert")]);

    revoke_alert.revoke();
    let _ = dispatcher.process::<()>(Err(err.clone()));

    assert_eq!(log.len(), 1);
    assert_eq!(alert.len(), 0);
}

#[test]
fn test_register_revoke_round_trip() {
    let dispatcher = Dispatcher::new([Processor::named("base", |_: &Error| {})]);
    let calls = Arc::new(AtomicUsize::new(0));

    let revocation = dispatcher.register([counting(&calls)]);
    let _ = dispatcher.process::<()>(Err(Error::new("first")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(
        revocation
            .handles()
            .iter()
            .all(|handle| dispatcher.registry().contains(*handle))
    );

    revocation.revoke();
    let _ = dispatcher.process::<()>(Err(Error::new("second")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A second revoke finds nothing and leaves other entries alone.
    revocation.revoke();
    assert_eq!(dispatcher.registry().len(), 1);
    assert!(dispatcher.debug().starts_with("base"));
}

#[test]
fn test_identical_processors_are_independent() {
    let dispatcher = Dispatcher::empty();
    let calls = Arc::new(AtomicUsize::new(0));
    let processor = counting(&calls);

    let first = dispatcher.register([&processor]);
    let _second = dispatcher.register([&processor]);

    let _ = dispatcher.process::<()>(Err(Error::new("twice")));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    first.revoke();
    let _ = dispatcher.process::<()>(Err(Error::new("once")));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_process_with_leaves_registry_alone() {
    let registered = Recorder::default();
    let adhoc = Recorder::default();
    let dispatcher = Dispatcher::new([registered.processor("registered")]);
    let before = dispatcher.debug();
    let err = Error::new("adhoc");

    let result = dispatcher.process_with::<(), _>(Err(err.clone()), [adhoc.processor("adhoc")]);
    assert!(Error::ptr_eq(&result.unwrap_err(), &err));

    assert_eq!(adhoc.len(), 1);
    assert_eq!(registered.len(), 0);
    assert_eq!(dispatcher.debug(), before);
}

#[test]
fn test_with_invalidates_outstanding_revocations() {
    let dispatcher = Dispatcher::empty();
    let old = Recorder::default();
    let new = Recorder::default();

    let revocation = dispatcher.register([old.processor("old")]);
    dispatcher.with([new.processor("new")]);
    revocation.revoke();

    let _ = dispatcher.process::<()>(Err(Error::new("after with")));
    assert_eq!(old.len(), 0);
    assert_eq!(new.len(), 1);
    assert_eq!(dispatcher.debug(), "new\n");
}

#[test]
fn test_debug_is_stable_without_mutation() {
    let dispatcher = Dispatcher::new([
        Processor::named("a", |_: &Error| {}),
        Processor::named("b", |_: &Error| {}),
        Processor::named("c", |_: &Error| {}),
    ]);
    let revocation = dispatcher.register([Processor::named("d", |_: &Error| {})]);
    let _ = dispatcher.register([Processor::named("e", |_: &Error| {})]);
    revocation.revoke();

    let first = dispatcher.debug();
    assert_eq!(first, dispatcher.debug());

    let mut lines: Vec<_> = first.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["a", "b", "c", "e"]);
}

#[test]
#[should_panic(expected = "processor failed")]
fn test_processor_panics_propagate() {
    let dispatcher = Dispatcher::new([Processor::named("panics", |_: &Error| {
        panic!("processor failed");
    })]);
    let _ = dispatcher.process::<()>(Err(Error::new("boom")));
}

#[test]
fn test_processors_may_use_the_dispatcher() {
    // Processors run with no lock held, so they can modify the registry.
    let dispatcher = Arc::new(Dispatcher::empty());
    let registered = Arc::new(AtomicUsize::new(0));

    let processor = Processor::named("registers", {
        let dispatcher = Arc::downgrade(&dispatcher);
        let registered = registered.clone();
        move |_: &Error| {
            if let Some(dispatcher) = dispatcher.upgrade() {
                let _ = dispatcher.register([Processor::named("late", |_: &Error| {})]);
                registered.fetch_add(1, Ordering::SeqCst);
            }
        }
    });
    dispatcher.with([processor]);

    let _ = dispatcher.process::<()>(Err(Error::new("boom")));
    assert_eq!(registered.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.registry().len(), 2);
}
