//! Registering, running and revoking error processors.
//!
//! A `log` processor stays registered for the whole run, while an `alert`
//! processor is registered for a while and then revoked again.

use errproc::{Error, Processor, ResultExt, global};

fn fetch(id: u32) -> Result<String, Error> {
    if id == 0 {
        errproc::bail!("no record with id {id}");
    }
    Ok(format!("record {id}"))
}

fn load(id: u32) -> Result<String, Error> {
    fetch(id).wrap("loading dashboard")
}

fn main() {
    let _log = global::register([Processor::named("log", |err: &Error| {
        println!("log: {err}");
    })]);

    let alert = global::register([Processor::named("alert", |err: &Error| {
        println!("alert: root cause is {:?}", err.cause().message());
    })]);

    println!("registered:\n{}", global::debug());

    // Both processors see this one.
    let _ = global::process(load(0));

    alert.revoke();

    // Only `log` sees this one.
    let _ = global::process(load(0));

    // Nothing runs for successful results.
    let ok = global::process(load(7));
    println!("ok: {ok:?}");
}
