//! Minimal wicket example: one middleware, one chain, a handful of
//! simulated requests.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! The chain mirrors a small pets API: the middleware stamps responses, and
//! the gates decide which requests it may touch. Watch the debug log to see
//! matchers being built once and reused.

use wicket::{Condition, Conditional, Endpoint, IffUnless, Method, Next, Request, Response};

#[tokio::main]
async fn main() -> Result<(), wicket::Error> {
    tracing_subscriber::fmt::init();

    let iff_unless = IffUnless::new();

    // The middleware under conditional execution. It claims the response;
    // requests it skips fall through to the terminal handler below.
    let stamp = iff_unless.wrap(|req: Request, _next: Next| async move {
        Response::text(format!("stamped {} {}", req.method(), req.path()))
    });

    let chain = stamp
        .iff(Condition::predicate(|req| req.path().starts_with("/pets")))?
        .iff(Condition::endpoints(vec![
            Endpoint::new("/pets/{id}").update_params(true),
            Endpoint::new("/pets/{id}").methods([Method::GET]).version("3.0.0"),
        ]))?
        .unless(Condition::endpoints(vec![
            Endpoint::from("/pets/groups/list"),
            Endpoint::new("/pets/{id}").methods([Method::DELETE]),
        ]))?
        .unless(Condition::endpoints(vec![
            Endpoint::new("/pets/{id}").methods([Method::GET]).version("2.x"),
        ]))?;

    // What a framework would do per request.
    show(&chain, Request::new(Method::GET, "/pets/0")).await;
    show(&chain, Request::new(Method::GET, "/pets/groups/list")).await;
    show(&chain, Request::new(Method::DELETE, "/pets/0")).await;
    show(&chain, Request::new(Method::GET, "/pets/0").with_header("accept-version", "2.0.1")).await;
    show(&chain, Request::new(Method::GET, "/pets/0").with_header("accept-version", "3.x")).await;
    show(&chain, Request::new(Method::GET, "/users/0")).await;

    Ok(())
}

async fn show(chain: &Conditional, req: Request) {
    let label = format!(
        "{} {}{}",
        req.method(),
        req.path(),
        req.header("accept-version")
            .map(|v| format!(" (accept-version: {v})"))
            .unwrap_or_default(),
    );
    let res = chain
        .call(req, Next::new(|_: Request| async { Response::text("passed through") }))
        .await;
    println!("{label:<45} -> {}", String::from_utf8_lossy(res.body()));
}
