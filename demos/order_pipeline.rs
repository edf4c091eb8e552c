//! Order Pipeline Example
//!
//! A three-step pipeline runs several orders concurrently while a controller
//! task plays the role of a human operator.
//!
//! - A breakpoint on `charge` fires only for orders flagged `review`
//! - The controller inspects each paused execution's context snapshot
//! - Large orders are aborted, the rest continue with a corrected amount
//!
//! Run with `cargo run --example order-pipeline` and watch the `Tracer`
//! monitor log every hit, pause and resume.

use std::{sync::Arc, time::Duration};

use serde_json::json;
use waypoint::{
    Action, BreakpointInterceptor, BreakpointManager, Config, ContextMap, ResumeAction,
    monitors::Tracer,
};

const STEPS: [&str; 3] = ["validate", "charge", "notify"];

async fn run_order<I: BreakpointInterceptor>(interceptor: &I, order: u64, mut ctx: ContextMap) -> waypoint::Result<()> {
    let run_id = format!("order-{order}");
    for (index, step) in STEPS.iter().enumerate() {
        if interceptor.should_pause("orders", step, &ctx) {
            let decision = interceptor
                .wait_for_resume(&run_id, "orders", step, index, &ctx)
                .await?;
            decision.apply_to(&mut ctx);
            match decision.action {
                Action::Abort => {
                    println!("{run_id}: aborted at {step}");
                    return Ok(());
                }
                Action::Skip => continue,
                Action::Continue | Action::StepOver => {}
            }
        }
        println!("{run_id}: {step} (amount {})", ctx["amount"]);
    }
    Ok(())
}

/// Resumes paused orders until every run has finished.
async fn operator(manager: Arc<BreakpointManager>, expected: usize) {
    let mut handled = 0;
    while handled < expected {
        for paused in manager.list_paused() {
            let amount = paused.context["amount"].as_u64().unwrap_or_default();
            let decision = if amount > 1_000 {
                ResumeAction::abort()
            } else {
                let data = json!({ "amount": amount + 1 }).as_object().cloned().unwrap_or_default();
                ResumeAction::continue_().with_data(data)
            };
            if manager.resume(&paused.id, decision).is_ok() {
                handled += 1;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::main]
async fn main() -> waypoint::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let manager = Arc::new(BreakpointManager::new(Config::default()).with_monitor(Tracer));
    manager.set_breakpoint("orders", "charge", Some("review"));

    let orders = [(1, 50, true), (2, 5_000, true), (3, 20, false)];
    let reviewed = orders.iter().filter(|(_, _, review)| *review).count();

    let controller = tokio::spawn(operator(manager.clone(), reviewed));
    let runs: Vec<_> = orders
        .into_iter()
        .map(|(order, amount, review)| {
            let manager = manager.clone();
            let ctx = json!({ "amount": amount, "review": review })
                .as_object()
                .cloned()
                .unwrap_or_default();
            tokio::spawn(async move { run_order(manager.as_ref(), order, ctx).await })
        })
        .collect();

    for run in runs {
        if let Ok(result) = run.await {
            result?;
        }
    }
    let _ = controller.await;

    for bp in manager.list_breakpoints() {
        println!("{} hit {} time(s)", bp.scope, bp.hit_count);
    }
    Ok(())
}
