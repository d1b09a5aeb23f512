//! Quality gate: schema, traceability and interaction replay in one report.
//!
//! All three checks always run, in that order, and each is timed. Each
//! replay runs as its own task so that a panicking replay becomes a failure
//! detail for its interaction instead of taking the gate down. The task is
//! owned by a `JoinSet`, so dropping the gate future aborts it.

use std::time::{Duration, Instant};

use protospec_core::validate_proto_spec;
use protospec_interchange::ProtoSpec;
use protospec_runtime::{build_replay_plan, run_replay_plan, ReplayOptions};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::report::{CheckName, GateCheck, QualityGateReport};
use crate::trace::build_trace_map;

#[derive(Debug, Clone, Default)]
pub struct GateOptions {
    /// Delay between replayed steps; zero unless a caller wants wall-clock
    /// replay.
    pub replay_step_delay: Duration,
    pub cancel: CancellationToken,
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn schema_check(spec: &ProtoSpec) -> Vec<String> {
    validate_proto_spec(spec)
        .issues
        .into_iter()
        .map(|i| format!("{} at {}: {}", i.code, i.path, i.message))
        .collect()
}

fn traceability_check(spec: &ProtoSpec) -> Vec<String> {
    let trace = build_trace_map(spec);
    let mut details = Vec::new();
    for (_, interaction) in spec.interactions() {
        if interaction.target_node_id.is_none() {
            details.push(format!("{}: missing targetNodeId", interaction.id));
        } else if trace.for_interaction(&interaction.id).is_empty() {
            details.push(format!("{}: no trace entries", interaction.id));
        }
    }
    details
}

async fn replay_check(spec: &ProtoSpec, options: &GateOptions) -> Vec<String> {
    let mut details = Vec::new();
    for (page, interaction) in spec.interactions() {
        let Some(plan) = build_replay_plan(page, &interaction.id) else {
            details.push(format!("{}: replay plan not found", interaction.id));
            continue;
        };
        let replay_options = ReplayOptions {
            step_delay: options.replay_step_delay,
            cancel: options.cancel.clone(),
        };
        let mut task = JoinSet::new();
        task.spawn(async move { run_replay_plan(&plan, &replay_options, |_| {}).await });
        match task.join_next().await {
            Some(Ok(Ok(()))) | None => {}
            Some(Ok(Err(e))) => details.push(format!("{}: {}", interaction.id, e)),
            Some(Err(join)) if join.is_panic() => {
                tracing::error!(interaction_id = %interaction.id, "replay panicked");
                details.push(format!("{}: replay panicked", interaction.id));
            }
            Some(Err(join)) => details.push(format!("{}: {}", interaction.id, join)),
        }
    }
    details
}

/// Run every gate check against `spec`. The spec is only read.
pub async fn run_quality_gate(spec: &ProtoSpec, options: &GateOptions) -> QualityGateReport {
    let mut checks = Vec::with_capacity(3);

    let started = Instant::now();
    let details = schema_check(spec);
    checks.push(GateCheck::from_details(
        CheckName::Schema,
        details,
        elapsed_ms(started),
    ));

    let started = Instant::now();
    let details = traceability_check(spec);
    checks.push(GateCheck::from_details(
        CheckName::Traceability,
        details,
        elapsed_ms(started),
    ));

    let started = Instant::now();
    let details = replay_check(spec, options).await;
    checks.push(GateCheck::from_details(
        CheckName::InteractionReplay,
        details,
        elapsed_ms(started),
    ));

    let report = QualityGateReport::new(spec.id.clone(), checks);
    for check in report.failed() {
        tracing::warn!(
            spec_id = %report.spec_id,
            check = %check.name,
            failures = check.details.len(),
            "quality gate check failed"
        );
    }
    tracing::info!(spec_id = %report.spec_id, passed = report.passed, "quality gate finished");
    report
}
