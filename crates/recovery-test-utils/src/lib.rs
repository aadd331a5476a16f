//! Testing utilities for the recovery workspace
//!
//! Shared plan and intent fixtures with pinned time.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use recovery_model::{
    FixedClock, IntentPriority, IntentScope, PlanMode, RecoveryAction, RecoveryIntent,
    RecoveryPlan, RecoveryStep, SequentialIdSource,
};

/// Instant every fixture clock is pinned to
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(fixed_time())
}

pub fn sequential_ids() -> SequentialIdSource {
    SequentialIdSource::new()
}

pub fn create_action(id: &str, region: &str, minutes: u32) -> RecoveryAction {
    RecoveryAction::new(id, format!("svc-{id}"), region).with_duration(minutes)
}

pub fn create_plan(plan_id: &str, mode: PlanMode, actions: Vec<RecoveryAction>) -> RecoveryPlan {
    actions
        .into_iter()
        .fold(RecoveryPlan::new(plan_id, mode), RecoveryPlan::with_action)
}

/// Eight short, mostly independent actions across two regions; safe, tight SLA
pub fn create_calm_plan() -> RecoveryPlan {
    let actions = (0..8)
        .map(|i| {
            let region = if i % 2 == 0 { "eu-west-1" } else { "us-east-1" };
            create_action(&format!("step-{i}"), region, 4 + i).with_retries(1)
        })
        .collect();
    create_plan("calm-plan", PlanMode::Automated, actions)
        .with_safety(true)
        .with_sla(90)
}

/// Dependency-heavy plan with critical, long-running actions
pub fn create_incident_plan() -> RecoveryPlan {
    let actions = vec![
        create_action("isolate", "us-east-1", 15)
            .with_tag("critical")
            .with_retries(1),
        create_action("failover-db", "us-east-1", 120)
            .depends_on("isolate")
            .with_tag("critical")
            .with_tag("database")
            .with_retries(2),
        create_action("reroute", "eu-west-1", 30).depends_on("isolate"),
        create_action("warm-cache", "eu-west-1", 45)
            .depends_on("failover-db")
            .depends_on("reroute"),
        create_action("verify", "ap-south-1", 20)
            .depends_on("failover-db")
            .depends_on("reroute")
            .depends_on("warm-cache"),
    ];
    create_plan("incident-plan", PlanMode::Semi, actions).with_sla(180)
}

/// Single telemetry step on a critical, platform-wide intent
pub fn create_platform_intent() -> RecoveryIntent {
    RecoveryIntent::new(
        "intent-platform",
        "Restore control plane",
        IntentScope::Platform,
        IntentPriority::Critical,
        fixed_time(),
    )
    .with_step(
        RecoveryStep::new("restart-control-plane", "Restart control plane pods")
            .with_minutes(60)
            .with_risk_adjustment(10)
            .requires("telemetry"),
    )
}

/// Low-priority, multi-step service intent scheduled two hours out
pub fn create_service_intent() -> RecoveryIntent {
    RecoveryIntent::new(
        "intent-service",
        "Recycle cache tier",
        IntentScope::Service,
        IntentPriority::Low,
        fixed_time(),
    )
    .starting_at(fixed_time() + Duration::minutes(120))
    .with_step(RecoveryStep::new("drain", "Drain cache nodes").with_minutes(10))
    .with_step(
        RecoveryStep::new("recycle", "Recycle cache nodes")
            .with_minutes(25)
            .requires("telemetry")
            .requires("fleet-api"),
    )
    .with_step(RecoveryStep::new("verify", "Verify hit rate").with_minutes(5))
}
