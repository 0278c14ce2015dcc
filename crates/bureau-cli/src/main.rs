//! Bureau CLI
//!
//! Runs the insight engine against a synthetic workspace snapshot and
//! prints the execution report. A debugging surface, not a product UI.

use anyhow::Result;
use bureau_agents::AgentRegistry;
use bureau_context::{
    ContextSnapshot, DimensionSnapshot, FocusMode, FocusState, HealthCounters, RunConfig,
    SnapshotSet, TimelineEvent, TimelineEventKind, TopologyNode, Trend,
};
use bureau_engine::{EngineConfig, ExecutionReport, InsightEngine};
use bureau_insight::InsightKind;
use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Command::new("bureau")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bureau insight engine")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Run all agents against a synthetic workspace snapshot")
                .arg(
                    Arg::new("threshold")
                        .long("threshold")
                        .default_value("0.5")
                        .value_parser(value_parser!(f64))
                        .help("Confidence threshold insights must clear"),
                )
                .arg(
                    Arg::new("max-insights")
                        .long("max-insights")
                        .default_value("10")
                        .value_parser(value_parser!(usize))
                        .help("Insight budget per agent invocation"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("demo", args)) => {
            let threshold = *args.get_one::<f64>("threshold").expect("has default");
            let max_insights = *args.get_one::<usize>("max-insights").expect("has default");
            let json = args.get_flag("json");

            let run = RunConfig::new()
                .with_threshold(threshold)
                .with_max_insights(max_insights);
            let engine = InsightEngine::new(
                AgentRegistry::with_defaults(),
                EngineConfig::new().with_run(run),
            );

            let report = engine.run_all(&demo_snapshots()).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        _ => unreachable!("subcommand required"),
    }
}

/// A turbulent demo workspace: scattered focus, an open alert, one falling
/// dimension, one stale node. Enough to trigger a recommended plan.
fn demo_snapshots() -> SnapshotSet {
    let stale_at = chrono::Utc::now() - chrono::Duration::hours(4);

    let context = ContextSnapshot::now()
        .with_focus(FocusState {
            focused_node: None,
            mode: FocusMode::Scattered,
            streak_secs: 0,
        })
        .with_health(HealthCounters {
            open_alerts: 1,
            overdue_items: 2,
            stale_nodes: 1,
        });

    let mut set = SnapshotSet::new()
        .with_context(context)
        .with_dimensions(
            DimensionSnapshot::new("projects.bureau")
                .with_value("momentum", 0.2)
                .with_value("clarity", 0.6)
                .with_trend(Trend::Falling),
        )
        .with_dimensions(DimensionSnapshot::new("inbox").with_value("load", 0.8))
        .with_node(TopologyNode::new("projects.bureau", "Bureau", "work").with_links(6))
        .with_node(TopologyNode::new("inbox", "Inbox", "work").with_links(3))
        .with_node(TopologyNode::new("archive", "Archive", "work").updated(stale_at));

    for _ in 0..4 {
        set = set.with_event(TimelineEvent::new(TimelineEventKind::FocusShift));
    }
    set.with_event(TimelineEvent::new(TimelineEventKind::Alert).on_node("projects.bureau"))
}

fn print_report(report: &ExecutionReport) {
    println!("plan: {} ({})", report.label, report.plan);
    println!(
        "agents executed: {}, insights: {}, errors: {}, took {}ms",
        report.metrics.agents_executed,
        report.metrics.insights_produced,
        report.metrics.errors,
        report.metrics.duration_ms
    );
    println!();

    for insight in &report.insights {
        let kind = match &insight.kind {
            InsightKind::Signal(s) => format!("signal/{:?}", s.signal),
            InsightKind::Recommendation(r) => format!("recommend: {}", r.action),
            InsightKind::Proposal(p) => format!("proposal/{:?}", p.proposal),
            InsightKind::Enrichment(e) => format!("enrich: {}", e.attribute),
        };
        println!(
            "  [{:.2}] {:<18} {} - {}",
            insight.confidence, insight.agent, kind, insight.rationale
        );
    }

    for error in &report.errors {
        println!(
            "  error in stage {}: {} ({})",
            error.stage,
            error.message,
            error.agent.as_deref().unwrap_or("stage")
        );
    }
}
