//! Workflow Execution Benchmarks
//!
//! Measures coordinator overhead for scripted pipelines and the full
//! in-memory content pipeline.

use conductor::{Logger, Metadata, NoopRouter, StateMap, WorkflowCoordinator, WorkflowStep};
use conductor_agents::{ContentServices, ContentState, SearchHit, content_pipeline};
use conductor_testing::{RecordingRouter, ScriptedAgent, ToolEmittingAgent};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

fn scripted_coordinator(steps: usize) -> WorkflowCoordinator<StateMap> {
    let mut coordinator = WorkflowCoordinator::new(Logger::null(), Arc::new(NoopRouter));
    coordinator
        .register_workflow((0..steps).map(|i| {
            WorkflowStep::<StateMap>::new(
                format!("step-{i}"),
                Arc::new(ScriptedAgent::<StateMap>::new(format!("agent-{i}")).always(
                    conductor::AgentResult::success(StateMap::new().with(format!("key-{i}"), i)),
                )),
            )
        }))
        .unwrap();
    coordinator
}

/// Benchmark runs of scripted pipelines of increasing length
fn bench_scripted_pipelines(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("scripted_pipeline");
    group.measurement_time(Duration::from_secs(5));

    for steps in [1usize, 5, 20] {
        let coordinator = scripted_coordinator(steps);
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_with_input(BenchmarkId::new("execute", steps), &steps, |b, _| {
            b.to_async(&runtime).iter(|| async {
                let run = coordinator
                    .execute_workflow("bench", StateMap::new().with("topic", "bench"), Metadata::new())
                    .await
                    .unwrap();
                black_box(run)
            })
        });
    }

    group.finish();
}

/// Benchmark tool fan-out for one step
fn bench_tool_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("tool_dispatch");

    for tools in [1usize, 8, 32] {
        let agent = (0..tools).fold(ToolEmittingAgent::new("emitter"), |agent, i| {
            agent.with_tool(format!("tool-{i}"), serde_json::json!({ "i": i }))
        });
        let mut coordinator =
            WorkflowCoordinator::new(Logger::null(), Arc::new(RecordingRouter::new()));
        coordinator
            .register_workflow(vec![WorkflowStep::<StateMap>::new("emit", Arc::new(agent))])
            .unwrap();

        group.bench_with_input(BenchmarkId::new("fan_out", tools), &tools, |b, _| {
            b.to_async(&runtime).iter(|| async {
                black_box(
                    coordinator
                        .execute_workflow("bench", StateMap::new(), Metadata::new())
                        .await
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark the four-agent content pipeline with in-memory services
fn bench_content_pipeline(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let corpus = vec![SearchHit::new(
        "Ownership in Rust",
        "https://example.com/ownership",
        "Rust tracks ownership at compile time. Each value has exactly one owner.",
    )];
    let mut coordinator = WorkflowCoordinator::new(Logger::null(), Arc::new(NoopRouter));
    coordinator
        .register_workflow(content_pipeline(ContentServices::in_memory(corpus)))
        .unwrap();

    c.bench_function("content_pipeline", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(
                coordinator
                    .execute_workflow("bench", ContentState::new("rust ownership"), Metadata::new())
                    .await
                    .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_scripted_pipelines,
    bench_tool_dispatch,
    bench_content_pipeline
);
criterion_main!(benches);
