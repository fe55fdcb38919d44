//! End-to-end behavior of a build run against the recording bundler.
//!
//! These tests verify that:
//! 1. Each valid entry produces exactly one build call with the resolved options
//! 2. Completion is reported once, after every build resolved
//! 3. The first failure wins, regardless of later successes
//! 4. `sfx` and `configFile`/`baseURL` select the right bundler calls

use std::path::PathBuf;
use std::time::Duration;

use bundle_task::test_utils::{
    Call, Outcome, RecordingBundler, RecordingContext, Signal,
};
use bundle_task::{
    BuildMethod, BuildOptions, BuildRun, Error, FileMapping, RunState, TaskOptions, run_task,
};
use serde_json::{Value, json};

fn options(value: Value) -> TaskOptions {
    TaskOptions::from_value(value).expect("valid options")
}

fn entries(n: usize) -> Vec<FileMapping> {
    (1..=n)
        .map(|i| FileMapping::new(format!("app/entry{i}.js"), format!("dist/entry{i}.js")))
        .collect()
}

#[tokio::test]
async fn documented_example_loads_config_then_bundles() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();
    let mut ctx = RecordingContext::default();

    let state = run_task(
        &mut ctx,
        options(json!({ "sfx": false, "minify": false, "configFile": "config.js" })),
        &[FileMapping::new("app/init.js", "dist/demo.js")],
        move |_| Ok(bundler),
    )
    .await;

    assert_eq!(state, RunState::Completed);
    assert_eq!(ctx.signals, vec![Signal::Done]);
    assert_eq!(
        log.calls(),
        vec![
            Call::LoadConfig {
                path: PathBuf::from("config.js"),
                merge: false,
                ignore_base_url: false,
            },
            Call::Build {
                method: BuildMethod::Bundle,
                source: "app/init.js".to_string(),
                dest: PathBuf::from("dist/demo.js"),
                options: BuildOptions {
                    minify: Some(false),
                    ..Default::default()
                },
            },
        ]
    );
}

#[tokio::test]
async fn each_entry_gets_one_build_call() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();

    let summary = BuildRun::new(
        options(json!({ "sourceMaps": true, "build": { "minify": true } })),
        bundler,
    )
    .run(&entries(4))
    .await
    .expect("run succeeds");

    assert_eq!(summary.built, 4);
    let builds = log.builds();
    assert_eq!(builds.len(), 4);
    for (i, call) in builds.iter().enumerate() {
        let Call::Build {
            source,
            dest,
            options,
            ..
        } = call
        else {
            panic!("expected a build call, got {call:?}");
        };
        assert_eq!(source, &format!("app/entry{}.js", i + 1));
        assert_eq!(dest, &PathBuf::from(format!("dist/entry{}.js", i + 1)));
        assert_eq!(options.minify, Some(true));
        assert_eq!(options.source_maps, Some(true));
    }
}

#[tokio::test]
async fn completion_waits_for_every_build() {
    let bundler = RecordingBundler::new()
        .outcome("dist/entry1.js", Outcome::SucceedAfter(Duration::from_millis(80)))
        .outcome("dist/entry2.js", Outcome::SucceedAfter(Duration::from_millis(20)))
        .outcome("dist/entry3.js", Outcome::SucceedAfter(Duration::from_millis(50)));
    let log = bundler.log();
    let mut ctx = RecordingContext::default();

    let state = run_task(&mut ctx, TaskOptions::default(), &entries(3), move |_| {
        Ok(bundler)
    })
    .await;

    assert_eq!(state, RunState::Completed);
    assert_eq!(ctx.signals, vec![Signal::Done]);
    assert_eq!(log.finished().len(), 3);
}

#[tokio::test]
async fn first_failure_wins() {
    let bundler = RecordingBundler::new()
        .outcome(
            "dist/entry2.js",
            Outcome::FailAfter(Duration::from_millis(10), "Error loading app/entry2.js".into()),
        )
        .outcome("dist/entry1.js", Outcome::SucceedAfter(Duration::from_millis(60)))
        .outcome("dist/entry3.js", Outcome::SucceedAfter(Duration::from_millis(60)));
    let mut ctx = RecordingContext::default();

    let state = run_task(&mut ctx, TaskOptions::default(), &entries(3), move |_| {
        Ok(bundler)
    })
    .await;

    assert_eq!(state, RunState::Aborted);
    assert_eq!(
        ctx.signals,
        vec![Signal::Fatal("Error loading app/entry2.js".to_string())]
    );
}

#[tokio::test]
async fn in_flight_builds_keep_running_after_abort() {
    let bundler = RecordingBundler::new()
        .outcome("dist/entry1.js", Outcome::Fail("broken".into()))
        .outcome("dist/entry2.js", Outcome::SucceedAfter(Duration::from_millis(30)));
    let log = bundler.log();

    let err = BuildRun::new(TaskOptions::default(), bundler)
        .run(&entries(2))
        .await
        .expect_err("run aborts");
    assert!(matches!(err, Error::Build { .. }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(log.finished(), vec![PathBuf::from("dist/entry2.js")]);
}

#[tokio::test]
async fn sfx_uses_static_builds_for_every_entry() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();

    BuildRun::new(options(json!({ "sfx": true })), bundler)
        .run(&entries(3))
        .await
        .expect("run succeeds");

    let methods: Vec<_> = log
        .builds()
        .into_iter()
        .map(|call| match call {
            Call::Build { method, .. } => method,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(methods, vec![BuildMethod::Static; 3]);
}

#[tokio::test]
async fn explicit_base_url_suppresses_config_base_url() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();

    BuildRun::new(
        options(json!({ "configFile": "config.js", "baseURL": "/assets" })),
        bundler,
    )
    .run(&entries(1))
    .await
    .expect("run succeeds");

    let calls = log.calls();
    assert_eq!(calls[0], Call::Configure(json!({ "baseURL": "/assets" })));
    assert_eq!(
        calls[1],
        Call::LoadConfig {
            path: PathBuf::from("config.js"),
            merge: false,
            ignore_base_url: true,
        }
    );
}

#[tokio::test]
async fn multi_source_entry_fails_without_build_calls() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();
    let mut ctx = RecordingContext::default();

    let mut all = entries(2);
    all.push(FileMapping {
        src: vec!["app/a.js".into(), "app/b.js".into()],
        orig_src: Some("app/a.js".into()),
        dest: PathBuf::from("dist/ab.js"),
    });

    let state = run_task(&mut ctx, TaskOptions::default(), &all, move |_| Ok(bundler)).await;

    assert_eq!(state, RunState::Aborted);
    assert_eq!(ctx.signals.len(), 1);
    assert!(log.builds().is_empty());
}

#[tokio::test]
async fn original_source_string_is_passed_through() {
    let bundler = RecordingBundler::new();
    let log = bundler.log();

    BuildRun::new(TaskOptions::default(), bundler)
        .run(&[FileMapping::unresolved("app/main - app/vendor", "dist/main.js")])
        .await
        .expect("run succeeds");

    assert!(matches!(
        &log.builds()[0],
        Call::Build { source, .. } if source == "app/main - app/vendor"
    ));
}
