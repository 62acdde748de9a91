//! Mutation controller lifecycle, sync orchestration, and document posting.

mod common;

use common::{ScriptedBackend, DEMO_PUB, DEMO_WORKSPACE};
use driftwood_client::backend::workspace_fetcher;
use driftwood_client::cache::{FreshnessPolicy, QueryStatus, WORKSPACES_QUERY};
use driftwood_client::mutation::{mutation_op, MutationController, MutationStatus};
use driftwood_client::{DocumentPoster, MutationError, SyncOrchestrator, SyncRequest, WorkspaceCache};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

async fn wait_until(description: &str, f: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !f() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting until {description}"));
}

fn poster_for(backend: Arc<ScriptedBackend>, cache: &WorkspaceCache) -> DocumentPoster {
    DocumentPoster::new(
        backend,
        cache.clone(),
        common::address(DEMO_WORKSPACE),
        "test",
    )
    .expect("valid seed label")
}

#[tokio::test]
async fn controller_transitions_idle_pending_success() {
    let controller: MutationController<u32, u32> =
        MutationController::new(mutation_op(|input: u32| async move { Ok(input * 2) }));
    assert_eq!(controller.status(), MutationStatus::Idle);

    let out = controller.run(21).await.expect("mutation succeeds");
    assert_eq!(out, 42);
    assert_eq!(controller.status(), MutationStatus::Success);
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn controller_failure_is_stored_and_propagated() {
    let controller: MutationController<(), ()> =
        MutationController::new(mutation_op(|_| async move {
            Err(MutationError::Other("boom".into()))
        }));

    let err = controller.run(()).await.expect_err("mutation fails");
    assert_eq!(err, MutationError::Other("boom".into()));
    assert_eq!(controller.status(), MutationStatus::Error);
    assert_eq!(controller.last_error(), Some(err));
}

#[tokio::test]
async fn controller_recovers_after_error() {
    let controller: MutationController<bool, &'static str> =
        MutationController::new(mutation_op(|fail: bool| async move {
            if fail {
                Err(MutationError::Other("boom".into()))
            } else {
                Ok("ok")
            }
        }));

    controller.run(true).await.expect_err("first run fails");
    assert_eq!(controller.status(), MutationStatus::Error);

    let out = controller.run(false).await.expect("second run succeeds");
    assert_eq!(out, "ok");
    assert_eq!(controller.status(), MutationStatus::Success);
    assert!(controller.last_error().is_none(), "error cleared on re-run");
}

#[tokio::test]
async fn reentrant_post_is_rejected_and_hits_backend_once() {
    let backend = ScriptedBackend::holding_writes();
    let cache = WorkspaceCache::new();
    let poster = poster_for(backend.clone(), &cache);
    poster.set_path("/a");
    poster.set_value("hi");

    let first = poster.clone();
    let handle = tokio::spawn(async move { first.run().await });
    wait_until("first post is pending", || poster.is_pending()).await;

    let err = poster.run().await.expect_err("second post must be rejected");
    assert_eq!(err, MutationError::Concurrent);

    backend.release_write();
    handle
        .await
        .expect("task join")
        .expect("first post succeeds");
    assert_eq!(backend.write_count(), 1, "backend saw exactly one write");
}

#[tokio::test]
async fn failed_post_preserves_draft_for_retry() {
    let backend = ScriptedBackend::open();
    backend.fail_writes.store(true, Ordering::SeqCst);
    let cache = WorkspaceCache::new();
    let poster = poster_for(backend.clone(), &cache);
    poster.set_path("/a");
    poster.set_value("hi");

    let err = poster.run().await.expect_err("write fails");
    assert!(matches!(err, MutationError::Backend(_)));
    assert_eq!(poster.status(), MutationStatus::Error);
    assert_eq!(poster.last_error(), Some(err));

    let draft = poster.draft();
    assert_eq!(draft.path, "/a");
    assert_eq!(draft.value, "hi");
}

#[tokio::test]
async fn successful_post_invalidates_then_clears_draft_before_resolving() {
    let backend = ScriptedBackend::open();
    let cache = WorkspaceCache::new();
    let mut sub = cache.subscribe(
        WORKSPACES_QUERY,
        workspace_fetcher(backend.clone()),
        FreshnessPolicy::AlwaysRefetch,
    );
    wait_until("initial fetch completes", || {
        sub.snapshot().status == QueryStatus::Success
    })
    .await;
    assert_eq!(backend.fetch_count(), 1);

    let poster = poster_for(backend.clone(), &cache);
    poster.set_path("/a");
    poster.set_value("hi");

    poster.run().await.expect("post succeeds");

    // Both side effects landed before run resolved: the entry is already
    // re-fetching and the draft is empty.
    assert_eq!(sub.snapshot().status, QueryStatus::Loading);
    assert!(poster.draft().is_empty());

    wait_until("refetch completes", || {
        sub.snapshot().status == QueryStatus::Success
    })
    .await;
    assert_eq!(backend.fetch_count(), 2);
    let data = sub.snapshot().data.expect("refreshed data");
    assert!(
        data[0].documents.iter().any(|doc| doc.value == "hi"),
        "posted document visible after refetch"
    );
}

#[tokio::test]
async fn post_status_persists_until_next_run() {
    let backend = ScriptedBackend::open();
    let cache = WorkspaceCache::new();
    let poster = poster_for(backend.clone(), &cache);
    poster.set_path("/a");
    poster.set_value("hi");

    poster.run().await.expect("post succeeds");
    assert_eq!(poster.status(), MutationStatus::Success);
    // No automatic reset to idle.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(poster.status(), MutationStatus::Success);
}

#[tokio::test]
async fn posters_hold_one_identity_per_instance() {
    let backend = ScriptedBackend::open();
    let cache = WorkspaceCache::new();
    let first = poster_for(backend.clone(), &cache);
    let second = poster_for(backend.clone(), &cache);

    assert_eq!(first.identity().short_name, "test");
    assert_ne!(
        first.identity().address,
        second.identity().address,
        "each poster generates its own ephemeral identity"
    );

    first.set_path("/one");
    first.set_value("a");
    let receipt_a = first.run().await.expect("first post");
    first.set_path("/two");
    first.set_value("b");
    let receipt_b = first.run().await.expect("second post");
    assert_eq!(
        receipt_a.document.author.short_name,
        receipt_b.document.author.short_name,
        "identity is stable across posts from one instance"
    );
}

#[tokio::test]
async fn successful_sync_invalidates_workspace_query() {
    let backend = ScriptedBackend::open();
    let cache = WorkspaceCache::new();
    let mut sub = cache.subscribe(
        WORKSPACES_QUERY,
        workspace_fetcher(backend.clone()),
        FreshnessPolicy::AlwaysRefetch,
    );
    wait_until("initial fetch completes", || {
        sub.snapshot().status == QueryStatus::Success
    })
    .await;

    let orchestrator = SyncOrchestrator::new(backend.clone(), cache.clone());
    let report = orchestrator
        .run(SyncRequest {
            workspace: common::address(DEMO_WORKSPACE),
            pub_url: DEMO_PUB.to_string(),
        })
        .await
        .expect("sync succeeds");
    assert_eq!(report.documents_ingested, 1);
    assert_eq!(orchestrator.status(), MutationStatus::Success);

    // Success -> Loading -> Success with a fresh array.
    assert_eq!(sub.snapshot().status, QueryStatus::Loading);
    wait_until("refetch completes", || {
        sub.snapshot().status == QueryStatus::Success
    })
    .await;
    assert_eq!(backend.fetch_count(), 2);
    let data = sub.snapshot().data.expect("refreshed data");
    assert!(data[0].documents.iter().any(|doc| doc.value == "from the pub"));
}

#[tokio::test]
async fn failed_sync_leaves_cache_untouched() {
    let backend = ScriptedBackend::open();
    backend.fail_syncs.store(true, Ordering::SeqCst);
    let cache = WorkspaceCache::new();
    let mut sub = cache.subscribe(
        WORKSPACES_QUERY,
        workspace_fetcher(backend.clone()),
        FreshnessPolicy::AlwaysRefetch,
    );
    wait_until("initial fetch completes", || {
        sub.snapshot().status == QueryStatus::Success
    })
    .await;

    let orchestrator = SyncOrchestrator::new(backend.clone(), cache.clone());
    let err = orchestrator
        .run(SyncRequest {
            workspace: common::address(DEMO_WORKSPACE),
            pub_url: DEMO_PUB.to_string(),
        })
        .await
        .expect_err("sync fails");
    assert!(matches!(err, MutationError::Backend(_)));
    assert_eq!(orchestrator.status(), MutationStatus::Error);

    assert_eq!(sub.snapshot().status, QueryStatus::Success, "no invalidation on failure");
    assert_eq!(backend.fetch_count(), 1);
}

#[tokio::test]
async fn two_rows_can_sync_concurrently() {
    let backend = ScriptedBackend::open();
    {
        let mut workspaces = backend.workspaces.lock().unwrap();
        workspaces.push(common::empty_workspace("+other.456"));
    }
    let cache = WorkspaceCache::new();

    // Exclusivity is per controller instance, not across instances.
    let first = SyncOrchestrator::new(backend.clone(), cache.clone());
    let second = SyncOrchestrator::new(backend.clone(), cache.clone());

    let (a, b) = tokio::join!(
        first.run(SyncRequest {
            workspace: common::address(DEMO_WORKSPACE),
            pub_url: DEMO_PUB.to_string(),
        }),
        second.run(SyncRequest {
            workspace: common::address("+other.456"),
            pub_url: DEMO_PUB.to_string(),
        }),
    );
    a.expect("first sync succeeds");
    b.expect("second sync succeeds");
    assert_eq!(backend.sync_count(), 2);
}
