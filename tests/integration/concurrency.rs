use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use urichain_core::RawUriResource;

use crate::*;

const ISSUERS: usize = 16;
const PER_ISSUER: usize = 50;
const DELIVERERS: usize = 4;

#[test]
fn concurrent_issue_and_delivery_fires_each_callback_once() {
    let h = harness(Some(underlying_loader()));
    h.boundary.notify_native_delegate_registered(SESSION);

    let fired: Arc<Vec<AtomicUsize>> =
        Arc::new((0..ISSUERS * PER_ISSUER).map(|_| AtomicUsize::new(0)).collect());

    let issuers: Vec<_> = (0..ISSUERS)
        .map(|t| {
            let session = h.session.clone();
            let fired = fired.clone();
            thread::spawn(move || {
                for i in 0..PER_ISSUER {
                    let slot = t * PER_ISSUER + i;
                    let fired = fired.clone();
                    session.request_async(&format!("{slot}.js"), move |code, body| {
                        assert_eq!(code, RetCode::Success);
                        assert_eq!(body, Bytes::from(format!("{slot}.js")));
                        fired[slot].fetch_add(1, Ordering::SeqCst);
                    });
                }
            })
        })
        .collect();
    for t in issuers {
        t.join().unwrap();
    }

    let calls = h.host.async_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), ISSUERS * PER_ISSUER);
    let unique: HashSet<RequestId> = calls.iter().map(|(_, id)| *id).collect();
    assert_eq!(unique.len(), calls.len(), "request ids collided");
    assert_eq!(h.session.requests().len(), calls.len());

    // Every deliverer walks the whole list; only the first to take an id
    // may fire it.
    let deliverers: Vec<_> = (0..DELIVERERS)
        .map(|d| {
            let boundary = h.boundary.clone();
            let mut calls = calls.clone();
            if d % 2 == 1 {
                calls.reverse();
            }
            thread::spawn(move || {
                for (uri, id) in calls {
                    boundary.deliver_async_result(
                        SESSION,
                        Some(RawUriResource::new(RetCode::Success, uri.as_bytes())),
                        id,
                    );
                }
            })
        })
        .collect();
    for t in deliverers {
        t.join().unwrap();
    }

    for (slot, count) in fired.iter().enumerate() {
        assert_eq!(count.load(Ordering::SeqCst), 1, "slot {slot}");
    }
    assert!(h.session.requests().is_empty());
}

#[test]
fn concurrent_sync_requests_see_consistent_answers() {
    let h = harness(Some(underlying_loader()));

    let workers: Vec<_> = (0..8)
        .map(|t| {
            let session = h.session.clone();
            let boundary = h.boundary.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    if t == 0 && i == 50 {
                        boundary.notify_native_delegate_registered(SESSION);
                    }
                    let res = session.request_sync("a.js");
                    // before registration the loader answers, after it the
                    // host (which has no answer scripted) does
                    assert!(
                        res == UriResource::new(RetCode::Success, "loader:a")
                            || res == UriResource::empty(RetCode::Failed),
                        "unexpected {res:?}"
                    );
                }
            })
        })
        .collect();
    for t in workers {
        t.join().unwrap();
    }
    assert!(h.session.delegate().has_external_delegate());
    assert_eq!(
        h.session.request_sync("a.js"),
        UriResource::empty(RetCode::Failed)
    );
}
