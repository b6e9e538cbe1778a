use anyhow::{Context, Result};
use urichain_core::{DirectBuffer, RawUriResource};
use urichain_services::SyncContext;

use crate::*;

#[test]
fn async_failed_delivery_reaches_callback_once() -> Result<()> {
    let h = harness(Some(underlying_loader()));
    h.boundary.notify_native_delegate_registered(SESSION);

    let (log, cb) = recorder();
    h.session.request_async("a.js", cb);
    assert!(log.lock().unwrap().is_empty(), "must not answer before the host does");

    let (uri, id) = h.host.async_calls.lock().unwrap()[0].clone();
    assert_eq!(uri, "a.js");

    h.boundary.deliver_async_result(
        SESSION,
        Some(RawUriResource::without_content(RetCode::Failed)),
        id,
    );
    h.boundary.deliver_async_result(SESSION, None, id);

    let received = log.lock().unwrap().clone();
    assert_eq!(received, vec![(RetCode::Failed, Bytes::new())]);
    assert!(h.session.requests().is_empty());
    Ok(())
}

#[test]
fn sync_without_delegate_matches_underlying_loader() {
    let h = harness(Some(underlying_loader()));

    for uri in ["a.js", "b.js", "missing.js"] {
        let mut via_delegate = SyncContext::new(uri);
        h.session
            .delegate()
            .resolve_sync(&mut via_delegate, h.session.loader());

        let mut direct = SyncContext::new(uri);
        underlying_loader().resolve_sync(&mut direct);

        assert_eq!(via_delegate, direct, "{uri}");
    }
    assert!(h.host.sync_calls.lock().unwrap().is_empty());
}

#[test]
fn sync_with_delegate_never_reaches_loader() {
    let h = harness(Some(underlying_loader()));
    h.boundary.notify_native_delegate_registered(SESSION);

    // host produces nothing: the loader still must not be consulted
    assert_eq!(h.session.request_sync("a.js"), UriResource::empty(RetCode::Failed));

    *h.host.sync_answer.lock().unwrap() = Some(UriResource::new(RetCode::Success, "host:a"));
    assert_eq!(
        h.session.request_sync("a.js"),
        UriResource::new(RetCode::Success, "host:a")
    );
    assert_eq!(h.host.sync_calls.lock().unwrap().len(), 2);
}

#[test]
fn no_delegate_no_loader_is_scheme_not_register() {
    let h = harness(None);

    assert_eq!(
        h.session.request_sync("a.js"),
        UriResource::empty(RetCode::SchemeNotRegister)
    );

    let (log, cb) = recorder();
    h.session.request_async("a.js", cb);
    assert_eq!(
        log.lock().unwrap().clone(),
        vec![(RetCode::SchemeNotRegister, Bytes::new())]
    );
    assert!(h.host.async_calls.lock().unwrap().is_empty());
}

#[test]
fn unknown_request_id_does_not_touch_table() {
    let h = harness(None);
    h.boundary.notify_native_delegate_registered(SESSION);
    let (log, cb) = recorder();
    h.session.request_async("a.js", cb);
    let id = h.host.pending_ids()[0];

    h.boundary
        .deliver_async_result(SESSION, None, RequestId(id.0 + 1000));
    assert_eq!(h.session.requests().len(), 1);
    assert!(h.session.requests().contains(id));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn malformed_results_degrade_to_empty_content() {
    let h = harness(None);
    h.boundary.notify_native_delegate_registered(SESSION);

    let mut logs = Vec::new();
    for _ in 0..3 {
        let (log, cb) = recorder();
        h.session.request_async("a.js", cb);
        logs.push(log);
    }
    let ids = h.host.pending_ids();
    let data = b"payload";

    let negative = unsafe { DirectBuffer::from_raw(data.as_ptr(), -1) };
    let null = unsafe { DirectBuffer::from_raw(std::ptr::null(), 7) };
    let results = [
        RawUriResource { ret_code: RetCode::Success, content: Some(negative) },
        RawUriResource { ret_code: RetCode::PathError, content: Some(null) },
        RawUriResource::new(RetCode::Success, b""),
    ];
    for (raw, id) in results.into_iter().zip(&ids) {
        h.boundary.deliver_async_result(SESSION, Some(raw), *id);
    }

    let got: Vec<_> = logs.iter().map(|l| l.lock().unwrap().clone()).collect();
    assert_eq!(got[0], vec![(RetCode::Success, Bytes::new())]);
    assert_eq!(got[1], vec![(RetCode::PathError, Bytes::new())]);
    assert_eq!(got[2], vec![(RetCode::Success, Bytes::new())]);
    assert!(h.session.requests().is_empty());
}

#[test]
fn completions_may_arrive_out_of_order() -> Result<()> {
    let h = harness(None);
    h.boundary.notify_native_delegate_registered(SESSION);

    let (first, cb1) = recorder();
    let (second, cb2) = recorder();
    h.session.request_async("first.js", cb1);
    h.session.request_async("second.js", cb2);
    let ids = h.host.pending_ids();
    assert!(ids[0] < ids[1]);

    let body2 = b"two".to_vec();
    let body1 = b"one".to_vec();
    h.boundary
        .deliver_async_result(SESSION, Some(RawUriResource::new(RetCode::Success, &body2)), ids[1]);
    assert!(first.lock().unwrap().is_empty());
    h.boundary
        .deliver_async_result(SESSION, Some(RawUriResource::new(RetCode::Success, &body1)), ids[0]);

    let one = first.lock().unwrap().first().cloned().context("first not delivered")?;
    let two = second.lock().unwrap().first().cloned().context("second not delivered")?;
    assert_eq!(one, (RetCode::Success, Bytes::from_static(b"one")));
    assert_eq!(two, (RetCode::Success, Bytes::from_static(b"two")));
    Ok(())
}

#[test]
fn host_can_pull_from_loader_while_intercepting() {
    let h = harness(Some(underlying_loader()));
    h.boundary.notify_native_delegate_registered(SESSION);

    assert_eq!(
        h.boundary.fetch_next_sync(SESSION, "b.js"),
        Some(UriResource::new(RetCode::Success, "loader:b"))
    );
    assert!(h.host.sync_calls.lock().unwrap().is_empty());
    assert_eq!(h.boundary.fetch_next_sync(SessionId(404), "b.js"), None);
}

#[test]
fn native_announces_delegate_to_host() {
    let h = harness(None);
    assert!(h.session.delegate().notify_host_delegate_registered());
    assert_eq!(h.host.registrations.lock().unwrap().clone(), vec![SESSION]);
}

#[test]
fn closing_session_fails_outstanding_requests() {
    let h = harness(None);
    h.boundary.notify_native_delegate_registered(SESSION);
    let (log, cb) = recorder();
    h.session.request_async("a.js", cb);
    let id = h.host.pending_ids()[0];

    assert!(h.boundary.sessions().remove(SESSION).is_some());
    assert_eq!(log.lock().unwrap().clone(), vec![(RetCode::Failed, Bytes::new())]);

    // late answer after close is dropped
    h.boundary.deliver_async_result(SESSION, None, id);
    assert_eq!(log.lock().unwrap().len(), 1);
}
