use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

#[path = "../support/mod.rs"]
mod support;

use valuemaster_core::{
    AcquirerSet, AcquisitionMode, BetaRequest, CountryBatchRequest, CountryRequest,
    SourceErrorKind, SourceId,
};

struct AcquirerCase {
    name: &'static str,
    acquirers: AcquirerSet,
}

fn acquirer_cases() -> Vec<AcquirerCase> {
    vec![
        AcquirerCase {
            name: "live",
            acquirers: support::live_acquirers(Arc::new(support::fixture_client())),
        },
        AcquirerCase {
            name: "offline",
            acquirers: support::offline_acquirers(),
        },
    ]
}

#[test]
fn rates_are_finite_decimal_fractions_for_all_modes() {
    for case in acquirer_cases() {
        let rf = block_on(case.acquirers.risk_free_rate().risk_free_rate())
            .unwrap_or_else(|error| panic!("{}: risk-free rate failed: {error}", case.name));
        let market = block_on(case.acquirers.market_return().market_return())
            .unwrap_or_else(|error| panic!("{}: market return failed: {error}", case.name));

        assert!(rf.rate.is_finite() && rf.rate.abs() < 1.0, "{}: rf {}", case.name, rf.rate);
        assert!(
            market.rate.is_finite() && market.rate.abs() < 1.0,
            "{}: market {}",
            case.name,
            market.rate
        );
    }
}

#[test]
fn listed_sector_resolves_identically_in_all_modes() {
    for case in acquirer_cases() {
        let beta = block_on(
            case.acquirers
                .unlevered_beta()
                .unlevered_beta(BetaRequest::new("Advertising").expect("valid sector")),
        )
        .unwrap_or_else(|error| panic!("{}: beta failed: {error}", case.name));

        assert_eq!(beta.beta, 0.92, "{}", case.name);
    }
}

#[test]
fn unknown_sector_is_not_found_in_all_modes() {
    for case in acquirer_cases() {
        let error = block_on(
            case.acquirers
                .unlevered_beta()
                .unlevered_beta(BetaRequest::new("Time Travel").expect("valid sector")),
        )
        .expect_err("sector is not listed");

        assert_eq!(error.kind(), SourceErrorKind::NotFound, "{}", case.name);
        assert_eq!(error.missing(), ["Time Travel"], "{}", case.name);
    }
}

#[test]
fn country_premium_is_decimal_in_all_modes() {
    for case in acquirer_cases() {
        let premium = block_on(
            case.acquirers
                .country_risk_premium()
                .country_risk_premium(CountryRequest::new("Brazil").expect("valid country")),
        )
        .unwrap_or_else(|error| panic!("{}: premium failed: {error}", case.name));

        assert!((premium.risk - 0.0357).abs() < 1e-12, "{}", case.name);
    }
}

#[test]
fn batch_failure_lists_only_unknown_names_in_all_modes() {
    let request = CountryBatchRequest::new(vec![
        String::from("Germany"),
        String::from("Atlantis"),
        String::from("Brazil"),
    ])
    .expect("valid batch");

    for case in acquirer_cases() {
        let error = block_on(
            case.acquirers
                .country_risk_premium()
                .country_risk_premiums(request.clone()),
        )
        .expect_err("one unknown name");

        assert_eq!(error.kind(), SourceErrorKind::NotFound, "{}", case.name);
        assert_eq!(error.missing(), ["Atlantis"], "{}", case.name);
    }
}

#[test]
fn source_ids_match_the_mode() {
    for case in acquirer_cases() {
        let acquirers = &case.acquirers;
        let expected = match acquirers.mode() {
            AcquisitionMode::Live => [
                SourceId::Fred,
                SourceId::Fred,
                SourceId::Damodaran,
                SourceId::Damodaran,
            ],
            AcquisitionMode::Offline => [SourceId::Offline; 4],
        };

        assert_eq!(
            [
                acquirers.risk_free_rate().id(),
                acquirers.market_return().id(),
                acquirers.unlevered_beta().id(),
                acquirers.country_risk_premium().id(),
            ],
            expected,
            "{}",
            case.name
        );
    }
}

fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
