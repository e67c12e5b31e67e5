#![allow(non_snake_case)]

use super::*;
use crate::{
    config::Network,
    test_support::{FakeGateway, FakeReader},
};

fn coordinator(
    gateway: Arc<FakeGateway>,
    reader: Arc<FakeReader>,
) -> DrawCoordinator<FakeGateway, FakeReader> {
    DrawCoordinator::new(gateway, reader, ProtocolCalls::new(Network::Testnet))
}

fn stats(can_draw: bool, is_draw_pending: bool) -> PoolStats {
    PoolStats {
        can_draw,
        is_draw_pending,
        ..PoolStats::default()
    }
}

#[tokio::test]
async fn start_draw__not_yet_due__rejected_without_submitting() {
    // given a pool that cannot draw yet
    let gateway = Arc::new(FakeGateway::default());
    let mut draw = coordinator(gateway.clone(), Arc::new(FakeReader::default()));

    // when
    let outcome = draw.start_draw(&stats(false, false), &mut |_| {}).await;

    // then no contract call was submitted and the phase did not move
    assert!(outcome.is_err());
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(draw.phase(), DrawPhase::Idle);
}

#[tokio::test]
async fn start_draw__due__submits_and_advances() {
    let gateway = Arc::new(FakeGateway::default());
    let mut draw = coordinator(gateway.clone(), Arc::new(FakeReader::default()));

    let mut progress = Vec::new();
    draw.start_draw(&stats(true, false), &mut |step| progress.push(step.to_string()))
        .await
        .unwrap();

    let recorded = gateway.recorded_calls();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].function, "startDraw");
    assert_eq!(draw.phase(), DrawPhase::AwaitingRandomness);
    assert_eq!(progress, vec!["Starting draw..."]);
}

#[tokio::test]
async fn start_draw__already_pending__rejected() {
    // a pending draw means someone already started it; the fresh read wins
    let gateway = Arc::new(FakeGateway::default());
    let mut draw = coordinator(gateway.clone(), Arc::new(FakeReader::default()));

    let outcome = draw.start_draw(&stats(true, true), &mut |_| {}).await;

    assert!(outcome.is_err());
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(draw.phase(), DrawPhase::AwaitingRandomness);
}

#[tokio::test]
async fn complete_randomness__wrong_phase__rejected_without_submitting() {
    let gateway = Arc::new(FakeGateway::default());
    let mut draw = coordinator(gateway.clone(), Arc::new(FakeReader::default()));

    let outcome = draw.complete_randomness(&mut |_| {}).await;

    assert!(outcome.is_err());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn complete_randomness__pending_request__fulfills_it() {
    // given a started draw and a pending oracle request
    let gateway = Arc::new(FakeGateway::default());
    let reader = Arc::new(FakeReader::default());
    reader.set_last_request(U256::from(7u64));
    let mut draw = coordinator(gateway.clone(), reader);
    draw.start_draw(&stats(true, false), &mut |_| {}).await.unwrap();

    // when
    draw.complete_randomness(&mut |_| {}).await.unwrap();

    // then the fulfillment call targets the pending request id
    let recorded = gateway.recorded_calls();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[1].function, "completeRequest");
    assert_eq!(recorded[1].args.len(), 2);
    assert_eq!(recorded[1].args[0], "7");
    assert_eq!(draw.phase(), DrawPhase::AwaitingCompletion);
}

#[tokio::test]
async fn complete_draw__full_cycle__returns_to_idle() {
    let gateway = Arc::new(FakeGateway::default());
    let reader = Arc::new(FakeReader::default());
    let mut draw = coordinator(gateway.clone(), reader);

    draw.start_draw(&stats(true, false), &mut |_| {}).await.unwrap();
    draw.complete_randomness(&mut |_| {}).await.unwrap();
    draw.complete_draw(&mut |_| {}).await.unwrap();

    let functions: Vec<String> = gateway
        .recorded_calls()
        .into_iter()
        .map(|call| call.function)
        .collect();
    assert_eq!(functions, vec!["startDraw", "completeRequest", "completeDraw"]);
    assert_eq!(draw.phase(), DrawPhase::Idle);
}

#[tokio::test]
async fn start_draw__gateway_failure__phase_unchanged() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.fail_call(
        0,
        Error::ContractFailed {
            function: "startDraw".to_string(),
            detail: "reverted".to_string(),
        },
    );
    let mut draw = coordinator(gateway.clone(), Arc::new(FakeReader::default()));

    let outcome = draw.start_draw(&stats(true, false), &mut |_| {}).await;

    assert!(outcome.is_err());
    assert_eq!(draw.phase(), DrawPhase::Idle);
}

#[test]
fn reconcile__chain_not_pending__overrides_local_phase() {
    // another participant completed the draw; the fresh read wins
    let phase = DrawPhase::AwaitingCompletion.reconcile(&stats(false, false));
    assert_eq!(phase, DrawPhase::Idle);
}

#[test]
fn reconcile__chain_pending__splits_sub_states_by_local_knowledge() {
    // a pending draw discovered from scratch needs randomness first
    assert_eq!(
        DrawPhase::Idle.reconcile(&stats(false, true)),
        DrawPhase::AwaitingRandomness
    );
    // once randomness is locally known to be fulfilled, stay there
    assert_eq!(
        DrawPhase::AwaitingCompletion.reconcile(&stats(false, true)),
        DrawPhase::AwaitingCompletion
    );
}
