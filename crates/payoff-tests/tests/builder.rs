//! Strategy builder endpoint tests.

use payoff_client::{Error, Leg, LegAction, PayoffRequest};
use payoff_tests::create_test_client;

#[tokio::test]
async fn test_bull_call_spread() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![
            Leg::call(LegAction::Buy, 24000.0, 180.0, 1),
            Leg::call(LegAction::Sell, 24200.0, 95.0, 1),
        ],
        lot_size: Some(75),
        underlying_price: Some(24000.0),
        ..Default::default()
    };

    let payoff = client
        .build_payoff(&request)
        .await
        .expect("Failed to build payoff");

    assert_eq!(payoff.lot_size, 75);
    assert_eq!(payoff.net_premium, -6375.0);
    assert_eq!(payoff.max_loss, Some(-6375.0));
    assert_eq!(payoff.max_profit, Some(8625.0));
    assert!(!payoff.max_profit_unbounded);
    assert!(!payoff.max_loss_unbounded);
    assert_eq!(payoff.breakevens.len(), 1);
    assert!((payoff.breakevens[0] - 24085.0).abs() < 1e-6);
    let ratio = payoff.risk_reward_ratio.expect("ratio should be defined");
    assert!((ratio - 8625.0 / 6375.0).abs() < 1e-9);
    assert!(payoff.warnings.is_empty());
}

#[tokio::test]
async fn test_short_straddle_reports_unbounded_loss() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![
            Leg::call(LegAction::Sell, 100.0, 6.0, 1),
            Leg::put(LegAction::Sell, 100.0, 4.0, 1),
        ],
        prices: Some(vec![80.0, 90.0, 100.0, 110.0, 120.0]),
        ..Default::default()
    };

    let payoff = client
        .build_payoff(&request)
        .await
        .expect("Failed to build payoff");

    assert_eq!(payoff.max_profit, Some(10.0));
    assert!(payoff.max_loss.is_none());
    assert!(payoff.max_loss_unbounded);
    assert_eq!(payoff.breakevens, vec![90.0, 110.0]);

    let json = serde_json::to_value(&payoff).unwrap();
    assert!(json["max_loss"].is_null());
}

#[tokio::test]
async fn test_coarse_sweep_still_samples_the_strike() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![Leg::call(LegAction::Buy, 100.0, 5.0, 1)],
        prices: Some(vec![80.0, 90.0, 110.0, 120.0]),
        ..Default::default()
    };

    let payoff = client
        .build_payoff(&request)
        .await
        .expect("Failed to build payoff");

    assert!(payoff.points.iter().any(|p| p.price == 100.0 && p.pnl == -5.0));
    assert_eq!(payoff.breakevens.len(), 1);
    assert!((payoff.breakevens[0] - 105.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_mixed_expiries_warning() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![
            Leg::call(LegAction::Sell, 100.0, 3.0, 1).with_expiry("28-Nov-2024"),
            Leg::call(LegAction::Buy, 100.0, 6.0, 1).with_expiry("26-Dec-2024"),
        ],
        underlying_price: Some(100.0),
        ..Default::default()
    };

    let payoff = client
        .build_payoff(&request)
        .await
        .expect("Failed to build payoff");

    assert_eq!(payoff.warnings.len(), 1);
}

#[tokio::test]
async fn test_empty_strategy_is_flat() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        underlying_price: Some(500.0),
        ..Default::default()
    };

    let payoff = client
        .build_payoff(&request)
        .await
        .expect("Failed to build payoff");

    assert!(payoff.points.iter().all(|p| p.pnl == 0.0));
    assert!(payoff.breakevens.is_empty());
    assert_eq!(payoff.max_profit, Some(0.0));
    assert_eq!(payoff.max_loss, Some(0.0));
}

#[tokio::test]
async fn test_invalid_leg_is_rejected() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![Leg::call(LegAction::Buy, -100.0, 5.0, 1)],
        underlying_price: Some(100.0),
        ..Default::default()
    };

    let result = client.build_payoff(&request).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("INVALID_LEG"));
        }
        other => panic!("Expected 400 error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_sweep_price_is_rejected() {
    let client = create_test_client().await.expect("Failed to create client");

    let request = PayoffRequest {
        legs: vec![Leg::call(LegAction::Buy, 100.0, 5.0, 1)],
        prices: Some(vec![100.0]),
        ..Default::default()
    };

    let result = client.build_payoff(&request).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("EMPTY_SWEEP"));
        }
        other => panic!("Expected 400 error, got {:?}", other),
    }
}
