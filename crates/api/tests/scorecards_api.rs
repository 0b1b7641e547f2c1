//! Integration tests for the scorecard endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::{json, Value};

fn colors() -> Value {
    json!([
        { "id": 1, "name": "White" },
        { "id": 6, "name": "White Blue" },
        { "id": 32, "name": "Colorless" }
    ])
}

// ---------------------------------------------------------------------------
// POST /api/v1/scorecards/reconcile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_submission_creates_records() {
    let app = common::build_test_app();
    let body = json!({
        "round_id": 5,
        "pod_id": 2,
        "participant_ids": [1, 2, 3, 4],
        "colors": colors(),
        "submission": {
            "general": { "bring-snack": [1, 3] },
            "outcome": {
                "kind": "winner",
                "participant_id": 3,
                "commander_name": "Kenrith",
                "colors": { "White": true, "Blue": true },
                "picked": [{ "temp_id": "t1", "achievement_id": 40 }]
            }
        }
    });

    let response = post_json(app, "/api/v1/scorecards/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(
        data["to_create"],
        json!([
            { "round_id": 5, "participant_id": 1, "slug": "bring-snack" },
            { "round_id": 5, "participant_id": 3, "slug": "bring-snack" },
            { "round_id": 5, "participant_id": 3, "slug": "win-2-colors" },
            { "round_id": 5, "participant_id": 3, "achievement_id": 40 }
        ])
    );
    assert_eq!(data["to_update"], json!([]));
    assert_eq!(
        data["winner_info"],
        json!({
            "id": null,
            "participant_id": 3,
            "color_id": 6,
            "commander_name": "Kenrith",
            "pod_id": 2
        })
    );
}

#[tokio::test]
async fn entering_a_draw_returns_tombstone() {
    let app = common::build_test_app();
    let body = json!({
        "round_id": 5,
        "pod_id": 2,
        "participant_ids": [1, 2, 3],
        "snapshot": {
            "records": [
                { "id": 70, "slug": "win-1-colors", "participant_id": 1 },
                { "id": 71, "participant_id": 1, "achievement_id": 40 }
            ],
            "winning_commander": {
                "id": 9,
                "participant_id": 1,
                "commander_name": "Kenrith",
                "color_id": 1
            }
        },
        "submission": { "outcome": { "kind": "draw" } }
    });

    let response = post_json(app, "/api/v1/scorecards/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(
        data["to_update"],
        json!([{ "id": 70, "deleted": true }, { "id": 71, "deleted": true }])
    );
    assert_eq!(data["to_create"].as_array().unwrap().len(), 3);
    assert_eq!(data["winner_info"]["commander_name"], "END IN DRAW");
    assert_eq!(data["winner_info"]["participant_id"], Value::Null);
    assert_eq!(data["winner_info"]["id"], 9);
}

#[tokio::test]
async fn winner_outside_pod_returns_400() {
    let app = common::build_test_app();
    let body = json!({
        "round_id": 5,
        "pod_id": 2,
        "participant_ids": [1, 2, 3],
        "submission": { "outcome": { "kind": "winner", "participant_id": 8 } }
    });

    let response = post_json(app, "/api/v1/scorecards/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Winner 8 is not in the pod");
}

#[tokio::test]
async fn oversized_pod_returns_400() {
    let app = common::build_test_app();
    let body = json!({
        "round_id": 5,
        "pod_id": 2,
        "participant_ids": [1, 2, 3, 4, 5, 6],
        "submission": { "outcome": { "kind": "draw" } }
    });

    let response = post_json(app, "/api/v1/scorecards/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn draw_and_winner_snapshot_returns_409() {
    let app = common::build_test_app();
    let body = json!({
        "round_id": 5,
        "pod_id": 2,
        "participant_ids": [1, 2, 3],
        "snapshot": {
            "records": [{ "id": 80, "slug": "end-draw", "participant_id": 1 }],
            "winning_commander": { "participant_id": 2 }
        },
        "submission": { "outcome": { "kind": "draw" } }
    });

    let response = post_json(app, "/api/v1/scorecards/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// POST /api/v1/scorecards/initial-values
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initial_values_rebuild_winner_form() {
    let app = common::build_test_app();
    let body = json!({
        "colors": colors(),
        "snapshot": {
            "records": [
                { "id": 70, "slug": "win-2-colors", "participant_id": 1 },
                { "id": 72, "slug": "last-in-order", "participant_id": 1 },
                { "id": 73, "slug": "knock-out", "participant_id": 2 }
            ],
            "winning_commander": {
                "id": 9,
                "participant_id": 1,
                "commander_name": "Kenrith",
                "color_id": 6
            }
        }
    });

    let response = post_json(app, "/api/v1/scorecards/initial-values", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["general"]["knock-out"], json!([2]));
    assert_eq!(data["general"]["bring-snack"], json!([]));
    assert_eq!(data["outcome"]["kind"], "winner");
    assert_eq!(data["outcome"]["participant_id"], 1);
    assert_eq!(data["outcome"]["flags"], json!(["last-in-order"]));
    assert_eq!(data["outcome"]["colors"]["White"], true);
    assert_eq!(data["outcome"]["colors"]["Blue"], true);
    assert_eq!(data["outcome"]["colors"]["Red"], false);
}

#[tokio::test]
async fn initial_values_null_for_fresh_pod() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/scorecards/initial-values", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], Value::Null);
}
