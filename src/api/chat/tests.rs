use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::services::personas::Persona;
use crate::test_support;

#[tokio::test]
async fn chat_uses_tutor_persona_and_rolling_window() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "bora", "bora-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    for index in 0..4 {
        ctx.generator.push(&format!("answer {index}"));
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/chat",
                Some(&token),
                Some(json!({ "message": format!("question {index}") })),
            ))
            .await
            .expect("chat");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body, json!({ "response": format!("answer {index}") }));
    }

    let requests = ctx.generator.requests();
    assert!(requests.iter().all(|request| request.persona == Persona::Tutor));
    // Six stored messages, only the latest five are replayed.
    assert_eq!(
        requests[3].prompt,
        "Ai: answer 0\nUser: question 1\nAi: answer 1\nUser: question 2\nAi: answer 2\n\
         User: question 3\nAI:"
    );
}

#[tokio::test]
async fn empty_message_is_rejected_without_ai_call() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "arda", "arda-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/chat",
            Some(&token),
            Some(json!({"message": "   "})),
        ))
        .await
        .expect("chat");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.generator.requests().is_empty());
}

#[tokio::test]
async fn history_can_be_listed_and_cleared() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "ilke", "ilke-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());
    ctx.generator.push("Start with the syllabus.");

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/chat",
            Some(&token),
            Some(json!({"message": "How do I prepare?"})),
        ))
        .await
        .expect("chat");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/chat/history?channel=tutor",
            Some(&token),
            None,
        ))
        .await
        .expect("history");
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["text"], "How do I prepare?");
    assert_eq!(body[1]["text"], "Start with the syllabus.");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/v1/chat/history",
            Some(&token),
            None,
        ))
        .await
        .expect("clear history");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/chat/history",
            Some(&token),
            None,
        ))
        .await
        .expect("history after clear");
    assert_eq!(test_support::read_json(response).await, json!([]));
}
