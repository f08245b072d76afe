use crate::e2e::helpers::TestContext;
use cvp_studio_backend::domain::chat::{FALLBACK_REPLY, SEED_MESSAGE};
use futures::future::join;
use hyper::StatusCode;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

async fn create_session(ctx: &TestContext) -> String {
    let response = ctx.client.post_empty("/api/chat/sessions").await.unwrap();
    response.assert_status(StatusCode::CREATED);
    response
        .field("/session_id")
        .as_str()
        .expect("session id")
        .to_string()
}

#[tokio::test]
async fn it_should_open_a_seeded_session() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.post_empty("/api/chat/sessions").await.unwrap();

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        *response.field("/messages"),
        json!([{ "role": "model", "content": SEED_MESSAGE }])
    );
}

#[tokio::test]
async fn it_should_run_turns_and_substitute_fallback() {
    let ctx = TestContext::new().await.unwrap();
    ctx.generation.push_chat(Ok(Some("Vamos escalar seu produto.".to_string())));
    ctx.generation.push_chat(Err("503".to_string()));
    ctx.generation.push_chat(Ok(Some("Fale no WhatsApp.".to_string())));
    let session = create_session(&ctx).await;
    let path = format!("/api/chat/sessions/{}/messages", session);

    let first = ctx
        .client
        .post(&path, &json!({ "text": "Olá" }))
        .await
        .unwrap();
    first.assert_status(StatusCode::OK);
    assert_eq!(*first.field("/reply/content"), "Vamos escalar seu produto.");
    assert_eq!(*first.field("/fallback"), false);

    let second = ctx
        .client
        .post(&path, &json!({ "text": "Prazo?" }))
        .await
        .unwrap();
    second.assert_status(StatusCode::OK);
    assert_eq!(*second.field("/reply/content"), FALLBACK_REPLY);
    assert_eq!(*second.field("/fallback"), true);

    let third = ctx
        .client
        .post(&path, &json!({ "text": "Ok" }))
        .await
        .unwrap();
    assert_eq!(third.field("/messages").as_array().unwrap().len(), 7);

    let history = ctx
        .client
        .get(&format!("/api/chat/sessions/{}", session))
        .await
        .unwrap();
    history.assert_status(StatusCode::OK);
    let messages = history.field("/messages").as_array().unwrap().clone();
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[1], json!({ "role": "user", "content": "Olá" }));
    assert_eq!(messages[4]["content"], FALLBACK_REPLY);
}

#[tokio::test]
async fn it_should_reject_blank_messages() {
    let ctx = TestContext::new().await.unwrap();
    let session = create_session(&ctx).await;

    let response = ctx
        .client
        .post(
            &format!("/api/chat/sessions/{}/messages", session),
            &json!({ "text": "   " }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Message cannot be empty");
}

#[tokio::test]
async fn it_should_return_404_for_unknown_session() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get(&format!("/api/chat/sessions/{}", Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_reject_a_second_turn_while_one_is_in_flight() {
    let ctx = TestContext::new().await.unwrap();
    ctx.generation.set_delay(Duration::from_millis(300));
    ctx.generation.push_chat(Ok(Some("resposta".to_string())));
    let session = create_session(&ctx).await;
    let path = format!("/api/chat/sessions/{}/messages", session);

    let (a, b) = join(
        ctx.client.post(&path, &json!({ "text": "um" })),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ctx.client.post(&path, &json!({ "text": "dois" })).await
        },
    )
    .await;

    a.unwrap().assert_status(StatusCode::OK);
    b.unwrap().assert_status(StatusCode::CONFLICT);

    let history = ctx
        .client
        .get(&format!("/api/chat/sessions/{}", session))
        .await
        .unwrap();
    assert_eq!(history.field("/messages").as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn it_should_measure_message_limit_in_characters() {
    let ctx = TestContext::new().await.unwrap();
    ctx.generation.push_chat(Ok(Some("Certo.".to_string())));
    let session = create_session(&ctx).await;
    let path = format!("/api/chat/sessions/{}/messages", session);

    // 4000 characters, 8000 bytes
    let accented = "é".repeat(4000);
    ctx.client
        .post(&path, &json!({ "text": accented }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let too_long = "a".repeat(4001);
    ctx.client
        .post(&path, &json!({ "text": too_long }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("4,000 characters");
}
