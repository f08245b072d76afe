use crate::e2e::helpers::TestContext;
use hyper::StatusCode;

#[tokio::test]
async fn it_should_answer_liveness() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, b"OK");
}

#[tokio::test]
async fn it_should_report_store_readiness() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(*response.field("/status"), "ready");
    assert_eq!(*response.field("/store"), "memory");
}

#[tokio::test]
async fn it_should_attach_request_id() {
    let ctx = TestContext::new().await.unwrap();

    let first = ctx.client.get("/health").await.unwrap();
    let second = ctx.client.get("/health").await.unwrap();

    first.assert_header_exists("x-request-id");
    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}
