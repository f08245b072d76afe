use crate::e2e::helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn it_should_start_with_an_empty_snapshot() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/weather").await.unwrap();

    response.assert_status(StatusCode::OK);
    let empty = json!({ "readings": [], "sources": [], "last_updated_at": null });
    assert_eq!(response.body, Some(empty));
}

#[tokio::test]
async fn it_should_replace_snapshot_on_refresh() {
    let ctx = TestContext::new().await.unwrap();
    ctx.generation.push_search_text(
        "Cidade,UF,Temperatura,Condição\nSão Paulo,SP,23°C,Nublado\nSalvador,BA,30°C,Sol\nsem vírgula",
        &[("https://clima.example/sp", "Clima SP")],
    );

    let response = ctx.client.post_empty("/api/weather/refresh").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(*response.field("/updated"), true);
    let readings = response.field("/snapshot/readings").as_array().unwrap();
    // The header row has four fields and is kept, like any other line
    assert_eq!(readings.len(), 3);
    assert_eq!(
        readings[1],
        json!({
            "city": "São Paulo",
            "state": "SP",
            "temperature": "23°C",
            "condition": "Nublado",
            "kind": "cloudy"
        })
    );
    assert_eq!(readings[2]["kind"], "clear");
    assert_eq!(
        *response.field("/snapshot/sources"),
        json!([{ "uri": "https://clima.example/sp", "title": "Clima SP" }])
    );
    assert!(!response.field("/snapshot/last_updated_at").is_null());
}

#[tokio::test]
async fn it_should_keep_previous_snapshot_when_nothing_parses() {
    let ctx = TestContext::new().await.unwrap();
    ctx.generation
        .push_search_text("Recife,PE,29°C,Chuva", &[("https://a.example", "A")]);
    ctx.generation
        .push_search_text("Sem dados no momento.", &[("https://b.example", "B")]);
    ctx.generation.push_search_error("timeout");

    let first = ctx.client.post_empty("/api/weather/refresh").await.unwrap();
    let first_snapshot: Value = first.field("/snapshot").clone();

    let second = ctx.client.post_empty("/api/weather/refresh").await.unwrap();
    second.assert_status(StatusCode::OK);
    assert_eq!(*second.field("/updated"), false);
    assert_eq!(*second.field("/snapshot"), first_snapshot);

    let third = ctx.client.post_empty("/api/weather/refresh").await.unwrap();
    third.assert_status(StatusCode::OK);
    assert_eq!(*third.field("/updated"), false);

    let current = ctx.client.get("/api/weather").await.unwrap();
    assert_eq!(current.body, Some(first_snapshot));
}
