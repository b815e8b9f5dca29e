// Integration tests for the ticker client against a mock HTTP server

use mockito::{Matcher, Server};
use paper_grid_bot::{list_symbols, BinancePriceClient, PriceSource, TradingError};

fn client_for(server: &Server) -> BinancePriceClient {
    BinancePriceClient::with_client(reqwest::Client::new(), &server.url())
}

#[tokio::test]
async fn test_latest_price_for_symbol() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"symbol":"BTCUSDT","price":"64123.45000000"}"#)
        .create_async()
        .await;

    let price = client_for(&server).latest_price("BTCUSDT").await.unwrap();

    assert_eq!(price, 64123.45);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_symbol_is_price_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::UrlEncoded("symbol".into(), "NOPEUSDT".into()))
        .with_status(400)
        .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
        .create_async()
        .await;

    let err = client_for(&server).latest_price("NOPEUSDT").await.unwrap_err();

    assert_eq!(err, TradingError::price_unavailable("HTTP 400"));
}

#[tokio::test]
async fn test_malformed_body_is_price_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).latest_price("BTCUSDT").await.unwrap_err();

    assert!(matches!(err, TradingError::PriceUnavailable(_)));
}

#[tokio::test]
async fn test_list_symbols_filters_quote_and_limits() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"symbol":"ETHBTC","price":"0.05"},
                {"symbol":"BTCUSDT","price":"64000.0"},
                {"symbol":"ETHUSDT","price":"3100.0"},
                {"symbol":"BNBBTC","price":"0.009"},
                {"symbol":"BNBUSDT","price":"590.0"},
                {"symbol":"SOLUSDT","price":"150.0"}
            ]"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);

    let symbols = list_symbols(&client, "USDT", 3).await.unwrap();
    assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT", "BNBUSDT"]);

    let all = list_symbols(&client, "USDT", 10).await.unwrap();
    assert_eq!(all.len(), 4);
}
