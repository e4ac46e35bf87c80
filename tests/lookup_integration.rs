//! Testes do cliente ViaCEP contra um servidor HTTP local.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use buscacep::lookup::{CepLookup, ViaCepClient};
use buscacep::{BuscaCepError, Cep, Region};

/// Sobe um servidor que responde uma única requisição.
///
/// Retorna a URL base e o canal com a linha de requisição recebida.
async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (format!("http://{}/ws", addr), rx)
}

fn cep() -> Cep {
    Cep::parse("01310-100").unwrap()
}

#[tokio::test]
async fn test_lookup_success() {
    let body = r#"{
        "cep": "01310-100",
        "logradouro": "Avenida Paulista",
        "complemento": "de 612 a 1510 - lado par",
        "bairro": "Bela Vista",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "ddd": "11"
    }"#;
    let (base_url, request) = serve_once("200 OK", body).await;

    let client = ViaCepClient::with_base_url(base_url).unwrap();
    let addr = client.lookup(&cep()).await.unwrap();

    assert_eq!(addr.street, "Avenida Paulista");
    assert_eq!(addr.region, Region::Sudeste);
    assert_eq!(addr.postal_code.as_str(), "01310100");
    assert_eq!(request.await.unwrap(), "GET /ws/01310100/json HTTP/1.1");
}

#[tokio::test]
async fn test_lookup_not_found_flag() {
    let (base_url, _) = serve_once("200 OK", r#"{"erro": true}"#).await;

    let client = ViaCepClient::with_base_url(base_url).unwrap();
    let err = client.lookup(&cep()).await.unwrap_err();

    assert!(matches!(err, BuscaCepError::CepNotFound(ref c) if c == &cep()));
}

#[tokio::test]
async fn test_lookup_http_error_is_connectivity() {
    let (base_url, _) = serve_once("400 Bad Request", "<html></html>").await;

    let client = ViaCepClient::with_base_url(base_url).unwrap();
    let err = client.lookup(&cep()).await.unwrap_err();

    assert!(matches!(err, BuscaCepError::Connectivity(_)));
    assert_eq!(err.user_message(), "Erro na conexão. Tente novamente.");
}

#[tokio::test]
async fn test_lookup_refused_connection_is_connectivity() {
    // Porta liberada logo após o bind: ninguém escuta
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ViaCepClient::with_base_url(format!("http://{}/ws", addr)).unwrap();
    let err = client.lookup(&cep()).await.unwrap_err();

    assert!(matches!(err, BuscaCepError::Connectivity(_)));
}

#[test]
fn test_lookup_from_sync_context() {
    tokio_test::block_on(async {
        let (base_url, _) = serve_once("200 OK", r#"{"cep": "69900-062", "uf": "ac"}"#).await;

        let client = ViaCepClient::with_base_url(base_url).unwrap();
        assert_eq!(client.name(), "ViaCEP");

        let addr = client.lookup(&Cep::parse("69900062").unwrap()).await.unwrap();
        assert_eq!(addr.region, Region::Norte);
        assert_eq!(addr.street, "");
    });
}
