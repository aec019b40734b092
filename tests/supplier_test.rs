use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use cyber_shield::adapter::{
    ContentGenerator, Driver, GeneratorConfig, GeneratorWorker, HttpGenerator,
};
use cyber_shield::core::{
    catalog, Session, SessionConfig, SessionEvent, SupplyError, SupplyOutcome,
};
use cyber_shield::types::{Command, ContentItem, Decision, RankTier, Verdict};

/// Returns `n` renamed catalog items and counts calls.
struct FixedGenerator {
    n: usize,
    calls: AtomicUsize,
}

impl ContentGenerator for FixedGenerator {
    async fn generate(&self, _rank: RankTier) -> Result<Vec<ContentItem>, SupplyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.n)
            .map(|i| {
                let mut item = catalog()[i % catalog().len()].clone();
                item.id = format!("gen-{}", i);
                item
            })
            .collect())
    }
}

fn right_answer(s: &Session) -> Decision {
    match s.current_item().unwrap().verdict {
        Verdict::Genuine => Decision::ClassifyGenuine,
        Verdict::False => Decision::ClassifyFalse,
    }
}

#[tokio::test]
async fn generated_batch_is_appended_through_the_worker() {
    let generator = FixedGenerator {
        n: 4,
        calls: AtomicUsize::new(0),
    };
    let worker = GeneratorWorker::new(generator, Handle::current());
    let mut driver = Driver::new(Session::new(SessionConfig::seeded(30)), worker, None);
    driver.apply(Command::Start);

    for _ in 0..5 {
        let d = right_answer(driver.session());
        driver.apply(Command::Decide(d));
        driver.step(400);
    }

    let mut outcome = None;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        for event in driver.step(0) {
            if let SessionEvent::Replenished(o) = event {
                outcome = Some(o);
            }
        }
        if outcome.is_some() {
            break;
        }
    }

    assert_eq!(outcome, Some(SupplyOutcome::Generated(4)));
    assert_eq!(driver.session().queue().len(), 12);
    assert_eq!(driver.session().queue().items()[8].id, "gen-0");
    assert_eq!(driver.worker().generator().calls.load(Ordering::SeqCst), 1);
}

/// Minimal HTTP/1.1 responder: captures one request, answers with `status`
/// and `body`.
async fn mock_endpoint(status: &'static str, body: String) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (req_tx, req_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let request = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break String::from_utf8_lossy(&buf).to_string();
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break text;
                }
            }
        };
        let _ = req_tx.send(request);

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    (addr, req_rx)
}

#[tokio::test]
async fn http_generator_posts_rank_and_parses_items() {
    let body = serde_json::to_string(&catalog()[..2]).unwrap();
    let (addr, req_rx) = mock_endpoint("200 OK", body).await;

    let mut config = GeneratorConfig::new(format!("http://{}/generate", addr));
    config.token = Some("secret".to_string());
    config.batch_size = 2;
    let generator = HttpGenerator::new(config).unwrap();

    let items = tokio::time::timeout(Duration::from_secs(5), generator.generate(RankTier::Junior))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], catalog()[0]);

    let request = req_rx.await.unwrap();
    assert!(request.starts_with("POST /generate"));
    assert!(request.to_lowercase().contains("authorization: bearer secret"));
    assert!(request.contains(r#""rank":"Junior Fact-Checker""#));
    assert!(request.contains(r#""count":2"#));
}

#[tokio::test]
async fn http_generator_reports_error_status() {
    let (addr, _req_rx) = mock_endpoint("503 Service Unavailable", "{}".to_string()).await;
    let generator =
        HttpGenerator::new(GeneratorConfig::new(format!("http://{}/generate", addr))).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), generator.generate(RankTier::Novice))
        .await
        .unwrap();
    assert_eq!(result, Err(SupplyError::Status(503)));
}

#[tokio::test]
async fn http_generator_null_body_is_empty() {
    let (addr, _req_rx) = mock_endpoint("200 OK", "null".to_string()).await;
    let generator =
        HttpGenerator::new(GeneratorConfig::new(format!("http://{}/generate", addr))).unwrap();

    let result = generator.generate(RankTier::Novice).await;
    assert_eq!(result, Err(SupplyError::Empty));
}

#[tokio::test]
async fn unreachable_generator_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let mut config = GeneratorConfig::new(format!("http://{}/generate", addr));
    config.timeout_ms = 1_000;
    let generator = HttpGenerator::new(config).unwrap();

    let result = generator.generate(RankTier::Novice).await;
    assert!(matches!(result, Err(SupplyError::Transport(_))));
}
