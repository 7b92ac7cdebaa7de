use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termscan::{Transport, TransportError};

/// What the scripted transport answers for one URL
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Raw(Vec<u8>),
    Refuse,
    Timeout,
    /// Never answers; only cancellation gets a unit out
    Hang,
}

/// Deterministic transport keyed by full URL
///
/// Unknown URLs are refused. Tracks every request and the peak number of
/// requests in flight at once.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, url: &str, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    /// Hold every request for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.replies.get(url).cloned() {
            Some(Reply::Body(body)) => Ok(Bytes::from(body)),
            Some(Reply::Raw(bytes)) => Ok(Bytes::from(bytes)),
            Some(Reply::Timeout) => Err(TransportError::Timeout {
                url: url.to_string(),
            }),
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Refuse) | None => Err(TransportError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

/// `a.test` mentions Widget Co, `b.test` is unreachable, `c.test` does not mention it
pub fn widget_sites() -> ScriptedTransport {
    ScriptedTransport::new()
        .body(
            "http://a.test",
            "<html><body><h1>Widget Co</h1><p>Quality widgets since 1999</p></body></html>",
        )
        .body(
            "http://c.test",
            "<html><body><p>Gadgets and gizmos only</p></body></html>",
        )
}

/// `n` reachable hosts, `site0.test` .. `site{n-1}.test`, every one mentioning `term`
pub fn many_sites(n: usize, term: &str) -> (Vec<String>, ScriptedTransport) {
    let mut transport = ScriptedTransport::new();
    let mut targets = Vec::with_capacity(n);
    for i in 0..n {
        let target = format!("site{}.test", i);
        transport = transport.body(
            &format!("http://{}", target),
            &format!("<p>page {} about {}</p>", i, term),
        );
        targets.push(target);
    }
    (targets, transport)
}
