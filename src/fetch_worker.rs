// src/fetch_worker.rs
use std::{
    sync::mpsc::{self, Receiver, Sender},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::api_client::{FetchError, FetchedPage, RecordSource};

/// Who asked for the page; the UI routes the response accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Navigation,
    Selector,
}

#[derive(Debug)]
pub enum FetchRequest {
    Page { page: u64, offset: u64, origin: FetchOrigin },
    Quit,
}

#[derive(Debug)]
pub struct FetchResponse {
    pub page: u64,
    pub origin: FetchOrigin,
    pub elapsed: Duration,
    pub result: Result<FetchedPage, FetchError>,
}

/// Dispatcher thread that turns each request into its own tokio task.
///
/// Requests are not serialised: fetches overlap, finish in any order, and
/// are never cancelled or deduplicated. Responses are drained by the UI
/// with `try_recv`.
pub fn start_fetch_worker(
    runtime: Handle,
    source: Arc<dyn RecordSource>,
) -> (Sender<FetchRequest>, Receiver<FetchResponse>) {
    let (req_tx, req_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    thread::spawn(move || loop {
        match req_rx.recv() {
            Ok(FetchRequest::Page { page, offset, origin }) => {
                let source = Arc::clone(&source);
                let resp_tx: Sender<FetchResponse> = resp_tx.clone();
                debug!(page, offset, ?origin, "fetch dispatched");
                runtime.spawn(async move {
                    let started = Instant::now();
                    let result = source.fetch(offset).await;
                    let elapsed = started.elapsed();
                    if let Err(err) = &result {
                        warn!(page, ?origin, error = %err, "fetch failed");
                    }
                    // Receiver gone means the UI quit; nothing left to update.
                    let _ = resp_tx.send(FetchResponse { page, origin, elapsed, result });
                });
            }
            Ok(FetchRequest::Quit) | Err(_) => break,
        }
    });

    (req_tx, resp_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl RecordSource for Echo {
        async fn fetch(&self, offset: u64) -> Result<FetchedPage, FetchError> {
            if offset >= 24 {
                return Err(FetchError::Unavailable(format!("offset {offset}")));
            }
            Ok(FetchedPage { records: Vec::new(), total: offset })
        }
    }

    #[test]
    fn responses_carry_page_and_origin() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = start_fetch_worker(rt.handle().clone(), Arc::new(Echo));

        tx.send(FetchRequest::Page { page: 2, offset: 12, origin: FetchOrigin::Selector }).unwrap();
        tx.send(FetchRequest::Page { page: 3, offset: 24, origin: FetchOrigin::Navigation }).unwrap();

        let mut got: Vec<FetchResponse> = (0..2)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        got.sort_by_key(|r| r.page);

        assert_eq!(got[0].origin, FetchOrigin::Selector);
        assert_eq!(got[0].result.as_ref().unwrap().total, 12);
        assert_eq!(got[1].origin, FetchOrigin::Navigation);
        assert!(got[1].result.is_err());

        tx.send(FetchRequest::Quit).unwrap();
    }
}
