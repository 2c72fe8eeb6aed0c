use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::CacheError;

type LoadResult = Result<Bytes, CacheError>;

enum Role {
    /// This caller registered the key and must start the load.
    Leader(broadcast::Receiver<LoadResult>),
    /// A load for the key is already outstanding; just wait for it.
    Waiter(broadcast::Receiver<LoadResult>),
}

/// Deduplicates concurrent loads of the same key within this process.
///
/// The first caller for a key becomes the leader: its `load_fn` runs in a
/// spawned task, so the load completes even if that caller stops waiting.
/// Every caller (leader included) waits on a broadcast channel and receives
/// the identical result. The in-flight record is removed before the result
/// is published, so a miss arriving after completion starts a fresh load.
pub struct CoalescingLoader {
    in_flight: Arc<Mutex<HashMap<String, broadcast::Sender<LoadResult>>>>,
}

impl Default for CoalescingLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CoalescingLoader {
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys with an outstanding load.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Run `load_fn` for `key`, unless a load for `key` is already
    /// outstanding, in which case wait for that load's result instead.
    ///
    /// The lock guards only registry bookkeeping; the load itself runs
    /// outside it, so loads for different keys proceed in parallel.
    pub async fn load<F, Fut>(&self, key: &str, load_fn: F) -> LoadResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        let role = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(key) {
                Some(tx) => Role::Waiter(tx.subscribe()),
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    in_flight.insert(key.to_string(), tx);
                    Role::Leader(rx)
                }
            }
        };

        let mut rx = match role {
            Role::Waiter(rx) => rx,
            Role::Leader(rx) => {
                let fut = load_fn();
                let in_flight = Arc::clone(&self.in_flight);
                let key = key.to_string();
                tokio::spawn(async move {
                    let result = fut.await;
                    let tx = in_flight.lock().remove(&key);
                    if let Some(tx) = tx {
                        // No receivers left means every waiter was
                        // cancelled; the result is simply dropped.
                        let _ = tx.send(result);
                    }
                });
                rx
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            Err(_) => Err(CacheError::LoadFailed(
                "in-flight load finished without publishing a result".to_string(),
            )),
        }
    }
}
