use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use super::loader::parse_table;
use super::source::DatasetSource;
use super::table::Table;
use crate::error::Result;

/// Loads the dataset at most once and hands out the shared table afterwards.
///
/// Concurrent first callers wait on the same initialization, so the source
/// is fetched once. A failed load leaves the cell empty.
///
/// The CLI runs one filter pass per invocation, so `main` holds a single
/// cache for the life of the process and the table is reused only within
/// that process.
pub struct DatasetCache {
    source: Box<dyn DatasetSource>,
    table: OnceCell<Arc<Table>>,
}

impl DatasetCache {
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> Result<Arc<Table>> {
        let table = self
            .table
            .get_or_try_init(|| async {
                let location = self.source.describe();
                info!(source = %location, "Fetching dataset");
                let bytes = self.source.fetch().await?;
                let table = parse_table(&bytes)?;
                info!(source = %location, rows = table.len(), "Dataset loaded");
                Ok::<_, crate::error::ExplorerError>(Arc::new(table))
            })
            .await?;
        Ok(Arc::clone(table))
    }

    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CSV: &str = "corridorName,payCardBank,payCardSex,tapInStopsLat,tapInStopsLon,tapInTime,tapOutStopsLat,tapOutStopsLon,tapOutTime\n\
        1,dki,M,,,2023-04-03 05:21:44,,,\n";

    struct Counting {
        calls: Arc<AtomicUsize>,
        body: &'static str,
    }

    #[async_trait]
    impl DatasetSource for Counting {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(self.body.as_bytes().to_vec())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    struct Failing;

    #[async_trait]
    impl DatasetSource for Failing {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Err(ExplorerError::Fetch("offline".into()))
        }

        fn describe(&self) -> String {
            "failing".into()
        }
    }

    #[tokio::test]
    async fn test_load_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = DatasetCache::new(Box::new(Counting {
            calls: calls.clone(),
            body: CSV,
        }));

        let first = cache.load().await.unwrap();
        let second = cache.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_loaded());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(DatasetCache::new(Box::new(Counting {
            calls: calls.clone(),
            body: CSV,
        })));

        let mut tasks = vec![];
        for _ in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move { cache.load().await.map(|t| t.len()) }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let cache = DatasetCache::new(Box::new(Failing));
        assert!(matches!(cache.load().await, Err(ExplorerError::Fetch(_))));
        assert!(!cache.is_loaded());
    }

    #[tokio::test]
    async fn test_format_error_is_surfaced() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = DatasetCache::new(Box::new(Counting {
            calls,
            body: "tapInTime\n2023-04-03 05:21:44\n",
        }));
        assert!(matches!(
            cache.load().await,
            Err(ExplorerError::DataFormat(_))
        ));
    }
}
