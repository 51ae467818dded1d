//! Widget library loading.
//!
//! The widget library is loaded at most once per cache. Concurrent callers
//! share the in-flight load and its outcome; a library that is already
//! present in the environment is used without loading the script.

use crate::errors::BootstrapError;
use crate::widget::WidgetLibrary;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument, warn};

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<dyn WidgetLibrary>, BootstrapError>>>;

/// Access to the widget library in the hosting environment.
#[async_trait]
pub trait LibraryLoader: Send + Sync {
    /// The library if it is already present.
    fn existing(&self) -> Option<Arc<dyn WidgetLibrary>>;

    /// Inject `script_url` and wait for it to provide the library.
    ///
    /// # Errors
    ///
    /// `BootstrapError::Network` when the script cannot be loaded.
    async fn load(&self, script_url: &str) -> Result<Arc<dyn WidgetLibrary>, BootstrapError>;
}

/// Shared, lazily loaded widget library.
///
/// Share one cache (behind an `Arc`) across every view in the process.
pub struct WidgetLibraryCache {
    loader: Arc<dyn LibraryLoader>,
    script_url: String,
    library: OnceCell<Arc<dyn WidgetLibrary>>,
    in_flight: Mutex<Option<SharedLoad>>,
}

impl WidgetLibraryCache {
    pub fn new(loader: Arc<dyn LibraryLoader>, script_url: impl Into<String>) -> Self {
        Self {
            loader,
            script_url: script_url.into(),
            library: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }

    /// Whether the library has been obtained.
    pub fn is_loaded(&self) -> bool {
        self.library.initialized()
    }

    /// Get the library, loading it on first use.
    ///
    /// Every caller waiting on the same load receives its result, failure
    /// included. A failed load is forgotten once it settles, so a later call
    /// loads again.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    #[instrument(skip_all, name = "session.library.get")]
    pub async fn get(&self) -> Result<Arc<dyn WidgetLibrary>, BootstrapError> {
        if let Some(library) = self.library.get() {
            return Ok(library.clone());
        }

        let load = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(library) = self.library.get() {
                return Ok(library.clone());
            }
            in_flight.get_or_insert_with(|| self.start_load()).clone()
        };

        let result = load.clone().await;

        let mut in_flight = self.in_flight.lock().await;
        if in_flight.as_ref().is_some_and(|current| current.ptr_eq(&load)) {
            *in_flight = None;
            if let Ok(library) = &result {
                let _ = self.library.set(library.clone());
            }
        }

        result
    }

    fn start_load(&self) -> SharedLoad {
        let loader = self.loader.clone();
        let script_url = self.script_url.clone();

        async move {
            if let Some(library) = loader.existing() {
                debug!(target: "session.library", "Widget library already present");
                return Ok(library);
            }

            info!(
                target: "session.library",
                script_url = %script_url,
                "Loading widget library"
            );
            loader.load(&script_url).await.map_err(|e| {
                warn!(target: "session.library", error = %e, "Widget library load failed");
                e
            })
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockLibraryLoader, MockWidgetLibrary};
    use futures::future::join_all;

    #[tokio::test]
    async fn test_existing_library_skips_load() {
        let loader = Arc::new(MockLibraryLoader::preloaded(Arc::new(MockWidgetLibrary::new())));
        let cache = WidgetLibraryCache::new(loader.clone(), "https://8x8.vc/external_api.js");

        cache.get().await.unwrap();

        assert!(cache.is_loaded());
        assert_eq!(loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_load() {
        let loader = Arc::new(MockLibraryLoader::loading(Arc::new(MockWidgetLibrary::new())));
        let cache = Arc::new(WidgetLibraryCache::new(
            loader.clone(),
            "https://8x8.vc/external_api.js",
        ));

        let results = join_all((0..8).map(|_| {
            let cache = cache.clone();
            async move { cache.get().await }
        }))
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(loader.load_count(), 1);
        assert_eq!(
            loader.loaded_urls(),
            vec!["https://8x8.vc/external_api.js".to_string()]
        );

        cache.get().await.unwrap();
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let loader = Arc::new(MockLibraryLoader::failing());
        let cache = WidgetLibraryCache::new(loader.clone(), "https://8x8.vc/external_api.js");

        assert!(matches!(
            cache.get().await,
            Err(BootstrapError::Network(_))
        ));
        assert!(!cache.is_loaded());

        assert!(cache.get().await.is_err());
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_failed_load() {
        let loader = Arc::new(MockLibraryLoader::failing());
        let cache = Arc::new(WidgetLibraryCache::new(
            loader.clone(),
            "https://8x8.vc/external_api.js",
        ));

        let results = join_all((0..4).map(|_| {
            let cache = cache.clone();
            async move { cache.get().await }
        }))
        .await;

        let expected = BootstrapError::Network(
            "Failed to load https://8x8.vc/external_api.js".to_string(),
        );
        assert!(results.iter().all(|r| r.as_ref().err() == Some(&expected)));
        assert_eq!(loader.load_count(), 1);
        assert!(!cache.is_loaded());

        // A later, separate attempt starts a fresh load
        assert!(cache.get().await.is_err());
        assert_eq!(loader.load_count(), 2);
    }
}
