use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{ApiError, ApiResult};
use plaza_types::{FeedStats, Post, FIRST_PAGE_LIMIT, FIRST_PAGE_OFFSET};

/// Shown instead of the server's message when the posts endpoint refuses
pub const FETCH_FAILED: &str = "Failed to fetch posts";

/// Capability to fetch a page of posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self, offset: u32, limit: u32) -> ApiResult<Vec<Post>>;
}

/// Load state of the first feed page
#[derive(Debug, Clone, PartialEq)]
pub enum FeedLoadState {
    Loading,
    Error(String),
    Empty,
    /// Posts in the order the server returned them
    Loaded(Vec<Post>),
}

impl FeedLoadState {
    /// Resolve the outcome of the first-page fetch
    pub fn from_result(result: ApiResult<Vec<Post>>) -> Self {
        match result {
            Ok(posts) if posts.is_empty() => FeedLoadState::Empty,
            Ok(posts) => FeedLoadState::Loaded(posts),
            Err(err @ ApiError::Status { .. }) => {
                // The server's reason is logged, never shown
                log::error!("Error fetching initial posts: {}", err);
                FeedLoadState::Error(FETCH_FAILED.to_string())
            }
            Err(err) => {
                log::error!("Error fetching initial posts: {}", err);
                FeedLoadState::Error(err.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedLoadState::Loading)
    }

    pub fn posts(&self) -> &[Post] {
        match self {
            FeedLoadState::Loaded(posts) => posts,
            _ => &[],
        }
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats::from_posts(self.posts())
    }
}

/// Performs the one-shot load of the first feed page.
///
/// Clones share state. After `teardown()` a late result is dropped instead
/// of being applied, and `reload()` supersedes any load still in flight.
#[derive(Clone)]
pub struct FeedLoadController {
    source: Arc<dyn PostSource>,
    state: Arc<Mutex<FeedLoadState>>,
    generation: Arc<AtomicU64>,
    torn_down: Arc<AtomicBool>,
}

impl FeedLoadController {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(FeedLoadState::Loading)),
            generation: Arc::new(AtomicU64::new(0)),
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedLoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FeedLoadState {
        self.lock().clone()
    }

    /// Fetch the first page and settle into Error, Empty or Loaded.
    /// Does nothing once the state has already settled.
    pub async fn load(&self) -> FeedLoadState {
        if !self.lock().is_loading() {
            return self.state();
        }

        let generation = self.generation.load(Ordering::Acquire);
        log::info!(
            "Loading feed (offset={}, limit={})",
            FIRST_PAGE_OFFSET,
            FIRST_PAGE_LIMIT
        );

        let result = self
            .source
            .fetch_posts(FIRST_PAGE_OFFSET, FIRST_PAGE_LIMIT)
            .await;
        let next = FeedLoadState::from_result(result);

        if self.torn_down.load(Ordering::Acquire) {
            log::debug!("Feed torn down before load finished, dropping result");
            return self.state();
        }

        let mut state = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            log::debug!("Feed load superseded by a reload, dropping result");
            return state.clone();
        }
        if let FeedLoadState::Loaded(posts) = &next {
            log::info!("Loaded {} posts", posts.len());
        }
        *state = next;
        state.clone()
    }

    /// Start over from Loading and load again, as if freshly mounted
    pub async fn reload(&self) -> FeedLoadState {
        if self.torn_down.load(Ordering::Acquire) {
            return self.state();
        }
        {
            let mut state = self.lock();
            self.generation.fetch_add(1, Ordering::AcqRel);
            *state = FeedLoadState::Loading;
        }
        self.load().await
    }

    /// Stop applying results; the view that owned this feed is gone
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::Release);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }
}
