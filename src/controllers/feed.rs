//! Incrementally loaded post list ("Show more")
//!
//! The hosting view performs the first fetch and seeds a [`PostFeed`] with
//! it. After that, [`PostFeed::load_more`] is the only way the list grows:
//! one page at a time, never two fetches at once, and never again once the
//! feed has run dry or failed.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::content::{ContentSource, FeedClient, Post, PostBatch};

/// Where the next page of posts comes from
///
/// Content sources load through `Arc<dyn ContentSource>`; [`FeedClient`]
/// loads directly and reports failures.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_page(&self, page: u32, per_page: u32) -> Result<PostBatch>;
}

#[async_trait]
impl PageLoader for dyn ContentSource {
    async fn load_page(&self, page: u32, per_page: u32) -> Result<PostBatch> {
        Ok(self.fetch_posts(page, per_page).await)
    }
}

#[async_trait]
impl PageLoader for FeedClient {
    async fn load_page(&self, page: u32, per_page: u32) -> Result<PostBatch> {
        self.fetch(page, per_page).await
    }
}

#[async_trait]
impl<L: PageLoader + ?Sized> PageLoader for Arc<L> {
    async fn load_page(&self, page: u32, per_page: u32) -> Result<PostBatch> {
        (**self).load_page(page, per_page).await
    }
}

/// Pagination position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Last page appended, 1-based
    pub current: u32,
    pub per_page: u32,
    /// Page count reported by the server (0 while unknown)
    pub total_pages: u32,
}

/// Lifecycle phase of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    /// The hosting view is gone; results are dropped on arrival
    Detached,
}

/// What a call to [`PostFeed::load_more`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page with this many posts was appended
    Loaded(usize),
    /// The server returned an empty page; the feed is exhausted
    Exhausted,
    /// The fetch failed; the feed stops paging
    Failed,
    /// Nothing to do: already loading, no more pages, or detached
    Skipped,
    /// The feed was detached while the fetch was in flight
    Discarded,
}

#[derive(Debug)]
struct FeedState {
    posts: Vec<Post>,
    cursor: PageCursor,
    has_more: bool,
    phase: Phase,
}

/// Accumulated list of posts plus its page cursor
#[derive(Debug)]
pub struct PostFeed<L> {
    loader: L,
    state: Mutex<FeedState>,
}

impl<L: PageLoader> PostFeed<L> {
    /// Seed a feed with the first page fetched by the hosting view
    pub fn new(loader: L, initial: Vec<Post>, total_pages: u32, per_page: u32) -> Self {
        Self {
            loader,
            state: Mutex::new(FeedState {
                posts: initial,
                cursor: PageCursor {
                    current: 1,
                    per_page,
                    total_pages,
                },
                has_more: 1 < total_pages,
                phase: Phase::Idle,
            }),
        }
    }

    /// Seed a feed from a fetched batch
    pub fn from_batch(loader: L, batch: PostBatch, per_page: u32) -> Self {
        Self::new(loader, batch.posts, batch.total_pages, per_page)
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch and append the next page
    ///
    /// Calls made while a fetch is in flight, after the last page, or after
    /// [`detach`](Self::detach) return [`LoadOutcome::Skipped`] without
    /// touching the network.
    pub async fn load_more(&self) -> LoadOutcome {
        let (next, per_page) = {
            let mut state = self.lock();
            if state.phase != Phase::Idle || !state.has_more {
                return LoadOutcome::Skipped;
            }
            state.phase = Phase::Loading;
            (state.cursor.current + 1, state.cursor.per_page)
        };

        let mut guard = LoadingGuard {
            state: &self.state,
            armed: true,
        };

        tracing::debug!("Loading page {} ({} per page)", next, per_page);
        let result = self.loader.load_page(next, per_page).await;
        guard.armed = false;

        let mut state = self.lock();
        if state.phase == Phase::Detached {
            tracing::debug!("Feed detached, dropping page {}", next);
            return LoadOutcome::Discarded;
        }
        state.phase = Phase::Idle;

        match result {
            Ok(batch) if !batch.posts.is_empty() => {
                let count = batch.posts.len();
                state.posts.extend(batch.posts);
                state.cursor.current = next;
                state.cursor.total_pages = batch.total_pages.max(next);
                state.has_more = next < batch.total_pages;
                LoadOutcome::Loaded(count)
            }
            Ok(_) => {
                state.has_more = false;
                LoadOutcome::Exhausted
            }
            Err(e) => {
                tracing::error!("Error loading more posts: {}", e);
                state.has_more = false;
                LoadOutcome::Failed
            }
        }
    }

    /// Stop accepting results; called when the hosting view goes away
    pub fn detach(&self) {
        self.lock().phase = Phase::Detached;
    }

    /// Copy of the accumulated posts, in arrival order
    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    /// Number of accumulated posts
    pub fn len(&self) -> usize {
        self.lock().posts.len()
    }

    /// Whether no posts have been accumulated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().phase == Phase::Loading
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn cursor(&self) -> PageCursor {
        self.lock().cursor
    }
}

/// Returns a feed to `Idle` if a `load_more` future is dropped mid-fetch
struct LoadingGuard<'a> {
    state: &'a Mutex<FeedState>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.phase == Phase::Loading {
            state.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::WordPressClient;
    use crate::testing::{sample_post, spawn_wordpress, FakeWordPress};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Serves pages out of a fixed list of posts
    #[derive(Default)]
    struct MemoryLoader {
        posts: Vec<Post>,
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl MemoryLoader {
        fn with_posts(count: u64) -> Self {
            Self {
                posts: (1..=count).map(sample_post).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageLoader for MemoryLoader {
        async fn load_page(&self, page: u32, per_page: u32) -> Result<PostBatch> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.gate {
                Some(gate) => gate.notified().await,
                None => tokio::task::yield_now().await,
            }
            if self.fail {
                anyhow::bail!("connection refused");
            }

            let per_page = per_page as usize;
            let total_pages = self.posts.len().div_ceil(per_page) as u32;
            let posts = self
                .posts
                .iter()
                .skip((page as usize - 1) * per_page)
                .take(per_page)
                .cloned()
                .collect();
            Ok(PostBatch { posts, total_pages })
        }
    }

    fn seeded(loader: Arc<MemoryLoader>, per_page: u32) -> PostFeed<Arc<MemoryLoader>> {
        let first: Vec<Post> = loader.posts.iter().take(per_page as usize).cloned().collect();
        let total = loader.posts.len().div_ceil(per_page as usize) as u32;
        PostFeed::new(loader, first, total, per_page)
    }

    #[tokio::test]
    async fn test_appends_pages_in_order() {
        let loader = Arc::new(MemoryLoader::with_posts(20));
        let feed = seeded(loader.clone(), 9);
        assert!(feed.has_more());
        assert_eq!(feed.len(), 9);

        assert_eq!(feed.load_more().await, LoadOutcome::Loaded(9));
        assert_eq!(feed.cursor().current, 2);
        assert!(feed.has_more());

        assert_eq!(feed.load_more().await, LoadOutcome::Loaded(2));
        assert_eq!(feed.cursor().current, 3);
        assert!(!feed.has_more());

        let ids: Vec<u64> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
        assert_eq!(loader.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_calls_fetch_once() {
        let loader = Arc::new(MemoryLoader::with_posts(20));
        let feed = seeded(loader.clone(), 9);

        let (first, second) = tokio::join!(feed.load_more(), feed.load_more());
        assert_eq!(first, LoadOutcome::Loaded(9));
        assert_eq!(second, LoadOutcome::Skipped);
        assert_eq!(loader.calls(), 1);
        assert_eq!(feed.len(), 18);
    }

    #[tokio::test]
    async fn test_last_page_makes_no_call() {
        let loader = Arc::new(MemoryLoader::with_posts(5));
        let feed = seeded(loader.clone(), 9);
        assert_eq!(feed.cursor().total_pages, 1);
        assert!(!feed.has_more());

        assert_eq!(feed.load_more().await, LoadOutcome::Skipped);
        assert_eq!(loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let loader = Arc::new(MemoryLoader::with_posts(4));
        let feed = PostFeed::new(loader.clone(), vec![sample_post(3)], 2, 2);

        assert_eq!(feed.load_more().await, LoadOutcome::Loaded(2));
        let ids: Vec<u64> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_page_is_terminal() {
        let loader = Arc::new(MemoryLoader::with_posts(3));
        // Server claimed more pages than it has
        let feed = PostFeed::new(loader.clone(), Vec::new(), 5, 3);

        assert_eq!(feed.load_more().await, LoadOutcome::Exhausted);
        assert!(!feed.has_more());
        assert_eq!(feed.load_more().await, LoadOutcome::Skipped);
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_terminal() {
        let loader = Arc::new(MemoryLoader {
            fail: true,
            ..MemoryLoader::with_posts(20)
        });
        let feed = seeded(loader.clone(), 9);

        assert_eq!(feed.load_more().await, LoadOutcome::Failed);
        assert!(!feed.has_more());
        assert_eq!(feed.phase(), Phase::Idle);
        assert_eq!(feed.len(), 9);
        assert_eq!(feed.load_more().await, LoadOutcome::Skipped);
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_detach_discards_in_flight_result() {
        let gate = Arc::new(Notify::new());
        let loader = Arc::new(MemoryLoader {
            gate: Some(gate.clone()),
            ..MemoryLoader::with_posts(20)
        });
        let feed = seeded(loader.clone(), 9);

        let teardown = async {
            feed.detach();
            gate.notify_one();
        };
        let (outcome, _) = tokio::join!(feed.load_more(), teardown);

        assert_eq!(outcome, LoadOutcome::Discarded);
        assert_eq!(feed.len(), 9);
        assert_eq!(feed.phase(), Phase::Detached);
        assert_eq!(feed.load_more().await, LoadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_dropped_call_releases_loading() {
        let loader = Arc::new(MemoryLoader {
            gate: Some(Arc::new(Notify::new())),
            ..MemoryLoader::with_posts(20)
        });
        let feed = seeded(loader.clone(), 9);

        let timed_out = tokio::time::timeout(Duration::from_millis(10), feed.load_more()).await;
        assert!(timed_out.is_err());
        assert!(!feed.is_loading());
        assert_eq!(feed.phase(), Phase::Idle);
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn test_pages_through_wordpress() {
        let base = spawn_wordpress(FakeWordPress::with_posts(20)).await;
        let client: Arc<dyn ContentSource> = Arc::new(
            WordPressClient::with_options(
                &format!("{}/wp-json/wp/v2", base),
                Duration::from_secs(5),
                Duration::ZERO,
            )
            .unwrap(),
        );

        let first = client.fetch_posts(1, 9).await;
        let feed = PostFeed::from_batch(client, first, 9);
        while feed.load_more().await != LoadOutcome::Skipped {}

        assert_eq!(feed.len(), 20);
        assert_eq!(feed.cursor().current, 3);
    }
}
