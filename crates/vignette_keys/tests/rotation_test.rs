use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vignette_error::{
    KeyError, KeyErrorKind, ProviderError, ProviderErrorKind, VignetteError, VignetteErrorKind,
};
use vignette_keys::{KeyPool, KeyStore, RetryPolicy, retry_with_rotation};
use vignette_storage::{KeyValueStore, MemoryStore};

fn rate_limit_error() -> ProviderError {
    ProviderError::new(ProviderErrorKind::Api {
        status: 429,
        message: "too many requests".to_string(),
    })
}

fn server_error() -> ProviderError {
    ProviderError::new(ProviderErrorKind::Api {
        status: 500,
        message: "internal".to_string(),
    })
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries_per_key: 2,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(8),
    }
}

fn assert_exhausted(err: VignetteError, expected_attempts: usize) {
    match err.kind() {
        VignetteErrorKind::Key(KeyError {
            kind: KeyErrorKind::Exhausted { attempts, .. },
            ..
        }) => assert_eq!(*attempts, expected_attempts),
        other => panic!("expected Exhausted, got {other}"),
    }
}

#[tokio::test]
async fn empty_pool_fails_before_invoking_operation() {
    let mut pool = KeyPool::default();
    let calls = AtomicUsize::new(0);
    let result: Result<(), _> = retry_with_rotation(&mut pool, &fast_policy(), |_key| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(server_error()) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn attempts_bounded_by_pool_size_times_retries_per_key() {
    let mut pool = KeyPool::new(vec!["a".into(), "b".into(), "c".into()]);
    let calls = AtomicUsize::new(0);
    let result: Result<(), _> = retry_with_rotation(&mut pool, &fast_policy(), |_key| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(server_error()) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_exhausted(result.unwrap_err(), 6);
}

#[tokio::test]
async fn first_success_returns_immediately() {
    let mut pool = KeyPool::new(vec!["a".into(), "b".into()]);
    let calls = AtomicUsize::new(0);
    let result = retry_with_rotation(&mut pool, &fast_policy(), |key| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 2 {
                Err(server_error())
            } else {
                Ok(key)
            }
        }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Attempts used keys a, b, a; the third attempt succeeded with "a".
    assert_eq!(result.unwrap(), "a");
}

#[tokio::test]
async fn cursor_rotates_across_separate_invocations() {
    let mut pool = KeyPool::new(vec!["a".into(), "b".into(), "c".into()]);
    let seen = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..4 {
        let seen = Arc::clone(&seen);
        let _ = retry_with_rotation(&mut pool, &fast_policy(), move |key| {
            seen.lock().unwrap().push(key);
            async { Ok::<_, ProviderError>(()) }
        })
        .await;
    }

    // Each invocation succeeds on its first attempt, consuming one key;
    // rotation continues across invocations instead of restarting at "a".
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c", "a"]);
}

#[tokio::test]
async fn replacing_the_pool_resets_the_cursor() {
    let mut pool = KeyPool::new(vec!["a".into(), "b".into()]);
    pool.next_key().unwrap();
    assert_eq!(pool.cursor(), 1);

    pool.replace(vec!["x".into(), "y".into()]);
    assert_eq!(pool.cursor(), 0);

    let first = retry_with_rotation(&mut pool, &fast_policy(), |key| async move {
        Ok::<_, ProviderError>(key)
    })
    .await
    .unwrap();
    assert_eq!(first, "x");
}

#[tokio::test(start_paused = true)]
async fn rate_limit_failures_back_off_before_retrying() {
    let mut pool = KeyPool::new(vec!["a".into()]);
    let policy = RetryPolicy {
        max_retries_per_key: 2,
        base_backoff: Duration::from_millis(500),
        max_backoff: Duration::from_secs(30),
    };

    let start = tokio::time::Instant::now();
    let result: Result<(), _> = retry_with_rotation(&mut pool, &policy, |_key| async {
        Err(rate_limit_error())
    })
    .await;

    assert!(result.is_err());
    // One backoff between the two attempts: at least base × 2^1 (one full
    // rotation of the single-key pool completed).
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn non_rate_limit_failures_retry_without_delay() {
    let mut pool = KeyPool::new(vec!["a".into(), "b".into()]);
    let start = tokio::time::Instant::now();
    let result: Result<(), _> = retry_with_rotation(&mut pool, &fast_policy(), |_key| async {
        Err(server_error())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn key_store_persists_and_reloads() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    {
        let mut store = KeyStore::open(Arc::clone(&storage)).await.unwrap();
        store.add_key("sk-alpha-0001").await.unwrap();
        store.add_key("sk-beta-0002").await.unwrap();
        store.set_secondary(Some("hf-gamma".to_string())).await.unwrap();
    }

    let reopened = KeyStore::open(storage).await.unwrap();
    assert_eq!(reopened.key_count().await, 2);
    assert_eq!(reopened.secondary(), Some("hf-gamma"));
    let pool = reopened.pool_handle();
    assert_eq!(pool.lock().await.next_key().unwrap(), "sk-alpha-0001");
}

#[tokio::test]
async fn key_store_survives_corrupt_record() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .store(vignette_keys::CREDENTIALS_KEY, "{not json")
        .await
        .unwrap();

    let store = KeyStore::open(storage).await.unwrap();
    assert_eq!(store.key_count().await, 0);
    assert!(store.secondary().is_none());
}

#[tokio::test]
async fn removing_a_key_shrinks_the_pool() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = KeyStore::open(storage).await.unwrap();
    store.add_key("one").await.unwrap();
    store.add_key("two").await.unwrap();

    assert!(store.remove_key("one").await.unwrap());
    assert!(!store.remove_key("one").await.unwrap());
    assert_eq!(store.key_count().await, 1);
}
