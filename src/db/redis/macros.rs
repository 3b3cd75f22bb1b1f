/// Returns a cached value for `$key`, or runs `$block`, caches its result in
/// the background for `$ttl` seconds and returns it.
///
/// `$cache` must provide `get_from_cache` and `set_in_background`; errors from
/// `$block` are propagated with `?` and never cached.
///
/// # Example
/// ```rust,ignore
/// let record = cached!(self.cache, key, LOOKUP_CACHE_TTL, async move {
///     fetch_from_api().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok::<_, $crate::error::AppError>(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok::<_, $crate::error::AppError>(value)
        }
    }};
}
