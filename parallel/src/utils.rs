//! Thread pool helpers.

use crate::Error;
use rayon::{ThreadPool as RThreadPool, ThreadPoolBuilder};
use std::{any::Any, sync::Arc};

/// A clone-able wrapper around a [rayon] thread pool.
pub type ThreadPool = Arc<RThreadPool>;

/// Creates a clone-able [rayon] thread pool with `concurrency` worker threads.
///
/// The caller owns the returned pool: [crate::Parallel] only borrows it for the duration of
/// each terminal operation and never shuts it down.
///
/// # Arguments
/// - `concurrency`: The number of batches to execute concurrently in the pool.
///
/// # Returns
/// A `Result` containing the configured pool, [Error::InvalidArgument] if `concurrency` is
/// zero, or [Error::PoolBuildFailed] if the pool cannot be built.
pub fn create_pool(concurrency: usize) -> Result<ThreadPool, Error> {
    if concurrency == 0 {
        return Err(Error::InvalidArgument("concurrency must be at least 1"));
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .thread_name(|index| format!("fastseq-{index}"))
        .build()?;

    Ok(Arc::new(pool))
}

/// Extract the message from a panic payload.
pub(crate) fn extract_panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        format!("{err:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::catch_unwind;

    #[test]
    fn test_create_pool() {
        let pool = create_pool(3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);
        let name = pool.install(|| std::thread::current().name().map(str::to_string));
        assert!(name.unwrap().starts_with("fastseq-"));

        assert!(matches!(create_pool(0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_extract_panic_message() {
        let err = catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(extract_panic_message(&*err), "static message");

        let code = 7;
        let err = catch_unwind(|| panic!("formatted {code}")).unwrap_err();
        assert_eq!(extract_panic_message(&*err), "formatted 7");

        let err = catch_unwind(|| std::panic::panic_any(42u32)).unwrap_err();
        assert_eq!(extract_panic_message(&*err), "Any { .. }");
    }
}
