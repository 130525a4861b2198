use crate::error::{FloatTagsError, Result};
use crate::executor::{Schedule, SharedExecutor};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run one stage: apply `op` to every item under the executor's [`Schedule`].
///
/// - `Ordered`: items run one by one in list order; the first error stops the stage.
/// - `Concurrent`: every item is spawned at once; the stage waits for all of them
///   to settle and then returns the first error observed, if any.
///
/// Results come back in item order either way.
pub async fn run_stage<T, R, F, Fut>(executor: &SharedExecutor, items: Vec<T>, op: F) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(SharedExecutor, T) -> Fut,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    match executor.schedule() {
        Schedule::Ordered => {
            let mut results = Vec::with_capacity(items.len());
            for item in items {
                results.push(op(Arc::clone(executor), item).await?);
            }
            Ok(results)
        }
        Schedule::Concurrent => {
            let mut tasks = JoinSet::new();
            for (index, item) in items.into_iter().enumerate() {
                let operation = op(Arc::clone(executor), item);
                tasks.spawn(async move { (index, operation.await) });
            }

            let mut results = Vec::with_capacity(tasks.len());
            let mut first_error = None;
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, Ok(value))) => results.push((index, value)),
                    Ok((_, Err(e))) => {
                        first_error.get_or_insert(e);
                    }
                    Err(e) => {
                        first_error.get_or_insert(FloatTagsError::task(e.to_string()));
                    }
                }
            }

            if let Some(e) = first_error {
                return Err(e);
            }
            results.sort_by_key(|(index, _)| *index);
            Ok(results.into_iter().map(|(_, value)| value).collect())
        }
    }
}
