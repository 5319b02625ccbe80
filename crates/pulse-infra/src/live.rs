//! Turning watch channels into live-query streams.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;

use pulse_core::SourceError;
use pulse_core::ports::LiveQuery;

/// Project the current value of `rx`, then every later change, until the sender is dropped.
pub fn watch_stream<S, T, F>(rx: watch::Receiver<S>, project: F) -> BoxStream<'static, T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(&S) -> T + Send + Sync + 'static,
{
    watch_until(rx, project, |_| false)
}

/// Like [`watch_stream`], but the stream closes right after the first error.
pub fn watch_query<S, T, F>(rx: watch::Receiver<S>, project: F) -> LiveQuery<T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(&S) -> Result<T, SourceError> + Send + Sync + 'static,
{
    watch_until(rx, project, Result::is_err)
}

fn watch_until<S, T, F>(
    rx: watch::Receiver<S>,
    project: F,
    is_last: fn(&T) -> bool,
) -> BoxStream<'static, T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(&S) -> T + Send + Sync + 'static,
{
    let project = Arc::new(project);
    futures::stream::unfold(Some((rx, true)), move |state| {
        let project = project.clone();
        async move {
            let (mut rx, first) = state?;
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let item = {
                let current = rx.borrow_and_update();
                project(&*current)
            };
            let next = (!is_last(&item)).then_some((rx, false));
            Some((item, next))
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emits_current_then_changes() {
        let (tx, rx) = watch::channel(1);
        let mut stream = watch_stream(rx, |v: &i32| *v * 10);

        assert_eq!(stream.next().await, Some(10));
        tx.send_replace(2);
        assert_eq!(stream.next().await, Some(20));
        drop(tx);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_query_closes_after_error() {
        let (tx, rx) = watch::channel(Ok::<i32, SourceError>(1));
        let mut stream = watch_query(rx, |v: &Result<i32, SourceError>| v.clone());

        assert_eq!(stream.next().await, Some(Ok(1)));
        tx.send_replace(Err(SourceError::remote("permission denied")));
        assert_eq!(
            stream.next().await,
            Some(Err(SourceError::remote("permission denied")))
        );
        tx.send_replace(Ok(2));
        assert_eq!(stream.next().await, None);
    }
}
