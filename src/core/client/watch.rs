//! Following one path across successive versions.

use futures::stream::{self, BoxStream, StreamExt};
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::core::client::{NextMaterialized, Tree};
use crate::core::error::Result;
use crate::core::path::{ConfigPath, RequestPath};

enum WatchState {
    Waiting(Tree),
    Done,
}

/// Stream of changes to the materialized data of one path.
///
/// Each item waits on the server for the next change after the one before
/// it. An error is yielded once and then the stream ends.
pub struct WatchMaterialized {
    path: RequestPath,
    inner: BoxStream<'static, Result<NextMaterialized>>,
}

impl WatchMaterialized {
    pub(crate) fn new(tree: Tree, path: RequestPath) -> Self {
        let watched = path.clone();
        let inner = stream::unfold(WatchState::Waiting(tree), move |state| {
            let path = watched.clone();
            async move {
                let tree = match state {
                    WatchState::Waiting(tree) => tree,
                    WatchState::Done => return None,
                };
                match tree.next_materialized(path.as_str()).await {
                    Ok(next) => {
                        let following = next.version.tree().clone();
                        Some((Ok(next), WatchState::Waiting(following)))
                    }
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "watch stopped");
                        Some((Err(e), WatchState::Done))
                    }
                }
            }
        })
        .boxed();

        WatchMaterialized { path, inner }
    }

    pub fn path(&self) -> &ConfigPath {
        self.path.config_path()
    }

    /// Wait for the next change. `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<Result<NextMaterialized>> {
        self.inner.next().await
    }
}

impl Stream for WatchMaterialized {
    type Item = Result<NextMaterialized>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl fmt::Debug for WatchMaterialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchMaterialized")
            .field("path", self.path())
            .finish_non_exhaustive()
    }
}
