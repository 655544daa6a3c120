//! Deferred work items handed to the UI thread.

use std::fmt;
use std::sync::Arc;

/// Boxed work with no target view.
pub type PlainWork = Box<dyn FnOnce() + Send + 'static>;

/// Boxed work that receives the view it was queued against.
pub type ViewWork<V> = Box<dyn FnOnce(Arc<V>) + Send + 'static>;

/// A unit of work waiting to run on the UI thread.
///
/// A `View` task holds a strong reference to its target, so the view
/// outlives the task even when every other handle has been released.
/// It may still have been closed in the meantime; the work itself is
/// responsible for checking that.
pub enum Task<V> {
    /// Work with no view affinity
    Plain(PlainWork),
    /// Work targeted at a specific browser view
    View { view: Arc<V>, work: ViewWork<V> },
}

impl<V> Task<V> {
    /// Wrap a plain closure.
    pub fn plain<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::Plain(Box::new(work))
    }

    /// Wrap a closure bound to `view`.
    pub fn for_view<F>(view: Arc<V>, work: F) -> Self
    where
        F: FnOnce(Arc<V>) + Send + 'static,
    {
        Self::View {
            view,
            work: Box::new(work),
        }
    }

    /// Whether this task targets a view.
    pub fn has_view(&self) -> bool {
        matches!(self, Self::View { .. })
    }

    /// Consume the task and run it on the current thread.
    pub fn run(self) {
        match self {
            Self::Plain(work) => work(),
            Self::View { view, work } => work(view),
        }
    }
}

impl<V> fmt::Debug for Task<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => write!(f, "Task::Plain"),
            Self::View { view, .. } => {
                write!(f, "Task::View(refs={})", Arc::strong_count(view))
            }
        }
    }
}
