/// A value that is loaded asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Deferred<T> {
    #[default]
    NotStarted,
    InProgress,
    Resolved(T),
}

impl<T> Deferred<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl<T, E> Deferred<Result<T, E>> {
    /// The successful value, if the load finished and succeeded.
    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Resolved(Ok(value)) => Some(value),
            _ => None,
        }
    }
}
