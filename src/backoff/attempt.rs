//! What a single attempt reports back to the engine.

/// The outcome of one invocation of the retried operation.
///
/// The engine never inspects the error itself: whether to keep going is
/// decided entirely by the variant.
///
/// The classic `(keep_trying, error)` pair converts into this type, so an
/// attempt closure may return either form:
///
/// ```rust
/// use decay::Attempt;
///
/// assert_eq!(Attempt::<&str>::from((true, None)), Attempt::Success);
/// assert_eq!(Attempt::from((true, Some("timeout"))), Attempt::Retry("timeout"));
/// assert_eq!(Attempt::from((false, Some("forbidden"))), Attempt::Stop(Some("forbidden")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<E> {
    /// The operation succeeded.
    Success,
    /// The operation failed and should be tried again after a backoff.
    Retry(E),
    /// The operation must not be retried. Carries the reason, if any.
    Stop(Option<E>),
}

impl<E> Attempt<E> {
    /// Build an outcome from a `(keep_trying, error)` pair.
    pub fn from_pair(keep_trying: bool, err: Option<E>) -> Self {
        match (keep_trying, err) {
            (true, None) => Self::Success,
            (true, Some(err)) => Self::Retry(err),
            (false, err) => Self::Stop(err),
        }
    }

    /// Returns true for [`Attempt::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the engine should back off and try again.
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }
}

impl<E> From<(bool, Option<E>)> for Attempt<E> {
    fn from((keep_trying, err): (bool, Option<E>)) -> Self {
        Self::from_pair(keep_trying, err)
    }
}

/// `Ok` is success, `Err` is always retried.
impl<E> From<Result<(), E>> for Attempt<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => Self::Retry(err),
        }
    }
}
