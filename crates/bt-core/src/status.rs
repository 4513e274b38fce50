//! Status returned by ticked tasks.

/// The result of ticking a task.
///
/// Every tick completes immediately: conditions evaluate on the spot and
/// actions execute atomically, so there is no `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The task completed successfully (condition met, action executed).
    Success,

    /// The task failed (condition not met, action could not be executed).
    Failure,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Inverts the status: Success becomes Failure and vice versa.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    #[inline]
    fn from(passed: bool) -> Self {
        if passed {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
