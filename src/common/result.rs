use crate::common::error::TfvcError;

/// Result type used across the crate
///
/// # Examples
///
/// ```
/// use tfvc_scm::common::result::TfvcResult;
/// use tfvc_scm::common::error::TfvcError;
///
/// fn example_function() -> TfvcResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> TfvcResult<()> {
///     Err(TfvcError::internal_error("Something went wrong"))
/// }
/// ```
pub type TfvcResult<T> = Result<T, TfvcError>;

/// Conversion helpers from `Option` into [`TfvcResult`]
pub trait OptionExt<T> {
    /// Convert `None` into the given error
    ///
    /// # Examples
    ///
    /// ```
    /// use tfvc_scm::common::result::{TfvcResult, OptionExt};
    /// use tfvc_scm::common::error::TfvcError;
    ///
    /// let value: Option<String> = None;
    /// let result: TfvcResult<String> = value.ok_or_tfvc(
    ///     TfvcError::internal_error("Value not found")
    /// );
    /// assert!(result.is_err());
    /// ```
    fn ok_or_tfvc(self, error: TfvcError) -> TfvcResult<T>;

    /// Convert `None` into an internal error with the given message
    fn ok_or_internal_error(self, message: impl Into<String>) -> TfvcResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_tfvc(self, error: TfvcError) -> TfvcResult<T> {
        self.ok_or(error)
    }

    fn ok_or_internal_error(self, message: impl Into<String>) -> TfvcResult<T> {
        self.ok_or_else(|| TfvcError::internal_error(message))
    }
}
