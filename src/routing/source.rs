//! Where the verb and path come from when the caller does not supply them.

/// Read access to the current request or invocation.
pub trait RequestSource {
    /// HTTP method, or an empty string when there is none.
    fn current_verb(&self) -> String;

    /// Request path (HTTP) or first positional argument (CLI).
    fn current_path(&self) -> String;

    /// True when running as a command-line invocation.
    fn is_cli(&self) -> bool;

    /// True once a response has started; HTTP resolution must not begin after that.
    fn headers_sent(&self) -> bool {
        false
    }
}
