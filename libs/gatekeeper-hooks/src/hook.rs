/// A hook observing (and possibly adjusting) operations of one argument and
/// result shape.
///
/// `A` is the operation's argument bundle, `R` its successful result.
pub trait OperationHook<A, R>: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the hook takes part in `operation`.
    fn should_run(&self, operation: &str) -> bool;

    /// Runs before the operation. May adjust the arguments.
    ///
    /// # Errors
    /// A failure is handled according to the dispatcher's failure policy.
    fn before(&self, _operation: &str, _args: &mut A) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after the operation succeeded. May adjust the result.
    ///
    /// # Errors
    /// A failure is handled according to the dispatcher's failure policy.
    fn after(&self, _operation: &str, _result: &mut R, _args: &A) -> anyhow::Result<()> {
        Ok(())
    }
}
