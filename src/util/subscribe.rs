/// Callback invoked to detach an observer registration.
///
/// Calling it after the registration has already been removed is a no-op.
pub type Unsubscribe = Box<dyn FnOnce() + Send + 'static>;
