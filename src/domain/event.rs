/// Wraps a value that should be acted on at most once, such as a message
/// shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<T> {
    content: T,
    handled: bool,
}

impl<T> Event<T> {
    pub fn new(content: T) -> Self { Self { content, handled: false } }

    pub fn has_been_handled(&self) -> bool { self.handled }

    /// Returns the content the first time only.
    pub fn content_if_not_handled(&mut self) -> Option<&T> {
        if self.handled {
            None
        } else {
            self.handled = true;
            Some(&self.content)
        }
    }

    pub fn peek_content(&self) -> &T { &self.content }
}
