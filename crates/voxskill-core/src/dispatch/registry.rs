//! Ordered handler registry with first-match dispatch.

use super::handler::{DynRequestHandler, RequestHandler, RequestHandlerDyn};
use super::input::HandlerInput;

/// Handlers in registration order. Exactly one handles each request:
/// the first whose predicate accepts it.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<DynRequestHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it is consulted after every earlier registration.
    pub fn register<H: RequestHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    /// The first handler whose predicate accepts `input`.
    pub fn find(&self, input: &HandlerInput) -> Option<&dyn RequestHandlerDyn> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(input))
            .map(|handler| handler.as_ref())
    }

    /// Handler names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
