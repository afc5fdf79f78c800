//! Handler and interceptor traits.
//!
//! Request handlers and request interceptors do I/O, so their async methods
//! use RPITIT and get an object-safe `*Dyn` twin via a blanket impl (the
//! registry stores them type-erased). Exception handlers and response
//! interceptors are synchronous and are stored as plain trait objects.

use std::future::Future;
use std::pin::Pin;

use voxskill_types::error::SkillError;
use voxskill_types::response::Response;

use super::input::HandlerInput;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A (predicate, action) pair in the handler registry.
pub trait RequestHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this handler serves the current request.
    fn can_handle(&self, input: &HandlerInput) -> bool;

    /// Produce the response for the current request.
    fn handle(
        &self,
        input: &mut HandlerInput,
    ) -> impl Future<Output = Result<Response, SkillError>> + Send;
}

/// Object-safe version of [`RequestHandler`] with a boxed future.
pub trait RequestHandlerDyn: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput) -> bool;

    fn handle_boxed<'a>(
        &'a self,
        input: &'a mut HandlerInput,
    ) -> BoxFuture<'a, Result<Response, SkillError>>;
}

impl<T: RequestHandler> RequestHandlerDyn for T {
    fn name(&self) -> &'static str {
        RequestHandler::name(self)
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        RequestHandler::can_handle(self, input)
    }

    fn handle_boxed<'a>(
        &'a self,
        input: &'a mut HandlerInput,
    ) -> BoxFuture<'a, Result<Response, SkillError>> {
        Box::pin(self.handle(input))
    }
}

pub type DynRequestHandler = Box<dyn RequestHandlerDyn>;

/// Runs before dispatch and may populate request attributes.
pub trait RequestInterceptor: Send + Sync {
    fn process(
        &self,
        input: &mut HandlerInput,
    ) -> impl Future<Output = Result<(), SkillError>> + Send;
}

/// Object-safe version of [`RequestInterceptor`].
pub trait RequestInterceptorDyn: Send + Sync {
    fn process_boxed<'a>(&'a self, input: &'a mut HandlerInput)
    -> BoxFuture<'a, Result<(), SkillError>>;
}

impl<T: RequestInterceptor> RequestInterceptorDyn for T {
    fn process_boxed<'a>(
        &'a self,
        input: &'a mut HandlerInput,
    ) -> BoxFuture<'a, Result<(), SkillError>> {
        Box::pin(self.process(input))
    }
}

pub type DynRequestInterceptor = Box<dyn RequestInterceptorDyn>;

/// Runs after a response was produced (by a handler or an exception handler).
pub trait ResponseInterceptor: Send + Sync {
    fn process(&self, input: &HandlerInput, response: &Response);
}

/// Turns a failed request into a response.
pub trait ExceptionHandler: Send + Sync {
    fn can_handle(&self, input: &HandlerInput, error: &SkillError) -> bool;

    fn handle(&self, input: &mut HandlerInput, error: &SkillError) -> Result<Response, SkillError>;
}
