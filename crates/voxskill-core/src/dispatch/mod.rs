//! Request dispatch building blocks.
//!
//! - `input` -- `HandlerInput`, the explicit per-request context
//! - `handler` -- handler, interceptor and exception handler traits
//! - `registry` -- `HandlerRegistry` with first-match dispatch

pub mod handler;
pub mod input;
pub mod registry;

pub use handler::{
    ExceptionHandler, RequestHandler, RequestHandlerDyn, RequestInterceptor, ResponseInterceptor,
};
pub use input::HandlerInput;
pub use registry::HandlerRegistry;
