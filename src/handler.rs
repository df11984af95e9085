//! Handler trait and type erasure.
//!
//! The router stores handlers of different concrete types in one table, so
//! each is wrapped in an `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn list_cars(store, req) -> … { … }        ← written in api.rs
//!        ↓ with_state(&store, list_cars)
//! move |req| list_cars(Arc::clone(&store), req)    ← plain Fn(Request) -> Fut
//!        ↓ Handler blanket impl
//! Arc::new(FnHandler(closure))                     ← BoxedHandler
//!        ↓ handler.call(req) at request time
//! Box::pin(async { fut.await.into_response() })    ← BoxFuture
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// Sealed: only the blanket impl below satisfies it. Handlers that need
/// shared state get it through [`with_state`].
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Binds shared state to a handler taking `(Arc<S>, Request)`.
///
/// Each request gets its own `Arc` clone of the state, so the returned
/// closure is a plain `Fn(Request)` and satisfies [`Handler`].
pub fn with_state<S, F, Fut, R>(state: &Arc<S>, handler: F) -> impl Handler + use<S, F, Fut, R>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let state = Arc::clone(state);
    move |req: Request| handler(Arc::clone(&state), req)
}
