//! HTTP event broadcasting

mod emitter;

pub use emitter::{EventsConfig, HttpEventEmitter};
