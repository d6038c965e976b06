//! Turning request descriptors into wire requests and responses into values

pub mod descriptor;
pub mod factory;
pub mod handler;
pub mod path;

pub use descriptor::RequestDescriptor;
pub use factory::RequestFactory;
pub use handler::{
    decode_server_error, EmptyResponseHandler, ETagJsonResponseHandler, HandlerResult,
    JsonResponseHandler, ResponseHandler,
};
pub use path::PathTemplate;
