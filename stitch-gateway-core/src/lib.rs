#![cfg_attr(feature = "failfast", allow(unreachable_code))]

macro_rules! failfast_debug {
    ($($tokens:tt)+) => {{
        tracing::debug!($($tokens)+);
        #[cfg(feature = "failfast")]
        panic!(
            "failfast triggered. \
            Please remove the feature failfast if you don't want to see these panics"
        );
    }};
}

macro_rules! failfast_error {
    ($($tokens:tt)+) => {{
        tracing::error!($($tokens)+);
        #[cfg(feature = "failfast")]
        panic!(
            "failfast triggered. \
            Please remove the feature failfast if you don't want to see these panics"
        );
    }};
}

mod context;
mod error;
mod execution;
mod json_ext;
mod request;
mod response;
mod service_registry;
mod spec;
pub mod test_utils;
mod traits;
mod transform;

pub use context::*;
pub use error::*;
pub use execution::*;
pub use json_ext::*;
pub use request::*;
pub use response::*;
pub use service_registry::*;
pub use spec::*;
pub use traits::*;
pub use transform::*;

pub mod prelude {
    // NOTE: only traits can be added here! Everything else should be scoped under the module
    //       graphql so the user can use, for example:
    //        -  graphql::Schema to get the overall schema
    //        -  graphql::Response to get a service response
    //        -  graphql::ResultNode to get a node of the stitched result tree
    //        -  ...
    pub use crate::traits::*;
    pub mod graphql {
        pub use crate::*;
    }
}

pub mod reexports {
    pub use serde_json_bytes;
}
