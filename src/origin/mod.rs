//! Origin service: the backend the gateway forwards `/api/core` to.

pub mod server;

pub use server::{OriginServer, TestResponse, TEST_MESSAGE, TEST_PATH};
