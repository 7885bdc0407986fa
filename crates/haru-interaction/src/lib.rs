//! Text generation transports for haru.
//!
//! Two [`TextGenerator`](haru_core::generation::TextGenerator)
//! implementations (the hosted endpoint and the Gemini REST API), the
//! [`TransportChain`] that falls back from one to the next, and the prompt
//! and payload helpers around them.

pub mod gemini_api_transport;
pub mod prompt;
pub mod remote_endpoint_transport;
pub mod response;
pub mod transport_chain;

pub use gemini_api_transport::GeminiApiTransport;
pub use remote_endpoint_transport::RemoteEndpointTransport;
pub use transport_chain::TransportChain;
