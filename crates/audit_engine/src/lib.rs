//! Audit engine: analysis-stream consumption and scan execution.
mod assembler;
mod consumer;
mod decode;
mod engine;
mod event;
mod framer;
mod session;
mod strategy;
mod transport;
mod types;

pub use assembler::{Disposition, ResultAssembler, PREMATURE_END};
pub use consumer::{Diagnostic, StreamConsumer};
pub use decode::ChunkDecoder;
pub use engine::EngineHandle;
pub use event::{parse_line, ParseFailure, StreamEvent};
pub use framer::LineFramer;
pub use session::{ChannelProgressSink, ProgressSink, ScanSession};
pub use strategy::ScanStrategy;
pub use transport::{
    ByteStream, ClientSettings, CredentialProvider, EnvCredential, ReqwestTransport,
    StaticCredential, Transport, DEFAULT_TOKEN_VAR,
};
pub use types::EngineEvent;
