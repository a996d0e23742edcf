use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use audit_core::{ScanRequest, SessionId, Timeline};
use audit_logging::{audit_debug, audit_info};
use tokio_util::sync::CancellationToken;

use crate::{ChannelProgressSink, EngineEvent, ScanSession, Transport};

enum EngineCommand {
    Start {
        session: SessionId,
        request: ScanRequest,
    },
    Cancel {
        session: SessionId,
    },
}

/// Runs scans on a background tokio runtime and reports [`EngineEvent`]s.
///
/// Starting a session cancels the one started before it, so at most one
/// session makes progress at a time.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(transport: Arc<dyn Transport>, timeline: Timeline) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let timeline = Arc::new(timeline);

        thread::spawn(move || {
            let mut current: Option<(SessionId, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { session, request } => {
                        if let Some((previous, token)) = current.take() {
                            audit_debug!("Session {} superseded by {}", previous, session);
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        current = Some((session, token.clone()));

                        let transport = transport.clone();
                        let timeline = timeline.clone();
                        let sink = ChannelProgressSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            let mut scan =
                                ScanSession::new(session, request).with_cancel_token(token);
                            let _ = scan.run(transport.as_ref(), &timeline, &sink).await;
                        });
                    }
                    EngineCommand::Cancel { session } => {
                        if let Some((active, token)) = &current {
                            if *active == session {
                                audit_info!("Cancelling session {}", session);
                                token.cancel();
                            }
                        }
                    }
                }
            }
            // Handle dropped: abandon whatever is still running.
            if let Some((_, token)) = current {
                token.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, session: SessionId, request: ScanRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Start { session, request });
    }

    pub fn cancel(&self, session: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { session });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// `Disconnected` means the engine thread is gone and no event will ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}
