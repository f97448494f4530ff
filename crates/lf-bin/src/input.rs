//! Terminal input task.
//!
//! A tokio task drains `crossterm::EventStream` and forwards the events the
//! worksheet cares about (keys, mouse, resize) into a bounded channel. The
//! event loop owns the receiving end; dropping it stops the task, as does
//! the shutdown handle.

use crossterm::event::{Event as CEvent, EventStream, KeyEvent, MouseEvent};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::{self, JoinHandle};
use tokio_stream::{Stream, StreamExt};
use tracing::{info, trace, warn};

pub const EVENT_CHANNEL_CAP: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

#[derive(Clone, Debug)]
pub struct InputShutdown {
    notify: Arc<Notify>,
}

impl InputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

pub fn spawn_input(sender: Sender<InputEvent>) -> (JoinHandle<()>, InputShutdown) {
    let notify = Arc::new(Notify::new());
    let shutdown = InputShutdown {
        notify: notify.clone(),
    };
    let handle = task::spawn(async move {
        InputTask::new(sender, EventStream::new(), notify).run().await;
    });
    (handle, shutdown)
}

struct InputTask<S> {
    sender: Sender<InputEvent>,
    stream: S,
    shutdown: Arc<Notify>,
}

impl<S> InputTask<S>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    fn new(sender: Sender<InputEvent>, stream: S, shutdown: Arc<Notify>) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input", "input_task_started");
        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.notified() => break ExitReason::ShutdownSignal,
                next = self.stream.next() => next,
            };
            let event = match next {
                None => break ExitReason::StreamEnded,
                Some(Err(e)) => {
                    warn!(target: "input", error = %e, "event_stream_error");
                    break ExitReason::StreamError;
                }
                Some(Ok(event)) => event,
            };
            let forwarded = match event {
                CEvent::Key(key) => InputEvent::Key(key),
                CEvent::Mouse(mouse) => InputEvent::Mouse(mouse),
                CEvent::Resize(w, h) => {
                    trace!(target: "input", w, h, "resize");
                    InputEvent::Resize(w, h)
                }
                _ => continue,
            };
            if self.sender.send(forwarded).await.is_err() {
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input", reason = reason.as_str(), "input_task_stopped");
    }
}
