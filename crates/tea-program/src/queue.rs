//! The message queue: multi-producer, single-consumer, and either bounded
//! or unbounded per `Config::channel_capacity`. Regardless of which, a
//! `KeyMsg` send from the input reader must never be dropped — it uses the
//! blocking send variant — while lower-priority producers (resize, command
//! results) use the fallible, non-blocking variant and accept loss under
//! back-pressure.

use tea_model::Message;
use tokio::sync::mpsc;

#[derive(Clone)]
pub enum Tx {
    Bounded(mpsc::Sender<Message>),
    Unbounded(mpsc::UnboundedSender<Message>),
}

impl Tx {
    /// Used by the input reader thread for `KeyMsg`: blocks rather than
    /// drops. Must be called off the async runtime (a real OS thread).
    pub fn blocking_send_key(&self, msg: Message) -> bool {
        match self {
            Tx::Bounded(tx) => tx.blocking_send(msg).is_ok(),
            Tx::Unbounded(tx) => tx.send(msg).is_ok(),
        }
    }

    /// Used by lower-priority producers (resize signal): never blocks,
    /// drops silently under back-pressure.
    pub fn try_send_lossy(&self, msg: Message) {
        match self {
            Tx::Bounded(tx) => {
                let _ = tx.try_send(msg);
            }
            Tx::Unbounded(tx) => {
                let _ = tx.send(msg);
            }
        }
    }

    /// Used by command results: async, awaits capacity rather than
    /// dropping a command's outcome.
    pub async fn send(&self, msg: Message) -> bool {
        match self {
            Tx::Bounded(tx) => tx.send(msg).await.is_ok(),
            Tx::Unbounded(tx) => tx.send(msg).is_ok(),
        }
    }
}

pub enum Rx {
    Bounded(mpsc::Receiver<Message>),
    Unbounded(mpsc::UnboundedReceiver<Message>),
}

impl Rx {
    pub async fn recv(&mut self) -> Option<Message> {
        match self {
            Rx::Bounded(rx) => rx.recv().await,
            Rx::Unbounded(rx) => rx.recv().await,
        }
    }

    pub fn close(&mut self) {
        match self {
            Rx::Bounded(rx) => rx.close(),
            Rx::Unbounded(rx) => rx.close(),
        }
    }
}

pub fn channel(capacity: Option<usize>) -> (Tx, Rx) {
    match capacity {
        Some(cap) => {
            let (tx, rx) = mpsc::channel(cap);
            (Tx::Bounded(tx), Rx::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (Tx::Unbounded(tx), Rx::Unbounded(rx))
        }
    }
}
