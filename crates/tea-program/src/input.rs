//! The dedicated input-reader thread: owns stdin exclusively and repeatedly
//! decodes one key event at a time, pushing each onto the message queue.
//! EOF on stdin is reported upstream as a quit signal, per §4.3's failure
//! contract.

use std::time::Duration;

use tea_model::{KeyMsg, Message};

use crate::queue::Tx;

pub fn spawn(tx: Tx, esc_timeout: Duration) -> std::thread::JoinHandle<()> {
    std::thread::Builder::new()
        .name("tea-input-reader".into())
        .spawn(move || run(tx, esc_timeout))
        .expect("failed to spawn input reader thread")
}

fn run(tx: Tx, esc_timeout: Duration) {
    let mut source = tea_keys::StdinSource::default();
    loop {
        match tea_keys::read_key(&mut source, esc_timeout) {
            Ok(Some(key)) => {
                let msg = Message::Key(KeyMsg {
                    key: key.key,
                    runes: key.runes,
                    alt: key.alt,
                });
                if !tx.blocking_send_key(msg) {
                    return;
                }
            }
            Ok(None) => {
                tracing::debug!(target: "tea::program", "stdin reached EOF, quitting");
                tx.blocking_send_key(Message::Quit);
                return;
            }
            Err(err) => {
                tracing::warn!(target: "tea::program", %err, "stdin read failed, quitting");
                tx.blocking_send_key(Message::Quit);
                return;
            }
        }
    }
}
