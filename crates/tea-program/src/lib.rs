//! The event loop: owns raw-mode terminal state, dispatches
//! keyboard/resize/user messages, executes commands, and enforces a strict
//! update → view → render cycle.
//!
//! Scheduling is mixed: the main loop is single-threaded and cooperative
//! over the message queue (`tea_program::queue`) — every `update`/`view`
//! call happens there, never concurrently — while a dedicated input-reader
//! thread and a pool of command tasks post into the same queue from the
//! side. The queue is `tokio::sync::mpsc`, the reader is a blocking OS
//! thread bridged with a blocking send, and commands run as tasks on the
//! caller's tokio runtime, mirroring the teacher's event/input crates.

mod error;
mod input;
mod queue;

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

pub use error::Error;
pub use tea_config::Config;
use tea_model::{Command, Message, Model, WindowSizeMsg};
use tea_render::Renderer;

/// `Program(model, alt_screen)` — the public factory. Construct, optionally
/// adjust with [`Program::config`], then consume with [`Program::run`].
pub struct Program<M: Model> {
    model: M,
    config: Config,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            config: Config::default(),
        }
    }

    /// Convenience constructor matching the spec's `Program(model,
    /// alt_screen)` factory signature.
    pub fn with_alt_screen(model: M, alt_screen: bool) -> Self {
        Self::new(model).config(Config::default().alt_screen(alt_screen))
    }

    /// Overrides the default tunables (ESC timeout, alt-screen policy,
    /// channel capacity) with a fully assembled [`Config`].
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Runs the program to completion: enters raw mode (and, per config,
    /// the alternate screen), drives the update/view/render cycle until a
    /// `QuitMsg`, then restores the terminal on every exit path — including
    /// a model panic — and returns the final model.
    pub async fn run(self) -> Result<M, Error> {
        let alt_screen = self.config.alt_screen;
        let mut guard = tea_terminal::enter(alt_screen).map_err(Error::TerminalUnavailable)?;
        tracing::info!(target: "tea::program", alt_screen, "enter");

        let result = self.run_inner().await;

        tracing::info!(target: "tea::program", ok = result.is_ok(), "shutdown");
        guard.restore().map_err(Error::TerminalUnavailable)?;

        result
    }

    async fn run_inner(mut self) -> Result<M, Error> {
        let (tx, mut rx) = queue::channel(self.config.channel_capacity);

        let (cols, rows) = tea_terminal::size().map_err(Error::TerminalUnavailable)?;
        let mut renderer = Renderer::new(io::stdout(), cols, rows);
        renderer.reset().map_err(Error::IoFailure)?;

        let resize_tx = tx.clone();
        let resize_listener = tea_terminal::listen_for_resize(move |cols, rows| {
            resize_tx.try_send_lossy(Message::WindowSize(WindowSizeMsg {
                width: cols,
                height: rows,
            }));
        });

        let input_handle = input::spawn(tx.clone(), self.config.esc_timeout);

        tx.try_send_lossy(Message::WindowSize(WindowSizeMsg {
            width: cols,
            height: rows,
        }));

        let init_cmd = call_guarded(|| self.model.init(), "init")?;
        dispatch(init_cmd, tx.clone());

        let outcome = drive(self.model, &mut rx, &tx, &mut renderer).await;

        rx.close();
        if let Ok(listener) = resize_listener {
            listener.stop();
        }
        // The reader thread blocks on stdin; it is abandoned rather than
        // joined, per §5's cancellation policy for exiting helpers.
        drop(input_handle);

        outcome
    }
}

/// The cooperative core: dequeue, update, dispatch, view, render. Kept free
/// of terminal-entry concerns so it can be driven directly in tests against
/// an in-memory renderer.
async fn drive<M: Model, W: Write>(
    mut model: M,
    rx: &mut queue::Rx,
    tx: &queue::Tx,
    renderer: &mut Renderer<W>,
) -> Result<M, Error> {
    loop {
        let Some(msg) = rx.recv().await else {
            break;
        };
        if matches!(msg, Message::Quit) {
            break;
        }

        if let Message::WindowSize(ws) = &msg {
            renderer
                .resize(ws.width, ws.height)
                .map_err(Error::IoFailure)?;
        }

        let cmd = call_guarded(|| model.update(msg), "update")?;
        dispatch(cmd, tx.clone());

        let frame = call_guarded(|| model.view(), "view")?;
        renderer.render(&frame).map_err(Error::IoFailure)?;
    }
    Ok(model)
}

/// Runs `f`, converting a caught panic into `Error::ModelPanic { phase }`.
/// `update`/`view` are not required to be unwind-safe by the trait, so this
/// is the one place in the crate that asserts it — matching the teacher's
/// "scoped acquisition with a top-level recovery" strategy for guaranteed
/// teardown.
fn call_guarded<T>(f: impl FnOnce() -> T, phase: &'static str) -> Result<T, Error> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|_| Error::ModelPanic { phase })
}

/// Executes a command off the main path. `None` is a no-op; a single
/// function runs on a blocking task so it can do real work without
/// stalling the runtime; `Batch` dispatches each child independently so
/// messages arrive in completion order, not submission order. A command
/// that panics is converted into `Message::Err` rather than propagating —
/// `CommandFailure` never terminates the program.
fn dispatch(cmd: Command, tx: queue::Tx) {
    match cmd {
        Command::None => {}
        Command::Function(f) => {
            tokio::spawn(async move {
                let outcome = tokio::task::spawn_blocking(move || {
                    panic::catch_unwind(AssertUnwindSafe(f))
                })
                .await;
                let msg = match outcome {
                    Ok(Ok(msg)) => msg,
                    Ok(Err(_)) => Message::Err(anyhow::anyhow!("command panicked")),
                    Err(join_err) => {
                        Message::Err(anyhow::anyhow!("command task failed: {join_err}"))
                    }
                };
                tx.send(msg).await;
            });
        }
        Command::Batch(cmds) => {
            for c in cmds {
                dispatch(c, tx.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tea_model::{KeyMsg, quit_cmd};

    struct Counter(i32);

    impl Model for Counter {
        fn update(&mut self, msg: Message) -> Command {
            if let Message::Key(k) = &msg {
                match k.key.as_str() {
                    "up" => self.0 += 1,
                    "down" => self.0 -= 1,
                    "q" => return quit_cmd(),
                    _ => {}
                }
            }
            Command::None
        }

        fn view(&self) -> String {
            format!("Count: {}", self.0)
        }
    }

    fn key(name: &str) -> Message {
        Message::Key(KeyMsg {
            key: name.into(),
            runes: String::new(),
            alt: false,
        })
    }

    #[tokio::test]
    async fn counter_scenario_via_drive_loop() {
        let (tx, mut rx) = queue::channel(Some(16));
        for k in ["up", "up", "down", "q"] {
            tx.send(key(k)).await;
        }
        let model = Counter(0);
        let mut renderer = Renderer::new(Vec::new(), 80, 24);
        let out = drive(model, &mut rx, &tx, &mut renderer).await.unwrap();
        assert_eq!(out.0, 1);
    }

    #[tokio::test]
    async fn quit_message_stops_the_loop_immediately() {
        let (tx, mut rx) = queue::channel(Some(4));
        tx.send(Message::Quit).await;
        tx.send(key("up")).await; // must never be observed
        let model = Counter(0);
        let mut renderer = Renderer::new(Vec::new(), 80, 24);
        let out = drive(model, &mut rx, &tx, &mut renderer).await.unwrap();
        assert_eq!(out.0, 0);
    }

    /// A `Write` sink backed by shared storage, so a test can inspect what a
    /// `Renderer<SharedBuf>` wrote without reaching into the renderer's
    /// private fields.
    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn window_size_message_resets_renderer_for_full_rewrite() {
        let (tx, mut rx) = queue::channel(Some(16));
        let buf = SharedBuf::default();
        let mut renderer = Renderer::new(buf.clone(), 80, 24);
        renderer.render("Count: 0").unwrap();
        buf.0.lock().unwrap().clear();

        tx.send(Message::WindowSize(tea_model::WindowSizeMsg {
            width: 100,
            height: 30,
        }))
        .await;
        tx.send(key("q")).await;

        let model = Counter(0);
        let out = drive(model, &mut rx, &tx, &mut renderer).await.unwrap();
        assert_eq!(out.0, 0);
        assert_eq!(renderer.width(), 100);
        assert_eq!(renderer.height(), 30);
        let rewritten = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(rewritten.contains("Count: 0"));
    }

    #[tokio::test]
    async fn channel_closing_ends_the_loop_like_eof() {
        let (tx, mut rx) = queue::channel(Some(4));
        tx.send(key("up")).await;
        // Drop every sender so recv() returns None once the queued message
        // is drained, exactly like the input reader hitting stdin EOF.
        drop(tx);
        let model = Counter(0);
        let mut renderer = Renderer::new(Vec::new(), 80, 24);
        let dummy_tx = queue::channel(Some(1)).0;
        let out = drive(model, &mut rx, &dummy_tx, &mut renderer)
            .await
            .unwrap();
        assert_eq!(out.0, 1);
    }

    #[tokio::test]
    async fn model_panic_in_update_is_caught() {
        struct Panicky;
        impl Model for Panicky {
            fn update(&mut self, _msg: Message) -> Command {
                panic!("boom");
            }
            fn view(&self) -> String {
                String::new()
            }
        }
        let (tx, mut rx) = queue::channel(Some(4));
        tx.send(key("x")).await;
        let model = Panicky;
        let mut renderer = Renderer::new(Vec::new(), 80, 24);
        let err = drive(model, &mut rx, &tx, &mut renderer).await.unwrap_err();
        assert!(matches!(err, Error::ModelPanic { phase: "update" }));
    }
}
