use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use soliloquy_core::{update, AppState, AppViewModel, Effect, Msg, Phase};
use soliloquy_logging::{sq_error, sq_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::heading::{SplitHeading, HEADING};
use super::logging;
use super::page::ResultsPage;
use super::render::{render, Frame};
use crate::cli::Cli;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(args: Cli) -> anyhow::Result<ExitCode> {
    logging::initialize(args.log);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(results_page) = args.results_page {
        config.results_page = Some(results_page);
    }
    if args.no_animation {
        config.animate_heading = false;
    }
    sq_info!("Using recommendation endpoint {}", config.endpoint);

    let runner = EffectRunner::new(config.client_settings())?;
    let page = config.results_page.clone().map(ResultsPage::new);
    let state = AppState::with_settings(config.core_settings());

    match args.title {
        Some(title) => Session::new(state, runner, page, io::stdout(), false).run_once(title),
        None => Session::new(state, runner, page, io::stdout(), true)
            .run_interactive(config.animate_heading),
    }
}

/// Owns the state for one run and renders it to `out`.
struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    page: Option<ResultsPage>,
    out: W,
    prompt: bool,
    last_frame: Option<Frame>,
    last_query: Option<String>,
}

impl<W: Write> Session<W> {
    fn new(
        state: AppState,
        runner: EffectRunner,
        page: Option<ResultsPage>,
        out: W,
        prompt: bool,
    ) -> Self {
        Self {
            state,
            runner,
            page,
            out,
            prompt,
            last_frame: None,
            last_query: None,
        }
    }

    /// Submits `title`, waits for it to settle and exits non-zero on failure.
    fn run_once(mut self, title: String) -> anyhow::Result<ExitCode> {
        Ok(match self.settle(title)? {
            Phase::Failed => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        })
    }

    fn settle(&mut self, title: String) -> anyhow::Result<Phase> {
        self.dispatch(Msg::Submit(title));
        if self.state.phase() != Phase::Pending {
            anyhow::bail!("book title is empty");
        }
        self.flush_render()?;

        while self.state.phase() == Phase::Pending {
            if let Some(msg) = self.runner.poll(POLL_INTERVAL)? {
                self.dispatch(msg);
            }
        }
        self.flush_render()?;
        Ok(self.state.phase())
    }

    /// One title per stdin line until stdin closes and nothing is pending.
    fn run_interactive(mut self, animate: bool) -> anyhow::Result<ExitCode> {
        let mut animated = false;
        SplitHeading::new(HEADING, animate).reveal(&mut self.out, || {
            sq_info!("All letters have animated!");
            animated = true;
        })?;
        if animated {
            self.dispatch(Msg::HeadingAnimationComplete);
        }
        self.flush_render()?;

        self.event_loop(spawn_stdin_reader())?;
        Ok(ExitCode::SUCCESS)
    }

    /// Drains `msg_rx` in batches, rendering between the batch and each engine poll.
    fn event_loop(&mut self, msg_rx: mpsc::Receiver<Msg>) -> anyhow::Result<()> {
        let mut input_open = true;
        loop {
            let mut inbox = Vec::new();
            loop {
                match msg_rx.try_recv() {
                    Ok(msg) => inbox.push(msg),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        input_open = false;
                        break;
                    }
                }
            }
            for msg in inbox {
                self.dispatch(msg);
            }
            self.flush_render()?;

            if let Some(msg) = self.runner.poll(POLL_INTERVAL)? {
                self.dispatch(msg);
            }
            self.flush_render()?;

            if !input_open && self.state.phase() != Phase::Pending {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in &effects {
            if let Effect::SendRecommendation { title, .. } = effect {
                self.last_query = Some(title.clone());
            }
        }
        self.runner.enqueue(effects);
    }

    fn flush_render(&mut self) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let view = self.state.view();

        let frame = render(&view, self.prompt);
        if self.last_frame.as_ref() == Some(&frame) {
            return Ok(());
        }
        for line in &frame.lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last_frame = Some(frame);

        self.write_results_page(&view);
        Ok(())
    }

    fn write_results_page(&self, view: &AppViewModel) {
        let (Some(page), Some(linked)) = (&self.page, &view.linked_message) else {
            return;
        };
        let query = self.last_query.as_deref().unwrap_or_default();
        match page.write(query, linked) {
            Ok(path) => sq_info!("Wrote results page to {:?}", path),
            Err(err) => sq_error!("Failed to write results page: {}", err),
        }
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<Msg> {
    let (msg_tx, msg_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if msg_tx.send(Msg::InputChanged(line)).is_err()
                || msg_tx.send(Msg::SubmitClicked).is_err()
            {
                break;
            }
        }
    });
    msg_rx
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use soliloquy_core::GENERIC_ERROR;
    use soliloquy_engine::{
        EngineHandle, FailureKind, Recommendation, RecommendError, RecommendationClient,
    };

    use super::*;

    struct FixedClient(Result<Recommendation, RecommendError>);

    #[async_trait::async_trait]
    impl RecommendationClient for FixedClient {
        async fn recommend(&self, _title: &str) -> Result<Recommendation, RecommendError> {
            self.0.clone()
        }
    }

    /// Echoes the title after `delay`.
    struct EchoClient {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl RecommendationClient for EchoClient {
        async fn recommend(&self, title: &str) -> Result<Recommendation, RecommendError> {
            tokio::time::sleep(self.delay).await;
            Ok(Recommendation {
                message: Some(format!("echo {title}")),
            })
        }
    }

    fn echo_session(delay: Duration, page: Option<ResultsPage>) -> Session<Vec<u8>> {
        let engine = EngineHandle::with_client(Arc::new(EchoClient { delay }));
        Session::new(
            AppState::new(),
            EffectRunner::with_engine(engine),
            page,
            Vec::new(),
            true,
        )
    }

    fn send_line(msg_tx: &mpsc::Sender<Msg>, line: &str) {
        msg_tx.send(Msg::InputChanged(line.to_string())).unwrap();
        msg_tx.send(Msg::SubmitClicked).unwrap();
    }

    fn session(
        reply: Result<Recommendation, RecommendError>,
        page: Option<ResultsPage>,
    ) -> Session<Vec<u8>> {
        let engine = EngineHandle::with_client(Arc::new(FixedClient(reply)));
        Session::new(
            AppState::new(),
            EffectRunner::with_engine(engine),
            page,
            Vec::new(),
            false,
        )
    }

    #[test]
    fn settle_prints_loading_then_message() {
        let mut session = session(
            Ok(Recommendation {
                message: Some("Try: https://example.com/book".to_string()),
            }),
            None,
        );
        let phase = session.settle("Dune".to_string()).unwrap();
        assert_eq!(phase, Phase::Succeeded);

        let printed = String::from_utf8(session.out).unwrap();
        assert_eq!(printed, "Loading... Dune\nTry: https://example.com/book\n");
    }

    #[test]
    fn settle_fails_with_generic_error() {
        let mut session = session(
            Err(RecommendError {
                kind: FailureKind::HttpStatus(500),
                message: "internal".to_string(),
            }),
            None,
        );
        let phase = session.settle("Dune".to_string()).unwrap();
        assert_eq!(phase, Phase::Failed);

        let printed = String::from_utf8(session.out).unwrap();
        assert_eq!(printed, format!("Loading... Dune\n{GENERIC_ERROR}\n"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut session = session(Ok(Recommendation::default()), None);
        assert!(session.settle("   ".to_string()).is_err());
        assert!(session.out.is_empty());
    }

    #[test]
    fn success_writes_results_page() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("results.html");
        let mut session = session(
            Ok(Recommendation {
                message: Some("<i>x</i> https://example.com/book".to_string()),
            }),
            Some(ResultsPage::new(path.clone())),
        );

        let phase = session.settle("Dune".to_string()).unwrap();
        assert_eq!(phase, Phase::Succeeded);

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("&lt;i&gt;x&lt;/i&gt;"));
        assert!(html.contains(
            r#"<a href="https://example.com/book" target="_blank" rel="noopener noreferrer">https://example.com/book</a>"#
        ));
        assert!(html.contains("<title>Soliloquy: Dune</title>"));
        assert!(!html.contains(GENERIC_ERROR));
    }

    #[test]
    fn event_loop_shows_loading_before_the_result() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("results.html");
        let mut session = echo_session(Duration::ZERO, Some(ResultsPage::new(path.clone())));

        let (msg_tx, msg_rx) = mpsc::channel();
        send_line(&msg_tx, "Dune");
        drop(msg_tx);
        session.event_loop(msg_rx).unwrap();

        let printed = String::from_utf8(session.out).unwrap();
        let loading = printed.find("Loading... Dune").expect("loading frame");
        let result = printed.find("echo Dune").expect("result frame");
        assert!(loading < result);

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>Soliloquy: Dune</title>"));
    }

    #[test]
    fn event_loop_renders_only_the_latest_line_of_a_batch() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("results.html");
        let mut session = echo_session(Duration::ZERO, Some(ResultsPage::new(path.clone())));

        let (msg_tx, msg_rx) = mpsc::channel();
        send_line(&msg_tx, "Dune");
        send_line(&msg_tx, "Emma");
        drop(msg_tx);
        session.event_loop(msg_rx).unwrap();

        let printed = String::from_utf8(session.out).unwrap();
        assert!(printed.contains("echo Emma"));
        assert!(!printed.contains("echo Dune"));

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>Soliloquy: Emma</title>"));
    }

    #[test]
    fn event_loop_waits_for_pending_request_after_input_closes() {
        let mut session = echo_session(Duration::from_millis(200), None);

        let (msg_tx, msg_rx) = mpsc::channel();
        send_line(&msg_tx, "Dune");
        drop(msg_tx);
        session.event_loop(msg_rx).unwrap();

        assert_eq!(session.state.phase(), Phase::Succeeded);
        let printed = String::from_utf8(session.out).unwrap();
        assert!(printed.contains("echo Dune"));
    }
}
