use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use rowpost_core::{update, AppState, Msg};
use rowpost_engine::{LogMessage, MemoryLog, Processor, ReqwestClient};
use rowpost_logging::{rowpost_info, rowpost_warn};

use super::effects::EffectRunner;
use super::ui::input::{parse_command, Command};
use super::ui::render::{render_log_lines, render_view};
use super::{config, files, logging, Args};

const TICK: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

enum ShellEvent {
    Msg(Msg),
    Input(String),
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(&args);

    let config = config::load(&args.config)?;
    let profile = config.select(args.profile.as_deref())?;
    let input_dir = args
        .dir
        .clone()
        .or_else(|| profile.input_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("rowpost-worker")
        .build()
        .context("cannot start async runtime")?;
    let client = ReqwestClient::new(&profile.client_settings())
        .context("cannot build HTTP client")?;
    let log = Arc::new(MemoryLog::new());
    let processor = Processor::new(
        profile.run_settings(),
        Arc::new(client),
        log.clone(),
        runtime.handle().clone(),
    );
    let mut runner = EffectRunner::new(runtime, processor);

    let (event_tx, event_rx) = mpsc::channel::<ShellEvent>();
    spawn_input_thread(event_tx.clone());
    spawn_ticker(event_tx.clone());
    let interrupt_tx = event_tx;
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(ShellEvent::Msg(Msg::Interrupted));
    })
    .context("cannot install Ctrl-C handler")?;

    rowpost_info!("Shell started; input directory {:?}", input_dir);
    let mut stdout = io::stdout();
    let mut state = AppState::new();
    let mut files = refresh_files(&input_dir);
    let mut printed = 0usize;
    render_view(&mut stdout, &state.view(), &files)?;

    while let Ok(event) = event_rx.recv() {
        let mut inbox = match event {
            ShellEvent::Msg(msg) => vec![msg],
            ShellEvent::Input(line) => match parse_command(&line, &files) {
                Command::Dispatch(msg) => vec![msg],
                Command::RefreshFiles => {
                    files = refresh_files(&input_dir);
                    render_view(&mut stdout, &state.view(), &files)?;
                    Vec::new()
                }
                Command::Unknown(text) => {
                    log.add(LogMessage::info(format!("Unknown command {text:?}")));
                    Vec::new()
                }
            },
        };
        if let Some(msg) = runner.poll() {
            inbox.push(msg);
        }

        while !inbox.is_empty() {
            for msg in std::mem::take(&mut inbox) {
                let (next, effects) = update(state, msg);
                state = next;
                inbox.extend(runner.apply(effects));
            }
        }

        if log.has_new() {
            let lines = log.since(printed);
            printed += lines.len();
            render_log_lines(&mut stdout, &lines)?;
        }
        if state.consume_dirty() && !state.is_quitting() {
            render_view(&mut stdout, &state.view(), &files)?;
        }
        if state.is_quitting() {
            break;
        }
    }

    runner.shutdown(SHUTDOWN_GRACE);
    let rest = log.since(printed);
    render_log_lines(&mut stdout, &rest)?;
    rowpost_info!("Shell stopped");
    Ok(())
}

fn refresh_files(dir: &std::path::Path) -> Vec<PathBuf> {
    match files::list_input_files(dir) {
        Ok(files) => files,
        Err(err) => {
            rowpost_warn!("Cannot list {:?}: {}", dir, err);
            Vec::new()
        }
    }
}

fn spawn_input_thread(tx: mpsc::Sender<ShellEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(ShellEvent::Input(line)).is_err() {
                return;
            }
        }
        // End of input behaves like quitting.
        let _ = tx.send(ShellEvent::Msg(Msg::QuitRequested));
    });
}

fn spawn_ticker(tx: mpsc::Sender<ShellEvent>) {
    // Background tick to poll the log and the run's cancel token.
    thread::spawn(move || {
        while tx.send(ShellEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK);
        }
    });
}
