use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::info;

use tabula::prefs::StartPageConfig;
use tabula::runtime::app::{AppEvent, AppModel};
use tabula::runtime::storage::{Backend, FileBackend, MemoryBackend, Store};
use tabula::runtime::terminal::{TerminalSink, parse_command};
use tabula::runtime::weather::NoGeolocation;

#[derive(Parser)]
#[command(
    name = "tabula",
    about = "Start-page engine with a terminal front-end"
)]
struct Cli {
    /// Directory holding the persisted preference files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep all state in memory (nothing is written to disk)
    #[arg(long)]
    in_memory: bool,
}

fn main() {
    tabula::init_logger();
    let cli = Cli::parse();

    let backend: Box<dyn Backend> = if cli.in_memory {
        Box::new(MemoryBackend::new())
    } else {
        let dir = cli
            .data_dir
            .or_else(FileBackend::default_dir)
            .unwrap_or_else(|| PathBuf::from(".tabula"));
        info!("Persisting state under {:?}", dir);
        Box::new(FileBackend::new(dir))
    };

    let mut model = AppModel::new(
        StartPageConfig::default(),
        Store::new(backend),
        TerminalSink::new(),
        Arc::new(NoGeolocation),
    );

    let stdin_tx = model.event_sender();
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            match parse_command(&line) {
                Some(events) => {
                    let quit = events
                        .iter()
                        .any(|event| matches!(event, AppEvent::Quit));
                    for event in events {
                        if !stdin_tx.try_emit(event) {
                            return;
                        }
                    }
                    if quit {
                        return;
                    }
                }
                None => eprintln!("unrecognized command: {}", line),
            }
        }
        // stdin closed; shut the loop down too
        let _ = stdin_tx.try_emit(AppEvent::Quit);
    });

    let tick_tx = model.event_sender();
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_secs(1));
            if !tick_tx.try_emit(AppEvent::Tick) {
                break;
            }
        }
    });

    model.run();
}
