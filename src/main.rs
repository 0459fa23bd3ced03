use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::{io, time::Duration};
use tokio::sync::mpsc;

use layerscope::api::{self, HttpBackend, ImageBackend};
use layerscope::app::App;
use layerscope::cli::{Cli, Commands};
use layerscope::config::{Config, LayerOrder};
use layerscope::efficiency;
use layerscope::error::Result;
use layerscope::fetch::{self, Task, TaskResult};
use layerscope::format::human_bytes;
use layerscope::{event, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger only if LAYERSCOPE_LOG environment variable is set
    if let Ok(log_file) = std::env::var("LAYERSCOPE_LOG") {
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&log_file)
                    .expect("Failed to open log file"),
            )))
            .filter_level(log::LevelFilter::Debug)
            .init();

        log::info!("Layerscope starting up");
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run {
        descending_layers: false,
        no_legend: false,
    }) {
        Commands::Run {
            descending_layers,
            no_legend,
        } => {
            let mut config = Config::default();
            if descending_layers {
                config.layer_order = LayerOrder::Descending;
            }
            config.show_legend = !no_legend;
            run_interactive(&cli.url, config).await
        }
        Commands::Score { json } => run_score(&cli.url, json).await,
        Commands::Layers {
            descending_layers,
            json,
        } => {
            let order = if descending_layers {
                LayerOrder::Descending
            } else {
                LayerOrder::Ascending
            };
            run_layers(&cli.url, order, json).await
        }
    }
}

async fn run_interactive(url: &str, config: Config) -> Result<()> {
    let backend = HttpBackend::new(url, config.request_timeout())?;

    // Initialize application state
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    // Setup async task channels
    let (task_sender, task_receiver) = mpsc::channel::<Task>(32);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(32);

    // Start background worker
    let worker_handle = tokio::spawn(fetch::run_worker(backend, task_receiver, result_sender));

    // Load initial data
    log::info!("📤 main: Sending initial load tasks");
    for task in [Task::LoadImageName, Task::LoadFilesystems] {
        if let Err(e) = task_sender.send(task).await {
            log::error!("📤 main: Failed to send initial task: {}", e);
            app.status_message = format!("Failed to reach backend: {}", e);
        }
    }

    // Main application loop
    let tick_rate = Duration::from_millis(250);
    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, &mut app))?;

        // Handle events with timeout
        if crossterm::event::poll(tick_rate)? {
            let terminal_event = crossterm::event::read()?;
            if let Err(e) = event::handle_event(terminal_event, &mut app, &task_sender) {
                app.status_message = format!("Error handling event: {}", e);
            }
        }

        // Handle async task results
        while let Ok(result) = result_receiver.try_recv() {
            log::debug!(
                "📨 main: Received async task result: {:?}",
                std::mem::discriminant(&result)
            );
            app.apply_task_result(result, &task_sender);
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Cleanup
    worker_handle.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Serialize)]
struct ScoreReport {
    image_name: String,
    score: u32,
    rating: &'static str,
    layer_count: usize,
    layer_bytes: u64,
    image_bytes: u64,
    anomalous: bool,
}

async fn run_score(url: &str, json: bool) -> Result<()> {
    let backend = HttpBackend::new(url, Config::default().request_timeout())?;
    let image_name = backend.fetch_name().await?;
    let filesystems = backend.fetch_filesystems().await?;
    let (image, layers) = api::partition_filesystems(filesystems)?;
    let score = efficiency::score(&layers, &image)?;
    let rating = efficiency::rating(score);

    if json {
        let report = ScoreReport {
            image_name,
            score,
            rating: rating.label(),
            layer_count: layers.len(),
            layer_bytes: layers.iter().map(|layer| layer.size).sum(),
            image_bytes: image.total_size,
            anomalous: efficiency::is_anomalous(score),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}: {}% ({})", image_name, score, rating.label());
        if efficiency::is_anomalous(score) {
            println!("warning: layers report more bytes than the merged image");
        }
    }

    Ok(())
}

async fn run_layers(url: &str, order: LayerOrder, json: bool) -> Result<()> {
    let backend = HttpBackend::new(url, Config::default().request_timeout())?;
    let filesystems = backend.fetch_filesystems().await?;
    let (_, mut layers) = api::partition_filesystems(filesystems)?;
    api::sort_layers(&mut layers, order);

    if json {
        println!("{}", serde_json::to_string_pretty(&layers)?);
    } else {
        for (index, layer) in layers.iter().enumerate() {
            println!(
                "{:>3}  {:>10}  {}",
                index + 1,
                human_bytes(layer.size),
                layer.command
            );
        }
    }

    Ok(())
}
