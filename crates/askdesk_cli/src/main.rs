use std::io;
use std::sync::{mpsc, Arc};

use askdesk::logging::init_logging;
use askdesk::{EnvConfig, RequestCoordinator};
use askdesk_cli::app::App;
use askdesk_cli::providers;
use askdesk_cli::render::{render_header, render_notice};
use askdesk_cli::runtime::{run_event_loop, spawn_input_reader, RuntimeController};

fn main() -> io::Result<()> {
    let config = EnvConfig::from_env().map_err(io::Error::other)?;
    if let Err(error) = init_logging(&config) {
        eprintln!("{}", render_notice(&format!("logging disabled: {error}")));
    }

    let service = providers::service_from_config(&config).map_err(io::Error::other)?;
    let profile = service.profile();
    let coordinator = Arc::new(RequestCoordinator::new(service));

    let mut stdout = io::stdout();
    println!("{}", render_header(&profile));

    let mut app = App::new(Arc::clone(&coordinator));
    if !config.skip_history {
        let restored = coordinator.load_initial();
        app.on_history_restored(&restored);
    }

    let (sender, receiver) = mpsc::channel();
    let mut host = RuntimeController::new(Arc::clone(&coordinator), sender.clone());
    let _input = spawn_input_reader(io::BufReader::new(io::stdin()), sender)?;

    run_event_loop(&mut app, &mut host, &receiver, &mut stdout)
}
