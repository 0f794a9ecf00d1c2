use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{error::Error, io};

use moments::app::App;
use moments::models::Page;
use moments::{config, input, logging, runtime, ui};

fn main() -> Result<(), Box<dyn Error>> {
    let mut app = App::new();

    let data_dir = config::default_data_dir();
    if let Err(e) = logging::init(&app.config.logging.level, &data_dir) {
        eprintln!("Logging disabled: {e}");
    }
    logging::install_panic_hook();
    log::info!("moments starting");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Keyboard enhancement flags may fail on unsupported terminals (e.g.,
    // Windows Legacy Console). Errors are ignored as they don't affect app
    // functionality.
    let _ = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    );

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    log::info!("moments exiting");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        runtime::tick(app);

        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(250))? {
            let event = event::read()?;

            if let Event::Mouse(mouse_event) = &event {
                match mouse_event.kind {
                    event::MouseEventKind::ScrollUp => scroll_up(app),
                    event::MouseEventKind::ScrollDown => scroll_down(app),
                    _ => {}
                }
            }

            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    input::handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn scroll_up(app: &mut App) {
    match app.page {
        Page::Status => app.todo_up(),
        Page::Repository => app.notes_up(),
        _ => {}
    }
}

fn scroll_down(app: &mut App) {
    match app.page {
        Page::Status => app.todo_down(),
        Page::Repository => app.notes_down(),
        _ => {}
    }
}
