use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tillsammans::app::{App, AppScreen};
use tillsammans::config::Config;
use tillsammans::event::{AppEvent, EventHandler};
use tillsammans::i18n::Locale;
use tillsammans::session::widgets::{Exercise, Feedback};
use tillsammans::speech::CommandNarrator;
use tillsammans::store::{JsonStore, ProgressStore};
use tillsammans::ui::components::completion::{CompletionView, NotFoundView};
use tillsammans::ui::components::lesson_list::LessonList;
use tillsammans::ui::components::lesson_view::LessonView;
use tillsammans::ui::components::menu::{MenuAction, MenuView};
use tillsammans::ui::components::progress_view::ProgressView;
use tillsammans::ui::components::support_popup::SupportPopup;
use tillsammans::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use tillsammans::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "tillsammans",
    version,
    about = "Digital skills lessons for the terminal, in five languages"
)]
struct Cli {
    #[arg(short, long, help = "Interface language (sv, en, ar, ti, fr)")]
    locale: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Open a lesson by id on start")]
    lesson: Option<String>,

    #[arg(long, help = "Directory for progress and preferences")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Clear saved progress and exit")]
    reset_progress: bool,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let store = match cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir)?,
        None => JsonStore::new()?,
    };
    init_logging(store.base_dir())?;

    if cli.reset_progress {
        ProgressStore::load(store).reset();
        println!("Progress cleared.");
        return Ok(());
    }

    let config_path = Config::default_path();
    let mut config = Config::load_from(&config_path)?;
    if let Some(code) = cli.locale {
        let locale: Locale = code.parse()?;
        config.locale = locale.code().to_string();
    }

    let narrator = Box::new(CommandNarrator::new(config.speech_command.clone()));
    let mut app = App::new(config, store, Some(config_path), narrator)?;
    if let Some(theme_name) = cli.theme {
        app.set_theme(&theme_name);
    }
    if let Some(id) = cli.lesson {
        app.open_lesson(&id);
    }
    info!(locale = %app.locale, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to a file next to the saved progress; the terminal belongs to the UI.
fn init_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join("tillsammans.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("TILLSAMMANS_LOG")
                .unwrap_or_else(|_| "tillsammans=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let narrating = app.is_narrating();
        terminal.draw(|frame| render(frame, app, narrating))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The popup swallows input until it is closed.
    if app.support_overlay.is_some() {
        match key.code {
            KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_support_dont_show(),
            KeyCode::Enter | KeyCode::Esc => app.close_support_overlay(),
            _ => {}
        }
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::LessonList => handle_lesson_list_key(app, key),
        AppScreen::Lesson => handle_lesson_key(app, key),
        AppScreen::LessonNotFound => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.go_to_lesson_list(),
            _ => {}
        },
        AppScreen::Completion => handle_completion_key(app, key),
        AppScreen::Progress => handle_progress_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Lessons => app.go_to_lesson_list(),
        MenuAction::Progress => app.go_to_progress(),
        MenuAction::Language => app.cycle_locale(),
        MenuAction::FontSize => app.cycle_font_size(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.go_to_lesson_list(),
        KeyCode::Char('2') => app.go_to_progress(),
        KeyCode::Char('l') | KeyCode::Char('L') => app.cycle_locale(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.increase_font_size(),
        KeyCode::Char('-') => app.decrease_font_size(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            run_menu_action(app, action);
        }
        _ => {}
    }
}

fn handle_lesson_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.lesson_list_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.lesson_list_next(),
        KeyCode::Enter => {
            app.open_selected_lesson();
        }
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    let composing = matches!(
        app.runner.as_ref().and_then(|r| r.exercise()),
        Some(Exercise::MessageComposer(_))
    );
    if composing {
        handle_composer_key(app, key, now);
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_to_lesson_list(),
        KeyCode::Left => app.lesson_prev(),
        KeyCode::Right => app.lesson_next(),
        KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_hint(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_narration(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.cycle_speech_rate(),
        _ => handle_choice_key(app, key, now),
    }
}

/// Letters go to the message field, so navigation moves off the letter keys.
fn handle_composer_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.go_to_lesson_list(),
        KeyCode::PageUp => app.lesson_prev(),
        KeyCode::PageDown => app.lesson_next(),
        KeyCode::F(1) => app.toggle_hint(),
        _ => {
            if let Some(Exercise::MessageComposer(composer)) =
                app.runner.as_mut().and_then(|r| r.exercise_mut())
            {
                composer.handle_key(key, now);
            }
        }
    }
}

fn handle_choice_key(app: &mut App, key: KeyEvent, now: Instant) {
    let Some(exercise) = app.runner.as_mut().and_then(|r| r.exercise_mut()) else {
        return;
    };

    let number = match key.code {
        KeyCode::Char(ch @ '1'..='4') => ch.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    };

    match exercise {
        Exercise::PhoneSimulator(phone) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => phone.cursor_mut().prev(),
            KeyCode::Down | KeyCode::Char('j') => phone.cursor_mut().next(),
            KeyCode::Enter => phone.select_highlighted(now),
            _ => {
                if let Some(index) = number {
                    phone.cursor_mut().set(index);
                    phone.select_highlighted(now);
                }
            }
        },
        Exercise::ScamDetector(detector) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => detector.cursor_mut().prev(),
            KeyCode::Down | KeyCode::Char('j') => detector.cursor_mut().next(),
            KeyCode::Enter if detector.feedback() == Feedback::Incorrect => detector.retry(),
            KeyCode::Enter => detector.choose_highlighted(now),
            _ => {
                if let Some(index) = number.filter(|i| *i < 2) {
                    detector.cursor_mut().set(index);
                    detector.choose_highlighted(now);
                }
            }
        },
        Exercise::AppFinder(finder) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => finder.cursor_mut().prev(),
            KeyCode::Down | KeyCode::Char('j') => finder.cursor_mut().next(),
            KeyCode::Enter if finder.feedback() == Feedback::Incorrect => finder.retry(),
            KeyCode::Enter => finder.select_highlighted(now),
            _ => {
                if let Some(index) = number {
                    finder.cursor_mut().set(index);
                    finder.select_highlighted(now);
                }
            }
        },
        Exercise::MessageComposer(_) => {}
    }
}

fn handle_completion_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.go_to_lesson_list(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.go_to_progress(),
        _ => {}
    }
}

fn handle_progress_key(app: &mut App, key: KeyEvent) {
    if app.confirm_reset {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_reset(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.request_reset(),
        _ => {}
    }
}

fn footer_hints(app: &App) -> String {
    let dict = app.dict();
    if app.support_overlay.is_some() {
        return dict.get("keys.popup");
    }
    match app.screen {
        AppScreen::Menu => dict.get("keys.menu"),
        AppScreen::LessonList => dict.get("keys.lesson_list"),
        AppScreen::Lesson => match app.runner.as_ref().and_then(|r| r.exercise()) {
            Some(Exercise::MessageComposer(_)) => dict.get("keys.composer"),
            Some(_) => dict.get("keys.exercise"),
            None => dict.get("keys.lesson"),
        },
        AppScreen::LessonNotFound => format!("Esc: {}", dict.get("lesson.back_to_lessons")),
        AppScreen::Completion => dict.get("keys.completion"),
        AppScreen::Progress if app.confirm_reset => dict.get("keys.confirm"),
        AppScreen::Progress => dict.get("keys.progress"),
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, narrating: bool) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let dict = app.dict();

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints = pack_hint_lines(&footer_hints(app), area.width as usize);
    let layout = AppLayout::new(area, hints.len() as u16);

    let header_info = format!(
        " {}: {} | {}: {}",
        dict.get("nav.language"),
        app.locale.native_name(),
        dict.get("lessons.your_points"),
        app.progress.points()
    );
    let header = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" {} ", dict.get("app.title")),
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                header_info,
                Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
            ),
        ]),
    ])
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let font_size = app.preferences.font_size();
    match app.screen {
        AppScreen::Menu => {
            let view = MenuView {
                menu: &app.menu,
                theme: app.theme,
                dict,
                font_size,
                points: app.progress.points(),
            };
            frame.render_widget(&view, centered_rect(60, 90, layout.main));
        }
        AppScreen::LessonList => {
            let entries = app.listing();
            let view = LessonList {
                entries: &entries,
                selected: app.lesson_list_selected,
                points: app.progress.points(),
                font_size,
                theme: app.theme,
                dict,
            };
            frame.render_widget(&view, layout.main);
        }
        AppScreen::Lesson => {
            if let Some(runner) = &app.runner {
                let view = LessonView {
                    runner,
                    theme: app.theme,
                    dict,
                    font_size,
                    narrating,
                    speech_rate: app.speech_rate,
                };
                frame.render_widget(&view, layout.main);
            }
        }
        AppScreen::LessonNotFound => {
            let view = NotFoundView {
                lesson_id: app.not_found_id.as_deref().unwrap_or_default(),
                theme: app.theme,
                dict,
            };
            frame.render_widget(&view, centered_rect(60, 40, layout.main));
        }
        AppScreen::Completion => {
            if let Some(runner) = &app.runner {
                let view = CompletionView {
                    lesson: runner.lesson(),
                    theme: app.theme,
                    dict,
                };
                frame.render_widget(&view, centered_rect(60, 60, layout.main));
            }
        }
        AppScreen::Progress => {
            let summary = app.summary();
            let view = ProgressView {
                summary: &summary,
                confirm_reset: app.confirm_reset,
                font_size,
                theme: app.theme,
                dict,
            };
            frame.render_widget(&view, layout.main);
        }
    }

    if let Some(overlay) = &app.support_overlay {
        let popup = SupportPopup {
            overlay,
            theme: app.theme,
            dict,
        };
        frame.render_widget(&popup, layout.main);
    }

    let footer_lines: Vec<Line> = hints
        .into_iter()
        .map(|hint| Line::from(Span::styled(hint, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}
