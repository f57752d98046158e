use std::{
    env,
    io::{self, Write},
    process::{Command, Stdio},
};

use chrono::{Local, NaiveDate};

use nexapro::{
    app::AppState,
    calendar::CalendarEvent,
    kanban::{KanbanBoard, MoveOutcome},
    model::{RecordId, TaskStatus},
    sync::{Session, RequestScope, sync_engine::SyncEngine},
};

pub const USAGE: &str =
    "Usage: nexapro [--agenda [YYYY/MM/DD]] [--board] [--move <task-id> <status>] [--logout]";

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Agenda(NaiveDate),
    Board,
    Move { task_id: RecordId, status: TaskStatus },
    Logout,
    Help,
}

/// Parses the arguments after the program name. No arguments shows today's
/// agenda.
pub fn parse_cli_mode<I>(args: I) -> Result<CliMode, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let Some(arg) = args.next() else {
        return Ok(CliMode::Agenda(Local::now().date_naive()));
    };

    let mode = match arg.as_str() {
        "--agenda" => {
            let date = match args.next_if(|next| !next.starts_with("--")) {
                Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                None => Local::now().date_naive(),
            };
            CliMode::Agenda(date)
        }
        "--board" => CliMode::Board,
        "--move" => {
            let task_id = args.next().ok_or("--move needs a task id")?;
            let status_str = args.next().ok_or("--move needs a target status")?;
            let status = TaskStatus::parse(&status_str)
                .ok_or_else(|| format!("Unknown status '{}'. Use todo, in-progress or completed.", status_str))?;
            CliMode::Move {
                task_id: RecordId::from(task_id),
                status,
            }
        }
        "--logout" => CliMode::Logout,
        "--help" | "-h" => CliMode::Help,
        _ => return Err(format!("Unknown argument: {}", arg)),
    };

    if let Some(extra) = args.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    Ok(mode)
}

pub async fn run_agenda_mode(engine: &SyncEngine, date: NaiveDate) -> anyhow::Result<()> {
    let scope = RequestScope::new();
    let mut state = engine.load_calendar(&scope).await?;
    state.selected_date = date;

    let agenda = format_agenda_text(&state, date);
    display_with_pager(&agenda)?;
    Ok(())
}

pub async fn run_board_mode(engine: &SyncEngine) -> anyhow::Result<()> {
    let board = engine.load_board().await?;
    println!("{}", format_board_text(&board));
    Ok(())
}

pub async fn run_move_mode(
    engine: &SyncEngine,
    task_id: &RecordId,
    status: TaskStatus,
) -> anyhow::Result<()> {
    let mut board = engine.load_board().await?;
    match engine.move_task(&mut board, task_id, status).await? {
        MoveOutcome::Moved { progress: Some(progress) } => {
            println!("Moved task {} to {} ({}%)", task_id, status, progress);
        }
        MoveOutcome::Moved { progress: None } => println!("Moved task {} to {}", task_id, status),
        MoveOutcome::Ignored | MoveOutcome::Reordered => {
            println!("Task {} is already in {}", task_id, status);
        }
    }
    Ok(())
}

pub fn run_logout(session: &Session) -> anyhow::Result<()> {
    session.sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn format_agenda_text(state: &AppState, date: NaiveDate) -> String {
    let events = state.get_events_for_date(date);
    let mut lines = Vec::new();
    lines.push(format!("Agenda – {}", date.format("%A, %B %d, %Y")));
    lines.push(String::new());

    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(event)));
        }
    }

    lines.join("\n")
}

fn build_agenda_line(event: &CalendarEvent) -> String {
    let time_label = event
        .time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "All Day".to_string());

    let mut line = format!("{:<8} {} {}", time_label, event.kind.symbol(), event.title);
    if let Some(description) = &event.description
        && !description.is_empty()
    {
        line.push_str(&format!(" ({})", description));
    }
    line
}

pub fn format_board_text(board: &KanbanBoard) -> String {
    let mut lines = Vec::new();
    for status in TaskStatus::ALL {
        let column = board.column(status);
        lines.push(format!("{} ({})", status, column.len()));
        for task in column {
            lines.push(format!("  [{}] {} {:>3}%", task.id, task.title, task.progress));
        }
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}
