use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io::stdout;

use crate::kanban::KanbanStore;
use crate::models::TaskStatus;

/// Outcome of one completed drag. A transient value, translated into at
/// most one store call and then discarded; nothing in the domain model
/// holds drag-in-progress state.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub task_id: String,
    pub source: TaskStatus,
    /// None when the task was dropped outside every column.
    pub destination: Option<TaskStatus>,
}

/// Feeds a finished gesture to the store. Returns whether a move was
/// dispatched. Dropping outside the board or back onto the source column
/// changes nothing, including any attempted reorder within the column.
pub fn resolve_drop(board: &mut KanbanStore, gesture: &DragGesture) -> Result<bool> {
    let Some(destination) = gesture.destination else {
        return Ok(false);
    };
    if destination == gesture.source {
        return Ok(false);
    }
    board.move_task(&gesture.task_id, destination)
}

/// A picked-up card mid-drag. `over` tracks the column the card is
/// currently held above.
struct Carry {
    task_id: String,
    source: TaskStatus,
    over: usize,
}

struct BoardState {
    active_column: usize,
    selected: [usize; 3],
    carrying: Option<Carry>,
    input: Option<String>,
}

impl BoardState {
    fn new() -> Self {
        Self {
            active_column: 0,
            selected: [0; 3],
            carrying: None,
            input: None,
        }
    }

    fn clamp_selection(&mut self, board: &KanbanStore) {
        for (i, status) in TaskStatus::COLUMNS.iter().enumerate() {
            let len = board.column(*status).len();
            if len == 0 {
                self.selected[i] = 0;
            } else if self.selected[i] >= len {
                self.selected[i] = len - 1;
            }
        }
    }

    fn selected_task_id(&self, board: &KanbanStore) -> Option<String> {
        let status = TaskStatus::COLUMNS[self.active_column];
        board
            .column(status)
            .get(self.selected[self.active_column])
            .map(|t| t.id.clone())
    }

    fn column_left(&mut self) {
        if let Some(carry) = &mut self.carrying {
            carry.over = carry.over.saturating_sub(1);
        } else {
            self.active_column = self.active_column.saturating_sub(1);
        }
    }

    fn column_right(&mut self) {
        if let Some(carry) = &mut self.carrying {
            if carry.over < 2 {
                carry.over += 1;
            }
        } else if self.active_column < 2 {
            self.active_column += 1;
        }
    }
}

/// Runs the interactive three-column board. Keyboard grab-and-drop stands
/// in for pointer dragging: Space picks a card up, h/l carries it across
/// columns, Space drops it, Esc abandons the drag.
pub fn run_board(board: &mut KanbanStore) -> Result<()> {
    let mut state = BoardState::new();

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, board);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut BoardState,
    board: &mut KanbanStore,
) -> Result<()> {
    loop {
        state.clamp_selection(board);
        terminal.draw(|frame| draw(frame, state, board))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Text-entry mode for a new card.
        if let Some(input) = &mut state.input {
            match key.code {
                KeyCode::Enter => {
                    let text = input.clone();
                    state.input = None;
                    board.add_task(&text)?;
                }
                KeyCode::Esc => state.input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') if state.carrying.is_none() => break,
            KeyCode::Left | KeyCode::Char('h') => state.column_left(),
            KeyCode::Right | KeyCode::Char('l') => state.column_right(),
            KeyCode::Down | KeyCode::Char('j') => {
                if state.carrying.is_none() {
                    state.selected[state.active_column] += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if state.carrying.is_none() {
                    state.selected[state.active_column] =
                        state.selected[state.active_column].saturating_sub(1);
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => match state.carrying.take() {
                Some(carry) => {
                    let gesture = DragGesture {
                        task_id: carry.task_id,
                        source: carry.source,
                        destination: Some(TaskStatus::COLUMNS[carry.over]),
                    };
                    if resolve_drop(board, &gesture)? {
                        state.active_column = carry.over;
                    }
                }
                None => {
                    if let Some(task_id) = state.selected_task_id(board) {
                        state.carrying = Some(Carry {
                            task_id,
                            source: TaskStatus::COLUMNS[state.active_column],
                            over: state.active_column,
                        });
                    }
                }
            },
            KeyCode::Esc => {
                if let Some(carry) = state.carrying.take() {
                    // Dropped outside the board: discard the gesture whole.
                    let gesture = DragGesture {
                        task_id: carry.task_id,
                        source: carry.source,
                        destination: None,
                    };
                    resolve_drop(board, &gesture)?;
                }
            }
            KeyCode::Char('a') => state.input = Some(String::new()),
            KeyCode::Char('d') => {
                if state.carrying.is_none() {
                    if let Some(task_id) = state.selected_task_id(board) {
                        board.delete_task(&task_id)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &BoardState, board: &KanbanStore) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(outer[0]);

    for (i, status) in TaskStatus::COLUMNS.iter().enumerate() {
        let tasks = board.column(*status);
        let carried_here = state
            .carrying
            .as_ref()
            .is_some_and(|c| c.over == i);

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| {
                let held = state
                    .carrying
                    .as_ref()
                    .is_some_and(|c| c.task_id == task.id);
                let marker = if held { "^ " } else { "" };
                ListItem::new(format!("{}{}", marker, task.text))
            })
            .collect();

        let border_style = if carried_here {
            Style::default().fg(Color::Yellow)
        } else if state.carrying.is_none() && state.active_column == i {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!(" {} ({}) ", status.label(), tasks.len())),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        if state.active_column == i && !tasks.is_empty() {
            list_state.select(Some(state.selected[i]));
        }
        frame.render_stateful_widget(list, columns[i], &mut list_state);
    }

    let footer = footer_line(state, board);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        outer[1],
    );
}

fn footer_line(state: &BoardState, board: &KanbanStore) -> String {
    if let Some(input) = &state.input {
        return format!(" New task: {input}_");
    }
    if let Some(carry) = &state.carrying {
        let text = board
            .get(&carry.task_id)
            .map(|t| t.text.as_str())
            .unwrap_or("?");
        let preview = textwrap::fill(text, 60).lines().next().unwrap_or("").to_string();
        return format!(
            " Carrying \"{}\" over {}  |  h/l:carry  space:drop  esc:cancel",
            preview,
            TaskStatus::COLUMNS[carry.over].label()
        );
    }
    " h/l:column  j/k:select  space:grab  a:add  d:delete  q:quit".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;

    fn board_with_task(text: &str) -> (tempfile::TempDir, KanbanStore, String) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_at(dir.path()).unwrap();
        let mut board = KanbanStore::load(store);
        let id = board.add_task(text).unwrap().unwrap().id.clone();
        (dir, board, id)
    }

    #[test]
    fn test_drop_outside_board_changes_nothing() {
        let (_dir, mut board, id) = board_with_task("task");
        let gesture = DragGesture {
            task_id: id.clone(),
            source: TaskStatus::Todo,
            destination: None,
        };

        assert!(!resolve_drop(&mut board, &gesture).unwrap());
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_drop_on_source_column_is_noop() {
        let (_dir, mut board, id) = board_with_task("task");
        let gesture = DragGesture {
            task_id: id.clone(),
            source: TaskStatus::Todo,
            destination: Some(TaskStatus::Todo),
        };

        assert!(!resolve_drop(&mut board, &gesture).unwrap());
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_cross_column_drop_dispatches_move() {
        let (_dir, mut board, id) = board_with_task("task");
        let gesture = DragGesture {
            task_id: id.clone(),
            source: TaskStatus::Todo,
            destination: Some(TaskStatus::Doing),
        };

        assert!(resolve_drop(&mut board, &gesture).unwrap());
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::Doing);
    }

    #[test]
    fn test_drop_with_unknown_task_is_noop() {
        let (_dir, mut board, _id) = board_with_task("task");
        let gesture = DragGesture {
            task_id: "task-gone".to_string(),
            source: TaskStatus::Todo,
            destination: Some(TaskStatus::Done),
        };

        assert!(!resolve_drop(&mut board, &gesture).unwrap());
        assert!(board.column(TaskStatus::Done).is_empty());
    }
}
