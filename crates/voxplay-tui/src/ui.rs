use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, Tab};
use voxplay_core::tui_types::CaptureStatus;

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, main_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(frame.area());

    draw_tabs(frame, app, tabs_area);

    match app.tab {
        Tab::Player => draw_player(frame, app, main_area),
        Tab::Logs => draw_logs(frame, app, main_area),
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["1:Player", "2:Logs"];
    let selected = match app.tab {
        Tab::Player => 0,
        Tab::Logs => 1,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("voxplay"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_player(frame: &mut Frame, app: &App, area: Rect) {
    let [file_area, gauge_area, status_area, recent_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let file = Paragraph::new(app.state.file_name.as_str())
        .block(Block::default().borders(Borders::ALL).title("File"));
    frame.render_widget(file, file_area);

    let gauge_style = if app.state.playing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(gauge_style)
        .ratio(f64::from(app.state.progress.percent).min(100.0) / 100.0)
        .label(app.state.progress.label.clone());
    frame.render_widget(gauge, gauge_area);

    let status = Paragraph::new(status_line(app))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, status_area);

    let items: Vec<ListItem> = app
        .state
        .recent_commands
        .iter()
        .rev()
        .take(10)
        .map(|s| ListItem::new(s.as_str()))
        .collect();
    let recent = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Voice commands (p=play, s=stop, Left/Right=seek, j=jump, q=quit)"),
    );
    frame.render_widget(recent, recent_area);
}

fn status_line(app: &App) -> Line<'_> {
    if let Some(input) = &app.jump_input {
        return Line::from(vec![
            Span::styled("Jump to: ", Style::default().fg(Color::Yellow)),
            Span::raw(input.as_str()),
            Span::styled(
                "  (M:SS, Enter=go, Esc=cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
    }

    let playback = if app.state.playing {
        Span::styled("Playing", Style::default().fg(Color::Green))
    } else if app.state.at_end {
        Span::raw("End")
    } else {
        Span::raw("Stopped")
    };

    let capture = match app.state.capture {
        CaptureStatus::Ok => Span::styled("listening", Style::default().fg(Color::Green)),
        CaptureStatus::Error => Span::styled("mic error", Style::default().fg(Color::Red)),
        CaptureStatus::Disabled => Span::raw("mic off"),
    };

    Line::from(vec![playback, Span::raw("  |  "), capture])
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let logs = app.logs.lock().unwrap();
    let total = logs.len();

    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let scroll = app.log_scroll.min(total.saturating_sub(visible_height));
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = logs
        .iter()
        .skip(start)
        .take(end - start)
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let title = if app.log_auto_scroll {
        "Logs (auto-scroll)"
    } else {
        "Logs (Up/Down=scroll, G=bottom)"
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use voxplay_core::tui_types::PlayerState;
    use voxplay_core::ProgressUpdate;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area();
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            text.push('\n');
        }
        text
    }

    fn make_app() -> App {
        App::new(Arc::new(Mutex::new(VecDeque::new())), 10)
    }

    #[test]
    fn test_player_tab_renders_file_and_progress() {
        let backend = TestBackend::new(70, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = make_app();
        app.update_state(PlayerState {
            file_name: "track.mp3".into(),
            progress: ProgressUpdate {
                label: "2:05/62:05".into(),
                percent: 3,
            },
            playing: true,
            recent_commands: vec!["пуск".into(), "вперёд".into()],
            is_running: true,
            ..Default::default()
        });

        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("track.mp3"), "missing file name:\n{}", text);
        assert!(text.contains("2:05/62:05"), "missing progress label:\n{}", text);
        assert!(text.contains("Playing"), "missing playback status:\n{}", text);
    }

    #[test]
    fn test_player_tab_renders_jump_prompt() {
        let backend = TestBackend::new(70, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = make_app();
        app.jump_input = Some("1:3".to_string());

        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Jump to: 1:3"), "missing jump prompt:\n{}", text);
    }

    #[test]
    fn test_logs_tab_renders_log_lines() {
        let logs = Arc::new(Mutex::new(VecDeque::new()));
        {
            let mut buf = logs.lock().unwrap();
            for i in 0..10 {
                buf.push_back(format!(" INFO [voxplay] log message {}", i));
            }
        }

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = App::new(Arc::clone(&logs), 10);
        app.tab = Tab::Logs;

        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(
            text.contains("log message"),
            "expected log text in output:\n{}",
            text,
        );
    }
}
