//! Terminal rendering of a [`Session`].

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};

use crate::session::{ActiveQuestion, AnswerState, CloseState, Phase, Session};

const OPTION_LABELS: &[u8] = b"ABCDEFGHI";

/// Render the whole client screen.
pub fn render(frame: &mut Frame, session: &Session, now_ms: i64) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Question
        Constraint::Length(10), // Log
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], session);

    match (session.phase(), session.active_question()) {
        (Phase::Joined, Some(question)) => {
            render_question(frame, chunks[1], session, question, now_ms)
        }
        (phase, _) => render_status(frame, chunks[1], session, phase),
    }

    render_log(frame, chunks[2], session);
    render_controls(frame, chunks[3], session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let (phase, color) = match session.phase() {
        Phase::Disconnected => ("disconnected", Color::Red),
        Phase::Connecting => ("connecting", Color::Yellow),
        Phase::Joined => ("joined", Color::Green),
    };

    let mut spans = vec![
        Span::styled("QUIZ CLIENT  ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("room {}  ", session.room_id()), Style::default().fg(Color::White)),
        Span::styled(format!("user {}  ", session.user_id()), Style::default().fg(Color::DarkGray)),
        Span::styled(phase, Style::default().fg(color).bold()),
    ];
    if session.is_host() {
        spans.push(Span::styled("  host", Style::default().fg(Color::Magenta)));
    }
    if let Some(score) = session.score() {
        spans.push(Span::styled(
            format!("  score {} ({:+})", score.total, score.delta),
            Style::default().fg(Color::Yellow),
        ));
    }
    if session.pending_correlation().is_some() {
        spans.push(Span::styled("  waiting for score…", Style::default().fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(widget, area);
}

fn render_question(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    question: &ActiveQuestion,
    now_ms: i64,
) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // Question text
        Constraint::Length(1), // Countdown
        Constraint::Min(4),    // Options
        Constraint::Length(1), // Answer status
    ])
    .split(area);

    let text = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" Q{} ", question.order))
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(text, chunks[0]);

    let (ratio, remaining) = match session.countdown() {
        Some(countdown) => (countdown.elapsed_fraction, countdown.remaining_seconds),
        None => (0.0, u64::from(question.time_limit_seconds)),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(if remaining == 0 { Color::Red } else { Color::Green }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{remaining}s"));
    frame.render_widget(gauge, chunks[1]);

    render_options(frame, chunks[2], question);

    let can_answer = session.can_answer(now_ms);
    let (status, color) = match question.answer {
        AnswerState::Answered {
            accepted: Some(true), ..
        } => ("Answer accepted", Color::Green),
        AnswerState::Answered {
            accepted: Some(false), ..
        } => ("Answer not accepted", Color::Red),
        AnswerState::Answered { accepted: None, .. } => ("…sending", Color::Yellow),
        AnswerState::NotAnswered if remaining == 0 => ("Time up", Color::Red),
        AnswerState::NotAnswered if can_answer => ("Pick an option", Color::White),
        AnswerState::NotAnswered => ("Answers closed", Color::DarkGray),
    };
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(color).bold()),
        chunks[3],
    );
}

fn render_options(frame: &mut Frame, area: Rect, question: &ActiveQuestion) {
    let chosen = match question.answer {
        AnswerState::Answered { option_index, .. } => Some(option_index),
        AnswerState::NotAnswered => None,
    };

    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let label = OPTION_LABELS.get(i).map(|b| *b as char).unwrap_or('?');
            let is_chosen = chosen == Some(i);
            let style = if is_chosen {
                Style::default().fg(Color::Yellow).bold()
            } else if chosen.is_some() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(if is_chosen { "> " } else { "  " }, style),
                Span::styled(format!("[{}] {}) ", i + 1, label), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, session: &Session, phase: Phase) {
    let (message, color) = match phase {
        Phase::Connecting => ("Connecting…".to_string(), Color::Yellow),
        Phase::Joined => ("Waiting for question...".to_string(), Color::Yellow),
        Phase::Disconnected => (
            session
                .disconnect_reason()
                .unwrap_or("Not connected")
                .to_string(),
            Color::Red,
        ),
    };

    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(1),
        Constraint::Percentage(40),
    ])
    .split(area);

    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold());
    frame.render_widget(widget, chunks[1]);
}

fn render_log(frame: &mut Frame, area: Rect, session: &Session) {
    let visible = area.height.saturating_sub(2) as usize;
    let log = session.log();
    let skip = log.len().saturating_sub(visible);
    let lines: Vec<Line> = log.skip(skip).map(Line::from).collect();

    let widget = Paragraph::new(lines).style(Style::default().fg(Color::Green)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &Session) {
    let help = match (session.phase(), session.close_state()) {
        (Phase::Disconnected, _) => "r reconnect  ·  q quit",
        (_, CloseState::CloseRequested) => "disconnecting after score…",
        _ if session.is_host() => "1-9 answer  ·  s start match  ·  d disconnect  ·  q quit",
        _ => "1-9 answer  ·  d disconnect  ·  q quit",
    };

    frame.render_widget(
        Paragraph::new(help).alignment(Alignment::Center).fg(Color::DarkGray),
        area,
    );
}
