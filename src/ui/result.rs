//! Results screen: score, percentage gauge, and a tiered message.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.session.score();
    let total = app.session.total_questions();
    let percentage = app.session.percentage();

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .split(area);

    let summary = vec![
        Line::from(""),
        Line::from(Span::styled(
            "测验完成！",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("你答对了 {} 题中的 {} 题。", total, score),
            Style::default().fg(Color::White),
        )),
    ];
    let widget = Paragraph::new(summary).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    let gauge_area = centered_gauge_area(chunks[2]);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(grade_color(percentage)))
        .percent(percentage as u16)
        .label(format!("{}%", percentage));
    frame.render_widget(gauge, gauge_area);

    let footer = vec![
        Line::from(""),
        Line::from(result_message(percentage).fg(Color::White)),
        Line::from(""),
        Line::from("r 再试一次  ·  q 退出".fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(footer).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[3]);
}

fn centered_gauge_area(area: Rect) -> Rect {
    let chunks = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(60),
        Constraint::Fill(1),
    ])
    .split(area);
    chunks[1]
}

fn grade_color(percentage: u32) -> Color {
    match percentage {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Message tier for the final score, as in the original app.
pub(crate) fn result_message(percentage: u32) -> &'static str {
    if percentage >= 80 {
        "太棒了！你对 Flink 的概念有非常扎实的掌握。"
    } else if percentage >= 50 {
        "做得不错！稍加练习，你就能成为专家。"
    } else {
        "继续努力！回顾解析有助于巩固你的知识。"
    }
}
