//! Setup screen: difficulty and question-type filters.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::session::{DifficultyFilter, KindFilter};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "自定义你的 FLINK 测验",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("请选择题目难度和类型，开始你的练习吧！".fg(Color::DarkGray)),
        Line::from(""),
    ];

    let difficulty_labels: Vec<&str> = DifficultyFilter::ALL.iter().map(|f| f.label()).collect();
    let kind_labels: Vec<&str> = KindFilter::ALL.iter().map(|f| f.label()).collect();

    content.push(selector_line(
        "难度等级",
        &difficulty_labels,
        app.setup_difficulty,
        app.setup_row == 0,
    ));
    content.push(Line::from(""));
    content.push(selector_line(
        "题目类型",
        &kind_labels,
        app.setup_kind,
        app.setup_row == 1,
    ));
    content.push(Line::from(""));
    content.push(Line::from(
        "j/k 选择行  ·  h/l 切换  ·  enter 开始  ·  q 退出".fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
}

fn selector_line<'a>(
    title: &'a str,
    labels: &[&'a str],
    selected: usize,
    active_row: bool,
) -> Line<'a> {
    let title_style = if active_row {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled(format!("{}  ", title), title_style)];

    for (index, label) in labels.iter().enumerate() {
        let style = if index == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}
