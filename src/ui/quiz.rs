//! Question card: options, reveal, explanation, extension, follow-up pane.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::models::{QuestionKind, QuestionRecord};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);

    if app.is_loading() {
        render_notice(frame, chunks[1], "正在生成题目...", Color::DarkGray);
        render_controls(frame, chunks[2], "q 退出");
        return;
    }
    if let Some(error) = &app.session.error {
        render_notice(frame, chunks[1], format!("出错了：{}", error), Color::Red);
        render_controls(frame, chunks[2], "r 重试  ·  q 退出");
        return;
    }
    let Some(question) = app.session.current_question.as_ref() else {
        return;
    };

    render_card(frame, chunks[1], app, question);
    render_controls(frame, chunks[2], controls_hint(app, question));
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let progress = format!(
        "{}/{}",
        app.session.current_number(),
        app.session.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, text: impl Into<String>, color: Color) {
    let widget = Paragraph::new(text.into())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .fg(color);
    frame.render_widget(widget, area);
}

fn render_card(frame: &mut Frame, area: Rect, app: &App, question: &QuestionRecord) {
    let answered = app.session.is_answered();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!("问题 #{}", question.id),
            Style::default().fg(Color::Blue).bold(),
        ),
        Span::raw("   "),
        Span::styled(
            format!("[{}]", question.difficulty.label()),
            Style::default().fg(difficulty_color(question)),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", question.kind.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        question.prompt.as_str(),
        Style::default().fg(Color::White).bold(),
    )));
    lines.push(Line::from(""));

    match question.kind {
        QuestionKind::MultipleChoice => push_options(&mut lines, app, question, answered),
        QuestionKind::OpenEnded => {
            if !answered {
                lines.push(Line::from(
                    "自行作答后按 enter 显示参考答案".fg(Color::DarkGray),
                ));
            }
        }
    }

    if answered {
        push_answer_sections(&mut lines, app, question);
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn push_options<'a>(
    lines: &mut Vec<Line<'a>>,
    app: &App,
    question: &'a QuestionRecord,
    answered: bool,
) {
    for (index, option) in question.options.iter().enumerate() {
        let is_cursor = index == app.selected_option;
        let is_correct = question.is_correct_option(option);
        let is_chosen = app
            .selected_letter
            .as_deref()
            .is_some_and(|l| crate::models::option_letter(option) == Some(l));

        let (marker, style) = if answered {
            if is_correct {
                ("+", Style::default().fg(Color::Green).bold())
            } else if is_chosen {
                ("x", Style::default().fg(Color::Red))
            } else {
                (" ", Style::default().fg(Color::DarkGray))
            }
        } else if is_cursor {
            (">", Style::default().fg(Color::Cyan).bold())
        } else {
            (" ", Style::default().fg(Color::Gray))
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(option.as_str(), style),
        ]));
    }
}

fn push_answer_sections<'a>(lines: &mut Vec<Line<'a>>, app: &'a App, question: &'a QuestionRecord) {
    lines.push(Line::from(""));

    if question.kind == QuestionKind::OpenEnded {
        lines.push(section_title("正确答案"));
        lines.push(Line::from(Span::styled(
            question.correct_answer.as_str(),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(""));
    }

    // Explanation appears for every open-ended question and for wrongly
    // answered multiple choice; a correct pick needs no correction.
    let answered_wrong = app.selected_letter.as_deref() != Some(question.correct_answer.as_str());
    if question.kind == QuestionKind::OpenEnded || answered_wrong {
        lines.push(section_title("解释"));
        lines.push(Line::from(question.explanation.as_str()));
        lines.push(Line::from(""));
    }

    lines.push(section_title("知识扩展"));
    lines.push(Line::from(Span::styled(
        question.extension.as_str(),
        Style::default().fg(Color::Blue),
    )));

    push_followup_pane(lines, app);
}

fn push_followup_pane<'a>(lines: &mut Vec<Line<'a>>, app: &'a App) {
    if !app.followups_available() {
        return;
    }
    lines.push(Line::from(""));

    if app.input_mode == InputMode::FollowUp {
        lines.push(Line::from(vec![
            Span::styled("追问: ", Style::default().fg(Color::Cyan).bold()),
            Span::raw(app.followup_input.as_str()),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ]));
        return;
    }
    if app.followup_loading {
        lines.push(Line::from("思考中...".fg(Color::DarkGray)));
        return;
    }
    if let Some(error) = &app.followup_error {
        lines.push(Line::from(
            format!("追问失败：{}", error).fg(Color::Red),
        ));
        return;
    }
    if let Some(answer) = &app.followup_answer {
        lines.push(section_title("AI 回答"));
        lines.push(Line::from(answer.as_str()));
    }
}

fn section_title(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::White).bold(),
    ))
}

fn difficulty_color(question: &QuestionRecord) -> Color {
    use crate::models::Difficulty;
    match question.difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

fn controls_hint(app: &App, question: &QuestionRecord) -> &'static str {
    if app.input_mode == InputMode::FollowUp {
        return "enter 发送  ·  esc 取消";
    }
    if app.session.is_answered() {
        if app.followups_available() {
            "enter 下一题  ·  f 追问  ·  q 退出"
        } else {
            "enter 下一题  ·  q 退出"
        }
    } else if question.kind == QuestionKind::MultipleChoice {
        "j/k 选择  ·  enter 作答  ·  q 退出"
    } else {
        "enter 显示答案  ·  q 退出"
    }
}

fn render_controls(frame: &mut Frame, area: Rect, hint: impl Into<String>) {
    let widget = Paragraph::new(hint.into())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
