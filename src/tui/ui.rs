use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap};

use crate::output::{format_subscore, score_bar};
use crate::tui::app::{App, Field, InputMode};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.height < 20 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let body = Layout::horizontal([Constraint::Percentage(50), Constraint::Fill(1)]).split(chunks[1]);

    render_title(frame, chunks[0], app);
    render_form(frame, body[0], app);
    render_score_panel(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    match app.input_mode {
        InputMode::EditText => render_text_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::JsonPreview => render_preview_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let left = "Job Scorecard";
    let right = format!("{}% {}", app.result.percent, app.result.band);
    let padding = (area.width as usize).saturating_sub(left.len() + right.len());

    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(colors.title_color).bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(
            right,
            Style::default().fg(colors.band_color(app.result.band)).bold(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();

    let rows: Vec<Row> = Field::ALL
        .iter()
        .map(|field| {
            Row::new(vec![
                Cell::from(field.label()).style(Style::default().fg(colors.label_color)),
                Cell::from(app.field_value(*field)).style(Style::default().fg(colors.value_color)),
            ])
        })
        .collect();

    let widths = [Constraint::Length(20), Constraint::Fill(1)];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Field", "Value"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .block(Block::bordered().title(" Review "))
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_score_panel(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let block = Block::bordered().title(" Composite ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Gauge
        Constraint::Length(1), // Spacer
        Constraint::Length(5), // Sub-scores
        Constraint::Length(1), // Spacer
        Constraint::Fill(1),   // Breakdown + notes
    ])
    .split(inner);

    let band_color = colors.band_color(app.result.band);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(band_color).bg(colors.bar_empty))
        .percent(app.result.percent as u16)
        .label(format!("{}%  {}", app.result.percent, app.result.band));
    frame.render_widget(gauge, chunks[0]);

    let mut sub_lines: Vec<Line> = app
        .result
        .breakdown()
        .iter()
        .map(|dim| {
            Line::from(vec![
                Span::styled(format!("{:<14}", dim.label), Style::default().fg(colors.label_color)),
                Span::raw(format!("{:>4}/5 ", format_subscore(dim.score))),
                Span::styled(
                    score_bar(dim.score, 5.0, 10),
                    Style::default().fg(colors.subscore_color(dim.score)),
                ),
            ])
        })
        .collect();
    sub_lines.push(Line::from(vec![
        Span::styled(format!("{:<14}", "Customer"), Style::default().fg(colors.label_color)),
        Span::styled(
            format!("{:>4}/5 not scored", app.review.customer_rating),
            Style::default().fg(colors.muted),
        ),
    ]));
    frame.render_widget(Paragraph::new(sub_lines), chunks[2]);

    let mut detail: Vec<Line> = app
        .result
        .breakdown()
        .iter()
        .map(|dim| {
            Line::from(Span::styled(
                format!(
                    "{} {:.2} x {:.2} = {:.3} ({})",
                    dim.label, dim.score, dim.weight, dim.contribution, dim.description
                ),
                Style::default().fg(colors.muted),
            ))
        })
        .collect();
    detail.push(Line::from(Span::styled(
        format!("Weighted {:.3} / 5", app.result.weighted),
        Style::default().fg(colors.muted),
    )));

    let notes = app.review.notes_str();
    if !notes.is_empty() {
        detail.push(Line::from(""));
        detail.push(Line::from(Span::styled("Notes", colors.header_style)));
        detail.push(Line::from(notes.to_string()));
    }

    frame.render_widget(Paragraph::new(detail).wrap(Wrap { trim: true }), chunks[4]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("j/k", ":field "),
            ("h/l", ":adjust "),
            ("Enter", ":edit/toggle "),
            ("p", ":preview "),
            ("e", ":export "),
            ("r", ":reset "),
            ("?", ":help "),
            ("q", ":quit"),
        ];
        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::bordered()
        .title(Span::styled(title, app.colors.popup_title))
        .border_style(Style::default().fg(app.colors.popup_border))
}

fn render_text_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(64, 8, frame.area());
    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", app.selected_field().label());
    let block = popup_block(app, &title);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(inner);

    let input = Paragraph::new(format!("{}|", app.text_input)).wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new(format!(
        "Enter: save | Esc: cancel | {}/{} chars",
        app.text_input.chars().count(),
        app.text_limit()
    ))
    .style(Style::default().fg(app.colors.muted));
    frame.render_widget(help, chunks[1]);
}

fn render_preview_popup(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let popup_area = centered_rect_fixed(area.width.saturating_sub(8).min(90), area.height.saturating_sub(4), area);
    frame.render_widget(Clear, popup_area);

    let block = popup_block(app, " Export preview (j/k scroll, p/Esc close) ");
    let json = app.export_preview(Utc::now());
    let preview = Paragraph::new(json)
        .block(block)
        .scroll((app.preview_scroll, 0));
    frame.render_widget(preview, popup_area);
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(52, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(app, " Keyboard Shortcuts ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(app.colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next field"),
        ("k / Up        ", "Previous field"),
        ("l / Right / + ", "Increase / next option"),
        ("h / Left / -  ", "Decrease / previous option"),
        ("Enter / Space ", "Edit text or toggle yes/no"),
        ("p             ", "Preview export JSON"),
        ("e             ", "Export JSON to file"),
        ("r             ", "Reset form"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        format!("Exports go to {}", app.export_path().display()),
        Style::default().fg(app.colors.muted),
    )));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines).wrap(Wrap { trim: false }), inner);
}
