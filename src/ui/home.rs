use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, MenuItem};
use crate::scores::{HighScores, SortOrder};

const BANNER: &str = r#"
 ██████╗  █████╗ ██╗      █████╗  ██████╗  █████╗
██╔════╝ ██╔══██╗██║     ██╔══██╗██╔════╝ ██╔══██╗
██║  ███╗███████║██║     ███████║██║  ███╗███████║
██║   ██║██╔══██║██║     ██╔══██║██║   ██║██╔══██║
╚██████╔╝██║  ██║███████╗██║  ██║╚██████╔╝██║  ██║
 ╚═════╝ ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝"#;

fn control_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", key), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
    )])
}

pub fn render_start(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Banner
            Constraint::Length(2), // Subtitle
            Constraint::Length(7), // Menu
            Constraint::Min(10),   // Controls + top scores
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 160, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(vec![Span::styled(
        "  Three waves. One ship. Don't blink.  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    // Menu
    let selected = app.selected_menu_item();
    let items: Vec<Line> = MenuItem::all()
        .iter()
        .map(|item| {
            if *item == selected {
                Line::from(vec![Span::styled(
                    format!("\u{25b6} {} \u{25c0}", item.label()),
                    Style::default()
                        .fg(Color::Rgb(255, 220, 80))
                        .add_modifier(Modifier::BOLD),
                )])
            } else {
                Line::from(vec![Span::styled(
                    item.label().to_string(),
                    Style::default().fg(Color::Rgb(120, 120, 140)),
                )])
            }
        })
        .collect();
    let menu_w = 30u16.min(chunks[2].width);
    let menu_area = Rect::new(
        chunks[2].x + chunks[2].width.saturating_sub(menu_w) / 2,
        chunks[2].y,
        menu_w,
        chunks[2].height,
    );
    let menu = Paragraph::new(items).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(menu, menu_area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    let controls = Paragraph::new(vec![
        Line::from(""),
        heading("  Menu"),
        control_line("\u{2191} / \u{2193}", "Select"),
        control_line("Enter", "Confirm"),
        control_line("H", "High scores"),
        control_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        heading("  In game"),
        control_line("\u{2190} \u{2192} / A D", "Move ship"),
        control_line("Space", "Fire"),
        control_line("N", "Nuke (final wave)"),
        control_line("P", "Pause / Unpause"),
        control_line("R", "Restart"),
        control_line("Esc", "Back to menu"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" \u{2328} Controls ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, cols[0]);

    let top = score_lines(&app.high_scores, SortOrder::ScoreNameLevel, 5);
    let top_scores = Paragraph::new(top).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" \u{1f3c6} Top Pilots ")
            .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(top_scores, cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  \u{1f980} ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  \u{2502}  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled(
            app.high_scores.path().display().to_string(),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}

fn score_lines(high_scores: &HighScores, order: SortOrder, limit: usize) -> Vec<Line<'static>> {
    let medal_colors = [
        Color::Rgb(255, 215, 0),   // Gold
        Color::Rgb(192, 192, 192), // Silver
        Color::Rgb(205, 127, 50),  // Bronze
    ];

    let mut lines: Vec<Line> = vec![Line::from("")];
    let entries = high_scores.sorted_by(order);
    if entries.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            "    No scores yet!",
            Style::default().fg(Color::Rgb(60, 60, 80)),
        )]));
        return lines;
    }

    lines.push(Line::from(vec![Span::styled(
        format!("    {:<4}{:<14}{:>8}{:>8}", "#", "Name", "Score", "Level"),
        Style::default().fg(Color::Rgb(100, 100, 130)).add_modifier(Modifier::BOLD),
    )]));
    for (rank, entry) in entries.iter().take(limit).enumerate() {
        let color = medal_colors
            .get(rank)
            .copied()
            .unwrap_or(Color::Rgb(200, 200, 220));
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {:<4}", rank + 1),
                Style::default().fg(Color::Rgb(100, 100, 130)),
            ),
            Span::styled(
                format!("{:<14}", entry.name),
                Style::default().fg(Color::Rgb(200, 200, 220)),
            ),
            Span::styled(
                format!("{:>8}", entry.score),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:>8}", entry.level),
                Style::default().fg(Color::Rgb(80, 255, 150)),
            ),
        ]));
    }
    lines
}

pub fn render_high_scores(frame: &mut Frame, area: Rect, high_scores: &HighScores, order: SortOrder) {
    let overlay_w = 50u16.min(area.width.saturating_sub(4));
    let overlay_h = 20u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" \u{1f3c6} High Scores ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from(vec![
        Span::styled("  Sorted by ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled(
            order.label().to_string(),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.extend(score_lines(high_scores, order, usize::MAX));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Tab", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" change order  ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("Esc", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" back", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
