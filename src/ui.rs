use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, Tab};
use crate::efficiency;
use crate::format::human_bytes;
use crate::hit::{HitZone, RegionHit};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Active tab body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, chunks[0]);
    match app.active_tab {
        Tab::Explorer => draw_explorer(frame, app, chunks[1]),
        Tab::Layers => draw_layers(frame, app, chunks[1]),
        Tab::Efficiency => draw_efficiency(frame, app, chunks[1]),
    }
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let titles = vec![
        Line::from("1 Explorer"),
        Line::from("2 Layers"),
        Line::from("3 Efficiency"),
    ];
    let selected = match app.active_tab {
        Tab::Explorer => 0,
        Tab::Layers => 1,
        Tab::Efficiency => 2,
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.panel_title))
        .highlight_style(
            Style::default()
                .fg(app.theme.active_border)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let name = if app.image_name.is_empty() {
        "...".to_string()
    } else {
        app.image_name.clone()
    };
    let image_name = Paragraph::new(name)
        .alignment(Alignment::Right)
        .style(Style::default().fg(app.theme.breadcrumb));
    frame.render_widget(image_name, chunks[1]);
}

fn draw_explorer(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Breadcrumbs
            Constraint::Length(3), // Proportional strip
            Constraint::Min(0),    // Listing
        ])
        .split(area);

    draw_breadcrumbs(frame, app, chunks[0]);
    draw_strip(frame, app, chunks[1]);
    draw_listing(frame, app, chunks[2]);
}

fn draw_breadcrumbs(frame: &mut Frame, app: &App, area: Rect) {
    let path: Vec<&str> = app.stack.breadcrumbs().map(|(_, name)| name).collect();
    let line = if path.is_empty() {
        format!("[{}] (no directory loaded)", app.explorer_source)
    } else {
        format!("[{}] {}", app.explorer_source, path.join(" > "))
    };
    let breadcrumbs = Paragraph::new(line).style(Style::default().fg(app.theme.breadcrumb));
    frame.render_widget(breadcrumbs, area);
}

/// Render the proportional strip and record a hit zone per visible region.
/// Zone boundaries come from rounding the cumulative share, so the strip
/// fills the row without gaps and never drifts from the region order.
fn draw_strip(frame: &mut Frame, app: &mut App, area: Rect) {
    app.hit_zones.clear();

    let block = Block::default()
        .title(" Space Usage ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.active_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut zones: Vec<HitZone> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    if let Some(layout) = &app.layout {
        let total_width = inner.width as f64;
        let mut cumulative = 0.0;
        let mut x = inner.x;
        for region in &layout.regions {
            cumulative += region.share;
            // Shares can sum past 1.0 when children outgrow the parent's
            // reported size; the strip simply stops at the right edge
            let right = ((cumulative * total_width).round() as u16).min(inner.width);
            let width = right.saturating_sub(x - inner.x);
            if width == 0 {
                continue;
            }
            spans.push(Span::styled(
                " ".repeat(width as usize),
                Style::default().bg(app.theme.region_color(region.color_slot)),
            ));
            zones.push(HitZone {
                x0: x,
                y0: inner.y,
                x1: x + width,
                y1: inner.y + inner.height,
                hit: RegionHit {
                    generation: layout.generation,
                    child_index: region.child_index,
                },
            });
            x += width;
        }
    }

    if spans.is_empty() {
        let empty = Paragraph::new("No data loaded")
            .style(Style::default().fg(app.theme.status_help_text));
        frame.render_widget(empty, inner);
        return;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    app.hit_zones = zones;
}

fn draw_listing(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Entries ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.active_border));

    let items: Vec<ListItem> = match (&app.layout, app.stack.current()) {
        (Some(layout), Some(current)) => layout
            .regions
            .iter()
            .map(|region| {
                let position = layout.child_order[region.child_index];
                let child = &current.children[position];

                let mut spans = Vec::new();
                if app.config.show_legend {
                    spans.push(Span::styled(
                        "■ ",
                        Style::default().fg(app.theme.region_color(region.color_slot)),
                    ));
                }
                let (name_style, suffix) = if child.is_dir {
                    (
                        Style::default()
                            .fg(app.theme.directory)
                            .add_modifier(Modifier::BOLD),
                        "/",
                    )
                } else {
                    (Style::default().fg(app.theme.file), "")
                };
                spans.push(Span::styled(
                    format!("{:<32}", format!("{}{}", region.label, suffix)),
                    name_style,
                ));
                spans.push(Span::styled(
                    format!("{:>10}", human_bytes(region.size)),
                    Style::default().fg(app.theme.size_column),
                ));
                spans.push(Span::styled(
                    format!("  {:>5.1}%", region.share * 100.0),
                    Style::default().fg(app.theme.status_help_text),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect(),
        _ => Vec::new(),
    };

    if items.is_empty() {
        let empty = Paragraph::new("No data loaded")
            .block(block)
            .style(Style::default().fg(app.theme.status_help_text));
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(app.theme.selected_bg)
            .fg(app.theme.selected_fg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, area, &mut app.listing_state);
}

fn draw_layers(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Layers ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.active_border));

    if app.layers.is_empty() {
        let empty = Paragraph::new("No layers loaded")
            .block(block)
            .style(Style::default().fg(app.theme.status_help_text));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:>3}  ", index + 1),
                    Style::default().fg(app.theme.layer_index),
                ),
                Span::styled(
                    format!("{:>10}  ", human_bytes(layer.size)),
                    Style::default().fg(app.theme.layer_size),
                ),
                Span::styled(
                    layer.command.clone(),
                    Style::default().fg(app.theme.text_default),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(app.theme.selected_bg)
            .fg(app.theme.selected_fg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, area, &mut app.layer_state);
}

fn draw_efficiency(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Efficiency ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.active_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    match app.efficiency_score() {
        None => {
            let waiting = Paragraph::new("Waiting for backend data")
                .style(Style::default().fg(app.theme.status_help_text));
            frame.render_widget(waiting, chunks[0]);
        }
        Some(Err(e)) => {
            let error = Paragraph::new(format!("Score unavailable: {}", e))
                .style(Style::default().fg(app.theme.anomaly));
            frame.render_widget(error, chunks[0]);
        }
        Some(Ok(score)) => {
            let rating = efficiency::rating(score);
            let gauge = Gauge::default()
                .block(Block::default().title(" Score ").borders(Borders::ALL))
                .gauge_style(Style::default().fg(app.theme.rating_color(rating)))
                .ratio(f64::from(score.min(100)) / 100.0)
                .label(format!("{}% ({})", score, rating.label()));
            frame.render_widget(gauge, chunks[0]);

            let layer_total: u64 = app.layers.iter().map(|layer| layer.size).sum();
            let image_total = app.image.map(|image| image.total_size).unwrap_or(0);
            let mut lines = vec![
                Line::from(format!("Layers: {}", app.layers.len())),
                Line::from(format!("Layer bytes: {}", human_bytes(layer_total))),
                Line::from(format!("Image bytes: {}", human_bytes(image_total))),
            ];
            if efficiency::is_anomalous(score) {
                lines.push(Line::from(Span::styled(
                    "Layers report more bytes than the merged image",
                    Style::default().fg(app.theme.anomaly),
                )));
            }
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        }
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_text = if app.is_loading {
        format!("Loading... | {}", app.status_message)
    } else {
        app.status_message.clone()
    };

    let help_text = match app.active_tab {
        Tab::Explorer => "Tab: Switch tab | ↑↓: Navigate | Enter: Open | Backspace: Up | i: Image root | q: Quit",
        Tab::Layers => "Tab: Switch tab | ↑↓: Navigate | Enter: Explore layer | q: Quit",
        Tab::Efficiency => "Tab: Switch tab | 1/2/3: Jump to tab | q: Quit",
    };

    let status_line = Line::from(vec![
        Span::styled(status_text, Style::default().fg(app.theme.status_bar_fg)),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(app.theme.status_help_text)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(app.theme.status_bar_bg));
    frame.render_widget(paragraph, area);
}
