use crate::ui::app::{App, FocusPanel};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68 - passing
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c - focus
const BRAND_RED: Color = Color::Rgb(0xA8, 0x45, 0x3C); // #a8453c - failing
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565 - footer

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);

    let help = app.status.as_deref().map_or_else(
        || " ←→ Panel | ↑↓ Select | Enter Details | r Re-check | q Quit ".to_string(),
        |status| format!(" {status} | ←→ Panel | ↑↓ Select | q Quit "),
    );
    draw_footer(frame, chunks[2], &help);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.report {
        Some(report) => format!(
            " IFC Checker | {} | {} elements checked | {} requirements | {} failing ",
            app.selected_level_name(),
            report.elements_checked,
            report.requirements_checked,
            report.failing_ids.len()
        ),
        None => format!(" IFC Checker | {} | no result ", app.selected_level_name()),
    };

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(20), // Levels
        Constraint::Percentage(45), // Failing elements
        Constraint::Percentage(35), // Reasons
    ])
    .split(area);

    draw_levels(frame, chunks[0], app);
    draw_elements(frame, chunks[1], app);
    draw_reasons(frame, chunks[2], app);
}

fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_levels(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Levels;

    // "All" first, then storeys
    let names = std::iter::once("All").chain(app.storeys.iter().map(String::as_str));

    let items: Vec<ListItem> = names
        .enumerate()
        .map(|(i, name)| {
            let is_selected = i == app.selected_level;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if is_selected && is_focused {
                " ◄"
            } else {
                ""
            };

            ListItem::new(Line::from(vec![
                Span::styled(name.to_string(), style),
                Span::styled(marker, Style::default().fg(BRAND_ORANGE)),
            ]))
        })
        .collect();

    let title = format!(" Levels ({}) ", app.storeys.len() + 1); // +1 for "All"
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_elements(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Elements;
    let elements = app.failing_elements();

    // Subtract 3 for borders and header
    let visible_rows = (area.height as usize).saturating_sub(3);

    // Keep selected item visible
    let scroll_offset = if app.selected_element >= visible_rows {
        app.selected_element - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(vec!["ID", "Type", "Name", "Missing"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = elements
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, element)| {
            let is_selected = i == app.selected_element;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                format!("#{}", element.id),
                element.entity_type.clone(),
                element.name.clone(),
                element.missing.len().to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(15),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(15),
    ];

    let title_color = if elements.is_empty() {
        BRAND_GREEN
    } else {
        BRAND_RED
    };
    let title = Span::styled(
        format!(" Failing elements ({}) ", elements.len()),
        Style::default().fg(title_color),
    );
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused)),
    );

    frame.render_widget(table, area);

    if elements.len() > visible_rows {
        draw_scrollbar(frame, area, elements.len(), app.selected_element);
    }
}

fn draw_reasons(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = match app.selected_summary() {
        Some(element) => element
            .missing
            .iter()
            .map(|reason| {
                Line::from(vec![
                    Span::styled("✗ ", Style::default().fg(BRAND_RED)),
                    Span::raw(reason.clone()),
                ])
            })
            .collect(),
        None if app.report.as_ref().is_some_and(|r| r.is_compliant()) => vec![Line::styled(
            "All checked elements comply",
            Style::default().fg(BRAND_GREEN),
        )],
        None => Vec::new(),
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Missing ").borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help.to_string())
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, len: usize, position: usize) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(len).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height.saturating_sub(3),
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

/// Rows for a bordered block holding `lines` lines of text.
fn bordered_height(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

pub fn draw_element_detail(frame: &mut Frame, app: &App) {
    let element = match app.selected_summary() {
        Some(e) => e,
        None => return,
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header: element name
        Constraint::Length(3), // Info: type | level | position
        Constraint::Length(bordered_height(element.missing.len())), // Missing
        Constraint::Min(6),    // Attributes (scrollable)
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let header = Paragraph::new(format!(" Element: {} ", element.name))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let info_text = format!(
        "{}  |  #{}  |  Level: {}  |  Element {}/{}",
        element.entity_type,
        element.id,
        app.selected_level_name(),
        app.selected_element + 1,
        app.failing_elements().len()
    );
    let info_widget = Paragraph::new(info_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(info_widget, chunks[1]);

    let missing: Vec<Line> = element
        .missing
        .iter()
        .map(|reason| Line::styled(reason.clone(), Style::default().fg(BRAND_RED)))
        .collect();
    let missing_widget = Paragraph::new(missing).block(
        Block::default()
            .title(format!(" Missing ({}) ", element.missing.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(missing_widget, chunks[2]);

    let attributes = app.selected_attributes();
    let visible = (chunks[3].height as usize).saturating_sub(3);

    let rows: Vec<Row> = attributes
        .iter()
        .skip(app.attribute_scroll_offset)
        .take(visible)
        .map(|(name, value)| Row::new(vec![name.clone(), value.clone()]))
        .collect();

    let widths = [Constraint::Percentage(40), Constraint::Percentage(60)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Attribute", "Value"]).style(HEADER_STYLE))
        .block(
            Block::default()
                .title(format!(" Attributes ({}) ", attributes.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, chunks[3]);

    if attributes.len() > visible {
        draw_scrollbar(frame, chunks[3], attributes.len(), app.attribute_scroll_offset);
    }

    draw_footer(
        frame,
        chunks[4],
        " Esc Back | ↑↓ Scroll | ←→ Element | q Quit ",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bordered_height_saturates() {
        assert_eq!(bordered_height(3), 5);
        assert_eq!(bordered_height(usize::from(u16::MAX) - 1), u16::MAX);
        assert_eq!(bordered_height(1_000_000), u16::MAX);
    }
}
