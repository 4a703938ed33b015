pub mod charting;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use retype::{
    render::{SpanStyle, StyledSpan},
    Completion,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn style_for(style: SpanStyle) -> Style {
    let dim_bold_style = bold().add_modifier(Modifier::DIM);
    match style {
        SpanStyle::Correct => bold().fg(Color::Green),
        SpanStyle::Incorrect => bold().fg(Color::Red),
        SpanStyle::Cursor => dim_bold_style.add_modifier(Modifier::UNDERLINED),
        SpanStyle::Default => dim_bold_style,
    }
}

struct Cell {
    text: String,
    style: SpanStyle,
}

/// Projected spans laid out for a panel of fixed width.
pub struct WrappedText {
    pub lines: Vec<Line<'static>>,
    pub cursor_row: Option<usize>,
}

/// Word-wrap projected spans at `width` columns.
///
/// Newlines in the reference break the line; when the cursor or a mistake
/// sits on one it is drawn as `↵` first. Mistyped spaces show as `·`. Words
/// wider than the panel are split across rows.
pub fn wrap_spans(spans: &[StyledSpan], width: u16) -> WrappedText {
    let mut wrapper = Wrapper::new(width);
    let mut word: Vec<Cell> = Vec::new();

    for span in spans {
        for g in span.text.graphemes(true) {
            if !matches!(g, " " | "\t" | "\n") {
                word.push(Cell {
                    text: display_text(g, span.style),
                    style: span.style,
                });
                continue;
            }

            wrapper.push_word(std::mem::take(&mut word));
            if g == "\n" {
                if matches!(span.style, SpanStyle::Cursor | SpanStyle::Incorrect) {
                    wrapper.push_cell(Cell {
                        text: "↵".to_string(),
                        style: span.style,
                    });
                }
                wrapper.break_row();
            } else {
                wrapper.push_cell(Cell {
                    text: display_text(g, span.style),
                    style: span.style,
                });
            }
        }
    }
    wrapper.push_word(word);

    let lines = wrapper
        .rows
        .into_iter()
        .map(|row| {
            let runs = row.into_iter().chunk_by(|c| c.style);
            let spans: Vec<Span<'static>> = runs
                .into_iter()
                .map(|(style, cells)| {
                    Span::styled(cells.map(|c| c.text).collect::<String>(), style_for(style))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    WrappedText {
        lines,
        cursor_row: wrapper.cursor_row,
    }
}

struct Wrapper {
    width: usize,
    rows: Vec<Vec<Cell>>,
    row_width: usize,
    cursor_row: Option<usize>,
}

impl Wrapper {
    fn new(width: u16) -> Self {
        Self {
            width: width.max(1) as usize,
            rows: vec![Vec::new()],
            row_width: 0,
            cursor_row: None,
        }
    }

    fn break_row(&mut self) {
        self.rows.push(Vec::new());
        self.row_width = 0;
    }

    fn push_cell(&mut self, cell: Cell) {
        let width = cell.text.width();
        if self.row_width > 0 && self.row_width + width > self.width {
            self.break_row();
        }
        if cell.style == SpanStyle::Cursor {
            self.cursor_row = Some(self.rows.len() - 1);
        }
        self.row_width += width;
        if let Some(row) = self.rows.last_mut() {
            row.push(cell);
        }
    }

    fn push_word(&mut self, word: Vec<Cell>) {
        let width: usize = word.iter().map(|c| c.text.width()).sum();
        if self.row_width > 0 && self.row_width + width > self.width && width <= self.width {
            self.break_row();
        }
        for cell in word {
            self.push_cell(cell);
        }
    }
}

fn display_text(g: &str, style: SpanStyle) -> String {
    let visible = matches!(style, SpanStyle::Cursor | SpanStyle::Incorrect);
    match g {
        " " if style == SpanStyle::Incorrect => "·".to_string(),
        "\t" if visible => "⇥   ".to_string(),
        "\t" => "    ".to_string(),
        g => g.to_string(),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = app.session.current_stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // countdown + live stats
            Constraint::Length(1), // padding
            Constraint::Min(3),    // text panel
        ])
        .split(area);

    let error_style = if stats.errors > 0 {
        bold().fg(Color::Red)
    } else {
        bold().add_modifier(Modifier::DIM)
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!("{}s", stats.remaining_seconds), bold()),
        Span::raw("   "),
        Span::styled(
            format!("{:.0} wpm", stats.wpm),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("   "),
        Span::styled(format!("{} errors", stats.errors), error_style),
    ]))
    .alignment(Alignment::Center);
    header.render(chunks[0], buf);

    let panel = chunks[2];
    let inner_width = panel.width.saturating_sub(2);
    let inner_height = panel.height.saturating_sub(2) as usize;
    let wrapped = wrap_spans(&app.session.current_spans(), inner_width);
    let scroll = wrapped
        .cursor_row
        .unwrap_or(0)
        .saturating_sub(inner_height / 2)
        .min(u16::MAX as usize) as u16;

    let text = Paragraph::new(wrapped.lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(format!(" {} ", app.settings.title)),
        )
        .scroll((scroll, 0));
    text.render(panel, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let results = app.session.results();
    let bold_style = bold();
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // how it ended
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let history = app.session.history();
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(history, app.session.clock().duration_seconds());
    let points: Vec<(f64, f64)> = history.iter().copied().map(Into::into).collect();

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} errors   {:.2} sd",
            results.wpm, results.accuracy, results.errors, results.consistency
        ),
        bold_style,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let ending = match results.completion {
        Some(Completion::TimeUp) => "time's up",
        Some(Completion::Aborted) => "aborted",
        _ => "finished",
    };
    Paragraph::new(Span::styled(
        format!("{ending} after {}s", results.elapsed_seconds),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let legend = if app.settings.source.is_generated() {
        "(r)etry / (n)ew / (esc)ape"
    } else {
        "(r)etry / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style))
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);
}
