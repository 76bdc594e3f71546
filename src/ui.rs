use crate::app::App;
use crate::chart::{self, ChartConfig, EARNINGS};
use crate::i18n::t;
use crate::types::Section;
use chrono::{Datelike, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

// Palette lifted from the site: primary green, violet accent, coral for the
// estimate series.
const PRIMARY: Color = Color::Rgb(0, 229, 160);
const SECONDARY: Color = Color::Rgb(123, 97, 255);
const ACCENT: Color = Color::Rgb(255, 107, 107);
const MUTED: Color = Color::Rgb(100, 116, 139);

const TOOL_NAMES: [&str; 7] = [
    "GET_MARKET_NEWS",
    "GET_COMPANY_NEWS",
    "GET_EARNINGS_CALENDAR",
    "GET_QUOTE",
    "GET_BASIC_FINANCIALS",
    "GET_EARNING_SURPRISES",
    "SET_CHART",
];

const REPO_URL: &str = "https://github.com/robbintech2019/FINSAGE_MCP";

const STEP2_CODE: &str = "git clone https://github.com/robbintech2019/FINSAGE_MCP.git\ncd FINSAGE_MCP\npip install -r requirements.txt";
const STEP3_CODE: &str = "FINNHUB_API_KEY=tu_api_key_aqui";
const STEP4_CODE: &str = "{\n  \"mcpServers\": {\n    \"finsage\": {\n      \"command\": \"python\",\n      \"args\": [\"/ruta/a/server.py\"]\n    }\n  }\n}";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_nav(f, app, chunks[0]);

    match app.section {
        Section::Hero => render_hero(f, app, chunks[1]),
        Section::UseCases => render_use_cases(f, app, chunks[1]),
        Section::Tools => render_tools(f, app, chunks[1]),
        Section::Install => render_install(f, app, chunks[1]),
    }

    // The chat demo is the only chart host; off the hero page the target
    // must read as detached so a pending mount keeps deferring.
    if app.section != Section::Hero {
        app.chart_target.detach();
    }

    render_status_bar(f, app, chunks[2]);
    render_hints(f, chunks[3]);
}

fn render_nav(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" FinSage MCP ", Style::default().fg(Color::Black).bg(PRIMARY).bold()),
        Span::raw("  "),
    ];
    for section in Section::ALL {
        let label = format!(" {} ", t!(section.title_key()));
        let style = if section == app.section {
            Style::default().fg(PRIMARY).bold().underlined()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).bg(Color::Black), area);
}

fn render_hero(f: &mut Frame, app: &App, area: Rect) {
    // Side-by-side only when the chat window has room to breathe; on a
    // narrow terminal the demo is hidden and its target detached.
    if area.width >= 80 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(area);
        render_hero_copy(f, app, columns[0]);
        render_chat_demo(f, app, columns[1]);
    } else {
        app.chart_target.detach();
        render_hero_copy(f, app, area);
    }
}

fn render_hero_copy(f: &mut Frame, app: &App, area: Rect) {
    let year = Local::now().year();
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", t!("hero.tag")),
            Style::default().fg(SECONDARY).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled(t!("hero.title1"), Style::default().fg(PRIMARY).bold())),
        Line::from(Span::styled(t!("hero.title2"), Style::default().fg(Color::White).bold())),
        Line::raw(""),
        Line::from(Span::styled(t!("hero.description"), Style::default().fg(Color::Gray))),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                format!("[ {} ]", t!("hero.get_started")),
                Style::default().fg(Color::Black).bg(PRIMARY).bold(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[ {} ]", t!("hero.view_on_github")),
                Style::default().fg(PRIMARY),
            ),
        ]),
        Line::raw(""),
        Line::from(Span::styled(REPO_URL, Style::default().fg(MUTED))),
        Line::raw(""),
        Line::from(Span::styled(t!("footer.made_with"), Style::default().fg(MUTED))),
        Line::from(Span::styled(
            format!("© {year} FinSage MCP. {}", t!("footer.all_rights")),
            Style::default().fg(MUTED),
        )),
    ];

    let copy = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_y, 0));
    f.render_widget(copy, area.inner(ratatui::layout::Margin::new(2, 1)));
}

/// The simulated AI-assistant window around the earnings chart.
fn render_chat_demo(f: &mut Frame, app: &App, area: Rect) {
    let window = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(Line::from(vec![
            Span::styled(" ● ", Style::default().fg(ACCENT)),
            Span::styled("● ", Style::default().fg(Color::Yellow)),
            Span::styled("● ", Style::default().fg(PRIMARY)),
            Span::styled(format!(" {} ", t!("chat.assistant")), Style::default().fg(Color::Gray)),
        ]));
    let inner = window.inner(area);
    f.render_widget(window, area);

    if inner.height < 10 {
        app.chart_target.detach();
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // user question bubble
            Constraint::Length(2), // chart header
            Constraint::Length(4), // metrics tiles
            Constraint::Min(5),    // chart canvas
            Constraint::Length(1), // latest values readout
            Constraint::Length(5), // insights
        ])
        .split(inner);

    render_question(f, rows[0]);
    render_chart_header(f, rows[1]);
    render_metrics(f, rows[2]);

    app.chart_target.attach(rows[3]);
    // The instance draws on the region its target records.
    let mounted = app
        .chart
        .as_ref()
        .and_then(|instance| instance.area().map(|canvas| (instance, canvas)));
    match mounted {
        Some((instance, canvas)) => {
            render_chart(f, canvas, instance.config());
            render_readout(f, rows[4], instance.config());
        }
        None => {
            f.render_widget(
                Paragraph::new("…").alignment(Alignment::Center).fg(MUTED),
                rows[3],
            );
        }
    }

    render_insights(f, rows[5]);
}

fn render_question(f: &mut Frame, area: Rect) {
    if area.width < 8 {
        return;
    }
    let question = t!("chat.question");
    // Size the bubble to its content, hugging the right edge like a sent
    // message; width is display columns, not bytes.
    let max_width = area.width.saturating_sub(2);
    let width = (question.width() as u16 / 2 + 3).clamp(1, max_width);
    let bubble = Rect::new(area.right().saturating_sub(width), area.y, width, area.height);

    f.render_widget(
        Paragraph::new(question)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::White).bg(Color::Rgb(40, 36, 75))),
        bubble,
    );
}

fn render_chart_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::raw("📈 "),
            Span::styled(t!("chat.title"), Style::default().fg(Color::White).bold()),
        ]),
        Line::from(vec![
            Span::styled(t!("chat.line_chart"), Style::default().fg(MUTED)),
            Span::raw("  "),
            Span::styled(" LINE ", Style::default().fg(SECONDARY).bold()),
            Span::raw(" "),
            Span::styled(
                format!(" ⚡ {} ", t!("chat.live")),
                Style::default().fg(PRIMARY).bold(),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_metrics(f: &mut Frame, area: Rect) {
    let stats = chart::surprise_stats(&EARNINGS);
    let up = stats.last_surprise_pct >= 0.0;
    let beat_healthy = stats.beats * 2 >= stats.total;

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let beats = stats.beats.to_string();
    let total = stats.total.to_string();
    render_metric_tile(
        f,
        tiles[0],
        t!("chat.latest_eps"),
        format!("{} {}", chart::currency(stats.latest_actual), if up { "↑" } else { "↓" }),
        Color::White,
    );
    render_metric_tile(
        f,
        tiles[1],
        t!("chat.last_surprise"),
        format!("{} {}", chart::signed_percent(stats.last_surprise_pct), if up { "↑" } else { "↓" }),
        if up { PRIMARY } else { ACCENT },
    );
    render_metric_tile(
        f,
        tiles[2],
        t!("chat.beat_rate"),
        format!(
            "{} {}",
            t!("chat.beat_of", beats = beats, total = total),
            if beat_healthy { "↑" } else { "↓" }
        ),
        if beat_healthy { PRIMARY } else { ACCENT },
    );
}

fn render_metric_tile(f: &mut Frame, area: Rect, label: String, value: String, value_color: Color) {
    let tile = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(51, 65, 85)));
    let inner = tile.inner(area);
    f.render_widget(tile, area);

    let lines = vec![
        Line::from(Span::styled(label, Style::default().fg(MUTED))),
        Line::from(Span::styled(value, Style::default().fg(value_color).bold())),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_chart(f: &mut Frame, area: Rect, config: &ChartConfig) {
    let datasets: Vec<Dataset> = config
        .series
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series.color))
                .data(&series.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, config.x_labels.len().saturating_sub(1) as f64])
                .labels(config.x_labels.iter().map(String::as_str)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds(config.y_bounds)
                .labels(config.y_labels.iter().map(String::as_str)),
        );
    f.render_widget(chart, area);
}

/// One-line snapshot of the latest quarter, in lieu of a hover tooltip.
fn render_readout(f: &mut Frame, area: Rect, config: &ChartConfig) {
    let spans: Vec<Span> = config
        .series
        .iter()
        .enumerate()
        .flat_map(|(i, series)| {
            let value = series.points.last().map(|&(_, y)| y).unwrap_or(0.0);
            let mut out = Vec::new();
            if i > 0 {
                out.push(Span::styled(" · ", Style::default().fg(MUTED)));
            }
            out.push(Span::styled(
                format!("{}: ", series.name),
                Style::default().fg(MUTED),
            ));
            out.push(Span::styled(
                (config.value_formatter)(value),
                Style::default().fg(series.color).bold(),
            ));
            out
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn render_insights(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        format!("💡 {}", t!("chat.insights")),
        Style::default().fg(PRIMARY).bold(),
    ))];
    for i in 1..=4 {
        lines.push(Line::from(vec![
            Span::styled("• ", Style::default().fg(PRIMARY)),
            Span::styled(t!(format!("chat.insight{i}").as_str()), Style::default().fg(Color::Gray)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_use_cases(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = section_heading("use_cases.tag", "use_cases.title", "use_cases.description");
    for i in 1..=3 {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("❯ ", Style::default().fg(SECONDARY).bold()),
            Span::styled(
                app.store.text(&format!("use_cases.demo{i}")),
                Style::default().fg(Color::White),
            ),
        ]));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_y, 0));
    f.render_widget(body, area.inner(ratatui::layout::Margin::new(2, 1)));
}

fn render_tools(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = section_heading("tools.tag", "tools.title", "tools.description");
    for (i, name) in TOOL_NAMES.iter().enumerate() {
        let mut header = vec![Span::styled(*name, Style::default().fg(PRIMARY).bold())];
        // SET_CHART is the newest tool; it carries the badge from the site.
        if i == TOOL_NAMES.len() - 1 {
            header.push(Span::raw(" "));
            header.push(Span::styled(
                format!(" {} ", t!("tools.new")),
                Style::default().fg(Color::Black).bg(SECONDARY).bold(),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(
            app.store.text(&format!("tools.tool{}", i + 1)),
            Style::default().fg(Color::Gray),
        )));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_y, 0));
    f.render_widget(body, area.inner(ratatui::layout::Margin::new(2, 1)));
}

fn render_install(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = section_heading("install.tag", "install.title", "install.description");

    let steps: [(String, Option<String>, Option<&str>); 4] = [
        (t!("install.step1_title"), Some(t!("install.step1_desc")), None),
        (t!("install.step2_title"), None, Some(STEP2_CODE)),
        (t!("install.step3_title"), None, Some(STEP3_CODE)),
        (t!("install.step4_title"), None, Some(STEP4_CODE)),
    ];

    for (i, (title, desc, code)) in steps.into_iter().enumerate() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::Black).bg(PRIMARY).bold()),
            Span::raw(" "),
            Span::styled(title, Style::default().fg(Color::White).bold()),
        ]));
        if let Some(desc) = desc {
            lines.push(Line::from(Span::styled(desc, Style::default().fg(Color::Gray))));
        }
        if let Some(code) = code {
            lines.push(Line::from(Span::styled(
                format!("   {}", t!("install.terminal")),
                Style::default().fg(PRIMARY),
            )));
            for code_line in code.lines() {
                lines.push(Line::from(Span::styled(
                    format!("   $ {code_line}"),
                    Style::default().fg(Color::Gray).bg(Color::Black),
                )));
            }
        }
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_y, 0));
    f.render_widget(body, area.inner(ratatui::layout::Margin::new(2, 1)));
}

fn section_heading(tag_key: &str, title_key: &str, desc_key: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!(" {} ", t!(tag_key)),
            Style::default().fg(SECONDARY).bold(),
        )),
        Line::from(Span::styled(t!(title_key), Style::default().fg(PRIMARY).bold())),
        Line::from(Span::styled(t!(desc_key), Style::default().fg(Color::Gray))),
    ]
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let locale = app.store.get();
    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", locale.code().to_uppercase()),
            Style::default().bg(Color::Blue).fg(Color::Black).bold(),
        ),
        Span::raw(" "),
        Span::raw(app.store.text(app.section.title_key())),
    ]);
    f.render_widget(Paragraph::new(left).bg(Color::DarkGray), status_chunks[0]);

    let current = (app.section.index() + 1).to_string();
    let total = Section::ALL.len().to_string();
    let right = Line::from(Span::styled(
        format!("{} ", t!("status.section_of", current = current, total = total)),
        Style::default().fg(Color::Cyan),
    ));
    f.render_widget(
        Paragraph::new(right).alignment(Alignment::Right).bg(Color::DarkGray),
        status_chunks[1],
    );
}

fn render_hints(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(t!("hints.normal")).bg(Color::Black).fg(Color::Gray),
        area,
    );
}
