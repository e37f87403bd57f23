use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use growth_charts::{
    ByteFetcher, ChartData, Comparison, ComparisonService, Curve, GrowthError, GrowthSession, Indicator,
    ScoreType,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Chart,
    Measurements,
    Preview,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Chart => Page::Measurements,
            Page::Measurements => Page::Preview,
            Page::Preview => Page::Chart,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Chart => Page::Preview,
            Page::Measurements => Page::Chart,
            Page::Preview => Page::Measurements,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Chart => "Chart",
            Page::Measurements => "Measurements",
            Page::Preview => "WHO Preview",
        }
    }
}

pub struct App<F: ByteFetcher> {
    pub session: GrowthSession,
    pub service: ComparisonService<F>,
    pub today: NaiveDate,
    pub indicator: Indicator,
    pub score_type: ScoreType,
    pub current_page: Page,
    pub result: Option<Result<Comparison, GrowthError>>,
}

impl<F: ByteFetcher> App<F> {
    pub fn new(
        session: GrowthSession,
        service: ComparisonService<F>,
        today: NaiveDate,
        indicator: Indicator,
        score_type: ScoreType,
    ) -> Self {
        let mut app = Self {
            session,
            service,
            today,
            indicator,
            score_type,
            current_page: Page::Chart,
            result: None,
        };
        app.refresh();
        app
    }

    /// Re-run the comparison for the current selection
    pub fn refresh(&mut self) {
        self.result = Some(
            self.service
                .compare(&self.session, self.indicator, self.score_type, self.today),
        );
    }

    pub fn next_indicator(&mut self) {
        self.indicator = self.indicator.next();
        self.refresh();
    }

    pub fn previous_indicator(&mut self) {
        self.indicator = self.indicator.previous();
        self.refresh();
    }

    pub fn toggle_score_type(&mut self) {
        self.score_type = self.score_type.toggle();
        self.refresh();
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.result.as_ref().and_then(|r| r.as_ref().ok())
    }

    pub fn error(&self) -> Option<&GrowthError> {
        self.result.as_ref().and_then(|r| r.as_ref().err())
    }
}

pub fn run_ui<F: ByteFetcher>(app: &mut App<F>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, F: ByteFetcher>(
    terminal: &mut Terminal<B>,
    app: &mut App<F>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.current_page = app.current_page.previous();
                    } else {
                        app.current_page = app.current_page.next();
                    }
                }
                KeyCode::BackTab => app.current_page = app.current_page.previous(),
                KeyCode::Right | KeyCode::Char('l') => app.next_indicator(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_indicator(),
                KeyCode::Char('s') => app.toggle_score_type(),
                KeyCode::Char('r') => app.refresh(),
                _ => {}
            }
        }
    }
}

fn ui<F: ByteFetcher>(f: &mut Frame, app: &App<F>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.error() {
        Some(err) => render_error(f, chunks[1], err),
        None => match app.current_page {
            Page::Chart => render_chart(f, chunks[1], app),
            Page::Measurements => render_measurements(f, chunks[1], app),
            Page::Preview => render_preview(f, chunks[1], app),
        },
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<F: ByteFetcher>(f: &mut Frame, area: Rect, app: &App<F>) {
    let pages = [Page::Chart, Page::Measurements, Page::Preview];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let profile = app.session.profile();
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} ({}, {} months)", profile.name, profile.gender.label(), profile.age_months_at(app.today)),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} [{}]", app.indicator.name(), app.score_type.key().to_uppercase()),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn curve_color(curve: Curve) -> Color {
    match curve.color() {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "orange" => Color::LightRed,
        "red" => Color::Red,
        _ => Color::White,
    }
}

fn axis_labels(min: f64, max: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{:.1}", min)),
        Span::raw(format!("{:.1}", (min + max) / 2.0)),
        Span::raw(format!("{:.1}", max)),
    ]
}

fn render_chart<F: ByteFetcher>(f: &mut Frame, area: Rect, app: &App<F>) {
    let Some(comparison) = app.comparison() else {
        return;
    };
    let data: &ChartData = &comparison.chart;

    let mut datasets: Vec<Dataset> = data
        .curves
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.label)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(curve_color(series.curve)))
                .data(&series.points)
        })
        .collect();

    datasets.push(
        Dataset::default()
            .name(data.child_series.label.clone())
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
            .data(&data.child_series.points),
    );

    let ((x0, x1), (y0, y1)) = data.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", data.title)),
        )
        .x_axis(
            Axis::default()
                .title(data.x_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([x0, x1])
                .labels(axis_labels(x0, x1)),
        )
        .y_axis(
            Axis::default()
                .title(data.y_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([y0, y1])
                .labels(axis_labels(y0, y1)),
        );

    f.render_widget(chart, area);
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn render_measurements<F: ByteFetcher>(f: &mut Frame, area: Rect, app: &App<F>) {
    let header_cells = ["Date", "Age (months)", "Weight (kg)", "Height (cm)", "Head (cm)", "BMI"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.session.records().iter().map(|record| {
        let cells = vec![
            Cell::from(record.date().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::from(record.age_months().map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::from(format_cell(record.weight_kg())),
            Cell::from(format_cell(record.height_cm())),
            Cell::from(format_cell(record.head_circ_cm())),
            Cell::from(format_cell(record.bmi())).style(Style::default().fg(Color::Cyan)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(11),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Measurements "),
    );

    f.render_widget(table, area);
}

fn render_preview<F: ByteFetcher>(f: &mut Frame, area: Rect, app: &App<F>) {
    let Some(comparison) = app.comparison() else {
        return;
    };

    let curves = app.score_type.curves();
    let mut titles = vec![comparison.chart.x_label.to_string()];
    titles.extend(curves.iter().map(|c| c.label().to_string()));

    let header = Row::new(
        titles
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().bg(Color::DarkGray));

    let rows = comparison.preview.iter().map(|row| {
        let mut cells = vec![Cell::from(format!("{:.1}", row.x))];
        cells.extend(curves.iter().map(|c| Cell::from(format_cell(row.value(*c)))));
        Row::new(cells)
    });

    let widths = vec![Constraint::Length(14); curves.len() + 1];
    let title = format!(
        " {} (target {}) ",
        comparison.selection.identifier,
        comparison
            .preview_target
            .map(|t| format!("{:.1}", t))
            .unwrap_or_else(|| "-".to_string())
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(table, area);
}

fn render_error(f: &mut Frame, area: Rect, err: &GrowthError) {
    let text = vec![
        Line::from(Span::styled(
            format!("❌ {}", err.kind()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(err.to_string()),
    ];

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)).title(" Error "));

    f.render_widget(panel, area);
}

fn render_status_bar<F: ByteFetcher>(f: &mut Frame, area: Rect, _app: &App<F>) {
    let status_spans = vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Indicator | "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(" Z/P | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Reload | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
