//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! This module handles rendering the dashboard including:
//! - Header with title and session status badge
//! - Upload Study panel (intake hint or scan progress)
//! - Forensic Output panel (verdict banner, comparison view, zoom view)
//! - Session telemetry with a bar chart of recent confidence values
//! - Footer with available commands
//! - Modal dialogs for the path prompt, help and errors
//!
//! Images are drawn with upper half blocks: each cell shows two vertically
//! stacked pixels, the top one as foreground and the bottom one as background.
//!
//! # Example
//!
//! ```no_run
//! use axiom_intake::tui::app::App;
//! use axiom_intake::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &App) {
//!     render(frame, app);
//! }
//! ```

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
    Frame,
};

use super::app::{Action, App, AppMode};
use super::theme::Theme;
use crate::evidence::{Annotation, Axis, RectBox, Region};
use crate::intake::ACCEPTED_EXTENSIONS;
use crate::ledger::BAR_SCALE_MAX;
use crate::preview::thumbnail::Thumbnail;
use crate::scan::{ScanStatus, Verdict, SCAN_STEPS};

const HALF_BLOCK: &str = "▀";

// ==================== Accessible Mode Helpers ====================

/// Custom ASCII border set for accessible mode.
///
/// Uses simple ASCII characters (+, -, |) instead of Unicode box-drawing
/// characters for better screen reader compatibility.
const ASCII_BORDER_SET: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

fn get_border_set(accessible: bool) -> border::Set {
    if accessible {
        ASCII_BORDER_SET
    } else {
        border::ROUNDED
    }
}

/// Create a block with the appropriate border style for the current mode.
fn create_block(accessible: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(get_border_set(accessible))
}

/// Create a block with title and the appropriate border style.
fn create_block_with_title<'a>(accessible: bool, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(get_border_set(accessible))
        .title(title)
}

/// Area inside a fully bordered block.
fn bordered_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

// ==================== Layout ====================

/// Top-level areas of the dashboard.
struct DashboardAreas {
    header: Rect,
    upload: Rect,
    output: Rect,
    telemetry: Rect,
    footer: Rect,
}

fn split_frame(area: Rect) -> DashboardAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Upload + output
            Constraint::Length(9), // Telemetry
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(rows[1]);

    DashboardAreas {
        header: rows[0],
        upload: columns[0],
        output: columns[1],
        telemetry: rows[2],
        footer: rows[3],
    }
}

/// Areas inside the Forensic Output panel once a verdict is shown.
struct OutputAreas {
    banner: Rect,
    compare: Rect,
    zoom: Rect,
    caption: Rect,
}

fn split_output(inner: Rect) -> OutputAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Verdict banner
            Constraint::Min(3),    // Compare + zoom
            Constraint::Length(1), // Region caption
        ])
        .split(inner);

    let views = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    OutputAreas {
        banner: rows[0],
        compare: views[0],
        zoom: views[1],
        caption: rows[2],
    }
}

/// Cell area of the comparison image for a frame of size `frame_area`.
///
/// `None` unless a verdict is shown. The run loop feeds this to the slider
/// as its container so mouse columns map onto split positions.
#[must_use]
pub fn compare_area(frame_area: Rect, app: &App) -> Option<Rect> {
    if !app.session().status().is_complete() {
        return None;
    }
    let areas = split_frame(frame_area);
    let output = split_output(bordered_inner(areas.output));
    let image = bordered_inner(output.compare);
    (image.width > 0 && image.height > 0).then_some(image)
}

// ==================== Entry Points ====================

/// Render the dashboard at the current time.
pub fn render(frame: &mut Frame, app: &App) {
    render_at(frame, app, Instant::now());
}

/// Render the dashboard as of `now` (drives the scan progress bar).
pub fn render_at(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let areas = split_frame(area);

    render_header(frame, app, areas.header);
    render_upload_panel(frame, app, areas.upload, now);
    render_output_panel(frame, app, areas.output);
    render_telemetry(frame, app, areas.telemetry);
    render_footer(frame, app, areas.footer);

    match app.mode() {
        AppMode::EnteringPath => render_prompt_dialog(frame, app, area),
        AppMode::ShowingHelp => render_help_dialog(frame, app, area),
        _ => {}
    }

    if app.error_message().is_some() {
        render_error_dialog(frame, app, area);
    }
}

// ==================== Header & Footer ====================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let status = app.session().status();

    let mut spans = vec![
        Span::styled(
            "AI Forensic Intake",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | Medical Trust Dashboard", Style::default().fg(theme.dim)),
    ];
    if let Some(name) = app.session().file_name() {
        spans.push(Span::styled(
            format!(" | {}", truncate_string(name, 32)),
            Style::default().fg(theme.normal),
        ));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("[ {} ]", status.badge()),
        Style::default()
            .fg(theme.inverted_fg)
            .bg(theme.status_color(status))
            .add_modifier(Modifier::BOLD),
    ));

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(create_block(app.is_accessible()).border_style(Style::default().fg(theme.primary)));

    frame.render_widget(header, area);
}

/// Render the footer with available commands.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let commands = get_footer_commands(app);

    let spans: Vec<Span> = commands
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    format!("[{}]", key),
                    Style::default()
                        .fg(theme.secondary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} ", desc), Style::default().fg(theme.normal)),
            ]
        })
        .collect();

    let mut block =
        create_block(app.is_accessible()).border_style(Style::default().fg(theme.dim));
    if let Some(status) = app.status_message() {
        block = block.title(Span::styled(
            format!(" {} ", status),
            Style::default().fg(theme.primary),
        ));
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(footer, area);
}

/// Footer hints for the current mode, using the active profile's keys.
fn get_footer_commands(app: &App) -> Vec<(String, &'static str)> {
    let bindings = app.keybindings();
    let hint = |action: Action| (bindings.key_hint(&action), action.description());

    match app.mode() {
        AppMode::Dashboard => {
            let mut commands = Vec::new();
            if app.session().status() != ScanStatus::Scanning {
                commands.push(hint(Action::OpenPrompt));
            }
            if app.session().status().is_complete() {
                commands.push((
                    format!(
                        "{}/{}",
                        bindings.key_hint(&Action::SliderLeft),
                        bindings.key_hint(&Action::SliderRight)
                    ),
                    "Slider",
                ));
            }
            if app.session().status() != ScanStatus::Idle {
                commands.push(hint(Action::Reset));
            }
            commands.extend([
                hint(Action::Export),
                hint(Action::ToggleTheme),
                hint(Action::ShowHelp),
                hint(Action::Quit),
            ]);
            commands
        }
        AppMode::EnteringPath => vec![
            ("Enter".to_string(), "Upload"),
            ("Esc".to_string(), "Cancel"),
        ],
        AppMode::ShowingHelp => vec![("Esc".to_string(), "Close")],
        AppMode::Quitting => Vec::new(),
    }
}

// ==================== Upload Study ====================

fn render_upload_panel(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let theme = app.theme();
    let block = create_block_with_title(app.is_accessible(), " Upload Study ")
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.session().status() {
        ScanStatus::Idle => render_intake_hint(frame, app, inner),
        ScanStatus::Scanning => render_scan_progress(frame, app, inner, now),
        ScanStatus::Authentic | ScanStatus::Tampered => render_scan_summary(frame, app, inner),
    }
}

fn render_intake_hint(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let open_key = app.keybindings().key_hint(&Action::OpenPrompt);

    let lines = vec![
        Line::from(Span::styled(
            "Drop radiology images or clinical photos.",
            Style::default().fg(theme.normal),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Drag a file onto the terminal or paste its path,",
            Style::default().fg(theme.dim),
        )),
        Line::from(vec![
            Span::styled("or press ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("[{}]", open_key),
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to type one.", Style::default().fg(theme.dim)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Accepted: {}", ACCEPTED_EXTENSIONS.join(", ")),
            Style::default().fg(theme.dim),
        )),
    ];

    let hint = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, area);
}

fn render_scan_progress(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let theme = app.theme();
    let Some(progress) = app.session().progress(now) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // File name
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Steps
        ])
        .split(area);

    let name = app.session().file_name().unwrap_or("Analyzing file");
    let file_line = Paragraph::new(truncate_string(name, area.width as usize))
        .style(Style::default().fg(theme.normal).add_modifier(Modifier::BOLD));
    frame.render_widget(file_line, chunks[0]);

    let percent = (progress.fraction * 100.0).floor() as u16;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.primary).bg(theme.dim))
        .percent(percent.min(100))
        .label(format!("{}%", percent.min(100)));
    frame.render_widget(gauge, chunks[1]);

    let steps: Vec<Line> = SCAN_STEPS
        .iter()
        .enumerate()
        .map(|(i, (_, label))| {
            let (marker, style) = if i < progress.step_index {
                (
                    if app.is_accessible() { "[x]" } else { "✓" },
                    Style::default().fg(theme.success),
                )
            } else if i == progress.step_index {
                (
                    if app.is_accessible() { "[>]" } else { "›" },
                    Style::default()
                        .fg(theme.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    if app.is_accessible() { "[ ]" } else { "·" },
                    Style::default().fg(theme.dim),
                )
            };
            Line::from(Span::styled(format!("{marker} {label}"), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(steps)), chunks[3]);
}

fn render_scan_summary(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let session = app.session();

    let mut lines = vec![Line::from(Span::styled(
        truncate_string(session.file_name().unwrap_or_default(), area.width as usize),
        Style::default().fg(theme.normal).add_modifier(Modifier::BOLD),
    ))];

    if let Some(preview) = session.preview() {
        lines.push(Line::from(Span::styled(
            preview.summary(),
            Style::default().fg(theme.dim),
        )));
        lines.push(Line::from(vec![
            Span::styled("SHA-256 ", Style::default().fg(theme.dim)),
            Span::styled(
                truncate_string(preview.digest(), 24),
                Style::default().fg(theme.normal),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Scan #{} complete", app.ledger().len()),
        Style::default().fg(theme.status_color(session.status())),
    )));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        area,
    );
}

// ==================== Forensic Output ====================

fn render_output_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let block = create_block_with_title(app.is_accessible(), " Forensic Output ")
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let session = app.session();
    let (Some(result), Some(region), Some(annotation)) =
        (session.result(), session.region(), session.annotation())
    else {
        let text = match session.status() {
            ScanStatus::Scanning => "Synthesizing forensic overlays...",
            _ => "Awaiting study. Results appear here after a scan.",
        };
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, centered_rect(90, 30, inner));
        return;
    };

    let areas = split_output(inner);
    let tampered = result.verdict.is_tampered();
    let verdict_color = if tampered { theme.danger } else { theme.success };

    let (headline, detail) = if tampered {
        (
            "CRITICAL ALERT",
            "Manipulation artifacts detected in the highlighted region.",
        )
    } else {
        ("VERIFIED", "No manipulation artifacts detected.")
    };
    let marker = match (app.is_accessible(), tampered) {
        (true, true) => "[!] ",
        (true, false) => "[OK] ",
        _ => "",
    };
    let banner = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{marker}{headline}  "),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "{} ({} confidence)",
                    result.verdict.label(),
                    result.confidence
                ),
                Style::default().fg(verdict_color),
            ),
        ]),
        Line::from(Span::styled(detail, Style::default().fg(theme.normal))),
    ]);
    frame.render_widget(banner, areas.banner);

    let thumbnail = session.preview().and_then(|p| p.thumbnail());
    let slider = app.slider();

    let compare_block = create_block_with_title(app.is_accessible(), " Analysis | Original ")
        .border_style(Style::default().fg(theme.dim));
    let compare_inner = compare_block.inner(areas.compare);
    frame.render_widget(compare_block, areas.compare);
    frame.render_widget(
        CompareView {
            thumbnail,
            split: slider.position(),
            region,
            rect_box: annotation.rect_box,
            verdict: result.verdict,
            theme,
            accessible: app.is_accessible(),
        },
        compare_inner,
    );

    let zoom_title = format!(
        " Zoom {:.1}x ",
        annotation.zoom_focus.magnification / 100.0
    );
    let zoom_block = create_block_with_title(app.is_accessible(), zoom_title)
        .border_style(Style::default().fg(theme.dim));
    let zoom_inner = zoom_block.inner(areas.zoom);
    frame.render_widget(zoom_block, areas.zoom);
    frame.render_widget(ZoomView { thumbnail, annotation }, zoom_inner);

    let caption = Paragraph::new(format!(
        "Region x={:.0}% y={:.0}% w={:.0}% h={:.0}% | split {:.0}%",
        annotation.rect_box.left,
        annotation.rect_box.top,
        annotation.rect_box.width,
        annotation.rect_box.height,
        slider.handle_offset_percent()
    ))
    .style(Style::default().fg(theme.dim))
    .alignment(Alignment::Center);
    frame.render_widget(caption, areas.caption);
}

/// Before/after view: the analysis overlay left of the split, the original
/// image right of it, with the evidence region outlined.
struct CompareView<'a> {
    thumbnail: Option<&'a Thumbnail>,
    split: f64,
    region: Region,
    rect_box: RectBox,
    verdict: Verdict,
    theme: &'a Theme,
    accessible: bool,
}

impl Widget for CompareView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let tint = if self.verdict.is_tampered() {
            [220, 40, 40]
        } else {
            [40, 200, 120]
        };
        let in_region = |fx: f64, fy: f64| {
            fx >= self.region.x
                && fx <= self.region.x + self.region.w
                && fy >= self.region.y
                && fy <= self.region.y + self.region.h
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let fx = (f64::from(col) + 0.5) / f64::from(area.width);
                let (top_fy, bottom_fy) = half_block_rows(row, area.height);
                let shade = |fy: f64| {
                    let px = base_pixel(self.thumbnail, fx, fy);
                    if fx < self.split {
                        analysis_pixel(px, in_region(fx, fy), tint)
                    } else {
                        px
                    }
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(rgb(shade(top_fy)))
                        .set_bg(rgb(shade(bottom_fy)));
                }
            }
        }

        draw_outline(buf, self.rect_box.project(area), self.theme.highlight, self.accessible);

        let handle_col = ((self.split * f64::from(area.width)).floor() as u16).min(area.width - 1);
        let handle_symbol = if self.accessible { "|" } else { "┃" };
        for row in 0..area.height {
            if let Some(cell) = buf.cell_mut((area.x + handle_col, area.y + row)) {
                cell.set_symbol(handle_symbol)
                    .set_fg(self.theme.secondary)
                    .set_bg(Color::Reset);
            }
        }
        let grip_row = area.y + area.height / 2;
        if let Some(cell) = buf.cell_mut((area.x + handle_col, grip_row)) {
            cell.set_symbol(if self.accessible { "#" } else { "◆" });
        }
    }
}

/// Magnified view of the evidence region.
struct ZoomView<'a> {
    thumbnail: Option<&'a Thumbnail>,
    annotation: Annotation,
}

impl Widget for ZoomView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let focus = self.annotation.zoom_focus;
        for row in 0..area.height {
            for col in 0..area.width {
                let u = (f64::from(col) + 0.5) / f64::from(area.width);
                let (top_v, bottom_v) = half_block_rows(row, area.height);
                let sx = focus.source_fraction(u, Axis::X);
                let top = base_pixel(self.thumbnail, sx, focus.source_fraction(top_v, Axis::Y));
                let bottom =
                    base_pixel(self.thumbnail, sx, focus.source_fraction(bottom_v, Axis::Y));
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(rgb(top))
                        .set_bg(rgb(bottom));
                }
            }
        }
    }
}

/// Vertical image fractions of the two pixels in cell row `row`.
fn half_block_rows(row: u16, height: u16) -> (f64, f64) {
    let pixel_rows = f64::from(height) * 2.0;
    let top = (f64::from(row) * 2.0 + 0.5) / pixel_rows;
    let bottom = (f64::from(row) * 2.0 + 1.5) / pixel_rows;
    (top, bottom)
}

fn base_pixel(thumbnail: Option<&Thumbnail>, fx: f64, fy: f64) -> [u8; 3] {
    match thumbnail {
        Some(t) => t.sample(fx, fy),
        None => synthetic_pixel(fx, fy),
    }
}

/// Radial grayscale stand-in for files that could not be decoded.
fn synthetic_pixel(fx: f64, fy: f64) -> [u8; 3] {
    let dx = fx - 0.5;
    let dy = fy - 0.5;
    let falloff = (1.0 - (dx * dx + dy * dy).sqrt() * 2.0).clamp(0.0, 1.0);
    let v = (24.0 + 176.0 * falloff) as u8;
    [v, v, v]
}

/// Desaturate, and blend the region with the verdict tint.
fn analysis_pixel(px: [u8; 3], in_region: bool, tint: [u8; 3]) -> [u8; 3] {
    let luma = 0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]);
    if in_region {
        let blend = |t: u8| (0.45 * luma + 0.55 * f64::from(t)) as u8;
        [blend(tint[0]), blend(tint[1]), blend(tint[2])]
    } else {
        let l = (luma * 0.7) as u8;
        [l / 2, l, l]
    }
}

fn rgb(px: [u8; 3]) -> Color {
    Color::Rgb(px[0], px[1], px[2])
}

/// Outline `rect` in `color`, keeping the underlying cell background.
fn draw_outline(buf: &mut Buffer, rect: Rect, color: Color, accessible: bool) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let set = get_border_set(accessible);
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;

    let mut paint = |x: u16, y: u16, symbol: &str| {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(symbol).set_fg(color);
        }
    };

    for x in rect.x..=right {
        paint(x, rect.y, set.horizontal_top);
        paint(x, bottom, set.horizontal_bottom);
    }
    for y in rect.y..=bottom {
        paint(rect.x, y, set.vertical_left);
        paint(right, y, set.vertical_right);
    }
    if rect.width > 1 && rect.height > 1 {
        paint(rect.x, rect.y, set.top_left);
        paint(right, rect.y, set.top_right);
        paint(rect.x, bottom, set.bottom_left);
        paint(right, bottom, set.bottom_right);
    }
}

// ==================== Telemetry ====================

fn render_telemetry(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let snapshot = app.ledger().snapshot();
    let telemetry = &snapshot.telemetry;

    let block = create_block_with_title(app.is_accessible(), " Session Telemetry ")
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(inner);

    let stat = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{label:<12}"), Style::default().fg(theme.dim)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };
    let stats = Paragraph::new(vec![
        stat("Scans", telemetry.total.to_string(), theme.normal),
        stat("Authentic", telemetry.authentic.to_string(), theme.success),
        stat("Tampered", telemetry.tampered.to_string(), theme.danger),
        stat(
            "Tamper rate",
            format!("{:.1}%", telemetry.tampered_rate()),
            theme.secondary,
        ),
    ]);
    frame.render_widget(stats, columns[0]);

    if telemetry.recent.is_empty() {
        let empty = Paragraph::new("No completed scans yet.")
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center);
        frame.render_widget(empty, columns[1]);
        return;
    }

    let bars: Vec<Bar> = telemetry
        .recent
        .iter()
        .zip(&telemetry.bar_heights)
        .enumerate()
        .map(|(i, (record, height))| {
            let color = if record.verdict() == Verdict::Tampered {
                theme.danger
            } else {
                theme.success
            };
            Bar::default()
                .value(*height)
                .label(Line::from(format!("#{}", telemetry.total - telemetry.recent.len() + i + 1)))
                .text_value(format!("{:.0}", record.confidence().as_percent()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme.inverted_fg).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .max(BAR_SCALE_MAX);
    frame.render_widget(chart, columns[1]);
}

// ==================== Dialogs ====================

fn render_prompt_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(60, 20, area);
    frame.render_widget(Clear, dialog_area);

    let cursor = if app.is_accessible() { "_" } else { "█" };
    let prompt = Paragraph::new(vec![
        Line::from(Span::styled(
            "Path to study (quoted paths and file:// URIs work):",
            Style::default().fg(theme.dim),
        )),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.secondary)),
            Span::styled(app.input().to_string(), Style::default().fg(theme.normal)),
            Span::styled(cursor, Style::default().fg(theme.secondary)),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(
        create_block_with_title(app.is_accessible(), " Upload Study ")
            .border_style(Style::default().fg(theme.primary)),
    );

    frame.render_widget(prompt, dialog_area);
}

fn render_help_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, dialog_area);

    let bindings = app.keybindings();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keybinding Reference",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Profile: ", Style::default().fg(theme.dim)),
            Span::styled(
                bindings.profile().display_name(),
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    for action in Action::all() {
        lines.push(format_help_line(theme, &bindings.key_hints(action), action.description()));
    }
    lines.push(format_help_line(theme, "Mouse", "Drag the slider handle"));
    lines.push(format_help_line(theme, "Paste", "Upload a dropped path"));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(theme.dim),
    )));

    let help = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(
            create_block_with_title(app.is_accessible(), "Help")
                .border_style(Style::default().fg(theme.primary)),
        );

    frame.render_widget(help, dialog_area);
}

fn format_help_line<'a>(theme: &Theme, keys: &str, desc: &'static str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("  {:>14}", keys),
            Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", desc), Style::default().fg(theme.normal)),
    ])
}

fn render_error_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(60, 25, area);
    frame.render_widget(Clear, dialog_area);

    let message = app.error_message().unwrap_or("Unknown error");

    let error = Paragraph::new(vec![
        Line::from(Span::styled(
            "Error",
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(theme.dim),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(create_block(app.is_accessible()).border_style(Style::default().fg(theme.danger)));

    frame.render_widget(error, dialog_area);
}

// ==================== Helper Functions ====================

/// Truncate a string with ellipsis if it exceeds `max_len` characters.
///
/// # Examples
///
/// ```
/// use axiom_intake::tui::ui::truncate_string;
///
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Create a centered rectangle with given percentage of parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("hi", 2), "hi");
        assert_eq!(truncate_string("hello", 3), "...");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("Röntgenbild.png", 8), "Röntg...");
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_half_block_rows() {
        let (top, bottom) = half_block_rows(0, 2);
        assert!((top - 0.125).abs() < 1e-9);
        assert!((bottom - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_pixel_tints_region() {
        let px = analysis_pixel([100, 100, 100], true, [220, 40, 40]);
        assert!(px[0] > px[1]);
        let outside = analysis_pixel([100, 100, 100], false, [220, 40, 40]);
        assert!(outside[0] < outside[1]);
    }

    #[test]
    fn test_synthetic_pixel_brightest_at_center() {
        let center = synthetic_pixel(0.5, 0.5)[0];
        let corner = synthetic_pixel(0.0, 0.0)[0];
        assert!(center > corner);
    }

    #[test]
    fn test_draw_outline_stays_in_rect() {
        let area = Rect::new(0, 0, 10, 6);
        let mut buf = Buffer::empty(area);
        draw_outline(&mut buf, Rect::new(2, 1, 4, 3), Color::Magenta, true);
        assert_eq!(buf[(2, 1)].symbol(), "+");
        assert_eq!(buf[(3, 1)].symbol(), "-");
        assert_eq!(buf[(2, 2)].symbol(), "|");
        assert_eq!(buf[(7, 1)].symbol(), " ");
    }
}
