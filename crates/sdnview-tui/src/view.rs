//! Topology drawing and the status line.
//!
//! Layout coordinates are pixels with y growing downward; the ratatui
//! canvas has y growing upward, so every point is flipped on the way in.

use ratatui::{
    Frame,
    layout::{Constraint, Layout as Split, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas as CanvasWidget, Circle, Context, Line as Segment},
    },
};

use sdnview_core::layout::{HOST_NODE_RADIUS, SWITCH_NODE_RADIUS};
use sdnview_core::{Canvas, Position, RenderFrame};

use crate::theme;

/// Approximate pixel size of one terminal cell.
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

/// Layout canvas for a terminal of `cols` x `rows`, minus the border and
/// the status line.
pub fn canvas_for_terminal(cols: u16, rows: u16) -> Canvas {
    let inner_cols = cols.saturating_sub(2);
    let inner_rows = rows.saturating_sub(3);
    Canvas::new(
        f64::from(inner_cols) * CELL_WIDTH_PX,
        f64::from(inner_rows) * CELL_HEIGHT_PX,
    )
}

/// Text for the bottom line.
pub fn status_text(frame: Option<&RenderFrame>, url: &str, auto: bool) -> String {
    let mut line = match frame {
        Some(f) => f.status_line(url),
        None => format!("Loading topology @ {url}"),
    };
    if auto {
        line.push_str("  [auto]");
    }
    line
}

pub fn render(f: &mut Frame, frame: Option<&RenderFrame>, url: &str, auto: bool) {
    let [body, status] =
        Split::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());

    render_topology(f, body, frame);
    render_status(f, status, frame, url, auto);
}

fn render_topology(f: &mut Frame, area: Rect, frame: Option<&RenderFrame>) {
    let block = Block::default()
        .title(" Topology ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border());

    let Some(frame) = frame else {
        f.render_widget(block, area);
        return;
    };

    let layout = &frame.layout;
    let height = layout.canvas.height;
    let flip = move |p: Position| (p.x, height - p.y);

    let canvas = CanvasWidget::default()
        .block(block)
        .x_bounds([0.0, layout.canvas.width])
        .y_bounds([0.0, height])
        .paint(|ctx: &mut Context<'_>| {
            for edge in &layout.edges {
                let (x1, y1) = flip(edge.from);
                let (x2, y2) = flip(edge.to);
                ctx.draw(&Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: theme::LINK_GRAY,
                });
            }
            for host in layout.hosts.values() {
                let (x1, y1) = flip(host.anchor);
                let (x2, y2) = flip(host.position);
                ctx.draw(&Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: theme::HOST_LINK_GREEN,
                });
            }
            ctx.layer();

            for (id, pos) in &layout.switches {
                let (x, y) = flip(*pos);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: SWITCH_NODE_RADIUS,
                    color: theme::SWITCH_BLUE,
                });
                ctx.print(
                    x,
                    y,
                    Span::styled(id.short(), Style::default().fg(theme::SWITCH_BLUE)),
                );
            }
            for (name, host) in &layout.hosts {
                let (x, y) = flip(host.position);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: HOST_NODE_RADIUS,
                    color: theme::HOST_GREEN,
                });
                ctx.print(
                    x,
                    y,
                    Span::styled(name.clone(), Style::default().fg(theme::HOST_GREEN)),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_status(f: &mut Frame, area: Rect, frame: Option<&RenderFrame>, url: &str, auto: bool) {
    let mut spans = vec![Span::raw(" "), Span::raw(status_text(frame, url, auto))];

    if let Some(frame) = frame {
        for failure in &frame.failures {
            spans.push(Span::styled(
                format!("  ! {} unavailable", failure.entity),
                Style::default().fg(theme::WARN_RED),
            ));
        }
    }

    spans.extend([
        Span::styled("  │ ", theme::key_hint()),
        Span::styled("r ", theme::key_hint_key()),
        Span::styled("refresh  ", theme::key_hint()),
        Span::styled("a ", theme::key_hint_key()),
        Span::styled("auto  ", theme::key_hint()),
        Span::styled("q ", theme::key_hint_key()),
        Span::styled("quit", theme::key_hint()),
    ]);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
