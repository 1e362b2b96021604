//! Deterministic background pattern geometry.
//!
//! Each pattern is a fixed function of the badge canvas size: no randomness,
//! no per-render variation. The trig-heavy coordinate sets are computed once
//! per process and reused, so repeated renders of the same spec stay
//! structurally identical; the purely linear layouts (grid, dots, circuits)
//! are cheap enough to emit directly.

use std::sync::OnceLock;

use crate::document::Element;
use crate::render::{BADGE_HEIGHT, BADGE_WIDTH};
use crate::spec::PatternKind;

const WIDTH: f64 = BADGE_WIDTH as f64;
const HEIGHT: f64 = BADGE_HEIGHT as f64;

/// Builds the pattern layer for the given kind, or `None` for
/// [`PatternKind::None`].
///
/// The returned group is clipped to the canvas and carries the layer opacity;
/// individual shapes carry the stroke/fill color.
pub(crate) fn group(kind: PatternKind, color: &str, opacity: f32) -> Option<Element> {
    let shapes: Vec<Element> = match kind {
        PatternKind::None => return None,
        PatternKind::Radial => radial(color),
        PatternKind::Grid => grid(color),
        PatternKind::Dots => dots(color),
        PatternKind::Waves => waves(color),
        PatternKind::Hexagons => hexagons(color),
        PatternKind::Circuits => circuits(color),
    };

    Some(
        Element::new("g")
            .attr("clip-path", "url(#bgClip)")
            .attr("opacity", opacity)
            .children(shapes),
    )
}

// ============================================================================
// Radial: lines fanning from center plus concentric octagons
// ============================================================================

fn radial_lines() -> &'static [(i64, i64)] {
    static LINES: OnceLock<Vec<(i64, i64)>> = OnceLock::new();
    LINES.get_or_init(|| {
        (0..24)
            .map(|i| {
                let angle = (i as f64 * 15.0).to_radians();
                (
                    (WIDTH / 2.0 + angle.cos() * 1400.0).round() as i64,
                    (HEIGHT / 2.0 + angle.sin() * 1400.0).round() as i64,
                )
            })
            .collect()
    })
}

fn octagon_points() -> &'static [String] {
    static OCTAGONS: OnceLock<Vec<String>> = OnceLock::new();
    OCTAGONS.get_or_init(|| {
        [200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]
            .iter()
            .map(|size| {
                (0..8)
                    .map(|i| {
                        let angle = (i as f64 * 45.0 - 22.5).to_radians();
                        format!(
                            "{},{}",
                            (WIDTH / 2.0 + angle.cos() * size).round() as i64,
                            (HEIGHT / 2.0 + angle.sin() * size).round() as i64,
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    })
}

fn radial(color: &str) -> Vec<Element> {
    let mut shapes: Vec<Element> = radial_lines()
        .iter()
        .map(|(x2, y2)| {
            Element::new("line")
                .attr("x1", WIDTH / 2.0)
                .attr("y1", HEIGHT / 2.0)
                .attr("x2", *x2)
                .attr("y2", *y2)
                .attr("stroke", color)
                .attr("stroke-width", 2)
        })
        .collect();

    shapes.extend(octagon_points().iter().map(|points| {
        Element::new("polygon")
            .attr("points", points)
            .attr("fill", "none")
            .attr("stroke", color)
            .attr("stroke-width", 1.5)
    }));

    shapes
}

// ============================================================================
// Grid: evenly spaced vertical and horizontal lines
// ============================================================================

fn grid(color: &str) -> Vec<Element> {
    let mut shapes = Vec::new();
    for i in 0..22 {
        shapes.push(
            Element::new("line")
                .attr("x1", i * 50)
                .attr("y1", 0)
                .attr("x2", i * 50)
                .attr("y2", BADGE_HEIGHT)
                .attr("stroke", color)
                .attr("stroke-width", 1),
        );
    }
    for i in 0..33 {
        shapes.push(
            Element::new("line")
                .attr("x1", 0)
                .attr("y1", i * 50)
                .attr("x2", BADGE_WIDTH)
                .attr("y2", i * 50)
                .attr("stroke", color)
                .attr("stroke-width", 1),
        );
    }
    shapes
}

// ============================================================================
// Dots: evenly spaced point grid
// ============================================================================

fn dots(color: &str) -> Vec<Element> {
    let mut shapes = Vec::new();
    for i in 0..22 {
        for j in 0..33 {
            shapes.push(
                Element::new("circle")
                    .attr("cx", i * 50 + 25)
                    .attr("cy", j * 50 + 25)
                    .attr("r", 3)
                    .attr("fill", color),
            );
        }
    }
    shapes
}

// ============================================================================
// Waves: stacked sinusoidal paths
// ============================================================================

fn wave_paths() -> &'static [String] {
    static WAVES: OnceLock<Vec<String>> = OnceLock::new();
    WAVES.get_or_init(|| {
        (0..20)
            .map(|i| {
                let y = i * 80 + 40;
                format!(
                    "M 0 {y} Q {q} {top} {mid} {y} T {w} {y}",
                    q = BADGE_WIDTH / 4,
                    top = i * 80,
                    mid = BADGE_WIDTH / 2,
                    w = BADGE_WIDTH,
                )
            })
            .collect()
    })
}

fn waves(color: &str) -> Vec<Element> {
    wave_paths()
        .iter()
        .map(|d| {
            Element::new("path")
                .attr("d", d)
                .attr("fill", "none")
                .attr("stroke", color)
                .attr("stroke-width", 1.5)
        })
        .collect()
}

// ============================================================================
// Hexagons: tessellated hex outline grid
// ============================================================================

fn hexagon_points() -> &'static [String] {
    static HEXAGONS: OnceLock<Vec<String>> = OnceLock::new();
    HEXAGONS.get_or_init(|| {
        let size = 60.0_f64;
        let mut cells = Vec::with_capacity(12 * 10);
        for row in 0..12 {
            let x_offset = if row % 2 == 0 { 0.0 } else { size * 0.866 };
            for col in 0..10 {
                let x = (col as f64 * size * 1.732 + x_offset).round();
                let y = (row as f64 * size * 1.5).round();
                let points = (0..6)
                    .map(|i| {
                        let angle = (i as f64 * 60.0 - 30.0).to_radians();
                        format!(
                            "{},{}",
                            (x + angle.cos() * size).round() as i64,
                            (y + angle.sin() * size).round() as i64,
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                cells.push(points);
            }
        }
        cells
    })
}

fn hexagons(color: &str) -> Vec<Element> {
    hexagon_points()
        .iter()
        .map(|points| {
            Element::new("polygon")
                .attr("points", points)
                .attr("fill", "none")
                .attr("stroke", color)
                .attr("stroke-width", 1)
        })
        .collect()
}

// ============================================================================
// Circuits: dashed verticals with node circles, plus dashed horizontals
// ============================================================================

fn circuits(color: &str) -> Vec<Element> {
    let mut shapes = Vec::new();
    for i in 0..15 {
        let x = (i * 75) % BADGE_WIDTH;
        let mut column = Element::new("g").child(
            Element::new("line")
                .attr("x1", x)
                .attr("y1", 0)
                .attr("x2", x)
                .attr("y2", BADGE_HEIGHT)
                .attr("stroke", color)
                .attr("stroke-width", 1)
                .attr("stroke-dasharray", "10,20"),
        );
        for j in 0..8 {
            column = column.child(
                Element::new("circle")
                    .attr("cx", x)
                    .attr("cy", j * 200 + 100)
                    .attr("r", 4)
                    .attr("fill", color),
            );
        }
        shapes.push(column);
    }
    for i in 0..10 {
        shapes.push(
            Element::new("line")
                .attr("x1", 0)
                .attr("y1", i * 160 + 80)
                .attr("x2", BADGE_WIDTH)
                .attr("y2", i * 160 + 80)
                .attr("stroke", color)
                .attr("stroke-width", 1)
                .attr("stroke-dasharray", "15,25"),
        );
    }
    shapes
}

// ============================================================================
// Tests
// ============================================================================
