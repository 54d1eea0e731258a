use std::collections::HashMap;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::game::{
    Banner, EnemyShip, EnemyTier, GameManager, MissileKind, Playfield, SpriteFrame,
};

type DotMap = HashMap<(usize, usize), u8>;

const BG: Color = Color::Rgb(0, 0, 8);

// Sprites are offsets in braille pixels around the object's centre.

const PLAYER_SPRITE: &[(i32, i32)] = &[
    (0, -3),
    (-1, -2), (0, -2), (1, -2),
    (-1, -1), (0, -1), (1, -1),
    (-3, 0), (-1, 0), (0, 0), (1, 0), (3, 0),
    (-4, 1), (-3, 1), (-2, 1), (-1, 1), (0, 1), (1, 1), (2, 1), (3, 1), (4, 1),
    (-4, 2), (-2, 2), (2, 2), (4, 2),
];

const BEE: [&[(i32, i32)]; 2] = [
    &[
        (-1, -2), (1, -2),
        (-2, -1), (0, -1), (2, -1),
        (-3, 0), (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0), (3, 0),
        (-1, 1), (0, 1), (1, 1),
        (-2, 2), (2, 2),
    ],
    &[
        (-1, -2), (1, -2),
        (-2, -1), (0, -1), (2, -1),
        (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0),
        (-3, 1), (-1, 1), (0, 1), (1, 1), (3, 1),
        (-1, 2), (1, 2),
    ],
];

const BUTTERFLY: [&[(i32, i32)]; 2] = [
    &[
        (-3, -2), (3, -2),
        (-3, -1), (-2, -1), (0, -1), (2, -1), (3, -1),
        (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0),
        (-3, 1), (-2, 1), (0, 1), (2, 1), (3, 1),
        (-3, 2), (3, 2),
    ],
    &[
        (-2, -2), (2, -2),
        (-3, -1), (-2, -1), (0, -1), (2, -1), (3, -1),
        (-3, 0), (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0), (3, 0),
        (-2, 1), (0, 1), (2, 1),
        (-1, 2), (1, 2),
    ],
];

const BOSS: [&[(i32, i32)]; 2] = [
    &[
        (-1, -2), (0, -2), (1, -2),
        (-3, -1), (-2, -1), (-1, -1), (0, -1), (1, -1), (2, -1), (3, -1),
        (-3, 0), (-1, 0), (0, 0), (1, 0), (3, 0),
        (-3, 1), (-2, 1), (-1, 1), (0, 1), (1, 1), (2, 1), (3, 1),
        (-2, 2), (2, 2),
    ],
    &[
        (-1, -2), (0, -2), (1, -2),
        (-3, -1), (-2, -1), (-1, -1), (0, -1), (1, -1), (2, -1), (3, -1),
        (-3, 0), (-1, 0), (0, 0), (1, 0), (3, 0),
        (-3, 1), (-2, 1), (-1, 1), (0, 1), (1, 1), (2, 1), (3, 1),
        (-3, 2), (3, 2),
    ],
];

const SAUCER: [&[(i32, i32)]; 2] = [
    &[
        (-1, -1), (0, -1), (1, -1),
        (-4, 0), (-3, 0), (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0), (3, 0), (4, 0),
        (-3, 1), (-1, 1), (1, 1), (3, 1),
    ],
    &[
        (-1, -1), (0, -1), (1, -1),
        (-4, 0), (-3, 0), (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0), (3, 0), (4, 0),
        (-2, 1), (0, 1), (2, 1),
    ],
];

const EXPLOSION: [&[(i32, i32)]; 3] = [
    &[(0, 0), (-1, -1), (1, -1), (-1, 1), (1, 1)],
    &[
        (0, -2), (-2, 0), (2, 0), (0, 2),
        (-1, -1), (1, -1), (-1, 1), (1, 1),
    ],
    &[
        (0, -3), (-3, 0), (3, 0), (0, 3),
        (-2, -2), (2, -2), (-2, 2), (2, 2),
    ],
];

fn enemy_sprite(ship: &EnemyShip) -> &'static [(i32, i32)] {
    let frame = match ship.frame {
        SpriteFrame::Primary => 0,
        SpriteFrame::Alternate => 1,
    };
    match ship.tier {
        EnemyTier::One | EnemyTier::Two => BEE[frame],
        EnemyTier::Three => BUTTERFLY[frame],
        EnemyTier::Four => BOSS[frame],
        EnemyTier::Bonus => SAUCER[frame],
    }
}

fn tier_color(tier: EnemyTier) -> Color {
    match tier {
        EnemyTier::One => Color::Rgb(80, 160, 255),
        EnemyTier::Two => Color::Rgb(80, 255, 200),
        EnemyTier::Three => Color::Rgb(255, 80, 80),
        EnemyTier::Four => Color::Rgb(200, 120, 255),
        EnemyTier::Bonus => Color::Rgb(255, 220, 80),
    }
}

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// A character grid drawn at braille resolution: each cell holds 2x4 dots.
struct Canvas {
    grid: Vec<Vec<(char, Style)>>,
    w: usize,
    h: usize,
    bw: i32,
    bh: i32,
    scale_x: f32,
    scale_y: f32,
}

impl Canvas {
    fn new(w: usize, h: usize, field: Playfield) -> Self {
        let bw = (w * 2) as i32;
        let bh = (h * 4) as i32;
        Self {
            grid: vec![vec![(' ', Style::default().bg(BG)); w]; h],
            w,
            h,
            bw,
            bh,
            scale_x: bw as f32 / field.width,
            scale_y: bh as f32 / field.height,
        }
    }

    /// Field coordinates to braille pixels.
    fn dot(&self, x: f32, y: f32) -> (i32, i32) {
        ((x * self.scale_x) as i32, (y * self.scale_y) as i32)
    }

    fn set_dot(&self, map: &mut DotMap, bx: i32, by: i32) {
        if bx < 0 || by < 0 || bx >= self.bw || by >= self.bh {
            return;
        }
        let cx = bx as usize / 2;
        let cy = by as usize / 4;
        *map.entry((cx, cy)).or_insert(0) |= braille_bit(bx as usize % 2, by as usize % 4);
    }

    fn stamp(&self, map: &mut DotMap, x: f32, y: f32, sprite: &[(i32, i32)]) {
        let (cx, cy) = self.dot(x, y);
        for &(dx, dy) in sprite {
            self.set_dot(map, cx + dx, cy + dy);
        }
    }

    fn write_layer(&mut self, map: &DotMap, color: Color, bold: bool) {
        for (&(cx, cy), &bits) in map {
            if cx < self.w && cy < self.h && bits != 0 {
                let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                let mut style = Style::default().fg(color).bg(BG);
                if bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                self.grid[cy][cx] = (ch, style);
            }
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn render_field(game: &GameManager, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut canvas = Canvas::new(width, height, game.field());

    // Enemies, one layer per tier colour
    for ship in game.enemy_ships() {
        let mut map = DotMap::new();
        canvas.stamp(&mut map, ship.body.center_x(), ship.body.center_y(), enemy_sprite(ship));
        canvas.write_layer(&map, tier_color(ship.tier), ship.is_bonus());
    }

    for missile in game.missiles() {
        let mut map = DotMap::new();
        let (bx, by) = canvas.dot(missile.body.center_x(), missile.body.y());
        let color = match missile.kind {
            MissileKind::Player => {
                for dy in 0..3 {
                    canvas.set_dot(&mut map, bx, by + dy);
                }
                Color::Rgb(255, 255, 200)
            }
            MissileKind::Enemy => {
                for &(dx, dy) in &[(0, 0), (1, 1), (0, 2)] {
                    canvas.set_dot(&mut map, bx + dx, by + dy);
                }
                Color::Rgb(255, 100, 100)
            }
            MissileKind::Nuke => {
                for dy in 0..4 {
                    for dx in -1..=1 {
                        canvas.set_dot(&mut map, bx + dx, by + dy);
                    }
                }
                Color::Rgb(255, 160, 40)
            }
        };
        canvas.write_layer(&map, color, true);
    }

    if let Some(player) = game.player() {
        let mut map = DotMap::new();
        canvas.stamp(&mut map, player.body.center_x(), player.body.center_y(), PLAYER_SPRITE);
        let color = if game.is_powered_up() {
            Color::Rgb(80, 255, 255)
        } else {
            Color::Rgb(80, 255, 80)
        };
        canvas.write_layer(&map, color, true);
    }

    for explosion in game.explosions() {
        let mut map = DotMap::new();
        let sprite = EXPLOSION[(explosion.frame as usize).min(EXPLOSION.len() - 1)];
        canvas.stamp(&mut map, explosion.x, explosion.y, sprite);
        canvas.write_layer(&map, Color::Rgb(255, 200, 60), true);
    }

    if let Some(blast) = game.nuke_blast() {
        let mut map = DotMap::new();
        let (cx, cy) = canvas.dot(blast.x, blast.y);
        let rx = blast.radius * canvas.scale_x;
        let ry = blast.radius * canvas.scale_y;
        for step in 0..96 {
            let angle = step as f32 / 96.0 * std::f32::consts::TAU;
            let bx = cx + (angle.cos() * rx) as i32;
            let by = cy + (angle.sin() * ry) as i32;
            canvas.set_dot(&mut map, bx, by);
        }
        canvas.write_layer(&map, Color::Rgb(255, 120, 40), true);
    }

    canvas.into_lines()
}

fn banner_text(banner: Banner) -> (String, Color) {
    match banner {
        Banner::LevelUp(level) => (format!(" LEVEL {} ", level), Color::Rgb(80, 200, 255)),
        Banner::YouWin => (" YOU WIN! ".to_string(), Color::Rgb(255, 220, 80)),
        Banner::YouLose => (" GAME OVER ".to_string(), Color::Red),
    }
}

pub fn render_playing(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(80, 160, 255)))
        .title(" Galaga ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    // Status bar
    let lives_str = "\u{2666} ".repeat(game.lives() as usize);
    let best = app
        .high_scores
        .entries()
        .first()
        .map_or(0, |e| e.score)
        .max(game.score());
    let mut status = vec![
        Span::styled(
            format!(" Score: {} ", game.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Lives: {}", lives_str),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("High: {} ", best), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("Level: {} ", game.level()), Style::default().fg(Color::Green)),
    ];
    if game.is_powered_up() {
        status.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        status.push(Span::styled(
            "Rapid fire ",
            Style::default().fg(Color::Rgb(80, 255, 255)),
        ));
    }
    if game.nuke_available() {
        status.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        status.push(Span::styled(
            "\u{2622} Nuke ready ",
            Style::default().fg(Color::Rgb(255, 160, 40)).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let lines = render_field(game, fw, fh);
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    if let Some(banner) = app.banner {
        let (text, color) = banner_text(banner);
        let w = (text.chars().count() as u16 + 2).min(chunks[1].width);
        let x = chunks[1].x + chunks[1].width.saturating_sub(w) / 2;
        let y = chunks[1].y + chunks[1].height / 2;
        let banner_area = Rect::new(x, y, w, 1);
        frame.render_widget(Clear, banner_area);
        let p = Paragraph::new(Span::styled(
            text,
            Style::default().fg(color).bg(BG).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(p, banner_area);
    }

    let help = if game.is_round_over() {
        Line::from(vec![
            Span::styled(" Round over! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled("Press ENTER to play again, Esc for menu", Style::default().fg(Color::Gray)),
        ])
    } else if app.paused {
        Line::from(vec![Span::styled(
            " PAUSED - Press P to resume ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )])
    } else {
        let mut spans = vec![
            Span::styled(" \u{2190}\u{2192}/AD Move ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Space Fire ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ];
        if game.nuke_available() {
            spans.push(Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))));
            spans.push(Span::styled(
                "N Nuke ",
                Style::default().fg(Color::Rgb(255, 160, 40)).add_modifier(Modifier::BOLD),
            ));
        }
        spans.extend([
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
        ]);
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(help), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_pack_into_one_cell() {
        let canvas = Canvas::new(4, 2, Playfield::new(800.0, 600.0));
        let mut map = DotMap::new();
        canvas.set_dot(&mut map, 0, 0);
        canvas.set_dot(&mut map, 1, 3);
        canvas.set_dot(&mut map, -1, 0);
        canvas.set_dot(&mut map, 8, 0);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&(0, 0)], 0x01 | 0x80);
    }

    #[test]
    fn field_scales_to_the_grid() {
        let canvas = Canvas::new(80, 30, Playfield::new(800.0, 600.0));
        assert_eq!(canvas.dot(400.0, 300.0), (80, 60));
        assert_eq!(canvas.dot(800.0, 600.0), (160, 120));
    }

    #[test]
    fn rendered_field_has_requested_size() {
        let game = GameManager::new(Default::default(), Some(3)).unwrap();
        let lines = render_field(&game, 60, 20);
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.spans.len() == 60));
        let drawn = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.content != " ")
            .count();
        assert!(drawn > 0);
    }
}
