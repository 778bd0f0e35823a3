use crate::grid::{Direction, DynamicObstacle, GridWorld, Position};
use anyhow::Context;
use log::debug;
use std::fs;
use std::path::Path;

/// Read and parse a map file. Only I/O can fail; map content is parsed
/// tolerantly.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<GridWorld> {
    let text = fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading map file {}", path.as_ref().display()))?;
    Ok(parse(&text))
}

/// Parse the sectioned map format:
///
/// ```text
/// SIZE:
/// 10 10
/// START:
/// 0 0
/// PACKAGES:
/// 1:5:5 2:8:2
/// TERRAIN:
/// 1 1 2 ...        (one line per row, top to bottom)
/// OBSTACLES:
/// STATIC: 3:3 4:4
/// DYNAMIC: name:x:y:dir[,dir...][:interval]
/// ```
///
/// Blank lines and `#` comments are ignored. Malformed or unrecognized lines
/// are skipped, never fatal.
pub fn parse(text: &str) -> GridWorld {
    let mut width = 0;
    let mut height = 0;
    let mut start = Position::new(0, 0);
    let mut packages: Vec<(u32, Position)> = Vec::new();
    let mut terrain_rows: Vec<Vec<u32>> = Vec::new();
    let mut statics: Vec<Position> = Vec::new();
    let mut dynamics: Vec<DynamicObstacle> = Vec::new();

    let mut section = String::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(header) = line.strip_suffix(':') {
            if !header.contains(' ') {
                section = header.to_ascii_uppercase();
                continue;
            }
        }

        match section.as_str() {
            "SIZE" => {
                if let [w, h] = ints(line)[..] {
                    width = w;
                    height = h;
                }
            }
            "START" => {
                if let [x, y] = ints(line)[..] {
                    start = Position::new(x, y);
                }
            }
            "PACKAGES" => {
                for entry in line.split_whitespace() {
                    let fields: Vec<&str> = entry.split(':').collect();
                    if let [id, x, y] = fields[..] {
                        if let (Ok(id), Ok(x), Ok(y)) = (id.parse(), x.parse(), y.parse()) {
                            packages.push((id, Position::new(x, y)));
                            continue;
                        }
                    }
                    debug!("skipping malformed package entry: {entry}");
                }
            }
            "TERRAIN" => {
                terrain_rows.push(
                    line.split_whitespace()
                        .filter_map(|token| token.parse().ok())
                        .collect(),
                );
            }
            "OBSTACLES" => {
                if let Some(rest) = line.strip_prefix("STATIC:") {
                    for entry in rest.split_whitespace() {
                        let fields: Vec<&str> = entry.split(':').collect();
                        if let [x, y] = fields[..] {
                            if let (Ok(x), Ok(y)) = (x.parse(), y.parse()) {
                                statics.push(Position::new(x, y));
                                continue;
                            }
                        }
                        debug!("skipping malformed static obstacle: {entry}");
                    }
                } else if let Some(rest) = line.strip_prefix("DYNAMIC:") {
                    if let Some(obstacle) = parse_dynamic(rest.trim()) {
                        dynamics.push(obstacle);
                    } else {
                        debug!("skipping malformed dynamic obstacle: {rest}");
                    }
                } else {
                    debug!("skipping unrecognized obstacle line: {line}");
                }
            }
            _ => debug!("skipping line outside a known section: {line}"),
        }
    }

    let mut world = GridWorld::new(width, height);
    world.start = start;
    for (y, row) in terrain_rows.iter().enumerate().take(height.max(0) as usize) {
        for (x, &cost) in row.iter().enumerate().take(width.max(0) as usize) {
            world.set_terrain_cost(Position::new(x as i32, y as i32), cost);
        }
    }
    for (id, destination) in packages {
        world.add_package(id, destination);
    }
    for pos in statics {
        world.add_static_obstacle(pos);
    }
    for obstacle in dynamics {
        world.add_dynamic_obstacle(obstacle);
    }
    world
}

/// `name:x:y:dir[,dir...][:interval]`
fn parse_dynamic(entry: &str) -> Option<DynamicObstacle> {
    let fields: Vec<&str> = entry.split(':').collect();
    if fields.len() < 4 {
        return None;
    }
    let name = fields[0];
    let x = fields[1].parse().ok()?;
    let y = fields[2].parse().ok()?;
    let pattern: Vec<Direction> = fields[3]
        .split(',')
        .filter_map(Direction::from_name)
        .collect();
    if pattern.is_empty() {
        return None;
    }
    let interval = fields
        .get(4)
        .and_then(|token| token.parse().ok())
        .unwrap_or(1);
    Some(DynamicObstacle::new(
        name,
        Position::new(x, y),
        pattern,
        interval,
    ))
}

fn ints(line: &str) -> Vec<i32> {
    line.split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# sample delivery map
SIZE:
4 3
START:
0 0
PACKAGES:
1:3:2 2:2:0
TERRAIN:
1 1 2 2
1 3 3 1
1 1 1 1
OBSTACLES:
STATIC: 1:0
DYNAMIC: guard:2:1:left,right:2
";

    #[test]
    fn parses_every_section() {
        let world = parse(SAMPLE);
        assert_eq!((world.width, world.height), (4, 3));
        assert_eq!(world.start, Position::new(0, 0));
        assert_eq!(world.packages[&1], Position::new(3, 2));
        assert_eq!(world.packages[&2], Position::new(2, 0));
        assert_eq!(world.terrain_cost(Position::new(2, 0)), 2);
        assert_eq!(world.terrain_cost(Position::new(1, 1)), 3);
        assert_eq!(world.terrain_cost(Position::new(0, 2)), 1);
        assert!(world.is_blocked(Position::new(1, 0), 0));
        // guard starts at (2,1) and steps left first.
        assert!(world.is_blocked(Position::new(1, 1), 0));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let noisy = "\
SIZE:
5 5
garbage that belongs to no section
START:
not numbers
1 1
PACKAGES:
bad:entry 1:2:2 also:bad:here:x
OBSTACLES:
STATIC: 9 1:1
DYNAMIC: broken:aa:bb:up
DYNAMIC: ok:3:3:down
";
        let world = parse(noisy);
        assert_eq!((world.width, world.height), (5, 5));
        assert_eq!(world.start, Position::new(1, 1));
        assert_eq!(world.packages.len(), 1);
        assert_eq!(world.packages[&1], Position::new(2, 2));
        assert!(world.is_blocked(Position::new(1, 1), 0));
        // "ok" steps down from (3,3) before t=0.
        assert!(world.is_blocked(Position::new(3, 4), 0));
    }

    #[test]
    fn empty_input_yields_an_empty_world() {
        let world = parse("");
        assert_eq!((world.width, world.height), (0, 0));
        assert!(world.packages.is_empty());
    }
}
