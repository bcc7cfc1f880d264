//! Collision and interaction resolution
//!
//! Runs once per tick after every body has integrated. The steps run in a
//! fixed order and each sees the corrections made by the previous ones:
//!
//! 1. falling / landing against tile boxes
//! 2. walls (horizontal push-out and carry velocity)
//! 3. bonus decay
//! 4. hazards and pickups
//! 5. out-of-bounds
//! 6. player vs player (skipped in ghost mode)
//!
//! Where several tiles match the same player, the last one in level/tile
//! iteration order wins.

use super::collider::Rect;
use super::level::Level;
use super::object::ObjectKind;
use super::player::Player;
use super::state::{DeathCause, GameEvent};
use crate::consts::*;
use crate::settings::SessionConfig;

/// Resolve one tick of contacts for `players` against the live `levels`
///
/// `speed` is the current scroll speed, captured by players who die.
pub fn resolve(
    players: &mut [Player],
    levels: &[Level],
    speed: f32,
    config: &SessionConfig,
    events: &mut Vec<GameEvent>,
) {
    resolve_falling(players, levels, config);
    resolve_walls(players, levels);
    decay_bonuses(players, config);
    resolve_objects(players, levels, speed, config, events);
    resolve_bounds(players, speed, config, events);
    if !config.ghost_mode {
        resolve_player_contacts(players);
    }
}

fn solid_boxes(levels: &[Level]) -> impl Iterator<Item = (&Rect, f32)> {
    levels.iter().flat_map(|level| {
        level
            .tiles
            .iter()
            .filter_map(|tile| tile.solid_box().map(|rect| (rect, tile.carry_velocity_x)))
    })
}

/// Snap falling players onto tile tops (or under tile bottoms when rising)
///
/// A player resting on a tile keeps its gravity-side gate closed every tick.
fn resolve_falling(players: &mut [Player], levels: &[Level], config: &SessionConfig) {
    for player in players.iter_mut().filter(|p| p.is_alive()) {
        // Probe from the integrated state; later tiles overwrite earlier snaps
        let vy = player.body.velocity.y;
        let lookahead = vy.abs() * config.scale;
        let hitbox = player.hitbox();
        let below = hitbox.offset(0.0, lookahead);
        let above = hitbox.offset(0.0, -lookahead);
        // Already resting: one unit along gravity keeps the contact gated
        let resting = hitbox.offset(0.0, player.body.gravity_direction.sign());

        for (tile, _) in solid_boxes(levels) {
            if vy == 0.0 && tile.intersects(&resting) {
                player.body.land();
            }
            if vy > 0.0 && tile.intersects(&below) {
                player.body.able_to_down = false;
                player.body.velocity.y = 0.0;
                player.flip_cooldown = 0;
                player.snap_bottom_to(tile.y);
            }
            if vy < 0.0 && tile.intersects(&above) {
                player.body.able_to_up = false;
                player.body.velocity.y = 0.0;
                player.flip_cooldown = 0;
                player.snap_top_to(tile.max_y());
            }
        }
    }
}

/// Push players out of tiles they run into and hand them the tile's motion
fn resolve_walls(players: &mut [Player], levels: &[Level]) {
    for (tile, carry) in solid_boxes(levels) {
        let wall = tile.inset_vertical(WALL_VERTICAL_INSET).offset(carry, 0.0);
        for player in players.iter_mut().filter(|p| p.is_alive()) {
            let hitbox = player.hitbox();
            if hitbox.intersects(&wall) {
                let overlap = hitbox.max_x() - wall.x;
                player.set_x(player.pos.x - overlap);
                player.body.velocity.x = carry;
            } else {
                player.body.velocity.x = 0.0;
            }
        }
    }
}

fn decay_bonuses(players: &mut [Player], config: &SessionConfig) {
    let duration = config.bonus_ticks();
    for player in players.iter_mut().filter(|p| p.is_alive() && p.consumed_bonus) {
        player.bonus_ticks += 1;
        if player.bonus_ticks >= duration {
            player.consumed_bonus = false;
            player.bonus_ticks = 0;
            player.body.velocity.x = 0.0;
        }
    }
}

fn resolve_objects(
    players: &mut [Player],
    levels: &[Level],
    speed: f32,
    config: &SessionConfig,
    events: &mut Vec<GameEvent>,
) {
    for object in levels.iter().flat_map(|level| &level.objects) {
        for player in players.iter_mut() {
            if !player.is_alive() {
                continue;
            }
            let hitbox = player.hitbox();
            if !object.touches(&hitbox) {
                continue;
            }
            match object.kind {
                ObjectKind::Pickup { kind, increment } => {
                    if player.consumed_bonus {
                        continue;
                    }
                    player.body.velocity.x = increment * BONUS_VELOCITY_FACTOR;
                    player.consumed_bonus = true;
                    player.bonus_ticks = 0;
                    events.push(GameEvent::PickupCollected {
                        player: player.id,
                        kind,
                    });
                }
                ObjectKind::Hazard(_) => {
                    events.push(GameEvent::HazardContact { player: player.id });
                    if !config.god_mode {
                        kill(player, speed, DeathCause::Hazard, events);
                    }
                }
                ObjectKind::Decoration { .. } => {}
            }
        }
    }
}

fn resolve_bounds(
    players: &mut [Player],
    speed: f32,
    config: &SessionConfig,
    events: &mut Vec<GameEvent>,
) {
    let tile = config.tile_size();
    let height = config.window_height;
    for player in players.iter_mut().filter(|p| p.is_alive()) {
        let y = player.pos.y;
        let out_of_bounds = if config.borderless_mode {
            player.set_y(y.clamp(-tile, height - tile));
            false
        } else {
            y > height + tile * VERTICAL_DEATH_TILES || y < -tile * VERTICAL_DEATH_TILES
        };
        if out_of_bounds || player.pos.x < -tile * FALL_BEHIND_TILES {
            kill(player, speed, DeathCause::OutOfBounds, events);
        }
    }
}

fn kill(player: &mut Player, speed: f32, cause: DeathCause, events: &mut Vec<GameEvent>) {
    if player.kill(speed) {
        log::info!("Player {} died ({:?})", player.id, cause);
        events.push(GameEvent::PlayerDied {
            player: player.id,
            cause,
        });
    }
}

/// Mutable references to two distinct elements
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i != j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Stacking, head-on separation and side pushing between live players
fn resolve_player_contacts(players: &mut [Player]) {
    let count = players.len();
    let mut supporting = vec![false; count];

    for i in 0..count {
        for j in 0..count {
            if i == j {
                continue;
            }
            let (player, other) = pair_mut(players, i, j);
            if !player.is_alive() || !other.is_alive() {
                continue;
            }

            // Look one unit further along gravity so resting contact persists
            let reach = player.body.velocity.y + player.body.gravity_direction.sign();
            let vertical_probe = player
                .hitbox()
                .inset_horizontal(PLAYER_HORIZONTAL_INSET)
                .offset(0.0, reach);

            if vertical_probe.intersects(&other.hitbox()) {
                let (own, theirs) = (player.body.gravity_direction, other.body.gravity_direction);
                let other_box = other.hitbox();
                match (own.sign() > 0.0, theirs.sign() > 0.0) {
                    (true, true) if player.hitbox().y < other_box.y => {
                        player.snap_bottom_to(other_box.y);
                        player.body.able_to_down = false;
                        player.body.able_to_up = true;
                        other.body.able_to_up = false;
                        supporting[j] = true;
                    }
                    (false, false) if player.hitbox().y > other_box.y => {
                        player.snap_top_to(other_box.max_y());
                        player.body.able_to_up = false;
                        player.body.able_to_down = true;
                        other.body.able_to_down = false;
                        supporting[j] = true;
                    }
                    // Rising player below a falling one: converging
                    (false, true) if player.hitbox().y > other_box.y => {
                        player.set_y(player.pos.y + 1.0);
                        player.body.velocity.y = 0.0;
                        player.body.able_to_up = false;
                        other.set_y(other.pos.y - 1.0);
                        other.body.velocity.y = 0.0;
                        other.body.able_to_down = false;
                    }
                    _ => {}
                }
            }

            let horizontal_probe = player.hitbox().inset_vertical(PLAYER_VERTICAL_INSET);
            let other_box = other.hitbox();
            if horizontal_probe.intersects(&other_box) && player.hitbox().x <= other_box.x {
                let push = other_box.x - player.hitbox().max_x();
                player.set_x(player.pos.x + push);
            }
        }
    }

    for (player, supports) in players.iter_mut().zip(supporting) {
        if player.is_alive() {
            player.disable_controls = supports;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::body::GravityDirection;
    use crate::sim::level::LevelTemplate;
    use crate::sim::object::ObjectRegistry;
    use crate::sim::tile::Tile;

    fn config() -> SessionConfig {
        SessionConfig::for_window(832.0, 448.0)
    }

    const T: f32 = 32.0;

    fn level_with(tiles: &[(f32, f32, &str)], objects: &[(&str, f32, f32)]) -> Level {
        let registry = ObjectRegistry::standard(1.0, T);
        let mut template = LevelTemplate::new("test");
        for &(gx, gy, tag) in tiles {
            template.tiles.push(Tile::new(Vec2::new(gx, gy), 1, tag, T));
        }
        for &(tag, gx, gy) in objects {
            let object = registry.spawn(tag).expect("registered").at(Vec2::new(gx, gy), T);
            template.objects.push(object);
        }
        Level::instantiate(&template, 0.0)
    }

    fn player_at(id: usize, hitbox_corner: Vec2) -> Player {
        let mut p = Player::new(id, 1.0, 0);
        p.set_pos(hitbox_corner - Vec2::splat(T));
        p
    }

    fn resolve_once(players: &mut [Player], levels: &[Level], config: &SessionConfig) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve(players, levels, 0.8, config, &mut events);
        events
    }

    #[test]
    fn test_landing_snaps_to_tile_top() {
        // Tile occupies y 320..352 (grid row 11)
        let levels = [level_with(&[(5.0, 11.0, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 290.0))];
        players[0].body.velocity.y = 3.2;

        resolve_once(&mut players, &levels, &config());
        let p = &players[0];
        assert_eq!(p.hitbox().max_y(), 320.0);
        assert_eq!(p.body.velocity.y, 0.0);
        assert!(!p.body.able_to_down);
    }

    #[test]
    fn test_rising_snaps_under_tile() {
        let levels = [level_with(&[(5.0, 3.0, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 98.0))];
        players[0].body.velocity.y = -3.2;

        resolve_once(&mut players, &levels, &config());
        assert_eq!(players[0].hitbox().y, 96.0);
        assert!(!players[0].body.able_to_up);
    }

    #[test]
    fn test_last_tile_wins_landing() {
        // Two overlapping candidate floors; the later one in order decides
        let levels = [level_with(&[(5.0, 11.0, "ground"), (5.0, 10.5, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 290.0))];
        players[0].body.velocity.y = 3.2;

        resolve_once(&mut players, &levels, &config());
        assert_eq!(players[0].hitbox().max_y(), 304.0);
    }

    #[test]
    fn test_resting_contact_keeps_gate_closed() {
        let config = config();
        let levels = [level_with(&[(5.0, 11.0, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 288.0))];

        for _ in 0..6 {
            players[0].update();
            resolve_once(&mut players, &levels, &config);
            let p = &players[0];
            assert_eq!(p.hitbox().max_y(), 320.0);
            assert_eq!(p.body.velocity.y, 0.0);
            assert!(!p.body.able_to_down);
        }

        // Scrolled out from under the player: the gate opens again
        players[0].set_x(400.0);
        players[0].update();
        resolve_once(&mut players, &levels, &config);
        assert!(players[0].body.able_to_down);
    }

    #[test]
    fn test_resting_under_ceiling_keeps_gate_closed() {
        let levels = [level_with(&[(5.0, 3.0, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 96.0))];
        players[0].body.gravity_direction = GravityDirection::Up;

        for _ in 0..4 {
            players[0].update();
            resolve_once(&mut players, &levels, &config());
            assert_eq!(players[0].hitbox().y, 96.0);
            assert!(!players[0].body.able_to_up);
        }
    }

    #[test]
    fn test_polygon_tiles_are_not_solid() {
        let levels = [level_with(&[(5.0, 11.0, "slide1-1")], &[])];
        let mut players = [player_at(0, Vec2::new(128.0, 300.0))];
        players[0].body.velocity.y = 3.2;
        resolve_once(&mut players, &levels, &config());
        assert_eq!(players[0].body.velocity.y, 3.2);
    }

    #[test]
    fn test_wall_pushes_out_and_carries() {
        let mut level = level_with(&[(6.0, 5.0, "ground")], &[]);
        level.advance(-1.0);
        // Tile spans x 159..191 after one tick of scroll
        let mut players = [player_at(0, Vec2::new(140.0, 130.0))];

        resolve_once(&mut players, &[level], &config());
        let p = &players[0];
        // Pushed flush against the tile's next-tick position
        assert_eq!(p.hitbox().max_x(), 158.0);
        assert_eq!(p.body.velocity.x, -1.0);
    }

    #[test]
    fn test_last_wall_tile_decides_carry() {
        // Tile (6, 5) blocks the player, tile (20, 5) is far away
        let blocking_first = {
            let mut level = level_with(&[(6.0, 5.0, "ground"), (20.0, 5.0, "ground")], &[]);
            level.advance(-1.0);
            level
        };
        let mut players = [player_at(0, Vec2::new(140.0, 130.0))];
        resolve_once(&mut players, &[blocking_first], &config());
        // Pushed out, then the later clear tile resets the carry
        assert_eq!(players[0].hitbox().max_x(), 158.0);
        assert_eq!(players[0].body.velocity.x, 0.0);

        let blocking_last = {
            let mut level = level_with(&[(20.0, 5.0, "ground"), (6.0, 5.0, "ground")], &[]);
            level.advance(-1.0);
            level
        };
        let mut players = [player_at(0, Vec2::new(140.0, 130.0))];
        resolve_once(&mut players, &[blocking_last], &config());
        assert_eq!(players[0].hitbox().max_x(), 158.0);
        assert_eq!(players[0].body.velocity.x, -1.0);
    }

    #[test]
    fn test_no_wall_zeroes_horizontal_velocity() {
        let levels = [level_with(&[(20.0, 5.0, "ground")], &[])];
        let mut players = [player_at(0, Vec2::new(140.0, 130.0))];
        players[0].body.velocity.x = 5.0;
        resolve_once(&mut players, &levels, &config());
        assert_eq!(players[0].body.velocity.x, 0.0);
    }

    #[test]
    fn test_pickup_does_not_stack() {
        let levels = [level_with(&[], &[("SpeedUp", 5.0, 5.0), ("SpeedDown", 5.0, 5.0)])];
        let mut players = [player_at(0, Vec2::new(130.0, 130.0))];

        let events = resolve_once(&mut players, &levels, &config());
        let p = &players[0];
        assert!(p.consumed_bonus);
        assert_eq!(p.body.velocity.x, SPEED_UP_INCREMENT * BONUS_VELOCITY_FACTOR);
        let collected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupCollected { .. }))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_bonus_expires() {
        let config = config();
        let mut players = [player_at(0, Vec2::new(130.0, 130.0))];
        players[0].consumed_bonus = true;
        for _ in 0..config.bonus_ticks() {
            decay_bonuses(&mut players, &config);
        }
        assert!(!players[0].consumed_bonus);
        assert_eq!(players[0].body.velocity.x, 0.0);
    }

    #[test]
    fn test_saw_kills_with_scroll_speed() {
        let levels = [level_with(&[], &[("Saw", 5.0, 5.0)])];
        let mut players = [player_at(0, Vec2::new(140.0, 140.0))];

        let mut events = Vec::new();
        resolve(&mut players, &levels, 1.25, &config(), &mut events);
        let p = &players[0];
        assert!(p.is_dead);
        assert_eq!(p.body.velocity.x, -1.25);
        assert!(events.contains(&GameEvent::PlayerDied {
            player: 0,
            cause: DeathCause::Hazard
        }));

        // Already dead: no second death event
        let mut events = Vec::new();
        resolve(&mut players, &levels, 1.25, &config(), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_god_mode_survives_saw() {
        let config = SessionConfig {
            god_mode: true,
            ..config()
        };
        let levels = [level_with(&[], &[("Saw", 5.0, 5.0)])];
        let mut players = [player_at(0, Vec2::new(140.0, 140.0))];
        let events = resolve_once(&mut players, &levels, &config);
        assert!(!players[0].is_dead);
        assert_eq!(events, vec![GameEvent::HazardContact { player: 0 }]);
    }

    #[test]
    fn test_out_of_bounds() {
        let config = config();
        let mut players = [
            player_at(0, Vec2::new(300.0, 200.0)),
            player_at(1, Vec2::new(300.0, 200.0)),
            player_at(2, Vec2::new(300.0, 200.0)),
        ];
        players[0].set_y(448.0 + 2.5 * T + 1.0);
        players[1].set_y(-2.5 * T - 1.0);
        players[2].set_x(-2.0 * T - 1.0);
        resolve_once(&mut players, &[], &config);
        assert!(players.iter().all(|p| p.is_dead));
    }

    #[test]
    fn test_borderless_clamps() {
        let config = SessionConfig {
            borderless_mode: true,
            ..config()
        };
        let mut players = [player_at(0, Vec2::new(300.0, 200.0))];
        players[0].set_y(1000.0);
        resolve_once(&mut players, &[], &config);
        assert!(!players[0].is_dead);
        assert_eq!(players[0].pos.y, 448.0 - T);
    }

    #[test]
    fn test_stacking_disables_lower_player() {
        let mut players = [
            player_at(0, Vec2::new(200.0, 170.0)),
            player_at(1, Vec2::new(200.0, 200.0)),
        ];
        players[0].body.velocity.y = 3.2;
        resolve_player_contacts(&mut players);

        assert_eq!(players[0].hitbox().max_y(), 200.0);
        assert!(!players[0].body.able_to_down);
        assert!(players[1].disable_controls);
        assert!(!players[0].disable_controls);

        // Resting contact is still detected on the next pass
        players[0].body.velocity.y = 0.0;
        resolve_player_contacts(&mut players);
        assert!(players[1].disable_controls);

        // Separated: controls come back
        players[0].set_y(0.0);
        resolve_player_contacts(&mut players);
        assert!(!players[1].disable_controls);
    }

    #[test]
    fn test_opposite_gravity_separates() {
        let mut players = [
            player_at(0, Vec2::new(200.0, 225.0)),
            player_at(1, Vec2::new(200.0, 200.0)),
        ];
        players[0].body.gravity_direction = GravityDirection::Up;
        players[0].body.velocity.y = -3.2;
        players[1].body.velocity.y = 3.2;
        let (y0, y1) = (players[0].pos.y, players[1].pos.y);

        resolve_player_contacts(&mut players);
        assert_eq!(players[0].pos.y, y0 + 1.0);
        assert_eq!(players[1].pos.y, y1 - 1.0);
        assert_eq!(players[0].body.velocity.y, 0.0);
        assert_eq!(players[1].body.velocity.y, 0.0);
        // Still overlapping sideways after the nudge: slot 0 is pushed flush left
        assert_eq!(players[0].hitbox().x, 168.0);
        assert_eq!(players[1].hitbox().x, 200.0);
    }

    #[test]
    fn test_pair_order_decides_opposite_gravity_contact() {
        // Same contact as above with the slots swapped: the falling player is
        // visited first, only the side push applies and nobody is nudged
        let mut players = [
            player_at(0, Vec2::new(200.0, 200.0)),
            player_at(1, Vec2::new(200.0, 225.0)),
        ];
        players[1].body.gravity_direction = GravityDirection::Up;
        players[0].body.velocity.y = 3.2;
        players[1].body.velocity.y = -3.2;
        let (y0, y1) = (players[0].pos.y, players[1].pos.y);

        resolve_player_contacts(&mut players);
        assert_eq!(players[0].hitbox().x, 168.0);
        assert_eq!(players[0].pos.y, y0);
        assert_eq!(players[0].body.velocity.y, 3.2);
        assert_eq!(players[1].hitbox().x, 200.0);
        assert_eq!(players[1].pos.y, y1);
        assert_eq!(players[1].body.velocity.y, -3.2);
    }

    #[test]
    fn test_trailing_player_pushed_flush() {
        let mut players = [
            player_at(0, Vec2::new(190.0, 200.0)),
            player_at(1, Vec2::new(200.0, 200.0)),
        ];
        resolve_player_contacts(&mut players);
        assert_eq!(players[0].hitbox().max_x(), 200.0);
        assert_eq!(players[1].hitbox().x, 200.0);
    }

    #[test]
    fn test_ghost_mode_skips_player_contacts() {
        let config = SessionConfig {
            ghost_mode: true,
            ..config()
        };
        let mut players = [
            player_at(0, Vec2::new(190.0, 200.0)),
            player_at(1, Vec2::new(200.0, 200.0)),
        ];
        resolve_once(&mut players, &[], &config);
        assert_eq!(players[0].hitbox().x, 190.0);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut items = [1, 2, 3];
        let (a, b) = pair_mut(&mut items, 0, 2);
        std::mem::swap(a, b);
        let (c, d) = pair_mut(&mut items, 2, 1);
        *c += 10;
        *d += 20;
        assert_eq!(items, [3, 22, 11]);
    }
}
