//! Game step and timer handlers
//!
//! `step` advances the board by one snake move. The spawners and the status
//! clock run on their own timers; the session calls each handler with
//! `state.clock_ms` set to the handler's due time.

use glam::{IVec2, Vec2};

use super::bullet::BulletKind;
use super::effects::{ParticleSink, acid_burst};
use super::enemy::{Enemy, EnemyContext, EnemyKind};
use super::state::{Food, GameEvent, GamePhase, GameState, KillCounters, PowerUp};
use super::weapons::FireContext;
use crate::cell_center;
use crate::consts::*;

const SCORE_GAIN_COLOR: u32 = 0x2ECC71;
const SCORE_LOSS_COLOR: u32 = 0xE74C3C;
const KILL_SCORE_COLOR: u32 = 0xF1C40F;
const BONUS_COLOR: u32 = 0xE67E22;
const BOSS_NOTICE_COLOR: u32 = 0xFF0000;

/// Difficulty multiplier after `active_ms` of play
pub fn speed_multiplier(active_ms: u64) -> f32 {
    1.0 + (active_ms / SPEED_UP_INTERVAL_MS) as f32 * SPEED_UP_AMOUNT
}

/// Step period for a difficulty multiplier
pub fn step_interval_ms(multiplier: f32) -> u64 {
    (INITIAL_STEP_MS as f32 / multiplier) as u64
}

/// Advance the game by one snake move
pub fn step(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let now = state.clock_ms;

    state.speed_multiplier = speed_multiplier(now);
    let enemy_speed = ENEMY_SPEED * state.speed_multiplier;

    // Auto attack has its own gate on top of each weapon's cooldown
    if state.auto_attack && !state.snake.is_empty() {
        let ready = state
            .last_auto_attack_ms
            .is_none_or(|last| now.saturating_sub(last) >= AUTO_ATTACK_INTERVAL_MS);
        if ready {
            auto_attack(state);
            state.last_auto_attack_ms = Some(now);
        }
    }

    // Move
    let Some(head) = state.snake.next_head() else {
        game_over(state);
        return;
    };
    if state.snake.is_fatal(head) {
        log::debug!("Fatal move to ({}, {})", head.x, head.y);
        game_over(state);
        return;
    }
    state.snake.segments.push_front(head);

    match state.food.iter().position(|f| f.cell == head) {
        Some(index) => eat_food(state, index, head),
        None => {
            state.snake.segments.pop_back();
        }
    }

    state.floating_texts.retain_mut(|text| text.update());

    state.bullets.retain(|b| !b.is_expired(now));
    for bullet in state.bullets.iter_mut() {
        bullet.update();
    }

    // Enemies
    let head_center = cell_center(head);
    let oranges = state.orange_positions();
    let ctx = EnemyContext {
        head: head_center,
        speed: enemy_speed,
        oranges: &oranges,
    };
    for enemy in state.enemies.iter_mut() {
        enemy.update(&ctx, &mut state.rng);
    }

    if let Some(index) = state.enemies.iter().position(|e| e.touches_head(head_center)) {
        if !ram_snake(state, index, head) {
            return;
        }
    }

    resolve_bullet_hits(state);
    expire_food(state);
}

/// Fire every weapon, then clear out whatever they killed
fn auto_attack(state: &mut GameState) {
    let GameState {
        weapons,
        snake,
        enemies,
        bullets,
        effects,
        rng,
        ids,
        attack_bonus,
        clock_ms,
        ..
    } = state;
    let mut ctx = FireContext {
        now_ms: *clock_ms,
        snake,
        attack_bonus: *attack_bonus,
        enemies: enemies.as_mut_slice(),
        bullets,
        effects,
        rng,
        ids,
    };
    let failures = weapons.fire_all(&mut ctx);
    if failures > 0 {
        log::warn!("{} weapon(s) failed this volley", failures);
    }

    reap(state);
}

/// Remove enemies left at zero health by area damage
fn reap(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemies.len() {
        if state.enemies[i].is_dead() {
            let enemy = state.enemies.remove(i);
            handle_kill(state, enemy);
        } else {
            i += 1;
        }
    }
}

fn eat_food(state: &mut GameState, index: usize, head: IVec2) {
    let food = state.food.remove(index);
    let text_x = head.x as f32 + GRID_SIZE as f32 / 2.0;
    let y = head.y as f32;

    if let Some(power_up) = food.power_up {
        let unlocked = match power_up {
            PowerUp::Weapon(kind) => state.weapons.add_weapon(kind).then_some(kind),
            PowerUp::RandomWeapon => state.weapons.upgrade_random(&mut state.rng),
        };
        match unlocked {
            Some(kind) => {
                log::info!("Unlocked {} weapon", kind.as_str());
                state.float_text(
                    Vec2::new(text_x, y - 40.0),
                    format!("{} weapon!", kind.as_str()),
                    kind.color(),
                );
                state.emit(GameEvent::WeaponUnlocked { kind });
            }
            None => log::debug!("Syringe eaten with nothing left to unlock"),
        }
    }

    let score = food.kind.score();
    state.score += score;
    state.float_text(Vec2::new(text_x, y), format!("+{}", score), SCORE_GAIN_COLOR);

    let bonus = food.kind.attack_bonus();
    if bonus > 0.0 {
        state.attack_bonus += bonus;
        state.float_text(Vec2::new(text_x, y - 20.0), format!("ATK +{}", bonus), BONUS_COLOR);
    }

    state.emit(GameEvent::FoodEaten {
        kind: food.kind,
        score,
    });
}

/// An enemy rammed the snake head. Returns false if the run ended.
fn ram_snake(state: &mut GameState, index: usize, head: IVec2) -> bool {
    let enemy = state.enemies.remove(index);
    let profile = enemy.profile();

    state.score = state.score.saturating_sub(profile.contact_penalty);
    state.float_text(
        Vec2::new(head.x as f32 + GRID_SIZE as f32 / 2.0, head.y as f32),
        format!("-{}", profile.contact_penalty),
        SCORE_LOSS_COLOR,
    );
    state.emit(GameEvent::SnakeHit {
        kind: enemy.kind,
        penalty: profile.contact_penalty,
        segments_lost: profile.segments_lost,
    });

    if !state.snake.shrink(profile.segments_lost) {
        game_over(state);
        return false;
    }
    true
}

fn resolve_bullet_hits(state: &mut GameState) {
    let now = state.clock_ms;
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        if !bullet.is_live() {
            i += 1;
            continue;
        }
        let pos = bullet.pos;
        let Some(target) = state.enemies.iter().position(|e| e.is_hit_by(pos)) else {
            i += 1;
            continue;
        };

        let color = state.enemies[target].color;
        state.effects.bullet_hit(pos, color);
        let mut killed = state.enemies[target].take_damage();

        let bullet = &mut state.bullets[i];
        let mut keep = bullet.penetrating;
        if bullet.kind == BulletKind::Acid {
            bullet.detonate(now);
            keep = true;
            let impact = bullet.impact_damage;
            killed |= state.enemies[target].apply_damage(impact);
            acid_burst(&mut state.effects, pos, super::bullet::ACID_ZONE_RADIUS, &mut state.rng);
        }

        if killed {
            let enemy = state.enemies.remove(target);
            handle_kill(state, enemy);
        }

        if keep {
            i += 1;
        } else {
            state.bullets.remove(i);
        }
    }
}

/// Score, promotion credit and loot for a dead enemy already removed from the board
fn handle_kill(state: &mut GameState, enemy: Enemy) {
    promote(state, enemy.kind);

    if !state.is_food_full() {
        let id = state.next_entity_id();
        state.food.push(Food::dropped_by(id, &enemy, state.clock_ms));
    }

    let score = enemy.profile().kill_score;
    state.score += score;
    state.float_text(enemy.pos, format!("+{}", score), KILL_SCORE_COLOR);
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        score,
    });
    log::debug!("Killed {} enemy {}", enemy.kind.as_str(), enemy.id);
}

/// Add kill credit toward `tier`. Returns the tier to spawn once the
/// threshold is reached.
fn credit(kills: &mut KillCounters, tier: EnemyKind, amount: u32) -> Option<EnemyKind> {
    let (counter, threshold, next) = match tier {
        EnemyKind::Red => (&mut kills.red, KILLS_FOR_PURPLE, EnemyKind::Purple),
        EnemyKind::Purple => (&mut kills.purple, KILLS_FOR_PINK, EnemyKind::Pink),
        EnemyKind::Pink => (&mut kills.pink, KILLS_FOR_ORANGE, EnemyKind::Orange),
        EnemyKind::Orange | EnemyKind::Boss => return None,
    };
    *counter += amount;
    if *counter >= threshold {
        *counter = 0;
        Some(next)
    } else {
        None
    }
}

fn promote(state: &mut GameState, killed: EnemyKind) {
    let credits: &[(EnemyKind, u32)] = match killed {
        EnemyKind::Red => &[(EnemyKind::Red, 1)],
        // Higher-tier kills also feed the tier below
        EnemyKind::Purple => &[(EnemyKind::Purple, 1), (EnemyKind::Red, CASCADE_CREDIT)],
        EnemyKind::Pink => &[(EnemyKind::Pink, 1), (EnemyKind::Purple, CASCADE_CREDIT)],
        EnemyKind::Orange | EnemyKind::Boss => &[],
    };
    for &(tier, amount) in credits {
        if let Some(next) = credit(&mut state.kills, tier, amount) {
            state.add_enemy(next);
            state.emit(GameEvent::EnemyPromoted { kind: next });
            log::info!("Promotion: {} enemy spawned", next.as_str());
        }
    }
}

/// Expired food turns into a red enemy on the spot
fn expire_food(state: &mut GameState) {
    let now = state.clock_ms;
    if !state.food.iter().any(|f| f.is_expired(now)) {
        return;
    }
    let (expired, fresh): (Vec<Food>, Vec<Food>) =
        std::mem::take(&mut state.food).into_iter().partition(|f| f.is_expired(now));
    state.food = fresh;

    for food in expired {
        let id = state.next_entity_id();
        let enemy = Enemy::new(id, EnemyKind::Red, cell_center(food.cell), &mut state.rng);
        state.enemies.push(enemy);
        state.emit(GameEvent::FoodExpired { cell: food.cell });
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.emit(GameEvent::GameOver { score: state.score });
    log::info!("Game over! Final score: {}", state.score);
}

/// Enemy spawner: one red enemy, up to the population cap
pub fn spawn_enemy(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.enemies.len() >= MAX_ENEMIES {
        return;
    }
    state.add_enemy(EnemyKind::Red);
}

/// Boss spawner: a boss scaled by play time, announced in the same handler
pub fn spawn_boss(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let game_secs = state.clock_ms / 1000;
    let id = state.next_entity_id();
    let head = state.snake.head_center();
    let boss = Enemy::boss(id, game_secs, head, &mut state.rng);
    let max_health = boss.max_health;
    state.enemies.push(boss);

    state.float_text(
        Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
        "BOSS INCOMING!",
        BOSS_NOTICE_COLOR,
    );
    state.emit(GameEvent::BossAppeared { max_health });
    log::info!(
        "Boss spawned at {}s with {} health ({} enemies)",
        game_secs,
        max_health,
        state.enemies.len()
    );
}

/// Status clock: refresh elapsed seconds and the displayed multiplier
pub fn tick_clock(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.elapsed_secs = state.clock_ms / 1000;
    state.speed_multiplier = speed_multiplier(state.clock_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;
    use crate::sim::state::{Direction, FoodKind};
    use crate::sim::weapons::WeaponKind;

    /// Fresh run with no food and weapons idle
    fn quiet_state() -> GameState {
        let mut state = GameState::new(1);
        state.food.clear();
        state.auto_attack = false;
        state
    }

    fn with_length(state: &mut GameState, len: usize) {
        state.snake.segments.clear();
        for i in 0..len as i32 {
            state.snake.segments.push_back(IVec2::new(400 - i * GRID_SIZE, 400));
        }
    }

    fn place_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, &mut state.rng);
        state.enemies.push(enemy);
        id
    }

    fn count(state: &GameState, kind: EnemyKind) -> usize {
        state.enemies.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn test_speed_curve() {
        assert_eq!(speed_multiplier(0), 1.0);
        assert_eq!(speed_multiplier(29_999), 1.0);
        assert!((speed_multiplier(30_000) - 1.2).abs() < 1e-6);
        assert!((speed_multiplier(65_000) - 1.4).abs() < 1e-6);
        assert_eq!(step_interval_ms(1.0), 200);
        assert_eq!(step_interval_ms(speed_multiplier(30_000)), 166);
    }

    #[test]
    fn test_moves_one_cell() {
        let mut state = quiet_state();
        step(&mut state);
        assert_eq!(state.snake.head(), Some(IVec2::new(420, 400)));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_reverse_turn_ignored() {
        let mut state = quiet_state();
        state.snake.turn(Direction::Left);
        step(&mut state);
        assert_eq!(state.snake.head(), Some(IVec2::new(420, 400)));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut state = quiet_state();
        state.snake.segments = [IVec2::new(780, 400), IVec2::new(760, 400)].into();
        step(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));

        // Further steps are inert
        step(&mut state);
        assert_eq!(state.snake.head(), Some(IVec2::new(780, 400)));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut state = quiet_state();
        state.snake.segments = [
            IVec2::new(400, 400),
            IVec2::new(420, 400),
            IVec2::new(420, 420),
            IVec2::new(400, 420),
            IVec2::new(380, 420),
        ]
        .into();
        state.snake.direction = Direction::Down;
        state.snake.next_direction = Direction::Down;
        step(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_food_round_trip() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        state.food.push(Food::new(id, IVec2::new(420, 400), FoodKind::Cucumber, 0));
        step(&mut state);

        assert_eq!(state.score, 55);
        assert!((state.attack_bonus - 0.4).abs() < 1e-6);
        assert_eq!(state.snake.len(), 4);
        assert!(state.food.is_empty());
        assert!(state.events.contains(&GameEvent::FoodEaten {
            kind: FoodKind::Cucumber,
            score: 55
        }));
    }

    #[test]
    fn test_example_scenario() {
        let mut state = quiet_state();
        assert_eq!((state.score, state.snake.len()), (0, 3));

        let id = state.next_entity_id();
        state.food.push(Food::new(id, IVec2::new(420, 400), FoodKind::Banana, 0));
        step(&mut state);
        assert_eq!((state.score, state.snake.len()), (10, 4));

        place_enemy(&mut state, EnemyKind::Red, Vec2::new(450.0, 410.0));
        state.clock_ms = 200;
        step(&mut state);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 2);
        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_lone_head_dies_on_contact() {
        let mut state = quiet_state();
        with_length(&mut state, 1);
        place_enemy(&mut state, EnemyKind::Red, Vec2::new(430.0, 410.0));
        step(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_syringe_unlocks_weapon() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        state.food.push(Food::syringe(id, IVec2::new(420, 400), PowerUp::RandomWeapon, 0));
        step(&mut state);
        assert_eq!(state.score, 200);
        assert_eq!(state.weapons.kinds().len(), 2);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::WeaponUnlocked { .. }))
        );
    }

    #[test]
    fn test_named_syringe_is_inert_when_owned() {
        let mut state = quiet_state();
        state.weapons.add_weapon(WeaponKind::Electric);
        let id = state.next_entity_id();
        state.food.push(Food::syringe(
            id,
            IVec2::new(420, 400),
            PowerUp::Weapon(WeaponKind::Electric),
            0,
        ));
        step(&mut state);
        assert_eq!(state.score, 200);
        assert_eq!(state.weapons.kinds().len(), 2);
    }

    #[test]
    fn test_bullet_kill_drops_food_and_scores() {
        let mut state = quiet_state();
        place_enemy(&mut state, EnemyKind::Red, Vec2::new(100.0, 100.0));
        state.enemies[0].health = 1;
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(id, BulletKind::Default, Vec2::new(70.0, 100.0), Vec2::new(100.0, 100.0)));
        step(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 15);
        assert_eq!(state.food.len(), 1);
        assert_eq!(state.food[0].kind, FoodKind::Banana);
        assert_eq!(state.kills.red, 1);
        assert_eq!(state.effects.len(), 1);
    }

    #[test]
    fn test_penetrating_bullet_survives_hit() {
        let mut state = quiet_state();
        place_enemy(&mut state, EnemyKind::Orange, Vec2::new(100.0, 100.0));
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(id, BulletKind::Fire, Vec2::new(85.0, 100.0), Vec2::new(100.0, 100.0)));
        step(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.enemies[0].health, ORANGE_HEALTH - 1);
    }

    #[test]
    fn test_acid_hit_detonates_in_place() {
        let mut state = quiet_state();
        place_enemy(&mut state, EnemyKind::Orange, Vec2::new(100.0, 100.0));
        let id = state.next_entity_id();
        let mut acid = Bullet::new(id, BulletKind::Acid, Vec2::new(70.0, 100.0), Vec2::new(100.0, 100.0));
        acid.impact_damage = 2;
        state.bullets.push(acid);
        step(&mut state);

        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].zone.is_some());
        assert_eq!(state.enemies[0].health, ORANGE_HEALTH - 3);
        assert_eq!(state.effects.len(), 1 + crate::sim::effects::ACID_BURST_PARTICLES);
    }

    #[test]
    fn test_five_red_kills_promote_once() {
        let mut state = quiet_state();
        for i in 0..5 {
            let id = state.next_entity_id();
            let red = Enemy::new(id, EnemyKind::Red, Vec2::new(100.0 + i as f32, 100.0), &mut state.rng);
            handle_kill(&mut state, red);
        }
        assert_eq!(count(&state, EnemyKind::Purple), 1);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.kills.red, 0);
        assert_eq!(state.score, 75);
        assert_eq!(state.food.len(), 5);
    }

    #[test]
    fn test_cascade_credit() {
        let mut state = quiet_state();
        state.kills.red = 3;
        let id = state.next_entity_id();
        let purple = Enemy::new(id, EnemyKind::Purple, Vec2::new(100.0, 100.0), &mut state.rng);
        handle_kill(&mut state, purple);
        assert_eq!(state.kills.purple, 1);
        assert_eq!(state.kills.red, 0);
        assert_eq!(count(&state, EnemyKind::Purple), 1);

        state.kills.purple = 1;
        let id = state.next_entity_id();
        let pink = Enemy::new(id, EnemyKind::Pink, Vec2::new(100.0, 100.0), &mut state.rng);
        handle_kill(&mut state, pink);
        // Pink kill: pink counter 1, purple counter 1 + 2 crosses 2
        assert_eq!(state.kills.pink, 1);
        assert_eq!(state.kills.purple, 0);
        assert_eq!(count(&state, EnemyKind::Pink), 1);
    }

    #[test]
    fn test_boss_kill_drops_syringe() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        let boss = Enemy::boss(id, 0, None, &mut state.rng);
        handle_kill(&mut state, boss);
        assert_eq!(state.food.len(), 1);
        assert_eq!(state.food[0].power_up, Some(PowerUp::RandomWeapon));
        assert_eq!(state.score, 15);
    }

    #[test]
    fn test_kill_food_respects_cap() {
        let mut state = quiet_state();
        while state.spawn_random_food() {}
        let id = state.next_entity_id();
        let red = Enemy::new(id, EnemyKind::Red, Vec2::new(100.0, 100.0), &mut state.rng);
        handle_kill(&mut state, red);
        assert_eq!(state.food.len(), MAX_FOOD);
        assert_eq!(state.score, 15);
    }

    #[test]
    fn test_food_expiry_spawns_red() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        state.food.push(Food::new(id, IVec2::new(100, 100), FoodKind::Carrot, 0));

        state.clock_ms = 7_999;
        step(&mut state);
        assert_eq!(state.food.len(), 1);
        assert!(state.enemies.is_empty());

        state.clock_ms = 8_000;
        step(&mut state);
        assert!(state.food.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Red);
        assert_eq!(state.enemies[0].pos, Vec2::new(110.0, 110.0));
    }

    #[test]
    fn test_auto_attack_gate_and_reap() {
        let mut state = quiet_state();
        state.auto_attack = true;
        state.attack_bonus = 29.0; // sonic power 3.0
        state.weapons.add_weapon(WeaponKind::Sonic);
        place_enemy(&mut state, EnemyKind::Red, Vec2::new(450.0, 410.0));
        step(&mut state);

        assert!(state.enemies.iter().all(|e| e.kind != EnemyKind::Red || e.id == 0));
        assert_eq!(state.score, 15);
        assert_eq!(state.last_auto_attack_ms, Some(0));

        let fired = state.bullets.len();
        state.clock_ms = 150;
        step(&mut state);
        assert_eq!(state.last_auto_attack_ms, Some(0));
        assert!(state.bullets.len() <= fired);
    }

    #[test]
    fn test_enemy_spawner_cap() {
        let mut state = quiet_state();
        for _ in 0..MAX_ENEMIES + 5 {
            spawn_enemy(&mut state);
        }
        assert_eq!(state.enemies.len(), MAX_ENEMIES);
    }

    #[test]
    fn test_boss_spawn_announces() {
        let mut state = quiet_state();
        state.clock_ms = 100_000;
        spawn_boss(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].max_health, 80);
        assert_eq!(state.floating_texts.len(), 1);
        assert!(state.events.contains(&GameEvent::BossAppeared { max_health: 80 }));
    }

    #[test]
    fn test_clock_tracks_active_seconds() {
        let mut state = quiet_state();
        state.clock_ms = 31_000;
        tick_clock(&mut state);
        assert_eq!(state.elapsed_secs, 31);
        assert!((state.speed_multiplier - 1.2).abs() < 1e-6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_contact_shrink_rule(
                len in 1usize..12,
                kind in prop::sample::select(vec![
                    EnemyKind::Red, EnemyKind::Purple, EnemyKind::Pink, EnemyKind::Orange,
                ]),
            ) {
                let mut state = quiet_state();
                with_length(&mut state, len);
                place_enemy(&mut state, kind, Vec2::new(430.0, 410.0));
                step(&mut state);

                let k = kind.profile().segments_lost;
                if len == 1 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                } else {
                    prop_assert_eq!(state.phase, GamePhase::Playing);
                    prop_assert_eq!(state.snake.len(), len.saturating_sub(k).max(1));
                }
                prop_assert!(state.enemies.is_empty());
            }

            #[test]
            fn test_attack_bonus_never_decreases(
                kinds in prop::collection::vec(
                    prop::sample::select(vec![
                        FoodKind::Banana, FoodKind::Carrot, FoodKind::Cucumber,
                        FoodKind::Watermelon, FoodKind::Syringe,
                    ]),
                    0..8,
                ),
            ) {
                let mut state = quiet_state();
                let mut last = state.attack_bonus;
                for (i, kind) in kinds.into_iter().enumerate() {
                    let head = state.snake.head().unwrap_or_default();
                    let id = state.next_entity_id();
                    state.food.push(Food::new(id, head + IVec2::new(GRID_SIZE, 0), kind, 0));
                    state.clock_ms = i as u64 * 200;
                    step(&mut state);
                    prop_assert!(state.attack_bonus >= last);
                    last = state.attack_bonus;
                }
            }
        }
    }
}
