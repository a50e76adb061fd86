//! Obstacle layer: spawning, recycling, collision and scoring
//!
//! The layer owns the active obstacle sequence and the pool that feeds it.
//! One `update` per running tick, in a fixed order:
//! 1. recycle invisible obstacles (visible ones scroll unless the player is dead)
//! 2. evict from the front past `FULL_CAP`
//! 3. collide against the player, at most one hit per tick
//! 4. score the newest pair and spawn the next one

use rand::Rng;
use rand_pcg::Pcg32;

use super::obstacle::{Obstacle, ObstacleKind, PoolClass};
use super::player::Player;
use super::pool::ObstaclePool;
use super::random::{RngState, is_in_probability, random_number};
use super::state::GameEvent;
use crate::consts::*;
use crate::score::ScoreTracker;

/// Pair variants, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Top and bottom columns
    Normal,
    /// Two floating columns
    Hover,
    /// Oscillating top and bottom columns
    MovingNormal,
    /// Two oscillating floating columns
    MovingHover,
}

/// Vertical layout of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairShape {
    Column,
    Hover,
}

impl PairKind {
    /// (upper, lower) obstacle kinds
    pub fn kinds(self) -> (ObstacleKind, ObstacleKind) {
        match self {
            PairKind::Normal => (ObstacleKind::TopNormal, ObstacleKind::BottomNormal),
            PairKind::Hover => (ObstacleKind::HoverNormal, ObstacleKind::HoverNormal),
            PairKind::MovingNormal => (ObstacleKind::TopHard, ObstacleKind::BottomHard),
            PairKind::MovingHover => (ObstacleKind::HoverHard, ObstacleKind::HoverHard),
        }
    }

    pub fn shape(self) -> PairShape {
        match self {
            PairKind::Normal | PairKind::MovingNormal => PairShape::Column,
            PairKind::Hover | PairKind::MovingHover => PairShape::Hover,
        }
    }

    pub fn pool_class(self) -> PoolClass {
        match self {
            PairKind::Normal | PairKind::Hover => PoolClass::Plain,
            PairKind::MovingNormal | PairKind::MovingHover => PoolClass::Moving,
        }
    }
}

/// Pick the next pair variant from the current score.
///
/// Stage one rolls hard with probability `(score + 1) / 20`, saturating at
/// certainty. Stage two picks the layout: 1 in 4 hover among hard pairs,
/// 1 in 2 among easy ones.
pub fn choose_pair_kind<R: Rng>(rng: &mut R, score: u64) -> anyhow::Result<PairKind> {
    let numerator = score
        .saturating_add(1)
        .min(HARD_PAIR_DENOMINATOR as u64) as i32;
    let kind = if is_in_probability(rng, numerator, HARD_PAIR_DENOMINATOR)? {
        if is_in_probability(rng, 1, 4)? {
            PairKind::MovingHover
        } else {
            PairKind::MovingNormal
        }
    } else if is_in_probability(rng, 1, 2)? {
        PairKind::Normal
    } else {
        PairKind::Hover
    };
    Ok(kind)
}

/// Active obstacles plus their pool
#[derive(Debug, Clone)]
pub struct ObstacleLayer {
    active: Vec<Obstacle>,
    pool: ObstaclePool,
    rng: Pcg32,
    next_pair_id: u64,
    /// Newest pair already counted, so a pair never scores twice
    last_scored_pair: Option<u64>,
}

impl ObstacleLayer {
    pub fn new(rng_state: RngState) -> Self {
        Self::with_pool(rng_state, ObstaclePool::default())
    }

    pub fn with_pool(rng_state: RngState, pool: ObstaclePool) -> Self {
        Self {
            active: Vec::with_capacity(FULL_CAP + 2),
            pool,
            rng: rng_state.to_rng(),
            next_pair_id: 1,
            last_scored_pair: None,
        }
    }

    /// Advance one running tick
    pub fn update(
        &mut self,
        player: &mut Player,
        scores: &mut ScoreTracker,
        events: &mut Vec<GameEvent>,
    ) {
        self.recycle(player.is_dead());
        self.enforce_cap();
        self.collide(player, events);
        self.spawn_logic(player, scores, events);
    }

    /// Drop invisible obstacles back into the pool, scroll the rest
    fn recycle(&mut self, frozen: bool) {
        let mut i = 0;
        while i < self.active.len() {
            if !self.active[i].is_visible() {
                let obstacle = self.active.remove(i);
                self.pool.release(obstacle);
                continue;
            }
            if !frozen {
                self.active[i].movement();
            }
            i += 1;
        }
    }

    fn enforce_cap(&mut self) {
        if self.active.len() <= FULL_CAP {
            return;
        }
        let excess = self.active.len() - FULL_CAP;
        log::warn!("Active obstacles over cap, evicting {excess}");
        for obstacle in self.active.drain(..excess) {
            self.pool.release(obstacle);
        }
    }

    /// First overlap kills the player; later obstacles are not checked
    fn collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) {
        if player.is_dead() {
            return;
        }
        let hit = self
            .active
            .iter()
            .any(|o| o.rect().intersects(player.collision_rect()));
        if hit {
            player.dead_fall(events);
        }
    }

    fn spawn_logic(
        &mut self,
        player: &Player,
        scores: &mut ScoreTracker,
        events: &mut Vec<GameEvent>,
    ) {
        if player.is_dead() {
            return;
        }

        let Some(last) = self.active.last() else {
            self.spawn_initial_pair();
            return;
        };
        if !last.is_in_frame() || self.active.len() + 2 > FULL_CAP {
            return;
        }
        let (last_x, last_pair) = (last.x(), last.pair_id());

        let distance = last_x - player.x() + PLAYER_WIDTH / 2;
        if self.active.len() >= FULL_CAP - 2
            && distance <= SCORE_DISTANCE
            && self.last_scored_pair != Some(last_pair)
        {
            scores.score(player, events);
            self.last_scored_pair = Some(last_pair);
        }

        match choose_pair_kind(&mut self.rng, scores.current_score()) {
            Ok(kind) => {
                self.spawn_pair(kind, last_x + HORIZONTAL_INTERVAL);
            }
            Err(e) => log::error!("Pair selection failed, skipping spawn: {e:#}"),
        }
    }

    fn spawn_initial_pair(&mut self) {
        self.spawn_pair(PairKind::Normal, FRAME_WIDTH);
    }

    /// Acquire, place and append a pair at `x`.
    ///
    /// Returns false when the pool cannot supply both obstacles; nothing is
    /// added in that case.
    pub fn spawn_pair(&mut self, kind: PairKind, x: i32) -> bool {
        let class = kind.pool_class();
        let Some(mut upper) = self.pool.acquire(class) else {
            log::warn!("Pool empty, skipping {kind:?} spawn");
            return false;
        };
        let Some(mut lower) = self.pool.acquire(class) else {
            self.pool.release(upper);
            log::warn!("Pool empty, skipping {kind:?} spawn");
            return false;
        };

        let (upper_kind, lower_kind) = kind.kinds();
        match kind.shape() {
            PairShape::Column => {
                let gap_top = random_number(&mut self.rng, MIN_HEIGHT, MAX_HEIGHT);
                upper.set_attribute(
                    x,
                    -TOP_PIPE_LENGTHENING,
                    gap_top + TOP_PIPE_LENGTHENING,
                    upper_kind,
                    true,
                );
                lower.set_attribute(
                    x,
                    gap_top + VERTICAL_INTERVAL,
                    FRAME_HEIGHT - gap_top - VERTICAL_INTERVAL,
                    lower_kind,
                    true,
                );
            }
            PairShape::Hover => {
                let hover_y = random_number(&mut self.rng, FRAME_HEIGHT / 12, FRAME_HEIGHT / 6);
                let upper_height =
                    random_number(&mut self.rng, FRAME_HEIGHT / 6, FRAME_HEIGHT / 4);
                upper.set_attribute(x, hover_y, upper_height, upper_kind, true);
                lower.set_attribute(
                    x,
                    hover_y + upper_height + VERTICAL_INTERVAL,
                    FRAME_HEIGHT - 2 * hover_y - upper_height - VERTICAL_INTERVAL,
                    lower_kind,
                    true,
                );
            }
        }

        let pair_id = self.next_pair_id;
        self.next_pair_id += 1;
        upper.set_pair_id(pair_id);
        lower.set_pair_id(pair_id);
        log::debug!("Spawned {kind:?} pair {pair_id} at x={x}");

        self.active.push(upper);
        self.active.push(lower);
        true
    }

    /// Return every active obstacle to the pool
    pub fn reset(&mut self) {
        for obstacle in self.active.drain(..) {
            self.pool.release(obstacle);
        }
        self.last_scored_pair = None;
    }

    /// Active obstacles in spawn order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn pool(&self) -> &ObstaclePool {
        &self.pool
    }

    /// Test hook: place an obstacle straight into the active sequence
    #[cfg(test)]
    pub(crate) fn push_active(&mut self, obstacle: Obstacle) {
        self.active.push(obstacle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryScoreStore;
    use crate::sim::player::PlayerState;
    use crate::sim::random::test_rng::FixedRng;
    use proptest::prelude::*;

    fn setup() -> (ObstacleLayer, Player, ScoreTracker, Vec<GameEvent>) {
        (
            ObstacleLayer::new(RngState::new(1234)),
            Player::new(),
            ScoreTracker::new(Box::new(MemoryScoreStore::default())),
            Vec::new(),
        )
    }

    /// Every update step except collision, so a stationary player survives
    fn advance_without_collision(
        layer: &mut ObstacleLayer,
        player: &Player,
        scores: &mut ScoreTracker,
        events: &mut Vec<GameEvent>,
    ) {
        layer.recycle(player.is_dead());
        layer.enforce_cap();
        layer.spawn_logic(player, scores, events);
    }

    fn obstacle_at(x: i32, y: i32, height: i32) -> Obstacle {
        let mut o = Obstacle::new();
        o.set_attribute(x, y, height, ObstacleKind::TopNormal, true);
        o
    }

    #[test]
    fn test_first_update_spawns_initial_pair() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        layer.update(&mut player, &mut scores, &mut events);

        assert_eq!(layer.len(), 2);
        let top = &layer.obstacles()[0];
        let bottom = &layer.obstacles()[1];
        assert_eq!(top.kind(), ObstacleKind::TopNormal);
        assert_eq!(bottom.kind(), ObstacleKind::BottomNormal);
        assert_eq!(top.x(), FRAME_WIDTH);

        let gap_top = top.y() + top.height();
        assert!((MIN_HEIGHT..MAX_HEIGHT).contains(&gap_top));
        assert_eq!(bottom.y(), gap_top + VERTICAL_INTERVAL);
        assert_eq!(bottom.y() + bottom.height(), FRAME_HEIGHT);
        assert_eq!(top.pair_id(), bottom.pair_id());
        assert_eq!(layer.pool().available(PoolClass::Plain), POOL_CAPACITY - 2);
    }

    #[test]
    fn test_dead_player_gets_no_spawn() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        player.dead_fall(&mut events);
        layer.update(&mut player, &mut scores, &mut events);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_invisible_obstacle_is_recycled() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        let mut gone = layer.pool.acquire(PoolClass::Plain).unwrap();
        gone.set_attribute(-OBSTACLE_HEAD_WIDTH, 0, 50, ObstacleKind::TopNormal, true);
        gone.movement();
        assert!(!gone.is_visible());

        let keep = obstacle_at(300, 0, 50);
        layer.push_active(gone);
        layer.push_active(keep);

        layer.update(&mut player, &mut scores, &mut events);
        assert!(layer.obstacles().iter().all(|o| o.is_visible()));
        assert_eq!(layer.obstacles()[0].x(), 300 - OBSTACLE_SPEED);
        // The recycled obstacle is back in the pool; `keep` came from outside it
        let free = layer.pool().available(PoolClass::Plain)
            + layer.pool().available(PoolClass::Moving);
        assert_eq!(free + layer.len(), 2 * POOL_CAPACITY + 1);
    }

    #[test]
    fn test_adjacent_invisible_obstacles_all_removed() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        for x in [100, 150, 200] {
            let mut o = obstacle_at(x, 0, 50);
            o.set_visible(false);
            layer.push_active(o);
        }
        layer.push_active(obstacle_at(350, 0, 50));

        layer.recycle(player.is_dead());
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.obstacles()[0].x(), 350 - OBSTACLE_SPEED);
        // Follow-up update still behaves
        layer.update(&mut player, &mut scores, &mut events);
        assert!(layer.len() <= FULL_CAP);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        for i in 0..(FULL_CAP + 3) {
            layer.push_active(obstacle_at(2000 + i as i32 * 10, 0, 10));
        }
        layer.update(&mut player, &mut scores, &mut events);

        assert_eq!(layer.len(), FULL_CAP);
        assert_eq!(layer.obstacles()[0].x(), 2030 - OBSTACLE_SPEED);
    }

    #[test]
    fn test_collision_kills_once() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        let rect = *player.collision_rect();
        // Two overlapping obstacles on top of the player
        layer.push_active(obstacle_at(rect.x(), rect.y(), rect.height()));
        layer.push_active(obstacle_at(rect.x(), rect.y(), rect.height()));

        layer.collide(&mut player, &mut events);
        assert_eq!(player.state(), PlayerState::DeadFall);
        assert_eq!(events, vec![GameEvent::Crash]);

        layer.collide(&mut player, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_no_collision_when_apart() {
        let (mut layer, mut player, _, mut events) = setup();
        layer.push_active(obstacle_at(1000, 1000, 100));
        layer.collide(&mut player, &mut events);
        assert!(!player.is_dead());
        assert!(events.is_empty());
    }

    #[test]
    fn test_obstacles_freeze_after_hit() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        layer.update(&mut player, &mut scores, &mut events);
        player.dead_fall(&mut events);
        let before: Vec<i32> = layer.obstacles().iter().map(|o| o.x()).collect();

        layer.update(&mut player, &mut scores, &mut events);
        let after: Vec<i32> = layer.obstacles().iter().map(|o| o.x()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_next_pair_waits_for_frame_entry() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        layer.update(&mut player, &mut scores, &mut events);
        assert_eq!(layer.len(), 2);

        // Initial pair needs to scroll head-width into the frame
        let ticks_to_enter = (OBSTACLE_HEAD_WIDTH + OBSTACLE_SPEED - 1) / OBSTACLE_SPEED;
        for _ in 0..ticks_to_enter - 1 {
            layer.update(&mut player, &mut scores, &mut events);
            assert_eq!(layer.len(), 2);
        }
        layer.update(&mut player, &mut scores, &mut events);
        assert_eq!(layer.len(), 4);

        let first_x = layer.obstacles()[0].x();
        assert_eq!(layer.obstacles()[2].x(), first_x + HORIZONTAL_INTERVAL);
        assert_ne!(layer.obstacles()[0].pair_id(), layer.obstacles()[2].pair_id());
    }

    #[test]
    fn test_each_pair_scores_once() {
        let (mut layer, player, mut scores, mut events) = setup();
        let mut spawned_pairs = 0u64;
        let mut last_newest = 0;
        for _ in 0..3000 {
            advance_without_collision(&mut layer, &player, &mut scores, &mut events);
            if let Some(newest) = layer.obstacles().last() {
                if newest.pair_id() != last_newest {
                    last_newest = newest.pair_id();
                    spawned_pairs += 1;
                }
            }
            assert!(layer.len() <= FULL_CAP);
        }
        // Every spawn after the layer fills scores exactly one pair
        let filling_spawns = (FULL_CAP / 2) as u64 - 1;
        assert!(spawned_pairs > filling_spawns);
        assert_eq!(scores.current_score(), spawned_pairs - filling_spawns);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::Score).count() as u64,
            scores.current_score()
        );
    }

    #[test]
    fn test_skipped_spawn_does_not_double_score() {
        let (_, player, mut scores, mut events) = setup();
        // Too few obstacles to keep the layer full, so spawns get skipped
        let mut layer =
            ObstacleLayer::with_pool(RngState::new(5), ObstaclePool::new(FULL_CAP - 2));
        let mut scored = std::collections::HashSet::new();
        let mut last_score = 0;
        for _ in 0..2000 {
            advance_without_collision(&mut layer, &player, &mut scores, &mut events);
            let score = scores.current_score();
            assert!(score <= last_score + 1);
            if score > last_score {
                let pair = layer.last_scored_pair.unwrap();
                assert!(scored.insert(pair), "pair {pair} scored twice");
            }
            last_score = score;
        }
        assert!(last_score > 0);
    }

    #[test]
    fn test_exhausted_pool_skips_spawn() {
        let (_, mut player, mut scores, mut events) = setup();
        let mut layer = ObstacleLayer::with_pool(RngState::new(9), ObstaclePool::new(1));
        layer.update(&mut player, &mut scores, &mut events);
        assert!(layer.is_empty());
        // Half-acquired obstacle went back
        assert_eq!(layer.pool().available(PoolClass::Plain), 1);
    }

    #[test]
    fn test_moving_pairs_use_moving_pool() {
        let (mut layer, ..) = setup();
        assert!(layer.spawn_pair(PairKind::MovingHover, 500));
        assert_eq!(layer.pool().available(PoolClass::Moving), POOL_CAPACITY - 2);
        assert_eq!(layer.pool().available(PoolClass::Plain), POOL_CAPACITY);
        assert!(layer.obstacles().iter().all(|o| o.kind() == ObstacleKind::HoverHard));
        assert!(layer.obstacles().iter().all(|o| o.direction().is_some()));
    }

    #[test]
    fn test_hover_geometry() {
        let (mut layer, ..) = setup();
        assert!(layer.spawn_pair(PairKind::Hover, 500));
        let upper = &layer.obstacles()[0];
        let lower = &layer.obstacles()[1];
        assert!((FRAME_HEIGHT / 12..FRAME_HEIGHT / 6).contains(&upper.y()));
        assert!((FRAME_HEIGHT / 6..FRAME_HEIGHT / 4).contains(&upper.height()));
        assert_eq!(lower.y(), upper.y() + upper.height() + VERTICAL_INTERVAL);
        assert_eq!(lower.y() + lower.height(), FRAME_HEIGHT - upper.y());
    }

    #[test]
    fn test_reset_returns_everything() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        for _ in 0..200 {
            layer.update(&mut player, &mut scores, &mut events);
        }
        assert!(!layer.is_empty());
        layer.reset();
        assert!(layer.is_empty());
        assert_eq!(layer.pool().available(PoolClass::Plain), POOL_CAPACITY);
        assert_eq!(layer.pool().available(PoolClass::Moving), POOL_CAPACITY);
    }

    #[test]
    fn test_choose_pair_kind_extremes() {
        // Every roll succeeds: hard, then hover
        assert_eq!(choose_pair_kind(&mut FixedRng(0), 0).unwrap(), PairKind::MovingHover);
        // Every roll fails: easy, then hover layout
        assert_eq!(choose_pair_kind(&mut FixedRng(u64::MAX), 0).unwrap(), PairKind::Hover);
    }

    #[test]
    fn test_high_score_saturates_to_hard() {
        let mut rng = crate::sim::random::seeded(3);
        for score in [19, 20, 500, u64::MAX] {
            for _ in 0..50 {
                let kind = choose_pair_kind(&mut rng, score).unwrap();
                assert!(matches!(kind, PairKind::MovingNormal | PairKind::MovingHover));
            }
        }
    }

    #[test]
    fn test_frozen_layer_keeps_collision_frame() {
        let (mut layer, mut player, mut scores, mut events) = setup();
        let rect = *player.collision_rect();
        layer.push_active(obstacle_at(rect.x() + OBSTACLE_SPEED, rect.y(), rect.height()));
        layer.update(&mut player, &mut scores, &mut events);
        assert!(player.is_dead());

        let x = layer.obstacles()[0].x();
        layer.update(&mut player, &mut scores, &mut events);
        assert_eq!(layer.obstacles()[0].x(), x);
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_cap(seed in any::<u64>(), ticks in 1usize..1500) {
            let mut layer = ObstacleLayer::new(RngState::new(seed));
            let mut player = Player::new();
            let mut scores = ScoreTracker::new(Box::new(MemoryScoreStore::default()));
            let mut events = Vec::new();
            for _ in 0..ticks {
                layer.update(&mut player, &mut scores, &mut events);
                prop_assert!(layer.len() <= FULL_CAP);
                prop_assert_eq!(layer.len() % 2, 0);
                let free = layer.pool().available(PoolClass::Plain)
                    + layer.pool().available(PoolClass::Moving);
                prop_assert_eq!(free + layer.len(), 2 * POOL_CAPACITY);
            }
        }
    }
}
