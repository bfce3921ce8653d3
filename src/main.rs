//! Fruit Slicer headless driver
//!
//! Plays one level with a simple bot that swipes at fruit, then prints the
//! outcome and the resulting profile snapshot.
//!
//! Usage: `fruit-slicer [level] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    log::info!("Fruit Slicer (headless) starting: level {}, seed {}", level, seed);
    autoplay::run(level, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no standalone web driver
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use fruit_slicer::consts::SIM_DT;
    use fruit_slicer::sim::{RandomSpawns, SessionEvent};
    use fruit_slicer::{MemoryProfile, ProfileHandle, Session, SessionState, SessionTuning};

    /// Chance per frame that the bot swipes at a given fruit
    const SKILL: f64 = 0.04;
    /// Safety cap on simulated frames
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub fn run(level: u32, seed: u64) {
        let memory = Rc::new(RefCell::new(MemoryProfile::new()));
        let profile: ProfileHandle = memory.clone();
        let mut session = Session::start(
            level,
            SessionTuning::default(),
            Box::new(RandomSpawns::new(seed)),
            profile,
        );
        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut now = 0.0f64;

        for _ in 0..MAX_FRAMES {
            session.on_simulation_step(SIM_DT);
            now += SIM_DT as f64;

            let targets: Vec<Vec2> = session
                .arena()
                .all_live()
                .iter()
                .filter(|o| !o.kind.is_bomb() && o.vel.y < 0.0)
                .map(|o| o.pos)
                .collect();
            for target in targets {
                if bot.random_bool(SKILL) {
                    let start = target + Vec2::new(-60.0, 20.0);
                    session.on_pointer_down(start, now);
                    session.on_pointer_move(target, now);
                    session.on_pointer_up(target, now);
                }
            }

            for event in session.drain_events() {
                match event {
                    SessionEvent::SplitEffect { variety, .. } => {
                        log::debug!("Sliced {}", variety.as_str());
                    }
                    SessionEvent::ScoreChanged { score } => log::debug!("Score {}", score),
                    _ => {}
                }
            }

            if session.state().is_terminal() {
                break;
            }
        }

        match session.state() {
            SessionState::Completed => log::info!(
                "Level {} complete: {} stars, cut {}/{}",
                session.level(),
                session.stars().unwrap_or(0),
                session.counters().cut_fruit,
                session.counters().initial_fruit
            ),
            SessionState::Failed => log::info!(
                "Level {} failed ({:?}), score {}",
                session.level(),
                session.failure(),
                session.score()
            ),
            other => log::warn!("Stopped while {:?}", other),
        }

        match memory.borrow().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize profile: {}", e),
        }
    }
}
