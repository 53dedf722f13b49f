//! Engine scenarios exercised by the tester. Each one builds its own engines
//! over a per-iteration store and fails with a description of the first
//! broken expectation.

use super::file_store::FileStore;
use anyhow::{Context, Result, bail, ensure};
use pickpoll_core::{
    Aggregates, BlobStore, Catalog, ClickOutcome, Item, MemoryStore, Presenter, SessionConfig,
    SessionEngine, SessionPhase, SessionState, SnapshotOrigin,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;

/// Clicks recorded before the `resume` scenario drops its first engine.
const RESUME_AT: u32 = 17;
const UNKNOWN_TARGET: &str = "no-such-product";
const CORRUPT_BLOB: &str = r#"{"totalClicks":"lots","items":"#;

/// Where iteration stores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Files(PathBuf),
}

impl StoreBackend {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Memory => "memory".to_string(),
            Self::Files(root) => format!("files at {}", root.display()),
        }
    }
}

/// Storage shared by every engine an iteration builds.
pub struct IterationStore {
    handle: StoreHandle,
}

enum StoreHandle {
    Memory(MemoryStore),
    Files(PathBuf),
}

impl IterationStore {
    /// Empty store for one iteration; file stores wipe `<root>/<label>` first.
    pub fn fresh(backend: &StoreBackend, label: &str) -> Result<Self> {
        let handle = match backend {
            StoreBackend::Memory => StoreHandle::Memory(MemoryStore::new()),
            StoreBackend::Files(root) => {
                let dir = root.join(label);
                if dir.exists() {
                    fs::remove_dir_all(&dir)
                        .with_context(|| format!("failed to clear {}", dir.display()))?;
                }
                let store = FileStore::open(&dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                log::debug!("iteration store at {}", store.dir().display());
                StoreHandle::Files(dir)
            }
        };
        Ok(Self { handle })
    }

    /// A new handle onto the same underlying data, as a page reload would see it.
    pub fn open(&self) -> Result<Box<dyn BlobStore>> {
        Ok(match &self.handle {
            StoreHandle::Memory(store) => Box::new(store.clone()),
            StoreHandle::Files(dir) => Box::new(
                FileStore::open(dir)
                    .with_context(|| format!("failed to open {}", dir.display()))?,
            ),
        })
    }
}

pub struct ScenarioCtx<'a> {
    pub config: &'a SessionConfig,
    pub seed: u64,
    pub store: &'a IterationStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenarioOutcome {
    pub clicks: u32,
    pub rounds: u32,
}

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    runner: fn(&ScenarioCtx<'_>) -> Result<ScenarioOutcome>,
}

impl Scenario {
    pub fn run(&self, ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
        (self.runner)(ctx)
    }
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "full-session",
        description: "Fresh store, random picks until the session completes",
        runner: full_session,
    },
    Scenario {
        key: "resume",
        description: "Stop mid-session, rebuild from storage, finish the remaining clicks",
        runner: resume,
    },
    Scenario {
        key: "stale-clicks",
        description: "Clicks on previous-round and unknown items are ignored",
        runner: stale_clicks,
    },
    Scenario {
        key: "corrupt-snapshot",
        description: "Garbage snapshot falls back to a fresh catalog",
        runner: corrupt_snapshot,
    },
    Scenario {
        key: "multi-session",
        description: "Consecutive cycles accumulate per-item history",
        runner: multi_session,
    },
];

#[must_use]
pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.key == key)
}

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description))
}

/// Presenter that keeps every round's names for later checks.
#[derive(Debug, Default)]
struct RoundLog {
    rounds: Vec<Vec<String>>,
    completions: Vec<Aggregates>,
}

impl Presenter for RoundLog {
    fn on_items_presented(&mut self, items: &[Item]) {
        self.rounds
            .push(items.iter().map(|item| item.name.clone()).collect());
    }

    fn on_session_completed(&mut self, aggregates: &Aggregates) {
        self.completions.push(aggregates.clone());
    }
}

type Engine = SessionEngine<Box<dyn BlobStore>, RoundLog>;

fn boot(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Engine> {
    let mut engine =
        SessionEngine::bootstrap(ctx.config.clone(), ctx.store.open()?, RoundLog::default(), seed)
            .context("bootstrap failed")?;
    if let Some(err) = engine.take_write_error() {
        bail!("bootstrap could not persist the first round: {err}");
    }
    Ok(engine)
}

fn pick_target(engine: &Engine, picker: &mut ChaCha8Rng) -> Result<String> {
    engine
        .current_round()
        .choose(picker)
        .map(|item| item.name.clone())
        .context("active round presented no items")
}

fn click_until_complete(engine: &mut Engine, picker: &mut ChaCha8Rng, limit: u32) -> Result<u32> {
    let mut clicks = 0;
    while engine.phase() == SessionPhase::RoundActive {
        ensure!(clicks < limit, "session still active after {limit} clicks");
        let target = pick_target(engine, picker)?;
        if matches!(engine.handle_click(&target)?, ClickOutcome::Ignored) {
            bail!("click on presented item '{target}' was ignored");
        }
        clicks += 1;
    }
    Ok(clicks)
}

fn check_rounds(log: &RoundLog, size: usize) -> Result<()> {
    for (index, round) in log.rounds.iter().enumerate() {
        ensure!(
            round.len() == size,
            "round {} presented {} items, expected {size}",
            index + 1,
            round.len()
        );
        let mut distinct = round.clone();
        distinct.sort();
        distinct.dedup();
        ensure!(distinct.len() == round.len(), "round {} repeated an item", index + 1);
    }
    for (index, pair) in log.rounds.windows(2).enumerate() {
        if let Some(shared) = pair[1].iter().find(|name| pair[0].contains(name)) {
            bail!(
                "rounds {} and {} both presented '{shared}'",
                index + 1,
                index + 2
            );
        }
    }
    Ok(())
}

fn stored_state(ctx: &ScenarioCtx<'_>) -> Result<SessionState> {
    let blob = ctx
        .store
        .open()?
        .get(&ctx.config.storage_key)?
        .context("no snapshot persisted")?;
    SessionState::from_json(&blob).context("persisted snapshot does not parse")
}

fn full_session(ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
    let max = ctx.config.max_clicks;
    let mut engine = boot(ctx, ctx.seed)?;
    ensure!(
        engine.origin() == SnapshotOrigin::Seeded,
        "fresh store reported {:?}",
        engine.origin()
    );
    let size = engine.presentation_size();
    let mut picker = ChaCha8Rng::seed_from_u64(ctx.seed);
    let clicks = click_until_complete(&mut engine, &mut picker, max)?;
    ensure!(clicks == max, "completed after {clicks} clicks, expected {max}");

    let log = engine.presenter();
    check_rounds(log, size)?;
    ensure!(
        log.rounds.len() == usize::try_from(max)?,
        "presented {} rounds for {max} clicks",
        log.rounds.len()
    );
    ensure!(
        log.completions.len() == 1,
        "completion reported {} times",
        log.completions.len()
    );
    let reported: u32 = log.completions[0].clicks.iter().sum();
    ensure!(reported == max, "results reported {reported} clicks");

    let state = engine.state();
    ensure!(
        state.total_item_clicks() == u64::from(max),
        "items hold {} clicks, expected {max}",
        state.total_item_clicks()
    );
    let expected_views = u64::from(max) * u64::try_from(size)?;
    ensure!(
        state.total_item_views() == expected_views,
        "items hold {} views, expected {expected_views}",
        state.total_item_views()
    );
    ensure!(state.total_clicks == 0, "session counter not reset");
    ensure!(
        &stored_state(ctx)? == state,
        "persisted snapshot diverged from memory"
    );

    Ok(ScenarioOutcome {
        clicks,
        rounds: engine.rounds_completed(),
    })
}

fn resume(ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
    let max = ctx.config.max_clicks;
    let resume_at = RESUME_AT.min(max.saturating_sub(1));
    let mut picker = ChaCha8Rng::seed_from_u64(ctx.seed);

    {
        let mut first = boot(ctx, ctx.seed)?;
        for _ in 0..resume_at {
            let target = pick_target(&first, &mut picker)?;
            first.handle_click(&target)?;
        }
        ensure!(
            first.total_clicks() == resume_at,
            "first engine stopped at {}",
            first.total_clicks()
        );
    }

    let mut resumed = boot(ctx, ctx.seed.rotate_left(32))?;
    ensure!(
        resumed.origin() == SnapshotOrigin::Restored,
        "rebuilt engine reported {:?}",
        resumed.origin()
    );
    ensure!(
        resumed.total_clicks() == resume_at,
        "resumed at {} clicks, expected {resume_at}",
        resumed.total_clicks()
    );
    let remaining = max - resume_at;
    ensure!(
        resumed.clicks_remaining() == remaining,
        "{} clicks remaining, expected {remaining}",
        resumed.clicks_remaining()
    );

    let clicks = click_until_complete(&mut resumed, &mut picker, remaining)?;
    ensure!(
        clicks == remaining,
        "resumed session took {clicks} clicks, expected {remaining}"
    );
    ensure!(
        resumed.state().total_item_clicks() == u64::from(max),
        "items hold {} clicks across both engines",
        resumed.state().total_item_clicks()
    );

    Ok(ScenarioOutcome {
        clicks: resume_at + clicks,
        rounds: resume_at + resumed.rounds_completed(),
    })
}

fn stale_clicks(ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
    let max = ctx.config.max_clicks;
    let mut engine = boot(ctx, ctx.seed)?;
    let mut picker = ChaCha8Rng::seed_from_u64(ctx.seed);
    let mut previous: Vec<String> = Vec::new();
    let mut clicks = 0;

    while engine.phase() == SessionPhase::RoundActive {
        ensure!(clicks < max, "session still active after {max} clicks");
        let current: Vec<String> = engine
            .current_round()
            .iter()
            .map(|item| item.name.clone())
            .collect();
        let stale: Vec<String> = previous
            .iter()
            .filter(|name| !current.contains(name))
            .cloned()
            .chain(std::iter::once(UNKNOWN_TARGET.to_string()))
            .collect();
        for name in stale {
            let before = engine.state().clone();
            let outcome = engine.handle_click(&name)?;
            ensure!(
                matches!(outcome, ClickOutcome::Ignored),
                "click on '{name}' outside the round was attributed"
            );
            ensure!(
                engine.state() == &before,
                "ignored click on '{name}' changed the tallies"
            );
        }

        let target = pick_target(&engine, &mut picker)?;
        engine.handle_click(&target)?;
        clicks += 1;
        previous = current;
    }

    if let Some(name) = previous.first() {
        let before = engine.state().clone();
        ensure!(
            matches!(engine.handle_click(name)?, ClickOutcome::Ignored),
            "click after completion was attributed"
        );
        ensure!(engine.state() == &before, "click after completion changed the tallies");
    }
    ensure!(
        engine.state().total_item_clicks() == u64::from(max),
        "items hold {} clicks, expected {max}",
        engine.state().total_item_clicks()
    );

    Ok(ScenarioOutcome {
        clicks,
        rounds: engine.rounds_completed(),
    })
}

fn corrupt_snapshot(ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
    ctx.store
        .open()?
        .set(&ctx.config.storage_key, CORRUPT_BLOB)?;

    let engine = boot(ctx, ctx.seed)?;
    ensure!(
        engine.origin() == SnapshotOrigin::Recovered,
        "corrupt snapshot reported {:?}",
        engine.origin()
    );
    ensure!(engine.total_clicks() == 0, "recovered session did not start at 0");

    let expected = Catalog::default_products();
    let state = engine.state();
    ensure!(
        state.items.len() == expected.len(),
        "recovered catalog has {} items",
        state.items.len()
    );
    ensure!(
        state
            .items
            .iter()
            .zip(expected.iter())
            .all(|(got, want)| got.name == want.name && got.clicks == 0),
        "recovered catalog differs from the stock products"
    );
    let size = u64::try_from(engine.presentation_size())?;
    ensure!(
        state.total_item_views() == size,
        "first round recorded {} views",
        state.total_item_views()
    );
    ensure!(&stored_state(ctx)? == state, "corrupt blob was not replaced");

    Ok(ScenarioOutcome::default())
}

fn multi_session(ctx: &ScenarioCtx<'_>) -> Result<ScenarioOutcome> {
    let max = ctx.config.max_clicks;
    let mut picker = ChaCha8Rng::seed_from_u64(ctx.seed);
    let mut clicks = 0;
    let mut rounds = 0;

    for cycle in 1..=2_u32 {
        let mut engine = boot(ctx, ctx.seed.wrapping_add(u64::from(cycle)))?;
        if cycle > 1 {
            ensure!(
                engine.origin() == SnapshotOrigin::Restored,
                "cycle {cycle} reported {:?}",
                engine.origin()
            );
        }
        ensure!(
            engine.total_clicks() == 0,
            "cycle {cycle} started at {} clicks",
            engine.total_clicks()
        );
        clicks += click_until_complete(&mut engine, &mut picker, max)?;
        rounds += engine.rounds_completed();

        let expected = u64::from(max) * u64::from(cycle);
        ensure!(
            engine.state().total_item_clicks() == expected,
            "after cycle {cycle} items hold {} clicks, expected {expected}",
            engine.state().total_item_clicks()
        );
        ensure!(engine.total_clicks() == 0, "cycle {cycle} left the counter set");

        if cycle == 2 {
            ensure!(engine.restart()?, "restart refused after completion");
            clicks += click_until_complete(&mut engine, &mut picker, max)?;
            rounds += engine.rounds_completed();
            ensure!(
                engine.state().total_item_clicks() == u64::from(max) * 3,
                "restarted cycle left {} clicks",
                engine.state().total_item_clicks()
            );
            ensure!(
                engine.presenter().completions.len() == 2,
                "restarted engine reported {} completions",
                engine.presenter().completions.len()
            );
        }
    }

    Ok(ScenarioOutcome { clicks, rounds })
}
