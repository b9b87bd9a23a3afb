//! # State Notify Demo
//!
//! Drives a single-state and a multi-state manager through a short scripted
//! session, with listeners attached, and logs what each listener observes.
//! Delayed deactivation runs on real tokio timers.
//!
//! Configuration is read from `STATE_NOTIFY_CONFIG_PATH` when set, then
//! overridden by `STATE_NOTIFY__*` variables.

use anyhow::Context;
use state_notify::config::ConfigManager;
use state_notify::logging;
use state_notify::{
    DelayPolicy, EnableFlag, Enableable, LocalTokioScheduler, MultiStateComparison,
    MultiStateEnabledListener, MultiStateManager, MultiStateResponseListener,
    SingleStateComparison, State, StateCatalog, StateEnabledListener, StateManager,
    TransitionResponseListener,
};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let manager = ConfigManager::load().context("failed to load configuration")?;
    let config = manager.config().clone();
    logging::init_with_config(
        &config.environment,
        &config.effective_log_level(),
        &config.logging,
    );
    info!(
        config = %serde_json::to_string(&config).context("failed to render configuration")?,
        "Demo starting"
    );

    LocalSet::new()
        .run_until(run_session(config.delay.default_duration()))
        .await
}

async fn run_session(delay: Duration) -> anyhow::Result<()> {
    let scheduler = Rc::new(LocalTokioScheduler::new());

    let idle = State::new("Idle");
    let walk = State::new("Walk");
    let run = State::new("Run");
    let catalog = StateCatalog::new([idle.clone(), walk.clone(), run.clone()])?;

    let mut movement = StateManager::new("movement", catalog, Some(idle.clone()))?;
    movement.register_listener(Rc::new(TransitionResponseListener::new(
        [walk.clone()],
        [run.clone()],
        || info!("Sprint started"),
    )));
    movement.add_on_changed_listener(Rc::new(|| info!("Movement changed")));

    let footsteps = Rc::new(EnableFlag::new(false));
    let footsteps_listener = Rc::new(StateEnabledListener::new(
        [walk.clone(), run.clone()],
        SingleStateComparison::AnyActive,
        DelayPolicy::new(true, delay).with_delayed_states([idle.clone()]),
        Rc::clone(&footsteps),
        scheduler.clone(),
    ));

    movement.activate();
    StateEnabledListener::attach(&footsteps_listener, &movement);

    movement.set_state(&walk)?;
    movement.shift_state(1)?;
    info!(current = ?movement.current_state(), footsteps = footsteps.is_enabled(), "After shift");

    movement.reset_to_default()?;
    info!(
        footsteps = footsteps.is_enabled(),
        pending = footsteps_listener.gate().has_pending_disable(),
        "Returned to idle"
    );
    tokio::time::sleep(delay + Duration::from_millis(10)).await;
    info!(footsteps = footsteps.is_enabled(), "Delay elapsed");

    let hud = State::new("Hud");
    let map = State::new("Map");
    let chat = State::new("Chat");
    let overlays = StateCatalog::new([hud.clone(), map.clone(), chat.clone()])?;
    let mut layers = MultiStateManager::new("overlays", overlays, [&hud])?;
    layers.activate();

    let panel = Rc::new(EnableFlag::new(false));
    let panel_listener = Rc::new(MultiStateEnabledListener::new(
        [map.clone(), chat.clone()],
        MultiStateComparison::AnyActive,
        DelayPolicy::disabled(),
        Rc::clone(&panel),
        scheduler.clone(),
    ));
    MultiStateEnabledListener::attach(&panel_listener, &layers);

    let overlay_response = Rc::new(
        MultiStateResponseListener::new([map.clone(), chat.clone()], MultiStateComparison::AllActive)
            .on_active(|| info!("Map and chat both open"))
            .on_inactive(|| info!("Map and chat not both open")),
    );
    MultiStateResponseListener::attach(&overlay_response, &layers);

    layers.set_state_active(&map)?;
    layers.toggle_state_active(&chat)?;
    info!(selection = %layers.current_active_states(), panel = panel.is_enabled(), "Overlays open");

    layers.set_to_previous_active_states()?;
    layers.reset_to_default()?;
    info!(selection = %layers.current_active_states(), panel = panel.is_enabled(), "Overlays reset");

    movement.end();
    layers.end();
    info!("Demo finished");
    Ok(())
}
