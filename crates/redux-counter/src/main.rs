//! Counter demo for redux-store
//!
//! Reads `.redux-store.toml` (current directory, then home) for logging
//! settings. Set `RUST_LOG=debug` to see the logging middleware output.

use anyhow::Result;
use log::{info, warn};
use redux_store::{
    from_fn, Action, CombinedReducer, Dispatcher, Observable, ObservableExt, StandardAction,
    StoreBuilder, StoreConfig, StoreInitialized, Thunk, ThunkMiddleware,
};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct CounterState {
    count: i64,
    step: i64,
    dispatched: usize,
}

#[derive(Debug)]
struct CountUp;

#[derive(Debug)]
struct CountDown;

#[derive(Debug)]
struct Overflow;

fn count_reducer(mut state: CounterState, action: &dyn Action) -> Result<CounterState> {
    if action.is::<StoreInitialized>() {
        state.step = 1;
    } else if action.is::<CountUp>() {
        state.count += state.step;
    } else if action.is::<CountDown>() {
        state.count -= state.step;
    } else if action.is::<Overflow>() {
        anyhow::bail!("counter overflow");
    } else if let Some(standard) = action.downcast_ref::<StandardAction>() {
        if standard.kind() == "set-step" {
            if let Some(step) = standard.get("step").and_then(|step| step.as_i64()) {
                state.step = step;
            }
        }
    }
    Ok(state)
}

fn bookkeeping_reducer(mut state: CounterState, _action: &dyn Action) -> Result<CounterState> {
    state.dispatched += 1;
    Ok(state)
}

fn delayed_count_up() -> Thunk<CounterState> {
    Thunk::new(|_store, next| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            next.invoke(&CountUp).await;
            anyhow::Ok(())
        })
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = StoreConfig::load();
    let reducer = CombinedReducer::<CounterState>::new()
        .with(count_reducer)
        .with(bookkeeping_reducer);

    let store = StoreBuilder::new(reducer)
        .use_logging(&config.logging)?
        .use_middleware(ThunkMiddleware::new())
        .build()
        .await;

    let _counts = store
        .clone()
        .select(|state: &CounterState| state.count)
        .distinct_until_changed()
        .subscribe(
            from_fn(|count: &i64| info!("count is now {count}"))
                .on_error(|error| warn!("{error}: {:#}", error.cause())),
        );

    store.dispatch(CountUp).await;
    store.dispatch(CountUp).await;
    store
        .dispatch(StandardAction::with_payload(
            "set-step",
            [("step".to_string(), 10.into())].into_iter().collect(),
        ))
        .await;
    store.dispatch(CountDown).await;
    store.dispatch(delayed_count_up()).await;
    store.dispatch(Overflow).await;

    let state = store.state();
    info!(
        "final count {} after {} reductions",
        state.count, state.dispatched
    );

    Ok(())
}
