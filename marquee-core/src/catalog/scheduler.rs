use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info, warn};

use super::cache::CatalogCache;

#[derive(Debug)]
enum SchedulerCommand {
    Trigger,
    SetPeriod(Duration),
    Shutdown,
}

/// Drives [`CatalogCache::refresh`] on a fixed period.
///
/// The first refresh runs as soon as the scheduler starts. Manual triggers run
/// out of band and leave the next scheduled tick where it was. Refreshes never
/// overlap: a trigger that arrives while one is running is coalesced into a
/// single follow-up refresh.
#[derive(Debug)]
pub struct RefreshScheduler {
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Spawn the scheduler task on the current runtime.
    pub fn start(cache: Arc<CatalogCache>, period: Duration) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(cache, period, receiver));
        info!(period_secs = period.as_secs(), "refresh scheduler started");
        Self {
            commands,
            task: Some(task),
        }
    }

    /// Request an immediate refresh.
    pub fn trigger(&self) {
        if self.commands.send(SchedulerCommand::Trigger).is_err() {
            warn!("refresh trigger ignored; scheduler is not running");
        }
    }

    /// Re-arm the timer with a new period, counted from now.
    pub fn set_period(&self, period: Duration) {
        if self.commands.send(SchedulerCommand::SetPeriod(period)).is_err() {
            warn!("period change ignored; scheduler is not running");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the scheduler, abort any in-flight refresh and wait for the task
    /// to exit.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(SchedulerCommand::Shutdown);
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
            && !err.is_cancelled()
        {
            warn!(error = %err, "refresh scheduler task failed");
        }
        info!("refresh scheduler stopped");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    cache: Arc<CatalogCache>,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<SchedulerCommand>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut follow_up = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("scheduled catalog refresh");
                request_refresh(&cache, &mut in_flight, &mut follow_up);
            }
            command = commands.recv() => match command {
                Some(SchedulerCommand::Trigger) => {
                    debug!("manual catalog refresh");
                    request_refresh(&cache, &mut in_flight, &mut follow_up);
                }
                Some(SchedulerCommand::SetPeriod(next)) => {
                    info!(period_secs = next.as_secs(), "refresh period changed");
                    ticker = interval_at(Instant::now() + next, next);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                }
                Some(SchedulerCommand::Shutdown) | None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined
                    && !err.is_cancelled()
                {
                    warn!(error = %err, "catalog refresh task failed");
                }
                if follow_up {
                    follow_up = false;
                    request_refresh(&cache, &mut in_flight, &mut follow_up);
                }
            }
        }
    }

    in_flight.shutdown().await;
}

fn request_refresh(
    cache: &Arc<CatalogCache>,
    in_flight: &mut JoinSet<()>,
    follow_up: &mut bool,
) {
    if !in_flight.is_empty() {
        debug!("refresh already running; queued a follow-up");
        *follow_up = true;
        return;
    }
    let cache = Arc::clone(cache);
    in_flight.spawn(async move {
        cache.refresh().await;
    });
}
