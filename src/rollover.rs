use crate::controller::{ControllerHandle, Event};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Time left until the first instant of the next calendar day in `now`'s zone.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> std::time::Duration {
    let tomorrow = now.date_naive() + Duration::days(1);
    let next = (0..24)
        .filter_map(|hour| tomorrow.and_hms_opt(hour, 0, 0))
        .find_map(|naive| now.timezone().from_local_datetime(&naive).earliest());

    match next {
        Some(next) => (next - now.clone()).to_std().unwrap_or_default(),
        None => std::time::Duration::from_secs(24 * 60 * 60),
    }
}

/// Sleeps until local midnight, archives the day that just ended, and re-arms.
/// Stops when the controller is gone.
pub fn spawn_midnight_rollover(handle: ControllerHandle) -> JoinHandle<()> {
    spawn_rollover_with(handle, Local::now)
}

pub fn spawn_rollover_with<Tz, C>(handle: ControllerHandle, clock: C) -> JoinHandle<()>
where
    Tz: TimeZone + 'static,
    C: Fn() -> DateTime<Tz> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let (closing, wait) = {
                let now = clock();
                (date_key(now.date_naive()), until_next_midnight(&now))
            };
            info!("next rollover for {closing} in {}s", wait.as_secs());
            tokio::time::sleep(wait).await;

            if let Err(err) = handle.send(Event::Rollover { date: closing }).await {
                warn!("rollover scheduler stopping: {err}");
                break;
            }
        }
    })
}
