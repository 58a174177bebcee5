use std::time::Duration;

use anyhow::Result;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Calls `refresh` immediately and then on every tick of `interval` until
/// `cancel_token` fires. A failed refresh is logged and the loop keeps going.
pub async fn refresh_loop<F>(interval: Duration, cancel_token: CancellationToken, mut refresh: F)
where
    F: FnMut() -> Result<()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = refresh() {
                    log_error!("dashboard refresh failed: {err:?}");
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("dashboard refresh loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn stops_when_cancelled() {
        let token = CancellationToken::new();
        let stopper = token.clone();
        let mut ticks = 0;

        refresh_loop(Duration::from_millis(5), token, || {
            ticks += 1;
            if ticks == 3 {
                stopper.cancel();
            }
            Ok(())
        })
        .await;

        assert_eq!(ticks, 3);
    }

    #[tokio::test]
    async fn keeps_going_after_a_failed_refresh() {
        let token = CancellationToken::new();
        let stopper = token.clone();
        let mut ticks = 0;

        refresh_loop(Duration::from_millis(5), token, || {
            ticks += 1;
            if ticks == 2 {
                stopper.cancel();
            }
            Err(anyhow!("storage unavailable"))
        })
        .await;

        assert_eq!(ticks, 2);
    }
}
