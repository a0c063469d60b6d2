use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::{
    sync::{mpsc::UnboundedSender, watch},
    task::JoinHandle,
    time::{interval_at, Instant},
};

use crate::{notice::Notice, storage::PhraseRecord};

/// Sends a random phrase from the latest history every `every`, starting one
/// interval from now.
///
/// Ticks are skipped while the history is empty. Nothing is spawned with a zero
/// interval. The task ends when the receiving side is dropped.
pub fn spawn_practice_reminders(
    mut phrases: watch::Receiver<Vec<PhraseRecord>>,
    every: Duration,
    sender: UnboundedSender<Notice>,
) -> Option<JoinHandle<()>> {
    if every.is_zero() {
        return None;
    }
    tracing::info!(?every, "starting practice reminders");
    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        loop {
            ticker.tick().await;
            if sender.is_closed() {
                tracing::debug!("reminder receiver closed");
                break;
            }
            let summary = {
                let history = phrases.borrow_and_update();
                let mut rng = rand::thread_rng();
                history.choose(&mut rng).map(PhraseRecord::summary)
            };
            let Some(summary) = summary else {
                continue;
            };
            if sender.send(Notice::info("Practice Time!", summary)).is_err() {
                tracing::debug!("reminder receiver closed");
                break;
            }
        }
    }))
}
