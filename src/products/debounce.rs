use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tokio::time::sleep;

/// How long the input has to stay quiet before the latest term is acted on.
pub const QUIESCENCE: Duration = Duration::from_millis(300);

/// Wait for the next settled value on `rx`: items that arrive within
/// `window` of each other supersede one another, and only the last one of a
/// burst is returned once the channel has been quiet for a full `window`.
///
/// Returns `None` when the channel closes. A value still pending at close is
/// dropped, not returned; the sender going away means nobody is left to act
/// for, so the superseded query is never issued.
pub async fn next_settled<T>(rx: &mut Receiver<T>, window: Duration) -> Option<T> {
    let mut pending = rx.recv().await?;
    loop {
        tokio::select! {
            item = rx.recv() => match item {
                Some(item) => pending = item,
                None => return None,
            },
            () = sleep(window) => return Some(pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_item() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send("a").await.unwrap();
        tx.send("ap").await.unwrap();
        tx.send("app").await.unwrap();

        let settled = next_settled(&mut rx, QUIESCENCE).await;
        assert_eq!(settled, Some("app"));
    }

    #[tokio::test(start_paused = true)]
    async fn items_spaced_wider_than_window_settle_separately() {
        let (tx, mut rx) = mpsc::channel(8);
        let producer = tokio::spawn(async move {
            tx.send(1).await.unwrap();
            sleep(QUIESCENCE * 2).await;
            tx.send(2).await.unwrap();
        });

        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, Some(1));
        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, Some(2));
        producer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn items_inside_the_window_supersede() {
        let (tx, mut rx) = mpsc::channel(8);
        let producer = tokio::spawn(async move {
            tx.send("m").await.unwrap();
            sleep(QUIESCENCE / 2).await;
            tx.send("ma").await.unwrap();
            sleep(QUIESCENCE / 2).await;
            tx.send("man").await.unwrap();
            // Keep the channel open until the burst has settled.
            sleep(QUIESCENCE * 2).await;
        });

        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, Some("man"));
        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, None);
        producer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn close_with_pending_item_issues_nothing() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send("abandoned").await.unwrap();
        drop(tx);

        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_empty_channel_returns_none() {
        let (tx, mut rx) = mpsc::channel::<u32>(1);
        drop(tx);
        assert_eq!(next_settled(&mut rx, QUIESCENCE).await, None);
    }
}
